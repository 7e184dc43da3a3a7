//! Interactive crop rectangle: drag the body to move it, drag a corner to
//! resize it.

use lexilens_types::{Corner, DragTarget, Point, ViewportRect};

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Resting,
    Dragging { target: DragTarget, last: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropBox {
    rect: ViewportRect,
    drag: DragState,
}

impl CropBox {
    pub fn new(rect: ViewportRect) -> Self {
        Self {
            rect: rect.normalized(),
            drag: DragState::Resting,
        }
    }

    pub fn centered_on(center: Point, width: f64, height: f64) -> Self {
        Self::new(ViewportRect::centered_on(center, width, height))
    }

    pub fn rect(&self) -> ViewportRect {
        self.rect
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Handle or body currently held, if any
    pub fn active_target(&self) -> Option<DragTarget> {
        match self.drag {
            DragState::Dragging { target, .. } => Some(target),
            DragState::Resting => None,
        }
    }

    /// Returns false if a drag is already in progress
    pub fn begin_drag(&mut self, target: DragTarget, at: Point) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.drag = DragState::Dragging { target, last: at };
        true
    }

    /// Applies the delta since the previous pointer position. `None` while
    /// resting.
    pub fn drag_to(&mut self, at: Point) -> Option<ViewportRect> {
        let DragState::Dragging { target, last } = self.drag else {
            return None;
        };

        let (rect, target) = apply_delta(self.rect, target, at.x - last.x, at.y - last.y);
        self.rect = rect;
        self.drag = DragState::Dragging { target, last: at };
        Some(rect)
    }

    /// Returns false if no drag was in progress
    pub fn end_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = DragState::Resting;
        was_dragging
    }
}

/// Moves or resizes `rect` by `(dx, dy)` for the given drag target.
///
/// A resize that would invert the rectangle is flipped back to a
/// non-negative size; the returned target is the corner now under the
/// pointer.
pub fn apply_delta(
    rect: ViewportRect,
    target: DragTarget,
    dx: f64,
    dy: f64,
) -> (ViewportRect, DragTarget) {
    let ViewportRect {
        mut x,
        mut y,
        mut width,
        mut height,
    } = rect;

    let corner = match target {
        DragTarget::Body => {
            return (ViewportRect::new(x + dx, y + dy, width, height), target);
        }
        DragTarget::Handle(corner) => corner,
    };

    match corner {
        Corner::TopLeft => {
            x += dx;
            y += dy;
            width -= dx;
            height -= dy;
        }
        Corner::TopRight => {
            y += dy;
            width += dx;
            height -= dy;
        }
        Corner::BottomLeft => {
            x += dx;
            width -= dx;
            height += dy;
        }
        Corner::BottomRight => {
            width += dx;
            height += dy;
        }
    }

    let mut corner = corner;
    if width < 0.0 {
        corner = corner.flip_horizontal();
    }
    if height < 0.0 {
        corner = corner.flip_vertical();
    }

    (
        ViewportRect::new(x, y, width, height).normalized(),
        DragTarget::Handle(corner),
    )
}
