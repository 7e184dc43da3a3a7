use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Capture gesture on the live view
    Tap(Point),
    PointerDown {
        target: DragTarget,
        at: Point,
    },
    PointerMove(Point),
    PointerUp,
    Confirm,
    Cancel,
    /// Corrected word typed into the result field
    EditWord(String),
    /// Direct lookup outside a capture cycle
    Lookup(String),
    Resize(DisplaySize),
    RecognitionFinished {
        session: u64,
        outcome: CaptureOutcome,
    },
    /// `session` is the result being edited; `None` for a direct lookup
    LookupFinished {
        session: Option<u64>,
        word: String,
        result: LookupResult,
    },
    Quit,
}

/// Everything the presentation layer is asked to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum UiEvent {
    ShowLive,
    ShowStill { width: u32, height: u32 },
    ShowSelection(ViewportRect),
    HideSelection,
    PointerCaptured(bool),
    ShowBusy,
    ShowResult(CaptureOutcome),
    ShowLookup { word: String, result: LookupResult },
    Message(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Rectangle in on-screen units, relative to the container's top-left corner.
///
/// Width and height are signed so intermediate drag arithmetic can be
/// expressed directly; see `normalized`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered_on(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Same area with any inverted axis flipped back to a non-negative size
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }

    /// Intersection with `bounds`; empty intersections yield a zero-sized rect
    pub fn clamp_to(&self, bounds: &ViewportRect) -> Self {
        let r = self.normalized();
        let left = r.x.max(bounds.x);
        let top = r.y.max(bounds.y);
        let right = r.right().min(bounds.right());
        let bottom = r.bottom().min(bounds.bottom());
        Self::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The container itself, as a rect anchored at the origin
    pub fn bounds(&self) -> ViewportRect {
        ViewportRect::new(0.0, 0.0, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Corner on the opposite side of the vertical axis
    pub fn flip_horizontal(self) -> Self {
        match self {
            Corner::TopLeft => Corner::TopRight,
            Corner::TopRight => Corner::TopLeft,
            Corner::BottomLeft => Corner::BottomRight,
            Corner::BottomRight => Corner::BottomLeft,
        }
    }

    /// Corner on the opposite side of the horizontal axis
    pub fn flip_vertical(self) -> Self {
        match self {
            Corner::TopLeft => Corner::BottomLeft,
            Corner::TopRight => Corner::BottomRight,
            Corner::BottomLeft => Corner::TopLeft,
            Corner::BottomRight => Corner::TopRight,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

/// What a pointer-down grabbed: the box itself or one of its corner handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DragTarget {
    Body,
    Handle(Corner),
}

impl DragTarget {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "body" => Some(DragTarget::Body),
            "top-left" => Some(DragTarget::Handle(Corner::TopLeft)),
            "top-right" => Some(DragTarget::Handle(Corner::TopRight)),
            "bottom-left" => Some(DragTarget::Handle(Corner::BottomLeft)),
            "bottom-right" => Some(DragTarget::Handle(Corner::BottomRight)),
            _ => None,
        }
    }
}

/// Tri-state outcome of a dictionary lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LookupResult {
    Definition(String),
    NotFound,
    LoadError(String),
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Definition(_))
    }
}

/// What a finished capture cycle shows the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureOutcome {
    /// Text as recognized, trimmed; empty when recognition produced nothing
    pub recognized: String,
    /// 0-100 when the backend reports it
    pub confidence: Option<f32>,
    pub lookup: LookupResult,
}
