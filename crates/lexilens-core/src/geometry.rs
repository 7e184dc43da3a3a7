//! Screen-to-source coordinate mapping under "cover" fit.
//!
//! A still frame of native size `source_width x source_height` is shown
//! scaled up until it fills the display in both axes, then center-cropped on
//! the overflowing axis. A selection made in display units therefore has to
//! be shifted by the cropped margin and scaled back to source pixels.

use lexilens_types::{DisplaySize, Point, ViewportRect};

use crate::error::GeometryError;

/// Derived, read-only relation between display units and source pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMapping {
    /// Source pixels per display unit, uniform on both axes
    pub scale: f64,
    /// Display units of rendered image hidden past the left edge
    pub offset_x: f64,
    /// Display units of rendered image hidden past the top edge
    pub offset_y: f64,
    pub source_width: u32,
    pub source_height: u32,
    pub display: DisplaySize,
}

/// Rectangle in source pixel space, unrounded and possibly out of bounds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer pixel region ready for extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub fn compute_mapping(
    source_width: u32,
    source_height: u32,
    display: DisplaySize,
) -> Result<DisplayMapping, GeometryError> {
    if source_width == 0 || source_height == 0 {
        return Err(GeometryError::InvalidDimensions {
            width: source_width as f64,
            height: source_height as f64,
        });
    }
    if !(display.width > 0.0 && display.height > 0.0) {
        return Err(GeometryError::InvalidDimensions {
            width: display.width,
            height: display.height,
        });
    }

    let sw = source_width as f64;
    let sh = source_height as f64;
    let source_ratio = sw / sh;
    let display_ratio = display.width / display.height;

    let (scale, offset_x, offset_y) = if source_ratio > display_ratio {
        // Height is the fitted axis, width overflows
        let scale = sh / display.height;
        let rendered_width = sw / scale;
        (scale, (rendered_width - display.width) / 2.0, 0.0)
    } else if source_ratio < display_ratio {
        let scale = sw / display.width;
        let rendered_height = sh / scale;
        (scale, 0.0, (rendered_height - display.height) / 2.0)
    } else {
        (sw / display.width, 0.0, 0.0)
    };

    Ok(DisplayMapping {
        scale,
        offset_x: offset_x.max(0.0),
        offset_y: offset_y.max(0.0),
        source_width,
        source_height,
        display,
    })
}

impl DisplayMapping {
    pub fn to_source_point(&self, point: Point) -> Point {
        Point::new(
            (point.x + self.offset_x) * self.scale,
            (point.y + self.offset_y) * self.scale,
        )
    }

    /// Maps without clamping; callers clamp to the container first and to
    /// the source bounds afterwards.
    pub fn to_source(&self, rect: &ViewportRect) -> SourceRect {
        SourceRect {
            x: (rect.x + self.offset_x) * self.scale,
            y: (rect.y + self.offset_y) * self.scale,
            width: rect.width * self.scale,
            height: rect.height * self.scale,
        }
    }

    pub fn to_viewport(&self, rect: &SourceRect) -> ViewportRect {
        ViewportRect::new(
            rect.x / self.scale - self.offset_x,
            rect.y / self.scale - self.offset_y,
            rect.width / self.scale,
            rect.height / self.scale,
        )
    }

    /// Where the whole scaled image sits, including the cropped overflow
    pub fn rendered_bounds(&self) -> ViewportRect {
        ViewportRect::new(
            -self.offset_x,
            -self.offset_y,
            self.source_width as f64 / self.scale,
            self.source_height as f64 / self.scale,
        )
    }

    /// Part of the source image that is actually on screen
    pub fn visible_source(&self) -> SourceRect {
        self.to_source(&self.display.bounds())
    }
}

impl SourceRect {
    pub fn clamp_to(&self, width: u32, height: u32) -> SourceRect {
        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = (self.x + self.width).min(width as f64);
        let bottom = (self.y + self.height).min(height as f64);
        SourceRect {
            x: left,
            y: top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    /// Rounds edges to whole pixels; `None` when nothing is left
    pub fn to_pixels(&self) -> Option<PixelRect> {
        let left = self.x.round().max(0.0);
        let top = self.y.round().max(0.0);
        let right = (self.x + self.width).round();
        let bottom = (self.y + self.height).round();
        if right <= left || bottom <= top {
            return None;
        }
        Some(PixelRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}
