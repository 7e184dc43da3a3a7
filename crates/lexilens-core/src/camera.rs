use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;

use crate::error::CameraError;
use crate::geometry::PixelRect;

/// Still frame frozen from the live feed. Immutable and cheap to clone.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Copies out a sub-region; the rect is clipped to the frame
    pub fn crop(&self, rect: PixelRect) -> RgbaImage {
        image::imageops::crop_imm(
            self.pixels.as_ref(),
            rect.x,
            rect.y,
            rect.width,
            rect.height,
        )
        .to_image()
    }
}

/// Device camera capability
#[async_trait]
pub trait Camera: Send + Sync {
    /// Requests the stream, rear-facing when there is a choice
    async fn start(&self) -> Result<(), CameraError>;

    /// Pauses the stream and returns the current frame
    fn freeze(&self) -> Result<SourceImage, CameraError>;

    /// Resumes streaming after a freeze
    fn resume(&self);
}
