use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use image::RgbaImage;
use lexilens_core::{Camera, CameraError, SourceImage};

/// Camera stand-in that "streams" one still image from disk.
///
/// Used on machines without a capture device and for scripted sessions.
pub struct StillImageCamera {
    path: Option<PathBuf>,
    frame: RwLock<Option<SourceImage>>,
    paused: AtomicBool,
}

impl StillImageCamera {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            frame: RwLock::new(None),
            paused: AtomicBool::new(false),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            path: None,
            frame: RwLock::new(Some(SourceImage::new(image))),
            paused: AtomicBool::new(false),
        }
    }

    /// No source at all; `start` always fails
    pub fn empty() -> Self {
        Self {
            path: None,
            frame: RwLock::new(None),
            paused: AtomicBool::new(false),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Camera for StillImageCamera {
    async fn start(&self) -> Result<(), CameraError> {
        let Some(path) = self.path.clone() else {
            return match self.frame.read().map(|f| f.is_some()) {
                Ok(true) => Ok(()),
                _ => Err(CameraError::Unavailable("no image source configured".to_string())),
            };
        };

        tracing::info!("Opening still camera source: {}", path.display());
        let loaded = tokio::task::spawn_blocking(move || image::open(&path))
            .await
            .map_err(|e| CameraError::Unavailable(e.to_string()))?;

        let image = loaded.map_err(|e| match e {
            image::ImageError::IoError(io) if io.kind() == ErrorKind::PermissionDenied => {
                CameraError::PermissionDenied
            }
            other => CameraError::Unavailable(other.to_string()),
        })?;

        let frame = SourceImage::new(image.to_rgba8());
        tracing::info!("Still source ready: {}x{}", frame.width(), frame.height());
        if let Ok(mut slot) = self.frame.write() {
            *slot = Some(frame);
        }
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn freeze(&self) -> Result<SourceImage, CameraError> {
        let frame = self
            .frame
            .read()
            .ok()
            .and_then(|f| f.clone())
            .ok_or(CameraError::NotStarted)?;
        self.paused.store(true, Ordering::SeqCst);
        Ok(frame)
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }
}
