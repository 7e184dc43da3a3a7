use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    #[error("Camera is not streaming")]
    NotStarted,
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("OCR engine failed: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Recognition timed out")]
    Timeout,
}

/// Shard fetch failures. Cloneable because one in-flight fetch result is
/// handed to every waiter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DictionaryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Shard not found: {0}")]
    Missing(String),

    #[error("Invalid shard: {0}")]
    Parse(String),

    #[error("Timed out fetching shard '{0}'")]
    Timeout(char),
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
}
