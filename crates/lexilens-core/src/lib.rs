pub mod camera;
pub mod crop;
pub mod dictionary;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod preprocess;
pub mod recognition;
pub mod renderer;

pub use camera::{Camera, SourceImage};
pub use crop::CropBox;
pub use dictionary::{DictionaryCache, DictionaryShard, ShardSource};
pub use error::{CameraError, DictionaryError, GeometryError, RecognitionError};
pub use geometry::{DisplayMapping, PixelRect, SourceRect};
pub use pipeline::{CapturePipeline, Phase, PipelineState, RecognitionJob, lookup_typed};
pub use recognition::{OcrEngine, Recognition, RecognitionAdapter};
pub use renderer::Renderer;
