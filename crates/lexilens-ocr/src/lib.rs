mod capture;
mod tesseract;

pub use capture::StillImageCamera;
pub use tesseract::{TesseractEngine, parse_tsv};
