use std::env;

use serde::{Deserialize, Serialize};

fn default_language() -> String {
    env::var("LEXILENS_OCR_LANG").unwrap_or_else(|_| "eng".to_string())
}

fn default_tesseract_path() -> String {
    "tesseract".to_string()
}

fn default_page_seg_mode() -> u8 {
    // Single text line
    7
}

fn default_preprocess() -> bool {
    true
}

fn default_threshold() -> u8 {
    128
}

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language identifier
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_tesseract_path")]
    pub tesseract_path: String,
    /// Local traineddata directory, for running without network access
    pub tessdata_dir: Option<String>,
    #[serde(default = "default_page_seg_mode")]
    pub page_seg_mode: u8,
    /// Binarize the region before recognition
    #[serde(default = "default_preprocess")]
    pub preprocess: bool,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            tesseract_path: default_tesseract_path(),
            tessdata_dir: None,
            page_seg_mode: default_page_seg_mode(),
            preprocess: default_preprocess(),
            threshold: default_threshold(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
