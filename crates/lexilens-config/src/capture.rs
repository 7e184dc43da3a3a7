use serde::{Deserialize, Serialize};

fn default_box_width() -> f64 {
    150.0
}

fn default_box_height() -> f64 {
    80.0
}

fn default_detect_threshold() -> u8 {
    128
}

fn default_detect_gap() -> u32 {
    6
}

fn default_display_width() -> f64 {
    360.0
}

fn default_display_height() -> f64 {
    640.0
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    /// Initial crop box size in screen units
    #[serde(default = "default_box_width")]
    pub box_width: f64,
    #[serde(default = "default_box_height")]
    pub box_height: f64,
    /// Size the initial box to the word under the tap
    pub auto_detect: bool,
    #[serde(default = "default_detect_threshold")]
    pub detect_threshold: u8,
    /// Blank columns/rows that end a word
    #[serde(default = "default_detect_gap")]
    pub detect_gap: u32,
    #[serde(default = "default_display_width")]
    pub display_width: f64,
    #[serde(default = "default_display_height")]
    pub display_height: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            box_width: default_box_width(),
            box_height: default_box_height(),
            auto_detect: false,
            detect_threshold: default_detect_threshold(),
            detect_gap: default_detect_gap(),
            display_width: default_display_width(),
            display_height: default_display_height(),
        }
    }
}
