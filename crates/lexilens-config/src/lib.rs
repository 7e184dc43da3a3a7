use std::env;

use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::dictionary::DictionaryConfig;
use self::ocr::OcrConfig;
use self::offline::OfflineConfig;

pub mod capture;
pub mod dictionary;
pub mod ocr;
pub mod offline;

fn default_timeout_seconds() -> u64 {
    30
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub ocr: OcrConfig,
    pub dictionary: DictionaryConfig,
    pub capture: CaptureConfig,
    pub offline: OfflineConfig,

    /// Upper bound for a dictionary shard fetch
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Config {
    pub fn new() -> Self {
        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_seconds);

        let log_json = env::var("LEXILENS_LOG_JSON")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Config {
            ocr: OcrConfig::default(),
            dictionary: DictionaryConfig::default(),
            capture: CaptureConfig::default(),
            offline: OfflineConfig::default(),

            timeout_seconds,
            log_json,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
