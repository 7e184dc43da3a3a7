use std::env;

use serde::{Deserialize, Serialize};

/// Where per-letter shards come from
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DictionarySource {
    /// `<root>/dict/<letter>.json` on the local filesystem
    #[default]
    Directory,
    /// `<base_url>/dict/<letter>.json` over HTTP
    Http,
    /// Through the offline asset cache
    Offline,
}

fn default_root() -> String {
    env::var("LEXILENS_DICT_ROOT").unwrap_or_else(|_| ".".to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    pub source: DictionarySource,
    #[serde(default = "default_root")]
    pub root: String,
    pub base_url: Option<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        let base_url = env::var("LEXILENS_DICT_URL").ok();
        Self {
            source: if base_url.is_some() {
                DictionarySource::Http
            } else {
                DictionarySource::Directory
            },
            root: default_root(),
            base_url,
        }
    }
}
