use serde::{Deserialize, Serialize};

fn default_cache_name() -> String {
    "lexilens-v1".to_string()
}

fn default_cache_dir() -> String {
    ".lexilens-cache".to_string()
}

fn default_assets() -> Vec<String> {
    [
        "index.html",
        "style.css",
        "manifest.json",
        "lib/eng.traineddata.gz",
        "icons/icon-192x192.png",
        "icons/icon-512x512.png",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OfflineConfig {
    pub enabled: bool,
    /// Cache generation; every other generation is purged on activation
    #[serde(default = "default_cache_name")]
    pub cache_name: String,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
    /// Base URL assets are fetched from on a cache miss
    pub origin: Option<String>,
    #[serde(default = "default_assets")]
    pub assets: Vec<String>,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cache_name: default_cache_name(),
            cache_dir: default_cache_dir(),
            origin: None,
            assets: default_assets(),
        }
    }
}
