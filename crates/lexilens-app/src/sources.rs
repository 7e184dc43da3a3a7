use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use lexilens_config::Config;
use lexilens_config::dictionary::{DictionaryConfig, DictionarySource};
use lexilens_core::{DictionaryError, DictionaryShard, ShardSource};
use lexilens_dictionary::{DirShardSource, HttpShardSource, parse_shard, shard_path};
use lexilens_io::{AssetCache, AssetError};

/// Serves shards through the offline asset cache
pub struct AssetShardSource {
    cache: Arc<AssetCache>,
}

impl AssetShardSource {
    pub fn new(cache: Arc<AssetCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl ShardSource for AssetShardSource {
    async fn fetch_shard(&self, letter: char) -> Result<DictionaryShard, DictionaryError> {
        let path = shard_path(letter);
        let fetched = self.cache.get(&path).await;
        let bytes = fetched.map_err(|e| match e {
            AssetError::Status { status, .. } => DictionaryError::Status(status),
            AssetError::Http(e) => DictionaryError::Network(e.to_string()),
            AssetError::Io(e) => DictionaryError::Io(e.to_string()),
            AssetError::NoOrigin(_) | AssetError::InvalidPath(_) => DictionaryError::Missing(path),
        })?;
        parse_shard(&bytes)
    }
}

pub fn offline_cache(config: &Config) -> Option<AssetCache> {
    let offline = &config.offline;
    offline.enabled.then(|| {
        AssetCache::new(
            &offline.cache_dir,
            &offline.cache_name,
            offline.origin.clone(),
        )
    })
}

pub fn shard_source(
    config: &DictionaryConfig,
    assets: Option<Arc<AssetCache>>,
) -> anyhow::Result<Arc<dyn ShardSource>> {
    let source: Arc<dyn ShardSource> = match config.source {
        DictionarySource::Directory => {
            tracing::info!("Dictionary shards from {}/dict", config.root);
            Arc::new(DirShardSource::new(&config.root))
        }
        DictionarySource::Http => {
            let base_url = config
                .base_url
                .clone()
                .context("dictionary.base_url is required for the http source")?;
            tracing::info!("Dictionary shards from {}", base_url);
            Arc::new(HttpShardSource::new(base_url))
        }
        DictionarySource::Offline => {
            let cache = assets.context("dictionary.source = offline requires offline.enabled")?;
            tracing::info!("Dictionary shards through offline cache {}", cache.name());
            Arc::new(AssetShardSource::new(cache))
        }
    };
    Ok(source)
}

/// Installs the app shell into the current generation and drops older ones.
/// Failures only cost offline availability.
pub async fn prepare_offline(cache: &AssetCache, assets: &[String]) {
    match cache.install(assets).await {
        Ok(count) => tracing::info!("[CACHE] {} assets cached in {}", count, cache.name()),
        Err(e) => tracing::warn!("[CACHE] Install failed: {}", e),
    }
    match cache.activate().await {
        Ok(purged) if !purged.is_empty() => {
            tracing::info!("[CACHE] Removed old generations: {:?}", purged)
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("[CACHE] Activation failed: {}", e),
    }
}
