//! Versioned on-disk cache for the app shell and dictionary shards.
//!
//! Each generation lives in `<cache_dir>/<cache_name>/`. Activating a
//! generation deletes every sibling directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("'{0}' is not cached and no origin is configured")]
    NoOrigin(String),

    #[error("Invalid asset path: {0}")]
    InvalidPath(String),
}

pub struct AssetCache {
    cache_dir: PathBuf,
    name: String,
    origin: Option<String>,
    client: reqwest::Client,
}

impl AssetCache {
    pub fn new(cache_dir: impl Into<PathBuf>, name: &str, origin: Option<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            name: name.to_string(),
            origin: origin.map(|o| o.trim_end_matches('/').to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generation_dir(&self) -> PathBuf {
        self.cache_dir.join(&self.name)
    }

    /// Fetches every asset and stores them in this generation.
    ///
    /// Nothing is written unless all fetches succeed.
    pub async fn install(&self, assets: &[String]) -> Result<usize, AssetError> {
        tracing::info!("[CACHE] Installing {} assets into {}", assets.len(), self.name);

        let mut fetched = Vec::with_capacity(assets.len());
        for asset in assets {
            let path = self.local_path(asset)?;
            let body = self.fetch(asset).await?;
            fetched.push((path, body));
        }

        for (path, body) in &fetched {
            store(path, body).await?;
        }
        Ok(fetched.len())
    }

    /// Deletes every generation other than this one, returning their names
    pub async fn activate(&self) -> Result<Vec<String>, AssetError> {
        let mut purged = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(purged),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == self.name || !entry.file_type().await?.is_dir() {
                continue;
            }
            tracing::info!("[CACHE] Clearing old cache {}", name);
            tokio::fs::remove_dir_all(entry.path()).await?;
            purged.push(name);
        }

        purged.sort();
        Ok(purged)
    }

    /// Cache-first read; a miss goes to the origin and the response is kept
    pub async fn get(&self, asset: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.local_path(asset)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!("[CACHE] Hit {}", asset);
                return Ok(bytes);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!("[CACHE] Miss {}, fetching", asset);
        let body = self.fetch(asset).await?;
        store(&path, &body).await?;
        Ok(body)
    }

    pub async fn contains(&self, asset: &str) -> bool {
        match self.local_path(asset) {
            Ok(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    async fn fetch(&self, asset: &str) -> Result<Vec<u8>, AssetError> {
        let origin = self
            .origin
            .as_ref()
            .ok_or_else(|| AssetError::NoOrigin(asset.to_string()))?;
        let url = format!("{}/{}", origin, asset.trim_start_matches('/'));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AssetError::Status {
                url,
                status: response.status().as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Maps an asset path to its file; "/" is the shell's index page
    fn local_path(&self, asset: &str) -> Result<PathBuf, AssetError> {
        let relative = match asset.trim_start_matches('/') {
            "" => "index.html",
            other => other,
        };
        let safe = Path::new(relative)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(AssetError::InvalidPath(asset.to_string()));
        }
        Ok(self.generation_dir().join(relative))
    }
}

async fn store(path: &Path, body: &[u8]) -> Result<(), AssetError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, body).await?;
    Ok(())
}
