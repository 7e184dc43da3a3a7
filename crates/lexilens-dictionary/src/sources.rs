use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use lexilens_core::{DictionaryError, DictionaryShard, ShardSource};

/// Relative location of a letter's shard, shared by every source
pub fn shard_path(letter: char) -> String {
    format!("dict/{letter}.json")
}

/// Decodes one shard file: a flat JSON object of word -> definition
pub fn parse_shard(bytes: &[u8]) -> Result<DictionaryShard, DictionaryError> {
    serde_json::from_slice(bytes).map_err(|e| DictionaryError::Parse(e.to_string()))
}

/// Reads shards from `<root>/dict/<letter>.json`
pub struct DirShardSource {
    root: PathBuf,
}

impl DirShardSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ShardSource for DirShardSource {
    async fn fetch_shard(&self, letter: char) -> Result<DictionaryShard, DictionaryError> {
        let path = self.root.join(shard_path(letter));
        tracing::debug!("[DICT] Reading {}", path.display());

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DictionaryError::Missing(path.display().to_string()),
            _ => DictionaryError::Io(format!("{}: {}", path.display(), e)),
        })?;
        parse_shard(&bytes)
    }
}

/// Fetches shards from `<base_url>/dict/<letter>.json`
#[derive(Clone)]
pub struct HttpShardSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpShardSource {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, letter: char) -> String {
        format!("{}/{}", self.base_url, shard_path(letter))
    }
}

#[async_trait]
impl ShardSource for HttpShardSource {
    async fn fetch_shard(&self, letter: char) -> Result<DictionaryShard, DictionaryError> {
        let url = self.url(letter);
        tracing::debug!("[DICT] GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DictionaryError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DictionaryError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DictionaryError::Network(e.to_string()))?;
        parse_shard(&bytes)
    }
}
