//! Word lookup backed by per-first-letter shards that are fetched on first
//! use and then kept for the whole session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use lexilens_types::LookupResult;

use crate::error::DictionaryError;
use crate::preprocess::normalize_word;

/// Lowercase word -> definition, for every word starting with one letter
pub type DictionaryShard = HashMap<String, String>;

/// Where shards come from: disk, network, an offline cache
#[async_trait]
pub trait ShardSource: Send + Sync {
    async fn fetch_shard(&self, letter: char) -> Result<DictionaryShard, DictionaryError>;
}

type ShardFuture = Shared<BoxFuture<'static, Result<Arc<DictionaryShard>, DictionaryError>>>;

struct InFlight {
    id: u64,
    future: ShardFuture,
}

#[derive(Default)]
struct CacheInner {
    loaded: HashMap<char, Arc<DictionaryShard>>,
    in_flight: HashMap<char, InFlight>,
    next_id: u64,
}

/// Process-wide shard cache.
///
/// Concurrent lookups for the same uncached letter share one fetch. A failed
/// fetch is forgotten so the next lookup tries again.
pub struct DictionaryCache {
    source: Arc<dyn ShardSource>,
    timeout: Duration,
    inner: Mutex<CacheInner>,
}

impl DictionaryCache {
    pub fn new(source: Arc<dyn ShardSource>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    pub async fn lookup(&self, raw_word: &str) -> LookupResult {
        let Some(word) = normalize_word(raw_word) else {
            tracing::debug!("[DICT] '{}' has no letters, skipping", raw_word.trim());
            return LookupResult::NotFound;
        };
        let Some(letter) = word.chars().next().filter(char::is_ascii_lowercase) else {
            return LookupResult::NotFound;
        };

        match self.shard(letter).await {
            Ok(shard) => match shard.get(&word) {
                Some(definition) => LookupResult::Definition(definition.clone()),
                None => {
                    tracing::debug!("[DICT] '{}' not in shard '{}'", word, letter);
                    LookupResult::NotFound
                }
            },
            Err(e) => {
                tracing::warn!("[DICT] Failed to load shard '{}': {}", letter, e);
                LookupResult::LoadError(e.to_string())
            }
        }
    }

    /// Letters whose shards are resident
    pub fn cached_letters(&self) -> Vec<char> {
        let inner = self.lock();
        let mut letters: Vec<char> = inner.loaded.keys().copied().collect();
        letters.sort_unstable();
        letters
    }

    async fn shard(&self, letter: char) -> Result<Arc<DictionaryShard>, DictionaryError> {
        let (id, future) = {
            let mut inner = self.lock();
            if let Some(shard) = inner.loaded.get(&letter) {
                return Ok(shard.clone());
            }

            match inner.in_flight.get(&letter) {
                Some(pending) => {
                    tracing::debug!("[DICT] Joining in-flight fetch of shard '{}'", letter);
                    (pending.id, pending.future.clone())
                }
                None => {
                    let id = inner.next_id;
                    inner.next_id += 1;
                    let future = self.fetch(letter);
                    inner.in_flight.insert(
                        letter,
                        InFlight {
                            id,
                            future: future.clone(),
                        },
                    );
                    (id, future)
                }
            }
        };

        let result = future.await;

        let mut inner = self.lock();
        if inner.in_flight.get(&letter).is_some_and(|p| p.id == id) {
            inner.in_flight.remove(&letter);
        }
        if let Ok(shard) = &result {
            inner.loaded.entry(letter).or_insert_with(|| shard.clone());
        }
        result
    }

    fn fetch(&self, letter: char) -> ShardFuture {
        let source = self.source.clone();
        let timeout = self.timeout;
        async move {
            tracing::info!("[DICT] Fetching shard '{}'", letter);
            match tokio::time::timeout(timeout, source.fetch_shard(letter)).await {
                Ok(Ok(shard)) => {
                    tracing::info!("[DICT] Shard '{}' loaded: {} words", letter, shard.len());
                    Ok(Arc::new(shard))
                }
                Ok(Err(e)) => Err(e),
                Err(_) => Err(DictionaryError::Timeout(letter)),
            }
        }
        .boxed()
        .shared()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheInner> {
        // Never held across an await, so a poisoned lock still has consistent data
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
