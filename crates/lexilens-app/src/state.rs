use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lexilens_config::Config;
use lexilens_core::{Camera, DictionaryCache, OcrEngine, RecognitionAdapter, ShardSource};
use lexilens_io::AssetCache;
use lexilens_ocr::{StillImageCamera, TesseractEngine};
use tokio::sync::RwLock;

use crate::sources::{offline_cache, shard_source};

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub camera: Arc<dyn Camera>,
    pub recognizer: Arc<RecognitionAdapter>,
    pub dictionary: Arc<DictionaryCache>,
    pub assets: Option<Arc<AssetCache>>,
}

impl AppState {
    /// Wires the tesseract engine, the configured shard source and a still
    /// image camera (or none, which leaves the app in the static view).
    pub fn new(config: Config, image: Option<PathBuf>) -> anyhow::Result<Self> {
        let camera: Arc<dyn Camera> = match image {
            Some(path) => Arc::new(StillImageCamera::from_path(path)),
            None => {
                tracing::warn!("No image source given, camera unavailable");
                Arc::new(StillImageCamera::empty())
            }
        };
        let engine = Arc::new(TesseractEngine::new(&config.ocr));
        let assets = offline_cache(&config).map(Arc::new);
        let source = shard_source(&config.dictionary, assets.clone())?;

        Ok(Self::with_parts(config, camera, engine, source, assets))
    }

    pub fn with_parts(
        config: Config,
        camera: Arc<dyn Camera>,
        engine: Arc<dyn OcrEngine>,
        source: Arc<dyn ShardSource>,
        assets: Option<Arc<AssetCache>>,
    ) -> Self {
        let recognizer = Arc::new(RecognitionAdapter::new(engine, &config.ocr));
        let dictionary = Arc::new(DictionaryCache::new(
            source,
            Duration::from_secs(config.timeout_seconds.max(1)),
        ));

        Self {
            config: Arc::new(RwLock::new(config)),
            camera,
            recognizer,
            dictionary,
            assets,
        }
    }
}
