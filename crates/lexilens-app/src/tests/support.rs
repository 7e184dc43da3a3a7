use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use kanal::AsyncReceiver;
use lexilens_config::Config;
use lexilens_core::{
    Camera, DictionaryError, DictionaryShard, OcrEngine, Recognition, RecognitionError,
    ShardSource,
};
use lexilens_ocr::StillImageCamera;
use lexilens_types::UiEvent;
use tokio::time::timeout;

use crate::state::AppState;

pub struct ScriptedEngine {
    pub text: String,
    pub delay: Duration,
}

#[async_trait]
impl OcrEngine for ScriptedEngine {
    async fn recognize(
        &self,
        _image: &RgbaImage,
        _language: &str,
    ) -> Result<Recognition, RecognitionError> {
        tokio::time::sleep(self.delay).await;
        Ok(Recognition {
            text: self.text.clone(),
            confidence: Some(88.0),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub struct MemorySource(pub HashMap<String, String>);

#[async_trait]
impl ShardSource for MemorySource {
    async fn fetch_shard(&self, letter: char) -> Result<DictionaryShard, DictionaryError> {
        Ok(self
            .0
            .iter()
            .filter(|(w, _)| w.starts_with(letter))
            .map(|(w, d)| (w.clone(), d.clone()))
            .collect())
    }
}

pub fn fruit_source() -> Arc<MemorySource> {
    Arc::new(MemorySource(
        [
            ("apple", "A round fruit."),
            ("avocado", "A green fruit."),
        ]
        .into_iter()
        .map(|(w, d)| (w.to_string(), d.to_string()))
        .collect(),
    ))
}

/// 720x1280 frame: exactly twice the default 360x640 display
pub fn frame_camera() -> Arc<dyn Camera> {
    Arc::new(StillImageCamera::from_image(RgbaImage::from_pixel(
        720,
        1280,
        Rgba([255, 255, 255, 255]),
    )))
}

pub fn app_state(camera: Arc<dyn Camera>, text: &str, delay: Duration) -> Arc<AppState> {
    let mut config = Config::new();
    config.ocr.preprocess = false;
    config.capture.auto_detect = false;

    Arc::new(AppState::with_parts(
        config,
        camera,
        Arc::new(ScriptedEngine {
            text: text.to_string(),
            delay,
        }),
        fruit_source(),
        None,
    ))
}

/// Next UI update matching `wanted`, skipping everything before it
pub async fn wait_for<F>(rx: &AsyncReceiver<UiEvent>, mut wanted: F) -> UiEvent
where
    F: FnMut(&UiEvent) -> bool,
{
    timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.expect("ui channel closed");
            if wanted(&event) {
                return event;
            }
        }
    })
    .await
    .expect("expected UI update never arrived")
}
