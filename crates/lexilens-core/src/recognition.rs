use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use image::RgbaImage;
use lexilens_config::ocr::OcrConfig;
use tokio_util::sync::CancellationToken;

use crate::error::RecognitionError;
use crate::preprocess::binarize;

/// Normalized OCR result
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub text: String,
    /// 0-100; `None` means the backend did not say
    pub confidence: Option<f32>,
}

/// Third-party OCR backend
#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(
        &self,
        image: &RgbaImage,
        language: &str,
    ) -> Result<Recognition, RecognitionError>;

    fn name(&self) -> &str;
}

/// Wraps an [`OcrEngine`] so that nothing engine-specific leaks out:
/// every failure becomes `None`.
pub struct RecognitionAdapter {
    engine: Arc<dyn OcrEngine>,
    language: String,
    threshold: Option<u8>,
    timeout: Duration,
}

impl RecognitionAdapter {
    pub fn new(engine: Arc<dyn OcrEngine>, config: &OcrConfig) -> Self {
        Self {
            engine,
            language: config.language.clone(),
            threshold: config.preprocess.then_some(config.threshold),
            timeout: Duration::from_secs(config.timeout_seconds.max(1)),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Runs OCR on `image`. Cancelling the token drops the engine call.
    pub async fn recognize(
        &self,
        image: &RgbaImage,
        cancel: &CancellationToken,
    ) -> Option<Recognition> {
        let binarized;
        let input = match self.threshold {
            Some(threshold) => {
                binarized = binarize(image, threshold);
                &binarized
            }
            None => image,
        };

        let started = Instant::now();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("[OCR] Cancelled after {:?}", started.elapsed());
                return None;
            }
            result = self.attempt(input) => result,
        };

        match result {
            Ok(recognition) => {
                let text = recognition.text.trim().to_string();
                let confidence = recognition
                    .confidence
                    .filter(|c| c.is_finite() && *c >= 0.0)
                    .map(|c| c.min(100.0));
                tracing::debug!(
                    "[OCR] {} returned {:?} (confidence {:?}) in {:?}",
                    self.engine.name(),
                    text,
                    confidence,
                    started.elapsed()
                );
                Some(Recognition { text, confidence })
            }
            Err(e) => {
                tracing::warn!(
                    "[OCR] {} failed after {:?}: {}",
                    self.engine.name(),
                    started.elapsed(),
                    e
                );
                None
            }
        }
    }

    /// One engine call bounded by the configured timeout
    async fn attempt(&self, input: &RgbaImage) -> Result<Recognition, RecognitionError> {
        tokio::time::timeout(self.timeout, self.engine.recognize(input, &self.language))
            .await
            .unwrap_or(Err(RecognitionError::Timeout))
    }
}
