//! Simple OCR test - run with: cargo run -p lexilens-ocr --bin test_ocr -- <image> [lang]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lexilens_config::ocr::OcrConfig;
use lexilens_core::RecognitionAdapter;
use lexilens_ocr::TesseractEngine;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "test_ocr", about = "Recognize one image file with tesseract")]
struct Cli {
    /// Image to recognize
    image: PathBuf,

    /// Tesseract language code; defaults to the configured one
    lang: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let mut config = OcrConfig::default();
    if let Some(language) = cli.lang {
        config.language = language;
    }

    tracing::info!("=== OCR Test ===");

    // 1. Engine
    let engine = Arc::new(TesseractEngine::new(&config));
    match engine.version().await {
        Ok(version) => tracing::info!("1. Engine: {}", version),
        Err(e) => tracing::warn!("1. Engine version unknown: {}", e),
    }

    // 2. Load
    let start = Instant::now();
    let image = image::open(&cli.image)
        .with_context(|| format!("failed to open {}", cli.image.display()))?
        .to_rgba8();
    tracing::info!(
        "2. Loaded {}x{} in {:?}",
        image.width(),
        image.height(),
        start.elapsed()
    );

    // 3. Recognize
    tracing::info!("3. Running OCR ({})...", config.language);
    let adapter = RecognitionAdapter::new(engine, &config);
    let start = Instant::now();
    match adapter.recognize(&image, &CancellationToken::new()).await {
        Some(recognition) => {
            tracing::info!(
                "   {:?} - {} chars, confidence {:?}",
                start.elapsed(),
                recognition.text.len(),
                recognition.confidence
            );
            for line in recognition.text.lines().take(5) {
                tracing::info!("   > {}", line);
            }
        }
        None => tracing::warn!("   Recognition failed after {:?}", start.elapsed()),
    }

    tracing::info!("=== Done ===");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_is_optional() {
        let cli = Cli::try_parse_from(["test_ocr", "word.png"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("word.png"));
        assert_eq!(cli.lang, None);

        let cli = Cli::try_parse_from(["test_ocr", "word.png", "deu"]).unwrap();
        assert_eq!(cli.lang.as_deref(), Some("deu"));
    }
}
