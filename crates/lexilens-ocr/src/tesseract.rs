use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use image::{ImageFormat, RgbaImage};
use lexilens_config::ocr::OcrConfig;
use lexilens_core::{OcrEngine, Recognition, RecognitionError};
use tempfile::NamedTempFile;
use tokio::process::Command;

/// Drives the `tesseract` executable; one child process per recognition.
///
/// The child is killed if the recognition future is dropped.
pub struct TesseractEngine {
    program: String,
    tessdata_dir: Option<PathBuf>,
    page_seg_mode: u8,
}

impl TesseractEngine {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            program: config.tesseract_path.clone(),
            tessdata_dir: config.tessdata_dir.as_ref().map(PathBuf::from),
            page_seg_mode: config.page_seg_mode,
        }
    }

    /// First line of `tesseract --version`
    pub async fn version(&self) -> Result<String, RecognitionError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        // Older releases print the banner on stderr
        let banner = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8_lossy(&banner)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(
        &self,
        image: &RgbaImage,
        language: &str,
    ) -> Result<Recognition, RecognitionError> {
        let input = write_png(image.clone()).await?;

        let mut command = Command::new(&self.program);
        command.arg(input.path()).arg("stdout");
        if let Some(dir) = &self.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        command
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg(self.page_seg_mode.to_string())
            .arg("tsv")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            "[OCR] Running {} on {}x{} image",
            self.program,
            image.width(),
            image.height()
        );
        let output = command.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Engine(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Encodes `image` into a fresh temp PNG on the blocking pool.
/// The file is removed when the handle drops.
async fn write_png(image: RgbaImage) -> Result<NamedTempFile, RecognitionError> {
    tokio::task::spawn_blocking(move || {
        let file = tempfile::Builder::new()
            .prefix("lexilens-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(file.path(), ImageFormat::Png)?;
        Ok::<_, RecognitionError>(file)
    })
    .await
    .map_err(|e| RecognitionError::Engine(format!("PNG encoder task failed: {e}")))?
}

/// Reassembles text from tesseract's TSV output: words joined by spaces,
/// lines by newlines. Confidence is the mean over recognized words.
pub fn parse_tsv(tsv: &str) -> Result<Recognition, RecognitionError> {
    let mut lines = tsv.lines();
    let header = lines
        .next()
        .ok_or_else(|| RecognitionError::Engine("empty TSV output".to_string()))?;
    let columns: Vec<&str> = header.split('\t').collect();
    let column = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| RecognitionError::Engine(format!("TSV output missing '{name}' column")))
    };
    let (level_col, block_col, par_col, line_col, conf_col, text_col) = (
        column("level")?,
        column("block_num")?,
        column("par_num")?,
        column("line_num")?,
        column("conf")?,
        column("text")?,
    );

    let mut text = String::new();
    let mut current_line: Option<(&str, &str, &str)> = None;
    let mut confidence_sum = 0.0f32;
    let mut word_count = 0u32;

    for row in lines {
        let fields: Vec<&str> = row.split('\t').collect();
        // Word rows only
        if fields.get(level_col) != Some(&"5") {
            continue;
        }
        let word = fields.get(text_col).map(|t| t.trim()).unwrap_or_default();
        if word.is_empty() {
            continue;
        }

        let line = (
            fields.get(block_col).copied().unwrap_or_default(),
            fields.get(par_col).copied().unwrap_or_default(),
            fields.get(line_col).copied().unwrap_or_default(),
        );
        match current_line {
            Some(previous) if previous == line => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        current_line = Some(line);
        text.push_str(word);

        if let Some(conf) = fields
            .get(conf_col)
            .and_then(|c| c.trim().parse::<f32>().ok())
            .filter(|c| *c >= 0.0)
        {
            confidence_sum += conf;
            word_count += 1;
        }
    }

    let confidence = (word_count > 0).then(|| confidence_sum / word_count as f32);
    Ok(Recognition { text, confidence })
}
