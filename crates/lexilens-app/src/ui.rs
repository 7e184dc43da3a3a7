use std::io::Write;
use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexilens_config::Config;
use lexilens_core::{Renderer, SourceImage};
use lexilens_types::{CaptureOutcome, LookupResult, UiEvent, ViewportRect};
use tokio::sync::RwLock;

/// Forwards every draw request to the UI task
pub struct ChannelRenderer {
    tx: AsyncSender<UiEvent>,
}

impl ChannelRenderer {
    pub fn new(tx: AsyncSender<UiEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: UiEvent) {
        match self.tx.try_send(event) {
            Ok(true) => {}
            Ok(false) => tracing::warn!("UI channel full, dropping update"),
            Err(e) => tracing::debug!("UI channel closed: {}", e),
        }
    }
}

impl Renderer for ChannelRenderer {
    fn show_live(&self) {
        self.send(UiEvent::ShowLive);
    }

    fn show_still(&self, frame: &SourceImage) {
        self.send(UiEvent::ShowStill {
            width: frame.width(),
            height: frame.height(),
        });
    }

    fn show_selection(&self, rect: ViewportRect) {
        self.send(UiEvent::ShowSelection(rect));
    }

    fn hide_selection(&self) {
        self.send(UiEvent::HideSelection);
    }

    fn capture_pointer(&self) {
        self.send(UiEvent::PointerCaptured(true));
    }

    fn release_pointer(&self) {
        self.send(UiEvent::PointerCaptured(false));
    }

    fn show_busy(&self) {
        self.send(UiEvent::ShowBusy);
    }

    fn show_result(&self, outcome: &CaptureOutcome) {
        self.send(UiEvent::ShowResult(outcome.clone()));
    }

    fn show_lookup(&self, word: &str, result: &LookupResult) {
        self.send(UiEvent::ShowLookup {
            word: word.to_string(),
            result: result.clone(),
        });
    }

    fn show_message(&self, message: &str) {
        self.send(UiEvent::Message(message.to_string()));
    }
}

fn definition_text(result: &LookupResult) -> String {
    match result {
        LookupResult::Definition(definition) => definition.clone(),
        LookupResult::NotFound => "Definition not found.".to_string(),
        LookupResult::LoadError(e) => format!("Could not load dictionary ({e})"),
    }
}

/// One terminal line per UI update
pub fn describe(event: &UiEvent) -> String {
    match event {
        UiEvent::ShowLive => "[live] Tap a word to capture it".to_string(),
        UiEvent::ShowStill { width, height } => format!("[still] Frame frozen ({width}x{height})"),
        UiEvent::ShowSelection(r) => format!(
            "[box] x={:.1} y={:.1} w={:.1} h={:.1}",
            r.x, r.y, r.width, r.height
        ),
        UiEvent::HideSelection => "[box] hidden".to_string(),
        UiEvent::PointerCaptured(true) => "[pointer] captured".to_string(),
        UiEvent::PointerCaptured(false) => "[pointer] released".to_string(),
        UiEvent::ShowBusy => "[busy] Recognizing...".to_string(),
        UiEvent::ShowResult(outcome) => {
            let word = if outcome.recognized.is_empty() {
                "(nothing recognized)"
            } else {
                outcome.recognized.as_str()
            };
            let confidence = outcome
                .confidence
                .map(|c| format!(" ({c:.0}%)"))
                .unwrap_or_default();
            format!(
                "[result] {word}{confidence}: {}",
                definition_text(&outcome.lookup)
            )
        }
        UiEvent::ShowLookup { word, result } => {
            format!("[lookup] {word}: {}", definition_text(result))
        }
        UiEvent::Message(message) => format!("[message] {message}"),
    }
}

/// Prints UI updates until the app side hangs up
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<UiEvent>,
    config: Arc<RwLock<Config>>,
) -> anyhow::Result<()> {
    let json = config.read().await.log_json;

    while let Ok(event) = app_to_ui_rx.recv().await {
        let line = if json {
            serde_json::to_string(&event)?
        } else {
            describe(&event)
        };
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")?;
        stdout.flush()?;
    }

    tracing::debug!("UI channel closed");
    Ok(())
}
