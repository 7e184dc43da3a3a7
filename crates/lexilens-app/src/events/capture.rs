use std::sync::Arc;

use kanal::AsyncSender;
use lexilens_core::CapturePipeline;
use lexilens_types::{AppEvent, CaptureOutcome};

use crate::state::AppState;

/// Finalizes the selection and runs recognition plus lookup off the loop
pub fn handle_confirm(
    state: &Arc<AppState>,
    pipeline: &mut CapturePipeline,
    app_tx: &AsyncSender<AppEvent>,
) {
    let Some(job) = pipeline.confirm_capture() else {
        return;
    };

    let state = state.clone();
    let tx = app_tx.clone();
    tokio::spawn(async move {
        let session = job.session;
        let Some(outcome) = job.run(&state.recognizer, &state.dictionary).await else {
            tracing::debug!("[OCR] Session {} cancelled", session);
            return;
        };
        if let Err(e) = tx
            .send(AppEvent::RecognitionFinished { session, outcome })
            .await
        {
            tracing::error!("Failed to send recognition result: {}", e);
        }
    });
}

pub fn handle_recognition_finished(
    pipeline: &mut CapturePipeline,
    session: u64,
    outcome: CaptureOutcome,
) {
    pipeline.complete(session, outcome);
}
