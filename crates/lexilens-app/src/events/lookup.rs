use std::sync::Arc;

use kanal::AsyncSender;
use lexilens_core::{CapturePipeline, Renderer, lookup_typed};
use lexilens_types::{AppEvent, LookupResult};

use crate::state::AppState;

/// Looks up a corrected word for the result on screen
pub fn handle_edit(
    state: &Arc<AppState>,
    pipeline: &CapturePipeline,
    app_tx: &AsyncSender<AppEvent>,
    word: &str,
) {
    let Some((session, word)) = pipeline.edit_result(word) else {
        tracing::debug!("Edit ignored in {:?}", pipeline.phase());
        return;
    };
    spawn_lookup(state, app_tx, Some(session), word);
}

/// Direct lookup, independent of the capture cycle
pub fn handle_lookup(state: &Arc<AppState>, app_tx: &AsyncSender<AppEvent>, word: String) {
    spawn_lookup(state, app_tx, None, word);
}

pub fn handle_lookup_finished(
    pipeline: &mut CapturePipeline,
    renderer: &dyn Renderer,
    session: Option<u64>,
    word: String,
    result: LookupResult,
) {
    match session {
        Some(session) => {
            if !pipeline.revise_result(session, word, result) {
                tracing::debug!("Dropping lookup for stale result {}", session);
            }
        }
        None => renderer.show_lookup(&word, &result),
    }
}

fn spawn_lookup(
    state: &Arc<AppState>,
    app_tx: &AsyncSender<AppEvent>,
    session: Option<u64>,
    word: String,
) {
    let dictionary = state.dictionary.clone();
    let tx = app_tx.clone();
    tokio::spawn(async move {
        let found = lookup_typed(&dictionary, &word).await;
        let (word, result) = found.unwrap_or((word, LookupResult::NotFound));
        if let Err(e) = tx
            .send(AppEvent::LookupFinished {
                session,
                word,
                result,
            })
            .await
        {
            tracing::error!("Failed to send lookup result: {}", e);
        }
    });
}
