use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use lexilens_core::{CapturePipeline, Renderer};
use lexilens_types::AppEvent;

use crate::state::AppState;

pub mod capture;
pub mod lookup;

use capture::{handle_confirm, handle_recognition_finished};
use lookup::{handle_edit, handle_lookup, handle_lookup_finished};

/// App's main loop. Owns the capture pipeline; slow work is spawned and
/// reports back through `app_tx`.
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_tx: AsyncSender<AppEvent>,
    renderer: Arc<dyn Renderer>,
) -> anyhow::Result<()> {
    let capture = state.config.read().await.capture.clone();
    let mut pipeline = CapturePipeline::new(state.camera.clone(), renderer.clone(), &capture);
    pipeline.start().await;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = ui_to_app_rx.recv().await?;
        tracing::debug!("[EVENT_LOOP] {:?}", event);

        if !handle_events(&state, &mut pipeline, renderer.as_ref(), &app_tx, event) {
            tracing::info!("[EVENT_LOOP] Quit requested");
            return Ok(());
        }
    }
}

/// Returns `false` once the app should stop
fn handle_events(
    state: &Arc<AppState>,
    pipeline: &mut CapturePipeline,
    renderer: &dyn Renderer,
    app_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> bool {
    match event {
        AppEvent::Tap(at) => {
            pipeline.begin_capture(at);
        }
        AppEvent::PointerDown { target, at } => {
            pipeline.pointer_down(target, at);
        }
        AppEvent::PointerMove(at) => {
            pipeline.pointer_move(at);
        }
        AppEvent::PointerUp => {
            pipeline.pointer_up();
        }
        AppEvent::Confirm => handle_confirm(state, pipeline, app_tx),
        AppEvent::Cancel => {
            pipeline.cancel_capture();
        }
        AppEvent::Resize(size) => pipeline.set_display_size(size),
        AppEvent::RecognitionFinished { session, outcome } => {
            handle_recognition_finished(pipeline, session, outcome)
        }
        AppEvent::EditWord(word) => handle_edit(state, pipeline, app_tx, &word),
        AppEvent::Lookup(word) => handle_lookup(state, app_tx, word),
        AppEvent::LookupFinished {
            session,
            word,
            result,
        } => handle_lookup_finished(pipeline, renderer, session, word, result),
        AppEvent::Quit => return false,
    }
    true
}
