//! Drives the event loop through its channels the way the stdin watcher does

use std::time::Duration;

use lexilens_ocr::StillImageCamera;
use lexilens_types::{AppEvent, Corner, DragTarget, LookupResult, Point, UiEvent, ViewportRect};
use tokio::time::timeout;

use super::support::{app_state, frame_camera, wait_for};
use crate::controller::AppController;

#[tokio::test]
async fn test_capture_cycle_shows_definition() {
    let controller = AppController::new(app_state(frame_camera(), " apple\n", Duration::ZERO));
    let _tasks = controller.spawn_event_loop();
    let (events, ui) = (controller.events(), controller.ui_events());

    wait_for(&ui, |e| *e == UiEvent::ShowLive).await;

    events.send(AppEvent::Tap(Point::new(180.0, 320.0))).await.unwrap();
    assert_eq!(
        wait_for(&ui, |e| matches!(e, UiEvent::ShowStill { .. })).await,
        UiEvent::ShowStill {
            width: 720,
            height: 1280
        }
    );
    assert_eq!(
        wait_for(&ui, |e| matches!(e, UiEvent::ShowSelection(_))).await,
        UiEvent::ShowSelection(ViewportRect::new(105.0, 280.0, 150.0, 80.0))
    );

    events.send(AppEvent::Confirm).await.unwrap();
    wait_for(&ui, |e| *e == UiEvent::ShowBusy).await;

    let UiEvent::ShowResult(outcome) =
        wait_for(&ui, |e| matches!(e, UiEvent::ShowResult(_))).await
    else {
        unreachable!()
    };
    assert_eq!(outcome.recognized, "apple");
    assert_eq!(outcome.confidence, Some(88.0));
    assert_eq!(outcome.lookup, LookupResult::Definition("A round fruit.".to_string()));
}

#[tokio::test]
async fn test_drag_captures_and_releases_pointer() {
    let controller = AppController::new(app_state(frame_camera(), "apple", Duration::ZERO));
    let _tasks = controller.spawn_event_loop();
    let (events, ui) = (controller.events(), controller.ui_events());

    events.send(AppEvent::Tap(Point::new(180.0, 320.0))).await.unwrap();
    events
        .send(AppEvent::PointerDown {
            target: DragTarget::Handle(Corner::BottomRight),
            at: Point::new(255.0, 360.0),
        })
        .await
        .unwrap();
    wait_for(&ui, |e| *e == UiEvent::PointerCaptured(true)).await;

    events.send(AppEvent::PointerMove(Point::new(275.0, 370.0))).await.unwrap();
    assert_eq!(
        wait_for(&ui, |e| matches!(e, UiEvent::ShowSelection(r) if r.width > 150.0)).await,
        UiEvent::ShowSelection(ViewportRect::new(105.0, 280.0, 170.0, 90.0))
    );

    events.send(AppEvent::PointerUp).await.unwrap();
    wait_for(&ui, |e| *e == UiEvent::PointerCaptured(false)).await;
}

#[tokio::test]
async fn test_edit_replaces_result() {
    let controller = AppController::new(app_state(frame_camera(), "appel", Duration::ZERO));
    let _tasks = controller.spawn_event_loop();
    let (events, ui) = (controller.events(), controller.ui_events());

    events.send(AppEvent::Tap(Point::new(180.0, 320.0))).await.unwrap();
    events.send(AppEvent::Confirm).await.unwrap();
    let first = wait_for(&ui, |e| matches!(e, UiEvent::ShowResult(_))).await;
    assert!(matches!(first, UiEvent::ShowResult(o) if o.lookup == LookupResult::NotFound));

    events.send(AppEvent::EditWord("Avocado".to_string())).await.unwrap();
    let UiEvent::ShowResult(revised) =
        wait_for(&ui, |e| matches!(e, UiEvent::ShowResult(_))).await
    else {
        unreachable!()
    };
    assert_eq!(revised.recognized, "avocado");
    assert_eq!(revised.lookup, LookupResult::Definition("A green fruit.".to_string()));
}

#[tokio::test]
async fn test_cancel_while_recognizing_discards_result() {
    let controller = AppController::new(app_state(frame_camera(), "apple", Duration::from_secs(30)));
    let _tasks = controller.spawn_event_loop();
    let (events, ui) = (controller.events(), controller.ui_events());

    events.send(AppEvent::Tap(Point::new(180.0, 320.0))).await.unwrap();
    events.send(AppEvent::Confirm).await.unwrap();
    wait_for(&ui, |e| *e == UiEvent::ShowBusy).await;

    events.send(AppEvent::Cancel).await.unwrap();
    wait_for(&ui, |e| *e == UiEvent::ShowLive).await;

    // Live again: a fresh tap is accepted
    events.send(AppEvent::Tap(Point::new(100.0, 100.0))).await.unwrap();
    wait_for(&ui, |e| matches!(e, UiEvent::ShowStill { .. })).await;
}

#[tokio::test]
async fn test_missing_camera_still_allows_lookup() {
    let controller = AppController::new(app_state(
        std::sync::Arc::new(StillImageCamera::empty()),
        "apple",
        Duration::ZERO,
    ));
    let _tasks = controller.spawn_event_loop();
    let (events, ui) = (controller.events(), controller.ui_events());

    wait_for(&ui, |e| *e == UiEvent::Message("Could not access camera.".to_string())).await;

    events.send(AppEvent::Tap(Point::new(180.0, 320.0))).await.unwrap();
    events.send(AppEvent::Lookup("  Apple!".to_string())).await.unwrap();

    // The tap is ignored, so the lookup is the next thing drawn
    let next = timeout(Duration::from_secs(2), ui.recv()).await.unwrap().unwrap();
    assert_eq!(
        next,
        UiEvent::ShowLookup {
            word: "apple".to_string(),
            result: LookupResult::Definition("A round fruit.".to_string()),
        }
    );
}

#[tokio::test]
async fn test_quit_stops_event_loop() {
    let controller = AppController::new(app_state(frame_camera(), "apple", Duration::ZERO));
    let mut tasks = controller.spawn_event_loop();

    controller.events().send(AppEvent::Quit).await.unwrap();
    let finished = timeout(Duration::from_secs(2), tasks.join_next())
        .await
        .expect("event loop should stop");
    assert!(matches!(finished, Some(Ok(Ok(())))));
}
