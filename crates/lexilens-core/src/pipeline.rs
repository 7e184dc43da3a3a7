//! One capture-to-result cycle: freeze the frame, frame the word, recognize,
//! look it up, show the result, go back to the live view.

use std::sync::Arc;

use image::RgbaImage;
use lexilens_config::capture::CaptureConfig;
use lexilens_types::{CaptureOutcome, DisplaySize, DragTarget, LookupResult, Point, ViewportRect};
use tokio_util::sync::CancellationToken;

use crate::camera::{Camera, SourceImage};
use crate::crop::CropBox;
use crate::dictionary::DictionaryCache;
use crate::geometry::{SourceRect, compute_mapping};
use crate::preprocess::{normalize_word, word_bounds};
use crate::recognition::RecognitionAdapter;
use crate::renderer::Renderer;

pub enum PipelineState {
    /// Camera streaming, waiting for a capture gesture
    Live,
    /// Frame frozen, crop box on screen
    Framing { frame: SourceImage, crop: CropBox },
    /// OCR and lookup in flight; pointer input ignored
    Recognizing {
        session: u64,
        cancel: CancellationToken,
    },
    Result {
        session: u64,
        outcome: CaptureOutcome,
    },
    /// Camera could not be started; only the static view is shown
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Live,
    Framing,
    Recognizing,
    Result,
    Unavailable,
}

impl PipelineState {
    pub fn phase(&self) -> Phase {
        match self {
            PipelineState::Live => Phase::Live,
            PipelineState::Framing { .. } => Phase::Framing,
            PipelineState::Recognizing { .. } => Phase::Recognizing,
            PipelineState::Result { .. } => Phase::Result,
            PipelineState::Unavailable => Phase::Unavailable,
        }
    }
}

/// Region handed off for recognition once a selection is confirmed
pub struct RecognitionJob {
    pub session: u64,
    pub region: RgbaImage,
    pub cancel: CancellationToken,
}

impl RecognitionJob {
    /// Recognizes the region and looks the text up. `None` if the capture
    /// was cancelled meanwhile.
    pub async fn run(
        self,
        recognizer: &RecognitionAdapter,
        dictionary: &DictionaryCache,
    ) -> Option<CaptureOutcome> {
        let recognition = recognizer.recognize(&self.region, &self.cancel).await;
        if self.cancel.is_cancelled() {
            return None;
        }

        let (recognized, confidence) = match recognition {
            Some(r) => (r.text, r.confidence),
            None => (String::new(), None),
        };

        let lookup = if recognized.is_empty() {
            LookupResult::NotFound
        } else {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return None,
                result = dictionary.lookup(&recognized) => result,
            }
        };

        Some(CaptureOutcome {
            recognized,
            confidence,
            lookup,
        })
    }
}

pub struct CapturePipeline {
    camera: Arc<dyn Camera>,
    renderer: Arc<dyn Renderer>,
    options: CaptureConfig,
    display: DisplaySize,
    state: PipelineState,
    next_session: u64,
}

impl CapturePipeline {
    pub fn new(camera: Arc<dyn Camera>, renderer: Arc<dyn Renderer>, options: &CaptureConfig) -> Self {
        Self {
            camera,
            renderer,
            display: DisplaySize::new(options.display_width, options.display_height),
            options: options.clone(),
            state: PipelineState::Live,
            next_session: 1,
        }
    }

    /// Requests the camera stream. On failure the pipeline stays in the
    /// static view for good.
    pub async fn start(&mut self) -> bool {
        match self.camera.start().await {
            Ok(()) => {
                tracing::info!("[CAPTURE] Camera streaming");
                self.state = PipelineState::Live;
                self.renderer.show_live();
                true
            }
            Err(e) => {
                tracing::error!("[CAPTURE] Error accessing camera: {}", e);
                self.state = PipelineState::Unavailable;
                self.renderer.show_message("Could not access camera.");
                false
            }
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn display(&self) -> DisplaySize {
        self.display
    }

    pub fn set_display_size(&mut self, size: DisplaySize) {
        tracing::debug!("[CAPTURE] Display resized to {}x{}", size.width, size.height);
        self.display = size;
    }

    /// Current crop rectangle while framing
    pub fn selection(&self) -> Option<ViewportRect> {
        match &self.state {
            PipelineState::Framing { crop, .. } => Some(crop.rect()),
            _ => None,
        }
    }

    /// Freezes the frame and puts a crop box around `tap`. Ignored unless live.
    pub fn begin_capture(&mut self, tap: Point) -> bool {
        if !matches!(self.state, PipelineState::Live) {
            tracing::debug!("[CAPTURE] Tap ignored in {:?}", self.phase());
            return false;
        }

        let frame = match self.camera.freeze() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!("[CAPTURE] Could not freeze frame: {}", e);
                self.renderer.show_message(&format!("Capture failed: {e}"));
                return false;
            }
        };

        let rect = self.initial_box(&frame, tap);
        tracing::debug!(
            "[CAPTURE] Framing {}x{} still, box {:?}",
            frame.width(),
            frame.height(),
            rect
        );

        self.renderer.show_still(&frame);
        self.renderer.show_selection(rect);
        self.state = PipelineState::Framing {
            frame,
            crop: CropBox::new(rect),
        };
        true
    }

    pub fn pointer_down(&mut self, target: DragTarget, at: Point) -> bool {
        let PipelineState::Framing { crop, .. } = &mut self.state else {
            return false;
        };
        if !crop.begin_drag(target, at) {
            return false;
        }
        self.renderer.capture_pointer();
        true
    }

    pub fn pointer_move(&mut self, at: Point) -> Option<ViewportRect> {
        let PipelineState::Framing { crop, .. } = &mut self.state else {
            return None;
        };
        let rect = crop.drag_to(at)?;
        self.renderer.show_selection(rect);
        Some(rect)
    }

    pub fn pointer_up(&mut self) -> bool {
        let PipelineState::Framing { crop, .. } = &mut self.state else {
            return false;
        };
        if !crop.end_drag() {
            return false;
        }
        self.renderer.release_pointer();
        true
    }

    /// Finalizes the selection. Returns the job to run, or `None` when the
    /// selection was empty (treated as cancel) or the pipeline was not framing.
    pub fn confirm_capture(&mut self) -> Option<RecognitionJob> {
        let (frame, crop) = match std::mem::replace(&mut self.state, PipelineState::Live) {
            PipelineState::Framing { frame, crop } => (frame, crop),
            other => {
                tracing::debug!("[CAPTURE] Confirm ignored in {:?}", other.phase());
                self.state = other;
                return None;
            }
        };

        if crop.is_dragging() {
            self.renderer.release_pointer();
        }
        self.renderer.hide_selection();

        let Some(region) = self.extract(&frame, crop.rect()) else {
            tracing::info!("[CAPTURE] Empty selection, returning to live view");
            self.go_live();
            return None;
        };

        let session = self.next_session;
        self.next_session += 1;
        let cancel = CancellationToken::new();

        tracing::info!(
            "[CAPTURE] Session {} recognizing {}x{} region",
            session,
            region.width(),
            region.height()
        );
        self.renderer.show_busy();
        self.state = PipelineState::Recognizing {
            session,
            cancel: cancel.clone(),
        };

        Some(RecognitionJob {
            session,
            region,
            cancel,
        })
    }

    /// Accepts the outcome of `session`; stale sessions are discarded
    pub fn complete(&mut self, session: u64, outcome: CaptureOutcome) -> bool {
        match &self.state {
            PipelineState::Recognizing { session: current, .. } if *current == session => {
                tracing::info!(
                    "[CAPTURE] Session {} finished: '{}' -> {:?}",
                    session,
                    outcome.recognized,
                    outcome.lookup
                );
                self.renderer.show_result(&outcome);
                self.state = PipelineState::Result { session, outcome };
                true
            }
            _ => {
                tracing::debug!("[CAPTURE] Discarding result of stale session {}", session);
                false
            }
        }
    }

    /// Back to live from framing, recognizing or result
    pub fn cancel_capture(&mut self) -> bool {
        match &self.state {
            PipelineState::Live | PipelineState::Unavailable => return false,
            PipelineState::Framing { crop, .. } => {
                if crop.is_dragging() {
                    self.renderer.release_pointer();
                }
                self.renderer.hide_selection();
            }
            PipelineState::Recognizing { session, cancel } => {
                tracing::info!("[CAPTURE] Cancelling session {}", session);
                cancel.cancel();
            }
            PipelineState::Result { .. } => {}
        }
        self.go_live();
        true
    }

    /// Validates a corrected word typed into the result field; returns the
    /// session and word to look up.
    pub fn edit_result(&self, word: &str) -> Option<(u64, String)> {
        let PipelineState::Result { session, .. } = &self.state else {
            return None;
        };
        let word = word.trim();
        if word.is_empty() {
            return None;
        }
        Some((*session, word.to_string()))
    }

    /// Replaces the shown word and definition after an edit
    pub fn revise_result(&mut self, session: u64, word: String, lookup: LookupResult) -> bool {
        let PipelineState::Result {
            session: current,
            outcome,
        } = &mut self.state
        else {
            return false;
        };
        if *current != session {
            return false;
        }

        outcome.recognized = word;
        outcome.confidence = None;
        outcome.lookup = lookup;
        self.renderer.show_result(outcome);
        true
    }

    /// Confirm, recognize, look up and complete in one go
    pub async fn run_capture(
        &mut self,
        recognizer: &RecognitionAdapter,
        dictionary: &DictionaryCache,
    ) -> Option<CaptureOutcome> {
        let job = self.confirm_capture()?;
        let session = job.session;
        let outcome = job.run(recognizer, dictionary).await?;
        self.complete(session, outcome.clone()).then_some(outcome)
    }

    fn go_live(&mut self) {
        self.state = PipelineState::Live;
        self.camera.resume();
        self.renderer.show_live();
    }

    fn extract(&self, frame: &SourceImage, selection: ViewportRect) -> Option<RgbaImage> {
        let clamped = selection.clamp_to(&self.display.bounds());
        let mapping = match compute_mapping(frame.width(), frame.height(), self.display) {
            Ok(mapping) => mapping,
            Err(e) => {
                tracing::warn!("[CAPTURE] {}", e);
                return None;
            }
        };

        let pixels = mapping
            .to_source(&clamped)
            .clamp_to(frame.width(), frame.height())
            .to_pixels()?;
        Some(frame.crop(pixels))
    }

    fn initial_box(&self, frame: &SourceImage, tap: Point) -> ViewportRect {
        let default = ViewportRect::centered_on(tap, self.options.box_width, self.options.box_height);
        if !self.options.auto_detect {
            return default;
        }

        let Ok(mapping) = compute_mapping(frame.width(), frame.height(), self.display) else {
            return default;
        };
        let at = mapping.to_source_point(tap);
        if at.x < 0.0 || at.y < 0.0 {
            return default;
        }

        match word_bounds(
            frame.pixels(),
            at.x as u32,
            at.y as u32,
            self.options.detect_threshold,
            self.options.detect_gap,
        ) {
            Some(bounds) => {
                let pad = self.options.detect_gap as f64;
                let padded = SourceRect {
                    x: bounds.x as f64 - pad,
                    y: bounds.y as f64 - pad,
                    width: bounds.width as f64 + 2.0 * pad,
                    height: bounds.height as f64 + 2.0 * pad,
                };
                mapping.to_viewport(&padded)
            }
            None => {
                tracing::debug!("[CAPTURE] No ink under tap, using default box");
                default
            }
        }
    }
}

/// Looks up a word typed by the user outside a capture cycle
pub async fn lookup_typed(dictionary: &DictionaryCache, word: &str) -> Option<(String, LookupResult)> {
    let clean = normalize_word(word)?;
    let result = dictionary.lookup(&clean).await;
    Some((clean, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use image::Rgba;
    use lexilens_config::ocr::OcrConfig;
    use lexilens_types::{Corner, UiEvent};

    use crate::dictionary::tests::CountingSource;
    use crate::error::CameraError;
    use crate::recognition::tests::FakeEngine;

    struct FakeCamera {
        frame: Option<RgbaImage>,
        resumed: AtomicUsize,
    }

    impl FakeCamera {
        fn new(frame: RgbaImage) -> Self {
            Self {
                frame: Some(frame),
                resumed: AtomicUsize::new(0),
            }
        }

        fn broken() -> Self {
            Self {
                frame: None,
                resumed: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Camera for FakeCamera {
        async fn start(&self) -> Result<(), CameraError> {
            match self.frame {
                Some(_) => Ok(()),
                None => Err(CameraError::PermissionDenied),
            }
        }

        fn freeze(&self) -> Result<SourceImage, CameraError> {
            self.frame
                .clone()
                .map(SourceImage::new)
                .ok_or(CameraError::NotStarted)
        }

        fn resume(&self) {
            self.resumed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        events: Mutex<Vec<UiEvent>>,
    }

    impl RecordingRenderer {
        fn push(&self, event: UiEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn events(&self) -> Vec<UiEvent> {
            self.events.lock().unwrap().clone()
        }

        fn count(&self, wanted: &UiEvent) -> usize {
            self.events().iter().filter(|e| *e == wanted).count()
        }
    }

    impl Renderer for RecordingRenderer {
        fn show_live(&self) {
            self.push(UiEvent::ShowLive);
        }
        fn show_still(&self, frame: &SourceImage) {
            self.push(UiEvent::ShowStill {
                width: frame.width(),
                height: frame.height(),
            });
        }
        fn show_selection(&self, rect: ViewportRect) {
            self.push(UiEvent::ShowSelection(rect));
        }
        fn hide_selection(&self) {
            self.push(UiEvent::HideSelection);
        }
        fn capture_pointer(&self) {
            self.push(UiEvent::PointerCaptured(true));
        }
        fn release_pointer(&self) {
            self.push(UiEvent::PointerCaptured(false));
        }
        fn show_busy(&self) {
            self.push(UiEvent::ShowBusy);
        }
        fn show_result(&self, outcome: &CaptureOutcome) {
            self.push(UiEvent::ShowResult(outcome.clone()));
        }
        fn show_lookup(&self, word: &str, result: &LookupResult) {
            self.push(UiEvent::ShowLookup {
                word: word.to_string(),
                result: result.clone(),
            });
        }
        fn show_message(&self, message: &str) {
            self.push(UiEvent::Message(message.to_string()));
        }
    }

    const MARK: Rgba<u8> = Rgba([10, 200, 30, 255]);

    /// 1200x1600 portrait frame with one marked pixel at (600, 800)
    fn portrait_frame() -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(1200, 1600, Rgba([255, 255, 255, 255]));
        frame.put_pixel(600, 800, MARK);
        frame
    }

    struct Harness {
        camera: Arc<FakeCamera>,
        renderer: Arc<RecordingRenderer>,
        pipeline: CapturePipeline,
    }

    fn harness(camera: FakeCamera, options: CaptureConfig) -> Harness {
        let camera = Arc::new(camera);
        let renderer = Arc::new(RecordingRenderer::default());
        let pipeline = CapturePipeline::new(camera.clone(), renderer.clone(), &options);
        Harness {
            camera,
            renderer,
            pipeline,
        }
    }

    fn small_display() -> CaptureConfig {
        CaptureConfig {
            display_width: 300.0,
            display_height: 500.0,
            ..CaptureConfig::default()
        }
    }

    fn services(engine: FakeEngine) -> (Arc<FakeEngine>, RecognitionAdapter, Arc<CountingSource>, DictionaryCache) {
        let engine = Arc::new(engine);
        let config = OcrConfig {
            preprocess: false,
            ..OcrConfig::default()
        };
        let adapter = RecognitionAdapter::new(engine.clone(), &config);
        let source = Arc::new(CountingSource::new(&[("apple", "A round fruit.")]));
        let cache = DictionaryCache::new(source.clone(), Duration::from_secs(5));
        (engine, adapter, source, cache)
    }

    #[test]
    fn test_tap_maps_to_source_region() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());

        assert!(h.pipeline.begin_capture(Point::new(150.0, 250.0)));
        assert_eq!(
            h.pipeline.selection(),
            Some(ViewportRect::new(75.0, 210.0, 150.0, 80.0))
        );

        let job = h.pipeline.confirm_capture().unwrap();
        assert_eq!(h.pipeline.phase(), Phase::Recognizing);

        // Box maps to source (360, 672) 480x256; the tap lands on the mark
        assert_eq!(job.region.dimensions(), (480, 256));
        assert_eq!(*job.region.get_pixel(600 - 360, 800 - 672), MARK);
    }

    #[test]
    fn test_resize_changes_mapping() {
        let mut h = harness(FakeCamera::new(portrait_frame()), CaptureConfig::default());
        h.pipeline.set_display_size(DisplaySize::new(300.0, 500.0));
        assert_eq!(h.pipeline.display(), DisplaySize::new(300.0, 500.0));

        assert!(h.pipeline.begin_capture(Point::new(150.0, 250.0)));
        let job = h.pipeline.confirm_capture().unwrap();
        assert_eq!(job.region.dimensions(), (480, 256));
        assert_eq!(*job.region.get_pixel(600 - 360, 800 - 672), MARK);
    }

    #[test]
    fn test_second_tap_is_ignored() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());

        assert!(h.pipeline.begin_capture(Point::new(150.0, 250.0)));
        let before = h.pipeline.selection();
        assert!(!h.pipeline.begin_capture(Point::new(20.0, 20.0)));
        assert_eq!(h.pipeline.selection(), before);
        assert_eq!(h.renderer.count(&UiEvent::ShowBusy), 0);
        assert_eq!(
            h.renderer
                .events()
                .iter()
                .filter(|e| matches!(e, UiEvent::ShowStill { .. }))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_degenerate_selection_cancels_without_ocr() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());
        let (engine, adapter, _, cache) = services(FakeEngine::text("apple", None));

        h.pipeline.begin_capture(Point::new(150.0, 250.0));
        h.pipeline
            .pointer_down(DragTarget::Handle(Corner::TopLeft), Point::new(75.0, 210.0));
        h.pipeline.pointer_move(Point::new(225.0, 210.0));
        assert_eq!(h.pipeline.selection().unwrap().width, 0.0);

        let outcome = h.pipeline.run_capture(&adapter, &cache).await;
        assert!(outcome.is_none());
        assert_eq!(h.pipeline.phase(), Phase::Live);
        assert_eq!(engine.calls(), 0);
        assert_eq!(h.camera.resumed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_selection_outside_display_cancels() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());
        let (engine, adapter, _, cache) = services(FakeEngine::text("apple", None));

        h.pipeline.begin_capture(Point::new(150.0, 250.0));
        h.pipeline.pointer_down(DragTarget::Body, Point::new(0.0, 0.0));
        h.pipeline.pointer_move(Point::new(1000.0, 0.0));
        h.pipeline.pointer_up();

        assert!(h.pipeline.run_capture(&adapter, &cache).await.is_none());
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_full_cycle_to_result_and_back() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());
        let (engine, adapter, source, cache) = services(FakeEngine::text("Apple.", Some(88.0)));

        h.pipeline.begin_capture(Point::new(150.0, 250.0));
        let outcome = h.pipeline.run_capture(&adapter, &cache).await.unwrap();

        assert_eq!(outcome.recognized, "Apple.");
        assert_eq!(outcome.confidence, Some(88.0));
        assert_eq!(outcome.lookup, LookupResult::Definition("A round fruit.".to_string()));
        assert_eq!(h.pipeline.phase(), Phase::Result);
        assert_eq!(engine.calls(), 1);
        assert_eq!(source.fetches('a'), 1);
        assert_eq!(h.renderer.count(&UiEvent::ShowResult(outcome)), 1);

        assert!(h.pipeline.cancel_capture());
        assert_eq!(h.pipeline.phase(), Phase::Live);
        assert_eq!(h.camera.resumed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recognition_failure_still_shows_result() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());
        let (_, adapter, source, cache) = services(FakeEngine::with(Err(
            crate::error::RecognitionError::Engine("no text".to_string()),
        )));

        h.pipeline.begin_capture(Point::new(150.0, 250.0));
        let outcome = h.pipeline.run_capture(&adapter, &cache).await.unwrap();

        assert_eq!(outcome.recognized, "");
        assert_eq!(outcome.lookup, LookupResult::NotFound);
        assert_eq!(h.pipeline.phase(), Phase::Result);
        assert_eq!(source.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_cancel_while_recognizing_discards_late_result() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());
        let (_, adapter, _, cache) = services(FakeEngine::text("apple", None));

        h.pipeline.begin_capture(Point::new(150.0, 250.0));
        let job = h.pipeline.confirm_capture().unwrap();
        let session = job.session;
        let cancel = job.cancel.clone();

        assert!(h.pipeline.cancel_capture());
        assert!(cancel.is_cancelled());
        assert_eq!(h.pipeline.phase(), Phase::Live);

        assert!(job.run(&adapter, &cache).await.is_none());

        let late = CaptureOutcome {
            recognized: "apple".to_string(),
            confidence: None,
            lookup: LookupResult::NotFound,
        };
        assert!(!h.pipeline.complete(session, late));
        assert_eq!(h.pipeline.phase(), Phase::Live);
    }

    #[test]
    fn test_pointer_capture_released_on_every_path() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());

        // Drag end
        h.pipeline.begin_capture(Point::new(150.0, 250.0));
        assert!(h.pipeline.pointer_down(DragTarget::Body, Point::new(150.0, 250.0)));
        assert!(!h.pipeline.pointer_down(DragTarget::Body, Point::new(150.0, 250.0)));
        assert!(h.pipeline.pointer_up());
        assert!(!h.pipeline.pointer_up());

        // Cancel mid-drag
        h.pipeline.pointer_down(DragTarget::Handle(Corner::BottomRight), Point::new(225.0, 290.0));
        h.pipeline.cancel_capture();

        // Confirm mid-drag
        h.pipeline.begin_capture(Point::new(150.0, 250.0));
        h.pipeline.pointer_down(DragTarget::Body, Point::new(150.0, 250.0));
        h.pipeline.confirm_capture();

        let captured = h.renderer.count(&UiEvent::PointerCaptured(true));
        let released = h.renderer.count(&UiEvent::PointerCaptured(false));
        assert_eq!(captured, 3);
        assert_eq!(released, 3);
    }

    #[test]
    fn test_pointer_events_outside_framing_are_ignored() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());
        assert!(!h.pipeline.pointer_down(DragTarget::Body, Point::new(1.0, 1.0)));
        assert!(h.pipeline.pointer_move(Point::new(5.0, 5.0)).is_none());
        assert!(!h.pipeline.pointer_up());
        assert!(h.pipeline.confirm_capture().is_none());
        assert!(!h.pipeline.cancel_capture());
        assert!(h.renderer.events().is_empty());
    }

    #[tokio::test]
    async fn test_camera_failure_is_static_view() {
        let mut h = harness(FakeCamera::broken(), small_display());

        assert!(!h.pipeline.start().await);
        assert_eq!(h.pipeline.phase(), Phase::Unavailable);
        assert_eq!(
            h.renderer.events(),
            vec![UiEvent::Message("Could not access camera.".to_string())]
        );
        assert!(!h.pipeline.begin_capture(Point::new(10.0, 10.0)));
    }

    #[tokio::test]
    async fn test_edit_result_relooks_word() {
        let mut h = harness(FakeCamera::new(portrait_frame()), small_display());
        let (_, adapter, _, cache) = services(FakeEngine::text("appie", None));

        h.pipeline.begin_capture(Point::new(150.0, 250.0));
        let outcome = h.pipeline.run_capture(&adapter, &cache).await.unwrap();
        assert_eq!(outcome.lookup, LookupResult::NotFound);

        let (session, word) = h.pipeline.edit_result(" apple ").unwrap();
        let result = cache.lookup(&word).await;
        assert!(h.pipeline.revise_result(session, word, result));

        let PipelineState::Result { outcome, .. } = h.pipeline.state() else {
            panic!("expected result state");
        };
        assert_eq!(outcome.recognized, "apple");
        assert!(outcome.lookup.is_found());
        assert!(!h.pipeline.revise_result(session + 1, "x".to_string(), LookupResult::NotFound));
    }

    #[test]
    fn test_auto_detect_sizes_box_to_word() {
        // Display matches the frame so viewport and source units coincide
        let mut frame = RgbaImage::from_pixel(400, 200, Rgba([255, 255, 255, 255]));
        for y in 90..110 {
            for x in 150..250 {
                frame.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let options = CaptureConfig {
            display_width: 400.0,
            display_height: 200.0,
            auto_detect: true,
            detect_gap: 4,
            ..CaptureConfig::default()
        };
        let mut h = harness(FakeCamera::new(frame), options);

        h.pipeline.begin_capture(Point::new(200.0, 100.0));
        assert_eq!(
            h.pipeline.selection(),
            Some(ViewportRect::new(146.0, 86.0, 108.0, 28.0))
        );
    }

    #[tokio::test]
    async fn test_lookup_typed_normalizes() {
        let (_, _, _, cache) = services(FakeEngine::text("", None));
        let (word, result) = lookup_typed(&cache, "APPLE!").await.unwrap();
        assert_eq!(word, "apple");
        assert!(result.is_found());
        assert!(lookup_typed(&cache, "42").await.is_none());
    }
}
