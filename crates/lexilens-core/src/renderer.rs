use lexilens_types::{CaptureOutcome, LookupResult, ViewportRect};

use crate::camera::SourceImage;

/// Presentation surface the pipeline draws through.
///
/// Implementations must not block; they queue or forward the request.
pub trait Renderer: Send + Sync {
    /// Back to the streaming camera view, overlays cleared
    fn show_live(&self);

    fn show_still(&self, frame: &SourceImage);

    /// Crop box together with its four corner handles
    fn show_selection(&self, rect: ViewportRect);

    fn hide_selection(&self);

    /// Start routing move/up events to the crop box
    fn capture_pointer(&self);

    fn release_pointer(&self);

    /// Input disabled while recognition runs
    fn show_busy(&self);

    fn show_result(&self, outcome: &CaptureOutcome);

    fn show_lookup(&self, word: &str, result: &LookupResult);

    fn show_message(&self, message: &str);
}
