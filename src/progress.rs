//! Progress reporting.
//!
//! The sampling loop reports fractional completion after every step through
//! a [`ProgressCallback`] injected via
//! [`SlideOptions::with_progress`](crate::SlideOptions::with_progress). The
//! core knows nothing about terminals or UIs; the callback decides how to
//! render.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use slidesift::{ProgressCallback, ProgressInfo, SlideExtractor, SlideOptions};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:.0}% ({} slides so far)", info.fraction * 100.0, info.retained);
//!     }
//! }
//!
//! let options = SlideOptions::new().with_progress(Arc::new(PrintProgress));
//! let deck = SlideExtractor::new(options)?.extract("lecture.mp4")?;
//! # Ok::<(), slidesift::SlideError>(())
//! ```

use std::time::Duration;

/// A snapshot of sampling progress, delivered once per step.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Completed fraction of the video, `0.0..=1.0`.
    ///
    /// Computed as `min(target_frame / total_frames, 1.0)` for the frame
    /// position sampled in the step just finished.
    pub fraction: f64,
    /// Number of steps taken so far (including the one just finished).
    pub step: u64,
    /// Frame position sampled in the step just finished.
    pub frame_number: u64,
    /// Total frames in the video.
    pub total_frames: u64,
    /// Slides retained so far.
    pub retained: usize,
    /// Wall-clock time since sampling started.
    pub elapsed: Duration,
}

/// Trait for receiving progress updates during extraction.
///
/// Callbacks are fire-and-forget: they observe but cannot influence the
/// run. Implementations must be [`Send`] and [`Sync`] so the same reporter
/// can be shared with a UI thread.
pub trait ProgressCallback: Send + Sync {
    /// Called after each sampling step.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications.
///
/// This is the default when no callback is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Completed fraction for a sampled position, clamped to `1.0`.
///
/// An empty video reports `1.0`.
pub(crate) fn completed_fraction(frame_number: u64, total_frames: u64) -> f64 {
    if total_frames == 0 {
        return 1.0;
    }
    (frame_number as f64 / total_frames as f64).min(1.0)
}
