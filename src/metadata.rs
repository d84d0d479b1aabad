//! Video metadata.
//!
//! [`VideoMetadata`] is read once when a [`VideoFile`](crate::VideoFile) is
//! opened and cached for the lifetime of the handle. It carries the four
//! values the sampling loop depends on (frame rate, frame count, width and
//! height) plus a few descriptive fields for reporting.

use std::time::Duration;

/// Frame rate assumed when the container does not report a usable one.
pub const DEFAULT_FRAMES_PER_SECOND: f64 = 30.0;

/// Metadata for the video stream being sampled.
///
/// # Example
///
/// ```no_run
/// use slidesift::{FrameSource, VideoFile};
///
/// let video = VideoFile::open("lecture.mp4")?;
/// let metadata = video.metadata();
/// println!("{}x{} @ {:.2} fps", metadata.width, metadata.height, metadata.frames_per_second);
/// # Ok::<(), slidesift::SlideError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second. Always positive.
    pub frames_per_second: f64,
    /// `true` when the stream reported no frame rate and
    /// [`DEFAULT_FRAMES_PER_SECOND`] was substituted.
    pub frame_rate_defaulted: bool,
    /// Total number of frames (reported by the container, or estimated from
    /// duration and frame rate).
    pub frame_count: u64,
    /// Total duration of the video.
    pub duration: Duration,
    /// Codec name (e.g. `"h264"`, `"vp9"`).
    pub codec: String,
}

impl VideoMetadata {
    /// Build metadata for a synthetic or already-decoded source.
    ///
    /// A non-positive or non-finite `frames_per_second` is replaced with
    /// [`DEFAULT_FRAMES_PER_SECOND`]. Duration is derived from the frame
    /// count.
    pub fn new(width: u32, height: u32, frames_per_second: f64, frame_count: u64) -> Self {
        let (frames_per_second, frame_rate_defaulted) = sanitize_frame_rate(frames_per_second);
        Self {
            width,
            height,
            frames_per_second,
            frame_rate_defaulted,
            frame_count,
            duration: Duration::from_secs_f64(frame_count as f64 / frames_per_second),
            codec: "unknown".to_string(),
        }
    }

    /// Timestamp of `frame_number` at this stream's frame rate.
    pub fn timestamp_of(&self, frame_number: u64) -> Duration {
        Duration::from_secs_f64(frame_number as f64 / self.frames_per_second)
    }
}

/// Replace an unusable frame rate with the default.
///
/// Returns the rate to use and whether it was substituted.
pub(crate) fn sanitize_frame_rate(frames_per_second: f64) -> (f64, bool) {
    if frames_per_second.is_finite() && frames_per_second > 0.0 {
        (frames_per_second, false)
    } else {
        (DEFAULT_FRAMES_PER_SECOND, true)
    }
}
