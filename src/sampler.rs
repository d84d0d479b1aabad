//! The sampling loop.
//!
//! [`SamplingController`] walks a [`FrameSource`] at a fixed frame step,
//! compares each sample against the last retained frame, and appends the
//! ones that changed to a [`RetainedFrameStore`]. It is an explicit two-state
//! machine:
//!
//! ```text
//! Scanning { step_index } --(target >= total frames)--> Done(Exhausted)
//! Scanning { step_index } --(frame unreadable)-------> Done(DecodeFailed)
//! Scanning { step_index } --(retain | skip)----------> Scanning { step_index + 1 }
//! ```
//!
//! Each call to [`step`](SamplingController::step) performs one transition,
//! so a caller that wants to stop early simply stops calling it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    frame::Frame,
    progress::{ProgressCallback, ProgressInfo, completed_fraction},
    scorer::DifferenceScorer,
    source::FrameSource,
    store::RetainedFrameStore,
};

/// Number of source frames between consecutive samples.
///
/// `max(1, round(interval * frames_per_second))`. The lower bound keeps the
/// loop advancing for degenerate intervals or frame rates.
pub fn step_size_in_frames(interval: Duration, frames_per_second: f64) -> u64 {
    let frames = (interval.as_secs_f64() * frames_per_second).round();
    if frames.is_finite() && frames >= 1.0 {
        frames as u64
    } else {
        1
    }
}

/// Why the sampling loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    /// The next target position was at or past the last frame.
    Exhausted,
    /// The frame at `frame_number` could not be read; everything retained
    /// before it is kept.
    DecodeFailed {
        /// Target position that failed.
        frame_number: u64,
    },
}

/// State of the sampling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerState {
    /// Sampling; `step_index` is the next step to take.
    Scanning { step_index: u64 },
    /// Terminal.
    Done(DoneReason),
}

/// Result of a single [`SamplingController::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The sample differed from the last retained frame and was stored.
    Retained { index: usize, frame_number: u64 },
    /// The sample matched the last retained frame and was discarded.
    Skipped { frame_number: u64 },
    /// The loop is done; further calls keep returning this.
    Finished(DoneReason),
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SamplingSummary {
    /// Retained slides in retention order.
    pub store: RetainedFrameStore,
    /// Why the loop stopped.
    pub end: DoneReason,
    /// Number of positions sampled (retained or skipped).
    pub steps: u64,
}

/// Drives sampling over a [`FrameSource`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use slidesift::{
///     DifferenceScorer, FrameSource, SamplingController, VideoFile, sampler,
/// };
///
/// let mut video = VideoFile::open("lecture.mp4")?;
/// let step = sampler::step_size_in_frames(
///     Duration::from_secs(10),
///     video.metadata().frames_per_second,
/// );
/// let scorer = DifferenceScorer::new(5.0, None);
/// let summary = SamplingController::new(&mut video, scorer, step).run();
/// println!("{} slides", summary.store.count());
/// # Ok::<(), slidesift::SlideError>(())
/// ```
pub struct SamplingController<'a, S: FrameSource + ?Sized> {
    source: &'a mut S,
    scorer: DifferenceScorer,
    step_size: u64,
    state: SamplerState,
    previous: Option<Frame>,
    store: RetainedFrameStore,
    progress: Option<Arc<dyn ProgressCallback>>,
    steps: u64,
    started: Instant,
}

impl<'a, S: FrameSource + ?Sized> SamplingController<'a, S> {
    /// Create a controller in the initial `Scanning { step_index: 0 }` state.
    ///
    /// A `step_size` of zero is raised to one.
    pub fn new(source: &'a mut S, scorer: DifferenceScorer, step_size: u64) -> Self {
        Self {
            source,
            scorer,
            step_size: step_size.max(1),
            state: SamplerState::Scanning { step_index: 0 },
            previous: None,
            store: RetainedFrameStore::new(),
            progress: None,
            steps: 0,
            started: Instant::now(),
        }
    }

    /// Report progress to `callback` after every step.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn step_size(&self) -> u64 {
        self.step_size
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, SamplerState::Done(_))
    }

    /// Slides retained so far.
    pub fn store(&self) -> &RetainedFrameStore {
        &self.store
    }

    /// Perform one transition of the state machine.
    pub fn step(&mut self) -> StepOutcome {
        let step_index = match self.state {
            SamplerState::Done(reason) => return StepOutcome::Finished(reason),
            SamplerState::Scanning { step_index } => step_index,
        };

        let total_frames = self.source.metadata().frame_count;
        let target = step_index.saturating_mul(self.step_size);
        if target >= total_frames {
            log::debug!("Reached end of video at step {step_index} (target frame {target})");
            return self.finish(DoneReason::Exhausted);
        }

        let Some(frame) = self.source.read_frame(target) else {
            log::warn!(
                "Could not read frame {target} of {total_frames}; ending scan with {} slide(s)",
                self.store.count(),
            );
            return self.finish(DoneReason::DecodeFailed {
                frame_number: target,
            });
        };

        let outcome = if self.scorer.is_different(self.previous.as_ref(), Some(&frame)) {
            let index = self.store.append(frame.clone());
            log::debug!(
                "Retained slide {index} at frame {target} ({:.2}s)",
                frame.timestamp().as_secs_f64(),
            );
            self.previous = Some(frame);
            StepOutcome::Retained {
                index,
                frame_number: target,
            }
        } else {
            StepOutcome::Skipped {
                frame_number: target,
            }
        };

        self.steps += 1;
        self.state = SamplerState::Scanning {
            step_index: step_index + 1,
        };

        if let Some(progress) = &self.progress {
            progress.on_progress(&ProgressInfo {
                fraction: completed_fraction(target, total_frames),
                step: self.steps,
                frame_number: target,
                total_frames,
                retained: self.store.count(),
                elapsed: self.started.elapsed(),
            });
        }

        outcome
    }

    /// Step until `Done` and hand back the results.
    pub fn run(mut self) -> SamplingSummary {
        let end = loop {
            if let StepOutcome::Finished(reason) = self.step() {
                break reason;
            }
        };

        SamplingSummary {
            store: self.store,
            end,
            steps: self.steps,
        }
    }

    /// Positions sampled so far (retained or skipped).
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    fn finish(&mut self, reason: DoneReason) -> StepOutcome {
        self.state = SamplerState::Done(reason);
        StepOutcome::Finished(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_size_rounds_to_nearest_frame() {
        assert_eq!(step_size_in_frames(Duration::from_secs(10), 30.0), 300);
        assert_eq!(step_size_in_frames(Duration::from_secs(10), 29.97), 300);
        assert_eq!(step_size_in_frames(Duration::from_secs(5), 23.976), 120);
        assert_eq!(step_size_in_frames(Duration::from_millis(1500), 25.0), 38);
    }

    #[test]
    fn step_size_never_drops_below_one() {
        assert_eq!(step_size_in_frames(Duration::ZERO, 30.0), 1);
        assert_eq!(step_size_in_frames(Duration::from_millis(1), 30.0), 1);
        assert_eq!(step_size_in_frames(Duration::from_secs(10), 0.0), 1);
        assert_eq!(step_size_in_frames(Duration::from_secs(10), f64::NAN), 1);
        assert_eq!(step_size_in_frames(Duration::from_secs(10), -30.0), 1);
    }
}
