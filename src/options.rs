//! Extraction options.
//!
//! [`SlideOptions`] is a builder carrying the sampling interval, the change
//! threshold, the presenter mask and an optional progress callback.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use slidesift::{MaskPosition, SlideOptions};
//!
//! let options = SlideOptions::new()
//!     .with_interval(Duration::from_secs(5))
//!     .with_threshold(8.0)
//!     .with_mask_position(MaskPosition::BottomRight)
//!     .with_mask_size_percent(25);
//! assert!(options.validate().is_ok());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::SlideError,
    mask::{MAX_MASK_SIZE_PERCENT, MIN_MASK_SIZE_PERCENT, MaskPosition},
    progress::{NoOpProgress, ProgressCallback},
};

/// Default time between samples.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
/// Default change threshold on the `0..=255` luminance scale.
pub const DEFAULT_THRESHOLD: f64 = 5.0;
/// Default mask size, in percent of each frame dimension.
pub const DEFAULT_MASK_SIZE_PERCENT: u32 = 30;

const RECOMMENDED_INTERVAL_SECONDS: RangeInclusive<f64> = 5.0..=60.0;
const RECOMMENDED_THRESHOLD: RangeInclusive<f64> = 1.0..=50.0;

/// Settings for a slide extraction run.
#[derive(Clone)]
pub struct SlideOptions {
    pub(crate) interval: Duration,
    pub(crate) threshold: f64,
    pub(crate) mask_position: MaskPosition,
    pub(crate) mask_size_percent: u32,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for SlideOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SlideOptions")
            .field("interval", &self.interval)
            .field("threshold", &self.threshold)
            .field("mask_position", &self.mask_position)
            .field("mask_size_percent", &self.mask_size_percent)
            .finish_non_exhaustive()
    }
}

impl Default for SlideOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SlideOptions {
    /// Create options with default settings.
    ///
    /// Defaults: 10 second interval, threshold 5.0, bottom-left mask at
    /// 30 %, no progress callback.
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            threshold: DEFAULT_THRESHOLD,
            mask_position: MaskPosition::default(),
            mask_size_percent: DEFAULT_MASK_SIZE_PERCENT,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Time between sampled frames.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Minimum mean luminance difference for a sample to count as a new
    /// slide. Lower values keep more frames.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_mask_position(mut self, position: MaskPosition) -> Self {
        self.mask_position = position;
        self
    }

    /// Mask size as a percentage of frame width and height.
    #[must_use]
    pub fn with_mask_size_percent(mut self, percent: u32) -> Self {
        self.mask_size_percent = percent;
        self
    }

    /// Attach a progress callback, invoked after every sampling step.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn mask_position(&self) -> MaskPosition {
        self.mask_position
    }

    pub fn mask_size_percent(&self) -> u32 {
        self.mask_size_percent
    }

    /// Check every option.
    ///
    /// Values that make sampling meaningless are rejected. Values that are
    /// merely unusual are accepted and logged at `warn`.
    ///
    /// # Errors
    ///
    /// Returns [`SlideError::InvalidOption`] for a zero interval, a negative
    /// or non-finite threshold, or a mask size outside 10–50 %.
    pub fn validate(&self) -> Result<(), SlideError> {
        if self.interval.is_zero() {
            return Err(SlideError::InvalidOption {
                name: "interval",
                reason: "must be greater than zero".to_string(),
            });
        }

        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SlideError::InvalidOption {
                name: "threshold",
                reason: format!("must be a non-negative number, got {}", self.threshold),
            });
        }

        if !(MIN_MASK_SIZE_PERCENT..=MAX_MASK_SIZE_PERCENT).contains(&self.mask_size_percent) {
            return Err(SlideError::InvalidOption {
                name: "mask_size_percent",
                reason: format!(
                    "must be between {MIN_MASK_SIZE_PERCENT} and {MAX_MASK_SIZE_PERCENT}, got {}",
                    self.mask_size_percent,
                ),
            });
        }

        let interval_seconds = self.interval.as_secs_f64();
        if !RECOMMENDED_INTERVAL_SECONDS.contains(&interval_seconds) {
            log::warn!(
                "Interval of {interval_seconds}s is outside the usual 5-60s range",
            );
        }
        if !RECOMMENDED_THRESHOLD.contains(&self.threshold) {
            log::warn!(
                "Threshold {} is outside the usual 1.0-50.0 range",
                self.threshold,
            );
        }

        Ok(())
    }
}
