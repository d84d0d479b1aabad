//! Video validation.
//!
//! Provides [`VideoFile::validate`](crate::VideoFile::validate), which checks
//! the cached metadata for conditions that make sampling unreliable and
//! returns a [`ValidationReport`].
//!
//! # Example
//!
//! ```no_run
//! use slidesift::VideoFile;
//!
//! let video = VideoFile::open("lecture.mp4")?;
//! let report = video.validate();
//! if !report.is_valid() {
//!     eprint!("{report}");
//! }
//! # Ok::<(), slidesift::SlideError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::metadata::VideoMetadata;

/// Frame rates above this are reported as suspicious.
const IMPLAUSIBLE_FRAMES_PER_SECOND: f64 = 240.0;

/// Summary of video validation.
///
/// Contains lists of informational notices, warnings, and errors.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Non-fatal issues that may affect which slides are found.
    pub warnings: Vec<String>,
    /// Issues that will prevent any slide from being found.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of entries (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Run validation checks on cached metadata.
pub(crate) fn validate_metadata(metadata: &VideoMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Dimensions ─────────────────────────────────────────────────
    if metadata.width == 0 || metadata.height == 0 {
        report.errors.push(format!(
            "Invalid video dimensions: {}x{}",
            metadata.width, metadata.height,
        ));
    }

    // ── Frame count ────────────────────────────────────────────────
    if metadata.frame_count == 0 {
        report
            .errors
            .push("Video reports zero frames; nothing can be sampled".to_string());
    }

    // ── Frame rate ─────────────────────────────────────────────────
    if metadata.frame_rate_defaulted {
        report.warnings.push(format!(
            "Frame rate missing from container; assumed {:.0} fps, so sampling intervals may be off",
            metadata.frames_per_second,
        ));
    } else if metadata.frames_per_second > IMPLAUSIBLE_FRAMES_PER_SECOND {
        report.warnings.push(format!(
            "Unusually high frame rate ({:.1} fps)",
            metadata.frames_per_second,
        ));
    }

    // ── Duration ───────────────────────────────────────────────────
    if metadata.duration == Duration::ZERO && metadata.frame_count > 0 {
        report
            .warnings
            .push("Container reports zero duration".to_string());
    }

    report.info.push(format!(
        "Video: {} {}x{} @ {:.2} fps, {} frames, {:.1}s",
        metadata.codec,
        metadata.width,
        metadata.height,
        metadata.frames_per_second,
        metadata.frame_count,
        metadata.duration.as_secs_f64(),
    ));

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_video_has_only_info() {
        let report = validate_metadata(&VideoMetadata::new(1920, 1080, 30.0, 900));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
        assert_eq!(report.info.len(), 1);
        assert!(report.info[0].contains("1920x1080"));
    }

    #[test]
    fn empty_video_is_invalid() {
        let report = validate_metadata(&VideoMetadata::new(1920, 1080, 30.0, 0));
        assert!(!report.is_valid());
        assert!(report.to_string().contains("[ERROR]"));
    }

    #[test]
    fn defaulted_frame_rate_is_a_warning() {
        let report = validate_metadata(&VideoMetadata::new(640, 480, 0.0, 100));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("assumed 30 fps"));
    }

    #[test]
    fn empty_report_says_so() {
        assert_eq!(ValidationReport::default().to_string(), "No issues found.\n");
    }
}
