//! Top-level slide extraction.
//!
//! [`SlideExtractor`] wires the pieces together for one run: open the video,
//! resolve the presenter mask, compute the step size, drive the
//! [`SamplingController`] to completion and package the result as a
//! [`SlideDeck`].

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::time::Instant;

use crate::{
    error::SlideError,
    mask::{self, MaskRect},
    metadata::VideoMetadata,
    options::SlideOptions,
    sampler::{self, DoneReason, SamplingController},
    scorer::DifferenceScorer,
    source::{FrameSource, VideoFile},
    store::RetainedFrame,
};

/// Something worth telling the user about a run that still succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// No frame was retained.
    EmptyResult,
    /// A frame could not be decoded before the end of the video; slides
    /// after that point are missing.
    EndedEarly {
        /// Target position that failed to decode.
        frame_number: u64,
    },
}

impl Display for ExtractionWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExtractionWarning::EmptyResult => {
                f.write_str("No slides found. Try lowering the threshold.")
            }
            ExtractionWarning::EndedEarly { frame_number } => write!(
                f,
                "Video could not be decoded past frame {frame_number}; later slides may be missing."
            ),
        }
    }
}

/// The outcome of a run.
#[derive(Debug, Clone)]
pub struct SlideDeck {
    /// Retained slides, in retention order.
    pub slides: Vec<RetainedFrame>,
    /// Metadata of the sampled video.
    pub metadata: VideoMetadata,
    /// Region that was excluded from comparison, if any.
    pub mask: Option<MaskRect>,
    /// Source frames between consecutive samples.
    pub step_size: u64,
    /// Positions sampled (retained or skipped).
    pub samples_visited: u64,
    /// Why sampling stopped.
    pub end: DoneReason,
    pub warnings: Vec<ExtractionWarning>,
}

impl SlideDeck {
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }
}

/// Runs slide extraction with a fixed set of options.
///
/// # Example
///
/// ```no_run
/// use slidesift::{SlideExtractor, SlideOptions};
///
/// let extractor = SlideExtractor::new(SlideOptions::new().with_threshold(8.0))?;
/// let deck = extractor.extract("lecture.mp4")?;
/// for slide in &deck.slides {
///     println!("slide {} at {:.1}s", slide.index(), slide.timestamp().as_secs_f64());
/// }
/// # Ok::<(), slidesift::SlideError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SlideExtractor {
    options: SlideOptions,
}

impl SlideExtractor {
    /// Validate `options` and build an extractor.
    ///
    /// # Errors
    ///
    /// Returns [`SlideError::InvalidOption`] if any option is out of range.
    pub fn new(options: SlideOptions) -> Result<Self, SlideError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &SlideOptions {
        &self.options
    }

    /// Open the video at `path` and extract its slides.
    ///
    /// The video is closed before this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`SlideError::SourceUnopenable`] if the video cannot be
    /// opened. Decode failures part-way through are reported as
    /// [`ExtractionWarning::EndedEarly`] on an otherwise successful deck.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<SlideDeck, SlideError> {
        let mut video = VideoFile::open(path)?;
        let metadata = video.metadata();
        log::info!(
            "Processing at native resolution: {}x{}",
            metadata.width,
            metadata.height,
        );

        let deck = self.extract_from(&mut video);
        video.close();
        Ok(deck)
    }

    /// Extract slides from an already-open source.
    pub fn extract_from<S: FrameSource + ?Sized>(&self, source: &mut S) -> SlideDeck {
        let started = Instant::now();
        let metadata = source.metadata().clone();

        let mask = mask::resolve(
            metadata.width,
            metadata.height,
            self.options.mask_position,
            self.options.mask_size_percent,
        );
        match mask {
            Some(rect) => log::debug!("Masking {} ({})", rect, self.options.mask_position),
            None => log::debug!("No presenter mask"),
        }

        let step_size = sampler::step_size_in_frames(self.options.interval, metadata.frames_per_second);
        log::debug!(
            "Sampling every {step_size} frame(s) of {} at {:.2} fps",
            metadata.frame_count,
            metadata.frames_per_second,
        );

        let scorer = DifferenceScorer::new(self.options.threshold, mask);
        let summary = SamplingController::new(source, scorer, step_size)
            .with_progress(self.options.progress.clone())
            .run();

        let mut warnings = Vec::new();
        if let DoneReason::DecodeFailed { frame_number } = summary.end {
            warnings.push(ExtractionWarning::EndedEarly { frame_number });
        }
        if summary.store.is_empty() {
            log::warn!("{}", ExtractionWarning::EmptyResult);
            warnings.push(ExtractionWarning::EmptyResult);
        }

        log::info!(
            "Retained {} slide(s) from {} sample(s) in {:.2}s",
            summary.store.count(),
            summary.steps,
            started.elapsed().as_secs_f64(),
        );

        SlideDeck {
            slides: summary.store.into_frames(),
            metadata,
            mask,
            step_size,
            samples_visited: summary.steps,
            end: summary.end,
            warnings,
        }
    }
}
