//! # slidesift
//!
//! Recover the slides from a recorded lecture or presentation video.
//!
//! `slidesift` samples a video at a fixed time interval, compares each sample
//! with the last slide it kept, and keeps the ones whose luminance changed
//! by more than a threshold. A corner of the frame can be masked out so a
//! presenter's webcam overlay does not count as a slide change. Decoding is
//! done by FFmpeg through the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use slidesift::{
//!     DocumentAssembler, MaskPosition, PdfAssembler, SlideExtractor, SlideOptions,
//!     document::document_name,
//! };
//!
//! let options = SlideOptions::new()
//!     .with_interval(Duration::from_secs(10))
//!     .with_threshold(5.0)
//!     .with_mask_position(MaskPosition::BottomRight);
//!
//! let deck = SlideExtractor::new(options)?.extract("lecture.mp4")?;
//! for warning in &deck.warnings {
//!     eprintln!("{warning}");
//! }
//!
//! if !deck.is_empty() {
//!     PdfAssembler::new("out").assemble(&deck.slides, &document_name("lecture"))?;
//! }
//! # Ok::<(), slidesift::SlideError>(())
//! ```
//!
//! ## Stepping manually
//!
//! [`SamplingController`] exposes one transition per call, so a caller can
//! stop between samples or inspect each outcome:
//!
//! ```no_run
//! use slidesift::{DifferenceScorer, SamplingController, StepOutcome, VideoFile};
//!
//! let mut video = VideoFile::open("lecture.mp4")?;
//! let mut controller = SamplingController::new(&mut video, DifferenceScorer::new(5.0, None), 300);
//! loop {
//!     match controller.step() {
//!         StepOutcome::Retained { index, frame_number } => println!("slide {index} at frame {frame_number}"),
//!         StepOutcome::Skipped { .. } => {}
//!         StepOutcome::Finished(reason) => {
//!             println!("done: {reason:?}");
//!             break;
//!         }
//!     }
//! }
//! # Ok::<(), slidesift::SlideError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod document;
pub mod error;
pub mod extractor;
pub mod ffmpeg;
pub mod frame;
pub mod mask;
pub mod metadata;
pub mod options;
pub mod progress;
pub mod sampler;
pub mod scorer;
pub mod source;
pub mod store;
mod utilities;
pub mod validation;

pub use document::{DocumentAssembler, PageImageAssembler, PdfAssembler};
pub use error::SlideError;
pub use extractor::{ExtractionWarning, SlideDeck, SlideExtractor};
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use frame::Frame;
pub use mask::{MaskPosition, MaskRect};
pub use metadata::VideoMetadata;
pub use options::SlideOptions;
pub use progress::{ProgressCallback, ProgressInfo};
pub use sampler::{DoneReason, SamplerState, SamplingController, SamplingSummary, StepOutcome};
pub use scorer::DifferenceScorer;
pub use source::{FrameSource, VideoFile};
pub use store::{RetainedFrame, RetainedFrameStore};
pub use validation::ValidationReport;
