//! Error types for the `slidesift` crate.
//!
//! This module defines [`SlideError`], the unified error type returned by all
//! fallible operations in the crate. Only a handful of conditions are fatal:
//! a video that cannot be opened, options that fail validation, and I/O
//! failures while writing the assembled document. Running out of decodable
//! frames is *not* an error; the sampling loop treats it as the natural end of
//! the stream.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `slidesift` operations.
///
/// Every public method that can fail returns `Result<T, SlideError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SlideError {
    /// The video could not be opened as a frame source.
    ///
    /// Covers missing files, non-media files, files without a video stream,
    /// unsupported codecs, and degenerate (zero) frame dimensions. This is
    /// fatal to the run and is never retried.
    #[error("Failed to open video at {path}: {reason}")]
    SourceUnopenable {
        /// Path that was passed to [`crate::VideoFile::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// A video frame could not be decoded or converted.
    ///
    /// Raised internally while reading a frame; the sampling loop absorbs it
    /// as end of stream.
    #[error("Failed to decode video frame: {0}")]
    VideoDecodeError(String),

    /// An extraction option is outside its accepted range.
    #[error("Invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Option name as it appears on the builder.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A document was requested for an empty slide sequence.
    #[error("Cannot assemble document `{0}` from zero slides")]
    EmptyDocument(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while encoding a page.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The page manifest could not be serialised.
    #[error("Manifest serialisation error: {0}")]
    ManifestError(#[from] JsonError),
}

impl From<FfmpegError> for SlideError {
    fn from(error: FfmpegError) -> Self {
        SlideError::FfmpegError(error.to_string())
    }
}
