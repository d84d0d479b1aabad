//! Frame sources.
//!
//! [`FrameSource`] is the seam between the sampling loop and whatever
//! decodes the video. [`VideoFile`] is the FFmpeg-backed implementation used
//! for real recordings; tests and embedders can supply their own.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{
    Rational,
    codec::{context::Context as CodecContext, decoder::Video as VideoDecoder},
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::{
    error::SlideError,
    frame::Frame,
    metadata::{VideoMetadata, sanitize_frame_rate},
    utilities,
    validation::{ValidationReport, validate_metadata},
};

/// Random-access provider of decoded frames.
///
/// Reading is infallible from the caller's point of view: a frame that
/// cannot be produced (past the end, corrupt data, decoder error) is reported
/// as `None`, which the sampling loop treats as end of stream.
pub trait FrameSource {
    /// Metadata of the underlying video.
    fn metadata(&self) -> &VideoMetadata;

    /// Seek to `frame_number` and decode the frame there.
    fn read_frame(&mut self, frame_number: u64) -> Option<Frame>;
}

/// A video file opened through FFmpeg.
///
/// Holds the demuxer, a decoder for the best video stream, and an RGB24
/// converter at the stream's native resolution. Everything is released when
/// the value is dropped, so the handle is closed on every exit path.
///
/// # Example
///
/// ```no_run
/// use slidesift::{FrameSource, VideoFile};
///
/// let mut video = VideoFile::open("lecture.mp4")?;
/// if let Some(frame) = video.read_frame(300) {
///     frame.image().save("frame_300.png")?;
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct VideoFile {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    stream_index: usize,
    time_base: Rational,
    metadata: VideoMetadata,
    path: PathBuf,
}

impl Debug for VideoFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoFile")
            .field("path", &self.path)
            .field("stream_index", &self.stream_index)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl VideoFile {
    /// Open a video file for sampling.
    ///
    /// Initialises FFmpeg (idempotent), opens the container, selects the best
    /// video stream and prepares a decoder for it.
    ///
    /// # Errors
    ///
    /// Returns [`SlideError::SourceUnopenable`] if the file is missing, is
    /// not a media file, has no video stream, uses an unsupported codec, or
    /// reports zero frame dimensions.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SlideError> {
        let path = path.as_ref().to_path_buf();
        let unopenable = |reason: String| SlideError::SourceUnopenable {
            path: path.clone(),
            reason,
        };

        log::debug!("Opening video: {}", path.display());

        ffmpeg_next::init()
            .map_err(|error| unopenable(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| unopenable(error.to_string()))?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let (stream_index, time_base, decoder, raw_frame_rate, container_frames) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or_else(|| unopenable("no video stream found".to_string()))?;

            let decoder_context = CodecContext::from_parameters(stream.parameters())
                .map_err(|error| unopenable(format!("unreadable codec parameters: {error}")))?;
            let decoder = decoder_context
                .decoder()
                .video()
                .map_err(|error| unopenable(format!("cannot create video decoder: {error}")))?;

            let average = stream.avg_frame_rate();
            let raw_frame_rate = if average.denominator() != 0 && average.numerator() > 0 {
                average.numerator() as f64 / average.denominator() as f64
            } else {
                let rate = stream.rate();
                if rate.denominator() != 0 {
                    rate.numerator() as f64 / rate.denominator() as f64
                } else {
                    0.0
                }
            };

            (
                stream.index(),
                stream.time_base(),
                decoder,
                raw_frame_rate,
                stream.frames(),
            )
        };

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(unopenable(format!(
                "degenerate frame dimensions {width}x{height}"
            )));
        }

        let (frames_per_second, frame_rate_defaulted) = sanitize_frame_rate(raw_frame_rate);
        if frame_rate_defaulted {
            log::warn!(
                "{} reports no usable frame rate, assuming {frames_per_second} fps",
                path.display(),
            );
        }

        let frame_count = if container_frames > 0 {
            container_frames as u64
        } else {
            (duration.as_secs_f64() * frames_per_second) as u64
        };

        let codec = decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| unopenable(format!("cannot convert pixel format to RGB: {error}")))?;

        let metadata = VideoMetadata {
            width,
            height,
            frames_per_second,
            frame_rate_defaulted,
            frame_count,
            duration,
            codec,
        };

        log::info!(
            "Opened video: {} ({}x{}, {:.2} fps, {} frames, {:.2}s, codec={})",
            path.display(),
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.frame_count,
            metadata.duration.as_secs_f64(),
            metadata.codec,
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            stream_index,
            time_base,
            metadata,
            path,
        })
    }

    /// Path the video was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inspect the cached metadata for conditions that will make sampling
    /// unreliable. Does not re-read the file.
    pub fn validate(&self) -> ValidationReport {
        validate_metadata(&self.metadata)
    }

    /// Release the demuxer and decoder now rather than at end of scope.
    pub fn close(self) {
        drop(self);
    }

    /// Seek, then decode forward to the first frame at or after
    /// `frame_number`.
    ///
    /// Returns `Ok(None)` when the stream ends before that frame.
    fn decode_frame(&mut self, frame_number: u64) -> Result<Option<Frame>, SlideError> {
        let frames_per_second = self.metadata.frames_per_second;
        let (width, height) = (self.metadata.width, self.metadata.height);
        let time_base = self.time_base;

        // Land on the keyframe at or before the target.
        let seek_timestamp =
            utilities::frame_number_to_seek_timestamp(frame_number, frames_per_second);
        log::debug!("Seeking to frame {frame_number} ({seek_timestamp} us)");
        self.input_context.seek(seek_timestamp, ..seek_timestamp)?;
        self.decoder.flush();

        let mut decoded_frame = VideoFrame::empty();
        // A seek to zero lands on the first frame, so untimed frames can be
        // counted from there.
        let mut next_expected = (seek_timestamp == 0).then_some(0);

        for (stream, packet) in self.input_context.packets() {
            if stream.index() != self.stream_index {
                continue;
            }

            self.decoder.send_packet(&packet)?;

            while self.decoder.receive_frame(&mut decoded_frame).is_ok() {
                let Some(current) =
                    position_of(&decoded_frame, &mut next_expected, time_base, frames_per_second)
                else {
                    continue;
                };

                if current >= frame_number {
                    let image = convert_to_rgb(&mut self.scaler, &decoded_frame, width, height)?;
                    return Ok(Some(Frame::new(
                        frame_number,
                        self.metadata.timestamp_of(frame_number),
                        image,
                    )));
                }
            }
        }

        // Drain frames still buffered in the decoder.
        self.decoder.send_eof()?;
        while self.decoder.receive_frame(&mut decoded_frame).is_ok() {
            let Some(current) =
                position_of(&decoded_frame, &mut next_expected, time_base, frames_per_second)
            else {
                continue;
            };

            if current >= frame_number {
                let image = convert_to_rgb(&mut self.scaler, &decoded_frame, width, height)?;
                return Ok(Some(Frame::new(
                    frame_number,
                    self.metadata.timestamp_of(frame_number),
                    image,
                )));
            }
        }

        Ok(None)
    }
}

impl FrameSource for VideoFile {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn read_frame(&mut self, frame_number: u64) -> Option<Frame> {
        match self.decode_frame(frame_number) {
            Ok(Some(frame)) => Some(frame),
            Ok(None) => {
                log::debug!(
                    "Stream ended before frame {frame_number} in {}",
                    self.path.display(),
                );
                None
            }
            Err(error) => {
                log::warn!(
                    "Failed to read frame {frame_number} from {}: {error}",
                    self.path.display(),
                );
                None
            }
        }
    }
}

impl Drop for VideoFile {
    fn drop(&mut self) {
        log::debug!("Closed video: {}", self.path.display());
    }
}

/// Frame number of `decoded_frame`, advancing `next_expected` past it.
///
/// Frames with no timestamp whose position cannot be inferred are skipped.
fn position_of(
    decoded_frame: &VideoFrame,
    next_expected: &mut Option<u64>,
    time_base: Rational,
    frames_per_second: f64,
) -> Option<u64> {
    let timestamp = decoded_frame.timestamp().or_else(|| decoded_frame.pts());
    let position =
        utilities::decoded_frame_number(timestamp, *next_expected, time_base, frames_per_second);
    match position {
        Some(current) => *next_expected = Some(current + 1),
        None => log::debug!("Skipping decoded frame without a timestamp"),
    }
    position
}

/// Convert a decoded frame to a packed RGB image.
fn convert_to_rgb(
    scaler: &mut ScalingContext,
    decoded_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<RgbImage, SlideError> {
    let mut rgb_frame = VideoFrame::empty();
    scaler.run(decoded_frame, &mut rgb_frame)?;
    let buffer = utilities::frame_to_rgb_buffer(&rgb_frame, width, height);
    RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        SlideError::VideoDecodeError(
            "decoded frame is smaller than the stream dimensions".to_string(),
        )
    })
}
