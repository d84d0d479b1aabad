//! Internal utility functions.
//!
//! Helpers for pixel-data copying and timestamp conversion shared by the
//! FFmpeg-backed frame source.

use ffmpeg_next::{Rational, frame::Video as VideoFrame};

/// Copy an RGB24 FFmpeg frame into a tightly-packed buffer.
///
/// FFmpeg rows frequently carry padding (stride > width × 3); this strips
/// it so the result can go straight into [`image::RgbImage::from_raw`].
pub(crate) fn frame_to_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_bytes = (width as usize) * 3;
    let data = video_frame.data(0);

    if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    }
}

/// Rescale a PTS value from stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    if time_base.denominator() == 0 {
        return 0.0;
    }
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Rescale a PTS value to a frame number at `frames_per_second`.
///
/// Rounds to the nearest frame so that PTS values a hair below an exact
/// frame boundary map onto it. Negative PTS clamp to frame zero.
pub(crate) fn pts_to_frame_number(pts: i64, time_base: Rational, frames_per_second: f64) -> u64 {
    let frame = (pts_to_seconds(pts, time_base) * frames_per_second).round();
    if frame > 0.0 { frame as u64 } else { 0 }
}

/// Frame number of a decoded frame.
///
/// Uses the frame's timestamp when it has one. Otherwise the frame is assumed
/// to directly follow the previous decoded frame, which is only known once
/// some frame since the seek carried a timestamp (or the seek went to the
/// start of the stream). Returns `None` when neither is available.
pub(crate) fn decoded_frame_number(
    timestamp: Option<i64>,
    next_expected: Option<u64>,
    time_base: Rational,
    frames_per_second: f64,
) -> Option<u64> {
    match timestamp {
        Some(pts) => Some(pts_to_frame_number(pts, time_base, frames_per_second)),
        None => next_expected,
    }
}

/// Convert a frame number to a container seek timestamp in AV_TIME_BASE
/// (microseconds).
///
/// `Input::seek` with no stream selected expects AV_TIME_BASE units, not the
/// stream time base.
pub(crate) fn frame_number_to_seek_timestamp(frame_number: u64, frames_per_second: f64) -> i64 {
    let seconds = frame_number as f64 / frames_per_second;
    (seconds * 1_000_000.0) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pts_maps_to_nearest_frame() {
        let time_base = Rational::new(1, 90_000);
        assert_eq!(pts_to_frame_number(0, time_base, 30.0), 0);
        assert_eq!(pts_to_frame_number(900_000, time_base, 30.0), 300);
        // One tick short of frame 300.
        assert_eq!(pts_to_frame_number(899_999, time_base, 30.0), 300);
        assert_eq!(pts_to_frame_number(-3_000, time_base, 30.0), 0);
    }

    #[test]
    fn untimed_frames_follow_their_predecessor() {
        let time_base = Rational::new(1, 90_000);
        assert_eq!(decoded_frame_number(Some(900_000), None, time_base, 30.0), Some(300));
        assert_eq!(decoded_frame_number(Some(900_000), Some(7), time_base, 30.0), Some(300));
        assert_eq!(decoded_frame_number(None, Some(301), time_base, 30.0), Some(301));
        assert_eq!(decoded_frame_number(None, None, time_base, 30.0), None);
    }

    #[test]
    fn zero_time_base_is_harmless() {
        assert_eq!(pts_to_seconds(1234, Rational::new(1, 0)), 0.0);
    }

    #[test]
    fn seek_timestamp_is_microseconds() {
        assert_eq!(frame_number_to_seek_timestamp(300, 30.0), 10_000_000);
        assert_eq!(frame_number_to_seek_timestamp(0, 25.0), 0);
    }
}
