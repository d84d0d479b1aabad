//! Append-only storage for retained slides.

use std::time::Duration;

use image::RgbImage;

use crate::frame::Frame;

/// A slide kept by the sampling loop.
///
/// The pixels are immutable once stored; only accessors are exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedFrame {
    index: usize,
    frame: Frame,
}

impl RetainedFrame {
    /// Zero-based position in retention order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Position of the frame in the source video.
    pub fn frame_number(&self) -> u64 {
        self.frame.frame_number()
    }

    pub fn timestamp(&self) -> Duration {
        self.frame.timestamp()
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    pub fn image(&self) -> &RgbImage {
        self.frame.image()
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

/// Ordered, append-only collection of [`RetainedFrame`]s.
///
/// Indices are contiguous from zero and follow call order. There is no way
/// to remove or mutate an entry.
#[derive(Debug, Clone, Default)]
pub struct RetainedFrameStore {
    frames: Vec<RetainedFrame>,
}

impl RetainedFrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `frame` and return its sequence index.
    pub fn append(&mut self, frame: Frame) -> usize {
        let index = self.frames.len();
        self.frames.push(RetainedFrame { index, frame });
        index
    }

    /// All retained frames in retention order.
    pub fn all(&self) -> &[RetainedFrame] {
        &self.frames
    }

    pub fn count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The most recently retained frame, if any.
    pub fn last(&self) -> Option<&RetainedFrame> {
        self.frames.last()
    }

    /// Hand the sequence over to a consumer.
    pub fn into_frames(self) -> Vec<RetainedFrame> {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    fn frame(frame_number: u64) -> Frame {
        Frame::new(
            frame_number,
            Duration::from_secs(frame_number),
            RgbImage::from_pixel(2, 2, Rgb([frame_number as u8, 0, 0])),
        )
    }

    #[test]
    fn indices_follow_append_order() {
        let mut store = RetainedFrameStore::new();
        assert!(store.is_empty());

        assert_eq!(store.append(frame(40)), 0);
        assert_eq!(store.append(frame(10)), 1);
        assert_eq!(store.append(frame(20)), 2);

        assert_eq!(store.count(), 3);
        let numbers: Vec<u64> = store.all().iter().map(|f| f.frame_number()).collect();
        assert_eq!(numbers, vec![40, 10, 20]);
        let indices: Vec<usize> = store.all().iter().map(|f| f.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn into_frames_preserves_order() {
        let mut store = RetainedFrameStore::new();
        store.append(frame(1));
        store.append(frame(2));
        assert_eq!(store.last().map(|f| f.frame_number()), Some(2));

        let frames = store.into_frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].image().get_pixel(0, 0).0, [1, 0, 0]);
        assert_eq!(frames[1].timestamp(), Duration::from_secs(2));
    }
}
