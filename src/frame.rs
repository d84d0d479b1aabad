//! Decoded video frames.

use std::time::Duration;

use image::{GrayImage, RgbImage};

/// A single decoded RGB frame sampled from a video.
///
/// Frames are produced by a [`FrameSource`](crate::FrameSource) and compared
/// by the [`DifferenceScorer`](crate::DifferenceScorer) on their luminance.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    frame_number: u64,
    timestamp: Duration,
    image: RgbImage,
}

impl Frame {
    /// Wrap an RGB image sampled at `frame_number` / `timestamp`.
    pub fn new(frame_number: u64, timestamp: Duration, image: RgbImage) -> Self {
        Self {
            frame_number,
            timestamp,
            image,
        }
    }

    /// Zero-based position of this frame in the source video.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Presentation time of this frame.
    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the RGB pixels.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Consume the frame, returning its pixels.
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Single-channel luminance using BT.601 weights, rounded to nearest.
    ///
    /// Uses the same 0.299 / 0.587 / 0.114 integer weighting as classic
    /// video tooling rather than [`image::DynamicImage::to_luma8`], which
    /// uses BT.709 coefficients.
    pub fn luma(&self) -> GrayImage {
        let luma: Vec<u8> = self
            .image
            .as_raw()
            .chunks_exact(3)
            .map(|rgb| {
                let weighted =
                    rgb[0] as u32 * 299 + rgb[1] as u32 * 587 + rgb[2] as u32 * 114 + 500;
                (weighted / 1000) as u8
            })
            .collect();

        // Length is width * height by construction.
        GrayImage::from_raw(self.image.width(), self.image.height(), luma)
            .unwrap_or_else(|| GrayImage::new(self.image.width(), self.image.height()))
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn luma_of_primaries() {
        let mut image = RgbImage::new(3, 1);
        image.put_pixel(0, 0, Rgb([255, 0, 0]));
        image.put_pixel(1, 0, Rgb([0, 255, 0]));
        image.put_pixel(2, 0, Rgb([0, 0, 255]));
        let frame = Frame::new(0, Duration::ZERO, image);

        let luma = frame.luma();
        assert_eq!(luma.get_pixel(0, 0).0[0], 76);
        assert_eq!(luma.get_pixel(1, 0).0[0], 150);
        assert_eq!(luma.get_pixel(2, 0).0[0], 29);
    }

    #[test]
    fn luma_of_white_is_white() {
        let image = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        let frame = Frame::new(7, Duration::from_secs(1), image);

        assert!(frame.luma().pixels().all(|p| p.0[0] == 255));
        assert_eq!(frame.frame_number(), 7);
        assert_eq!((frame.width(), frame.height()), (4, 4));
    }
}
