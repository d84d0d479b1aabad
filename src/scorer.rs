//! Masked frame difference scoring.
//!
//! The score between two frames is the mean absolute difference of their
//! luminance, in the range `0.0..=255.0`. When a presenter mask is active the
//! masked rectangle is overwritten with zero in *both* luminance grids before
//! differencing, so it contributes nothing to the sum while still counting in
//! the denominator. A region that is genuinely black in both frames is
//! indistinguishable from a masked one, which is acceptable for slide
//! content.

use image::GrayImage;

use crate::{frame::Frame, mask::MaskRect};

/// Decides whether a sampled frame differs enough from the last kept one.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use image::{Rgb, RgbImage};
/// use slidesift::{DifferenceScorer, Frame};
///
/// let dark = Frame::new(0, Duration::ZERO, RgbImage::from_pixel(8, 8, Rgb([0, 0, 0])));
/// let grey = Frame::new(1, Duration::ZERO, RgbImage::from_pixel(8, 8, Rgb([10, 10, 10])));
///
/// let scorer = DifferenceScorer::new(5.0, None);
/// assert_eq!(scorer.score(&dark, &grey), 10.0);
/// assert!(scorer.is_different(Some(&dark), Some(&grey)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferenceScorer {
    threshold: f64,
    mask: Option<MaskRect>,
}

impl DifferenceScorer {
    /// Create a scorer that reports a change when the score is strictly
    /// greater than `threshold`.
    pub fn new(threshold: f64, mask: Option<MaskRect>) -> Self {
        Self { threshold, mask }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn mask(&self) -> Option<MaskRect> {
        self.mask
    }

    /// Mean absolute luminance difference between two frames.
    ///
    /// Frames of different dimensions cannot be compared pixel-for-pixel and
    /// score [`f64::INFINITY`]. An empty frame scores `0.0`.
    pub fn score(&self, first: &Frame, second: &Frame) -> f64 {
        if first.width() != second.width() || first.height() != second.height() {
            log::debug!(
                "Frame dimensions differ ({}x{} vs {}x{}), treating as changed",
                first.width(),
                first.height(),
                second.width(),
                second.height(),
            );
            return f64::INFINITY;
        }

        let mut first_luma = first.luma();
        let mut second_luma = second.luma();
        if let Some(rect) = self.mask {
            blank_region(&mut first_luma, rect);
            blank_region(&mut second_luma, rect);
        }

        mean_absolute_difference(&first_luma, &second_luma)
    }

    /// Returns `true` when `current` should be retained over `previous`.
    ///
    /// A missing frame on either side always counts as different, which is
    /// how the first sampled frame of a run is always kept.
    pub fn is_different(&self, previous: Option<&Frame>, current: Option<&Frame>) -> bool {
        match (previous, current) {
            (Some(previous), Some(current)) => self.score(previous, current) > self.threshold,
            _ => true,
        }
    }
}

/// Overwrite `rect` (clipped to the image) with zero.
fn blank_region(luma: &mut GrayImage, rect: MaskRect) {
    let x_end = rect.x.saturating_add(rect.width).min(luma.width());
    let y_end = rect.y.saturating_add(rect.height).min(luma.height());
    if rect.x >= x_end || rect.y >= y_end {
        return;
    }

    let row_stride = luma.width() as usize;
    let buffer: &mut [u8] = luma;
    for y in rect.y..y_end {
        let row_start = y as usize * row_stride;
        buffer[row_start + rect.x as usize..row_start + x_end as usize].fill(0);
    }
}

fn mean_absolute_difference(first: &GrayImage, second: &GrayImage) -> f64 {
    let pixel_count = first.as_raw().len();
    if pixel_count == 0 {
        return 0.0;
    }

    let sum: u64 = first
        .as_raw()
        .iter()
        .zip(second.as_raw())
        .map(|(&a, &b)| a.abs_diff(b) as u64)
        .sum();

    sum as f64 / pixel_count as f64
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use image::{Luma, Rgb, RgbImage};

    use super::*;

    fn solid(width: u32, height: u32, value: u8) -> Frame {
        Frame::new(
            0,
            Duration::ZERO,
            RgbImage::from_pixel(width, height, Rgb([value, value, value])),
        )
    }

    #[test]
    fn blank_region_clips_to_image() {
        let mut luma = GrayImage::from_pixel(4, 4, Luma([9]));
        blank_region(
            &mut luma,
            MaskRect {
                x: 2,
                y: 3,
                width: 10,
                height: 10,
            },
        );
        let zeroed = luma.pixels().filter(|p| p.0[0] == 0).count();
        assert_eq!(zeroed, 2);
        assert_eq!(luma.get_pixel(3, 3).0[0], 0);
        assert_eq!(luma.get_pixel(1, 3).0[0], 9);
    }

    #[test]
    fn masked_area_still_counts_in_denominator() {
        // Half the frame is masked; the other half differs by 20.
        let first = solid(4, 2, 0);
        let second = solid(4, 2, 20);
        let mask = MaskRect {
            x: 0,
            y: 1,
            width: 4,
            height: 1,
        };

        let scorer = DifferenceScorer::new(0.0, Some(mask));
        assert_eq!(scorer.score(&first, &second), 10.0);
    }

    #[test]
    fn mismatched_dimensions_are_different() {
        let scorer = DifferenceScorer::new(50.0, None);
        let small = solid(2, 2, 0);
        let large = solid(3, 2, 0);
        assert!(scorer.score(&small, &large).is_infinite());
        assert!(scorer.is_different(Some(&small), Some(&large)));
    }

    #[test]
    fn empty_frames_score_zero() {
        let scorer = DifferenceScorer::new(0.0, None);
        let empty = solid(0, 0, 0);
        assert_eq!(scorer.score(&empty, &empty), 0.0);
    }

    #[test]
    fn absent_frame_is_always_different() {
        let scorer = DifferenceScorer::new(255.0, None);
        let frame = solid(2, 2, 1);
        assert!(scorer.is_different(None, Some(&frame)));
        assert!(scorer.is_different(Some(&frame), None));
        assert!(scorer.is_different(None, None));
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let scorer = DifferenceScorer::new(10.0, None);
        assert!(!scorer.is_different(Some(&solid(2, 2, 0)), Some(&solid(2, 2, 10))));
        assert!(scorer.is_different(Some(&solid(2, 2, 0)), Some(&solid(2, 2, 11))));
    }
}
