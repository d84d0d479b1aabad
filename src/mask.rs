//! Presenter mask resolution.
//!
//! Lecture recordings often overlay the presenter's camera in a bottom
//! corner. The moving presenter would otherwise register as a slide change
//! on every sample, so that corner is excluded from difference scoring.
//! [`resolve`] turns a named corner and a size percentage into a pixel
//! rectangle once per run.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Smallest accepted mask size, in percent of each frame dimension.
pub const MIN_MASK_SIZE_PERCENT: u32 = 10;
/// Largest accepted mask size, in percent of each frame dimension.
pub const MAX_MASK_SIZE_PERCENT: u32 = 50;

/// Which corner of the frame the presenter occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskPosition {
    /// Presenter in the bottom-left corner. This is the default.
    #[default]
    BottomLeft,
    /// Presenter in the bottom-right corner.
    BottomRight,
    /// No mask; the full frame is compared.
    None,
}

impl Display for MaskPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            MaskPosition::BottomLeft => "bottom-left",
            MaskPosition::BottomRight => "bottom-right",
            MaskPosition::None => "none",
        };
        f.write_str(name)
    }
}

impl FromStr for MaskPosition {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "bottomleft" | "bl" | "left" => Ok(MaskPosition::BottomLeft),
            "bottomright" | "br" | "right" => Ok(MaskPosition::BottomRight),
            "none" | "off" => Ok(MaskPosition::None),
            _ => Err(format!(
                "unknown mask position `{value}` (expected bottom-left, bottom-right or none)"
            )),
        }
    }
}

/// An axis-aligned rectangle in pixel coordinates.
///
/// Produced by [`resolve`]; always lies within the frame it was resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl MaskRect {
    /// Returns `true` if the pixel at `(px, py)` lies inside the rectangle.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && py >= self.y
            && (px - self.x) < self.width
            && (py - self.y) < self.height
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Display for MaskRect {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Compute the region to exclude from comparison.
///
/// Both sides of the rectangle are `floor(dimension * size_percent / 100)`.
/// The caller validates `size_percent`; values above 100 are clamped so the
/// rectangle never leaves the frame.
///
/// # Example
///
/// ```
/// use slidesift::{MaskPosition, MaskRect, mask};
///
/// let rect = mask::resolve(1920, 1080, MaskPosition::BottomRight, 30);
/// assert_eq!(rect, Some(MaskRect { x: 1344, y: 756, width: 576, height: 324 }));
/// ```
pub fn resolve(
    width: u32,
    height: u32,
    position: MaskPosition,
    size_percent: u32,
) -> Option<MaskRect> {
    let size_percent = size_percent.min(100) as u64;
    let mask_width = (width as u64 * size_percent / 100) as u32;
    let mask_height = (height as u64 * size_percent / 100) as u32;

    match position {
        MaskPosition::None => None,
        MaskPosition::BottomLeft => Some(MaskRect {
            x: 0,
            y: height - mask_height,
            width: mask_width,
            height: mask_height,
        }),
        MaskPosition::BottomRight => Some(MaskRect {
            x: width - mask_width,
            y: height - mask_height,
            width: mask_width,
            height: mask_height,
        }),
    }
}
