//! In-memory frame sources shared by the integration tests.

#![allow(dead_code)]

use std::time::Duration;

use image::{Rgb, RgbImage};
use slidesift::{Frame, FrameSource, VideoMetadata};

/// Produces frames from a closure and records which positions were read.
pub struct ScriptedSource<F> {
    metadata: VideoMetadata,
    render: F,
    fail_from: Option<u64>,
    pub requested: Vec<u64>,
}

impl<F: FnMut(u64) -> RgbImage> ScriptedSource<F> {
    pub fn new(width: u32, height: u32, frames_per_second: f64, frame_count: u64, render: F) -> Self {
        Self {
            metadata: VideoMetadata::new(width, height, frames_per_second, frame_count),
            render,
            fail_from: None,
            requested: Vec::new(),
        }
    }

    /// Make every read at or after `frame_number` fail.
    pub fn failing_from(mut self, frame_number: u64) -> Self {
        self.fail_from = Some(frame_number);
        self
    }
}

impl<F: FnMut(u64) -> RgbImage> FrameSource for ScriptedSource<F> {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn read_frame(&mut self, frame_number: u64) -> Option<Frame> {
        self.requested.push(frame_number);
        if self.fail_from.is_some_and(|fail_from| frame_number >= fail_from) {
            return None;
        }
        let image = (self.render)(frame_number);
        Some(Frame::new(
            frame_number,
            Duration::from_secs_f64(frame_number as f64 / self.metadata.frames_per_second),
            image,
        ))
    }
}

/// A uniformly grey image.
pub fn solid(width: u32, height: u32, value: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([value, value, value]))
}

/// A grey image with `rect` (x, y, w, h) painted in `fill`.
pub fn with_patch(
    width: u32,
    height: u32,
    background: u8,
    (x, y, w, h): (u32, u32, u32, u32),
    fill: [u8; 3],
) -> RgbImage {
    let mut image = solid(width, height, background);
    for py in y..(y + h).min(height) {
        for px in x..(x + w).min(width) {
            image.put_pixel(px, py, Rgb(fill));
        }
    }
    image
}
