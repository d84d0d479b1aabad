//! Benchmarks for difference scoring and the sampling loop.
//!
//! Run with: cargo bench

use std::time::Duration;

use criterion::Criterion;
use image::{Rgb, RgbImage};
use slidesift::{
    DifferenceScorer, Frame, FrameSource, MaskPosition, SlideExtractor, SlideOptions,
    VideoMetadata, mask,
};

const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

fn frame(value: u8) -> Frame {
    Frame::new(
        0,
        Duration::ZERO,
        RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([value, value.wrapping_add(40), 200])),
    )
}

/// Renders a new solid frame for every read.
struct SyntheticSource {
    metadata: VideoMetadata,
}

impl FrameSource for SyntheticSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn read_frame(&mut self, frame_number: u64) -> Option<Frame> {
        let value = (frame_number / 900) as u8;
        Some(Frame::new(
            frame_number,
            self.metadata.timestamp_of(frame_number),
            RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([value, value, value])),
        ))
    }
}

fn benchmark_scoring(criterion: &mut Criterion) {
    let first = frame(10);
    let second = frame(90);
    let rect = mask::resolve(WIDTH, HEIGHT, MaskPosition::BottomRight, 30);

    criterion.bench_function("score 1080p (no mask)", |bencher| {
        let scorer = DifferenceScorer::new(5.0, None);
        bencher.iter(|| scorer.score(&first, &second));
    });

    criterion.bench_function("score 1080p (30% mask)", |bencher| {
        let scorer = DifferenceScorer::new(5.0, rect);
        bencher.iter(|| scorer.score(&first, &second));
    });
}

fn benchmark_sampling(criterion: &mut Criterion) {
    let extractor = SlideExtractor::new(SlideOptions::new()).unwrap();

    criterion.bench_function("sample 5 minutes of 1080p at 30 fps", |bencher| {
        bencher.iter(|| {
            let mut source = SyntheticSource {
                metadata: VideoMetadata::new(WIDTH, HEIGHT, 30.0, 9000),
            };
            extractor.extract_from(&mut source)
        });
    });
}

criterion::criterion_group!(benches, benchmark_scoring, benchmark_sampling);
criterion::criterion_main!(benches);
