//! Error handling integration tests for FFmpeg-backed sources.
//!
//! Tests that need a real video skip when `tests/fixtures/sample_video.mp4`
//! is absent.

use std::path::Path;

use slidesift::{FrameSource, SlideError, SlideExtractor, SlideOptions, VideoFile};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

#[test]
fn open_nonexistent_file() {
    let result = VideoFile::open("this_file_does_not_exist.mp4");
    let error = result.unwrap_err();
    assert!(matches!(error, SlideError::SourceUnopenable { .. }));

    let error_message = error.to_string();
    assert!(
        error_message.contains("Failed to open video"),
        "Error message should mention open failure: {error_message}",
    );
    assert!(error_message.contains("this_file_does_not_exist.mp4"));
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a video file")
        .expect("Failed to write invalid file");

    let result = VideoFile::open(&invalid_file_path);
    assert!(matches!(result, Err(SlideError::SourceUnopenable { .. })));
}

#[test]
fn extract_surfaces_unopenable_source() {
    let extractor = SlideExtractor::new(SlideOptions::new()).unwrap();
    let result = extractor.extract("this_file_does_not_exist.mp4");
    assert!(matches!(result, Err(SlideError::SourceUnopenable { .. })));
}

#[test]
fn read_past_end_is_end_of_stream() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let mut video = VideoFile::open(SAMPLE_VIDEO).expect("Failed to open test video");
    let past_end = video.metadata().frame_count + 10_000;
    assert!(video.read_frame(past_end).is_none());
}

#[test]
fn sample_video_metadata_is_usable() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let mut video = VideoFile::open(SAMPLE_VIDEO).expect("Failed to open test video");
    let metadata = video.metadata().clone();
    assert!(metadata.width > 0 && metadata.height > 0);
    assert!(metadata.frames_per_second > 0.0);
    assert!(video.validate().is_valid());

    let frame = video.read_frame(0).expect("first frame should decode");
    assert_eq!((frame.width(), frame.height()), (metadata.width, metadata.height));
    assert_eq!(frame.frame_number(), 0);
    video.close();
}

#[test]
fn sample_video_extracts_at_least_one_slide() {
    if !Path::new(SAMPLE_VIDEO).exists() {
        return;
    }

    let extractor = SlideExtractor::new(SlideOptions::new()).unwrap();
    let deck = extractor.extract(SAMPLE_VIDEO).expect("extraction should succeed");
    assert!(!deck.is_empty());
    assert_eq!(deck.slides[0].frame_number(), 0);
}
