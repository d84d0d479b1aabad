//! Option validation integration tests.

use std::time::Duration;

use slidesift::{MaskPosition, SlideError, SlideExtractor, SlideOptions};

#[test]
fn extractor_accepts_defaults() {
    let extractor = SlideExtractor::new(SlideOptions::default()).expect("defaults are valid");
    assert_eq!(extractor.options().interval(), Duration::from_secs(10));
    assert_eq!(extractor.options().mask_position(), MaskPosition::BottomLeft);
}

#[test]
fn extractor_rejects_out_of_range_mask_size() {
    let result = SlideExtractor::new(SlideOptions::new().with_mask_size_percent(75));
    let error = result.unwrap_err();
    assert!(matches!(
        error,
        SlideError::InvalidOption {
            name: "mask_size_percent",
            ..
        }
    ));
    assert!(error.to_string().contains("between 10 and 50"));
}

#[test]
fn extractor_rejects_zero_interval() {
    let result = SlideExtractor::new(SlideOptions::new().with_interval(Duration::ZERO));
    assert!(matches!(
        result,
        Err(SlideError::InvalidOption { name: "interval", .. })
    ));
}

#[test]
fn extractor_rejects_negative_threshold() {
    let result = SlideExtractor::new(SlideOptions::new().with_threshold(-1.0));
    assert!(result.is_err());
}

#[test]
fn mask_position_parses_cli_spellings() {
    assert_eq!("bottom-left".parse::<MaskPosition>(), Ok(MaskPosition::BottomLeft));
    assert_eq!("bottom-right".parse::<MaskPosition>(), Ok(MaskPosition::BottomRight));
    assert_eq!("none".parse::<MaskPosition>(), Ok(MaskPosition::None));
    assert!("center".parse::<MaskPosition>().is_err());
}

#[test]
fn options_debug_omits_callback() {
    let rendered = format!("{:?}", SlideOptions::new());
    assert!(rendered.contains("threshold: 5.0"));
    assert!(!rendered.contains("progress"));
}
