use super::*;

#[test]
fn aspect_presets_map_to_expected_canvases() {
    let dims = |s: &str| {
        let c = AspectRatio::parse_lenient(s).canvas();
        (c.width, c.height)
    };
    assert_eq!(dims("16:9"), (1920, 1080));
    assert_eq!(dims("1:1"), (1080, 1080));
    assert_eq!(dims("9:16"), (1080, 1920));
    assert_eq!(dims("unknown"), (1920, 1080));
    assert_eq!(dims(""), (1920, 1080));
}

#[test]
fn aspect_round_trips_through_as_str() {
    for a in [
        AspectRatio::Square,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
    ] {
        assert_eq!(AspectRatio::parse_lenient(a.as_str()), a);
    }
}

#[test]
fn canvas_rejects_zero_sides() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert_eq!(Canvas::new(4, 2).unwrap().rgba_len(), 32);
}

#[test]
fn solid_frame_fills_every_pixel() {
    let f = RgbaFrame::solid(Canvas::new(3, 2).unwrap(), Rgb8::CHROMA_GREEN);
    assert_eq!(f.data.len(), 24);
    assert!(f.pixels().all(|px| px == [0, 255, 0]));
}

#[test]
fn frame_new_checks_buffer_length() {
    assert!(RgbaFrame::new(2, 2, vec![0; 15]).is_err());
    assert!(RgbaFrame::new(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn coerce_duration_rejects_nan_inf_and_negative() {
    assert_eq!(coerce_duration(2.5), Some(2.5));
    assert_eq!(coerce_duration(0.0), Some(0.0));
    assert_eq!(coerce_duration(f64::NAN), None);
    assert_eq!(coerce_duration(f64::INFINITY), None);
    assert_eq!(coerce_duration(-1.0), None);
}
