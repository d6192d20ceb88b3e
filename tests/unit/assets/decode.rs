use std::io::Cursor;

use super::*;

fn encode_png(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_still_resizes_to_canvas() {
    let img = image::RgbaImage::from_pixel(3, 5, image::Rgba([10, 200, 30, 255]));
    let canvas = Canvas::new(8, 4).unwrap();
    let frame = decode_still(&encode_png(img), canvas, Rgb8::BLACK).unwrap();
    assert_eq!((frame.width, frame.height), (8, 4));
    assert_eq!(frame.data.len(), canvas.rgba_len());
    assert!(frame.pixels().all(|px| px == [10, 200, 30]));
}

#[test]
fn decode_still_flattens_alpha_over_background() {
    let img = image::RgbaImage::from_raw(1, 1, vec![255, 0, 0, 128]).unwrap();
    let canvas = Canvas::new(1, 1).unwrap();
    let frame = decode_still(&encode_png(img), canvas, Rgb8::BLACK).unwrap();
    assert_eq!(frame.data, vec![128, 0, 0, 255]);
}

#[test]
fn decode_still_rejects_garbage() {
    let canvas = Canvas::new(2, 2).unwrap();
    assert!(decode_still(b"definitely not an image", canvas, Rgb8::BLACK).is_err());
}

#[test]
fn load_still_reports_missing_file() {
    let canvas = Canvas::new(2, 2).unwrap();
    let err = load_still(Path::new("/nonexistent/reelkit/A1.png"), canvas, Rgb8::BLACK)
        .unwrap_err();
    assert!(format!("{err:#}").contains("A1.png"));
}
