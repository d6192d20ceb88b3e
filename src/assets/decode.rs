use std::path::Path;

use anyhow::Context as _;
use image::imageops::FilterType;

use crate::foundation::core::{Canvas, Rgb8, RgbaFrame};
use crate::foundation::error::ReelResult;

/// Decode an encoded image and stretch it to exactly `canvas`.
///
/// Transparent pixels are flattened over `bg`, so the result is always opaque.
pub fn decode_still(bytes: &[u8], canvas: Canvas, bg: Rgb8) -> ReelResult<RgbaFrame> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let resized = if dyn_img.width() == canvas.width && dyn_img.height() == canvas.height {
        dyn_img
    } else {
        dyn_img.resize_exact(canvas.width, canvas.height, FilterType::Lanczos3)
    };
    let mut rgba = resized.to_rgba8().into_raw();
    flatten_over_bg_in_place(&mut rgba, bg);
    RgbaFrame::new(canvas.width, canvas.height, rgba)
}

pub fn load_still(path: &Path, canvas: Canvas, bg: Rgb8) -> ReelResult<RgbaFrame> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_still(&bytes, canvas, bg)
        .with_context(|| format!("render image '{}'", path.display()))
        .map_err(Into::into)
}

fn flatten_over_bg_in_place(rgba: &mut [u8], bg: Rgb8) {
    let [bg_r, bg_g, bg_b] = bg.0.map(u16::from);
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        px[0] = (mul_div255(u16::from(px[0]), a) + mul_div255(bg_r, inv)).min(255) as u8;
        px[1] = (mul_div255(u16::from(px[1]), a) + mul_div255(bg_g, inv)).min(255) as u8;
        px[2] = (mul_div255(u16::from(px[2]), a) + mul_div255(bg_b, inv)).min(255) as u8;
        px[3] = 255;
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
