use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{ReelError, ReelResult};

/// Normalized HSV triple. All components are in `[0, 1]`; hue is degrees / 360.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

/// Convert normalized RGB (`[0, 1]` per channel) to [`Hsv`].
///
/// Ties between channels at the maximum resolve blue over green over red.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> Hsv {
    let cmax = r.max(g).max(b);
    let cmin = r.min(g).min(b);
    let delta = cmax - cmin;

    let mut h = 0.0f32;
    if delta > 0.0 {
        if cmax == r {
            h = (60.0 * (g - b) / delta + 360.0).rem_euclid(360.0);
        }
        if cmax == g {
            h = (60.0 * (b - r) / delta + 120.0).rem_euclid(360.0);
        }
        if cmax == b {
            h = (60.0 * (r - g) / delta + 240.0).rem_euclid(360.0);
        }
    }

    let s = if cmax > 0.0 { delta / cmax } else { 0.0 };
    Hsv {
        h: h / 360.0,
        s,
        v: cmax,
    }
}

pub fn rgb8_to_hsv(px: [u8; 3]) -> Hsv {
    rgb_to_hsv(
        f32::from(px[0]) / 255.0,
        f32::from(px[1]) / 255.0,
        f32::from(px[2]) / 255.0,
    )
}

/// Inclusive HSV band a pixel must fall into to count as chroma-key green.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GreenBand {
    pub hue: [f32; 2],
    pub saturation: [f32; 2],
    pub value: [f32; 2],
}

impl Default for GreenBand {
    fn default() -> Self {
        Self {
            hue: [0.222, 0.444],
            saturation: [0.196, 1.0],
            value: [0.196, 1.0],
        }
    }
}

impl GreenBand {
    pub fn validate(&self) -> ReelResult<()> {
        for (name, [lo, hi]) in [
            ("hue", self.hue),
            ("saturation", self.saturation),
            ("value", self.value),
        ] {
            if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
                return Err(ReelError::validation(format!(
                    "green band {name} bounds must satisfy 0 <= lo <= hi <= 1 (got [{lo}, {hi}])"
                )));
            }
        }
        Ok(())
    }

    pub fn contains(&self, hsv: Hsv) -> bool {
        in_range(hsv.h, self.hue) && in_range(hsv.s, self.saturation) && in_range(hsv.v, self.value)
    }
}

fn in_range(x: f32, [lo, hi]: [f32; 2]) -> bool {
    x >= lo && x <= hi
}

/// Fraction of pixels in `frame` that fall inside `band`.
pub fn green_fraction(frame: &RgbaFrame, band: &GreenBand) -> f64 {
    let total = frame.canvas().pixel_count();
    if total == 0 {
        return 0.0;
    }
    let green = frame
        .pixels()
        .filter(|&px| band.contains(rgb8_to_hsv(px)))
        .count();
    green as f64 / total as f64
}

/// A frame is green screen when its green fraction strictly exceeds `threshold`.
pub fn is_green_frame(frame: &RgbaFrame, band: &GreenBand, threshold: f64) -> bool {
    green_fraction(frame, band) > threshold
}

#[cfg(test)]
#[path = "../../tests/unit/chroma/hsv.rs"]
mod tests;
