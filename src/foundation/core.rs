use crate::foundation::error::{ReelError, ReelResult};

/// Output frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> ReelResult<Self> {
        if width == 0 || height == 0 {
            return Err(ReelError::validation("canvas width/height must be non-zero"));
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn rgba_len(self) -> usize {
        self.pixel_count() * 4
    }
}

/// Output presets accepted by the engine.
///
/// Unknown preset strings resolve to [`AspectRatio::Landscape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    /// `1:1`, 1080x1080.
    Square,
    /// `16:9`, 1920x1080.
    Landscape,
    /// `9:16`, 1080x1920.
    Portrait,
}

impl AspectRatio {
    pub fn parse_lenient(preset: &str) -> Self {
        match preset.trim() {
            "1:1" => Self::Square,
            "16:9" => Self::Landscape,
            "9:16" => Self::Portrait,
            other => {
                tracing::debug!(preset = other, "unknown aspect ratio preset, using 16:9");
                Self::Landscape
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }

    pub fn canvas(self) -> Canvas {
        let (width, height) = match self {
            Self::Square => (1080, 1080),
            Self::Landscape => (1920, 1080),
            Self::Portrait => (1080, 1920),
        };
        Canvas { width, height }
    }
}

/// Straight-alpha RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8(pub [u8; 3]);

impl Rgb8 {
    pub const CHROMA_GREEN: Self = Self([0, 255, 0]);
    pub const BLACK: Self = Self([0, 0, 0]);

    pub fn to_rgba(self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], 255]
    }
}

/// One opaque RGBA8 frame, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> ReelResult<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ReelError::validation(format!(
                "frame buffer has {} bytes, expected {expected} for {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn solid(canvas: Canvas, color: Rgb8) -> Self {
        let px = color.to_rgba();
        let mut data = Vec::with_capacity(canvas.rgba_len());
        for _ in 0..canvas.pixel_count() {
            data.extend_from_slice(&px);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(4).map(|px| [px[0], px[1], px[2]])
    }
}

/// Coerce a clip duration to a finite, non-negative number of seconds.
///
/// Returns `None` when the value had to be replaced by `0.0`.
pub fn coerce_duration(sec: f64) -> Option<f64> {
    if sec.is_finite() && sec >= 0.0 {
        Some(sec)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
