use std::path::Path;

use anyhow::Context as _;

use crate::chroma::hsv::GreenBand;
use crate::foundation::core::{AspectRatio, Canvas, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};

/// Settings for one engine invocation.
///
/// Every field has a default, so a partial JSON document (or `{}`) is a valid config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Aspect preset (`1:1`, `16:9`, `9:16`); anything else resolves to `16:9`.
    pub aspect_ratio: String,
    pub fps: u32,
    pub separator_duration_sec: f64,
    pub separator_color: Rgb8,
    /// Replace an existing output file instead of failing.
    pub overwrite: bool,
    pub chroma: ChromaConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: "9:16".to_string(),
            fps: 30,
            separator_duration_sec: 5.0,
            separator_color: Rgb8::CHROMA_GREEN,
            overwrite: true,
            chroma: ChromaConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| ReelError::config(format!("parse '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.fps == 0 {
            return Err(ReelError::validation("fps must be a positive integer"));
        }
        if !(self.separator_duration_sec.is_finite() && self.separator_duration_sec > 0.0) {
            return Err(ReelError::validation(format!(
                "separator duration must be a positive number of seconds (got {})",
                self.separator_duration_sec
            )));
        }
        self.chroma.validate()
    }

    pub fn aspect(&self) -> AspectRatio {
        AspectRatio::parse_lenient(&self.aspect_ratio)
    }

    pub fn canvas(&self) -> Canvas {
        self.aspect().canvas()
    }
}

/// Green-screen scan settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ChromaConfig {
    pub sample_interval_sec: f64,
    /// Fraction of green pixels a frame must exceed, in `(0, 1]`.
    pub green_threshold: f64,
    pub band: GreenBand,
}

impl Default for ChromaConfig {
    fn default() -> Self {
        Self {
            sample_interval_sec: 2.0,
            green_threshold: 0.8,
            band: GreenBand::default(),
        }
    }
}

impl ChromaConfig {
    pub fn validate(&self) -> ReelResult<()> {
        if !(self.sample_interval_sec.is_finite() && self.sample_interval_sec > 0.0) {
            return Err(ReelError::validation(format!(
                "sample interval must be a positive number of seconds (got {})",
                self.sample_interval_sec
            )));
        }
        if !(self.green_threshold > 0.0 && self.green_threshold <= 1.0) {
            return Err(ReelError::validation(format!(
                "green threshold must be in (0, 1] (got {})",
                self.green_threshold
            )));
        }
        self.band.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
