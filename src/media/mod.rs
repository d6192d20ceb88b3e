//! The media capability: still decoding, audio/video probing and decoding, and output sinks.
//!
//! The engine only talks to [`MediaBackend`]. A concrete backend is chosen once by the caller
//! (normally [`FfmpegMedia::detect`]) and passed into every invocation.

mod ffmpeg;

pub use ffmpeg::FfmpegMedia;

use std::path::{Path, PathBuf};

use crate::encode::sink::FrameSink;
use crate::foundation::core::{Canvas, Rgb8, RgbaFrame};
use crate::foundation::error::ReelResult;

/// Probed properties of an audio file.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSourceInfo {
    pub path: PathBuf,
    pub duration_sec: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Decoded interleaved PCM.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.interleaved_f32.len() / usize::from(self.channels)
        }
    }

    pub fn duration_sec(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / f64::from(self.sample_rate)
        }
    }
}

/// Probed properties of a video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
}

impl VideoSourceInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

/// Uniform interface over whatever codec stack the process resolved at startup.
pub trait MediaBackend {
    /// Decode a still image stretched to `canvas`, alpha flattened over `bg`.
    fn load_still(&self, path: &Path, canvas: Canvas, bg: Rgb8) -> ReelResult<RgbaFrame> {
        crate::assets::decode::load_still(path, canvas, bg)
    }

    fn probe_audio(&self, path: &Path) -> ReelResult<AudioSourceInfo>;

    /// Decode the whole file, keeping the probed sample rate and channel layout.
    fn decode_audio(&self, source: &AudioSourceInfo) -> ReelResult<AudioPcm>;

    fn probe_video(&self, path: &Path) -> ReelResult<VideoSourceInfo>;

    fn decode_video_frame(&self, source: &VideoSourceInfo, time_sec: f64)
    -> ReelResult<RgbaFrame>;

    /// Open a sink writing to `out_path`. Nothing is written until `begin`.
    fn open_sink(&self, out_path: &Path, overwrite: bool) -> ReelResult<Box<dyn FrameSink>>;
}

#[cfg(test)]
#[path = "../../tests/unit/media/types.rs"]
mod tests;
