use std::path::PathBuf;

use crate::foundation::core::{Canvas, RgbaFrame};
use crate::foundation::error::ReelResult;

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug)]
pub struct SinkConfig {
    pub canvas: Canvas,
    pub fps: u32,
    /// Optional raw PCM audio muxed next to the video stream.
    pub audio: Option<AudioInputConfig>,
}

/// Interleaved `f32le` PCM file fed to the encoder as the audio stream.
#[derive(Clone, Debug)]
pub struct AudioInputConfig {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Consumer of rendered frames in timeline order.
///
/// `push_frame` is called with strictly increasing frame indices. Dropping a sink without calling
/// `end` must release every resource it holds.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    fn push_frame(&mut self, idx: u64, frame: &RgbaFrame) -> ReelResult<()>;
    fn end(&mut self) -> ReelResult<()>;
}
