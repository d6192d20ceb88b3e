#![forbid(unsafe_code)]
//! Image-sequence timeline composition and chroma-key interval detection.
//!
//! Stills are grouped by filename prefix, stretched to the reference audio length, joined with
//! solid separators, and encoded through the system `ffmpeg`. The chroma module scans a finished
//! video for green-screen stretches.

pub mod assets;
pub mod audio;
pub mod chroma;
pub mod config;
pub mod encode;
pub mod foundation;
pub mod media;
pub mod pipeline;
pub mod progress;
pub mod timeline;

pub use assets::formats::{is_supported_audio, is_supported_image, validate_inputs};
pub use assets::group::{AssetGroups, ImageAsset, display_name, group_images};
pub use audio::track::{AudioPart, AudioTrack};
pub use chroma::detect::{GreenScreenInterval, detect_green_screen};
pub use chroma::hsv::GreenBand;
pub use config::{ChromaConfig, EngineConfig};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
pub use foundation::core::{AspectRatio, Canvas, Rgb8, RgbaFrame};
pub use foundation::error::{ReelError, ReelResult};
pub use media::{AudioPcm, AudioSourceInfo, FfmpegMedia, MediaBackend, VideoSourceInfo};
pub use pipeline::{
    ComposedVideo, RenderReport, compose_multi, compose_single, render_multi, render_single,
    write_composed,
};
pub use progress::{LogProgress, NullProgress, ProgressSink, ProgressTracker};
pub use timeline::model::{Segment, Separator, StillClip, Timeline, TimelineItem};
