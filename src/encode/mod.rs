//! Frame sinks: the output side of the media capability.

/// `ffmpeg`-based MP4 sink.
pub mod ffmpeg;
/// Sink trait and its configuration types.
pub mod sink;
