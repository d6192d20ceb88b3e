use std::path::{Path, PathBuf};
use std::process::Command;

use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_tool_available};
use crate::encode::sink::FrameSink;
use crate::foundation::core::RgbaFrame;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::{AudioPcm, AudioSourceInfo, MediaBackend, VideoSourceInfo};

/// [`MediaBackend`] built on the `image` crate and the system `ffmpeg`/`ffprobe` binaries.
#[derive(Clone, Debug)]
pub struct FfmpegMedia {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl FfmpegMedia {
    /// Resolve `ffmpeg` and `ffprobe` from `PATH`, failing if either cannot run.
    pub fn detect() -> ReelResult<Self> {
        Self::with_binaries("ffmpeg", "ffprobe")
    }

    pub fn with_binaries(
        ffmpeg: impl Into<PathBuf>,
        ffprobe: impl Into<PathBuf>,
    ) -> ReelResult<Self> {
        let media = Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        };
        for bin in [&media.ffmpeg, &media.ffprobe] {
            if !is_tool_available(bin) {
                return Err(ReelError::media(format!(
                    "'{}' is required but could not be run (is it installed and on PATH?)",
                    bin.display()
                )));
            }
        }
        tracing::debug!(ffmpeg = %media.ffmpeg.display(), ffprobe = %media.ffprobe.display(), "media backend ready");
        Ok(media)
    }

    fn probe(&self, path: &Path) -> ReelResult<ProbeOut> {
        let out = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(path)
            .output()
            .map_err(|e| ReelError::media(format!("failed to run ffprobe: {e}")))?;
        if !out.status.success() {
            return Err(ReelError::media(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        serde_json::from_slice(&out.stdout)
            .map_err(|e| ReelError::media(format!("ffprobe json parse failed: {e}")))
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u16>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

impl ProbeOut {
    fn stream(&self, kind: &str) -> Option<&ProbeStream> {
        self.streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some(kind))
    }

    /// Container duration, falling back to the stream's own duration.
    fn duration_sec(&self, stream: &ProbeStream) -> Option<f64> {
        let parse = |s: &Option<String>| s.as_deref().and_then(|d| d.parse::<f64>().ok());
        self.format
            .as_ref()
            .and_then(|f| parse(&f.duration))
            .or_else(|| parse(&stream.duration))
            .filter(|d| d.is_finite() && *d >= 0.0)
    }
}

impl MediaBackend for FfmpegMedia {
    fn probe_audio(&self, path: &Path) -> ReelResult<AudioSourceInfo> {
        let parsed = self.probe(path)?;
        let stream = parsed
            .stream("audio")
            .ok_or_else(|| ReelError::media(format!("no audio stream in '{}'", path.display())))?;
        let sample_rate = stream
            .sample_rate
            .as_deref()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&r| r > 0)
            .ok_or_else(|| ReelError::media("missing audio sample_rate from ffprobe"))?;
        let channels = stream
            .channels
            .filter(|&c| c > 0)
            .ok_or_else(|| ReelError::media("missing audio channels from ffprobe"))?;
        let duration_sec = parsed
            .duration_sec(stream)
            .ok_or_else(|| ReelError::media("missing audio duration from ffprobe"))?;
        Ok(AudioSourceInfo {
            path: path.to_path_buf(),
            duration_sec,
            sample_rate,
            channels,
        })
    }

    fn decode_audio(&self, source: &AudioSourceInfo) -> ReelResult<AudioPcm> {
        let out = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-i"])
            .arg(&source.path)
            .args([
                "-vn",
                "-f",
                "f32le",
                "-acodec",
                "pcm_f32le",
                "-ac",
                &source.channels.to_string(),
                "-ar",
                &source.sample_rate.to_string(),
                "pipe:1",
            ])
            .output()
            .map_err(|e| ReelError::media(format!("failed to run ffmpeg for audio decode: {e}")))?;

        if !out.status.success() {
            return Err(ReelError::media(format!(
                "ffmpeg audio decode failed for '{}': {}",
                source.path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        Ok(AudioPcm {
            sample_rate: source.sample_rate,
            channels: source.channels,
            interleaved_f32: f32le_to_samples(&out.stdout)?,
        })
    }

    fn probe_video(&self, path: &Path) -> ReelResult<VideoSourceInfo> {
        let parsed = self.probe(path)?;
        let stream = parsed
            .stream("video")
            .ok_or_else(|| ReelError::media(format!("no video stream in '{}'", path.display())))?;
        let width = stream
            .width
            .ok_or_else(|| ReelError::media("missing video width from ffprobe"))?;
        let height = stream
            .height
            .ok_or_else(|| ReelError::media("missing video height from ffprobe"))?;
        let (fps_num, fps_den) = parse_ff_ratio(stream.r_frame_rate.as_deref().unwrap_or("0/1"))
            .ok_or_else(|| ReelError::media("invalid video r_frame_rate"))?;
        Ok(VideoSourceInfo {
            path: path.to_path_buf(),
            width,
            height,
            fps_num,
            fps_den,
            duration_sec: parsed.duration_sec(stream).unwrap_or(0.0),
        })
    }

    fn decode_video_frame(
        &self,
        source: &VideoSourceInfo,
        time_sec: f64,
    ) -> ReelResult<RgbaFrame> {
        let out = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-ss", &format!("{time_sec:.6}")])
            .arg("-i")
            .arg(&source.path)
            .args([
                "-frames:v",
                "1",
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "pipe:1",
            ])
            .output()
            .map_err(|e| ReelError::media(format!("failed to run ffmpeg for video decode: {e}")))?;

        if !out.status.success() {
            return Err(ReelError::media(format!(
                "ffmpeg video decode failed for '{}' at {time_sec:.3}s: {}",
                source.path.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }

        let expected_len = source.width as usize * source.height as usize * 4;
        if expected_len == 0 {
            return Err(ReelError::media(
                "decoded video frame size is zero (invalid source dimensions)",
            ));
        }
        if out.stdout.len() < expected_len {
            return Err(ReelError::media(format!(
                "ffmpeg returned {} bytes at {time_sec:.3}s, expected {expected_len}",
                out.stdout.len()
            )));
        }
        let mut data = out.stdout;
        data.truncate(expected_len);
        RgbaFrame::new(source.width, source.height, data)
    }

    fn open_sink(&self, out_path: &Path, overwrite: bool) -> ReelResult<Box<dyn FrameSink>> {
        let opts = FfmpegSinkOpts {
            ffmpeg: self.ffmpeg.clone(),
            out_path: out_path.to_path_buf(),
            overwrite,
        };
        Ok(Box::new(FfmpegSink::new(opts)))
    }
}

fn f32le_to_samples(bytes: &[u8]) -> ReelResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(ReelError::media(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let (a, b) = s.split_once('/')?;
    let a = a.parse::<u32>().ok()?;
    let b = b.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
#[path = "../../tests/unit/media/ffmpeg.rs"]
mod tests;
