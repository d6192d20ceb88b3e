use std::ffi::OsString;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, RgbaFrame};
use crate::foundation::error::{ReelError, ReelResult};

/// Where and how an [`FfmpegSink`] writes its MP4.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    pub ffmpeg: PathBuf,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// [`FrameSink`] that pipes raw RGBA frames into a system `ffmpeg` producing H.264/AAC MP4.
///
/// The encoder process starts in `begin`. A sink dropped before `end` kills and reaps it.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    running: Option<Encoder>,
    next_idx: u64,
}

/// A live `ffmpeg` child with its stdin and a thread draining stderr.
struct Encoder {
    child: Child,
    stdin: ChildStdin,
    stderr: JoinHandle<std::io::Result<Vec<u8>>>,
    canvas: Canvas,
}

impl Encoder {
    fn spawn(mut cmd: Command, canvas: Canvas) -> ReelResult<Self> {
        let mut child = cmd.spawn().map_err(|e| {
            ReelError::encode(format!("could not start ffmpeg, is it on PATH? ({e})"))
        })?;
        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ReelError::encode("ffmpeg started without stdin/stderr pipes"));
        };
        let stderr = std::thread::spawn(move || {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf)?;
            Ok(buf)
        });
        Ok(Self {
            child,
            stdin,
            stderr,
            canvas,
        })
    }

    /// Close stdin, wait for the encoder and surface its stderr on failure.
    fn finish(self) -> ReelResult<()> {
        let Self {
            mut child,
            stdin,
            stderr,
            ..
        } = self;
        drop(stdin);
        let status = child
            .wait()
            .map_err(|e| ReelError::encode(format!("waiting for ffmpeg failed: {e}")))?;
        let log = drain_log(stderr);
        if !status.success() {
            return Err(ReelError::encode(format!(
                "ffmpeg failed ({status}): {}",
                log.trim()
            )));
        }
        Ok(())
    }

    fn abort(self) {
        let Self {
            mut child,
            stdin,
            stderr,
            ..
        } = self;
        drop(stdin);
        let _ = child.kill();
        let _ = child.wait();
        let _ = stderr.join();
    }
}

fn push_args(args: &mut Vec<OsString>, items: &[&str]) {
    args.extend(items.iter().map(OsString::from));
}

fn drain_log(handle: JoinHandle<std::io::Result<Vec<u8>>>) -> String {
    match handle.join() {
        Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
        Ok(Err(e)) => format!("<stderr unreadable: {e}>"),
        Err(_) => "<stderr reader panicked>".to_string(),
    }
}

fn check_geometry(cfg: &SinkConfig) -> ReelResult<()> {
    if cfg.fps == 0 {
        return Err(ReelError::validation("encoder fps must be positive"));
    }
    let Canvas { width, height } = cfg.canvas;
    if width == 0 || height == 0 {
        return Err(ReelError::validation(format!(
            "encoder canvas {width}x{height} has a zero dimension"
        )));
    }
    if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
        return Err(ReelError::validation(format!(
            "encoder canvas {width}x{height} must have even sides for yuv420p"
        )));
    }
    Ok(())
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            running: None,
            next_idx: 0,
        }
    }

    fn encoder_args(&self, cfg: &SinkConfig) -> ReelResult<Vec<OsString>> {
        let mut args = Vec::new();
        push_args(
            &mut args,
            &[if self.opts.overwrite { "-y" } else { "-n" }, "-loglevel", "error"],
        );
        push_args(
            &mut args,
            &[
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-s",
                &format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
                "-r",
                &cfg.fps.to_string(),
                "-i",
                "pipe:0",
            ],
        );

        match &cfg.audio {
            Some(audio) => {
                if audio.sample_rate == 0 || audio.channels == 0 {
                    return Err(ReelError::validation(
                        "audio input needs a positive sample rate and channel count",
                    ));
                }
                push_args(
                    &mut args,
                    &[
                        "-f",
                        "f32le",
                        "-ar",
                        &audio.sample_rate.to_string(),
                        "-ac",
                        &audio.channels.to_string(),
                        "-i",
                    ],
                );
                args.push(audio.path.clone().into_os_string());
                push_args(
                    &mut args,
                    &["-c:v", "libx264", "-pix_fmt", "yuv420p", "-c:a", "aac", "-shortest"],
                );
            }
            None => push_args(&mut args, &["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"]),
        }
        push_args(&mut args, &["-movflags", "+faststart"]);
        args.push(self.opts.out_path.clone().into_os_string());
        Ok(args)
    }

    fn build_command(&self, cfg: &SinkConfig) -> ReelResult<Command> {
        let mut cmd = Command::new(&self.opts.ffmpeg);
        cmd.args(self.encoder_args(cfg)?)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        Ok(cmd)
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if self.running.is_some() {
            return Err(ReelError::encode("encoder is already running"));
        }
        check_geometry(&cfg)?;

        let out = &self.opts.out_path;
        ensure_parent_dir(out)?;
        if !self.opts.overwrite && out.exists() {
            return Err(ReelError::validation(format!(
                "refusing to replace existing output '{}'",
                out.display()
            )));
        }

        let cmd = self.build_command(&cfg)?;
        tracing::debug!(?cmd, out = %out.display(), "starting ffmpeg");
        self.running = Some(Encoder::spawn(cmd, cfg.canvas)?);
        self.next_idx = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbaFrame) -> ReelResult<()> {
        let Some(enc) = self.running.as_mut() else {
            return Err(ReelError::encode("push_frame called before begin"));
        };
        if idx < self.next_idx {
            return Err(ReelError::encode(format!(
                "frame {idx} arrived after frame {}",
                self.next_idx - 1
            )));
        }
        if frame.canvas() != enc.canvas {
            return Err(ReelError::validation(format!(
                "frame is {}x{} but the encoder expects {}x{}",
                frame.width, frame.height, enc.canvas.width, enc.canvas.height
            )));
        }
        enc.stdin
            .write_all(&frame.data)
            .map_err(|e| ReelError::encode(format!("writing frame {idx} to ffmpeg: {e}")))?;
        self.next_idx = idx + 1;
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        let enc = self
            .running
            .take()
            .ok_or_else(|| ReelError::encode("end called before begin"))?;
        enc.finish()?;
        tracing::debug!(
            out = %self.opts.out_path.display(),
            frames = self.next_idx,
            "ffmpeg finished"
        );
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(enc) = self.running.take() {
            tracing::debug!(
                out = %self.opts.out_path.display(),
                "encoder dropped while running, killing ffmpeg"
            );
            enc.abort();
        }
    }
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create output directory '{}'", dir.display()))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// `true` when `<bin> -version` exits successfully.
pub fn is_tool_available(bin: &Path) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
