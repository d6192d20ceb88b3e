//! End-to-end invocations: single-video and multi-segment composition.
//!
//! Each call owns its own progress tracker, timeline and media handles. Nothing is shared between
//! invocations, so callers may run several on separate worker threads.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::assets::formats::validate_inputs;
use crate::assets::group::{ImageAsset, group_images};
use crate::audio::track::{AudioTrack, write_f32le_file};
use crate::config::EngineConfig;
use crate::encode::sink::{AudioInputConfig, SinkConfig};
use crate::foundation::core::Rgb8;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::{AudioSourceInfo, MediaBackend};
use crate::progress::{ProgressSink, ProgressTracker};
use crate::timeline::assemble::{AssembleOpts, assemble_timeline, render_segment_with};
use crate::timeline::model::{Separator, Timeline};
use crate::timeline::render::write_timeline;
use crate::timeline::timing::per_image_duration;

/// Outputs smaller than this are almost certainly broken.
const SUSPICIOUS_OUTPUT_BYTES: u64 = 1000;

/// A fully assembled timeline with its matching audio track, not yet written anywhere.
#[derive(Clone, Debug)]
pub struct ComposedVideo {
    pub timeline: Timeline,
    pub audio: AudioTrack,
    pub audio_source: AudioSourceInfo,
    pub fps: u32,
    pub dropped_groups: Vec<String>,
    pub coerced_durations: usize,
}

impl ComposedVideo {
    pub fn duration_sec(&self) -> f64 {
        self.timeline.duration_sec()
    }
}

/// Summary of a written video.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderReport {
    pub out_path: PathBuf,
    pub duration_sec: f64,
    pub frames_written: u64,
    pub segments: usize,
    pub separators: usize,
    pub dropped_groups: Vec<String>,
    pub coerced_durations: usize,
}

/// Build one segment from all `images` in input order, sharing the full audio duration.
pub fn compose_single<P: AsRef<Path>>(
    media: &dyn MediaBackend,
    images: &[P],
    audio: &Path,
    cfg: &EngineConfig,
    progress: &mut dyn ProgressSink,
) -> ReelResult<ComposedVideo> {
    let mut tracker = ProgressTracker::new(progress);
    let out = compose_single_tracked(media, images, audio, cfg, &mut tracker);
    reported(&mut tracker, "single video composition", out)
}

/// Single-video mode: write to `out` when given, otherwise hand back the composed timeline.
pub fn render_single<P: AsRef<Path>>(
    media: &dyn MediaBackend,
    images: &[P],
    audio: &Path,
    out: Option<&Path>,
    cfg: &EngineConfig,
    progress: &mut dyn ProgressSink,
) -> ReelResult<Option<ComposedVideo>> {
    let mut tracker = ProgressTracker::new(progress);
    let result = render_single_tracked(media, images, audio, out, cfg, &mut tracker);
    reported(&mut tracker, "single video render", result)
}

/// Group images by prefix and assemble one full-audio-length segment per group.
pub fn compose_multi<P: AsRef<Path>>(
    media: &dyn MediaBackend,
    images: &[P],
    audio: &Path,
    cfg: &EngineConfig,
    progress: &mut dyn ProgressSink,
) -> ReelResult<ComposedVideo> {
    let mut tracker = ProgressTracker::new(progress);
    let out = compose_multi_tracked(media, images, audio, cfg, &mut tracker);
    reported(&mut tracker, "multi-segment composition", out)
}

/// Multi-segment mode: compose and always write to `out`.
#[tracing::instrument(skip(media, images, audio, out, cfg, progress), fields(images = images.len(), out = %out.display()))]
pub fn render_multi<P: AsRef<Path>>(
    media: &dyn MediaBackend,
    images: &[P],
    audio: &Path,
    out: &Path,
    cfg: &EngineConfig,
    progress: &mut dyn ProgressSink,
) -> ReelResult<RenderReport> {
    let mut tracker = ProgressTracker::new(progress);
    let result = render_multi_tracked(media, images, audio, out, cfg, &mut tracker);
    reported(&mut tracker, "multi-segment render", result)
}

/// Write an already composed video to `out`.
pub fn write_composed(
    media: &dyn MediaBackend,
    composed: &ComposedVideo,
    out: &Path,
    overwrite: bool,
    progress: &mut dyn ProgressSink,
) -> ReelResult<RenderReport> {
    let mut tracker = ProgressTracker::new(progress);
    let result = write_tracked(media, composed, out, overwrite, &mut tracker, (0.0, 100.0));
    if result.is_ok() {
        tracker.step("Video created successfully!", 100.0);
    }
    reported(&mut tracker, "video write", result)
}

fn reported<T>(
    tracker: &mut ProgressTracker<'_>,
    what: &str,
    out: ReelResult<T>,
) -> ReelResult<T> {
    if let Err(err) = &out {
        tracing::error!(error = %err, "{what} failed");
        tracker.fail(err);
    }
    out
}

fn assemble_opts(cfg: &EngineConfig) -> AssembleOpts {
    AssembleOpts {
        canvas: cfg.canvas(),
        separator: Separator {
            color: cfg.separator_color,
            duration_sec: cfg.separator_duration_sec,
        },
        background: Rgb8::BLACK,
    }
}

fn load_audio(
    media: &dyn MediaBackend,
    audio: &Path,
    tracker: &mut ProgressTracker<'_>,
    pct: f64,
) -> ReelResult<AudioSourceInfo> {
    tracker.step("Processing: Loading audio...", pct);
    let info = media.probe_audio(audio)?;
    if !(info.duration_sec.is_finite() && info.duration_sec > 0.0) {
        return Err(ReelError::validation(format!(
            "audio file '{}' has no usable duration",
            audio.display()
        )));
    }
    tracing::info!(
        duration = info.duration_sec,
        sample_rate = info.sample_rate,
        channels = info.channels,
        "loaded audio"
    );
    Ok(info)
}

fn compose_single_tracked<P: AsRef<Path>>(
    media: &dyn MediaBackend,
    images: &[P],
    audio: &Path,
    cfg: &EngineConfig,
    tracker: &mut ProgressTracker<'_>,
) -> ReelResult<ComposedVideo> {
    cfg.validate()?;
    validate_inputs(images, audio)?;
    let audio_source = load_audio(media, audio, tracker, 10.0)?;

    let per_image = per_image_duration(audio_source.duration_sec, images.len())?;
    tracing::info!(images = images.len(), per_image, "allocating image durations");
    tracker.step(&format!("Processing {} images...", images.len()), 30.0);

    let assets: Vec<ImageAsset> = images
        .iter()
        .map(|p| ImageAsset::from_path(p.as_ref()))
        .collect();
    let opts = assemble_opts(cfg);
    let segment = render_segment_with(media, "", &assets, per_image, &opts, |i, n| {
        let pct = 30.0 + 40.0 * (i - 1) as f64 / n as f64;
        tracker.step(&format!("Processing image {i}/{n}"), pct);
    })
    .ok_or_else(|| ReelError::render("no valid images could be processed"))?;

    tracker.step("Combining images into video...", 70.0);
    let mut timeline = Timeline::from_segments(opts.canvas, vec![segment], opts.separator);
    let coerced_durations = timeline.coerce_durations();
    let audio_track = AudioTrack::synthesize(audio_source.duration_sec, 1, 0.0)?;
    timeline.conform_to_audio(audio_track.total_duration_sec());

    Ok(ComposedVideo {
        timeline,
        audio: audio_track,
        audio_source,
        fps: cfg.fps,
        dropped_groups: Vec::new(),
        coerced_durations,
    })
}

fn compose_multi_tracked<P: AsRef<Path>>(
    media: &dyn MediaBackend,
    images: &[P],
    audio: &Path,
    cfg: &EngineConfig,
    tracker: &mut ProgressTracker<'_>,
) -> ReelResult<ComposedVideo> {
    cfg.validate()?;
    validate_inputs(images, audio)?;

    let groups = group_images(images);
    tracing::info!(
        groups = groups.len(),
        prefixes = ?groups.keys().collect::<Vec<_>>(),
        "grouped images"
    );
    tracker.step("Processing: Grouping images...", 5.0);
    if groups.is_empty() {
        return Err(ReelError::validation("no image groups found"));
    }

    let audio_source = load_audio(media, audio, tracker, 10.0)?;
    tracker.step("Processing: Creating video segments...", 15.0);
    let opts = assemble_opts(cfg);
    let assembly = assemble_timeline(
        media,
        &groups,
        audio_source.duration_sec,
        &opts,
        tracker,
        (15.0, 20.0),
    )?;

    let mut timeline = assembly.timeline;
    let audio_track = AudioTrack::synthesize(
        audio_source.duration_sec,
        timeline.segment_count(),
        cfg.separator_duration_sec,
    )?;
    if timeline.conform_to_audio(audio_track.total_duration_sec()) {
        tracing::info!(
            duration = timeline.duration_sec(),
            "timeline trimmed to audio track length"
        );
    }

    Ok(ComposedVideo {
        timeline,
        audio: audio_track,
        audio_source,
        fps: cfg.fps,
        dropped_groups: assembly.dropped_groups,
        coerced_durations: assembly.coerced_durations,
    })
}

fn render_single_tracked<P: AsRef<Path>>(
    media: &dyn MediaBackend,
    images: &[P],
    audio: &Path,
    out: Option<&Path>,
    cfg: &EngineConfig,
    tracker: &mut ProgressTracker<'_>,
) -> ReelResult<Option<ComposedVideo>> {
    let composed = compose_single_tracked(media, images, audio, cfg, tracker)?;
    let Some(out) = out else {
        return Ok(Some(composed));
    };
    tracker.step("Rendering final video...", 80.0);
    write_tracked(media, &composed, out, cfg.overwrite, tracker, (80.0, 100.0))?;
    tracker.step("Video created successfully!", 100.0);
    Ok(None)
}

fn render_multi_tracked<P: AsRef<Path>>(
    media: &dyn MediaBackend,
    images: &[P],
    audio: &Path,
    out: &Path,
    cfg: &EngineConfig,
    tracker: &mut ProgressTracker<'_>,
) -> ReelResult<RenderReport> {
    let composed = compose_multi_tracked(media, images, audio, cfg, tracker)?;
    tracker.step("Processing complete.", 20.0);
    let report = write_tracked(media, &composed, out, cfg.overwrite, tracker, (20.0, 100.0))?;
    tracker.step("Video created successfully!", 100.0);
    Ok(report)
}

/// Removes the wrapped file on drop.
struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

fn temp_audio_path() -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);
    std::env::temp_dir().join(format!(
        "reelkit_audio_{}_{}_{}.f32le",
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

fn write_tracked(
    media: &dyn MediaBackend,
    composed: &ComposedVideo,
    out: &Path,
    overwrite: bool,
    tracker: &mut ProgressTracker<'_>,
    pct: (f64, f64),
) -> ReelResult<RenderReport> {
    let timeline = &composed.timeline;
    let segments = timeline.segment_count().max(1);

    let decoded = media.decode_audio(&composed.audio_source)?;
    let pcm = composed.audio.render_pcm(&decoded)?;
    let audio_path = temp_audio_path();
    let audio_tmp = TempFileGuard(Some(audio_path.clone()));
    write_f32le_file(&pcm.interleaved_f32, &audio_path)?;

    let sink_cfg = SinkConfig {
        canvas: timeline.canvas,
        fps: composed.fps,
        audio: Some(AudioInputConfig {
            path: audio_path,
            sample_rate: pcm.sample_rate,
            channels: pcm.channels,
        }),
    };

    let mut sink = media.open_sink(out, overwrite)?;
    let frames_written = write_timeline(timeline, sink_cfg, sink.as_mut(), |p| {
        let ordinal = (p.item / 2 + 1).min(segments);
        let done = p.frames_done as f64 / p.frames_total as f64;
        tracker.step(
            &format!("Writing video file... ({ordinal}/{segments})"),
            pct.0 + done * (pct.1 - pct.0),
        );
    })?;
    drop(sink);
    drop(audio_tmp);

    match std::fs::metadata(out) {
        Ok(meta) if meta.len() < SUSPICIOUS_OUTPUT_BYTES => tracing::warn!(
            out = %out.display(),
            bytes = meta.len(),
            "output file is suspiciously small"
        ),
        Ok(meta) => tracing::debug!(out = %out.display(), bytes = meta.len(), "output written"),
        Err(_) => tracing::warn!(out = %out.display(), "output file does not exist after write"),
    }

    Ok(RenderReport {
        out_path: out.to_path_buf(),
        duration_sec: timeline.duration_sec(),
        frames_written,
        segments: timeline.segment_count(),
        separators: timeline.separator_count(),
        dropped_groups: composed.dropped_groups.clone(),
        coerced_durations: composed.coerced_durations,
    })
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
