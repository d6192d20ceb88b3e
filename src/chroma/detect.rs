use std::path::Path;

use crate::chroma::hsv::is_green_frame;
use crate::config::ChromaConfig;
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::MediaBackend;
use crate::progress::{ProgressSink, ProgressTracker};

/// A time range, in seconds, during which sampled frames were green screen.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GreenScreenInterval {
    pub start: f64,
    pub end: f64,
}

impl GreenScreenInterval {
    pub fn duration_sec(&self) -> f64 {
        self.end - self.start
    }
}

/// Single forward pass over time-ordered samples.
#[derive(Debug, Default)]
pub struct IntervalTracker {
    open_since: Option<f64>,
    closed: Vec<GreenScreenInterval>,
}

impl IntervalTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the classification of the sample at `t`. Samples must arrive in increasing time.
    pub fn observe(&mut self, t: f64, is_green: bool) {
        match (self.open_since, is_green) {
            (None, true) => self.open_since = Some(t),
            (Some(start), false) => {
                self.closed.push(GreenScreenInterval { start, end: t });
                self.open_since = None;
            }
            _ => {}
        }
    }

    /// Close any interval still open at `duration_sec` and return all intervals.
    pub fn finish(mut self, duration_sec: f64) -> Vec<GreenScreenInterval> {
        if let Some(start) = self.open_since.take()
            && duration_sec > start
        {
            self.closed.push(GreenScreenInterval {
                start,
                end: duration_sec,
            });
        }
        self.closed
    }
}

/// `0, interval, 2·interval, …` strictly below `duration_sec`.
pub fn sample_times(duration_sec: f64, interval_sec: f64) -> impl Iterator<Item = f64> {
    let valid = duration_sec.is_finite() && interval_sec.is_finite() && interval_sec > 0.0;
    (0u64..)
        .map(move |k| k as f64 * interval_sec)
        .take_while(move |&t| valid && t < duration_sec)
}

/// Scan `video` and report the time ranges where frames are predominantly chroma-key green.
///
/// Frames that fail to decode are skipped. If no sample could be classified the scan fails.
#[tracing::instrument(skip(media, video, cfg, progress), fields(video = %video.display()))]
pub fn detect_green_screen(
    media: &dyn MediaBackend,
    video: &Path,
    cfg: &ChromaConfig,
    progress: &mut dyn ProgressSink,
) -> ReelResult<Vec<GreenScreenInterval>> {
    let mut tracker = ProgressTracker::new(progress);
    let out = scan(media, video, cfg, &mut tracker);
    if let Err(err) = &out {
        tracing::error!(error = %err, "green screen detection failed");
        tracker.fail(err);
    }
    out
}

fn scan(
    media: &dyn MediaBackend,
    video: &Path,
    cfg: &ChromaConfig,
    progress: &mut ProgressTracker<'_>,
) -> ReelResult<Vec<GreenScreenInterval>> {
    cfg.validate()?;
    if !video.is_file() {
        return Err(ReelError::validation(format!(
            "video file not found: {}",
            video.display()
        )));
    }

    progress.step("Loading video...", 10.0);
    let source = media.probe_video(video)?;
    let duration = source.duration_sec;
    let total_samples = sample_times(duration, cfg.sample_interval_sec).count();
    tracing::info!(
        duration,
        fps = source.source_fps(),
        samples = total_samples,
        "scanning video"
    );

    let mut intervals = IntervalTracker::new();
    let mut processed = 0usize;
    for (i, t) in sample_times(duration, cfg.sample_interval_sec).enumerate() {
        progress.step(
            &format!("Analyzing frame at {t:.1}s..."),
            10.0 + (i as f64 / total_samples as f64) * 70.0,
        );
        let frame = match media.decode_video_frame(&source, t) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::warn!(time = t, error = %err, "skipping frame that failed to decode");
                continue;
            }
        };
        let green = is_green_frame(&frame, &cfg.band, cfg.green_threshold);
        tracing::debug!(time = t, green, "sampled frame");
        intervals.observe(t, green);
        processed += 1;
    }

    if processed == 0 {
        return Err(ReelError::media(format!(
            "no frames could be sampled from '{}' ({total_samples} attempted)",
            video.display()
        )));
    }

    let found = intervals.finish(duration);
    progress.step(
        &format!("Found {} green screen segments", found.len()),
        80.0,
    );
    progress.step("Green screen detection complete", 100.0);
    Ok(found)
}

#[cfg(test)]
#[path = "../../tests/unit/chroma/detect.rs"]
mod tests;
