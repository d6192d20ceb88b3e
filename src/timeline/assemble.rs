use std::sync::Arc;

use crate::assets::group::{AssetGroups, ImageAsset};
use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::media::MediaBackend;
use crate::progress::ProgressTracker;
use crate::timeline::model::{Segment, Separator, StillClip, Timeline};
use crate::timeline::timing::per_image_duration;

/// Inputs shared by every segment of one assembly.
#[derive(Clone, Copy, Debug)]
pub struct AssembleOpts {
    pub canvas: Canvas,
    pub separator: Separator,
    /// Color transparent image pixels are flattened over.
    pub background: Rgb8,
}

/// Result of assembling grouped images.
#[derive(Clone, Debug)]
pub struct Assembly {
    pub timeline: Timeline,
    /// Prefixes of groups that produced no segment, in prefix order.
    pub dropped_groups: Vec<String>,
    /// Number of clip durations replaced by zero before concatenation.
    pub coerced_durations: usize,
}

/// Render `images` into one segment, each image shown for `per_image_sec`.
///
/// Images that fail to load are logged and skipped. Returns `None` when nothing rendered.
pub fn render_segment(
    media: &dyn MediaBackend,
    prefix: &str,
    images: &[ImageAsset],
    per_image_sec: f64,
    opts: &AssembleOpts,
) -> Option<Segment> {
    render_segment_with(media, prefix, images, per_image_sec, opts, |_, _| {})
}

/// [`render_segment`], calling `on_image(i, n)` before the `i`-th of `n` images (1-based).
pub fn render_segment_with(
    media: &dyn MediaBackend,
    prefix: &str,
    images: &[ImageAsset],
    per_image_sec: f64,
    opts: &AssembleOpts,
    mut on_image: impl FnMut(usize, usize),
) -> Option<Segment> {
    let mut clips = Vec::with_capacity(images.len());
    for (i, asset) in images.iter().enumerate() {
        on_image(i + 1, images.len());
        match media.load_still(&asset.path, opts.canvas, opts.background) {
            Ok(frame) => clips.push(StillClip {
                source: asset.path.clone(),
                frame: Arc::new(frame),
                duration_sec: per_image_sec,
            }),
            Err(err) => {
                tracing::warn!(
                    prefix,
                    path = %asset.path.display(),
                    error = %err,
                    "skipping image that failed to render"
                );
            }
        }
    }
    if clips.is_empty() {
        return None;
    }
    Some(Segment {
        prefix: prefix.to_string(),
        clips,
    })
}

/// Build a timeline with one segment per group, each lasting the full reference duration.
///
/// Progress for the per-group steps is spread over `pct`.
#[tracing::instrument(skip(media, groups, opts, progress), fields(groups = groups.len()))]
pub fn assemble_timeline(
    media: &dyn MediaBackend,
    groups: &AssetGroups,
    audio_duration_sec: f64,
    opts: &AssembleOpts,
    progress: &mut ProgressTracker<'_>,
    pct: (f64, f64),
) -> ReelResult<Assembly> {
    let mut plan = Vec::with_capacity(groups.len());
    for (prefix, images) in groups {
        let per_image =
            per_image_duration(audio_duration_sec, images.len()).map_err(|e| match e {
                ReelError::Validation(msg) => {
                    ReelError::validation(format!("group '{prefix}': {msg}"))
                }
                other => other,
            })?;
        plan.push((prefix, images, per_image));
    }

    let n = plan.len();
    let mut segments = Vec::with_capacity(n);
    let mut dropped_groups = Vec::new();
    for (i, (prefix, images, per_image)) in plan.into_iter().enumerate() {
        let done = (i + 1) as f64 / n as f64;
        progress.step(
            &format!("Processing: Creating segment for '{prefix}' ({}/{n})", i + 1),
            pct.0 + done * (pct.1 - pct.0),
        );
        match render_segment(media, prefix, images, per_image, opts) {
            Some(segment) => {
                tracing::info!(
                    prefix = %prefix,
                    images = segment.clips.len(),
                    duration = segment.duration_sec(),
                    "created segment"
                );
                segments.push(segment);
            }
            None => {
                tracing::warn!(prefix = %prefix, "no renderable images, dropping group");
                dropped_groups.push(prefix.clone());
            }
        }
    }

    tracing::debug!(segments = segments.len(), groups = n, "segment rendering finished");
    if segments.is_empty() {
        return Err(ReelError::render(
            "no valid segments could be created; check image files and logs",
        ));
    }

    let mut timeline = Timeline::from_segments(opts.canvas, segments, opts.separator);
    let coerced_durations = timeline.coerce_durations();
    Ok(Assembly {
        timeline,
        dropped_groups,
        coerced_durations,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/assemble.rs"]
mod tests;
