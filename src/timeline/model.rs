use std::path::PathBuf;
use std::sync::Arc;

use crate::foundation::core::{Canvas, Rgb8, RgbaFrame, coerce_duration};

/// One rendered image held on screen for `duration_sec`.
#[derive(Clone, Debug)]
pub struct StillClip {
    pub source: PathBuf,
    pub frame: Arc<RgbaFrame>,
    pub duration_sec: f64,
}

impl StillClip {
    pub fn width(&self) -> u32 {
        self.frame.width
    }

    pub fn height(&self) -> u32 {
        self.frame.height
    }
}

/// A group's images concatenated in sequence order.
#[derive(Clone, Debug)]
pub struct Segment {
    pub prefix: String,
    pub clips: Vec<StillClip>,
}

impl Segment {
    pub fn duration_sec(&self) -> f64 {
        self.clips.iter().map(|c| c.duration_sec).sum()
    }
}

/// Solid-color filler placed between two segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Separator {
    pub color: Rgb8,
    pub duration_sec: f64,
}

#[derive(Clone, Debug)]
pub enum TimelineItem {
    Segment(Segment),
    Separator(Separator),
}

impl TimelineItem {
    pub fn duration_sec(&self) -> f64 {
        match self {
            Self::Segment(s) => s.duration_sec(),
            Self::Separator(s) => s.duration_sec,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator(_))
    }
}

/// What a run of identical output frames shows.
#[derive(Clone, Copy, Debug)]
pub enum FrameSource<'a> {
    Still(&'a Arc<RgbaFrame>),
    Solid(Rgb8),
}

/// `frames` consecutive output frames showing the same picture.
#[derive(Clone, Copy, Debug)]
pub struct FrameRun<'a> {
    pub source: FrameSource<'a>,
    pub frames: u64,
    /// Index of the item in [`Timeline::items`] this run belongs to.
    pub item: usize,
}

/// Segments interleaved with separators, optionally clamped to an audio length.
#[derive(Clone, Debug)]
pub struct Timeline {
    pub canvas: Canvas,
    pub items: Vec<TimelineItem>,
    limit_sec: Option<f64>,
}

impl Timeline {
    /// Interleave `segments` with a copy of `separator` between each neighbouring pair.
    pub fn from_segments(canvas: Canvas, segments: Vec<Segment>, separator: Separator) -> Self {
        let n = segments.len();
        let mut items = Vec::with_capacity(n.saturating_mul(2).saturating_sub(1));
        for (i, segment) in segments.into_iter().enumerate() {
            items.push(TimelineItem::Segment(segment));
            if i + 1 < n {
                items.push(TimelineItem::Separator(separator));
            }
        }
        Self {
            canvas,
            items,
            limit_sec: None,
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.items.iter().filter_map(|item| match item {
            TimelineItem::Segment(s) => Some(s),
            TimelineItem::Separator(_) => None,
        })
    }

    pub fn segment_count(&self) -> usize {
        self.segments().count()
    }

    pub fn separator_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_separator()).count()
    }

    /// Sum of member durations, ignoring any clamp.
    pub fn nominal_duration_sec(&self) -> f64 {
        self.items.iter().map(TimelineItem::duration_sec).sum()
    }

    pub fn duration_sec(&self) -> f64 {
        let nominal = self.nominal_duration_sec();
        match self.limit_sec {
            Some(limit) => nominal.min(limit),
            None => nominal,
        }
    }

    /// Replace non-finite or negative clip durations with zero. Returns how many were replaced.
    pub fn coerce_durations(&mut self) -> usize {
        let mut coerced = 0usize;
        let mut fix = |d: &mut f64, what: &str| {
            if coerce_duration(*d).is_none() {
                tracing::warn!(
                    duration = *d,
                    clip = what,
                    "clip duration is not a finite non-negative number, using 0"
                );
                *d = 0.0;
                coerced += 1;
            }
        };
        for item in &mut self.items {
            match item {
                TimelineItem::Segment(s) => {
                    for clip in &mut s.clips {
                        fix(&mut clip.duration_sec, &s.prefix);
                    }
                }
                TimelineItem::Separator(sep) => fix(&mut sep.duration_sec, "separator"),
            }
        }
        coerced
    }

    /// Trim the timeline when it runs longer than `audio_sec`. Audio is never adjusted.
    ///
    /// Returns `true` when a clamp was applied.
    pub fn conform_to_audio(&mut self, audio_sec: f64) -> bool {
        if self.nominal_duration_sec() > audio_sec {
            tracing::debug!(
                video = self.nominal_duration_sec(),
                audio = audio_sec,
                "trimming timeline to audio length"
            );
            self.limit_sec = Some(audio_sec.max(0.0));
            true
        } else {
            false
        }
    }

    pub fn total_frames(&self, fps: u32) -> u64 {
        seconds_to_frames(self.duration_sec(), fps)
    }

    /// Runs of identical frames covering the (clamped) timeline at `fps`.
    ///
    /// Boundaries are rounded from cumulative time so rounding error never accumulates.
    pub fn frame_runs(&self, fps: u32) -> Vec<FrameRun<'_>> {
        let total = self.total_frames(fps);
        let mut runs = Vec::new();
        let mut t = 0.0f64;
        let mut emitted = 0u64;
        for (item, source, dur) in self.pictures() {
            t += dur;
            let end = seconds_to_frames(t, fps).min(total);
            let frames = end.saturating_sub(emitted);
            emitted = emitted.max(end);
            if frames > 0 {
                runs.push(FrameRun {
                    source,
                    frames,
                    item,
                });
            }
        }
        runs
    }

    /// Every picture in play order with its owning item index and duration.
    fn pictures(&self) -> Vec<(usize, FrameSource<'_>, f64)> {
        let mut out = Vec::new();
        for (idx, item) in self.items.iter().enumerate() {
            match item {
                TimelineItem::Segment(s) => out.extend(
                    s.clips
                        .iter()
                        .map(|clip| (idx, FrameSource::Still(&clip.frame), clip.duration_sec)),
                ),
                TimelineItem::Separator(sep) => {
                    out.push((idx, FrameSource::Solid(sep.color), sep.duration_sec));
                }
            }
        }
        out
    }
}

pub fn seconds_to_frames(sec: f64, fps: u32) -> u64 {
    if !sec.is_finite() || sec <= 0.0 {
        return 0;
    }
    (sec * f64::from(fps)).round() as u64
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
