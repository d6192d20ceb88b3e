use std::collections::HashMap;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Rgb8, RgbaFrame};
use crate::foundation::error::{ReelError, ReelResult};
use crate::timeline::model::{FrameSource, Timeline};

/// Position reported while frames are streamed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteProgress {
    pub frames_done: u64,
    pub frames_total: u64,
    /// Index into [`Timeline::items`] currently being written.
    pub item: usize,
}

/// Stream every frame of `timeline` into `sink`, from `begin` through `end`.
///
/// `on_progress` fires at least once per second of output and at the end of each run.
pub fn write_timeline(
    timeline: &Timeline,
    cfg: SinkConfig,
    sink: &mut dyn FrameSink,
    mut on_progress: impl FnMut(WriteProgress),
) -> ReelResult<u64> {
    if cfg.canvas != timeline.canvas {
        return Err(ReelError::validation(format!(
            "sink canvas {}x{} does not match timeline canvas {}x{}",
            cfg.canvas.width, cfg.canvas.height, timeline.canvas.width, timeline.canvas.height
        )));
    }
    let fps = cfg.fps;
    let runs = timeline.frame_runs(fps);
    let frames_total: u64 = runs.iter().map(|r| r.frames).sum();
    if frames_total == 0 {
        return Err(ReelError::render("timeline has zero frames at the configured fps"));
    }

    sink.begin(cfg)?;
    let mut solids: HashMap<Rgb8, RgbaFrame> = HashMap::new();
    let mut idx = 0u64;
    let report_every = u64::from(fps.max(1));
    for run in &runs {
        let frame: &RgbaFrame = match run.source {
            FrameSource::Still(f) => f.as_ref(),
            FrameSource::Solid(color) => solids
                .entry(color)
                .or_insert_with(|| RgbaFrame::solid(timeline.canvas, color)),
        };
        for n in 0..run.frames {
            sink.push_frame(idx, frame)?;
            idx += 1;
            if (n + 1) % report_every == 0 || n + 1 == run.frames {
                on_progress(WriteProgress {
                    frames_done: idx,
                    frames_total,
                    item: run.item,
                });
            }
        }
    }
    sink.end()?;
    tracing::debug!(frames = idx, "timeline written");
    Ok(idx)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/render.rs"]
mod tests;
