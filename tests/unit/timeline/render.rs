use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::foundation::core::Canvas;
use crate::timeline::model::{Segment, Separator, StillClip};

/// Records the first pixel of each pushed frame instead of whole buffers.
#[derive(Default)]
struct PixelLog {
    begun: bool,
    ended: bool,
    first_pixels: Vec<(u64, [u8; 3])>,
}

impl FrameSink for PixelLog {
    fn begin(&mut self, _cfg: SinkConfig) -> ReelResult<()> {
        self.begun = true;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &RgbaFrame) -> ReelResult<()> {
        let px = frame.pixels().next().unwrap();
        self.first_pixels.push((idx, px));
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }
}

fn canvas() -> Canvas {
    Canvas::new(2, 2).unwrap()
}

fn seg(prefix: &str, color: [u8; 3], secs: f64) -> Segment {
    Segment {
        prefix: prefix.to_string(),
        clips: vec![StillClip {
            source: PathBuf::from(format!("{prefix}1.png")),
            frame: Arc::new(RgbaFrame::solid(canvas(), Rgb8(color))),
            duration_sec: secs,
        }],
    }
}

fn cfg(fps: u32) -> SinkConfig {
    SinkConfig {
        canvas: canvas(),
        fps,
        audio: None,
    }
}

#[test]
fn writes_segments_and_separators_in_order() {
    let tl = Timeline::from_segments(
        canvas(),
        vec![seg("A", [255, 0, 0], 1.0), seg("B", [0, 0, 255], 1.0)],
        Separator {
            color: Rgb8::CHROMA_GREEN,
            duration_sec: 0.5,
        },
    );
    let mut sink = PixelLog::default();
    let mut reports = Vec::new();
    let written = write_timeline(&tl, cfg(4), &mut sink, |p| reports.push(p)).unwrap();

    assert_eq!(written, 10);
    assert!(sink.begun && sink.ended);
    let colors: Vec<[u8; 3]> = sink.first_pixels.iter().map(|(_, c)| *c).collect();
    assert_eq!(&colors[..4], &[[255, 0, 0]; 4]);
    assert_eq!(&colors[4..6], &[[0, 255, 0]; 2]);
    assert_eq!(&colors[6..], &[[0, 0, 255]; 4]);
    assert!(sink.first_pixels.iter().enumerate().all(|(i, (idx, _))| *idx == i as u64));

    let last = reports.last().unwrap();
    assert_eq!((last.frames_done, last.frames_total, last.item), (10, 10, 2));
    assert!(reports.windows(2).all(|w| w[0].frames_done <= w[1].frames_done));
}

#[test]
fn clamped_timeline_writes_fewer_frames() {
    let mut tl = Timeline::from_segments(
        canvas(),
        vec![seg("A", [255, 0, 0], 2.0)],
        Separator {
            color: Rgb8::CHROMA_GREEN,
            duration_sec: 1.0,
        },
    );
    tl.conform_to_audio(1.5);
    let mut sink = PixelLog::default();
    assert_eq!(write_timeline(&tl, cfg(10), &mut sink, |_| {}).unwrap(), 15);
}

#[test]
fn canvas_mismatch_is_rejected_before_begin() {
    let tl = Timeline::from_segments(
        canvas(),
        vec![seg("A", [1, 2, 3], 1.0)],
        Separator {
            color: Rgb8::BLACK,
            duration_sec: 1.0,
        },
    );
    let mut sink = PixelLog::default();
    let mut bad = cfg(10);
    bad.canvas = Canvas::new(4, 4).unwrap();
    assert!(write_timeline(&tl, bad, &mut sink, |_| {}).is_err());
    assert!(!sink.begun);
}

#[test]
fn empty_output_is_an_error() {
    let tl = Timeline::from_segments(
        canvas(),
        vec![seg("A", [1, 2, 3], 0.0)],
        Separator {
            color: Rgb8::BLACK,
            duration_sec: 1.0,
        },
    );
    let mut sink = PixelLog::default();
    assert!(write_timeline(&tl, cfg(10), &mut sink, |_| {}).is_err());
}
