use super::*;
use crate::encode::sink::AudioInputConfig;
use crate::foundation::core::{Canvas, Rgb8};

fn cfg(width: u32, height: u32, fps: u32) -> SinkConfig {
    SinkConfig {
        canvas: Canvas { width, height },
        fps,
        audio: None,
    }
}

#[test]
fn begin_rejects_bad_geometry_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/reelkit_unit/never.mp4"));
    assert!(sink.begin(cfg(11, 10, 30)).unwrap_err().is_validation());
    assert!(sink.begin(cfg(0, 10, 30)).unwrap_err().is_validation());
    assert!(sink.begin(cfg(10, 10, 0)).unwrap_err().is_validation());
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("target/reelkit_unit/never.mp4"));
    let frame = RgbaFrame::solid(Canvas { width: 2, height: 2 }, Rgb8::BLACK);
    assert!(sink.push_frame(0, &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn command_includes_audio_input_when_configured() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("out.mp4"));
    let mut c = cfg(4, 4, 24);
    c.audio = Some(AudioInputConfig {
        path: PathBuf::from("mix.f32le"),
        sample_rate: 48_000,
        channels: 1,
    });
    let cmd = sink.build_command(&c).unwrap();
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert!(args.windows(2).any(|w| w == ["-f", "f32le"]));
    assert!(args.windows(2).any(|w| w == ["-ac", "1"]));
    assert!(args.contains(&"-shortest".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("out.mp4"));

    c.audio.as_mut().unwrap().channels = 0;
    assert!(sink.build_command(&c).is_err());
}

#[test]
fn command_without_audio_disables_audio_stream() {
    let sink = FfmpegSink::new(FfmpegSinkOpts::new("out.mp4"));
    let cmd = sink.build_command(&cfg(4, 4, 24)).unwrap();
    assert!(cmd.get_args().any(|a| a == "-an"));
}

#[test]
fn missing_binary_is_not_available() {
    assert!(!is_tool_available(Path::new("/nonexistent/reelkit-ffmpeg")));
}
