use super::*;

#[test]
fn ratio_parsing_handles_common_and_bad_values() {
    assert_eq!(parse_ff_ratio("30000/1001"), Some((30000, 1001)));
    assert_eq!(parse_ff_ratio("25/1"), Some((25, 1)));
    assert_eq!(parse_ff_ratio("25/0"), None);
    assert_eq!(parse_ff_ratio("abc"), None);
}

#[test]
fn f32le_decoding_requires_alignment() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0.5f32.to_le_bytes());
    bytes.extend_from_slice(&(-1.0f32).to_le_bytes());
    assert_eq!(f32le_to_samples(&bytes).unwrap(), vec![0.5, -1.0]);
    assert!(f32le_to_samples(&bytes[..5]).is_err());
}

#[test]
fn probe_duration_prefers_format_then_stream() {
    let parsed: ProbeOut = serde_json::from_str(
        r#"{
            "streams": [{"codec_type": "audio", "sample_rate": "44100", "channels": 2, "duration": "3.5"}],
            "format": {"duration": "3.6"}
        }"#,
    )
    .unwrap();
    let stream = parsed.stream("audio").unwrap();
    assert_eq!(parsed.duration_sec(stream), Some(3.6));
    assert!(parsed.stream("video").is_none());

    let no_format: ProbeOut = serde_json::from_str(
        r#"{"streams": [{"codec_type": "audio", "duration": "1.25"}]}"#,
    )
    .unwrap();
    let stream = no_format.stream("audio").unwrap();
    assert_eq!(no_format.duration_sec(stream), Some(1.25));
}

#[test]
fn detect_fails_for_missing_binaries() {
    let err = FfmpegMedia::with_binaries("/nonexistent/ffmpeg", "/nonexistent/ffprobe")
        .unwrap_err();
    assert!(matches!(err, ReelError::Media(_)));
}
