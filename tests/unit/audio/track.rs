use super::*;

#[test]
fn three_segments_interleave_two_silences() {
    let track = AudioTrack::synthesize(12.0, 3, 5.0).unwrap();
    assert_eq!(
        track.parts,
        vec![
            AudioPart::Source,
            AudioPart::Silence { duration_sec: 5.0 },
            AudioPart::Source,
            AudioPart::Silence { duration_sec: 5.0 },
            AudioPart::Source,
        ]
    );
    assert_eq!(track.total_duration_sec(), 3.0 * 12.0 + 2.0 * 5.0);
    assert_eq!(track.source_copies(), 3);
}

#[test]
fn single_segment_is_just_the_source() {
    let track = AudioTrack::synthesize(7.5, 1, 5.0).unwrap();
    assert_eq!(track.parts, vec![AudioPart::Source]);
    assert_eq!(track.total_duration_sec(), 7.5);
}

#[test]
fn synthesize_validates_inputs() {
    assert!(AudioTrack::synthesize(10.0, 0, 1.0).is_err());
    assert!(AudioTrack::synthesize(0.0, 2, 1.0).is_err());
    assert!(AudioTrack::synthesize(10.0, 2, f64::NAN).is_err());
}

#[test]
fn rendered_pcm_has_literal_silence_in_source_layout() {
    let source = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![0.5, -0.5, 0.25, -0.25],
    };
    let track = AudioTrack::synthesize(source.duration_sec(), 2, 1.0).unwrap();
    let pcm = track.render_pcm(&source).unwrap();

    assert_eq!(pcm.channels, 2);
    assert_eq!(pcm.sample_rate, 4);
    let mut expected = vec![0.5, -0.5, 0.25, -0.25];
    expected.extend_from_slice(&[0.0; 8]);
    expected.extend_from_slice(&[0.5, -0.5, 0.25, -0.25]);
    assert_eq!(pcm.interleaved_f32, expected);
    assert!((pcm.duration_sec() - track.total_duration_sec()).abs() < 1e-9);
}

fn ramp(sample_rate: u32, seconds: f64) -> AudioPcm {
    let n = (seconds * f64::from(sample_rate)).round() as usize;
    AudioPcm {
        sample_rate,
        channels: 1,
        interleaved_f32: (0..n).map(|i| 1.0 + i as f32).collect(),
    }
}

#[test]
fn short_decode_is_padded_to_the_probed_duration() {
    let track = AudioTrack::synthesize(10.0, 3, 5.0).unwrap();
    let pcm = track.render_pcm(&ramp(100, 9.5)).unwrap();

    assert_eq!(pcm.interleaved_f32.len(), 4000);
    assert!((pcm.duration_sec() - track.total_duration_sec()).abs() < 1e-9);
    // copy 1: [0, 950) decoded, [950, 1000) pad, [1000, 1500) separator silence
    assert_eq!(pcm.interleaved_f32[949], 950.0);
    assert!(pcm.interleaved_f32[950..1500].iter().all(|&s| s == 0.0));
    // copy 2 lines up with the second video segment at 15 s
    assert_eq!(pcm.interleaved_f32[1500], 1.0);
    assert!(pcm.interleaved_f32[2450..2500].iter().all(|&s| s == 0.0));
    assert_eq!(pcm.interleaved_f32[3000], 1.0);
}

#[test]
fn long_decode_is_truncated_to_the_probed_duration() {
    let track = AudioTrack::synthesize(10.0, 3, 5.0).unwrap();
    let pcm = track.render_pcm(&ramp(100, 10.5)).unwrap();

    assert_eq!(pcm.interleaved_f32.len(), 4000);
    assert_eq!(pcm.interleaved_f32[999], 1000.0);
    assert!(pcm.interleaved_f32[1000..1500].iter().all(|&s| s == 0.0));
    assert_eq!(pcm.interleaved_f32[1500], 1.0);
    assert_eq!(pcm.interleaved_f32[3999], 1000.0);
}

#[test]
fn partial_trailing_frame_is_dropped() {
    let source = AudioPcm {
        sample_rate: 2,
        channels: 2,
        interleaved_f32: vec![0.5, -0.5, 0.25],
    };
    let track = AudioTrack::synthesize(1.0, 1, 0.0).unwrap();
    let pcm = track.render_pcm(&source).unwrap();
    assert_eq!(pcm.interleaved_f32, vec![0.5, -0.5, 0.0, 0.0]);
}

#[test]
fn render_rejects_degenerate_source() {
    let track = AudioTrack::synthesize(1.0, 1, 1.0).unwrap();
    assert!(track.render_pcm(&AudioPcm::default()).is_err());
}

#[test]
fn f32le_file_round_trips() {
    let dir = std::env::temp_dir().join(format!("reelkit_track_{}", std::process::id()));
    let path = dir.join("nested").join("mix.f32le");
    write_f32le_file(&[1.0, -0.5], &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8);
    assert_eq!(f32::from_le_bytes(bytes[4..8].try_into().unwrap()), -0.5);
}
