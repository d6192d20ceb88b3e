use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};
use crate::media::AudioPcm;

/// One span of the synthesized track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioPart {
    /// A full, unmodified copy of the reference audio.
    Source,
    /// Digital silence in the source's channel layout.
    Silence { duration_sec: f64 },
}

/// Reference audio repeated once per segment with silence under each separator.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioTrack {
    pub source_duration_sec: f64,
    pub parts: Vec<AudioPart>,
}

impl AudioTrack {
    /// `[source, silence, source, …, source]` with `segments` copies of the source.
    pub fn synthesize(
        source_duration_sec: f64,
        segments: usize,
        separator_sec: f64,
    ) -> ReelResult<Self> {
        if segments == 0 {
            return Err(ReelError::validation(
                "audio track needs at least one segment",
            ));
        }
        if !(source_duration_sec.is_finite() && source_duration_sec > 0.0) {
            return Err(ReelError::validation(format!(
                "source audio duration must be positive (got {source_duration_sec})"
            )));
        }
        if !(separator_sec.is_finite() && separator_sec >= 0.0) {
            return Err(ReelError::validation(format!(
                "separator duration must be finite and non-negative (got {separator_sec})"
            )));
        }
        let mut parts = Vec::with_capacity(segments * 2 - 1);
        for i in 0..segments {
            parts.push(AudioPart::Source);
            if i + 1 < segments {
                parts.push(AudioPart::Silence {
                    duration_sec: separator_sec,
                });
            }
        }
        Ok(Self {
            source_duration_sec,
            parts,
        })
    }

    pub fn total_duration_sec(&self) -> f64 {
        self.parts
            .iter()
            .map(|p| match p {
                AudioPart::Source => self.source_duration_sec,
                AudioPart::Silence { duration_sec } => *duration_sec,
            })
            .sum()
    }

    pub fn source_copies(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p, AudioPart::Source))
            .count()
    }

    /// Concatenate the decoded source and zero-filled silence into one interleaved buffer.
    ///
    /// Every source copy is cut or zero-padded to exactly `source_duration_sec`, so the rendered
    /// length always matches [`AudioTrack::total_duration_sec`] whatever the decoder returned.
    pub fn render_pcm(&self, source: &AudioPcm) -> ReelResult<AudioPcm> {
        if source.channels == 0 || source.sample_rate == 0 {
            return Err(ReelError::media(
                "decoded audio has zero channels or sample rate",
            ));
        }
        let channels = usize::from(source.channels);
        let samples_for = |sec: f64| {
            (sec * f64::from(source.sample_rate)).round() as usize * channels
        };
        let copy_len = samples_for(self.source_duration_sec);
        let decoded = &source.interleaved_f32[..source.frames() * channels];
        if decoded.len() != copy_len {
            tracing::debug!(
                probed = self.source_duration_sec,
                decoded = source.duration_sec(),
                "fitting decoded audio to the probed duration"
            );
        }
        let kept = &decoded[..decoded.len().min(copy_len)];

        let capacity: usize = self
            .parts
            .iter()
            .map(|p| match p {
                AudioPart::Source => copy_len,
                AudioPart::Silence { duration_sec } => samples_for(*duration_sec),
            })
            .sum();

        let mut out = Vec::with_capacity(capacity);
        for part in &self.parts {
            let pad = match part {
                AudioPart::Source => {
                    out.extend_from_slice(kept);
                    copy_len - kept.len()
                }
                AudioPart::Silence { duration_sec } => samples_for(*duration_sec),
            };
            out.resize(out.len() + pad, 0.0);
        }
        Ok(AudioPcm {
            sample_rate: source.sample_rate,
            channels: source.channels,
            interleaved_f32: out,
        })
    }
}

/// Write interleaved samples as raw little-endian `f32`.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::media(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::media(format!(
            "failed to write audio track '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/track.rs"]
mod tests;
