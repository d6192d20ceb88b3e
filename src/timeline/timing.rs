use crate::foundation::error::{ReelError, ReelResult};

/// Display time for each image when `image_count` images share `audio_duration_sec`.
///
/// Every group receives the full reference duration; groups with different image counts get
/// different per-image durations.
pub fn per_image_duration(audio_duration_sec: f64, image_count: usize) -> ReelResult<f64> {
    if image_count == 0 {
        return Err(ReelError::validation("no images in group"));
    }
    if !(audio_duration_sec.is_finite() && audio_duration_sec > 0.0) {
        return Err(ReelError::validation(format!(
            "reference audio duration must be a positive number of seconds (got {audio_duration_sec})"
        )));
    }
    Ok(audio_duration_sec / image_count as f64)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/timing.rs"]
mod tests;
