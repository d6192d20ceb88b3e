use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "aac", "m4a", "ogg", "flac"];

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| allowed.iter().any(|a| a.eq_ignore_ascii_case(e)))
}

pub fn is_supported_image(path: &Path) -> bool {
    has_extension(path, SUPPORTED_IMAGE_EXTENSIONS)
}

pub fn is_supported_audio(path: &Path) -> bool {
    has_extension(path, SUPPORTED_AUDIO_EXTENSIONS)
}

/// Fail fast on a missing audio file, a missing image or an empty image list.
pub fn validate_inputs<P: AsRef<Path>>(images: &[P], audio: &Path) -> ReelResult<()> {
    if !audio.is_file() {
        return Err(ReelError::validation(format!(
            "audio file not found: {}",
            audio.display()
        )));
    }
    for p in images {
        let p = p.as_ref();
        if !p.is_file() {
            return Err(ReelError::validation(format!(
                "image file not found: {}",
                p.display()
            )));
        }
    }
    if images.is_empty() {
        return Err(ReelError::validation("no images provided"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/formats.rs"]
mod tests;
