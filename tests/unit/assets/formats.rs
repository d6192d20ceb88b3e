use std::path::PathBuf;

use super::*;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "reelkit_formats_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn extension_checks_are_case_insensitive() {
    assert!(is_supported_image(Path::new("A1.JPG")));
    assert!(is_supported_image(Path::new("/x/b.webp")));
    assert!(!is_supported_image(Path::new("notes.txt")));
    assert!(!is_supported_image(Path::new("noext")));
    assert!(is_supported_audio(Path::new("voice.M4A")));
    assert!(!is_supported_audio(Path::new("voice.png")));
}

#[test]
fn validate_inputs_checks_audio_images_and_emptiness() {
    let dir = scratch_dir("validate");
    let audio = dir.join("a.wav");
    let img = dir.join("A1.png");
    std::fs::write(&audio, b"x").unwrap();
    std::fs::write(&img, b"x").unwrap();

    validate_inputs(&[&img], &audio).unwrap();

    let err = validate_inputs(&[&img], &dir.join("missing.wav")).unwrap_err();
    assert!(err.to_string().contains("audio file not found"));

    let err = validate_inputs(&[dir.join("missing.png")], &audio).unwrap_err();
    assert!(err.to_string().contains("image file not found"));

    let none: [PathBuf; 0] = [];
    let err = validate_inputs(&none, &audio).unwrap_err();
    assert!(err.is_validation());
}
