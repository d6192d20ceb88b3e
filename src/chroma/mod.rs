pub mod detect;
pub mod hsv;
