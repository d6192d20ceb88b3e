pub mod decode;
pub mod formats;
pub mod group;
