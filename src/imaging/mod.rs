/// Image codec boundary
///
/// This module handles:
/// - Decoding and normalizing opened files (loader.rs)
/// - Encoding the working image to disk (saver.rs)

pub mod loader;
pub mod saver;

pub use loader::{Canvas, LoadedImage};
