/// Image saver
///
/// Encodes the working image to whatever format the target extension names.
/// The codec itself is the `image` crate's business.

use image::{GrayImage, ImageFormat};
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{Result, SessionError};

/// Filters offered by the save dialog: (label, extensions)
pub const SAVE_FILTERS: [(&str, &[&str]); 3] = [
    ("JPG file", &["jpg"]),
    ("TIF file", &["tif"]),
    ("All Files", &["*"]),
];

/// Encode `image` on a blocking worker
///
/// Returns the path written on success so the UI can report it.
pub async fn save_image(image: GrayImage, path: PathBuf) -> Result<PathBuf> {
    let fallback = path.clone();
    task::spawn_blocking(move || encode_to_path(&image, &path).map(|_| path))
        .await
        .map_err(|e| SessionError::unwritable(&fallback, format!("worker failed: {}", e)))?
}

/// Blocking implementation of image saving
pub fn encode_to_path(image: &GrayImage, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SessionError::unwritable(path, "no file selected"));
    }

    // Resolve the format before touching the filesystem
    let format = ImageFormat::from_path(path).map_err(|e| SessionError::unwritable(path, e))?;

    image
        .save_with_format(path, format)
        .map_err(|e| SessionError::unwritable(path, e))?;

    log::info!("Saved {}x{} {:?} to {}", image.width(), image.height(), format, path.display());
    Ok(())
}

/// Default file name proposed by the save dialog
pub fn suggested_file_name() -> String {
    chrono::Local::now()
        .format("Image_%Y-%m-%d_%H-%M-%S.jpg")
        .to_string()
}
