/// Image loader
///
/// Decodes an image from disk and normalizes it for the session:
/// single-channel luma, resized to the fixed canvas.

use image::imageops::{self, FilterType};
use image::{GenericImageView, GrayImage, ImageReader};
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{Result, SessionError};

/// Default canvas edge in pixels
pub const CANVAS_SIZE: u32 = 300;

/// Target dimensions every opened image is normalized to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: CANVAS_SIZE,
            height: CANVAS_SIZE,
        }
    }
}

/// A decoded and normalized image, ready to be published into a session
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// File the image was read from
    pub path: PathBuf,
    /// Grayscale pixels at canvas size
    pub image: GrayImage,
    /// Dimensions of the file before normalization
    pub source_dimensions: (u32, u32),
}

/// Load and normalize an image on a blocking worker
///
/// # Arguments
/// * `path` - Path chosen in the open dialog
/// * `canvas` - Target dimensions
///
/// # Returns
/// * `Ok(LoadedImage)` - Normalized image
/// * `Err(SessionError::UnreadableFile)` - Empty path, missing or undecodable file
pub async fn load_image(path: PathBuf, canvas: Canvas) -> Result<LoadedImage> {
    let fallback = path.clone();
    task::spawn_blocking(move || load_normalized(&path, canvas))
        .await
        .map_err(|e| SessionError::unreadable(&fallback, format!("worker failed: {}", e)))?
}

/// Blocking implementation of image loading
pub fn load_normalized(path: &Path, canvas: Canvas) -> Result<LoadedImage> {
    if path.as_os_str().is_empty() {
        return Err(SessionError::unreadable(path, "no file selected"));
    }

    // Sniff the format from the content so misnamed files still open
    let decoded = ImageReader::open(path)
        .map_err(|e| SessionError::unreadable(path, e))?
        .with_guessed_format()
        .map_err(|e| SessionError::unreadable(path, e))?
        .decode()
        .map_err(|e| SessionError::unreadable(path, e))?;

    let source_dimensions = decoded.dimensions();
    let gray = decoded.to_luma8();
    let image = if gray.dimensions() == (canvas.width, canvas.height) {
        gray
    } else {
        imageops::resize(&gray, canvas.width, canvas.height, FilterType::CatmullRom)
    };

    log::info!(
        "Loaded {} ({}x{} -> {}x{} gray)",
        path.display(),
        source_dimensions.0,
        source_dimensions.1,
        canvas.width,
        canvas.height
    );

    Ok(LoadedImage {
        path: path.to_path_buf(),
        image,
        source_dimensions,
    })
}
