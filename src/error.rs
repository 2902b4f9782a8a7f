use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of an image session operation.
///
/// Every variant is terminal to the attempted operation only: the session
/// keeps whatever state it had before the call. Details are carried as
/// strings so the error can travel inside UI messages (`Clone`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Cannot read image {}: {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("Cannot write image {}: {reason}", .path.display())]
    UnwritableTarget { path: PathBuf, reason: String },

    #[error("No image loaded")]
    NoImageLoaded,
}

impl SessionError {
    pub fn unreadable(path: &Path, reason: impl Display) -> Self {
        SessionError::UnreadableFile {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn unwritable(path: &Path, reason: impl Display) -> Self {
        SessionError::UnwritableTarget {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Failures while reading or writing the settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file is malformed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
}

pub type Result<T> = std::result::Result<T, SessionError>;
