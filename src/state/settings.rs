use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::imaging::Canvas;
use crate::imaging::loader::CANVAS_SIZE;

/// Largest canvas edge accepted from the settings file
pub const MAX_CANVAS_EDGE: u32 = 4096;

/// User preferences persisted between runs.
///
/// The file lives in the user's config directory:
/// - Linux: ~/.config/grayscale-viewer/settings.json
/// - macOS: ~/Library/Application Support/grayscale-viewer/settings.json
/// - Windows: %APPDATA%\grayscale-viewer\settings.json
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Width every opened image is resized to
    pub canvas_width: u32,
    /// Height every opened image is resized to
    pub canvas_height: u32,
    /// Directory the file dialogs start in
    pub last_directory: Option<PathBuf>,
    /// Dark or light theme
    pub dark_theme: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_SIZE,
            canvas_height: CANVAS_SIZE,
            last_directory: None,
            dark_theme: true,
        }
    }
}

impl Settings {
    /// Get the path where the settings file should be stored
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(SettingsError::NoConfigDir)?;

        path.push("grayscale-viewer");
        path.push("settings.json");
        Ok(path)
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        Ok(settings)
    }

    /// Write settings to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Canvas described by these settings.
    ///
    /// Zero falls back to the default edge; anything above
    /// `MAX_CANVAS_EDGE` is clamped to it.
    pub fn canvas(&self) -> Canvas {
        let edge = |v: u32| match v {
            0 => CANVAS_SIZE,
            v => v.min(MAX_CANVAS_EDGE),
        };
        Canvas {
            width: edge(self.canvas_width),
            height: edge(self.canvas_height),
        }
    }

    /// Remember the directory of a file the user just picked
    pub fn remember_directory_of(&mut self, file: &Path) {
        if let Some(parent) = file.parent() {
            self.last_directory = Some(parent.to_path_buf());
        }
    }
}
