//! # Configuration Module
//!
//! Settings, tuning parameters and data directory setup for favshuffle.
//!
//! ## Data Storage
//!
//! The playlist library lives in the platform-standard data directory and the
//! settings file in the platform-standard config directory:
//! - Linux: `~/.local/share/favshuffle/library.json`, `~/.config/favshuffle/settings.json`
//! - macOS: `~/Library/Application Support/favshuffle/`
//! - Windows: `%APPDATA%\favshuffle\`
//!
//! Both locations can be overridden on the command line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "favshuffle";

/// Tuning parameters for the shuffle core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleConfig {
    /// Minimum distance between two occurrences of the same track.
    /// Also the size of the sampler's recent-window. `0` disables both.
    pub min_repeat_gap: usize,
    /// Extra occurrences budgeted per favorite:
    /// `target = unique + repeat_factor * favorites`
    pub repeat_factor: usize,
    /// Consecutive deferred draws after which the sampler gives up.
    pub max_consecutive_deferrals: usize,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            min_repeat_gap: 3,
            repeat_factor: 2,
            max_consecutive_deferrals: 1000,
        }
    }
}

impl ShuffleConfig {
    #[must_use]
    pub fn with_min_repeat_gap(min_repeat_gap: usize) -> Self {
        Self {
            min_repeat_gap,
            ..Self::default()
        }
    }
}

/// User settings, read from `settings.json`.
///
/// Every field has a default so a partial (or missing) file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playlist whose tracks get shuffled
    pub source_playlist: String,
    /// Playlist marking 1x favorites
    pub favorites_playlist: String,
    /// Playlist marking 2x favorites; optional in the library
    pub double_playlist: String,
    /// Write into this playlist instead of reordering the source in place
    pub output_playlist: Option<String>,
    pub min_repeat_gap: usize,
    /// Spread favorite repeats evenly after sampling
    pub redistribute: bool,
    /// Number of entries shown after a shuffle
    pub preview: usize,
    /// Library file override
    pub library_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_playlist: "Allstars".to_string(),
            favorites_playlist: "Favorites".to_string(),
            double_playlist: "Favorite".to_string(),
            output_playlist: None,
            min_repeat_gap: ShuffleConfig::default().min_repeat_gap,
            redistribute: false,
            preview: 15,
            library_path: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid settings file {}", path.display()))?;

        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    #[must_use]
    pub fn shuffle_config(&self) -> ShuffleConfig {
        ShuffleConfig::with_min_repeat_gap(self.min_repeat_gap)
    }
}

/// Returns the platform-appropriate data directory for favshuffle, creating
/// it if necessary.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The favshuffle subdirectory cannot be created due to permissions
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!(
            "Could not determine system data directory. \
             Please ensure your platform supports standard data directories."
        ))?;

    let app_dir = data_dir.join(APP_DIR);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!(
            "Failed to create favshuffle data directory at {}. Please check file permissions.",
            app_dir.display()
        ))?;

    Ok(app_dir)
}

/// Returns the default playlist library path (`library.json` in the data
/// directory).
///
/// # Errors
///
/// See [`get_data_dir`].
pub fn get_library_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("library.json"))
}

/// Returns the default settings file path. The file itself is optional.
///
/// # Errors
///
/// Returns an error if the system config directory cannot be determined.
pub fn get_settings_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine system config directory"))?;
    Ok(config_dir.join(APP_DIR).join("settings.json"))
}
