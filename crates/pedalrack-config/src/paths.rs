//! Platform-specific paths for settings, presets, and assets.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/pedalrack/` (Linux), `~/Library/Application Support/pedalrack/` (macOS), `%APPDATA%\pedalrack\` (Windows)
//! - **Settings file**: `config.toml` inside the user config directory
//! - **Presets**: `~/.local/share/pedalrack/presets/` (Linux) and the platform data directory elsewhere
//! - **Impulse responses**: `impulses/` next to the presets directory
//!
//! # Example
//!
//! ```rust,no_run
//! use pedalrack_config::paths;
//!
//! println!("Settings: {:?}", paths::default_settings_path());
//! println!("Presets:  {:?}", paths::user_presets_dir());
//! ```

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "pedalrack";

/// Settings file name inside the config directory.
const SETTINGS_FILE: &str = "config.toml";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Subdirectory name for impulse responses.
const IMPULSES_SUBDIR: &str = "impulses";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific data directory.
///
/// Returns a fallback path if the data directory cannot be determined.
pub fn user_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default settings file location.
pub fn default_settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Default preset store directory.
pub fn user_presets_dir() -> PathBuf {
    user_data_dir().join(PRESETS_SUBDIR)
}

/// Default impulse response directory.
pub fn user_impulses_dir() -> PathBuf {
    user_data_dir().join(IMPULSES_SUBDIR)
}

/// Ensure a directory exists, creating it and any parents.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<(), ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
    }
    Ok(())
}
