//! # Settings Loader
//!
//! Centralized settings loading for the dashboard application. It handles
//! loading configuration from JSON files, particularly the main
//! `settings.json` that carries the server bind address, the document
//! store location, and overview defaults.
//!
//! ## Features
//!
//! - Load settings from specified file paths
//! - Load settings from the default location (`settings.json`)
//! - Handle optional settings gracefully
//! - Provide fallback mechanisms when settings files are missing
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/settings.json")?;
//!
//! // Load from the default location
//! let settings = settings_loader::load_default_settings()?;
//!
//! // Load optional settings (returns None if no path is provided)
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_optional_settings(path.as_ref())?;
//! # anyhow::Ok(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings("settings.json")
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Tries to load settings from the provided path, falling back to the default
/// location if the path is None or unreadable. Falls back to built-in defaults
/// only when no settings file is found anywhere.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Settings> {
    if let Some(settings_path) = path {
        if let Ok(settings) = load_settings(settings_path) {
            return Ok(settings);
        }
        // If the provided path fails, fall back to checking the default location
    }

    match load_default_settings() {
        Ok(settings) => Ok(settings),
        Err(_) => Ok(Settings::default()),
    }
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}
