//! Application settings loaded from `pharmacy.toml`.
//!
//! The file is optional. Values missing from it fall back to defaults, and
//! `DATABASE_URL` in the environment (typically supplied through `.env`) always
//! wins over the file.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Settings file looked up when `PHARMACY_CONFIG` is not set.
pub const DEFAULT_SETTINGS_PATH: &str = "pharmacy.toml";

/// Top-level settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Connection string handed to `SeaORM`
    pub database_url: String,
    /// Name stamped into `updated_by` for writes issued from the admin CLI
    pub operator: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            operator: "system".to_string(),
        }
    }
}

/// Parses settings from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse settings file {}: {e}", path_ref.display()),
    })
}

/// Loads settings from `PHARMACY_CONFIG` (or `pharmacy.toml`), then applies
/// `DATABASE_URL` from the environment.
///
/// A missing default file is not an error; an explicitly configured path that
/// cannot be read is.
pub fn load_settings() -> Result<Settings> {
    let mut settings = match std::env::var("PHARMACY_CONFIG") {
        Ok(path) => load_config(path)?,
        Err(_) if Path::new(DEFAULT_SETTINGS_PATH).exists() => load_config(DEFAULT_SETTINGS_PATH)?,
        Err(_) => Settings::default(),
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        settings.database_url = url;
    }

    Ok(settings)
}
