//! Settings loading
//!
//! Settings live in a `settings.json` whose `server` key holds the
//! [`ServerConfig`]. Any failure to find, read or parse the file falls back
//! to [`ServerConfig::default`].

use std::path::{Path, PathBuf};

use crate::types::{ServerConfig, SettingsError, SettingsFile};

/// File name searched for when no explicit path is given
pub const SETTINGS_FILE: &str = "settings.json";

/// Find the settings file.
///
/// Search order:
/// 1. Current directory
/// 2. Directory containing the server executable
/// 3. Global config at ~/.config/signal-relay/
fn find_settings_file() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(SETTINGS_FILE));
    }

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(SETTINGS_FILE));
    }

    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("signal-relay").join(SETTINGS_FILE));
    }

    candidates.into_iter().find(|p| p.exists())
}

/// Load from a specific path
pub fn load_from_path(path: &Path) -> Result<ServerConfig, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: SettingsFile =
        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(settings.server)
}

/// Load from `explicit` if given, otherwise from the first file found by the search
pub fn load(explicit: Option<&Path>) -> Result<ServerConfig, SettingsError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_settings_file().ok_or(SettingsError::NotFound)?,
    };
    tracing::debug!("Loading server settings from: {}", path.display());
    load_from_path(&path)
}

/// Load settings, falling back to defaults on any error
pub fn load_or_default(explicit: Option<&Path>) -> ServerConfig {
    match load(explicit) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error loading server settings: {}", e);
            tracing::warn!("Using default server settings");
            ServerConfig::default()
        }
    }
}
