// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawSettings, Settings};
use crate::errors::Result;

/// Load a settings file and return the raw `RawSettings`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to get
/// usable [`Settings`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSettings> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawSettings = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a settings file from path, apply defaults and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let raw = load_from_path(&path)?;
    Settings::try_from(raw)
}

/// Load settings, tolerating a missing file unless it was asked for.
///
/// - `explicit = true` (the user passed `--config`): a missing file is an
///   error.
/// - `explicit = false` (the default path): a missing file yields
///   [`Settings::default`].
pub fn load_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<Settings> {
    let path = path.as_ref();
    if !explicit && !path.exists() {
        debug!(path = %path.display(), "no settings file; using defaults");
        return Ok(Settings::default());
    }
    load_and_validate(path)
}

/// `nicescad.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("nicescad.toml")
}
