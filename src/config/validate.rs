// src/config/validate.rs

use crate::config::model::{RawSettings, Settings};
use crate::errors::{NicescadError, Result};

impl TryFrom<RawSettings> for Settings {
    type Error = NicescadError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        let defaults = Settings::default();

        let output_mode = match raw.openscad.output_mode.as_deref() {
            Some(s) => parse_output_mode(s)?,
            None => defaults.output_mode,
        };

        let extensions = match raw.catalog.extensions {
            Some(exts) => normalise_extensions(exts)?,
            None => defaults.extensions,
        };

        Ok(Settings {
            executable: raw.openscad.exec,
            scratch_dir: raw.openscad.tmp_dir,
            prepend: raw.openscad.prepend.unwrap_or(defaults.prepend),
            output_mode,
            catalog_root: raw.catalog.root.unwrap_or(defaults.catalog_root),
            extensions,
        })
    }
}

/// Parse an octal mode such as `"600"`, `"0600"` or `"0o600"`.
///
/// The owner must keep read and write access, otherwise the tool could not
/// write the artifact it was pointed at.
pub fn parse_output_mode(s: &str) -> Result<u32> {
    let trimmed = s.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);

    let mode = u32::from_str_radix(digits, 8).map_err(|_| {
        NicescadError::ConfigError(format!(
            "[openscad].output_mode must be an octal mode like \"600\" (got {s:?})"
        ))
    })?;

    if mode > 0o777 {
        return Err(NicescadError::ConfigError(format!(
            "[openscad].output_mode must be at most 777 (got {s:?})"
        )));
    }
    if mode & 0o600 != 0o600 {
        return Err(NicescadError::ConfigError(format!(
            "[openscad].output_mode must grant the owner read and write (got {s:?})"
        )));
    }

    Ok(mode)
}

fn normalise_extensions(exts: Vec<String>) -> Result<Vec<String>> {
    let exts: Vec<String> = exts
        .into_iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    if exts.is_empty() {
        return Err(NicescadError::ConfigError(
            "[catalog].extensions must name at least one extension".to_string(),
        ));
    }
    Ok(exts)
}
