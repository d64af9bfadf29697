// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::catalog::DEFAULT_EXTENSIONS;
use crate::render::{DEFAULT_OUTPUT_MODE, DEFAULT_PREPEND, RenderConfig};

/// Settings file as read from TOML, before validation.
///
/// ```toml
/// [openscad]
/// exec = "/usr/bin/openscad"
/// tmp_dir = "/tmp/nicescad"
/// prepend = "$fn=30;\n"
/// output_mode = "600"
///
/// [catalog]
/// root = "demos"
/// extensions = ["scad", "xml"]
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSettings {
    #[serde(default)]
    pub openscad: OpenScadSection,

    #[serde(default)]
    pub catalog: CatalogSection,
}

/// `[openscad]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenScadSection {
    /// Path of the executable. Probed for when unset.
    #[serde(default)]
    pub exec: Option<PathBuf>,

    /// Scratch directory. A temporary one is used when unset.
    #[serde(default)]
    pub tmp_dir: Option<PathBuf>,

    /// Text placed before every rendered source. `""` disables it.
    #[serde(default)]
    pub prepend: Option<String>,

    /// Octal permission bits for output files, e.g. `"600"` or `"0o640"`.
    #[serde(default)]
    pub output_mode: Option<String>,
}

/// `[catalog]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSection {
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

/// Validated settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub executable: Option<PathBuf>,
    pub scratch_dir: Option<PathBuf>,
    pub prepend: String,
    pub output_mode: u32,
    pub catalog_root: PathBuf,
    /// Lower-case, without leading dots.
    pub extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            executable: None,
            scratch_dir: None,
            prepend: DEFAULT_PREPEND.to_string(),
            output_mode: DEFAULT_OUTPUT_MODE,
            catalog_root: PathBuf::from("demos"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            executable: self.executable.clone(),
            scratch_dir: self.scratch_dir.clone(),
            prepend: self.prepend.clone(),
            output_mode: self.output_mode,
        }
    }
}
