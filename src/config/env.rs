// src/config/env.rs

//! Environment overrides.
//!
//! `OPENSCAD_EXEC` and `OPENSCAD_TMP_DIR` only fill values the settings file
//! and command line left unset. The lookup is injected so callers decide
//! where values come from (`std::env::var` in the binary, a map in tests).

use std::path::PathBuf;

use tracing::debug;

use crate::config::model::Settings;

pub const ENV_EXEC: &str = "OPENSCAD_EXEC";
pub const ENV_TMP_DIR: &str = "OPENSCAD_TMP_DIR";

impl Settings {
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        if self.executable.is_none() {
            if let Some(exec) = lookup(ENV_EXEC) {
                debug!(%exec, "executable from {ENV_EXEC}");
                self.executable = Some(PathBuf::from(exec));
            }
        }

        if self.scratch_dir.is_none() {
            if let Some(dir) = lookup(ENV_TMP_DIR) {
                debug!(%dir, "scratch directory from {ENV_TMP_DIR}");
                self.scratch_dir = Some(PathBuf::from(dir));
            }
        }
    }

    /// [`Settings::apply_env`] with the real process environment.
    pub fn apply_process_env(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }
}
