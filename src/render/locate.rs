// src/render/locate.rs

//! Best-effort lookup of the OpenSCAD executable in the places the official
//! installers use. A `None` result is not an error here; callers decide.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::{FileSystem, RealFileSystem};

/// Probe the conventional locations for the current OS.
pub fn locate() -> Option<PathBuf> {
    let candidates = platform_candidates(std::env::consts::OS, |key| std::env::var(key).ok());
    locate_in(&RealFileSystem, &candidates)
}

/// Return the first candidate that is a regular file.
pub fn locate_in(fs: &dyn FileSystem, candidates: &[PathBuf]) -> Option<PathBuf> {
    let found = candidates.iter().find(|path| fs.is_file(path)).cloned();
    debug!(?candidates, ?found, "searched for openscad executable");
    found
}

/// Candidate executable paths for an OS name as reported by
/// `std::env::consts::OS`. `env` resolves the Windows program-files folders.
pub fn platform_candidates(os: &str, env: impl Fn(&str) -> Option<String>) -> Vec<PathBuf> {
    match os {
        "linux" => vec![
            PathBuf::from("/usr/bin/openscad"),
            PathBuf::from("/usr/local/bin/openscad"),
        ],
        "macos" => vec![PathBuf::from(
            "/Applications/OpenSCAD.app/Contents/MacOS/OpenSCAD",
        )],
        "windows" => ["ProgramFiles(x86)", "ProgramFiles"]
            .iter()
            .map(|key| {
                let base = env(key).unwrap_or_else(|| "C:".to_string());
                Path::new(&base).join("OpenSCAD").join("openscad.exe")
            })
            .collect(),
        _ => Vec::new(),
    }
}
