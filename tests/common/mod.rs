#![allow(dead_code)]

use std::path::{Path, PathBuf};

use nicescad::process::ProcessRunner;
use nicescad::render::{OpenScad, RenderConfig};

pub use nicescad_test_utils::fake_runner::{RecordedCall, RecordingRunner};
pub use nicescad_test_utils::{init_tracing, with_timeout};

pub const PREPEND: &str = "$fn=30;\n";

/// Config with an explicit executable and scratch directory.
pub fn config_in(scratch: &Path, executable: impl Into<PathBuf>) -> RenderConfig {
    RenderConfig {
        executable: Some(executable.into()),
        scratch_dir: Some(scratch.to_path_buf()),
        prepend: PREPEND.to_string(),
        ..RenderConfig::default()
    }
}

/// Pipeline over `runner` that never touches a real executable.
pub fn pipeline_with(scratch: &Path, runner: impl ProcessRunner + 'static) -> OpenScad {
    OpenScad::with_runner(config_in(scratch, "/opt/openscad/bin/openscad"), Box::new(runner))
        .expect("pipeline with explicit executable")
}

/// Files in `dir` whose name ends in `.scad`.
pub fn scad_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "scad"))
        .collect();
    files.sort();
    files
}

/// `true` from the usual unix locations.
pub fn true_binary() -> PathBuf {
    ["/bin/true", "/usr/bin/true"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .expect("no `true` binary found")
}
