// src/render/pipeline.rs

//! The `OpenScad` wrapper: turns OpenSCAD source text into an output artifact
//! by running the external executable.
//!
//! Every call writes its source to a freshly named scratch file, runs
//! `<exe> -o <output> <scratch>` and removes the scratch file again only if
//! the tool exited with code 0. Failed renders keep the scratch file around so
//! it can be inspected, and report its path in [`RenderResult::scratch_file`].
//!
//! A missing output file is created by us with the configured permissions
//! before the tool runs; an existing one keeps its contents until the tool
//! replaces it. After a successful run the permissions are applied again,
//! since tools may write elsewhere and rename over the output. No process-wide
//! state (such as the umask) is touched, so renders on one instance may
//! overlap as long as their outputs differ.
//!
//! When the pipeline owns its scratch directory, the directory is removed on
//! drop unless a failed render left a scratch source in it.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info, warn};

use crate::errors::{NicescadError, Result};
use crate::process::{ProcessResult, ProcessRunner, SystemRunner};
use crate::render::compose::compose_source;
use crate::render::locate::locate;

/// Boilerplate placed in front of user source unless suppressed.
pub const DEFAULT_PREPEND: &str = "//https://en.wikibooks.org/wiki/OpenSCAD_User_Manual/Other_Language_Features#$fa,_$fs_and_$fn
// default number of facets for arc generation
$fn=30;
";

/// File name of the output artifact when the caller does not pick one.
pub const DEFAULT_OUTPUT_NAME: &str = "tmp.stl";

/// Owner read/write only.
pub const DEFAULT_OUTPUT_MODE: u32 = 0o600;

/// Construction-time settings for [`OpenScad`].
///
/// Reading the environment is the caller's job (see
/// [`crate::config::Settings::apply_env`]); this struct is taken as given.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Explicit executable. When `None`, the platform locations are searched.
    pub executable: Option<PathBuf>,

    /// Directory for scratch sources and the default output. When `None`, a
    /// temporary directory is created and removed with the pipeline.
    pub scratch_dir: Option<PathBuf>,

    pub prepend: String,

    /// Unix permission bits for the output artifact.
    pub output_mode: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            executable: None,
            scratch_dir: None,
            prepend: DEFAULT_PREPEND.to_string(),
            output_mode: DEFAULT_OUTPUT_MODE,
        }
    }
}

/// Per-call knobs.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Output artifact path; defaults to `<scratch_dir>/tmp.stl`.
    pub output: Option<PathBuf>,

    /// Write the source without the prepend text.
    pub no_prepend: bool,
}

impl RenderOptions {
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    pub fn no_prepend(mut self, val: bool) -> Self {
        self.no_prepend = val;
        self
    }
}

/// A [`ProcessResult`] plus the paths the pipeline attached to it.
#[derive(Debug)]
pub struct RenderResult {
    process: ProcessResult,
    output_path: PathBuf,
    scratch_file: Option<PathBuf>,
}

impl RenderResult {
    pub fn process(&self) -> &ProcessResult {
        &self.process
    }

    pub fn into_process(self) -> ProcessResult {
        self.process
    }

    pub fn return_code(&self) -> i32 {
        self.process.return_code()
    }

    pub fn stderr(&self) -> &str {
        self.process.stderr()
    }

    pub fn success(&self) -> bool {
        self.process.return_code() == 0
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Scratch source kept on disk because the render failed.
    pub fn scratch_file(&self) -> Option<&Path> {
        self.scratch_file.as_deref()
    }

    /// Whether the output artifact exists and is non-empty.
    ///
    /// The pipeline itself only trusts the exit code; this is for callers
    /// that want to double check.
    pub fn has_output(&self) -> bool {
        fs::metadata(&self.output_path)
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }
}

#[derive(Debug)]
enum ScratchDir {
    Owned(OwnedScratch),
    Provided(PathBuf),
}

impl ScratchDir {
    fn path(&self) -> &Path {
        match self {
            ScratchDir::Owned(owned) => &owned.path,
            ScratchDir::Provided(path) => path,
        }
    }

    /// Keep the directory past the pipeline's lifetime.
    fn retain(&self) {
        if let ScratchDir::Owned(owned) = self {
            owned.retain.store(true, Ordering::Relaxed);
        }
    }
}

/// Temporary scratch directory, deleted on drop unless retained.
#[derive(Debug)]
struct OwnedScratch {
    dir: Option<TempDir>,
    path: PathBuf,
    retain: AtomicBool,
}

impl OwnedScratch {
    fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("nicescad-").tempdir()?;
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
            retain: AtomicBool::new(false),
        })
    }
}

impl Drop for OwnedScratch {
    fn drop(&mut self) {
        if !*self.retain.get_mut() {
            return;
        }
        if let Some(dir) = self.dir.take() {
            let path = dir.keep();
            info!(scratch_dir = %path.display(), "keeping scratch directory with failed sources");
        }
    }
}

/// Everything a single call needs between spawning and cleanup.
struct PreparedRender {
    command: Vec<String>,
    scratch: NamedTempFile,
    output_path: PathBuf,
    /// The output file did not exist before this call.
    created_output: bool,
}

/// Wrapper around the OpenSCAD executable.
pub struct OpenScad {
    executable: PathBuf,
    scratch_dir: ScratchDir,
    prepend: String,
    output_mode: u32,
    runner: Box<dyn ProcessRunner>,
}

impl std::fmt::Debug for OpenScad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenScad")
            .field("executable", &self.executable)
            .field("scratch_dir", &self.scratch_dir)
            .field("output_mode", &format_args!("{:o}", self.output_mode))
            .finish_non_exhaustive()
    }
}

impl OpenScad {
    /// Build a pipeline that runs real processes.
    ///
    /// Fails with [`NicescadError::ExecutableNotFound`] when no executable is
    /// configured and none is found in the usual places.
    pub fn new(config: RenderConfig) -> Result<Self> {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    /// Like [`OpenScad::new`], but executing commands through `runner`.
    pub fn with_runner(config: RenderConfig, runner: Box<dyn ProcessRunner>) -> Result<Self> {
        let executable = resolve_executable(config.executable, locate)?;

        let scratch_dir = match config.scratch_dir {
            Some(dir) => {
                fs::create_dir_all(&dir)?;
                ScratchDir::Provided(dir)
            }
            None => ScratchDir::Owned(OwnedScratch::create()?),
        };

        info!(
            executable = %executable.display(),
            scratch_dir = %scratch_dir.path().display(),
            "openscad pipeline ready"
        );

        Ok(Self {
            executable,
            scratch_dir,
            prepend: config.prepend,
            output_mode: config.output_mode,
            runner,
        })
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn scratch_dir(&self) -> &Path {
        self.scratch_dir.path()
    }

    pub fn prepend(&self) -> &str {
        &self.prepend
    }

    /// Replace the prepend text. Takes effect from the next call on.
    pub fn set_prepend(&mut self, prepend: impl Into<String>) {
        self.prepend = prepend.into();
    }

    pub fn output_mode(&self) -> u32 {
        self.output_mode
    }

    pub fn default_output_path(&self) -> PathBuf {
        self.scratch_dir().join(DEFAULT_OUTPUT_NAME)
    }

    /// The command a render to `output` would run, with `scratch` as input.
    pub fn command_for(&self, output: &Path, scratch: &Path) -> Vec<String> {
        vec![
            self.executable.to_string_lossy().into_owned(),
            "-o".to_string(),
            output.to_string_lossy().into_owned(),
            scratch.to_string_lossy().into_owned(),
        ]
    }

    /// Render `source` to the default output, blocking until the tool exits.
    pub fn render(&self, source: &str) -> Result<RenderResult> {
        self.render_with(source, &RenderOptions::default())
    }

    pub fn render_with(&self, source: &str, options: &RenderOptions) -> Result<RenderResult> {
        let prepared = self.prepare(source, options)?;
        let process = self.runner.run(&prepared.command);
        self.finish(prepared, process)
    }

    /// Render `source` to the default output without blocking the executor.
    pub async fn render_async(&self, source: &str) -> Result<RenderResult> {
        self.render_async_with(source, &RenderOptions::default()).await
    }

    pub async fn render_async_with(
        &self,
        source: &str,
        options: &RenderOptions,
    ) -> Result<RenderResult> {
        let prepared = self.prepare(source, options)?;
        let process = self.runner.run_async(&prepared.command).await;
        self.finish(prepared, process)
    }

    fn prepare(&self, source: &str, options: &RenderOptions) -> Result<PreparedRender> {
        let text = compose_source(&self.prepend, source, options.no_prepend);

        let mut scratch = tempfile::Builder::new()
            .prefix("render-")
            .suffix(".scad")
            .tempfile_in(self.scratch_dir())?;
        scratch.write_all(text.as_bytes())?;
        scratch.flush()?;

        let output_path = options
            .output
            .clone()
            .unwrap_or_else(|| self.default_output_path());
        let created_output = prepare_output(&output_path, self.output_mode)?;

        let command = self.command_for(&output_path, scratch.path());
        debug!(
            scratch = %scratch.path().display(),
            output = %output_path.display(),
            bytes = text.len(),
            "scratch source written"
        );

        Ok(PreparedRender {
            command,
            scratch,
            output_path,
            created_output,
        })
    }

    fn finish(&self, prepared: PreparedRender, process: ProcessResult) -> Result<RenderResult> {
        let PreparedRender {
            scratch,
            output_path,
            created_output,
            ..
        } = prepared;

        let scratch_file = if process.return_code() == 0 {
            scratch.close()?;
            restrict_output(&output_path, self.output_mode)?;
            None
        } else {
            let (_, path) = scratch.keep().map_err(io::Error::from)?;
            self.scratch_dir.retain();
            if created_output {
                discard_empty_output(&output_path);
            }
            warn!(
                exit_code = process.return_code(),
                scratch = %path.display(),
                "render failed; keeping scratch source"
            );
            Some(path)
        };

        Ok(RenderResult {
            process,
            output_path,
            scratch_file,
        })
    }
}

/// Pick the explicit executable if there is one, else ask `lookup`.
fn resolve_executable(
    explicit: Option<PathBuf>,
    lookup: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf> {
    match explicit {
        Some(path) if !path.as_os_str().is_empty() => Ok(path),
        _ => lookup().ok_or(NicescadError::ExecutableNotFound),
    }
}

/// Make sure the output file exists with `mode` before the tool runs.
///
/// A missing file is created empty with `mode`; an existing one keeps its
/// contents and only has its permissions tightened. Returns `true` when the
/// file was created here.
fn prepare_output(path: &Path, mode: u32) -> io::Result<bool> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut options = File::options();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    match options.open(path) {
        Ok(_) => {
            // the umask may have masked bits out of `mode`
            restrict_output(path, mode)?;
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            restrict_output(path, mode)?;
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Apply `mode` to the output file, if there is one.
fn restrict_output(path: &Path, mode: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if path.is_file() {
            fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
        }
    }

    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }

    Ok(())
}

/// Remove the placeholder created by [`prepare_output`] if the tool never
/// wrote to it.
fn discard_empty_output(path: &Path) {
    let empty = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(false);
    if empty {
        if let Err(err) = fs::remove_file(path) {
            debug!(path = %path.display(), error = %err, "could not remove empty output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_executable_wins_over_lookup() {
        let exe = resolve_executable(Some(PathBuf::from("/opt/openscad")), || {
            panic!("lookup must not run")
        })
        .unwrap();
        assert_eq!(exe, PathBuf::from("/opt/openscad"));
    }

    #[test]
    fn empty_explicit_executable_falls_back_to_lookup() {
        let exe = resolve_executable(Some(PathBuf::new()), || {
            Some(PathBuf::from("/usr/bin/openscad"))
        })
        .unwrap();
        assert_eq!(exe, PathBuf::from("/usr/bin/openscad"));
    }

    #[test]
    fn nothing_resolved_is_fatal() {
        let err = resolve_executable(None, || None).unwrap_err();
        assert!(matches!(err, NicescadError::ExecutableNotFound));
    }

    #[cfg(unix)]
    #[test]
    fn output_is_created_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out.stl");

        assert!(prepare_output(&out, 0o600).unwrap());

        let mode = fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn existing_output_keeps_contents_but_is_restricted() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.stl");
        fs::write(&out, b"solid previous").unwrap();
        fs::set_permissions(&out, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(!prepare_output(&out, 0o600).unwrap());

        let meta = fs::metadata(&out).unwrap();
        assert_eq!(fs::read(&out).unwrap(), b"solid previous");
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn restrict_output_tightens_a_replaced_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.stl");
        fs::write(&out, b"solid x").unwrap();
        fs::set_permissions(&out, fs::Permissions::from_mode(0o644)).unwrap();

        restrict_output(&out, 0o600).unwrap();
        restrict_output(&dir.path().join("missing.stl"), 0o600).unwrap();

        let mode = fs::metadata(&out).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn discard_keeps_non_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.stl");
        let full = dir.path().join("full.stl");
        fs::write(&empty, b"").unwrap();
        fs::write(&full, b"solid x").unwrap();

        discard_empty_output(&empty);
        discard_empty_output(&full);

        assert!(!empty.exists());
        assert!(full.exists());
    }
}
