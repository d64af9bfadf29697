// src/lib.rs

pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod process;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::catalog::build_tree;
use crate::cli::{CliArgs, Command, LocateArgs, RenderArgs, TreeArgs};
use crate::config::{Settings, default_config_path, load_or_default};
use crate::errors::NicescadError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::render::{OpenScad, RenderOptions, locate};

/// High-level entry point used by `main.rs`.
///
/// Loads settings, applies environment and CLI overrides, and dispatches the
/// subcommand. Returns the process exit code: `0` on success, the tool's exit
/// code when a render fails.
pub async fn run(args: CliArgs) -> Result<i32> {
    let settings = load_settings(args.config.as_deref())?;

    match args.command {
        Command::Render(render_args) => run_render(settings, render_args).await,
        Command::Tree(tree_args) => run_tree(&settings, tree_args),
        Command::Locate(locate_args) => run_locate(settings, locate_args),
    }
}

fn load_settings(config: Option<&Path>) -> Result<Settings> {
    let (path, explicit) = match config {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_path(), false),
    };
    let settings = load_or_default(&path, explicit)
        .with_context(|| format!("loading settings from {}", path.display()))?;
    debug!(?settings, "settings loaded");
    Ok(settings)
}

async fn run_render(mut settings: Settings, args: RenderArgs) -> Result<i32> {
    if let Some(exec) = args.exec.openscad {
        settings.executable = Some(exec);
    }
    if let Some(dir) = args.tmp_dir {
        settings.scratch_dir = Some(dir);
    }
    settings.apply_process_env();

    let source = RealFileSystem.read_to_string(&args.input)?;
    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("stl"));

    let oscad = OpenScad::new(settings.render_config())?;

    if args.dry_run {
        print_dry_run(&oscad, &output, args.no_prepend);
        return Ok(0);
    }

    info!(input = %args.input.display(), output = %output.display(), "rendering");
    let options = RenderOptions::default()
        .output(&output)
        .no_prepend(args.no_prepend);
    let result = oscad.render_async_with(&source, &options).await?;

    print!("{}", result.process().stdout());
    eprint!("{}", result.stderr());

    if result.success() {
        if !result.has_output() {
            warn!(
                output = %result.output_path().display(),
                "openscad exited successfully but produced no output"
            );
        }
        println!("{}", result.output_path().display());
        return Ok(0);
    }

    let code = result.return_code();
    match result.scratch_file() {
        Some(scratch) => eprintln!(
            "render failed with exit code {code}; source kept at {}",
            scratch.display()
        ),
        None => eprintln!("render failed with exit code {code}"),
    }
    Ok(if code > 0 { code } else { 1 })
}

fn run_tree(settings: &Settings, args: TreeArgs) -> Result<i32> {
    let root = args.root.unwrap_or_else(|| settings.catalog_root.clone());
    let extensions = if args.extensions.is_empty() {
        settings.extensions.clone()
    } else {
        args.extensions
    };

    let tree = build_tree(&RealFileSystem, &root, &extensions)?;
    let json = serde_json::to_string_pretty(&tree).map_err(NicescadError::from)?;
    println!("{json}");
    Ok(0)
}

fn run_locate(mut settings: Settings, args: LocateArgs) -> Result<i32> {
    if let Some(exec) = args.exec.openscad {
        settings.executable = Some(exec);
    }
    settings.apply_process_env();

    let exe: PathBuf = match settings.executable {
        Some(path) => path,
        None => locate().ok_or(NicescadError::ExecutableNotFound)?,
    };
    println!("{}", exe.display());
    Ok(0)
}

/// Print the resolved settings and command line without running the tool.
///
/// Building the pipeline may already have created the scratch directory.
fn print_dry_run(oscad: &OpenScad, output: &Path, no_prepend: bool) {
    let scratch = oscad.scratch_dir().join("render-XXXXXX.scad");
    println!("nicescad dry-run");
    println!("  executable  = {}", oscad.executable().display());
    println!("  scratch dir = {}", oscad.scratch_dir().display());
    println!("  output      = {}", output.display());
    println!("  output mode = {:o}", oscad.output_mode());
    println!("  prepend     = {}", !no_prepend && !oscad.prepend().is_empty());
    println!("  command     = {}", oscad.command_for(output, &scratch).join(" "));
}
