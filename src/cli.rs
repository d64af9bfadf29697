// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line arguments for `nicescad`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nicescad",
    version,
    about = "Render OpenSCAD sources with the openscad executable.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the settings file (TOML).
    ///
    /// Default: `nicescad.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `NICESCAD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render a .scad file to an STL mesh.
    Render(RenderArgs),

    /// Print the example catalog as JSON.
    Tree(TreeArgs),

    /// Print the openscad executable that would be used.
    Locate(LocateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// OpenSCAD source file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file. Default: INPUT with an `.stl` extension.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub exec: ExecArgs,

    /// Scratch directory for temporary sources.
    #[arg(long, value_name = "DIR")]
    pub tmp_dir: Option<PathBuf>,

    /// Do not put the configured prepend text in front of the source.
    #[arg(long)]
    pub no_prepend: bool,

    /// Resolve everything and print the command, but don't run it.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
pub struct LocateArgs {
    #[command(flatten)]
    pub exec: ExecArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ExecArgs {
    /// Path to the openscad executable (overrides OPENSCAD_EXEC).
    #[arg(long, value_name = "PATH")]
    pub openscad: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct TreeArgs {
    /// Catalog root. Default: `[catalog].root` from the settings file.
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Extension to include; may be repeated. Default: scad and xml.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_flags_parse() {
        let args = CliArgs::try_parse_from([
            "nicescad",
            "--log-level",
            "debug",
            "render",
            "part.scad",
            "-o",
            "out/part.stl",
            "--openscad",
            "/bin/true",
            "--no-prepend",
        ])
        .unwrap();

        let Command::Render(render) = args.command else {
            panic!("expected render subcommand");
        };
        assert_eq!(render.input, PathBuf::from("part.scad"));
        assert_eq!(render.output, Some(PathBuf::from("out/part.stl")));
        assert_eq!(render.exec.openscad, Some(PathBuf::from("/bin/true")));
        assert!(render.no_prepend);
        assert!(!render.dry_run);
    }

    #[test]
    fn tree_accepts_repeated_ext() {
        let args =
            CliArgs::try_parse_from(["nicescad", "tree", "demos", "--ext", "scad", "--ext", "xml"])
                .unwrap();
        let Command::Tree(tree) = args.command else {
            panic!("expected tree subcommand");
        };
        assert_eq!(tree.root, Some(PathBuf::from("demos")));
        assert_eq!(tree.extensions, vec!["scad", "xml"]);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(CliArgs::try_parse_from(["nicescad"]).is_err());
    }
}
