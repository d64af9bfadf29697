// src/process/runner.rs

//! Blocking and async command runners.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::Stdio;

use tracing::{debug, info, warn};

use super::result::ProcessResult;

/// Trait abstracting how external commands are executed.
///
/// Production code uses [`SystemRunner`]; tests can provide an
/// implementation that records commands instead of spawning them.
///
/// Implementations never fail outward: every spawn or I/O error is folded into
/// the returned [`ProcessResult`].
pub trait ProcessRunner: Send + Sync {
    /// Run `command` and block the calling thread until it exits.
    fn run(&self, command: &[String]) -> ProcessResult;

    /// Run `command`, suspending only the calling task while the child runs.
    ///
    /// There is no timeout: a child that never exits keeps the future pending.
    fn run_async<'a>(
        &'a self,
        command: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ProcessResult> + Send + 'a>>;
}

/// Runs commands as real OS processes.
///
/// The first token is the program, the rest are its arguments. Tokens are not
/// validated or passed through a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &[String]) -> ProcessResult {
        let Some((program, args)) = command.split_first() else {
            return spawn_failed(command, empty_command());
        };

        debug!(command = %command.join(" "), "spawning process");
        let output = std::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(out) => {
                let result =
                    ProcessResult::completed(command, out.status, &out.stdout, &out.stderr);
                finished(command, result)
            }
            Err(err) => spawn_failed(command, err),
        }
    }

    fn run_async<'a>(
        &'a self,
        command: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ProcessResult> + Send + 'a>> {
        Box::pin(async move {
            let Some((program, args)) = command.split_first() else {
                return spawn_failed(command, empty_command());
            };

            debug!(command = %command.join(" "), "spawning process");
            let output = tokio::process::Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .output()
                .await;

            match output {
                Ok(out) => {
                    let result =
                        ProcessResult::completed(command, out.status, &out.stdout, &out.stderr);
                    finished(command, result)
                }
                Err(err) => spawn_failed(command, err),
            }
        })
    }
}

/// Run `command` with the [`SystemRunner`], blocking until it exits.
pub fn run(command: &[String]) -> ProcessResult {
    SystemRunner.run(command)
}

/// Run `command` with the [`SystemRunner`] without blocking the executor.
pub async fn run_async(command: &[String]) -> ProcessResult {
    SystemRunner.run_async(command).await
}

fn finished(command: &[String], result: ProcessResult) -> ProcessResult {
    info!(
        command = %command.join(" "),
        exit_code = result.return_code(),
        success = result.success(),
        "process exited"
    );
    result
}

fn spawn_failed(command: &[String], err: io::Error) -> ProcessResult {
    warn!(command = %command.join(" "), error = %err, "failed to spawn process");
    ProcessResult::spawn_failed(command, err)
}

fn empty_command() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, "empty command")
}
