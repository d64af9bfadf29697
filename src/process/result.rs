// src/process/result.rs

use std::fmt;
use std::io;
use std::process::ExitStatus;

/// Return code reported when no real exit code exists: the process could not
/// be spawned, or it was terminated by a signal.
pub const NO_EXIT_CODE: i32 = -1;

/// Outcome of a single external command.
///
/// Built exactly once, when the command finished or failed to start, and
/// never changed afterwards; fields are only reachable through accessors.
///
/// `exception` is `Some` only when the OS could not start or talk to the
/// process. A process that ran and exited non-zero is described by
/// `return_code` alone.
#[derive(Debug)]
pub struct ProcessResult {
    stdout: String,
    stderr: String,
    command: Vec<String>,
    return_code: i32,
    exception: Option<io::Error>,
}

impl ProcessResult {
    /// Result of a process that ran to completion.
    pub fn completed(command: &[String], status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Self {
        Self::exited(
            command,
            status.code().unwrap_or(NO_EXIT_CODE),
            String::from_utf8_lossy(stdout).into_owned(),
            String::from_utf8_lossy(stderr).into_owned(),
        )
    }

    /// Result of a process that exited with `return_code`.
    pub fn exited(
        command: &[String],
        return_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            command: command.to_vec(),
            return_code,
            exception: None,
        }
    }

    /// Result of a command that never ran. `stderr` carries the error text.
    pub fn spawn_failed(command: &[String], err: io::Error) -> Self {
        Self {
            stdout: String::new(),
            stderr: err.to_string(),
            command: command.to_vec(),
            return_code: NO_EXIT_CODE,
            exception: Some(err),
        }
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn return_code(&self) -> i32 {
        self.return_code
    }

    pub fn exception(&self) -> Option<&io::Error> {
        self.exception.as_ref()
    }

    /// `true` when the process ran and exited with code 0.
    pub fn success(&self) -> bool {
        self.exception.is_none() && self.return_code == 0
    }

    /// Command tokens joined by spaces, for logs and messages.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

impl fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` exited with {}", self.command_line(), self.return_code)?;
        if let Some(err) = &self.exception {
            write!(f, " ({err})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exited_non_zero_has_no_exception() {
        let command = cmd(&["openscad", "-o", "x.stl"]);
        let result = ProcessResult::exited(&command, 1, "", "parse error");
        assert_eq!(result.return_code(), 1);
        assert!(result.exception().is_none());
        assert!(!result.success());
        assert_eq!(result.stderr(), "parse error");
    }

    #[test]
    fn spawn_failed_carries_error_text_and_minus_one() {
        let err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let result = ProcessResult::spawn_failed(&cmd(&["missing"]), err);

        assert_eq!(result.return_code(), NO_EXIT_CODE);
        assert_eq!(result.stderr(), "no such file");
        assert_eq!(result.exception().map(|e| e.kind()), Some(io::ErrorKind::NotFound));
        assert!(!result.success());
    }

    #[test]
    fn display_includes_command_and_code() {
        let result = ProcessResult::exited(&cmd(&["openscad", "a.scad"]), 0, "", "");
        assert_eq!(result.to_string(), "`openscad a.scad` exited with 0");
    }
}
