use std::fs;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use nicescad::process::{ProcessResult, ProcessRunner};

/// One command seen by [`RecordingRunner`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: Vec<String>,
    /// Contents of the last token (the scratch source) at call time.
    pub input: Option<String>,
}

/// A fake runner that:
/// - records every command and the scratch source it points at
/// - answers with a fixed exit code and stderr, without spawning anything.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    return_code: i32,
    stderr: String,
}

impl RecordingRunner {
    pub fn succeeding() -> Self {
        Self::exiting(0, "")
    }

    pub fn exiting(return_code: i32, stderr: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            return_code,
            stderr: stderr.to_string(),
        }
    }

    /// Shared view of the recorded calls; stays valid after the runner has
    /// been boxed into a pipeline.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }

    fn record(&self, command: &[String]) -> ProcessResult {
        let input = command
            .last()
            .and_then(|path| fs::read_to_string(Path::new(path)).ok());
        self.calls.lock().unwrap().push(RecordedCall {
            command: command.to_vec(),
            input,
        });
        ProcessResult::exited(command, self.return_code, "", self.stderr.clone())
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &[String]) -> ProcessResult {
        self.record(command)
    }

    fn run_async<'a>(
        &'a self,
        command: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ProcessResult> + Send + 'a>> {
        Box::pin(async move { self.record(command) })
    }
}
