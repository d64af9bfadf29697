// src/process/mod.rs

//! External process execution.
//!
//! - [`result`] holds [`ProcessResult`], the immutable record of one command.
//! - [`runner`] provides the [`ProcessRunner`] trait and the [`SystemRunner`]
//!   used in production. Both the blocking and the async entry points fold
//!   every failure into a `ProcessResult`; nothing here returns an error.
//!
//! Tests can swap in their own `ProcessRunner` to avoid spawning processes.

pub mod result;
pub mod runner;

pub use result::ProcessResult;
pub use runner::{ProcessRunner, SystemRunner, run, run_async};
