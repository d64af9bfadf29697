// src/render/mod.rs

//! OpenSCAD render pipeline.
//!
//! - [`locate`] searches conventional install locations for the executable.
//! - [`compose`] decides what text ends up in the scratch source file.
//! - [`pipeline`] owns the [`OpenScad`] wrapper: scratch files, output
//!   permissions, invoking the tool and cleaning up after it.

pub mod compose;
pub mod locate;
pub mod pipeline;

pub use compose::{NO_PREPEND_MARKER, compose_source, has_no_prepend_marker};
pub use locate::{locate, locate_in, platform_candidates};
pub use pipeline::{
    DEFAULT_OUTPUT_MODE, DEFAULT_OUTPUT_NAME, DEFAULT_PREPEND, OpenScad, RenderConfig,
    RenderOptions, RenderResult,
};
