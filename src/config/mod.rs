// src/config/mod.rs

//! Configuration loading and validation for nicescad.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a settings file from disk (`loader.rs`).
//! - Validate and normalise raw values (`validate.rs`).
//! - Fill unset values from `OPENSCAD_*` environment variables (`env.rs`).
//!
//! The render pipeline itself never reads the environment; it receives a
//! [`crate::render::RenderConfig`] built from [`Settings`].

pub mod env;
pub mod loader;
pub mod model;
pub mod validate;

pub use env::{ENV_EXEC, ENV_TMP_DIR};
pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{CatalogSection, OpenScadSection, RawSettings, Settings};
