// src/catalog/mod.rs

//! Example-file catalog.
//!
//! Builds the directory tree a file picker shows: every directory below the
//! catalog root plus the files whose extension is in an allow-list, each with
//! a hierarchical id (`"1"`, `"1.2"`, `"1.2.3"`, ...).

pub mod tree;

pub use tree::{DEFAULT_EXTENSIONS, TreeNode, build_tree, find_node_by_id};
