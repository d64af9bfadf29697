// src/catalog/tree.rs

use std::cmp::Ordering;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{NicescadError, Result};
use crate::fs::FileSystem;

/// Extensions shown when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["scad", "xml"];

/// One entry of the catalog.
///
/// `children` is `Some` for directories (possibly empty) and `None` for files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn is_dir(&self) -> bool {
        self.children.is_some()
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of file nodes in this subtree.
    pub fn file_count(&self) -> usize {
        match &self.children {
            None => 1,
            Some(children) => children.iter().map(TreeNode::file_count).sum(),
        }
    }
}

/// Build the catalog tree rooted at `root`.
///
/// Directories come before files, each group sorted by name. `extensions` are
/// matched case-insensitively, with or without a leading dot.
pub fn build_tree(fs: &dyn FileSystem, root: &Path, extensions: &[String]) -> Result<TreeNode> {
    if !fs.is_dir(root) {
        return Err(NicescadError::ConfigError(format!(
            "catalog root {:?} is not a directory",
            root
        )));
    }

    let extensions: Vec<String> = extensions
        .iter()
        .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let tree = build_dir_node(fs, root, "1".to_string(), &extensions)?;
    debug!(root = %root.display(), files = tree.file_count(), "catalog tree built");
    Ok(tree)
}

fn build_dir_node(
    fs: &dyn FileSystem,
    dir: &Path,
    id: String,
    extensions: &[String],
) -> Result<TreeNode> {
    let mut entries: Vec<(bool, std::path::PathBuf)> = fs
        .read_dir(dir)?
        .into_iter()
        .filter_map(|path| {
            if fs.is_dir(&path) {
                Some((true, path))
            } else if fs.is_file(&path) && has_extension(&path, extensions) {
                Some((false, path))
            } else {
                None
            }
        })
        .collect();

    // directories first, then by name
    entries.sort_by(|(a_dir, a), (b_dir, b)| match b_dir.cmp(a_dir) {
        Ordering::Equal => a.file_name().cmp(&b.file_name()),
        other => other,
    });

    let mut children = Vec::with_capacity(entries.len());
    for (index, (is_dir, path)) in entries.into_iter().enumerate() {
        let child_id = format!("{id}.{}", index + 1);
        let child = if is_dir {
            build_dir_node(fs, &path, child_id, extensions)?
        } else {
            TreeNode {
                id: child_id,
                label: label_of(&path),
                value: path.to_string_lossy().into_owned(),
                children: None,
            }
        };
        children.push(child);
    }

    Ok(TreeNode {
        id,
        label: label_of(dir),
        value: dir.to_string_lossy().into_owned(),
        children: Some(children),
    })
}

/// Depth-first search for the node with exactly `id`.
pub fn find_node_by_id<'a>(node: &'a TreeNode, id: &str) -> Option<&'a TreeNode> {
    if node.id == id {
        return Some(node);
    }
    node.children()
        .iter()
        .find_map(|child| find_node_by_id(child, id))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn label_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
