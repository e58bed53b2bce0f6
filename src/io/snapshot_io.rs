use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::IoError;
use crate::drag::script::Gesture;
use crate::model::node::Node;
use crate::model::tree::Tree;

/// Read a tree snapshot: a JSON array of root nodes.
///
/// Duplicate ids are rejected here so the editor never starts from a tree
/// that breaks its own invariants.
pub fn read_tree(path: &Path) -> Result<Tree, IoError> {
    let roots: Vec<Node> = read_json(path)?;
    let tree = Tree::from_roots(roots).map_err(|e| IoError::InvalidTree {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), nodes = tree.len(), "loaded tree");
    Ok(tree)
}

/// Read a tree snapshot without enforcing unique ids (for `check`).
pub fn read_tree_unchecked(path: &Path) -> Result<Tree, IoError> {
    Ok(Tree {
        roots: read_json(path)?,
    })
}

/// Read a gesture script: a JSON array of events.
pub fn read_gestures(path: &Path) -> Result<Vec<Gesture>, IoError> {
    let gestures: Vec<Gesture> = read_json(path)?;
    debug!(path = %path.display(), events = gestures.len(), "loaded gestures");
    Ok(gestures)
}

/// Write a tree snapshot as pretty JSON.
pub fn write_tree(path: &Path, tree: &Tree) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(tree).map_err(|e| IoError::JsonError {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json + "\n").map_err(|e| IoError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let text = fs::read_to_string(path).map_err(|e| IoError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| IoError::JsonError {
        path: path.to_path_buf(),
        source: e,
    })
}
