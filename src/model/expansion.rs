use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::tree::{Tree, find_ancestor_ids};

/// The folder-like nodes currently shown expanded.
///
/// Insertion order is kept so serialized snapshots are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionSet {
    ids: IndexSet<String>,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from caller-supplied defaults
    pub fn with_defaults<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExpansionSet {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership. Returns whether `id` is expanded afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.shift_remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Insert unconditionally. Returns true if `id` was collapsed before.
    pub fn expand(&mut self, id: &str) -> bool {
        self.ids.insert(id.to_string())
    }

    pub fn collapse(&mut self, id: &str) -> bool {
        self.ids.shift_remove(id)
    }

    /// Drop a deleted folder's id
    pub fn forget(&mut self, id: &str) {
        self.ids.shift_remove(id);
    }

    /// Drop every id that no longer names a node in `tree`.
    pub fn retain_existing(&mut self, tree: &Tree) {
        self.ids.retain(|id| tree.contains(id));
    }

    /// Expand every ancestor of `id` so the node is visible.
    /// Returns the ids that were newly expanded.
    pub fn expand_ancestors(&mut self, tree: &Tree, id: &str) -> Vec<String> {
        find_ancestor_ids(tree, id)
            .unwrap_or_default()
            .into_iter()
            .filter(|a| self.ids.insert(a.clone()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
