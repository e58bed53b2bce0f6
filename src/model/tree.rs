use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::node::Node;

/// Error type for tree lookups and structural edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node not found: {0}")]
    NodeNotFound(String),
    #[error("index {index} out of bounds for list of length {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("cannot nest {node_id} inside its own descendant {target_id}")]
    CycleRejected { node_id: String, target_id: String },
    #[error("{target_id} is not the sibling directly above {node_id}")]
    NotPrecedingSibling { node_id: String, target_id: String },
    #[error("cannot nest {0} inside itself")]
    SelfParent(String),
    #[error("{id} is a {kind} and cannot hold children")]
    CannotHoldChildren { id: String, kind: String },
    #[error("moving {node_id} would exceed the maximum nesting depth ({max_depth})")]
    MaxDepthExceeded { node_id: String, max_depth: usize },
    #[error("duplicate node id: {0}")]
    DuplicateId(String),
}

/// Where a node lives: the list holding it, its position there, and the id of
/// the node owning that list (`None` for the root list)
#[derive(Debug, Clone, Copy)]
pub struct ParentInfo<'a> {
    pub siblings: &'a [Node],
    pub index: usize,
    pub parent_id: Option<&'a str>,
}

impl ParentInfo<'_> {
    /// The node directly above this one in its list, if any
    pub fn preceding_sibling(&self) -> Option<&Node> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.siblings.get(i))
    }

    pub fn node(&self) -> &Node {
        &self.siblings[self.index]
    }
}

/// An ordered forest of page nodes.
///
/// Depth is never stored on the nodes; it is derived from position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tree {
    pub roots: Vec<Node>,
}

impl Tree {
    /// Build a tree, rejecting duplicate ids anywhere in the forest.
    pub fn from_roots(roots: Vec<Node>) -> Result<Self, TreeError> {
        let tree = Tree { roots };
        let mut seen = HashSet::new();
        let mut duplicate = None;
        tree.for_each(&mut |node, _| {
            if !seen.insert(node.id.clone()) && duplicate.is_none() {
                duplicate = Some(node.id.clone());
            }
        });
        match duplicate {
            Some(id) => Err(TreeError::DuplicateId(id)),
            None => Ok(tree),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        self.roots.iter().map(Node::subtree_len).sum()
    }

    pub fn contains(&self, id: &str) -> bool {
        find_node(self, id).is_some()
    }

    /// All ids in pre-order (parents before children, siblings in order)
    pub fn ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.len());
        self.for_each(&mut |node, _| ids.push(node.id.clone()));
        ids
    }

    /// Visit every node in pre-order along with its depth.
    pub fn for_each(&self, f: &mut dyn FnMut(&Node, usize)) {
        for_each_in_list(&self.roots, 0, f);
    }
}

fn for_each_in_list(nodes: &[Node], depth: usize, f: &mut dyn FnMut(&Node, usize)) {
    for node in nodes {
        f(node, depth);
        for_each_in_list(&node.children, depth + 1, f);
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Find a node by id anywhere in the tree (depth-first).
pub fn find_node<'a>(tree: &'a Tree, id: &str) -> Option<&'a Node> {
    find_node_in_list(&tree.roots, id)
}

fn find_node_in_list<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(n) = find_node_in_list(&node.children, id) {
            return Some(n);
        }
    }
    None
}

/// Find the list a node lives in, its index there, and its parent's id.
pub fn find_parent_info<'a>(tree: &'a Tree, id: &str) -> Option<ParentInfo<'a>> {
    parent_info_in_list(&tree.roots, None, id)
}

fn parent_info_in_list<'a>(
    nodes: &'a [Node],
    parent_id: Option<&'a str>,
    id: &str,
) -> Option<ParentInfo<'a>> {
    if let Some(index) = nodes.iter().position(|n| n.id == id) {
        return Some(ParentInfo {
            siblings: nodes,
            index,
            parent_id,
        });
    }
    nodes
        .iter()
        .find_map(|n| parent_info_in_list(&n.children, Some(n.id.as_str()), id))
}

/// Depth of a node (0 for root-level nodes).
pub fn find_depth(tree: &Tree, id: &str) -> Option<usize> {
    depth_in_list(&tree.roots, 0, id)
}

fn depth_in_list(nodes: &[Node], depth: usize, id: &str) -> Option<usize> {
    for node in nodes {
        if node.id == id {
            return Some(depth);
        }
        if let Some(d) = depth_in_list(&node.children, depth + 1, id) {
            return Some(d);
        }
    }
    None
}

/// Ids of every ancestor of `id`, root-first. `None` if `id` is absent.
pub fn find_ancestor_ids(tree: &Tree, id: &str) -> Option<Vec<String>> {
    let mut path = Vec::new();
    if ancestor_path(&tree.roots, id, &mut path) {
        Some(path)
    } else {
        None
    }
}

fn ancestor_path(nodes: &[Node], id: &str, path: &mut Vec<String>) -> bool {
    for node in nodes {
        if node.id == id {
            return true;
        }
        path.push(node.id.clone());
        if ancestor_path(&node.children, id, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Whether `id` sits somewhere below `ancestor_id`.
pub fn is_descendant(tree: &Tree, ancestor_id: &str, id: &str) -> bool {
    match find_node(tree, ancestor_id) {
        Some(ancestor) => ancestor_id != id && ancestor.contains(id),
        None => false,
    }
}

/// Resolve the sibling list owned by `parent_id` (`None` = root list).
pub fn children_of<'a>(tree: &'a Tree, parent_id: Option<&str>) -> Option<&'a [Node]> {
    match parent_id {
        None => Some(&tree.roots),
        Some(pid) => find_node(tree, pid).map(|n| n.children.as_slice()),
    }
}

pub(crate) fn find_node_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(n) = find_node_mut(&mut node.children, id) {
            return Some(n);
        }
    }
    None
}

pub(crate) fn children_of_mut<'a>(
    tree: &'a mut Tree,
    parent_id: Option<&str>,
) -> Option<&'a mut Vec<Node>> {
    match parent_id {
        None => Some(&mut tree.roots),
        Some(pid) => find_node_mut(&mut tree.roots, pid).map(|n| &mut n.children),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
