use serde::{Deserialize, Serialize};

/// What a node in the page tree represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// The site landing page
    Home,
    /// A pure container with no page of its own
    Folder,
    /// A page that may also hold child pages
    Page,
    /// A page that never holds children
    LeafPage,
}

impl NodeKind {
    /// Whether nodes of this kind may own a `children` list
    pub fn can_hold_children(self) -> bool {
        match self {
            NodeKind::Folder | NodeKind::Page => true,
            NodeKind::Home | NodeKind::LeafPage => false,
        }
    }

    /// Marker used by the outline renderer
    pub fn marker(self) -> char {
        match self {
            NodeKind::Home => '~',
            NodeKind::Folder => '+',
            NodeKind::Page => '*',
            NodeKind::LeafPage => '-',
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Home => write!(f, "home"),
            NodeKind::Folder => write!(f, "folder"),
            NodeKind::Page => write!(f, "page"),
            NodeKind::LeafPage => write!(f, "leaf-page"),
        }
    }
}

/// A single entry in the page tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier, unique across the whole tree
    pub id: String,
    /// Display name
    pub title: String,
    pub kind: NodeKind,
    /// Child nodes; order is the sibling order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    /// Content owned by the page editors (status flags, linked ids, ...).
    /// Carried along with the node but never read here.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl Node {
    /// Create a node with no children and an empty payload
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: NodeKind) -> Self {
        Node {
            id: id.into(),
            title: title.into(),
            kind,
            children: Vec::new(),
            payload: serde_json::Value::Null,
        }
    }

    /// Builder-style helper that replaces the child list
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Builder-style helper that attaches an opaque payload
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Number of levels below this node (0 for a node without children)
    pub fn subtree_height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.subtree_height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Whether `id` names this node or any node below it
    pub fn contains(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|c| c.contains(id))
    }

    /// Number of nodes in this subtree, including itself
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}
