use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::config::DragConfig;
use crate::model::tree::{Tree, TreeError, children_of, find_depth, find_parent_info};

/// Ephemeral state of one drag gesture. Refers to nodes by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    /// The node being moved
    pub dragged_id: String,
    /// Depth of the dragged node when the gesture began
    pub start_depth: usize,
    /// Parent when the gesture began (`None` = root list)
    pub parent_id_at_start: Option<String>,
    /// Parent after the most recent live move
    pub current_parent_id: Option<String>,
    /// Tree as it was at drag start, kept only when cancel should revert
    #[serde(skip)]
    pub original_tree: Option<Tree>,
}

impl DragSession {
    /// Capture a session for `node_id`. `None` if the node is not in the tree.
    pub fn begin(tree: &Tree, node_id: &str, keep_snapshot: bool) -> Option<Self> {
        let start_depth = find_depth(tree, node_id)?;
        let parent = find_parent_info(tree, node_id)?.parent_id.map(str::to_string);
        Some(DragSession {
            dragged_id: node_id.to_string(),
            start_depth,
            parent_id_at_start: parent.clone(),
            current_parent_id: parent,
            original_tree: keep_snapshot.then(|| tree.clone()),
        })
    }

    /// Whether the dragged node has left the list it started in
    pub fn changed_parent(&self) -> bool {
        self.current_parent_id != self.parent_id_at_start
    }
}

/// What the pointer is currently over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverTarget {
    /// A rendered node; resolves to that node's list and index
    Node(String),
    /// A position in a list, used for empty folders and list ends
    List {
        #[serde(default)]
        parent_id: Option<String>,
        index: usize,
    },
}

impl From<&str> for HoverTarget {
    fn from(id: &str) -> Self {
        HoverTarget::Node(id.to_string())
    }
}

impl HoverTarget {
    /// The list (by owner id) and position this target points at.
    pub fn resolve(&self, tree: &Tree) -> Option<(Option<String>, usize)> {
        match self {
            HoverTarget::Node(id) => {
                let info = find_parent_info(tree, id)?;
                Some((info.parent_id.map(str::to_string), info.index))
            }
            HoverTarget::List { parent_id, index } => {
                children_of(tree, parent_id.as_deref())?;
                Some((parent_id.clone(), *index))
            }
        }
    }
}

/// Pointer displacement since the gesture began, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PointerDelta {
    pub fn new(dx: f64, dy: f64) -> Self {
        PointerDelta { dx, dy }
    }
}

/// The structural change a drag-over event asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Un-nest into the grandparent list
    Outdent,
    /// Nest under the sibling directly above
    Indent { new_parent_id: String },
    /// Jump into the hovered list
    MoveAcross {
        parent_id: Option<String>,
        index: usize,
    },
    /// Stay put; any reorder within the list waits for the drop
    Hold,
}

/// Depth the horizontal displacement asks for, relative to the start depth
pub fn projected_depth(start_depth: usize, dx: f64, config: &DragConfig) -> i64 {
    (start_depth as i64).saturating_add((dx / config.indent_width).round() as i64)
}

/// Work out which structural change an over event should make.
///
/// Checked in order: outdent, indent, cross-list move, hold.
pub fn project(
    tree: &Tree,
    session: &DragSession,
    target: Option<&HoverTarget>,
    delta: PointerDelta,
    config: &DragConfig,
) -> Result<Projection, TreeError> {
    let id = session.dragged_id.as_str();
    let location = find_parent_info(tree, id).ok_or_else(|| TreeError::NodeNotFound(id.into()))?;
    let current_depth = find_depth(tree, id).ok_or_else(|| TreeError::NodeNotFound(id.into()))?;
    let projected = projected_depth(session.start_depth, delta.dx, config);
    trace!(id, current_depth, projected, dx = delta.dx, "project");

    if delta.dx < -config.outdent_threshold
        && location.parent_id.is_some()
        && (!config.outdent_requires_depth_drop || projected < current_depth as i64)
    {
        return Ok(Projection::Outdent);
    }

    if projected > current_depth as i64
        && let Some(above) = location.preceding_sibling()
    {
        return Ok(Projection::Indent {
            new_parent_id: above.id.clone(),
        });
    }

    if let Some((parent_id, index)) = target.and_then(|t| t.resolve(tree))
        && parent_id.as_deref() != location.parent_id
    {
        return Ok(Projection::MoveAcross { parent_id, index });
    }

    Ok(Projection::Hold)
}
