use tracing::{debug, error, warn};

use super::session::{DragSession, HoverTarget, PointerDelta, Projection, project};
use super::{DragError, DragOutcome};
use crate::model::config::{DragConfig, EditorConfig};
use crate::model::expansion::ExpansionSet;
use crate::model::tree::{Tree, TreeError, find_depth, find_parent_info};
use crate::ops::tree_ops;

/// Owns the tree while it is being edited and turns drag events into
/// structural edits.
///
/// Idle until `start`; `end` and `cancel` return it to idle. Nesting and
/// un-nesting happen live during `over` so the preview matches the result,
/// while plain reordering inside one list is only committed on `end`.
#[derive(Debug, Clone)]
pub struct DragController {
    tree: Tree,
    expansion: ExpansionSet,
    config: DragConfig,
    session: Option<DragSession>,
}

impl DragController {
    pub fn new(tree: Tree, config: &EditorConfig) -> Self {
        Self::with_expansion(
            tree,
            ExpansionSet::with_defaults(config.expansion.default_expanded.iter().cloned()),
            config.drag.clone(),
        )
    }

    pub fn with_expansion(tree: Tree, expansion: ExpansionSet, config: DragConfig) -> Self {
        DragController {
            tree,
            expansion,
            config,
            session: None,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn into_parts(self) -> (Tree, ExpansionSet) {
        (self.tree, self.expansion)
    }

    /// Swap in a tree changed elsewhere in the app (e.g. a page deleted).
    /// An open session survives; if its node is gone the next event aborts it.
    pub fn replace_tree(&mut self, tree: Tree) {
        self.tree = tree;
    }

    /// Explicit expand/collapse by the user
    pub fn toggle(&mut self, id: &str) -> bool {
        self.expansion.toggle(id)
    }

    // -----------------------------------------------------------------------
    // Gesture events
    // -----------------------------------------------------------------------

    /// Begin dragging `node_id`.
    pub fn start(&mut self, node_id: &str) -> Result<DragOutcome, DragError> {
        if let Some(session) = &self.session {
            error!(dragging = %session.dragged_id, requested = node_id, "start while dragging");
            return Err(DragError::AlreadyDragging(session.dragged_id.clone()));
        }
        match DragSession::begin(&self.tree, node_id, self.config.revert_on_cancel) {
            Some(session) => {
                debug!(
                    id = node_id,
                    depth = session.start_depth,
                    parent = ?session.parent_id_at_start,
                    "drag start"
                );
                self.session = Some(session);
                Ok(DragOutcome::Started)
            }
            None => {
                warn!(id = node_id, "drag start on missing node");
                Ok(DragOutcome::Aborted(TreeError::NodeNotFound(node_id.into())))
            }
        }
    }

    /// Pointer moved while dragging.
    pub fn over(
        &mut self,
        target: Option<&HoverTarget>,
        delta: PointerDelta,
    ) -> Result<DragOutcome, DragError> {
        let session = self.active_session("over")?;
        let dragged = session.dragged_id.clone();
        let projection = match project(&self.tree, session, target, delta, &self.config) {
            Ok(p) => p,
            Err(e) => return Ok(self.abort(e)),
        };

        let result = match projection {
            Projection::Hold => return Ok(DragOutcome::Unchanged),
            Projection::Outdent => self.apply_outdent(&dragged),
            Projection::Indent { new_parent_id } => self.apply_indent(&dragged, new_parent_id),
            Projection::MoveAcross { parent_id, index } => {
                self.apply_move_across(&dragged, parent_id, index)
            }
        };
        Ok(self.settle(&dragged, result))
    }

    /// Pointer released. Commits a pending reorder within the shared list.
    pub fn end(&mut self, target: Option<&HoverTarget>) -> Result<DragOutcome, DragError> {
        let session = match self.session.take() {
            Some(s) => s,
            None => {
                error!("end without drag");
                return Err(DragError::NotDragging("end"));
            }
        };
        let id = session.dragged_id.as_str();

        let Some(location) = find_parent_info(&self.tree, id) else {
            warn!(id, "dragged node vanished before drop");
            return Ok(DragOutcome::Aborted(TreeError::NodeNotFound(id.into())));
        };
        let Some((target_parent, target_index)) = target.and_then(|t| t.resolve(&self.tree))
        else {
            debug!(id, "drop outside any target");
            return Ok(DragOutcome::Dropped);
        };
        if target_parent.as_deref() != location.parent_id {
            debug!(id, "drop after live move");
            return Ok(DragOutcome::Dropped);
        }

        let from = location.index;
        let to = target_index.min(location.siblings.len() - 1);
        if from == to {
            return Ok(DragOutcome::Dropped);
        }
        let parent_id = location.parent_id.map(str::to_string);
        match tree_ops::reorder_siblings(&self.tree, parent_id.as_deref(), from, to) {
            Ok(next) => {
                self.tree = next;
                debug!(id, from, to, "drop reorder");
                Ok(DragOutcome::Reordered { from, to })
            }
            Err(e) => {
                warn!(id, error = %e, "drop reorder rejected");
                Ok(DragOutcome::Rejected(e))
            }
        }
    }

    /// Abort the gesture. Live moves already applied stay, unless the
    /// controller was configured to revert on cancel.
    pub fn cancel(&mut self) -> Result<DragOutcome, DragError> {
        let session = match self.session.take() {
            Some(s) => s,
            None => {
                error!("cancel without drag");
                return Err(DragError::NotDragging("cancel"));
            }
        };
        match session.original_tree {
            Some(original) if original != self.tree => {
                debug!(id = %session.dragged_id, "drag cancelled, tree restored");
                self.tree = original;
                Ok(DragOutcome::Reverted)
            }
            _ => {
                debug!(id = %session.dragged_id, "drag cancelled");
                Ok(DragOutcome::Cancelled)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Live moves
    // -----------------------------------------------------------------------

    fn apply_outdent(&mut self, id: &str) -> Result<(Tree, DragOutcome), TreeError> {
        let next = tree_ops::outdent_after_parent(&self.tree, id)?;
        let parent_id = find_parent_info(&next, id).and_then(|i| i.parent_id.map(str::to_string));
        Ok((next, DragOutcome::Outdented { parent_id }))
    }

    fn apply_indent(
        &mut self,
        id: &str,
        new_parent_id: String,
    ) -> Result<(Tree, DragOutcome), TreeError> {
        let depth = find_depth(&self.tree, id).ok_or_else(|| TreeError::NodeNotFound(id.into()))?;
        tree_ops::check_depth_limit(&self.tree, id, depth + 1, self.config.max_depth)?;
        let next = tree_ops::indent_into(&self.tree, id, &new_parent_id)?;
        self.expansion.expand(&new_parent_id);
        Ok((
            next,
            DragOutcome::Indented {
                parent_id: new_parent_id,
            },
        ))
    }

    fn apply_move_across(
        &mut self,
        id: &str,
        parent_id: Option<String>,
        index: usize,
    ) -> Result<(Tree, DragOutcome), TreeError> {
        if let Some(depth) = tree_ops::depth_under(&self.tree, parent_id.as_deref()) {
            tree_ops::check_depth_limit(&self.tree, id, depth, self.config.max_depth)?;
        }
        let next = tree_ops::move_across_lists(&self.tree, id, parent_id.as_deref(), index)?;
        if let Some(pid) = &parent_id {
            self.expansion.expand(pid);
        }
        Ok((next, DragOutcome::MovedAcross { parent_id, index }))
    }

    /// Install the new tree and track the node's parent, or log the rejection.
    fn settle(&mut self, id: &str, result: Result<(Tree, DragOutcome), TreeError>) -> DragOutcome {
        match result {
            Ok((next, outcome)) => {
                self.tree = next;
                let parent = find_parent_info(&self.tree, id).and_then(|i| i.parent_id.map(str::to_string));
                if let Some(session) = self.session.as_mut() {
                    session.current_parent_id = parent;
                }
                debug!(id, ?outcome, "live move");
                outcome
            }
            Err(e) => {
                warn!(id, error = %e, "live move rejected");
                DragOutcome::Rejected(e)
            }
        }
    }

    fn active_session(&self, action: &'static str) -> Result<&DragSession, DragError> {
        self.session.as_ref().ok_or_else(|| {
            error!(action, "event without drag");
            DragError::NotDragging(action)
        })
    }

    fn abort(&mut self, reason: TreeError) -> DragOutcome {
        warn!(error = %reason, "dragged node vanished, session discarded");
        self.session = None;
        DragOutcome::Aborted(reason)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
