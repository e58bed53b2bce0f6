pub mod controller;
pub mod script;
pub mod session;

pub use controller::*;
pub use session::*;

use crate::model::tree::TreeError;

/// Misuse of the drag controller by its caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    #[error("`{0}` called with no drag in progress")]
    NotDragging(&'static str),
    #[error("a drag of {0} is already in progress")]
    AlreadyDragging(String),
}

/// What a controller call did to the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// A session was opened
    Started,
    /// No structural change
    Unchanged,
    /// Live un-nest into the grandparent list
    Outdented { parent_id: Option<String> },
    /// Live nest under the sibling above
    Indented { parent_id: String },
    /// Live move into another list
    MovedAcross {
        parent_id: Option<String>,
        index: usize,
    },
    /// Committed on drop within the shared list
    Reordered { from: usize, to: usize },
    /// Drop finished without a further change
    Dropped,
    Cancelled,
    /// Cancelled and the tree restored to its state at drag start
    Reverted,
    /// The requested change was illegal; the tree is unchanged
    Rejected(TreeError),
    /// The dragged node disappeared; the session was discarded
    Aborted(TreeError),
}

impl DragOutcome {
    /// Whether the tree differs from before the call
    pub fn changed_tree(&self) -> bool {
        matches!(
            self,
            DragOutcome::Outdented { .. }
                | DragOutcome::Indented { .. }
                | DragOutcome::MovedAcross { .. }
                | DragOutcome::Reordered { .. }
                | DragOutcome::Reverted
        )
    }
}
