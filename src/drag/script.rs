//! Scripted gesture sequences, used to replay drags outside a UI.

use serde::{Deserialize, Serialize};

use super::controller::DragController;
use super::session::{HoverTarget, PointerDelta};
use super::{DragError, DragOutcome};

/// One recorded input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Gesture {
    Start {
        id: String,
    },
    Over {
        #[serde(default)]
        target: Option<HoverTarget>,
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
    End {
        #[serde(default)]
        target: Option<HoverTarget>,
    },
    Cancel,
    /// Expand/collapse click, outside of any drag
    Toggle {
        id: String,
    },
}

/// Feed each gesture to the controller in order.
///
/// Stops at the first caller error; structural rejections are reported in
/// the returned outcomes and do not stop the replay.
pub fn replay(
    controller: &mut DragController,
    gestures: &[Gesture],
) -> Result<Vec<DragOutcome>, DragError> {
    let mut outcomes = Vec::with_capacity(gestures.len());
    for gesture in gestures {
        let outcome = match gesture {
            Gesture::Start { id } => controller.start(id)?,
            Gesture::Over { target, dx, dy } => {
                controller.over(target.as_ref(), PointerDelta::new(*dx, *dy))?
            }
            Gesture::End { target } => controller.end(target.as_ref())?,
            Gesture::Cancel => controller.cancel()?,
            Gesture::Toggle { id } => {
                controller.toggle(id);
                DragOutcome::Unchanged
            }
        };
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
