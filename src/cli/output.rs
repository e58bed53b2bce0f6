use serde::Serialize;

use crate::drag::DragOutcome;
use crate::model::expansion::ExpansionSet;
use crate::model::node::Node;
use crate::model::tree::Tree;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ShowJson<'a> {
    pub tree: &'a Tree,
    pub expanded: &'a ExpansionSet,
}

#[derive(Serialize)]
pub struct ReplayJson<'a> {
    pub outcomes: Vec<String>,
    pub tree: &'a Tree,
    pub expanded: &'a ExpansionSet,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single node as a one-line summary
pub fn format_node_line(node: &Node) -> String {
    format!("[{}] {} {}", node.kind.marker(), node.id, node.title)
}

/// Format the tree as an indented outline.
///
/// With `expansion`, children of collapsed nodes are hidden and summarized;
/// with `None`, every node is shown.
pub fn format_outline(tree: &Tree, expansion: Option<&ExpansionSet>) -> Vec<String> {
    let mut lines = Vec::new();
    for node in &tree.roots {
        format_subtree(node, 0, expansion, &mut lines);
    }
    lines
}

fn format_subtree(
    node: &Node,
    indent: usize,
    expansion: Option<&ExpansionSet>,
    lines: &mut Vec<String>,
) {
    let prefix = "  ".repeat(indent);
    let collapsed =
        !node.children.is_empty() && expansion.is_some_and(|e| !e.is_expanded(&node.id));
    if collapsed {
        lines.push(format!(
            "{}{} (+{} hidden)",
            prefix,
            format_node_line(node),
            node.subtree_len() - 1
        ));
        return;
    }
    lines.push(format!("{}{}", prefix, format_node_line(node)));
    for child in &node.children {
        format_subtree(child, indent + 1, expansion, lines);
    }
}

/// Short description of what a controller call did
pub fn format_outcome(outcome: &DragOutcome) -> String {
    fn list(parent: &Option<String>) -> String {
        match parent {
            Some(p) => p.clone(),
            None => "root".to_string(),
        }
    }
    match outcome {
        DragOutcome::Started => "started".to_string(),
        DragOutcome::Unchanged => "unchanged".to_string(),
        DragOutcome::Outdented { parent_id } => format!("outdented into {}", list(parent_id)),
        DragOutcome::Indented { parent_id } => format!("indented under {}", parent_id),
        DragOutcome::MovedAcross { parent_id, index } => {
            format!("moved into {} at {}", list(parent_id), index)
        }
        DragOutcome::Reordered { from, to } => format!("reordered {} -> {}", from, to),
        DragOutcome::Dropped => "dropped".to_string(),
        DragOutcome::Cancelled => "cancelled".to_string(),
        DragOutcome::Reverted => "cancelled, reverted".to_string(),
        DragOutcome::Rejected(e) => format!("rejected: {}", e),
        DragOutcome::Aborted(e) => format!("aborted: {}", e),
    }
}
