use std::collections::HashMap;

use serde::Serialize;

use crate::model::node::{Node, NodeKind};
use crate::model::tree::Tree;

/// Structured result from `ptree check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A structural problem that the editor cannot work with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// The same id appears more than once
    #[serde(rename = "duplicate_id")]
    DuplicateId { id: String, count: usize },
    /// A home page or leaf page has children
    #[serde(rename = "children_not_allowed")]
    ChildrenNotAllowed {
        id: String,
        kind: String,
        children: usize,
    },
    /// A node with an empty id
    #[serde(rename = "empty_id")]
    EmptyId { title: String },
}

/// Something odd but editable
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// A node nested deeper than the configured limit
    #[serde(rename = "too_deep")]
    TooDeep {
        id: String,
        depth: usize,
        max_depth: usize,
    },
    /// More than one home page
    #[serde(rename = "multiple_homes")]
    MultipleHomes { ids: Vec<String> },
    /// A home page below the root list
    #[serde(rename = "nested_home")]
    NestedHome { id: String, depth: usize },
}

// ---------------------------------------------------------------------------
// Main check entry point
// ---------------------------------------------------------------------------

/// Validate a tree and return structured results.
///
/// Checks performed:
/// 1. No duplicate ids, no empty ids
/// 2. Only folders and pages have children
/// 3. Warnings for depth beyond `max_depth`, nested or repeated home pages
pub fn check_tree(tree: &Tree, max_depth: Option<usize>) -> CheckResult {
    let mut result = CheckResult::default();

    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut homes: Vec<String> = Vec::new();
    tree.for_each(&mut |node: &Node, depth: usize| {
        let count = counts.entry(node.id.clone()).or_insert(0);
        if *count == 0 {
            order.push(node.id.clone());
        }
        *count += 1;

        if node.id.is_empty() {
            result.errors.push(CheckError::EmptyId {
                title: node.title.clone(),
            });
        }
        if !node.kind.can_hold_children() && !node.children.is_empty() {
            result.errors.push(CheckError::ChildrenNotAllowed {
                id: node.id.clone(),
                kind: node.kind.to_string(),
                children: node.children.len(),
            });
        }
        if let Some(max) = max_depth
            && depth > max
        {
            result.warnings.push(CheckWarning::TooDeep {
                id: node.id.clone(),
                depth,
                max_depth: max,
            });
        }
        if node.kind == NodeKind::Home {
            homes.push(node.id.clone());
            if depth > 0 {
                result.warnings.push(CheckWarning::NestedHome {
                    id: node.id.clone(),
                    depth,
                });
            }
        }
    });

    for id in order {
        let count = counts[&id];
        if count > 1 {
            result.errors.push(CheckError::DuplicateId { id, count });
        }
    }
    if homes.len() > 1 {
        result.warnings.push(CheckWarning::MultipleHomes { ids: homes });
    }

    result.valid = result.errors.is_empty();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
