use tracing::debug;

use crate::model::node::Node;
use crate::model::tree::{
    Tree, TreeError, children_of, children_of_mut, find_depth, find_node, find_parent_info,
    is_descendant,
};

// Every operation here takes the tree by reference and builds a fresh one.
// On `Err` the input is untouched.

// ---------------------------------------------------------------------------
// Structural operations
// ---------------------------------------------------------------------------

/// Move one element of the list owned by `parent_id` (`None` = root) from
/// `from_index` to `to_index`.
pub fn reorder_siblings(
    tree: &Tree,
    parent_id: Option<&str>,
    from_index: usize,
    to_index: usize,
) -> Result<Tree, TreeError> {
    let siblings = children_of(tree, parent_id)
        .ok_or_else(|| TreeError::NodeNotFound(parent_id.unwrap_or_default().to_string()))?;
    let len = siblings.len();
    for index in [from_index, to_index] {
        if index >= len {
            return Err(TreeError::InvalidIndex { index, len });
        }
    }
    if from_index == to_index {
        return Ok(tree.clone());
    }

    let mut next = tree.clone();
    let list = children_of_mut(&mut next, parent_id)
        .ok_or_else(|| TreeError::NodeNotFound(parent_id.unwrap_or_default().to_string()))?;
    let node = list.remove(from_index);
    debug!(id = %node.id, ?parent_id, from_index, to_index, "reorder siblings");
    list.insert(to_index, node);
    Ok(next)
}

/// Make `node_id` the last child of `new_parent_id`, which must be the
/// sibling directly above it.
pub fn indent_into(tree: &Tree, node_id: &str, new_parent_id: &str) -> Result<Tree, TreeError> {
    let location =
        find_parent_info(tree, node_id).ok_or_else(|| TreeError::NodeNotFound(node_id.into()))?;
    let new_parent = find_node(tree, new_parent_id)
        .ok_or_else(|| TreeError::NodeNotFound(new_parent_id.into()))?;

    if node_id == new_parent_id {
        return Err(TreeError::SelfParent(node_id.into()));
    }
    if is_descendant(tree, node_id, new_parent_id) {
        return Err(TreeError::CycleRejected {
            node_id: node_id.into(),
            target_id: new_parent_id.into(),
        });
    }
    if location.preceding_sibling().map(|n| n.id.as_str()) != Some(new_parent_id) {
        return Err(TreeError::NotPrecedingSibling {
            node_id: node_id.into(),
            target_id: new_parent_id.into(),
        });
    }
    ensure_can_hold_children(new_parent)?;

    let insert_index = new_parent.children.len();
    let mut next = tree.clone();
    let (node, _) = remove_subtree(&mut next, node_id)?;
    insert_subtree(&mut next, node, Some(new_parent_id), insert_index)?;
    debug!(id = node_id, parent = new_parent_id, "indent");
    Ok(next)
}

/// Move `node_id` out of its parent `P` into `P`'s own list, directly after
/// `P`. A root-level node is returned unchanged.
pub fn outdent_after_parent(tree: &Tree, node_id: &str) -> Result<Tree, TreeError> {
    let location =
        find_parent_info(tree, node_id).ok_or_else(|| TreeError::NodeNotFound(node_id.into()))?;
    let parent_id = match location.parent_id {
        None => return Ok(tree.clone()),
        Some(pid) => pid,
    };
    let parent_location = find_parent_info(tree, parent_id)
        .ok_or_else(|| TreeError::NodeNotFound(parent_id.into()))?;
    let grandparent_id = parent_location.parent_id.map(str::to_string);
    let insert_index = parent_location.index + 1;

    let mut next = tree.clone();
    let (node, _) = remove_subtree(&mut next, node_id)?;
    insert_subtree(&mut next, node, grandparent_id.as_deref(), insert_index)?;
    debug!(id = node_id, from = parent_id, to = ?grandparent_id, "outdent");
    Ok(next)
}

/// Remove `node_id` from its list and insert it into the list owned by
/// `destination_parent_id` at `destination_index`.
///
/// The index is a position in the destination list as it looks once the
/// node has been taken out, so `destination_index == len` appends.
pub fn move_across_lists(
    tree: &Tree,
    node_id: &str,
    destination_parent_id: Option<&str>,
    destination_index: usize,
) -> Result<Tree, TreeError> {
    let location =
        find_parent_info(tree, node_id).ok_or_else(|| TreeError::NodeNotFound(node_id.into()))?;

    if let Some(dest_id) = destination_parent_id {
        let dest = find_node(tree, dest_id).ok_or_else(|| TreeError::NodeNotFound(dest_id.into()))?;
        if dest_id == node_id {
            return Err(TreeError::SelfParent(node_id.into()));
        }
        if is_descendant(tree, node_id, dest_id) {
            return Err(TreeError::CycleRejected {
                node_id: node_id.into(),
                target_id: dest_id.into(),
            });
        }
        ensure_can_hold_children(dest)?;
    }

    let same_list = location.parent_id == destination_parent_id;
    let dest_len = children_of(tree, destination_parent_id).map_or(0, <[Node]>::len);
    let len_after_removal = if same_list { dest_len - 1 } else { dest_len };
    if destination_index > len_after_removal {
        return Err(TreeError::InvalidIndex {
            index: destination_index,
            len: len_after_removal,
        });
    }
    if same_list && destination_index == location.index {
        return Ok(tree.clone());
    }

    let mut next = tree.clone();
    let (node, _) = remove_subtree(&mut next, node_id)?;
    insert_subtree(&mut next, node, destination_parent_id, destination_index)?;
    debug!(
        id = node_id,
        from = ?location.parent_id,
        to = ?destination_parent_id,
        index = destination_index,
        "move across lists"
    );
    Ok(next)
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

/// Reject a move that would put any node of `node_id`'s subtree deeper than
/// `max_depth` once `node_id` sits at `new_depth`.
pub fn check_depth_limit(
    tree: &Tree,
    node_id: &str,
    new_depth: usize,
    max_depth: Option<usize>,
) -> Result<(), TreeError> {
    let Some(max_depth) = max_depth else {
        return Ok(());
    };
    let node = find_node(tree, node_id).ok_or_else(|| TreeError::NodeNotFound(node_id.into()))?;
    if new_depth + node.subtree_height() > max_depth {
        return Err(TreeError::MaxDepthExceeded {
            node_id: node_id.into(),
            max_depth,
        });
    }
    Ok(())
}

/// Depth a node would have as a child of `parent_id`.
pub fn depth_under(tree: &Tree, parent_id: Option<&str>) -> Option<usize> {
    match parent_id {
        None => Some(0),
        Some(pid) => find_depth(tree, pid).map(|d| d + 1),
    }
}

fn ensure_can_hold_children(node: &Node) -> Result<(), TreeError> {
    if node.kind.can_hold_children() {
        Ok(())
    } else {
        Err(TreeError::CannotHoldChildren {
            id: node.id.clone(),
            kind: node.kind.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Detach a node (with its subtree). Returns the node and its former index.
fn remove_subtree(tree: &mut Tree, node_id: &str) -> Result<(Node, usize), TreeError> {
    remove_from_list(&mut tree.roots, node_id).ok_or_else(|| TreeError::NodeNotFound(node_id.into()))
}

fn remove_from_list(nodes: &mut Vec<Node>, node_id: &str) -> Option<(Node, usize)> {
    if let Some(idx) = nodes.iter().position(|n| n.id == node_id) {
        return Some((nodes.remove(idx), idx));
    }
    nodes
        .iter_mut()
        .find_map(|n| remove_from_list(&mut n.children, node_id))
}

fn insert_subtree(
    tree: &mut Tree,
    node: Node,
    parent_id: Option<&str>,
    index: usize,
) -> Result<(), TreeError> {
    let list = children_of_mut(tree, parent_id)
        .ok_or_else(|| TreeError::NodeNotFound(parent_id.unwrap_or_default().to_string()))?;
    if index > list.len() {
        return Err(TreeError::InvalidIndex {
            index,
            len: list.len(),
        });
    }
    list.insert(index, node);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::node::NodeKind;
    use pretty_assertions::assert_eq;

    fn folder(id: &str, children: Vec<Node>) -> Node {
        Node::new(id, id.to_uppercase(), NodeKind::Folder).with_children(children)
    }

    fn page(id: &str) -> Node {
        Node::new(id, id.to_uppercase(), NodeKind::Page)
    }

    fn tree(roots: Vec<Node>) -> Tree {
        Tree::from_roots(roots).unwrap()
    }

    /// Compact shape like `a[b c] d` for readable assertions.
    fn shape(tree: &Tree) -> String {
        fn list(nodes: &[Node]) -> String {
            nodes
                .iter()
                .map(|n| {
                    if n.children.is_empty() {
                        n.id.clone()
                    } else {
                        format!("{}[{}]", n.id, list(&n.children))
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        }
        list(&tree.roots)
    }

    // --- reorder_siblings ---

    #[test]
    fn test_reorder_root_list() {
        let t = tree(vec![page("a"), page("b"), page("c")]);
        let next = reorder_siblings(&t, None, 0, 2).unwrap();
        assert_eq!(shape(&next), "b c a");
        let next = reorder_siblings(&t, None, 2, 0).unwrap();
        assert_eq!(shape(&next), "c a b");
    }

    #[test]
    fn test_reorder_nested_list() {
        let t = tree(vec![folder("f", vec![page("x"), page("y"), page("z")])]);
        let next = reorder_siblings(&t, Some("f"), 2, 1).unwrap();
        assert_eq!(shape(&next), "f[x z y]");
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let t = tree(vec![page("a"), page("b")]);
        assert_eq!(reorder_siblings(&t, None, 1, 1).unwrap(), t);
    }

    #[test]
    fn test_reorder_invalid_index() {
        let t = tree(vec![page("a"), page("b")]);
        assert_eq!(
            reorder_siblings(&t, None, 0, 2).unwrap_err(),
            TreeError::InvalidIndex { index: 2, len: 2 }
        );
        assert_eq!(
            reorder_siblings(&t, None, 5, 0).unwrap_err(),
            TreeError::InvalidIndex { index: 5, len: 2 }
        );
    }

    #[test]
    fn test_reorder_unknown_parent() {
        let t = tree(vec![page("a")]);
        assert_eq!(
            reorder_siblings(&t, Some("nope"), 0, 0).unwrap_err(),
            TreeError::NodeNotFound("nope".into())
        );
    }

    // --- indent_into ---

    #[test]
    fn test_indent_appends_to_preceding_sibling() {
        let t = tree(vec![folder("a", vec![page("x")]), page("b"), page("c")]);
        let next = indent_into(&t, "b", "a").unwrap();
        assert_eq!(shape(&next), "a[x b] c");
    }

    #[test]
    fn test_indent_requires_preceding_sibling() {
        let t = tree(vec![page("a"), page("b"), page("c")]);
        assert_eq!(
            indent_into(&t, "c", "a").unwrap_err(),
            TreeError::NotPrecedingSibling {
                node_id: "c".into(),
                target_id: "a".into()
            }
        );
        assert!(matches!(
            indent_into(&t, "a", "b"),
            Err(TreeError::NotPrecedingSibling { .. })
        ));
    }

    #[test]
    fn test_indent_into_self_rejected() {
        let t = tree(vec![page("a"), page("b")]);
        assert_eq!(
            indent_into(&t, "b", "b").unwrap_err(),
            TreeError::SelfParent("b".into())
        );
    }

    #[test]
    fn test_indent_into_descendant_rejected() {
        let t = tree(vec![folder("a", vec![page("x")])]);
        assert!(matches!(
            indent_into(&t, "a", "x"),
            Err(TreeError::CycleRejected { .. })
        ));
    }

    #[test]
    fn test_indent_into_leaf_page_rejected() {
        let t = tree(vec![
            Node::new("leaf", "Leaf", NodeKind::LeafPage),
            page("b"),
        ]);
        assert_eq!(
            indent_into(&t, "b", "leaf").unwrap_err(),
            TreeError::CannotHoldChildren {
                id: "leaf".into(),
                kind: "leaf-page".into()
            }
        );
    }

    #[test]
    fn test_indent_keeps_subtree() {
        let t = tree(vec![page("a"), folder("b", vec![page("x"), page("y")])]);
        let next = indent_into(&t, "b", "a").unwrap();
        assert_eq!(shape(&next), "a[b[x y]]");
    }

    // --- outdent_after_parent ---

    #[test]
    fn test_outdent_inserts_after_parent() {
        let t = tree(vec![folder("a", vec![page("b")]), page("c")]);
        let next = outdent_after_parent(&t, "b").unwrap();
        assert_eq!(shape(&next), "a b c");
        assert!(find_node(&next, "a").unwrap().children.is_empty());
    }

    #[test]
    fn test_outdent_from_deep_nesting() {
        let t = tree(vec![folder(
            "a",
            vec![folder("b", vec![page("x"), page("y")]), page("c")],
        )]);
        let next = outdent_after_parent(&t, "x").unwrap();
        assert_eq!(shape(&next), "a[b[y] x c]");
    }

    #[test]
    fn test_outdent_root_is_noop() {
        let t = tree(vec![page("a"), page("b"), page("c")]);
        assert_eq!(outdent_after_parent(&t, "b").unwrap(), t);
    }

    #[test]
    fn test_outdent_unknown_node() {
        let t = tree(vec![page("a")]);
        assert_eq!(
            outdent_after_parent(&t, "zzz").unwrap_err(),
            TreeError::NodeNotFound("zzz".into())
        );
    }

    #[test]
    fn test_indent_then_outdent_lands_after_parent() {
        let t = tree(vec![page("a"), page("p"), page("n"), page("z")]);
        let nested = indent_into(&t, "n", "p").unwrap();
        assert_eq!(shape(&nested), "a p[n] z");
        let back = outdent_after_parent(&nested, "n").unwrap();
        assert_eq!(shape(&back), "a p n z");
    }

    // --- move_across_lists ---

    #[test]
    fn test_move_into_other_folder() {
        let t = tree(vec![
            folder("f1", vec![page("x"), page("y")]),
            folder("f2", vec![]),
        ]);
        let next = move_across_lists(&t, "x", Some("f2"), 0).unwrap();
        assert_eq!(shape(&next), "f1[y] f2[x]");
    }

    #[test]
    fn test_move_to_root_at_index() {
        let t = tree(vec![folder("f1", vec![page("x")]), page("a")]);
        let next = move_across_lists(&t, "x", None, 1).unwrap();
        assert_eq!(shape(&next), "f1 x a");
    }

    #[test]
    fn test_move_within_same_list_uses_post_removal_index() {
        let t = tree(vec![page("a"), page("b"), page("c")]);
        let next = move_across_lists(&t, "a", None, 2).unwrap();
        assert_eq!(shape(&next), "b c a");
        assert_eq!(move_across_lists(&t, "b", None, 1).unwrap(), t);
        assert!(matches!(
            move_across_lists(&t, "a", None, 3),
            Err(TreeError::InvalidIndex { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_move_into_own_subtree_rejected() {
        let t = tree(vec![folder("a", vec![folder("b", vec![])])]);
        assert!(matches!(
            move_across_lists(&t, "a", Some("b"), 0),
            Err(TreeError::CycleRejected { .. })
        ));
        assert_eq!(
            move_across_lists(&t, "a", Some("a"), 0).unwrap_err(),
            TreeError::SelfParent("a".into())
        );
    }

    #[test]
    fn test_move_into_home_rejected() {
        let t = tree(vec![Node::new("home", "Home", NodeKind::Home), page("a")]);
        assert!(matches!(
            move_across_lists(&t, "a", Some("home"), 0),
            Err(TreeError::CannotHoldChildren { .. })
        ));
    }

    #[test]
    fn test_move_index_out_of_bounds() {
        let t = tree(vec![folder("f1", vec![page("x")]), folder("f2", vec![])]);
        assert_eq!(
            move_across_lists(&t, "x", Some("f2"), 1).unwrap_err(),
            TreeError::InvalidIndex { index: 1, len: 0 }
        );
    }

    // --- guards ---

    #[test]
    fn test_check_depth_limit() {
        let t = tree(vec![page("a"), folder("b", vec![folder("c", vec![page("d")])])]);
        assert!(check_depth_limit(&t, "b", 1, None).is_ok());
        assert!(check_depth_limit(&t, "b", 1, Some(3)).is_ok());
        assert_eq!(
            check_depth_limit(&t, "b", 2, Some(3)).unwrap_err(),
            TreeError::MaxDepthExceeded {
                node_id: "b".into(),
                max_depth: 3
            }
        );
    }

    #[test]
    fn test_depth_under() {
        let t = tree(vec![folder("a", vec![folder("b", vec![])])]);
        assert_eq!(depth_under(&t, None), Some(0));
        assert_eq!(depth_under(&t, Some("b")), Some(2));
        assert_eq!(depth_under(&t, Some("zzz")), None);
    }

    // --- properties ---

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use proptest::sample::Index;

        /// Build a forest of folders where node `i` hangs off the root or
        /// under one of the nodes before it.
        fn build(parents: &[Index]) -> Tree {
            let parent_of: Vec<Option<usize>> = parents
                .iter()
                .enumerate()
                .map(|(i, idx)| match idx.index(i + 1) {
                    0 => None,
                    p => Some(p - 1),
                })
                .collect();

            fn subtree(i: usize, parent_of: &[Option<usize>]) -> Node {
                let children = (0..parent_of.len())
                    .filter(|&c| parent_of[c] == Some(i))
                    .map(|c| subtree(c, parent_of))
                    .collect();
                folder(&format!("n{i}"), children)
            }

            let roots = (0..parent_of.len())
                .filter(|&i| parent_of[i].is_none())
                .map(|i| subtree(i, &parent_of))
                .collect();
            Tree::from_roots(roots).unwrap()
        }

        fn sorted_ids(tree: &Tree) -> Vec<String> {
            let mut ids = tree.ids();
            ids.sort();
            ids
        }

        fn apply(t: &Tree, op: u8, a: &Index, b: &Index, c: &Index) -> Result<Tree, TreeError> {
            let ids = t.ids();
            let node = &ids[a.index(ids.len())];
            let other = &ids[b.index(ids.len())];
            match op % 4 {
                0 => {
                    let info = find_parent_info(t, node).unwrap();
                    let len = info.siblings.len();
                    reorder_siblings(t, info.parent_id, b.index(len), c.index(len))
                }
                1 => {
                    let info = find_parent_info(t, node).unwrap();
                    match info.preceding_sibling() {
                        Some(prev) => indent_into(t, node, &prev.id),
                        None => indent_into(t, node, other),
                    }
                }
                2 => outdent_after_parent(t, node),
                _ => {
                    let dest = if c.index(3) == 0 { None } else { Some(other.as_str()) };
                    let len = children_of(t, dest).map_or(0, <[Node]>::len);
                    move_across_lists(t, node, dest, c.index(len + 1))
                }
            }
        }

        proptest! {
            #[test]
            fn find_node_agrees_with_parent_info(parents in prop::collection::vec(any::<Index>(), 1..24)) {
                let t = build(&parents);
                for id in t.ids() {
                    let node = find_node(&t, &id).unwrap();
                    let info = find_parent_info(&t, &id).unwrap();
                    prop_assert!(std::ptr::eq(node, &info.siblings[info.index]));
                }
            }

            #[test]
            fn operations_preserve_every_id(
                parents in prop::collection::vec(any::<Index>(), 1..16),
                ops in prop::collection::vec((any::<u8>(), any::<Index>(), any::<Index>(), any::<Index>()), 1..32),
            ) {
                let mut t = build(&parents);
                let before = sorted_ids(&t);
                for (op, a, b, c) in &ops {
                    if let Ok(next) = apply(&t, *op, a, b, c) {
                        t = next;
                    }
                    prop_assert_eq!(sorted_ids(&t), before.clone());
                    prop_assert!(Tree::from_roots(t.roots.clone()).is_ok());
                }
            }

            #[test]
            fn indent_then_outdent_lands_after_new_parent(parents in prop::collection::vec(any::<Index>(), 2..16)) {
                let t = build(&parents);
                for id in t.ids() {
                    let info = find_parent_info(&t, &id).unwrap();
                    let Some(prev) = info.preceding_sibling() else {
                        continue;
                    };
                    let parent_id = info.parent_id.map(str::to_string);
                    let prev_index = info.index - 1;

                    let nested = indent_into(&t, &id, &prev.id).unwrap();
                    let back = outdent_after_parent(&nested, &id).unwrap();
                    let after = find_parent_info(&back, &id).unwrap();
                    prop_assert_eq!(after.parent_id.map(str::to_string), parent_id);
                    prop_assert_eq!(after.index, prev_index + 1);
                    prop_assert_eq!(&after.siblings[after.index - 1].id, &prev.id);
                }
            }

            #[test]
            fn outdent_of_root_node_is_noop(parents in prop::collection::vec(any::<Index>(), 1..16)) {
                let t = build(&parents);
                for root in &t.roots {
                    prop_assert_eq!(&outdent_after_parent(&t, &root.id).unwrap(), &t);
                }
            }
        }
    }
}
