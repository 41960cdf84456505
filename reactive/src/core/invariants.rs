//! Structural invariants of component trees.

use std::collections::HashSet;
use std::rc::Rc;

use crate::core::node::SharedNode;
use crate::tree::TreeSpec;

/// Check a live tree:
/// - No two siblings share a key
/// - Every child's parent back-reference points at the node holding it
///
/// Returns one message per violation, in depth-first order.
pub fn validate_invariants(root: &SharedNode) -> Vec<String> {
    let mut errors = Vec::new();
    let path = match root.try_borrow() {
        Ok(node) => node.key().to_string(),
        Err(_) => {
            errors.push("root is mutably borrowed".to_string());
            return errors;
        }
    };
    validate_node(root, &mut errors, &path);
    errors
}

fn validate_node(node: &SharedNode, errors: &mut Vec<String>, path: &str) {
    let Ok(node_ref) = node.try_borrow() else {
        errors.push(format!("{}: node is mutably borrowed", path));
        return;
    };

    let mut seen = HashSet::new();
    for key in node_ref.child_keys() {
        if !seen.insert(key.as_str()) {
            errors.push(format!("{}: duplicate child key '{}'", path, key));
        }
    }

    for (child, key) in node_ref.children().iter().zip(node_ref.child_keys()) {
        let child_path = format!("{}/{}", path, key);
        match child.try_borrow() {
            Ok(child_ref) => {
                if !child_ref.is_child_of(node) {
                    errors.push(format!("{}: parent does not point back", child_path));
                }
                if child_ref.key() != key {
                    errors.push(format!("{}: key index out of sync", child_path));
                }
            }
            Err(_) => {
                errors.push(format!("{}: node is mutably borrowed", child_path));
                continue;
            }
        }
        if Rc::ptr_eq(child, node) {
            errors.push(format!("{}: node is its own child", child_path));
            continue;
        }
        validate_node(child, errors, &child_path);
    }
}

/// Check a tree description for sibling keys that mounting would silently drop
/// and for keys that a `/` path could never address.
pub fn validate_spec_invariants(root: &TreeSpec) -> Vec<String> {
    let mut errors = Vec::new();
    validate_spec(root, &mut errors, &root.key);
    errors
}

fn validate_spec(node: &TreeSpec, errors: &mut Vec<String>, path: &str) {
    if node.key.contains('/') {
        errors.push(format!("{}: key '{}' contains '/'", path, node.key));
    }
    let mut seen = HashSet::new();
    for child in &node.children {
        if !seen.insert(child.key.as_str()) {
            errors.push(format!("{}: duplicate child key '{}'", path, child.key));
        }
    }
    for child in &node.children {
        let child_path = format!("{}/{}", path, child.key);
        validate_spec(child, errors, &child_path);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::node::Node;
    use crate::core::types::{Props, UpdatePolicy};
    use crate::test_support::{Inert, inert};

    #[test]
    fn mounted_tree_satisfies_invariants() {
        let tree = Node::new(
            "root",
            Props::new(),
            vec![
                Node::new("a", Props::new(), vec![inert("a1"), inert("a1")], Inert),
                inert("b"),
                inert("a"),
            ],
            Inert,
        );
        assert!(validate_invariants(&tree).is_empty());
    }

    #[test]
    fn reports_stale_back_reference() {
        let child = inert("c");
        let root = Node::new("root", Props::new(), vec![child.clone()], Inert);
        let other = inert("other");
        child.borrow_mut().set_parent(Some(&other));

        let errors = validate_invariants(&root);
        assert_eq!(errors, vec!["root/c: parent does not point back".to_string()]);
    }

    #[test]
    fn legacy_removal_leaves_consistent_tree() {
        let child = inert("c");
        let root = Node::builder("root")
            .child(child.clone())
            .policy(UpdatePolicy::legacy())
            .build(Inert);
        root.borrow_mut().remove_children();
        assert!(validate_invariants(&root).is_empty());
        assert!(validate_invariants(&child).is_empty());
    }

    #[test]
    fn spec_reports_duplicate_sibling_keys() {
        let spec: TreeSpec = serde_json::from_value(json!({
            "key": "root",
            "children": [
                {"key": "dup"},
                {"key": "x", "children": [{"key": "y"}, {"key": "y"}]},
                {"key": "dup"}
            ]
        }))
        .expect("parse");

        let errors = validate_spec_invariants(&spec);
        assert_eq!(
            errors,
            vec![
                "root: duplicate child key 'dup'".to_string(),
                "root/x: duplicate child key 'y'".to_string(),
            ]
        );
    }

    #[test]
    fn spec_reports_keys_with_path_separator() {
        let spec: TreeSpec = serde_json::from_value(json!({
            "key": "root",
            "children": [{"key": "a/b"}, {"key": "ok"}]
        }))
        .expect("parse");

        let errors = validate_spec_invariants(&spec);
        assert_eq!(
            errors,
            vec!["root/a/b: key 'a/b' contains '/'".to_string()]
        );
    }
}
