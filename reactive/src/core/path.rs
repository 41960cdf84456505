//! `/`-separated key paths into a live tree.

use std::rc::Rc;

use crate::core::node::SharedNode;

/// Resolve `path` (e.g. `root/list/item-3`) starting at `root`.
///
/// The first segment must be the root's own key.
pub fn resolve(root: &SharedNode, path: &str) -> Option<SharedNode> {
    let mut segments = path.split('/');
    let first = segments.next()?;
    if root.try_borrow().ok()?.key() != first {
        return None;
    }
    let mut current = Rc::clone(root);
    for segment in segments {
        let next = current.try_borrow().ok()?.child(segment).cloned()?;
        current = next;
    }
    Some(current)
}

/// Return the key path from the topmost live ancestor down to `node`.
pub fn node_path(node: &SharedNode) -> Option<String> {
    let mut keys = Vec::new();
    let mut cursor = Some(Rc::clone(node));
    while let Some(current) = cursor {
        let current = current.try_borrow().ok()?;
        keys.push(current.key().to_string());
        cursor = current.parent();
    }
    keys.reverse();
    Some(keys.join("/"))
}
