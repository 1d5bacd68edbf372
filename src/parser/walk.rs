//! Pre-order tree traversal with explicit parent tracking.

use tree_sitter::Node;

/// Visit `root` and every descendant exactly once, parents before children.
///
/// `enter` receives each node together with its parent. The root's parent is
/// `None` even when `root` is not the tree root; the traversal never leaves
/// the subtree it was started on.
pub fn walk<'t, F>(root: Node<'t>, mut enter: F)
where
    F: FnMut(Node<'t>, Option<Node<'t>>),
{
    let mut cursor = root.walk();
    let mut parents: Vec<Node<'t>> = Vec::new();

    loop {
        let node = cursor.node();
        enter(node, parents.last().copied());

        if cursor.goto_first_child() {
            parents.push(node);
            continue;
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
            parents.pop();
        }
    }
}
