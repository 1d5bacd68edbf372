//! Single-pass traversal driver.
//!
//! At every node the registered rules run first, then the tracking context
//! is updated from the node's shape.

use tree_sitter::Node;

use super::rules::{Rule, RuleContext};
use super::shape::{self, CLEANUP_HOOK};
use super::{RuleMatch, TrackingContext};
use crate::parser::walk;

/// Walk `root` once, collecting rule matches in visit order and filling
/// `tracking`.
pub fn traverse(
    root: Node<'_>,
    source: &[u8],
    rules: &[Box<dyn Rule>],
    tracking: &mut TrackingContext,
) -> Vec<RuleMatch> {
    let mut matches = Vec::new();

    walk(root, |node, parent| {
        let cx = RuleContext {
            source,
            tracking: &*tracking,
        };
        for rule in rules {
            if let Some(m) = rule.check(node, parent, &cx) {
                matches.push(m);
            }
        }

        track(node, parent, source, &mut *tracking);
    });

    matches
}

fn track(node: Node<'_>, parent: Option<Node<'_>>, source: &[u8], tracking: &mut TrackingContext) {
    if !shape::is_call(node) {
        return;
    }

    // const h = x.subscribe(...) / h = x.subscribe(...)
    if shape::is_subscribe_call(node, source) {
        let bound = shape::binding_parent(parent).and_then(|p| shape::bound_name(p, source));
        if let Some(name) = bound {
            tracking.record_subscription(name, shape::line_of(node));
        }
    }

    // h()
    if let Some(name) = shape::callee_identifier(node, source) {
        tracking.record_call(name);

        // onDestroy(h)
        if name == CLEANUP_HOOK {
            let handle =
                shape::first_argument(node).and_then(|a| shape::identifier_name(a, source));
            if let Some(handle) = handle {
                tracking.record_call(handle);
            }
        }
    }
}
