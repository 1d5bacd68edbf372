//! Node-local rules.
//!
//! A rule looks at one node and its parent and may produce a match. Rules
//! can read the tracking context but never update it; the traversal driver
//! owns all bookkeeping.

use tree_sitter::Node;

use super::shape::{self, DEBUG_METHOD, DEBUG_OBJECT};
use super::{RuleId, RuleMatch, TrackingContext};

/// Read-only view handed to every rule.
pub struct RuleContext<'a> {
    /// Full component source; node byte offsets index into it.
    pub source: &'a [u8],
    pub tracking: &'a TrackingContext,
}

/// A check evaluated at every node of the logic section.
pub trait Rule: Send + Sync {
    /// The identifier attached to this rule's findings.
    fn id(&self) -> RuleId;

    /// Inspect `node` (whose direct parent is `parent`).
    fn check(
        &self,
        node: Node<'_>,
        parent: Option<Node<'_>>,
        cx: &RuleContext<'_>,
    ) -> Option<RuleMatch>;
}

/// Flags `console.log(...)` calls left in component code.
pub struct NoConsoleLog;

impl Rule for NoConsoleLog {
    fn id(&self) -> RuleId {
        RuleId::NoConsoleLog
    }

    fn check(
        &self,
        node: Node<'_>,
        _parent: Option<Node<'_>>,
        cx: &RuleContext<'_>,
    ) -> Option<RuleMatch> {
        match shape::member_callee(node, cx.source)? {
            (Some(DEBUG_OBJECT), DEBUG_METHOD) => Some(RuleMatch::error(
                self.id(),
                shape::line_of(node),
                "Console.log detected. Did you leave a debug statement?",
            )),
            _ => None,
        }
    }
}

/// Flags `x.subscribe(...)` calls whose handle is thrown away.
///
/// Captured handles are not reported here; they are tracked and checked once
/// the whole file has been walked.
pub struct NoWildSubscription;

impl Rule for NoWildSubscription {
    fn id(&self) -> RuleId {
        RuleId::NoWildSubscription
    }

    fn check(
        &self,
        node: Node<'_>,
        parent: Option<Node<'_>>,
        cx: &RuleContext<'_>,
    ) -> Option<RuleMatch> {
        if !shape::is_subscribe_call(node, cx.source)
            || shape::is_binding(shape::binding_parent(parent))
        {
            return None;
        }
        Some(RuleMatch::error(
            self.id(),
            shape::line_of(node),
            "Unassigned subscription detected. Assign this to a variable to cleanup later.",
        ))
    }
}

/// The rules every analyzer starts with.
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![Box::new(NoConsoleLog), Box::new(NoWildSubscription)]
}
