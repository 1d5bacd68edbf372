//! Per-file subscription bookkeeping and leak reconciliation.
//!
//! The traversal driver records every captured subscription handle and
//! every name that is called or handed to the cleanup hook. Only after the
//! whole tree has been walked does `reconcile` compare the two, since a
//! handle may be released lexically before it is declared.

use std::collections::HashSet;

use indexmap::IndexMap;

use super::{RuleId, RuleMatch};

/// State carried across one file's traversal.
///
/// Both collections only grow. A fresh context is created for every file.
#[derive(Debug, Default, Clone)]
pub struct TrackingContext {
    /// Handle name -> line of the `subscribe` call, in first-seen order.
    assigned_subscriptions: IndexMap<String, usize>,
    /// Names invoked as functions or passed to the cleanup hook.
    called_functions: HashSet<String>,
}

impl TrackingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` was assigned a subscription handle on `line`.
    ///
    /// Re-assignment keeps the name's original position but replaces the line.
    pub fn record_subscription(&mut self, name: &str, line: usize) {
        self.assigned_subscriptions.insert(name.to_string(), line);
    }

    /// Record that `name` was called or registered for cleanup.
    pub fn record_call(&mut self, name: &str) {
        if !self.called_functions.contains(name) {
            self.called_functions.insert(name.to_string());
        }
    }

    pub fn subscription_line(&self, name: &str) -> Option<usize> {
        self.assigned_subscriptions.get(name).copied()
    }

    pub fn is_called(&self, name: &str) -> bool {
        self.called_functions.contains(name)
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = (&str, usize)> {
        self.assigned_subscriptions
            .iter()
            .map(|(name, line)| (name.as_str(), *line))
    }

    /// Report every captured handle that was never called or registered.
    pub fn reconcile(&self) -> Vec<RuleMatch> {
        self.subscriptions()
            .filter(|(name, _)| !self.is_called(name))
            .map(|(name, line)| {
                RuleMatch::error(
                    RuleId::SubscriptionLeak,
                    line,
                    format!(
                        "Subscription '{}' is created but never used (potential memory leak).",
                        name
                    ),
                )
            })
            .collect()
    }
}
