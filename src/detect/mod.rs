//! Detection of debug statements and leaked subscriptions in components.

mod analyzer;
mod rules;
mod runner;
pub mod shape;
mod tracking;
mod traversal;
mod types;

pub use analyzer::{AnalyzeError, Analyzer};
pub use rules::{builtin_rules, NoConsoleLog, NoWildSubscription, Rule, RuleContext};
pub use runner::{Runner, DEFAULT_JOBS};
pub use tracking::TrackingContext;
pub use traversal::traverse;
pub use types::{DetectionResult, Finding, RuleId, RuleMatch, Severity};
