//! Ristretto - a linter for Svelte components.
//!
//! Ristretto parses the instance `<script>` of each component and reports:
//! - `console.log` debug statements left in the code
//! - `subscribe()` calls whose unsubscribe handle is thrown away
//! - captured subscription handles that are never called or passed to
//!   `onDestroy` (potential memory leaks)
//!
//! # Architecture
//!
//! - `parser`: script extraction, tree-sitter parsing and tree walking
//! - `detect`: rules, per-file tracking context, traversal driver, analyzer
//!   and batch runner
//! - `scanner`: component discovery
//! - `config`: optional YAML configuration
//! - `report`: output formatting (pretty, JSON, SARIF)
//!
//! # Adding a Rule
//!
//! Implement `detect::Rule` and register it with `Analyzer::add_rule`. The
//! traversal driver runs every registered rule at every node. Rules outside
//! this crate report under `RuleId::Custom("your-rule-id")`.

pub mod cli;
pub mod config;
pub mod detect;
pub mod logging;
pub mod parser;
pub mod report;
pub mod scanner;

pub use config::Config;
pub use detect::{Analyzer, DetectionResult, Finding, Rule, RuleId, Runner, Severity};
pub use parser::{parse_component, ParseError, ParsedComponent};
