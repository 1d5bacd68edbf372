//! Per-file analysis: parse, traverse, reconcile.

use std::path::Path;

use thiserror::Error;

use super::rules::{builtin_rules, Rule};
use super::traversal::traverse;
use super::{Finding, TrackingContext};
use crate::parser::{parse_component, ParseError};

/// Why a file produced no analysis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Runs the registered rules and the subscription leak check over
/// component files.
///
/// The analyzer holds no per-file state; every call builds its own
/// tracking context, so one analyzer can serve concurrent analyses.
pub struct Analyzer {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Create an analyzer with the built-in rules.
    pub fn new() -> Self {
        Self::with_rules(builtin_rules())
    }

    /// Create an analyzer with an explicit rule set.
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Register an additional rule.
    pub fn add_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Analyze component source, failing if it does not parse.
    ///
    /// Findings are rule matches in traversal order followed by leaked
    /// subscriptions in first-seen order.
    pub fn check_source(&self, file: &str, source: &str) -> Result<Vec<Finding>, ParseError> {
        let parsed = parse_component(source)?;
        let script = match &parsed.script {
            Some(script) => script,
            None => return Ok(Vec::new()),
        };
        tracing::trace!(file, lang = ?script.lang, "analyzing instance script");

        let mut tracking = TrackingContext::new();
        let mut matches = traverse(
            script.root_node(),
            parsed.source_bytes(),
            &self.rules,
            &mut tracking,
        );
        matches.extend(tracking.reconcile());

        Ok(matches.into_iter().map(|m| m.into_finding(file)).collect())
    }

    /// Analyze component source; a parse failure yields no findings.
    pub fn analyze_source(&self, file: &str, source: &str) -> Vec<Finding> {
        match self.check_source(file, source) {
            Ok(findings) => findings,
            Err(e) => {
                tracing::debug!(file, error = %e, "skipping component that failed to parse");
                Vec::new()
            }
        }
    }

    /// Read and analyze a component file, reporting read and parse failures.
    pub async fn check_file(&self, path: &Path) -> Result<Vec<Finding>, AnalyzeError> {
        let file = path.to_string_lossy().to_string();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AnalyzeError::Io {
                path: file.clone(),
                source,
            })?;
        Ok(self.check_source(&file, &source)?)
    }

    /// Read and analyze a component file. Never fails: unreadable or
    /// malformed files yield no findings.
    pub async fn analyze_file(&self, path: &Path) -> Vec<Finding> {
        match self.check_file(path).await {
            Ok(findings) => findings,
            Err(AnalyzeError::Io { path, source }) => {
                tracing::warn!(file = %path, error = %source, "could not read component");
                Vec::new()
            }
            Err(AnalyzeError::Parse(e)) => {
                tracing::debug!(
                    file = %path.display(),
                    error = %e,
                    "skipping component that failed to parse"
                );
                Vec::new()
            }
        }
    }
}
