//! Core types for detection results.

use serde::{Serialize, Serializer};

/// Severity levels for findings.
///
/// `Error` findings block a clean verdict; `Warning` findings are reported
/// but do not fail the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Identifiers for the checks that can produce a finding.
///
/// Rules registered through `Analyzer::add_rule` use `Custom` with their own
/// kebab-case id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    NoConsoleLog,
    NoWildSubscription,
    SubscriptionLeak,
    Custom(&'static str),
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::NoConsoleLog => "no-console-log",
            RuleId::NoWildSubscription => "no-wild-subscription",
            RuleId::SubscriptionLeak => "subscription-leak",
            RuleId::Custom(id) => *id,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A match produced by a rule or the leak reconciler, before it is
/// attributed to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: RuleId,
    pub message: String,
    /// 1-based line, or 0 when the position is unknown.
    pub line: usize,
    pub severity: Severity,
}

impl RuleMatch {
    /// Create a hard-severity match.
    pub fn error(rule: RuleId, line: usize, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            line,
            severity: Severity::Error,
        }
    }

    /// Attribute this match to a file.
    pub fn into_finding(self, file: &str) -> Finding {
        Finding {
            rule: self.rule,
            message: self.message,
            file: file.to_string(),
            line: self.line,
            severity: self.severity,
        }
    }
}

/// A single reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule: RuleId,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub severity: Severity,
}

/// Results of analyzing a batch of files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult {
    pub findings: Vec<Finding>,
    /// Number of files scanned
    pub scanned: usize,
    /// Files whose source failed to parse (they contribute no findings)
    pub unparsed: Vec<String>,
    /// Files that could not be read
    pub unreadable: Vec<String>,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any error-severity findings.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Number of findings produced by `rule`.
    pub fn count_for(&self, rule: RuleId) -> usize {
        self.findings.iter().filter(|f| f.rule == rule).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_rule_id_keeps_its_name() {
        let id = RuleId::Custom("no-debugger");
        assert_eq!(id.as_str(), "no-debugger");
        assert_eq!(id.to_string(), "no-debugger");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"no-debugger\"");
    }

    #[test]
    fn test_rule_id_serializes_kebab_case() {
        let json = serde_json::to_string(&RuleId::SubscriptionLeak).unwrap();
        assert_eq!(json, "\"subscription-leak\"");
    }

    #[test]
    fn test_into_finding_stamps_file() {
        let m = RuleMatch::error(RuleId::NoConsoleLog, 3, "msg");
        let f = m.into_finding("src/App.svelte");
        assert_eq!(f.file, "src/App.svelte");
        assert_eq!(f.line, 3);
        assert_eq!(f.severity, Severity::Error);
    }

    #[test]
    fn test_has_errors_ignores_warnings() {
        let mut result = DetectionResult::new();
        result.findings.push(Finding {
            rule: RuleId::NoConsoleLog,
            message: "soft".to_string(),
            file: "a.svelte".to_string(),
            line: 1,
            severity: Severity::Warning,
        });
        assert!(!result.has_errors());

        let hard = RuleMatch::error(RuleId::NoConsoleLog, 2, "hard");
        result.findings.push(hard.into_finding("a.svelte"));
        assert!(result.has_errors());
        assert_eq!(result.count_for(RuleId::NoConsoleLog), 2);
    }
}
