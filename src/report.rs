//! Output formatting for ristretto results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;

use crate::detect::{DetectionResult, Finding, RuleId, Severity};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
    Sarif,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Format::Pretty),
            "json" => Ok(Format::Json),
            "sarif" => Ok(Format::Sarif),
            _ => Err(format!(
                "invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
                s
            )),
        }
    }
}

/// Path of `file` relative to `base`, with forward slashes.
///
/// A single-file scan reports just the file name.
pub fn relative_path(file: &str, base: &Path) -> String {
    if base.as_os_str().is_empty() {
        return file.to_string();
    }

    let path = Path::new(file);
    if path == base {
        return path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file.to_string());
    }

    path.strip_prefix(base)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file.to_string())
}

// =============================================================================
// JSON Format
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    pub passed: bool,
    pub files_scanned: usize,
    pub findings: Vec<JsonFinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unparsed: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFinding {
    pub rule: String,
    pub severity: String,
    pub file: String,
    pub line: usize,
    pub message: String,
}

/// Build the JSON report structure.
pub fn build_json(base: &Path, config: Option<&Path>, result: &DetectionResult) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: base.to_string_lossy().to_string(),
        config: config.map(|p| p.to_string_lossy().to_string()),
        passed: !result.has_errors(),
        files_scanned: result.scanned,
        findings: result
            .findings
            .iter()
            .map(|f| finding_to_json(f, base))
            .collect(),
        unparsed: result.unparsed.iter().map(|f| relative_path(f, base)).collect(),
        unreadable: result
            .unreadable
            .iter()
            .map(|f| relative_path(f, base))
            .collect(),
    }
}

fn finding_to_json(f: &Finding, base: &Path) -> JsonFinding {
    JsonFinding {
        rule: f.rule.as_str().to_string(),
        severity: f.severity.to_string(),
        file: relative_path(&f.file, base),
        line: f.line,
        message: f.message.clone(),
    }
}

/// Write results in JSON format.
pub fn write_json(
    base: &Path,
    config: Option<&Path>,
    result: &DetectionResult,
) -> anyhow::Result<()> {
    let report = build_json(base, config, result);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "ristretto";

#[derive(Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
}

/// Rule metadata for SARIF output.
struct RuleInfo {
    name: &'static str,
    short_description: &'static str,
}

fn rule_info(rule: RuleId) -> RuleInfo {
    match rule {
        RuleId::NoConsoleLog => RuleInfo {
            name: "NoConsoleLog",
            short_description: "Detects console.log debug statements left in component scripts",
        },
        RuleId::NoWildSubscription => RuleInfo {
            name: "NoWildSubscription",
            short_description: "Detects subscribe() calls whose unsubscribe handle is discarded",
        },
        RuleId::SubscriptionLeak => RuleInfo {
            name: "SubscriptionLeak",
            short_description:
                "Detects captured subscription handles that are never called or passed to onDestroy",
        },
        RuleId::Custom(id) => RuleInfo {
            name: id,
            short_description: "Rule registered by the embedding application",
        },
    }
}

fn severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

/// Build the SARIF report structure.
pub fn build_sarif(base: &Path, result: &DetectionResult) -> SarifReport {
    // BTreeSet keeps the rules list stable between runs
    let rule_ids: BTreeSet<RuleId> = result.findings.iter().map(|f| f.rule).collect();

    let rules: Vec<SarifRule> = rule_ids
        .into_iter()
        .map(|rule| {
            let info = rule_info(rule);
            SarifRule {
                id: rule.as_str().to_string(),
                name: info.name.to_string(),
                short_description: SarifMessage {
                    text: info.short_description.to_string(),
                },
                default_config: SarifRuleConfig {
                    level: "error".to_string(),
                },
            }
        })
        .collect();

    let results: Vec<SarifResult> = result
        .findings
        .iter()
        .map(|f| SarifResult {
            rule_id: f.rule.as_str().to_string(),
            level: severity_to_level(f.severity).to_string(),
            message: SarifMessage {
                text: f.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: relative_path(&f.file, base),
                    },
                    region: SarifRegion {
                        start_line: if f.line > 0 { f.line } else { 1 },
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(base: &Path, result: &DetectionResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&build_sarif(base, result))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(base: &Path, result: &DetectionResult) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_pretty(&mut out, base, result)
}

/// Render the pretty report into any writer.
pub fn render_pretty<W: Write>(
    out: &mut W,
    base: &Path,
    result: &DetectionResult,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "  {} v{}",
        "ristretto".bold(),
        env!("CARGO_PKG_VERSION")
    )?;
    writeln!(out, "  {}{}", "Scanning: ".dimmed(), base.display())?;
    writeln!(out)?;

    for f in &result.findings {
        let bullet = match f.severity {
            Severity::Error => "●".red(),
            Severity::Warning => "●".yellow(),
        };
        let location = if f.line > 0 {
            format!("{}:{}", relative_path(&f.file, base), f.line)
        } else {
            relative_path(&f.file, base)
        };
        writeln!(out, "  {} {}", bullet, location.bold())?;
        writeln!(out, "    {} {}", "└─".dimmed(), f.message)?;
        writeln!(out)?;
    }

    if !result.unparsed.is_empty() {
        writeln!(
            out,
            "  {}",
            format!("Skipped {} file(s) that failed to parse:", result.unparsed.len()).dimmed()
        )?;
        for file in &result.unparsed {
            writeln!(out, "    {}", relative_path(file, base).dimmed())?;
        }
        writeln!(out)?;
    }

    if !result.unreadable.is_empty() {
        writeln!(
            out,
            "  {}",
            format!("Could not read {} file(s).", result.unreadable.len()).yellow()
        )?;
        writeln!(out)?;
    }

    let count = result.findings.len();
    if result.has_errors() {
        let plural = if count != 1 { "s" } else { "" };
        let summary = format!(
            "Order up! Found {} burnt note{} in {} file(s).",
            count, plural, result.scanned
        );
        writeln!(out, "  {}", summary.yellow())?;
    } else if count > 0 {
        writeln!(
            out,
            "  {}",
            format!("Drinkable, with {} warning(s).", count).green()
        )?;
    } else {
        writeln!(
            out,
            "  {}",
            format!("Perfect shot! No issues found in {} file(s).", result.scanned).green()
        )?;
    }
    writeln!(out)?;
    Ok(())
}
