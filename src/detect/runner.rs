//! Batch runner that analyzes a set of component files.

use std::path::PathBuf;

use futures::stream::{self, StreamExt};

use super::{AnalyzeError, Analyzer, DetectionResult};

/// Default number of files analyzed concurrently.
pub const DEFAULT_JOBS: usize = 8;

/// Executes the analyzer against a set of files.
pub struct Runner {
    analyzer: Analyzer,
    jobs: usize,
}

impl Runner {
    /// Create a new runner.
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            jobs: DEFAULT_JOBS,
        }
    }

    /// Set the maximum number of files in flight at once.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Analyze every file.
    ///
    /// Files are read and analyzed concurrently, but findings keep the
    /// order of `files`. A file that cannot be read or parsed is recorded
    /// and skipped; it never stops the batch.
    pub async fn run(&self, files: &[PathBuf]) -> DetectionResult {
        let outcomes: Vec<_> = stream::iter(files)
            .map(|path| async move { (path, self.analyzer.check_file(path).await) })
            .buffered(self.jobs)
            .collect()
            .await;

        let mut result = DetectionResult::new();
        for (path, outcome) in outcomes {
            result.scanned += 1;
            match outcome {
                Ok(findings) => result.findings.extend(findings),
                Err(AnalyzeError::Io { path, source }) => {
                    tracing::warn!(file = %path, error = %source, "could not read component");
                    result.unreadable.push(path);
                }
                Err(AnalyzeError::Parse(e)) => {
                    tracing::debug!(
                    file = %path.display(),
                    error = %e,
                    "skipping component that failed to parse"
                );
                    result.unparsed.push(path.to_string_lossy().to_string());
                }
            }
        }

        tracing::debug!(
            scanned = result.scanned,
            findings = result.findings.len(),
            unparsed = result.unparsed.len(),
            "analysis finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::RuleId;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_runner_basic() {
        let temp = TempDir::new().unwrap();
        let app = temp.path().join("App.svelte");
        std::fs::write(
            &app,
            r#"<script>
  import { count } from './stores';
  console.log('mounted');
  count.subscribe((v) => {});
</script>
"#,
        )
        .unwrap();

        let runner = Runner::new(Analyzer::new());
        let result = runner.run(&[app]).await;

        assert_eq!(result.scanned, 1);
        assert_eq!(result.findings.len(), 2);
        assert_eq!(result.findings[0].rule, RuleId::NoConsoleLog);
        assert_eq!(result.findings[1].rule, RuleId::NoWildSubscription);
        assert!(result.has_errors());
    }

    #[tokio::test]
    async fn test_runner_records_failures_and_continues() {
        let temp = TempDir::new().unwrap();
        let broken = temp.path().join("Broken.svelte");
        std::fs::write(&broken, "<script>\nconsole.log(\n</script>\n").unwrap();
        let missing = temp.path().join("Missing.svelte");
        let good = temp.path().join("Good.svelte");
        std::fs::write(&good, "<script>\nconsole.log(1);\n</script>\n").unwrap();

        let runner = Runner::new(Analyzer::new()).jobs(2);
        let result = runner.run(&[broken, missing, good.clone()]).await;

        assert_eq!(result.scanned, 3);
        assert_eq!(result.unparsed.len(), 1);
        assert_eq!(result.unreadable.len(), 1);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].file, good.to_string_lossy());
    }

    #[tokio::test]
    async fn test_runner_preserves_input_order() {
        let temp = TempDir::new().unwrap();
        let mut files = Vec::new();
        for i in 0..5 {
            let path = temp.path().join(format!("C{}.svelte", i));
            std::fs::write(&path, "<script>\nconsole.log(0);\n</script>\n").unwrap();
            files.push(path);
        }

        let result = Runner::new(Analyzer::new()).jobs(3).run(&files).await;
        let reported: Vec<String> = result.findings.iter().map(|f| f.file.clone()).collect();
        let expected: Vec<String> = files.iter().map(|p| p.to_string_lossy().to_string()).collect();
        assert_eq!(reported, expected);
    }
}
