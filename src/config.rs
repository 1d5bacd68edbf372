//! Configuration file for ristretto.
//!
//! Configuration only affects which files are scanned and how many are
//! analyzed at once. Rules and their severities are fixed.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::DEFAULT_JOBS;

/// Config file names searched for in the current directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["ristretto.yaml", ".ristretto.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Glob patterns for paths to exclude (e.g., "**/legacy/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// File extensions to analyze, without the dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Maximum number of files analyzed concurrently
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_extensions() -> Vec<String> {
    vec!["svelte".to_string()]
}

fn default_jobs() -> usize {
    DEFAULT_JOBS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_paths: Vec::new(),
            extensions: default_extensions(),
            jobs: default_jobs(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. An empty document yields defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load the config at `path`, or discover one in the current directory.
    ///
    /// Returns defaults when no path is given and nothing is found.
    pub fn load(path: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => discover(),
        };
        match path {
            Some(p) => {
                let config = Self::parse_file(&p)
                    .map_err(|e| anyhow::anyhow!("error parsing config {}: {}", p.display(), e))?;
                Ok((config, Some(p)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Whether `path` has one of the configured extensions.
    pub fn has_target_extension(&self, path: &Path) -> bool {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Compile `excluded_paths` into a matcher.
    pub fn excluded_set(&self) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.excluded_paths {
            builder.add(Glob::new(pattern)?);
        }
        Ok(builder.build()?)
    }
}

/// Find a config file in the current directory.
fn discover() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Validate config values.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.jobs == 0 {
        anyhow::bail!("jobs must be at least 1");
    }

    if config.extensions.is_empty() {
        anyhow::bail!("extensions must not be empty");
    }

    for pattern in &config.excluded_paths {
        Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
excluded_paths:
  - "**/legacy/**"
jobs: 4
"#;
        let config = Config::parse_str(yaml).unwrap();
        assert_eq!(config.excluded_paths, vec!["**/legacy/**".to_string()]);
        assert_eq!(config.jobs, 4);
        assert_eq!(config.extensions, vec!["svelte".to_string()]);
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse_str("  \n").unwrap();
        assert_eq!(config.jobs, DEFAULT_JOBS);
        assert!(config.excluded_paths.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            jobs: 0,
            ..Default::default()
        };
        assert!(validate(&config).is_err());

        let config = Config {
            excluded_paths: vec!["a/{b".to_string()],
            ..Default::default()
        };
        assert!(validate(&config).is_err());

        let config = Config {
            extensions: vec![],
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_excluded_set_matches() {
        let config = Config {
            excluded_paths: vec!["**/legacy/**".to_string()],
            ..Default::default()
        };
        let set = config.excluded_set().unwrap();
        assert!(set.is_match("/repo/src/legacy/Old.svelte"));
        assert!(!set.is_match("/repo/src/routes/New.svelte"));
    }

    #[test]
    fn test_has_target_extension() {
        let config = Config::default();
        assert!(config.has_target_extension(Path::new("App.svelte")));
        assert!(config.has_target_extension(Path::new("App.SVELTE")));
        assert!(!config.has_target_extension(Path::new("app.ts")));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("ristretto.yaml");
        std::fs::write(&path, "jobs: 2\n").unwrap();
        let (config, found) = Config::load(Some(&path)).unwrap();
        assert_eq!(config.jobs, 2);
        assert_eq!(found, Some(path));
    }
}
