//! Command-line interface for ristretto.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{self, Config};
use crate::detect::{Analyzer, Runner};
use crate::report::{self, Format};
use crate::scanner;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default config template written by `init`.
const CONFIG_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Svelte component linter.
///
/// Finds console.log calls left in component scripts and store
/// subscriptions whose unsubscribe handle is dropped or never called.
#[derive(Parser)]
#[command(name = "ristretto")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze Svelte components under a path
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// Write a default ristretto.yaml
    Init(InitArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Path to check (file or directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Maximum number of files analyzed at once (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "ristretto.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Spinner on stderr, hidden when not wanted.
fn spinner(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    // Validate format
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    // Load config (explicit, discovered, or defaults)
    let (mut config, config_path) = match Config::load(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }

    if let Err(e) = config::validate(&config) {
        eprintln!("Error: invalid config: {}", e);
        return Ok(EXIT_ERROR);
    }

    // Resolve path
    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let show_progress =
        format == Format::Pretty && !args.no_progress && std::io::stderr().is_terminal();
    let pb = spinner(show_progress);

    pb.set_message(format!("Grinding beans in {}...", args.path.display()));
    let files = scanner::collect_files(&abs_path, &config)?;

    if files.is_empty() {
        pb.finish_and_clear();
        eprintln!("No Svelte files found. Is this the right directory?");
        return Ok(EXIT_SUCCESS);
    }

    pb.set_message(format!("Pulling the shot (analyzing {} files)...", files.len()));
    let runner = Runner::new(Analyzer::new()).jobs(config.jobs);
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(runner.run(&files));
    pb.finish_and_clear();

    match format {
        Format::Json => report::write_json(&abs_path, config_path.as_deref(), &result)?,
        Format::Sarif => report::write_sarif(&abs_path, &result)?,
        Format::Pretty => report::write_pretty(&abs_path, &result)?,
    }

    if result.has_errors() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite it or --output to pick another path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, CONFIG_TEMPLATE) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to exclude paths you don't want scanned", args.output.display());
    println!("  2. Run: ristretto check . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_parses_check_defaults() {
        let cli = Cli::try_parse_from(["ristretto", "check"]).unwrap();
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.path, PathBuf::from("."));
                assert_eq!(args.format, "pretty");
                assert!(args.jobs.is_none());
            }
            Commands::Init(_) => panic!("expected check"),
        }
    }

    #[test]
    fn test_cli_lint_alias() {
        let argv = ["ristretto", "lint", "src", "--format", "json", "-j", "2"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(matches!(cli.command, Commands::Check(ref a) if a.jobs == Some(2)));
    }

    #[test]
    fn test_template_is_valid_config() {
        let config = Config::parse_str(CONFIG_TEMPLATE).unwrap();
        assert!(config::validate(&config).is_ok());
    }

    #[test]
    fn test_init_writes_and_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("nested").join("ristretto.yaml");
        let args = InitArgs {
            output: output.clone(),
            force: false,
        };
        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert!(output.exists());
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);

        let forced = InitArgs { output, force: true };
        assert_eq!(run_init(&forced).unwrap(), EXIT_SUCCESS);
    }

    #[test]
    fn test_check_exit_codes() {
        let temp = TempDir::new().unwrap();
        let clean = temp.path().join("Clean.svelte");
        std::fs::write(&clean, "<script>\nlet a = 1;\n</script>\n").unwrap();

        let mut args = CheckArgs {
            path: clean,
            config: None,
            format: "json".to_string(),
            jobs: Some(1),
            no_progress: true,
        };
        assert_eq!(run_check(&args).unwrap(), EXIT_SUCCESS);

        let dirty = temp.path().join("Dirty.svelte");
        std::fs::write(&dirty, "<script>\nconsole.log(1);\n</script>\n").unwrap();
        args.path = dirty;
        assert_eq!(run_check(&args).unwrap(), EXIT_FAILED);

        args.format = "xml".to_string();
        assert_eq!(run_check(&args).unwrap(), EXIT_ERROR);
    }
}
