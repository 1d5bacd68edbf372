//! Ristretto CLI entry point.

use clap::Parser;
use ristretto::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    ristretto::logging::init();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check(args) => match cli::run_check(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
        Commands::Init(args) => match cli::run_init(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
    };

    std::process::exit(exit_code);
}
