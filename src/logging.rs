//! Diagnostic logging setup.
//!
//! Logging is off unless `RISTRETTO_LOG` (or `RUST_LOG`) is set. Values use
//! the `RUST_LOG` filter syntax:
//!
//! ```bash
//! RISTRETTO_LOG=debug ristretto check src
//! RISTRETTO_LOG=ristretto::detect=debug RISTRETTO_LOG_FORMAT=json ristretto check .
//! ```
//!
//! Output always goes to stderr so JSON and SARIF reports on stdout stay
//! machine-readable.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RISTRETTO_LOG";
const LOG_FORMAT_ENV: &str = "RISTRETTO_LOG_FORMAT";

fn build_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber. Does nothing when no filter is set.
pub fn init() {
    if std::env::var(LOG_ENV).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr);

    // try_init: a subscriber may already be installed (tests, embedding).
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
