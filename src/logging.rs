//! Structured logging setup
//!
//! Logs always go to stderr: stdout carries `export` lines in print mode and
//! belongs to the child in execute mode.

use std::io::IsTerminal;

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "SSM_ENV_LOG";

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,ssm_env=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. `SSM_ENV_LOG` wins over `verbose`.
pub fn init(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false);

    let result = match format {
        LogFormat::Text => tracing_subscriber::registry().with(filter).with(layer).try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init(),
    };

    // Already initialised (tests, embedding)
    result.ok();
}
