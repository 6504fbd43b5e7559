//! CLI flag definitions using clap
//!
//! These are the utility flags that appear before `--`. Everything after
//! `--` is the command to run and is never seen by clap.

use clap::{ArgAction, Parser, ValueEnum};

/// Run a command with AWS SSM parameters injected into its environment.
///
/// Without a command, prints `export` statements for shell evaluation:
/// eval "$(ssm-env -path=/app/prod)"
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "ssm-env",
    version,
    about,
    args_override_self = true,
    override_usage = "ssm-env [-path=<ID> ...] [-- <COMMAND> [ARGS...]]"
)]
pub struct Args {
    /// SSM parameter to fetch (repeatable, fetched in order)
    #[arg(long = "path", value_name = "ID", action = ArgAction::Append)]
    pub paths: Vec<String>,

    /// AWS region of the parameter store
    #[arg(long, env = "AWS_REGION", value_name = "REGION")]
    pub region: Option<String>,

    /// Override the SSM endpoint URL (e.g. a local emulator)
    #[arg(long, env = "AWS_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// AWS profile to load credentials from
    #[arg(long, env = "AWS_PROFILE", value_name = "NAME")]
    pub profile: Option<String>,

    /// Give the command only the fetched variables, not the current environment
    #[arg(long, action = ArgAction::SetTrue)]
    pub isolate: bool,

    /// Verbose logging on stderr
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Log format for stderr output
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON Lines format for parsing
    Json,
}
