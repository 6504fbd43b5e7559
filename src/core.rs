//! Main execution logic
//!
//! argv → split on `--` → flags → credentials → one batch fetch →
//! environment entries → print `export` lines or run the command.

use tracing::{debug, info};

use crate::auth::resolve_credentials;
use crate::cli::{merge_default_options, parse_flags, split_args, Args};
use crate::config::Config;
use crate::environment::{self, EnvEntry};
use crate::errors::{Result, SsmEnvError};
use crate::logging;
use crate::runner::{execute, print_exports};
use crate::signals;
use crate::status::ExitStatus;
use crate::store::{fetch_parameters, ssm, SsmClient};

/// Main entry point for the CLI.
///
/// Parses flags, fetches parameters and dispatches to print or execute
/// mode. Every failure is reported on stderr and becomes a non-zero status.
pub fn run(argv: Vec<String>) -> ExitStatus {
    let split = split_args(argv);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}", e);
            Config::default()
        }
    };

    let pre = merge_default_options(split.pre, &config.default_options);

    let args = match parse_flags(&pre) {
        Ok(args) => args,
        Err(SsmEnvError::Parse(e)) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
        Err(e) => return handle_error(e, false),
    };

    logging::init(args.verbose, args.log_format.unwrap_or_default());

    let verbose = args.verbose;
    match program(args, split.post, &config) {
        Ok(()) => ExitStatus::Success,
        Err(e) => handle_error(e, verbose),
    }
}

/// Fetch and decode, then print or execute
pub fn program(args: Args, command: Vec<String>, config: &Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let entries = runtime.block_on(load_entries(&args, config))?;
    drop(runtime);

    // Ctrl+C while waiting on the store: nothing is printed or started
    if signals::was_interrupted() {
        return Err(SsmEnvError::Interrupted);
    }

    if command.is_empty() {
        let stdout = std::io::stdout();
        print_exports(&mut stdout.lock(), &entries)?;
        return Ok(());
    }

    let env = if args.isolate {
        entries
    } else {
        environment::merge(environment::inherited(), entries)
    };

    execute(&env, &command)?;
    Ok(())
}

/// Resolve credentials, fetch every `-path` in one request and decode
/// the values into environment entries.
pub async fn load_entries(args: &Args, config: &Config) -> Result<Vec<EnvEntry>> {
    if args.paths.is_empty() {
        debug!("No -path given, nothing to fetch");
        return Ok(Vec::new());
    }

    let credentials = resolve_credentials(
        args.profile.as_deref().or(config.profile.as_deref()),
        args.region.as_deref(),
        config.region.as_deref(),
        ssm::SERVICE,
    )?;

    let endpoint = args.endpoint.as_deref().or(config.endpoint.as_deref());
    let client = SsmClient::new(credentials, endpoint)?;

    info!(region = %client.region(), endpoint = %client.endpoint(), "Using parameter store");

    let parameters = fetch_parameters(&client, &args.paths).await?;
    environment::entries_from_parameters(&parameters)
}

fn handle_error(error: SsmEnvError, verbose: bool) -> ExitStatus {
    if verbose {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    ExitStatus::from(&error)
}
