//! Parsing the utility flags that precede `--`
//!
//! Flags use the single-dash long form (`-path=/a`). clap only understands
//! double-dash long flags, so tokens are normalised before parsing.

use clap::{CommandFactory, Parser};

use crate::cli::args::Args;
use crate::errors::Result;

/// Name clap reports in usage and error messages
const BIN_NAME: &str = "ssm-env";

/// Rewrite `-name` / `-name=value` into `--name` / `--name=value`.
///
/// Single-character short flags (`-v`, `-h`) and tokens that already start
/// with `--` are left alone, as are values that don't look like flags.
fn normalize_flag(token: &str) -> String {
    let is_single_dash_long = token.len() > 2
        && token.starts_with('-')
        && !token.starts_with("--")
        && token[1..].chars().next().is_some_and(|c| c.is_ascii_alphabetic());

    if is_single_dash_long {
        format!("-{}", token)
    } else {
        token.to_string()
    }
}

/// True for `--name` when `name` is an option that takes a value
fn takes_value(flag: &str) -> bool {
    let Some(name) = flag.strip_prefix("--") else {
        return false;
    };
    Args::command()
        .get_arguments()
        .any(|arg| arg.get_long() == Some(name) && arg.get_action().takes_values())
}

/// Normalise every token. The token after a value-taking flag is always its
/// value, even when it starts with `-`, so the two are joined with `=`.
fn normalize_flags(pre: &[String]) -> Vec<String> {
    let mut normalized = Vec::with_capacity(pre.len());
    let mut tokens = pre.iter();

    while let Some(token) = tokens.next() {
        let flag = normalize_flag(token);
        if takes_value(&flag) {
            if let Some(value) = tokens.next() {
                normalized.push(format!("{}={}", flag, value));
                continue;
            }
        }
        normalized.push(flag);
    }

    normalized
}

/// Parse the pre-separator arguments into [`Args`].
///
/// Fails fast on the first malformed, unknown or stray token; a positional
/// argument before `--` is an error rather than the end of the flags. Help
/// and version requests also come back as errors; the caller checks the kind.
pub fn parse_flags(pre: &[String]) -> Result<Args> {
    let argv = std::iter::once(BIN_NAME.to_string()).chain(normalize_flags(pre));
    Ok(Args::try_parse_from(argv)?)
}

/// Collect every `-path` value, in order, duplicates kept.
pub fn resolve_paths(pre: &[String]) -> Result<Vec<String>> {
    Ok(parse_flags(pre)?.paths)
}

/// Prepend configured default flags to the user's flags.
///
/// Defaults come first so flags given on the command line win for
/// single-valued options. Non-flag defaults are dropped with a warning.
pub fn merge_default_options(pre: Vec<String>, defaults: &[String]) -> Vec<String> {
    if defaults.is_empty() {
        return pre;
    }

    let (flags, positional): (Vec<_>, Vec<_>) = defaults.iter().partition(|opt| opt.starts_with('-'));

    // Logging is not set up yet at this point
    if !positional.is_empty() {
        eprintln!("Warning: Positional arguments in default options are ignored: {:?}", positional);
    }

    let mut merged = Vec::with_capacity(pre.len() + flags.len());
    merged.extend(flags.into_iter().cloned());
    merged.extend(pre);
    merged
}
