//! ssm-env library interface
//!
//! Fetches values from AWS SSM Parameter Store and injects them into a
//! command's environment, or prints them as shell `export` statements.
//!
//! # Module Organization
//!
//! - [`cli`] - argv splitting on `--` and flag parsing
//! - [`store`] - the parameter store capability, SSM client and in-memory fake
//! - [`auth`] - AWS credentials and SigV4 signing
//! - [`environment`] - parameter values to `KEY=VALUE` entries
//! - [`runner`] - execute mode and print mode
//! - [`core`] - the pipeline tying them together

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod environment;
pub mod errors;
pub mod logging;
pub mod runner;
pub mod signals;
pub mod status;
pub mod store;

pub use errors::{ExecError, FetchError, Result, SsmEnvError};
