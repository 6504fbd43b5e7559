//! Error types for ssm-env

use thiserror::Error;

/// Main error type for ssm-env
#[derive(Error, Debug)]
pub enum SsmEnvError {
    /// Malformed utility flags. Rendered by clap, usage included.
    #[error("{0}")]
    Parse(#[from] clap::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Failed to fetch parameters: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid value in parameter `{name}`: {message}")]
    Decode {
        name: String,
        message: String,
    },

    #[error("Command failed: {0}")]
    Exec(#[from] ExecError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ctrl+C arrived before the command was started
    #[error("Interrupted")]
    Interrupted,
}

/// Failure of the single batch request to the parameter store
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, connection reset...)
    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered with an error document
    #[error("{code} (HTTP {status}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    /// The store answered 2xx with a body we could not read
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Request signing failed before anything was sent
    #[error("signing failed: {0}")]
    Signing(String),

    /// Catch-all for store implementations other than SSM
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Build a service error from the `__type` field of an SSM error body.
    ///
    /// SSM reports the type as `namespace#Code`; only the code is kept.
    pub fn service(status: u16, error_type: &str, message: impl Into<String>) -> Self {
        let code = error_type
            .rsplit('#')
            .next()
            .unwrap_or(error_type)
            .to_string();
        FetchError::Service {
            status,
            code,
            message: message.into(),
        }
    }
}

/// Failure to launch or complete the child command
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("no command given after `--`")]
    MissingCommand,

    #[error("failed to launch `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with status {code}")]
    Exit { program: String, code: i32 },

    #[error("`{program}` was terminated by a signal")]
    Signal { program: String },
}

pub type Result<T> = std::result::Result<T, SsmEnvError>;
