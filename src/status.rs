//! Exit status codes for the CLI
//!
//! - 0: Success (print mode finished, or the child exited 0)
//! - 1: Any error (bad flags, config, fetch failure, child failure)
//! - 130: Interrupted (Ctrl+C)

use std::process::{ExitCode, Termination};

use crate::errors::SsmEnvError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
    /// Standard SIGINT code
    Interrupted = 130,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status as u8)
    }
}

impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

impl From<&SsmEnvError> for ExitStatus {
    fn from(error: &SsmEnvError) -> Self {
        match error {
            SsmEnvError::Interrupted => ExitStatus::Interrupted,
            _ => ExitStatus::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExecError;

    #[test]
    fn test_every_error_maps_to_one() {
        let err = SsmEnvError::from(ExecError::MissingCommand);
        assert_eq!(ExitStatus::from(&err), ExitStatus::Error);
        assert_eq!(ExitStatus::from(&err) as u8, 1);
    }

    #[test]
    fn test_interrupted_maps_to_130() {
        assert_eq!(ExitStatus::from(&SsmEnvError::Interrupted) as u8, 130);
    }
}
