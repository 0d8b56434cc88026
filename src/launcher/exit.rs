//! Top-level error channel: every failure ends up here and terminates the launcher.
use std::{ffi::OsStr, process::ExitCode};

use anyhow::Error;

use super::supervisor::ChildExit;
use crate::lib::errors::{LaunchError, FAILURE_EXIT_CODE};

/// Bundles a fatal error message with the status the launcher exits with.
#[derive(Debug)]
pub struct LaunchExit {
    message: String,
    exit_status: u8,
}

impl LaunchExit {
    /// Wrap an untyped failure; exits with the generic failure status.
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:#}"),
            exit_status: FAILURE_EXIT_CODE,
        }
    }

    pub fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        ExitCode::from(self.exit_status)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_status(&self) -> u8 {
        self.exit_status
    }
}

impl From<LaunchError> for LaunchExit {
    fn from(err: LaunchError) -> Self {
        Self {
            exit_status: err.exit_status(),
            message: err.to_string(),
        }
    }
}

/// Exit status mirroring the child's.
///
/// A non-zero code outside `1..=255` cannot be represented and falls back to
/// the generic failure status. A child without an exit code is an error.
pub fn exit_status_for(exit: ChildExit, program: &OsStr) -> Result<u8, LaunchError> {
    match exit {
        ChildExit::Code(0) => Ok(0),
        ChildExit::Code(code) => Ok(u8::try_from(code)
            .ok()
            .filter(|status| *status != 0)
            .unwrap_or(FAILURE_EXIT_CODE)),
        ChildExit::Terminated { signal } => Err(LaunchError::Terminated {
            program: program.to_string_lossy().into_owned(),
            signal,
        }),
    }
}
