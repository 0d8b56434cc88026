use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Exit code for malformed invocations (bad flags, unreadable settings).
pub const USAGE_EXIT_CODE: u8 = 2;
/// Exit code when the target program cannot be located.
pub const NOT_FOUND_EXIT_CODE: u8 = 127;
/// Exit code when the target program was found but could not be started.
pub const SPAWN_FAILED_EXIT_CODE: u8 = 126;
/// Exit code for every other internal failure.
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Errors raised while walking the argument cursor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    /// A flag that takes a value was the last token.
    #[error("missing value for argument: {flag}")]
    MissingFlagValue { flag: String },
    /// A token starting with `-` that is not one of the recognized flags.
    #[error("illegal argument: {token}")]
    IllegalArgument { token: String },
    /// Flag parsing finished without finding a program to run.
    #[error("missing program argument")]
    MissingProgram,
}

/// Every failure the launcher can hit between startup and the child's exit.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Arguments(#[from] ArgumentError),
    /// `DOTENV_CONFIG_*` variables could not be deserialized.
    #[error("Failed to read launcher settings: {source}")]
    Settings {
        #[source]
        source: ConfigLoaderError,
    },
    /// The dotenv file could not be read or parsed.
    #[error("Failed to load dotenv file {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },
    #[error("executable file not found in search path: {program}")]
    ExecutableNotFound { program: String },
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
    /// Relaying one of the child's output pipes failed.
    #[error("Failed to forward {stream} of {program}: {source}")]
    Forward {
        program: String,
        stream: &'static str,
        #[source]
        source: io::Error,
    },
    /// The child ended without an exit code (killed by a signal on Unix).
    #[error("{program} terminated abnormally{}", signal_suffix(.signal))]
    Terminated { program: String, signal: Option<i32> },
    #[error("Failed to start async runtime: {source}")]
    Runtime {
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Helper to wrap a `dotenv` failure for a given file.
    pub fn from_dotenv_error(path: PathBuf, source: dotenv::Error) -> Self {
        Self::Dotenv { path, source }
    }

    /// Process exit status the launcher terminates with for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            LaunchError::Arguments(_) | LaunchError::Settings { .. } => USAGE_EXIT_CODE,
            LaunchError::ExecutableNotFound { .. } => NOT_FOUND_EXIT_CODE,
            LaunchError::Spawn { .. } => SPAWN_FAILED_EXIT_CODE,
            LaunchError::Terminated {
                signal: Some(signal),
                ..
            } => u8::try_from(128 + (*signal).clamp(0, 127)).unwrap_or(FAILURE_EXIT_CODE),
            LaunchError::Dotenv { .. }
            | LaunchError::Wait { .. }
            | LaunchError::Forward { .. }
            | LaunchError::Terminated { signal: None, .. }
            | LaunchError::Runtime { .. } => FAILURE_EXIT_CODE,
        }
    }
}

fn signal_suffix(signal: &Option<i32>) -> String {
    signal
        .map(|signal| format!(" (signal {signal})"))
        .unwrap_or_default()
}
