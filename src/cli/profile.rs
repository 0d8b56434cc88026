//! `LaunchConfig` construction and dotenv path resolution.
use std::{ffi::OsString, path::PathBuf};

use super::LaunchArgs;
use crate::settings::{LauncherSettings, StreamMode};

const DEFAULT_DOTENV_PATH: &str = ".env";

/// Where the dotenv variables end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    /// Applied to the launcher's own environment, inherited by the child.
    Load,
    /// Applied only to a fresh mapping given exclusively to the child.
    Replace,
}

impl EnvMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EnvMode::Load => "load",
            EnvMode::Replace => "replace",
        }
    }
}

/// Immutable description of one launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub dotenv_path: PathBuf,
    pub mode: EnvMode,
    pub program: OsString,
    pub program_args: Vec<OsString>,
    pub streams: StreamMode,
}

impl LaunchConfig {
    /// Combine parsed arguments with the startup settings.
    pub fn from_args(args: LaunchArgs, settings: &LauncherSettings) -> Self {
        Self {
            dotenv_path: resolve_dotenv_path(args.file, settings),
            mode: if args.replace {
                EnvMode::Replace
            } else {
                EnvMode::Load
            },
            program: args.program,
            program_args: args.program_args,
            streams: settings.streams,
        }
    }
}

/// Resolve the dotenv path in the order: CLI flag → `DOTENV_CONFIG_PATH` → `.env`.
pub fn resolve_dotenv_path(flag: Option<PathBuf>, settings: &LauncherSettings) -> PathBuf {
    flag.or_else(|| settings.path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOTENV_PATH))
}
