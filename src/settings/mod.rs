//! Load launcher settings from `DOTENV_CONFIG_*` environment variables.
use std::{env, ffi::OsString, path::PathBuf};

use serde::Deserialize;

use crate::lib::errors::LaunchError;

pub mod telemetry;

const ENV_PREFIX: &str = "DOTENV_CONFIG";

/// How the child's stdout/stderr reach the launcher's own streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamMode {
    /// Child shares the launcher's stdio handles.
    #[default]
    Inherit,
    /// Child output is piped and relayed by the launcher.
    Pipe,
}

impl StreamMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StreamMode::Inherit => "inherit",
            StreamMode::Pipe => "pipe",
        }
    }
}

/// Settings read once at startup, before any dotenv file is applied.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LauncherSettings {
    /// Default dotenv file when `--file` is not given (`DOTENV_CONFIG_PATH`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Let file values replace variables that already exist (`DOTENV_CONFIG_OVERRIDE`).
    #[serde(default, rename = "override")]
    pub override_existing: bool,
    /// Treat an unopenable dotenv file as fatal (`DOTENV_CONFIG_STRICT`, default on).
    #[serde(default = "default_strict")]
    pub strict: bool,
    /// Verbose logging (`DOTENV_CONFIG_DEBUG`).
    #[serde(default)]
    pub debug: bool,
    /// Supervision variant (`DOTENV_CONFIG_STREAMS`).
    #[serde(default)]
    pub streams: StreamMode,
}

fn default_strict() -> bool {
    true
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            path: None,
            override_existing: false,
            strict: default_strict(),
            debug: false,
            streams: StreamMode::default(),
        }
    }
}

impl LauncherSettings {
    /// Read settings from the live process environment.
    ///
    /// Variables that are not valid UTF-8 are skipped rather than read through
    /// `config`'s own environment scan. Runs before tracing is initialized; call
    /// [`telemetry::log_loaded`] once it is.
    pub fn load_from_env() -> Result<Self, LaunchError> {
        Self::load_from_snapshot(env::vars_os())
    }

    /// Read settings from an explicit environment snapshot (testable helper).
    pub fn load_from_snapshot<I, K, V>(snapshot: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let source: config::Map<String, String> = snapshot
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.into().into_string().ok()?;
                let value = value.into().into_string().ok()?;
                Some((key, value))
            })
            .collect();
        Self::load(config::Environment::with_prefix(ENV_PREFIX).source(Some(source)))
    }

    fn load(source: config::Environment) -> Result<Self, LaunchError> {
        config::Config::builder()
            .add_source(source.ignore_empty(true))
            .build()
            .and_then(|document| document.try_deserialize::<LauncherSettings>())
            .map_err(|source| LaunchError::Settings { source })
    }
}
