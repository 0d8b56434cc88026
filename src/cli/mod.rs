//! CLI entrypoint module structure.
use std::ffi::OsString;

use crate::{lib::errors::LaunchError, settings::LauncherSettings};

pub mod args;
pub mod profile;

pub use args::{ArgCursor, LaunchArgs};
pub use profile::{resolve_dotenv_path, EnvMode, LaunchConfig};

/// Parse the tokens after the launcher's own name into a `LaunchConfig`.
pub fn parse_launch_config<I, T>(
    args: I,
    settings: &LauncherSettings,
) -> Result<LaunchConfig, LaunchError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = LaunchArgs::parse(args)?;
    Ok(LaunchConfig::from_args(args, settings))
}
