//! Load-mode and replace-mode application of the dotenv file.
use tracing::info;

use crate::{
    cli::{EnvMode, LaunchConfig},
    lib::{
        envfile::{capture_process_environment, DotenvResolver, EnvMap},
        errors::LaunchError,
    },
};

/// Environment the child will be started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildEnvironment {
    /// The child inherits the launcher's (possibly mutated) environment.
    Inherited,
    /// The child sees exactly this mapping and nothing else.
    Exclusive(EnvMap),
}

/// Apply the dotenv file according to `config.mode`.
///
/// In load mode this mutates the process environment. Call it before any
/// runtime or background task exists; the change is visible to everything that
/// runs in this process afterwards.
pub fn prepare_environment<R>(
    config: &LaunchConfig,
    resolver: &R,
) -> Result<ChildEnvironment, LaunchError>
where
    R: DotenvResolver + ?Sized,
{
    match config.mode {
        EnvMode::Load => {
            resolver.load_into_current_process(&config.dotenv_path)?;
            info!(
                target: "dotenv_launcher::env",
                path = %config.dotenv_path.display(),
                "Applied dotenv file to launcher environment"
            );
            Ok(ChildEnvironment::Inherited)
        }
        EnvMode::Replace => {
            let inherited = capture_process_environment();
            let resolved = resolver.resolve_environment(&config.dotenv_path, &inherited)?;
            info!(
                target: "dotenv_launcher::env",
                path = %config.dotenv_path.display(),
                inherited = inherited.len(),
                resolved = resolved.len(),
                "Resolved replacement environment for child"
            );
            Ok(ChildEnvironment::Exclusive(resolved))
        }
    }
}
