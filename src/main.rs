//! Entry point for the dotenv launcher.
//!
//! Load mode mutates the process environment, which must finish before the
//! supervising runtime exists.
use std::{env, process::ExitCode};

use dotenv_launcher::{
    cli,
    launcher::{self, LaunchExit},
    lib::{envfile::DotenvFile, telemetry},
    settings::{self, LauncherSettings},
};

fn main() -> ExitCode {
    match bootstrap() {
        Ok(status) => ExitCode::from(status),
        Err(exit) => exit.report(),
    }
}

fn bootstrap() -> Result<u8, LaunchExit> {
    let settings = LauncherSettings::load_from_env()?;
    telemetry::init_tracing(settings.debug).map_err(LaunchExit::from_error)?;
    settings::telemetry::log_loaded(&settings);

    let config = cli::parse_launch_config(env::args_os().skip(1), &settings)?;
    let resolver = DotenvFile::new(settings.override_existing).with_strict(settings.strict);
    let exit = launcher::launch(&config, &resolver)?;

    Ok(launcher::exit_status_for(exit, &config.program)?)
}
