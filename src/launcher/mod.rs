//! Environment application, program resolution, and child supervision.
pub mod environment;
pub mod exit;
pub mod supervisor;

use tracing::Instrument;

pub use environment::{prepare_environment, ChildEnvironment};
pub use exit::{exit_status_for, LaunchExit};
pub use supervisor::{relay, supervise, ChildExit, LaunchPlan};

use crate::{
    cli::LaunchConfig,
    lib::{envfile::DotenvResolver, errors::LaunchError, paths, telemetry::LaunchSpan},
};

/// Run one launch to completion and report how the child ended.
///
/// Environment work and executable lookup happen synchronously on the calling
/// thread. The async runtime that supervises the child is only built afterwards,
/// so a load-mode mutation of the process environment never races another thread.
pub fn launch<R>(config: &LaunchConfig, resolver: &R) -> Result<ChildExit, LaunchError>
where
    R: DotenvResolver + ?Sized,
{
    let span = LaunchSpan::start(config.mode.as_str(), config.streams.as_str());
    let result = span
        .span()
        .in_scope(|| plan_launch(config, resolver))
        .and_then(|plan| run_plan(&plan, &span));

    match &result {
        Ok(ChildExit::Code(code)) => span.finish("exited", Some(*code)),
        Ok(ChildExit::Terminated { .. }) => span.finish("terminated", None),
        Err(_) => span.finish("failed", None),
    }
    result
}

/// Apply the environment and resolve the executable, in that order.
pub fn plan_launch<R>(config: &LaunchConfig, resolver: &R) -> Result<LaunchPlan, LaunchError>
where
    R: DotenvResolver + ?Sized,
{
    let environment = prepare_environment(config, resolver)?;
    let program = paths::resolve_executable(&config.program)?;

    Ok(LaunchPlan {
        program,
        display_name: config.program.clone(),
        args: config.program_args.clone(),
        environment,
        streams: config.streams,
    })
}

fn run_plan(plan: &LaunchPlan, span: &LaunchSpan) -> Result<ChildExit, LaunchError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| LaunchError::Runtime { source })?;
    runtime.block_on(supervise(plan).instrument(span.span().clone()))
}
