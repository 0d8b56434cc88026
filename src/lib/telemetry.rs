//! Telemetry initialization and the per-launch span.

use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Default filter; the launcher shares stderr with its child, so it stays quiet.
const DEFAULT_FILTER: &str = "warn";
const DEBUG_FILTER: &str = "debug";

/// Initialize `tracing` and format developer logs on stderr.
///
/// `RUST_LOG` wins when set; otherwise `debug` selects between the quiet and verbose default.
pub fn init_tracing(debug: bool) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let fallback = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper recording the start and finish of one launch.
pub struct LaunchSpan {
    span: Span,
    started_at: Instant,
    launch_id: Uuid,
}

impl LaunchSpan {
    /// Start a launch span.
    pub fn start(mode: &'static str, streams: &'static str) -> Self {
        let launch_id = Uuid::new_v4();
        let span = info_span!(
            target: "dotenv_launcher::process",
            "launch",
            %launch_id,
            mode,
            streams
        );
        Self {
            span,
            started_at: Instant::now(),
            launch_id,
        }
    }

    /// Span to attach to work done on behalf of this launch.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Close the span while recording status and completion info.
    pub fn finish(self, status: &'static str, exit_code: Option<i32>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "dotenv_launcher::process",
            launch_id = %self.launch_id,
            status = status,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Launch finished"
        );
    }
}
