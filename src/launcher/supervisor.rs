//! Spawn the target program and wait for it, inheriting or relaying its output.
use std::{
    ffi::OsString,
    io,
    path::PathBuf,
    process::{ExitStatus, Stdio},
};

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    process::{Child, Command},
    task::JoinError,
};
use tracing::{debug, info};

use super::environment::ChildEnvironment;
use crate::{lib::errors::LaunchError, settings::StreamMode};

const RELAY_BUFFER_SIZE: usize = 8 * 1024;

/// Everything needed to start the child, fully resolved.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    /// Resolved executable path.
    pub program: PathBuf,
    /// Name as given on the command line; used as `argv[0]` and in messages.
    pub display_name: OsString,
    pub args: Vec<OsString>,
    pub environment: ChildEnvironment,
    pub streams: StreamMode,
}

impl LaunchPlan {
    fn name(&self) -> String {
        self.display_name.to_string_lossy().into_owned()
    }
}

/// How the child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// Regular exit with a status code (zero or not).
    Code(i32),
    /// No exit code; `signal` is set when the child was killed by one.
    Terminated { signal: Option<i32> },
}

impl From<ExitStatus> for ChildExit {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ChildExit::Code(code),
            None => ChildExit::Terminated {
                signal: terminating_signal(&status),
            },
        }
    }
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Build the command for `plan` without configuring stdio.
pub fn build_command(plan: &LaunchPlan) -> Command {
    let mut command = Command::new(&plan.program);
    #[cfg(unix)]
    command.arg0(&plan.display_name);
    command.args(&plan.args);
    command.kill_on_drop(true);
    if let ChildEnvironment::Exclusive(environment) = &plan.environment {
        command.env_clear();
        command.envs(environment);
    }
    command
}

/// Start the child and block until it ends and, in pipe mode, until both relays drain.
pub async fn supervise(plan: &LaunchPlan) -> Result<ChildExit, LaunchError> {
    let mut command = build_command(plan);
    let program = plan.name();
    info!(
        target: "dotenv_launcher::process",
        program = %program,
        resolved = %plan.program.display(),
        args = plan.args.len(),
        streams = plan.streams.as_str(),
        "Starting child process"
    );

    match plan.streams {
        StreamMode::Inherit => {
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
            let mut child = spawn(&mut command, &program)?;
            let status = child
                .wait()
                .await
                .map_err(|source| LaunchError::Wait {
                    program: program.clone(),
                    source,
                })?;
            Ok(ChildExit::from(status))
        }
        StreamMode::Pipe => supervise_piped(command, &program).await,
    }
}

async fn supervise_piped(mut command: Command, program: &str) -> Result<ChildExit, LaunchError> {
    command
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = spawn(&mut command, program)?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| pipe_missing(program, "stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| pipe_missing(program, "stderr"))?;
    let stdout_relay = tokio::spawn(relay(stdout, tokio::io::stdout()));
    let stderr_relay = tokio::spawn(relay(stderr, tokio::io::stderr()));

    let (status, stdout_result, stderr_result) =
        tokio::join!(child.wait(), stdout_relay, stderr_relay);

    let status = status.map_err(|source| LaunchError::Wait {
        program: program.to_string(),
        source,
    })?;
    let stdout_bytes = relay_outcome(stdout_result, program, "stdout")?;
    let stderr_bytes = relay_outcome(stderr_result, program, "stderr")?;
    debug!(
        target: "dotenv_launcher::process",
        program = %program,
        stdout_bytes,
        stderr_bytes,
        "Child output relayed"
    );

    Ok(ChildExit::from(status))
}

fn spawn(command: &mut Command, program: &str) -> Result<Child, LaunchError> {
    command.spawn().map_err(|source| LaunchError::Spawn {
        program: program.to_string(),
        source,
    })
}

/// Copy `reader` into `writer` until end of stream, flushing after every chunk.
pub async fn relay<R, W>(mut reader: R, mut writer: W) -> io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; RELAY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let read = reader.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        writer.write_all(&buffer[..read]).await?;
        writer.flush().await?;
        total += read as u64;
    }
    Ok(total)
}

fn relay_outcome(
    result: Result<io::Result<u64>, JoinError>,
    program: &str,
    stream: &'static str,
) -> Result<u64, LaunchError> {
    let source = match result {
        Ok(Ok(bytes)) => return Ok(bytes),
        Ok(Err(source)) => source,
        Err(join_error) => io::Error::other(join_error),
    };
    Err(LaunchError::Forward {
        program: program.to_string(),
        stream,
        source,
    })
}

fn pipe_missing(program: &str, stream: &'static str) -> LaunchError {
    LaunchError::Forward {
        program: program.to_string(),
        stream,
        source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe was not captured"),
    }
}
