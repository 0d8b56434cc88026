use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use anyhow::{Context, Result};

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_dotenv-launcher");

/// Variables the launcher reads itself; cleared so the host environment cannot leak in.
const LAUNCHER_ENV: [&str; 6] = [
    "DOTENV_CONFIG_PATH",
    "DOTENV_CONFIG_OVERRIDE",
    "DOTENV_CONFIG_STRICT",
    "DOTENV_CONFIG_DEBUG",
    "DOTENV_CONFIG_STREAMS",
    "RUST_LOG",
];

pub fn fixture(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.join("tests/fixtures")
        .join(relative)
        .display()
        .to_string()
}

/// Launcher command running in `cwd` with a clean launcher configuration.
pub fn launcher(cwd: &Path) -> Command {
    let mut command = Command::new(BINARY_PATH);
    command
        .current_dir(cwd)
        .stdin(Stdio::null())
        .env_remove("FOO")
        .env_remove("GREETING");
    for key in LAUNCHER_ENV {
        command.env_remove(key);
    }
    command
}

pub fn run(command: &mut Command) -> Result<Output> {
    command.output().context("failed to run launcher")
}

pub fn write_env(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
