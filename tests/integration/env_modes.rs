use anyhow::Result;
use tempfile::tempdir;

use crate::common::{fixture, launcher, run, stderr_of, stdout_of, write_env};

#[test]
fn load_mode_child_observes_file_variables() -> Result<()> {
    let cwd = tempdir()?;
    let output = run(launcher(cwd.path()).args([
        "--file",
        &fixture("basic.env"),
        "--",
        "printenv",
        "FOO",
    ]))?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "bar\n");
    Ok(())
}

#[test]
fn replace_mode_child_observes_file_and_inherited_variables() -> Result<()> {
    let cwd = tempdir()?;
    let output = run(launcher(cwd.path())
        .env("INHERITED_MARKER", "kept")
        .args([
            "--file",
            &fixture("basic.env"),
            "--replace",
            "--",
            "sh",
            "-c",
            r#"printf '%s|%s|%s' "$FOO" "$GREETING" "$INHERITED_MARKER""#,
        ]))?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "bar|hello world|kept");
    Ok(())
}

#[test]
fn inherited_values_win_unless_override_is_requested() -> Result<()> {
    let cwd = tempdir()?;
    let args = ["-f", &fixture("basic.env"), "printenv", "FOO"];

    for replace in [false, true] {
        let mut kept = launcher(cwd.path());
        kept.env("FOO", "inherited");
        if replace {
            kept.arg("-r");
        }
        let output = run(kept.args(args))?;
        assert_eq!(stdout_of(&output), "inherited\n", "replace={replace}");

        let mut overridden = launcher(cwd.path());
        overridden
            .env("FOO", "inherited")
            .env("DOTENV_CONFIG_OVERRIDE", "true");
        if replace {
            overridden.arg("-r");
        }
        let output = run(overridden.args(args))?;
        assert_eq!(stdout_of(&output), "bar\n", "replace={replace}");
    }
    Ok(())
}

#[test]
fn default_dotenv_is_read_from_working_directory() -> Result<()> {
    let cwd = tempdir()?;
    write_env(cwd.path(), ".env", "FOO=from-default\n")?;

    let output = run(launcher(cwd.path()).args(["printenv", "FOO"]))?;

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "from-default\n");
    Ok(())
}

#[test]
fn dotenv_config_path_replaces_default_and_empty_value_is_ignored() -> Result<()> {
    let cwd = tempdir()?;
    write_env(cwd.path(), ".env", "FOO=from-default\n")?;
    let custom = write_env(cwd.path(), "custom.env", "FOO=from-config-path\n")?;

    let output = run(launcher(cwd.path())
        .env("DOTENV_CONFIG_PATH", &custom)
        .args(["printenv", "FOO"]))?;
    assert_eq!(stdout_of(&output), "from-config-path\n");

    let output = run(launcher(cwd.path())
        .env("DOTENV_CONFIG_PATH", "")
        .args(["printenv", "FOO"]))?;
    assert_eq!(stdout_of(&output), "from-default\n");
    Ok(())
}

#[test]
fn load_mode_is_idempotent() -> Result<()> {
    let cwd = tempdir()?;
    let run_once = || run(launcher(cwd.path()).args(["-f", &fixture("basic.env"), "env"]));

    let first = run_once()?;
    let second = run_once()?;

    assert!(first.status.success(), "stderr: {}", stderr_of(&first));
    assert_eq!(first.stdout, second.stdout);
    assert!(stdout_of(&first).lines().any(|line| line == "FOO=bar"));
    Ok(())
}

#[test]
fn non_utf8_inherited_variable_does_not_stop_the_launch() -> Result<()> {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let cwd = tempdir()?;
    write_env(cwd.path(), ".env", "FOO=bar\n")?;

    let output = run(launcher(cwd.path())
        .env("UNRELATED_BYTES", OsStr::from_bytes(b"f\xffo"))
        .args(["printenv", "FOO"]))?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output), "bar\n");
    Ok(())
}

#[test]
fn values_with_nul_are_truncated_in_both_modes() -> Result<()> {
    let cwd = tempdir()?;
    write_env(cwd.path(), ".env", "FOO=ab\0cd\n")?;

    for mode in ["--", "--replace"] {
        let output = run(launcher(cwd.path()).args([mode, "printenv", "FOO"]))?;
        assert_eq!(output.status.code(), Some(0), "mode {mode}: {}", stderr_of(&output));
        assert_eq!(stdout_of(&output), "ab\n", "mode {mode}");
    }
    Ok(())
}

#[test]
fn missing_dotenv_is_skipped_when_strict_is_off() -> Result<()> {
    let cwd = tempdir()?;

    for mode in ["--", "--replace"] {
        let output = run(launcher(cwd.path())
            .env("DOTENV_CONFIG_STRICT", "false")
            .env("FOO", "inherited")
            .args([mode, "printenv", "FOO"]))?;
        assert_eq!(output.status.code(), Some(0), "mode {mode}: {}", stderr_of(&output));
        assert_eq!(stdout_of(&output), "inherited\n", "mode {mode}");
    }
    Ok(())
}

#[test]
fn dash_reads_dotenv_from_stdin() -> Result<()> {
    use std::{io::Write, process::Stdio};

    let cwd = tempdir()?;

    for mode in ["--", "--replace"] {
        let mut child = launcher(cwd.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .args(["--file", "-", mode, "printenv", "FOO"])
            .spawn()?;
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(b"FOO=from-stdin\n")?;
        let output = child.wait_with_output()?;

        assert_eq!(output.status.code(), Some(0), "mode {mode}: {}", stderr_of(&output));
        assert_eq!(stdout_of(&output), "from-stdin\n", "mode {mode}");
    }
    Ok(())
}
