//! Executable lookup against the search path, the way a shell resolves a command name.

use std::{
    env,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::lib::errors::LaunchError;

/// Environment variable holding the executable search path.
const PATH_ENV: &str = "PATH";
#[cfg(windows)]
const PATHEXT_ENV: &str = "PATHEXT";
#[cfg(windows)]
const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";

/// Resolve `program` against the launcher's own `PATH`.
pub fn resolve_executable(program: &OsStr) -> Result<PathBuf, LaunchError> {
    resolve_executable_from(program, env::var_os(PATH_ENV))
}

/// Resolve `program` against an explicit search path value (testable helper).
///
/// Names containing a path separator skip the search and must point at an
/// executable file directly. An empty search path entry means the current directory.
pub fn resolve_executable_from(
    program: &OsStr,
    search_path: Option<OsString>,
) -> Result<PathBuf, LaunchError> {
    let not_found = || LaunchError::ExecutableNotFound {
        program: program.to_string_lossy().into_owned(),
    };

    if program.is_empty() {
        return Err(not_found());
    }

    let candidate = Path::new(program);
    if has_separator(program) {
        return executable_candidates(candidate)
            .into_iter()
            .find(|path| is_executable(path))
            .ok_or_else(not_found);
    }

    let search_path = search_path.unwrap_or_default();
    for dir in env::split_paths(&search_path) {
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir
        };
        if let Some(found) = executable_candidates(&dir.join(program))
            .into_iter()
            .find(|path| is_executable(path))
        {
            debug!(
                target: "dotenv_launcher::process",
                program = %program.to_string_lossy(),
                resolved = %found.display(),
                "Resolved executable from search path"
            );
            return Ok(found);
        }
    }

    Err(not_found())
}

/// Any separator byte counts, including a trailing one (`tool/`).
fn has_separator(program: &OsStr) -> bool {
    program
        .as_encoded_bytes()
        .iter()
        .any(|byte| *byte == b'/' || (cfg!(windows) && *byte == b'\\'))
        || Path::new(program).is_absolute()
}

#[cfg(not(windows))]
fn executable_candidates(path: &Path) -> Vec<PathBuf> {
    vec![path.to_path_buf()]
}

#[cfg(windows)]
fn executable_candidates(path: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![path.to_path_buf()];
    if path.extension().is_some() {
        return candidates;
    }
    let extensions = env::var(PATHEXT_ENV).unwrap_or_else(|_| DEFAULT_PATHEXT.to_string());
    for ext in extensions.split(';').filter(|ext| !ext.is_empty()) {
        let mut name = path.as_os_str().to_os_string();
        name.push(ext);
        candidates.push(PathBuf::from(name));
    }
    candidates
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}
