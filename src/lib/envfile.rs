//! Dotenv file resolution on top of the `dotenv` crate.
//!
//! Both operations parse the whole file before touching anything, so a syntax
//! error halfway through never leaves a partially applied environment behind.

use std::{
    collections::BTreeMap,
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::lib::errors::LaunchError;

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Environment mapping handed to a child process.
pub type EnvMap = BTreeMap<OsString, OsString>;

/// Source of dotenv variables used by the launcher.
pub trait DotenvResolver {
    /// Parse `path` and apply its variables to the current process environment.
    fn load_into_current_process(&self, path: &Path) -> Result<(), LaunchError>;

    /// Parse `path` and return `base` combined with its variables. `base` is not modified.
    fn resolve_environment(&self, path: &Path, base: &EnvMap) -> Result<EnvMap, LaunchError>;
}

/// Resolver reading dotenv files from disk, or from stdin for [`STDIN_PATH`].
///
/// Without `override_existing`, variables that are already set keep their value
/// and the first occurrence of a duplicated key wins. With it, the file always
/// wins and the last occurrence of a key is the one that sticks.
///
/// Keys and values are cut at the first NUL byte. A file that cannot be opened
/// is an error only when `strict` is set; parse errors always are.
#[derive(Debug, Clone, Copy)]
pub struct DotenvFile {
    pub override_existing: bool,
    pub strict: bool,
}

impl Default for DotenvFile {
    fn default() -> Self {
        Self::new(false)
    }
}

impl DotenvFile {
    pub fn new(override_existing: bool) -> Self {
        Self {
            override_existing,
            strict: true,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn read_pairs(&self, path: &Path) -> Result<Vec<(String, String)>, LaunchError> {
        if path.as_os_str() == STDIN_PATH {
            return match dotenv::from_path_iter("/dev/stdin") {
                Ok(iter) => collect_pairs(path, iter),
                Err(err) => Err(LaunchError::from_dotenv_error(PathBuf::from(path), err)),
            };
        }

        match dotenv::from_path_iter(path) {
            Ok(iter) => collect_pairs(path, iter),
            Err(dotenv::Error::Io(err)) if !self.strict => {
                debug!(
                    target: "dotenv_launcher::env",
                    path = %path.display(),
                    error = %err,
                    "Dotenv file not readable, continuing without it"
                );
                Ok(Vec::new())
            }
            Err(err) => Err(LaunchError::from_dotenv_error(PathBuf::from(path), err)),
        }
    }
}

fn collect_pairs<I>(path: &Path, iter: I) -> Result<Vec<(String, String)>, LaunchError>
where
    I: Iterator<Item = dotenv::Result<(String, String)>>,
{
    let pairs = iter
        .map(|pair| pair.map(|(key, value)| (cut_null(key), cut_null(value))))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| LaunchError::from_dotenv_error(PathBuf::from(path), err))?;
    let pairs: Vec<_> = pairs.into_iter().filter(|(key, _)| !key.is_empty()).collect();

    debug!(
        target: "dotenv_launcher::env",
        path = %path.display(),
        variables = pairs.len(),
        "Parsed dotenv file"
    );
    Ok(pairs)
}

/// Truncate at the first NUL; the OS environment cannot carry one.
fn cut_null(mut text: String) -> String {
    if let Some(end) = text.find('\0') {
        text.truncate(end);
    }
    text
}

impl DotenvResolver for DotenvFile {
    fn load_into_current_process(&self, path: &Path) -> Result<(), LaunchError> {
        let pairs = self.read_pairs(path)?;
        for (key, value) in pairs {
            if self.override_existing || env::var_os(&key).is_none() {
                env::set_var(key, value);
            }
        }
        Ok(())
    }

    fn resolve_environment(&self, path: &Path, base: &EnvMap) -> Result<EnvMap, LaunchError> {
        let pairs = self.read_pairs(path)?;
        let mut resolved = base.clone();
        for (key, value) in pairs {
            let key = OsString::from(key);
            if self.override_existing || !resolved.contains_key(&key) {
                resolved.insert(key, OsString::from(value));
            }
        }
        Ok(resolved)
    }
}

/// Snapshot of the current process environment.
pub fn capture_process_environment() -> EnvMap {
    env::vars_os().collect()
}
