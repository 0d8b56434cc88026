//! Argument cursor and left-to-right flag parsing.
//!
//! The grammar is deliberately narrow: `--file|-f <path>`, `--replace|-r` and
//! `--`, nothing else. Parsing stops at the first token that is not a flag;
//! that token is the program and everything after it belongs to the program.
use std::{ffi::OsString, path::PathBuf};

use crate::lib::errors::ArgumentError;

/// Ordered command-line tokens consumed left to right.
#[derive(Debug)]
pub struct ArgCursor {
    tokens: std::vec::IntoIter<OsString>,
}

impl ArgCursor {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let tokens: Vec<OsString> = tokens.into_iter().map(Into::into).collect();
        Self {
            tokens: tokens.into_iter(),
        }
    }

    /// Take the next token.
    pub fn advance(&mut self) -> Option<OsString> {
        self.tokens.next()
    }

    /// Take the value belonging to `flag`.
    pub fn value_for(&mut self, flag: &OsString) -> Result<OsString, ArgumentError> {
        self.advance()
            .ok_or_else(|| ArgumentError::MissingFlagValue {
                flag: flag.to_string_lossy().into_owned(),
            })
    }

    /// Everything not consumed yet.
    pub fn remaining(self) -> Vec<OsString> {
        self.tokens.collect()
    }
}

/// Flags and program as they appeared on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchArgs {
    /// Value of the last `--file`/`-f`, if any.
    pub file: Option<PathBuf>,
    /// `--replace`/`-r` was given.
    pub replace: bool,
    pub program: OsString,
    pub program_args: Vec<OsString>,
}

impl LaunchArgs {
    /// Parse the arguments that follow the launcher's own name.
    pub fn parse<I, T>(args: I) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut cursor = ArgCursor::new(args);
        let mut file = None;
        let mut replace = false;

        let program = loop {
            let Some(token) = cursor.advance() else {
                return Err(ArgumentError::MissingProgram);
            };

            if token == "--file" || token == "-f" {
                file = Some(PathBuf::from(cursor.value_for(&token)?));
            } else if token == "--replace" || token == "-r" {
                replace = true;
            } else if token == "--" {
                break cursor.advance().ok_or(ArgumentError::MissingProgram)?;
            } else if is_flag_like(&token) {
                return Err(ArgumentError::IllegalArgument {
                    token: token.to_string_lossy().into_owned(),
                });
            } else {
                break token;
            }
        };

        Ok(Self {
            file,
            replace,
            program,
            program_args: cursor.remaining(),
        })
    }
}

fn is_flag_like(token: &OsString) -> bool {
    token.as_encoded_bytes().first() == Some(&b'-')
}
