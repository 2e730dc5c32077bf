//! # Error Handling
//!
//! This module defines the centralized error type for `devroute`. It uses the
//! `thiserror` library to build a single `Error` enum covering every failure
//! the library can report, with messages meant to be shown to users as-is.
//!
//! ## Key Components
//!
//! - **`Error`**: All failure modes. The three configuration errors
//!   (`MalformedExpression`, `UnknownDirectory`, `UnknownReference`) carry the
//!   offending text and, once surfaced by the configuration parser, the
//!   1-based line number where the expression started.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Errors created through the direct configuration API have no line number.
//! The parser attaches one with [`Error::at_line`] before returning them.
//!
//! Resolution never fails with an error: a package that cannot be found is a
//! normal "decline" outcome, see [`crate::resolver::Resolution`].

use std::path::PathBuf;
use thiserror::Error;

fn on_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" on line {}", l)).unwrap_or_default()
}

/// Main error type for devroute operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required token is missing from an expression.
    ///
    /// `kind` names the expression kind ("directory", "group", "location",
    /// "enable/disable", ...).
    #[error("Malformed {kind} expression \"{expression}\"{}", on_line(line))]
    MalformedExpression {
        kind: &'static str,
        expression: String,
        line: Option<usize>,
    },

    /// A location expression or relative path names a directory that was
    /// never declared.
    #[error("Unknown named directory \"{name}\"{}{}", on_line(line), hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    UnknownDirectory {
        name: String,
        line: Option<usize>,
        /// Optional "did you mean" hint
        hint: Option<String>,
    },

    /// A member reference that does not resolve to any known package or
    /// group. Only raised by strict validation.
    #[error("Unknown package or group name \"{name}\"{}", on_line(line))]
    UnknownReference { name: String, line: Option<usize> },

    /// Declaring a directory relative to one of its own dependents.
    #[error("Directory \"{name}\" would be defined relative to itself{}", on_line(line))]
    DirectoryCycle { name: String, line: Option<usize> },

    /// A path could not be expanded (for example `~` with no home directory).
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// A configuration file that was required to exist is missing.
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The host loader failed to load a resolved source file.
    #[error("Failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Attach a configuration line number to an error that does not have one
    /// yet. Errors that already carry a line, or that have no line field, are
    /// returned unchanged.
    pub fn at_line(self, number: usize) -> Self {
        match self {
            Error::MalformedExpression {
                kind,
                expression,
                line: None,
            } => Error::MalformedExpression {
                kind,
                expression,
                line: Some(number),
            },
            Error::UnknownDirectory {
                name,
                line: None,
                hint,
            } => Error::UnknownDirectory {
                name,
                line: Some(number),
                hint,
            },
            Error::UnknownReference { name, line: None } => Error::UnknownReference {
                name,
                line: Some(number),
            },
            Error::DirectoryCycle { name, line: None } => Error::DirectoryCycle {
                name,
                line: Some(number),
            },
            other => other,
        }
    }

    /// The configuration line this error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::MalformedExpression { line, .. }
            | Error::UnknownDirectory { line, .. }
            | Error::UnknownReference { line, .. }
            | Error::DirectoryCycle { line, .. } => *line,
            _ => None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
