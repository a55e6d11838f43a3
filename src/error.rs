//! Error types for asset ingestion.
//!
//! Token decoding reports a [`TokenError`] and leaves the decision to the caller.
//! The mesh loader turns every token error into a [`LoadError::Parse`] that fails
//! the whole asset, so a half-parsed mesh never reaches the renderer.

use std::{fmt, io, path::PathBuf};

/// A single token could not be decoded into the number it stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenError {
    /// A face index component that is not an integer, e.g. `f 1/x/3`.
    InvalidIndex(String),
    /// A coordinate that is not a float, e.g. `v 1.0 abc 2.0`.
    InvalidNumber(String),
    /// A directive ended before all of its required components were read.
    MissingComponent { directive: &'static str, expected: usize, found: usize },
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::InvalidIndex(token) => write!(f, "invalid vertex index '{}'", token),
            TokenError::InvalidNumber(token) => write!(f, "invalid number '{}'", token),
            TokenError::MissingComponent {
                directive,
                expected,
                found,
            } => write!(
                f,
                "'{}' expects {} components but only {} were given",
                directive, expected, found
            ),
        }
    }
}

impl std::error::Error for TokenError {}

/// Reasons a mesh could not be loaded. Both are fatal to that asset only.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    Io { path: PathBuf, source: io::Error },
    /// A token on `line` (1-based) could not be decoded.
    Parse {
        path: PathBuf,
        line: usize,
        source: TokenError,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            LoadError::Parse { path, line, source } => {
                write!(f, "{}:{}: {}", path.display(), line, source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}

/// Result type for asset loading.
pub type Result<T> = std::result::Result<T, LoadError>;
