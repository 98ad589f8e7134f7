//! Error types for the shortcut core.

use std::fmt;
use std::path::PathBuf;

use super::Shortcut;

/// A required shortcut field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Path,
    Command,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Name => "name",
            Self::Path => "path",
            Self::Command => "command",
        };
        f.write_str(label)
    }
}

/// Field-level validation failure, raised before any mutation happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("invalid port '{0}': expected a number between 1 and 65535")]
    InvalidPort(String),
}

/// Persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize shortcuts: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Failures turning an image file into an embedded icon.
#[derive(Debug, thiserror::Error)]
pub enum IconError {
    #[error("failed to read icon {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not an image file", path.display())]
    NotImage { path: PathBuf },
}

/// Repository operation failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("shortcut not found: {0}")]
    NotFound(String),

    /// The change was applied in memory but could not be written out.
    ///
    /// `shortcut` is the record as created or updated, or the one removed.
    /// Callers must treat the operation as done for this session.
    #[error("failed to save shortcuts: {source}")]
    Storage {
        shortcut: Box<Shortcut>,
        #[source]
        source: StoreError,
    },
}

impl RepositoryError {
    /// Whether this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The record a failed save left applied in memory, if any.
    pub fn applied(&self) -> Option<&Shortcut> {
        match self {
            Self::Storage { shortcut, .. } => Some(shortcut),
            _ => None,
        }
    }
}
