use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Kind of entity a name was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Dataset,
    File,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Dataset => f.write_str("dataset"),
            EntityKind::File => f.write_str("file"),
        }
    }
}

/// Errors returned by the Clowder client.
#[derive(Error, Debug)]
pub enum ClowderError {
    /// The request could not be completed (connection, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-2xx status.
    #[error("{url} returned HTTP {status}: {body}")]
    Http { status: u16, url: String, body: String },

    /// A name matched no entity in its scope.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: EntityKind, name: String },

    /// A name matched more than one entity in its scope.
    #[error("{kind} '{name}' found {count} times")]
    AmbiguousName {
        kind: EntityKind,
        name: String,
        count: usize,
    },

    /// Upload source does not exist on disk or is not a regular file.
    #[error("local path does not exist or is not a file: {}", path.display())]
    LocalPath { path: PathBuf },

    /// Response JSON did not match the expected shape.
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid metadata entry '{0}', expected key=value")]
    InvalidMetadata(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClowderError {
    /// HTTP status code, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClowderError::Http { status, .. } => Some(*status),
            ClowderError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True for name resolution failures (as opposed to transport failures).
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            ClowderError::NotFound { .. } | ClowderError::AmbiguousName { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ClowderError>;
