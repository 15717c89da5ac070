use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Contacts file {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An import source or export destination that cannot be read or written.
    /// Unlike `FileAccess` the store itself is unaffected.
    #[error("Cannot access {}: {source}", .path.display())]
    Transfer {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot import {}: {reason}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("{0} Not found")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} contacts match, use a position from the contact list instead")]
    Ambiguous(usize),

    #[error("Unrecognized command: '{0}'")]
    ParseCommand(String),

    #[error("I/O error while reading input: {0}")]
    Prompt(#[from] io::Error),
}

impl AppError {
    pub fn file_access(path: &Path, source: io::Error) -> Self {
        AppError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn transfer(path: &Path, source: io::Error) -> Self {
        AppError::Transfer {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn invalid_format(path: &Path, reason: impl Into<String>) -> Self {
        AppError::InvalidFormat {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Errors that leave the store unusable for the rest of the session.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::FileAccess { .. } | AppError::Parse { .. })
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_fatal() { 2 } else { 1 }
    }
}
