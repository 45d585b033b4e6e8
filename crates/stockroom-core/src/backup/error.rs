//! Backup file error handling
//!
//! Provides typed errors for reading and writing backup files with
//! descriptive messages and recovery suggestions.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::DecodeError;

/// Errors that can occur while reading or writing backup files
#[derive(Error, Debug)]
pub enum BackupError {
    /// Failed to create the backup directory
    #[error("Failed to create backup directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A backup with the same name already exists
    #[error("Backup '{path}' already exists. Backups are named per second; wait a moment and try again.")]
    AlreadyExists { path: PathBuf },

    /// Permission denied accessing path
    #[error("Permission denied: cannot access '{path}'. Check file permissions.")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Disk is full or quota exceeded
    #[error(
        "Disk full or quota exceeded while writing to '{path}'. Free up disk space and try again."
    )]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to read file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write file
    #[error("Failed to write '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File contents could not be decoded
    #[error("Invalid backup '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// File not found (when expected to exist)
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Atomic write failed during rename
    #[error("Atomic write failed: could not rename '{from}' to '{to}': {source}")]
    AtomicWriteFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BackupError {
    /// Create an error from an I/O error with path context
    ///
    /// Classifies the error based on its kind (permission, disk full, etc.)
    pub fn from_io(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => BackupError::PermissionDenied {
                path,
                source: error,
            },
            io::ErrorKind::NotFound => BackupError::NotFound { path },
            io::ErrorKind::AlreadyExists => BackupError::AlreadyExists { path },
            _ if is_disk_full_error(&error) => BackupError::DiskFull {
                path,
                source: error,
            },
            _ => BackupError::WriteError {
                path,
                source: error,
            },
        }
    }

    /// Same as [`from_io`](Self::from_io) but unclassified errors are read errors
    pub fn from_read(error: io::Error, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound => {
                Self::from_io(error, path)
            }
            _ => BackupError::ReadError {
                path,
                source: error,
            },
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BackupError::DiskFull { .. }
                | BackupError::PermissionDenied { .. }
                | BackupError::AlreadyExists { .. }
        )
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            BackupError::DiskFull { .. } => Some("Free up disk space and try again."),
            BackupError::PermissionDenied { .. } => {
                Some("Check file and directory permissions. You may need to run with different permissions or change ownership.")
            }
            BackupError::AlreadyExists { .. } => {
                Some("Wait a second and create the backup again.")
            }
            BackupError::CreateDirectory { .. } => {
                Some("Check that the parent directory exists and you have write permissions.")
            }
            BackupError::Decode { .. } => {
                Some("The file was not changed. Fix or remove the reported line and try again.")
            }
            _ => None,
        }
    }
}

/// Check if an I/O error indicates disk full condition
fn is_disk_full_error(error: &io::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("no space left")
        || msg.contains("disk full")
        || msg.contains("quota exceeded")
        || msg.contains("not enough space")
}

/// Result type for backup file operations
pub type BackupResult<T> = Result<T, BackupError>;
