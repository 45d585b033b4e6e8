//! Backup directory access
//!
//! Handles saving and loading backup files in the backup directory.
//! Uses atomic writes (write to temp file, then rename) so a failed write
//! never leaves a partial backup behind under the final name.
//!
//! Storage location: `<data_dir>/backups/` (configurable via `Config`)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use super::error::{BackupError, BackupResult};
use super::{timestamp_from_file_name, Backup, BACKUP_EXTENSION};
use crate::config::Config;

/// A directory of backup files
#[derive(Debug, Clone)]
pub struct BackupArchive {
    dir: PathBuf,
}

impl BackupArchive {
    /// Open an archive rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the archive configured in `config`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.backup_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a backup file in this archive
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write a backup under its timestamp name
    ///
    /// Fails with [`BackupError::AlreadyExists`] rather than replacing an
    /// existing file. Returns the path written.
    pub fn write(&self, backup: &Backup) -> BackupResult<PathBuf> {
        let path = self.path_for(&backup.file_name());

        if path.exists() {
            return Err(BackupError::AlreadyExists { path });
        }

        atomic_write(&path, backup.to_text().as_bytes())?;
        info!(path = %path.display(), records = backup.len(), "Backup written");
        Ok(path)
    }

    /// Read and decode a backup file by name
    ///
    /// The creation time comes from the file name when it follows the
    /// naming scheme, otherwise the time of reading is used.
    pub fn read(&self, file_name: &str) -> BackupResult<Backup> {
        let path = self.path_for(file_name);
        let created_at = timestamp_from_file_name(file_name).unwrap_or_else(Local::now);
        let backup = read_backup_file(&path, created_at)?;
        info!(path = %path.display(), records = backup.len(), "Backup read");
        Ok(backup)
    }

    /// Names of the backup files in the archive, oldest first
    ///
    /// A missing directory is an empty archive.
    pub fn list(&self) -> BackupResult<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BackupError::from_read(e, self.dir.clone())),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| BackupError::from_read(e, self.dir.clone()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }

        // Timestamp names sort chronologically
        names.sort();
        debug!(count = names.len(), dir = %self.dir.display(), "Listed backups");
        Ok(names)
    }

    /// Name of the most recent backup, if any
    pub fn latest(&self) -> BackupResult<Option<String>> {
        Ok(self.list()?.pop())
    }
}

/// Read and decode a backup file at an arbitrary path
pub fn read_backup_file(path: &Path, created_at: chrono::DateTime<Local>) -> BackupResult<Backup> {
    let text =
        fs::read_to_string(path).map_err(|e| BackupError::from_read(e, path.to_path_buf()))?;

    Backup::parse(&text, created_at).map_err(|source| BackupError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> BackupResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| BackupError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    // Create temp file in the same directory (for atomic rename)
    let temp_path = path.with_extension("tmp");

    let result = write_and_sync(&temp_path, data);
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(BackupError::from_io(e, temp_path));
    }

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        BackupError::AtomicWriteFailed {
            from: temp_path.clone(),
            to: path.to_path_buf(),
            source,
        }
    })
}

fn write_and_sync(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
