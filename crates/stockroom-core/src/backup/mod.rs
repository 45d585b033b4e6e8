//! Inventory backups
//!
//! A [`Backup`] is an immutable, timestamped deep copy of a record set.
//! It is written to a flat text file, one record per line:
//!
//! ```text
//! id,name,description,categoryOrdinal,stock,price[,calories][,volume][,weight][,material]
//! ```
//!
//! Files are named after the creation time with second precision
//! (`2024-03-05 14-07-09.backup`), so two backups taken within the same
//! second share a name; the archive refuses to overwrite in that case.
//!
//! ## Modules
//!
//! - `codec`: line format encoding and atomic decoding
//! - `persistence`: backup directory access with atomic writes
//! - `error`: file-level errors

pub mod codec;
pub mod error;
pub mod persistence;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use tracing::info;

use crate::error::DecodeError;
use crate::identifier::IdGenerator;
use crate::models::Record;
use crate::store::RecordStore;

pub use codec::{decode_records, encode_record, encode_records};
pub use error::{BackupError, BackupResult};
pub use persistence::BackupArchive;

/// Extension of backup files
pub const BACKUP_EXTENSION: &str = "backup";

/// `chrono` format of the timestamp part of a backup file name
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// A point-in-time copy of an inventory
#[derive(Debug, Clone, PartialEq)]
pub struct Backup {
    created_at: DateTime<Local>,
    records: Vec<Record>,
}

impl Backup {
    /// Build a backup of `records` stamped with the current time
    pub fn new(records: Vec<Record>) -> Self {
        Self::with_timestamp(Local::now(), records)
    }

    /// Build a backup with an explicit creation time
    pub fn with_timestamp(created_at: DateTime<Local>, records: Vec<Record>) -> Self {
        Self {
            created_at,
            records,
        }
    }

    /// Capture a deep copy of the store, in id order
    pub fn capture(store: &RecordStore) -> Self {
        Self::new(store.snapshot())
    }

    /// Parse backup file contents
    ///
    /// Fails as a unit: any bad line yields an error and no records.
    pub fn parse(text: &str, created_at: DateTime<Local>) -> Result<Self, DecodeError> {
        let records = decode_records(text)?;
        Ok(Self::with_timestamp(created_at, records))
    }

    /// Render the backup file contents
    pub fn to_text(&self) -> String {
        encode_records(&self.records)
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest record id in the backup, 0 when empty
    pub fn highest_id(&self) -> u64 {
        self.records.iter().map(Record::id).max().unwrap_or(0)
    }

    /// File name derived from the creation time
    pub fn file_name(&self) -> String {
        format!(
            "{}.{}",
            self.created_at.format(FILE_TIMESTAMP_FORMAT),
            BACKUP_EXTENSION
        )
    }

    /// Replace the store's contents with this backup
    ///
    /// The store is cleared and refilled with copies of the backup's
    /// records, then the generator is set to the highest restored id. The
    /// watermark is set even when it is lower than before, because the
    /// records that carried higher ids are gone.
    pub fn restore_into(&self, store: &mut RecordStore, ids: &mut IdGenerator) {
        store.restore(&self.records);
        ids.reset_watermark(self.highest_id());
        info!(
            records = store.len(),
            watermark = ids.watermark(),
            "Backup restored"
        );
    }
}

/// Recover the creation time encoded in a backup file name
pub fn timestamp_from_file_name(file_name: &str) -> Option<DateTime<Local>> {
    let stem = file_name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let naive = NaiveDateTime::parse_from_str(stem, FILE_TIMESTAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}
