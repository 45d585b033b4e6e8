//! Inventory facade
//!
//! The `Inventory` pairs the sorted [`RecordStore`] with the
//! [`IdGenerator`] that issues its ids, and is the boundary the CLI
//! drives: record CRUD, listing and search, backups and sheets.
//!
//! ## Usage
//!
//! ```ignore
//! let mut inventory = Inventory::new();
//!
//! let mut cola = inventory.new_record(Category::SoftDrink, "Cola", "Fizzy", 24, 1.5)?;
//! cola.set_volume(330.0)?;
//! inventory.add_record(cola);
//!
//! let cheapest_first = inventory.list_all(Some(SortKey::PriceAsc));
//! ```

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backup::Backup;
use crate::error::ValidationError;
use crate::identifier::IdGenerator;
use crate::models::{self, Category, Record};
use crate::search::{self, QuerySpec, SearchResult, SortKey};
use crate::store::RecordStore;

/// A timestamped copy of every record, for reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySheet {
    pub created_at: DateTime<Local>,
    pub records: Vec<Record>,
}

impl InventorySheet {
    /// Total units in stock across all records
    pub fn total_stock(&self) -> i64 {
        self.records.iter().map(Record::stock).sum()
    }

    /// Sum of price times stock
    pub fn total_value(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.price() * r.stock() as f64)
            .sum()
    }
}

/// Records plus the generator that numbers them
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    records: RecordStore,
    ids: IdGenerator,
}

impl Inventory {
    /// An empty inventory whose first id will be 1
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty inventory continuing from an existing generator
    pub fn with_generator(ids: IdGenerator) -> Self {
        Self {
            records: RecordStore::new(),
            ids,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.records
    }

    /// The generator's current watermark
    pub fn watermark(&self) -> u64 {
        self.ids.watermark()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ==================== Record Operations ====================

    /// Build a record with a freshly issued id
    ///
    /// The common fields are checked before an id is drawn, so rejected
    /// input does not use one up. The record is not added; set its
    /// category fields and pass it to [`add_record`](Self::add_record).
    pub fn new_record(
        &mut self,
        category: Category,
        name: impl Into<String>,
        description: impl Into<String>,
        stock: i64,
        price: f64,
    ) -> Result<Record, ValidationError> {
        let name = name.into();
        let description = description.into();
        models::validate_name(&name)?;
        models::validate_description(&description)?;
        models::validate_stock(stock)?;
        models::validate_price(price)?;

        let id = self
            .ids
            .next_id()
            .ok_or(ValidationError::IdsExhausted(self.ids.watermark()))?;
        Record::new(id, category, name, description, stock, price)
    }

    /// Add a record; a record whose id is already stored is ignored
    pub fn add_record(&mut self, record: Record) -> bool {
        self.records.add(record)
    }

    /// Remove a record by id
    pub fn remove_record(&mut self, id: u64) -> bool {
        self.records.remove(id).is_some()
    }

    pub fn lookup(&self, id: u64) -> Option<&Record> {
        self.records.get(id)
    }

    /// Mutable access for single-field edits through the record's setters
    pub fn lookup_mut(&mut self, id: u64) -> Option<&mut Record> {
        self.records.get_mut(id)
    }

    /// Commit an edited copy of a stored record
    ///
    /// Fails if the id is unknown or the category differs from the stored
    /// record's.
    pub fn update_record(&mut self, record: Record) -> bool {
        self.records.update(record)
    }

    // ==================== Queries ====================

    /// Every record, ordered by `sort_key` (id order when `None`)
    pub fn list_all(&self, sort_key: Option<SortKey>) -> SearchResult<'_> {
        let spec = QuerySpec::new().with_sort(sort_key.unwrap_or_default());
        self.search(&spec)
    }

    /// Filter and sort the records
    pub fn search(&self, spec: &QuerySpec) -> SearchResult<'_> {
        let result = search::search(self.records.records(), spec);
        debug!(
            query = %spec.text_query,
            sort = %spec.sort_key,
            matched = result.len(),
            "Search"
        );
        result
    }

    /// Timestamped deep copy of all records for reporting
    pub fn create_sheet(&self) -> InventorySheet {
        InventorySheet {
            created_at: Local::now(),
            records: self.records.snapshot(),
        }
    }

    // ==================== Backups ====================

    /// Capture a backup of the current records
    pub fn create_backup(&self) -> Backup {
        let backup = Backup::capture(&self.records);
        info!(records = backup.len(), "Backup created");
        backup
    }

    /// Replace the records with a backup's and continue ids after it
    ///
    /// An empty backup clears the inventory and restarts ids at 1.
    pub fn restore_backup(&mut self, backup: &Backup) {
        if backup.is_empty() {
            warn!(discarded = self.records.len(), "Restoring an empty backup");
        }
        backup.restore_into(&mut self.records, &mut self.ids);
    }

    /// Load persisted records without lowering the watermark
    ///
    /// Used when reopening a working inventory: the stored watermark may be
    /// above every surviving id if the newest records were removed.
    pub(crate) fn reload(&mut self, records: &[Record], watermark: u64) {
        self.records.restore(records);
        let highest = self.records.highest_id().unwrap_or(0);
        self.ids.reset_watermark(watermark.max(highest));
        debug!(
            records = self.records.len(),
            watermark = self.ids.watermark(),
            "Inventory reloaded"
        );
    }
}
