//! Sorted record store
//!
//! `RecordStore` keeps its records in a `Vec` ordered ascending by id with
//! no duplicates. Every lookup, insert and removal goes through one binary
//! search that either finds the id or reports where it would be inserted.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = RecordStore::new();
//! store.add(record);             // spliced in at its sorted position
//! let found = store.get(42);     // O(log n)
//! let copy = store.snapshot();   // deep copy, independent of the store
//! ```

use tracing::{debug, warn};

use crate::models::Record;

/// Records ordered by id, unique within the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate `id`
    ///
    /// Returns `Ok(index)` when a record with this id exists, otherwise
    /// `Err(index)` with the position that keeps the store sorted if a
    /// record with this id were inserted there.
    fn position(&self, id: u64) -> Result<usize, usize> {
        let mut left = 0;
        let mut right = self.records.len();

        while left < right {
            let mid = left + (right - left) / 2;
            let mid_id = self.records[mid].id();

            if mid_id == id {
                return Ok(mid);
            } else if mid_id < id {
                left = mid + 1;
            } else {
                right = mid;
            }
        }

        Err(left)
    }

    /// Insert a record at its sorted position
    ///
    /// If a record with the same id is already stored the call does
    /// nothing and returns `false`; the stored record wins.
    pub fn add(&mut self, record: Record) -> bool {
        match self.position(record.id()) {
            Ok(_) => {
                warn!(id = record.id(), "Duplicate record id, add ignored");
                false
            }
            Err(index) => {
                debug!(id = record.id(), index, "Adding record");
                self.records.insert(index, record);
                true
            }
        }
    }

    /// Remove the record with `id`, returning it if it was stored
    pub fn remove(&mut self, id: u64) -> Option<Record> {
        let index = self.position(id).ok()?;
        debug!(id, index, "Removing record");
        Some(self.records.remove(index))
    }

    /// Look up a record by id
    pub fn get(&self, id: u64) -> Option<&Record> {
        self.position(id).ok().map(|index| &self.records[index])
    }

    /// Look up a record for editing through its validated setters
    ///
    /// Records expose no id setter, so edits cannot break the ordering.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Record> {
        match self.position(id) {
            Ok(index) => Some(&mut self.records[index]),
            Err(_) => None,
        }
    }

    /// Replace the stored record that has the same id
    ///
    /// Returns `false` if no such record exists or if the replacement would
    /// change the record's category.
    pub fn update(&mut self, record: Record) -> bool {
        let Ok(index) = self.position(record.id()) else {
            return false;
        };

        let slot = &mut self.records[index];
        if slot.category() != record.category() {
            warn!(
                id = record.id(),
                from = %slot.category(),
                to = %record.category(),
                "Refusing to change record category"
            );
            return false;
        }

        debug!(id = record.id(), "Updating record");
        *slot = record;
        true
    }

    /// Whether a record with `id` is stored
    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_ok()
    }

    /// The live records in id order, for immediate read-only use
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// A deep copy of the records in id order
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Replace the contents with copies of `records`
    ///
    /// Input order does not matter; each record is added through `add`, so
    /// the first occurrence of a repeated id wins.
    pub fn restore<'a>(&mut self, records: impl IntoIterator<Item = &'a Record>) {
        self.records.clear();
        for record in records {
            self.add(record.clone());
        }
        debug!(count = self.records.len(), "Store restored");
    }

    /// Highest stored id
    pub fn highest_id(&self) -> Option<u64> {
        self.records.last().map(Record::id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn record(id: u64) -> Record {
        Record::new(id, Category::Cosmetic, format!("Item {}", id), "Test item", 1, 1.0).unwrap()
    }

    fn ids(store: &RecordStore) -> Vec<u64> {
        store.records().iter().map(Record::id).collect()
    }

    #[test]
    fn test_add_keeps_order() {
        let mut store = RecordStore::new();
        for id in [5, 1, 9, 3, 7] {
            assert!(store.add(record(id)));
        }
        assert_eq!(ids(&store), vec![1, 3, 5, 7, 9]);
        assert_eq!(store.highest_id(), Some(9));
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut store = RecordStore::new();
        store.add(record(1));
        store.add(record(2));

        let mut other = record(2);
        other.set_name("Replacement").unwrap();
        assert!(!store.add(other));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap().name(), "Item 2");
    }

    #[test]
    fn test_add_duplicate_of_last_record_is_noop() {
        let mut store = RecordStore::new();
        store.add(record(1));
        store.add(record(2));
        store.add(record(2));
        assert_eq!(ids(&store), vec![1, 2]);
    }

    #[test]
    fn test_remove() {
        let mut store = RecordStore::new();
        assert!(store.remove(1).is_none());

        store.add(record(1));
        store.add(record(2));
        store.add(record(3));

        assert_eq!(store.remove(2).map(|r| r.id()), Some(2));
        assert!(store.remove(2).is_none());
        assert!(store.remove(4).is_none());
        assert_eq!(ids(&store), vec![1, 3]);
    }

    #[test]
    fn test_get() {
        let mut store = RecordStore::new();
        assert!(store.get(1).is_none());

        store.add(record(10));
        store.add(record(20));

        assert_eq!(store.get(20).unwrap().id(), 20);
        assert!(store.get(15).is_none());
        assert!(store.get(0).is_none());
        assert!(store.get(21).is_none());
        assert!(store.contains(10));
    }

    #[test]
    fn test_get_mut_edits_in_place() {
        let mut store = RecordStore::new();
        store.add(record(1));

        store.get_mut(1).unwrap().set_stock(42).unwrap();
        assert_eq!(store.get(1).unwrap().stock(), 42);
        assert!(store.get_mut(2).is_none());
    }

    #[test]
    fn test_update() {
        let mut store = RecordStore::new();
        store.add(record(1));

        let mut edited = store.get(1).unwrap().clone();
        edited.set_price(9.5).unwrap();
        assert!(store.update(edited));
        assert_eq!(store.get(1).unwrap().price(), 9.5);

        assert!(!store.update(record(2)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_refuses_category_change() {
        let mut store = RecordStore::new();
        store.add(record(1));

        let fruit = Record::new(1, Category::Fruit, "Pear", "Green pear", 1, 1.0).unwrap();
        assert!(!store.update(fruit));
        assert_eq!(store.get(1).unwrap().category(), Category::Cosmetic);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut store = RecordStore::new();
        store.add(record(1));

        let snapshot = store.snapshot();
        store.get_mut(1).unwrap().set_name("Changed").unwrap();
        store.add(record(2));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].name(), "Item 1");
    }

    #[test]
    fn test_restore_replaces_contents() {
        let mut store = RecordStore::new();
        store.add(record(50));

        let incoming = vec![record(3), record(1), record(2), record(1)];
        store.restore(&incoming);

        assert_eq!(ids(&store), vec![1, 2, 3]);
        assert!(store.get(50).is_none());
    }

    #[test]
    fn test_position_agrees_with_slice_binary_search() {
        let mut store = RecordStore::new();
        for id in (2..40).step_by(3) {
            store.add(record(id));
        }
        for probe in 0..45 {
            let expected = store.records().binary_search_by_key(&probe, Record::id);
            assert_eq!(store.position(probe), expected, "probe {}", probe);
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u64),
        Remove(u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..64).prop_map(Op::Add),
            (0u64..64).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn store_stays_sorted_and_unique(ops in prop::collection::vec(op_strategy(), 0..200)) {
            let mut store = RecordStore::new();
            let mut model: BTreeMap<u64, ()> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Add(id) => {
                        let inserted = store.add(record(id));
                        prop_assert_eq!(inserted, model.insert(id, ()).is_none());
                    }
                    Op::Remove(id) => {
                        let removed = store.remove(id).is_some();
                        prop_assert_eq!(removed, model.remove(&id).is_some());
                    }
                }

                let current = ids(&store);
                prop_assert!(current.windows(2).all(|w| w[0] < w[1]));
                prop_assert_eq!(current, model.keys().copied().collect::<Vec<_>>());
            }

            for id in 0..64 {
                prop_assert_eq!(store.get(id).is_some(), model.contains_key(&id));
            }
        }
    }
}
