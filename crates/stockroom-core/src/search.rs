//! Record search
//!
//! A search runs in two passes over a read-only slice of records:
//!
//! 1. **Filter**: keep records whose name or description contains the
//!    query (case-insensitive), and whose category is in the type filter
//!    when one is set. Both conditions must hold.
//! 2. **Sort**: a binary-insertion sort on the active [`SortKey`].
//!
//! Filtering first keeps the sort input small. Neither pass touches the
//! records themselves; results borrow from the input.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::models::{Category, Record};

/// Which text field a query matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    #[default]
    Name,
    Description,
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterField::Name => f.write_str("Name"),
            FilterField::Description => f.write_str("Description"),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Id,
    Name,
    PriceAsc,
    PriceDesc,
    StockAsc,
    StockDesc,
}

impl SortKey {
    /// Whether results are produced by sorting ascending and reversing
    pub fn is_descending(self) -> bool {
        matches!(self, SortKey::PriceDesc | SortKey::StockDesc)
    }

    /// Ascending comparison for this key, with no secondary tie-break
    fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::Id => a.id().cmp(&b.id()),
            SortKey::Name => fold_case(a.name()).cmp(fold_case(b.name())),
            SortKey::PriceAsc | SortKey::PriceDesc => a.price().total_cmp(&b.price()),
            SortKey::StockAsc | SortKey::StockDesc => a.stock().cmp(&b.stock()),
        }
    }
}

/// Lowercased chars, without allocating a new string
fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::Id => "ID",
            SortKey::Name => "Name",
            SortKey::PriceAsc => "Price (smallest to highest)",
            SortKey::PriceDesc => "Price (highest to smallest)",
            SortKey::StockAsc => "Stock (smallest to highest)",
            SortKey::StockDesc => "Stock (highest to smallest)",
        };
        f.write_str(label)
    }
}

/// Unrecognised sort key or filter field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseQueryError {
    #[error("Unknown sort key '{0}'. Valid: id, name, price-asc, price-desc, stock-asc, stock-desc")]
    SortKey(String),
    #[error("Unknown filter field '{0}'. Valid: name, description")]
    FilterField(String),
}

impl FromStr for SortKey {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "id" | "1" => Ok(SortKey::Id),
            "name" | "2" => Ok(SortKey::Name),
            "price" | "price-asc" | "3" => Ok(SortKey::PriceAsc),
            "price-desc" | "4" => Ok(SortKey::PriceDesc),
            "stock" | "stock-asc" | "5" => Ok(SortKey::StockAsc),
            "stock-desc" | "6" => Ok(SortKey::StockDesc),
            _ => Err(ParseQueryError::SortKey(s.to_string())),
        }
    }
}

impl FromStr for FilterField {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "1" => Ok(FilterField::Name),
            "description" | "desc" | "2" => Ok(FilterField::Description),
            _ => Err(ParseQueryError::FilterField(s.to_string())),
        }
    }
}

/// Search parameters, owned by the caller across a search session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuerySpec {
    /// Substring to look for; empty disables text filtering
    pub text_query: String,
    /// Field the text query is matched against
    pub filter_field: FilterField,
    /// Result ordering
    pub sort_key: SortKey,
    /// Categories to include; empty includes all
    pub type_filter: BTreeSet<Category>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>, field: FilterField) -> Self {
        self.text_query = query.into();
        self.filter_field = field;
        self
    }

    pub fn with_sort(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.type_filter.insert(category);
        self
    }

    /// Include a category in results
    pub fn include_category(&mut self, category: Category) {
        self.type_filter.insert(category);
    }

    /// Stop including a category
    pub fn exclude_category(&mut self, category: Category) {
        self.type_filter.remove(&category);
    }

    /// Include all categories again
    pub fn clear_categories(&mut self) {
        self.type_filter.clear();
    }

    /// Whether a record passes both filters
    pub fn matches(&self, record: &Record) -> bool {
        if !self.text_query.is_empty() {
            let haystack = match self.filter_field {
                FilterField::Name => record.name(),
                FilterField::Description => record.description(),
            };
            if !haystack
                .to_lowercase()
                .contains(&self.text_query.to_lowercase())
            {
                return false;
            }
        }

        self.type_filter.is_empty() || self.type_filter.contains(&record.category())
    }
}

/// Filtered, sorted view over searched records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult<'a> {
    records: Vec<&'a Record>,
}

impl<'a> SearchResult<'a> {
    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    pub fn ids(&self) -> Vec<u64> {
        self.iter().map(Record::id).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deep-copy the matched records
    pub fn to_owned_records(&self) -> Vec<Record> {
        self.iter().cloned().collect()
    }
}

/// Filter and sort `records` according to `spec`
pub fn search<'a>(records: &'a [Record], spec: &QuerySpec) -> SearchResult<'a> {
    let mut matched: Vec<&Record> = records.iter().filter(|r| spec.matches(r)).collect();
    sort_records(&mut matched, spec.sort_key);
    SearchResult { records: matched }
}

/// Sort records in place by `key`
///
/// Ascending keys are stable: equal records keep their input order.
/// Descending keys sort ascending and then reverse the whole sequence,
/// so equal records come out in reverse input order.
pub fn sort_records(records: &mut [&Record], key: SortKey) {
    binary_insertion_sort(records, |a, b| key.compare(a, b));
    if key.is_descending() {
        records.reverse();
    }
}

/// Stable binary-insertion sort
///
/// For each element after the first, binary-search the sorted prefix for
/// the first position holding a strictly greater element, then rotate the
/// element into place. Landing after every equal element keeps the sort
/// stable.
fn binary_insertion_sort<T>(items: &mut [T], mut compare: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut left = 0;
        let mut right = i;

        while left < right {
            let mid = left + (right - left) / 2;
            if compare(&items[i], &items[mid]) == Ordering::Less {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        items[left..=i].rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, category: Category, name: &str, stock: i64, price: f64) -> Record {
        Record::new(id, category, name, format!("{} description", name), stock, price).unwrap()
    }

    fn sample() -> Vec<Record> {
        vec![
            record(1, Category::SoftDrink, "Apple Juice", 20, 3.5),
            record(2, Category::Fruit, "Banana", 50, 0.8),
            record(3, Category::BreakfastSpread, "apple pie", 5, 12.0),
            record(4, Category::Kitchenware, "Cutting Board", 7, 15.0),
            record(5, Category::Fruit, "Cherry", 0, 6.25),
        ]
    }

    #[test]
    fn test_text_filter_is_case_insensitive_substring() {
        let records = vec![
            record(1, Category::SoftDrink, "Apple Juice", 1, 1.0),
            record(2, Category::Fruit, "Banana", 1, 1.0),
            record(3, Category::BreakfastSpread, "apple pie", 1, 1.0),
        ];
        let spec = QuerySpec::new().with_query("apple", FilterField::Name);

        let result = search(&records, &spec);
        assert_eq!(result.ids(), vec![1, 3]);
    }

    #[test]
    fn test_text_filter_on_description() {
        let mut records = sample();
        records[1].set_description("Yellow and sweet").unwrap();
        let spec = QuerySpec::new().with_query("SWEET", FilterField::Description);

        assert_eq!(search(&records, &spec).ids(), vec![2]);

        // Name is not consulted when filtering by description
        let spec = QuerySpec::new().with_query("banana", FilterField::Description);
        assert!(search(&records, &spec).is_empty());
    }

    #[test]
    fn test_type_filter() {
        let records = sample();
        let spec = QuerySpec::new().with_category(Category::Fruit);
        assert_eq!(search(&records, &spec).ids(), vec![2, 5]);

        let spec = spec.with_category(Category::Kitchenware);
        assert_eq!(search(&records, &spec).ids(), vec![2, 4, 5]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let records = sample();
        let spec = QuerySpec::new()
            .with_query("apple", FilterField::Name)
            .with_category(Category::Fruit);

        // Both "apple" records are outside the Fruit category
        assert!(search(&records, &spec).is_empty());

        let spec = QuerySpec::new()
            .with_query("apple", FilterField::Name)
            .with_category(Category::SoftDrink);
        assert_eq!(search(&records, &spec).ids(), vec![1]);
    }

    #[test]
    fn test_empty_spec_returns_everything_by_id() {
        let records = sample();
        assert_eq!(search(&records, &QuerySpec::new()).ids(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let records = sample();
        let spec = QuerySpec::new().with_sort(SortKey::Name);
        assert_eq!(search(&records, &spec).ids(), vec![1, 3, 2, 5, 4]);
    }

    #[test]
    fn test_sort_by_name_folds_non_ascii_and_keeps_ties() {
        let records = vec![
            record(1, Category::Fruit, "Zucchini", 1, 1.0),
            record(2, Category::Fruit, "apple", 1, 1.0),
            record(3, Category::Fruit, "Éclair", 1, 1.0),
            record(4, Category::Fruit, "APPLE", 1, 1.0),
            record(5, Category::Fruit, "éclair", 1, 1.0),
            record(6, Category::Fruit, "App", 1, 1.0),
        ];
        let spec = QuerySpec::new().with_sort(SortKey::Name);
        assert_eq!(search(&records, &spec).ids(), vec![6, 2, 4, 1, 3, 5]);
    }

    #[test]
    fn test_sort_by_price() {
        let records = sample();
        let asc = search(&records, &QuerySpec::new().with_sort(SortKey::PriceAsc));
        assert_eq!(asc.ids(), vec![2, 1, 5, 3, 4]);

        let desc = search(&records, &QuerySpec::new().with_sort(SortKey::PriceDesc));
        assert_eq!(desc.ids(), vec![4, 3, 5, 1, 2]);
    }

    #[test]
    fn test_sort_by_stock() {
        let records = sample();
        let asc = search(&records, &QuerySpec::new().with_sort(SortKey::StockAsc));
        assert_eq!(asc.ids(), vec![5, 3, 4, 1, 2]);

        let desc = search(&records, &QuerySpec::new().with_sort(SortKey::StockDesc));
        assert_eq!(desc.ids(), vec![2, 1, 4, 3, 5]);
    }

    #[test]
    fn test_ascending_ties_keep_input_order() {
        let records = vec![
            record(3, Category::Washing, "C", 4, 5.0),
            record(1, Category::Washing, "A", 4, 5.0),
            record(2, Category::Washing, "B", 4, 5.0),
        ];
        let result = search(&records, &QuerySpec::new().with_sort(SortKey::PriceAsc));
        assert_eq!(result.ids(), vec![3, 1, 2]);
    }

    #[test]
    fn test_descending_ties_are_reversed() {
        let records = vec![
            record(3, Category::Washing, "C", 4, 5.0),
            record(1, Category::Washing, "A", 4, 5.0),
            record(2, Category::Washing, "B", 4, 5.0),
        ];
        let asc = search(&records, &QuerySpec::new().with_sort(SortKey::StockAsc));
        let desc = search(&records, &QuerySpec::new().with_sort(SortKey::StockDesc));

        let mut reversed = asc.ids();
        reversed.reverse();
        assert_eq!(desc.ids(), reversed);
        assert_eq!(desc.ids(), vec![2, 1, 3]);
    }

    #[test]
    fn test_ties_mixed_with_distinct_values() {
        let records = vec![
            record(1, Category::Washing, "A", 2, 1.0),
            record(2, Category::Washing, "B", 1, 1.0),
            record(3, Category::Washing, "C", 2, 1.0),
            record(4, Category::Washing, "D", 1, 1.0),
            record(5, Category::Washing, "E", 2, 1.0),
        ];
        let asc = search(&records, &QuerySpec::new().with_sort(SortKey::StockAsc));
        assert_eq!(asc.ids(), vec![2, 4, 1, 3, 5]);

        let desc = search(&records, &QuerySpec::new().with_sort(SortKey::StockDesc));
        assert_eq!(desc.ids(), vec![5, 3, 1, 4, 2]);
    }

    #[test]
    fn test_search_does_not_touch_input() {
        let records = sample();
        let before = records.clone();
        let _ = search(&records, &QuerySpec::new().with_sort(SortKey::StockDesc));
        assert_eq!(records, before);
    }

    #[test]
    fn test_binary_insertion_sort_matches_stable_sort() {
        let input: Vec<(u32, usize)> = [5, 3, 5, 1, 3, 9, 0, 5, 1, 7]
            .iter()
            .enumerate()
            .map(|(i, &v)| (v, i))
            .collect();

        let mut ours = input.clone();
        binary_insertion_sort(&mut ours, |a, b| a.0.cmp(&b.0));

        let mut expected = input;
        expected.sort_by_key(|pair| pair.0);

        assert_eq!(ours, expected);
    }

    #[test]
    fn test_query_spec_category_editing() {
        let mut spec = QuerySpec::new();
        spec.include_category(Category::Fruit);
        spec.include_category(Category::Noodles);
        spec.exclude_category(Category::Fruit);
        assert_eq!(spec.type_filter.len(), 1);

        spec.clear_categories();
        assert!(spec.type_filter.is_empty());
    }

    #[test]
    fn test_parse_sort_key_and_field() {
        assert_eq!("price-desc".parse::<SortKey>(), Ok(SortKey::PriceDesc));
        assert_eq!("STOCK_ASC".parse::<SortKey>(), Ok(SortKey::StockAsc));
        assert_eq!("1".parse::<SortKey>(), Ok(SortKey::Id));
        assert!("weight".parse::<SortKey>().is_err());

        assert_eq!("description".parse::<FilterField>(), Ok(FilterField::Description));
        assert!("material".parse::<FilterField>().is_err());
    }
}
