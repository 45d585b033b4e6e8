//! Record-level error types
//!
//! `ValidationError` is raised by record constructors and setters.
//! `DecodeError` is raised by the backup line codec.

use thiserror::Error;

use crate::models::Category;

/// Maximum length of a record name, in characters
pub const MAX_NAME_LEN: usize = 50;

/// Maximum length of a record description, in characters
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// A field value was rejected; the record is left unchanged
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Name is empty
    #[error("Name cannot be empty")]
    EmptyName,

    /// Name exceeds the maximum length
    #[error("Name must not exceed {max} characters (got {len})")]
    NameTooLong { len: usize, max: usize },

    /// Description is empty
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// Description exceeds the maximum length
    #[error("Description must not exceed {max} characters (got {len})")]
    DescriptionTooLong { len: usize, max: usize },

    /// Stock is below zero
    #[error("Stock must be equal to or more than zero (got {0})")]
    NegativeStock(i64),

    /// Price is zero, negative or not a number
    #[error("Price must be more than zero (got {0})")]
    NonPositivePrice(f64),

    /// A measurement (calories, volume, weight) is negative or not a number
    #[error("{field} must be equal to or more than zero (got {value})")]
    NegativeMeasure { field: &'static str, value: f64 },

    /// Every identifier has been issued
    #[error("No identifiers left: the last issued id is {0}")]
    IdsExhausted(u64),

    /// The record's category does not carry this field
    #[error("{category} items have no {field}")]
    NotApplicable {
        field: &'static str,
        category: Category,
    },
}

/// Failure to decode one line of a backup
///
/// Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// The line ended before a required field
    #[error("line {line}: missing field '{field}'")]
    MissingField { line: usize, field: &'static str },

    /// A numeric field could not be parsed
    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// The category ordinal does not name a record category
    #[error("line {line}: unknown category ordinal '{ordinal}'")]
    UnknownCategory { line: usize, ordinal: String },

    /// More fields than the category allows
    #[error("line {line}: expected at most {expected} fields, found {found}")]
    TrailingFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A field parsed but failed record validation
    #[error("line {line}: {source}")]
    Invalid {
        line: usize,
        #[source]
        source: ValidationError,
    },
}

impl DecodeError {
    /// The 1-based line number the error refers to
    pub fn line(&self) -> usize {
        match self {
            DecodeError::MissingField { line, .. }
            | DecodeError::InvalidNumber { line, .. }
            | DecodeError::UnknownCategory { line, .. }
            | DecodeError::TrailingFields { line, .. }
            | DecodeError::Invalid { line, .. } => *line,
        }
    }
}
