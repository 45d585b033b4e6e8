//! Backup line format
//!
//! Each record is one comma-separated line. Common fields come first, then
//! the category-conditional fields the record's category carries, always
//! in the order calories, volume, weight. Kitchenware appends its material
//! when it is non-empty. Reals are written with two decimals.
//!
//! There is no quoting: a comma inside a name or description splits the
//! field and makes the line undecodable.

use std::fmt::Write;
use std::str::{FromStr, Split};

use crate::error::{DecodeError, ValidationError};
use crate::models::{Category, Record};

/// Encode one record as a backup line, without the trailing newline
pub fn encode_record(record: &Record) -> String {
    let mut line = format!(
        "{},{},{},{},{},{:.2}",
        record.id(),
        record.name(),
        record.description(),
        record.category().ordinal(),
        record.stock(),
        record.price()
    );

    // Writing to a String cannot fail
    for value in [record.calories(), record.volume(), record.weight()]
        .into_iter()
        .flatten()
    {
        let _ = write!(line, ",{:.2}", value);
    }

    if let Some(material) = record.material().filter(|m| !m.is_empty()) {
        line.push(',');
        line.push_str(material);
    }

    line
}

/// Encode records, one line each, every line newline-terminated
pub fn encode_records(records: &[Record]) -> String {
    let mut text = String::new();
    for record in records {
        text.push_str(&encode_record(record));
        text.push('\n');
    }
    text
}

/// Decode backup text into records, in file order
///
/// The first bad line aborts the whole decode; no partial record list is
/// ever returned.
pub fn decode_records(text: &str) -> Result<Vec<Record>, DecodeError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| decode_line(line, index + 1))
        .collect()
}

/// Cursor over one line's fields
struct Fields<'a> {
    parts: Split<'a, char>,
    line: usize,
    taken: usize,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str, line: usize) -> Self {
        Self {
            parts: text.split(','),
            line,
            taken: 0,
        }
    }

    fn text(&mut self, field: &'static str) -> Result<&'a str, DecodeError> {
        let value = self.parts.next().ok_or(DecodeError::MissingField {
            line: self.line,
            field,
        })?;
        self.taken += 1;
        Ok(value)
    }

    fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, DecodeError> {
        let raw = self.text(field)?;
        raw.parse().map_err(|_| DecodeError::InvalidNumber {
            line: self.line,
            field,
            value: raw.to_string(),
        })
    }

    fn real(&mut self, field: &'static str) -> Result<f64, DecodeError> {
        let raw = self.text(field)?;
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(DecodeError::InvalidNumber {
                line: self.line,
                field,
                value: raw.to_string(),
            }),
        }
    }

    fn category(&mut self) -> Result<Category, DecodeError> {
        let raw = self.text("category")?;
        raw.parse::<u8>()
            .ok()
            .and_then(Category::from_ordinal)
            .ok_or_else(|| DecodeError::UnknownCategory {
                line: self.line,
                ordinal: raw.to_string(),
            })
    }

    fn optional_text(&mut self) -> Option<&'a str> {
        let value = self.parts.next()?;
        self.taken += 1;
        Some(value)
    }

    fn finish(mut self) -> Result<(), DecodeError> {
        let extra = self.parts.by_ref().count();
        if extra > 0 {
            return Err(DecodeError::TrailingFields {
                line: self.line,
                expected: self.taken,
                found: self.taken + extra,
            });
        }
        Ok(())
    }

    fn invalid(&self, source: ValidationError) -> DecodeError {
        DecodeError::Invalid {
            line: self.line,
            source,
        }
    }
}

fn decode_line(text: &str, line: usize) -> Result<Record, DecodeError> {
    let mut fields = Fields::new(text, line);

    let id: u64 = fields.number("id")?;
    let name = fields.text("name")?;
    let description = fields.text("description")?;
    let category = fields.category()?;
    let stock: i64 = fields.number("stock")?;
    let price = fields.real("price")?;

    let mut record = Record::new(id, category, name, description, stock, price)
        .map_err(|e| fields.invalid(e))?;

    let caps = category.capabilities();
    if caps.calories {
        let value = fields.real("calories")?;
        record.set_calories(value).map_err(|e| fields.invalid(e))?;
    }
    if caps.volume {
        let value = fields.real("volume")?;
        record.set_volume(value).map_err(|e| fields.invalid(e))?;
    }
    if caps.weight {
        let value = fields.real("weight")?;
        record.set_weight(value).map_err(|e| fields.invalid(e))?;
    }
    if caps.material {
        if let Some(material) = fields.optional_text() {
            record.set_material(material).map_err(|e| fields.invalid(e))?;
        }
    }

    fields.finish()?;
    Ok(record)
}
