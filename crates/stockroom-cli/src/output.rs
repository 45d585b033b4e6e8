//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::{Context, Result};
use serde::Serialize;

use stockroom_core::{InventorySheet, Record};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - ids only
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single record with every field its category carries
    pub fn print_record(&self, record: &Record) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", record.id());
                println!("Name:        {}", record.name());
                println!("Category:    {}", record.category());
                println!("Description: {}", record.description());
                println!("Stock:       {}", record.stock());
                println!("Price:       {:.2}", record.price());
                if let Some(calories) = record.calories() {
                    println!("Calories:    {:.2}", calories);
                }
                if let Some(volume) = record.volume() {
                    println!("Volume:      {:.2}", volume);
                }
                if let Some(weight) = record.weight() {
                    println!("Weight:      {:.2}", weight);
                }
                if let Some(material) = record.material() {
                    let material = if material.is_empty() { "(not set)" } else { material };
                    println!("Material:    {}", material);
                }
            }
            OutputFormat::Json => print_json(record)?,
            OutputFormat::Quiet => {
                println!("{}", record.id());
            }
        }
        Ok(())
    }

    /// Print a list of records, one line each
    pub fn print_records(&self, records: &[&Record]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if records.is_empty() {
                    println!("No records found.");
                    return Ok(());
                }
                for record in records {
                    println!("{}", record_line(record));
                }
                println!("\n{} record(s)", records.len());
            }
            OutputFormat::Json => print_json(&records)?,
            OutputFormat::Quiet => {
                for record in records {
                    println!("{}", record.id());
                }
            }
        }
        Ok(())
    }

    /// Print an inventory sheet with totals
    pub fn print_sheet(&self, sheet: &InventorySheet) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                println!(
                    "Inventory sheet ({})",
                    sheet.created_at.format("%Y-%m-%d %H:%M:%S")
                );
                println!("────────────────────────────────────────");
                if sheet.records.is_empty() {
                    println!("No records.");
                    return Ok(());
                }
                for record in &sheet.records {
                    println!("{}", record_line(record));
                }
                println!("────────────────────────────────────────");
                println!("Records:     {}", sheet.records.len());
                println!("Total stock: {}", sheet.total_stock());
                println!("Total value: {:.2}", sheet.total_value());
            }
            OutputFormat::Json => print_json(&serde_json::json!({
                "created_at": sheet.created_at,
                "records": sheet.records,
                "total_stock": sheet.total_stock(),
                "total_value": sheet.total_value(),
            }))?,
            OutputFormat::Quiet => {
                for record in &sheet.records {
                    println!("{}", record.id());
                }
            }
        }
        Ok(())
    }

    /// Print backup file names, oldest first
    pub fn print_backups(&self, names: &[String]) -> Result<()> {
        match self.format {
            OutputFormat::Human => {
                if names.is_empty() {
                    println!("No backups found.");
                    return Ok(());
                }
                for name in names {
                    println!("{}", name);
                }
                println!("\n{} backup(s)", names.len());
            }
            OutputFormat::Json => print_json(&names)?,
            OutputFormat::Quiet => {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

/// One-line summary used by listings and the sheet
fn record_line(record: &Record) -> String {
    format!(
        "{:>5} | {:<28} | {:<16} | {:>6} | {:>9.2}",
        record.id(),
        truncate(record.name(), 28),
        record.category().label(),
        record.stock(),
        record.price()
    )
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::Category;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("crème brûlée", 12), "crème brûlée");
        assert_eq!(truncate("crème brûlée mix", 8), "crème...");
    }

    #[test]
    fn test_record_line() {
        let record = Record::new(42, Category::Noodles, "Udon", "Thick noodles", 7, 2.5).unwrap();
        let line = record_line(&record);
        assert!(line.starts_with("   42 | Udon"));
        assert!(line.contains("Noodles"));
        assert!(line.ends_with("     2.50"));
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = Record::new(3, Category::SoftDrink, "Cola", "Fizzy", 24, 1.5).unwrap();
        record.set_volume(330.0).unwrap();

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["category"], "soft_drink");
        assert_eq!(value["volume"], 330.0);
        assert!(value.get("weight").is_none());
    }
}
