//! Item command handlers

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;

use stockroom_core::{Category, Record, SortKey, Workspace};

use crate::output::Output;
use crate::prompt::{confirm, is_interactive, prompt_with_default};

/// Category-dependent fields, accepted only where the category has them
#[derive(Args, Debug, Clone, Default)]
pub struct ExtraFields {
    /// Calories (food categories)
    #[arg(long, allow_hyphen_values = true)]
    pub calories: Option<f64>,
    /// Volume (soft drinks)
    #[arg(long, allow_hyphen_values = true)]
    pub volume: Option<f64>,
    /// Weight (fruit, noodles, vegetables)
    #[arg(long, allow_hyphen_values = true)]
    pub weight: Option<f64>,
    /// Material (kitchenware)
    #[arg(long)]
    pub material: Option<String>,
}

impl ExtraFields {
    fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.volume.is_none()
            && self.weight.is_none()
            && self.material.is_none()
    }

    fn apply(&self, record: &mut Record) -> Result<()> {
        if let Some(calories) = self.calories {
            record.set_calories(calories)?;
        }
        if let Some(volume) = self.volume {
            record.set_volume(volume)?;
        }
        if let Some(weight) = self.weight {
            record.set_weight(weight)?;
        }
        if let Some(ref material) = self.material {
            record.set_material(material.as_str())?;
        }
        Ok(())
    }
}

/// Field changes for `item edit`
#[derive(Args, Debug, Clone, Default)]
pub struct FieldChanges {
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
    /// New stock level
    #[arg(short, long, allow_hyphen_values = true)]
    pub stock: Option<i64>,
    /// New price
    #[arg(short, long, allow_hyphen_values = true)]
    pub price: Option<f64>,
    #[command(flatten)]
    pub extra: ExtraFields,
}

impl FieldChanges {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.stock.is_none()
            && self.price.is_none()
            && self.extra.is_empty()
    }

    /// Apply every change; stops at the first rejected value
    fn apply(&self, record: &mut Record) -> Result<()> {
        if let Some(ref name) = self.name {
            record.set_name(name.as_str())?;
        }
        if let Some(ref description) = self.description {
            record.set_description(description.as_str())?;
        }
        if let Some(stock) = self.stock {
            record.set_stock(stock)?;
        }
        if let Some(price) = self.price {
            record.set_price(price)?;
        }
        self.extra.apply(record)
    }
}

/// Required fields for `item add`
#[derive(Args, Debug, Clone)]
pub struct NewItem {
    /// Category (name or number 1-8)
    pub category: Category,
    /// Item name (1-50 characters)
    #[arg(long)]
    pub name: String,
    /// Item description (1-100 characters)
    #[arg(short, long)]
    pub description: String,
    /// Units in stock
    #[arg(short, long, allow_hyphen_values = true)]
    pub stock: i64,
    /// Unit price
    #[arg(short, long, allow_hyphen_values = true)]
    pub price: f64,
    #[command(flatten)]
    pub extra: ExtraFields,
}

/// Create a new record
pub fn add(workspace: &mut Workspace, item: NewItem, output: &Output) -> Result<()> {
    let inventory = workspace.inventory_mut();

    let mut record = inventory
        .new_record(
            item.category,
            item.name,
            item.description,
            item.stock,
            item.price,
        )
        .context("Invalid item")?;
    item.extra.apply(&mut record).context("Invalid item")?;

    if !inventory.add_record(record.clone()) {
        bail!("Record {} already exists", record.id());
    }
    workspace.save().context("Failed to save inventory")?;

    output.success(&format!("Added record {}", record.id()));
    output.print_record(&record)
}

/// List all records
pub fn list(workspace: &Workspace, sort: Option<SortKey>, output: &Output) -> Result<()> {
    let result = workspace.inventory().list_all(sort);
    output.print_records(result.records())
}

/// Show a single record
pub fn show(workspace: &Workspace, id: u64, output: &Output) -> Result<()> {
    let record = workspace
        .inventory()
        .lookup(id)
        .ok_or_else(|| anyhow!("Record not found: {}", id))?;

    output.print_record(record)
}

/// Edit a record
///
/// Changes are applied to a copy and committed together, so one bad value
/// leaves the stored record as it was. Without any field flags the fields
/// are prompted for interactively.
pub fn edit(
    workspace: &mut Workspace,
    id: u64,
    changes: FieldChanges,
    output: &Output,
) -> Result<()> {
    let mut record = workspace
        .inventory()
        .lookup(id)
        .cloned()
        .ok_or_else(|| anyhow!("Record not found: {}", id))?;

    let changes = if changes.is_empty() {
        if !output.should_prompt() || !is_interactive() {
            bail!("Nothing to change. Pass at least one field, e.g. --stock 10");
        }
        prompt_changes(&record)?
    } else {
        changes
    };

    changes
        .apply(&mut record)
        .with_context(|| format!("Record {} not updated", id))?;

    if !workspace.inventory_mut().update_record(record.clone()) {
        bail!("Record {} could not be updated", id);
    }
    workspace.save().context("Failed to save inventory")?;

    output.success(&format!("Updated record {}", id));
    output.print_record(&record)
}

/// Remove a record
pub fn remove(workspace: &mut Workspace, id: u64, yes: bool, output: &Output) -> Result<()> {
    let record = workspace
        .inventory()
        .lookup(id)
        .ok_or_else(|| anyhow!("Record not found: {}", id))?;

    // Confirm deletion
    if output.should_prompt() && !yes {
        println!("Remove record: {} - {}", record.id(), record.name());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    workspace.inventory_mut().remove_record(id);
    workspace.save().context("Failed to save inventory")?;

    output.success(&format!("Removed record {}", id));
    Ok(())
}

/// Ask for each field the record's category carries
fn prompt_changes(record: &Record) -> Result<FieldChanges> {
    println!("Editing record: {} ({})", record.id(), record.category());
    println!("Press Enter to keep current value, or type new value.\n");

    let mut changes = FieldChanges {
        name: prompt_with_default("Name", record.name())?,
        description: prompt_with_default("Description", record.description())?,
        stock: prompt_number("Stock", record.stock())?,
        price: prompt_number("Price", record.price())?,
        ..FieldChanges::default()
    };

    if let Some(calories) = record.calories() {
        changes.extra.calories = prompt_number("Calories", calories)?;
    }
    if let Some(volume) = record.volume() {
        changes.extra.volume = prompt_number("Volume", volume)?;
    }
    if let Some(weight) = record.weight() {
        changes.extra.weight = prompt_number("Weight", weight)?;
    }
    if let Some(material) = record.material() {
        changes.extra.material = prompt_with_default("Material", material)?;
    }

    Ok(changes)
}

fn prompt_number<T>(prompt: &str, current: T) -> Result<Option<T>>
where
    T: std::str::FromStr + std::fmt::Display,
{
    match prompt_with_default(prompt, &current.to_string())? {
        Some(input) => input
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {}: '{}'", prompt.to_lowercase(), input)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noodles() -> Record {
        Record::new(5, Category::Noodles, "Ramen", "Instant ramen", 20, 0.9).unwrap()
    }

    #[test]
    fn test_field_changes_apply() {
        let mut record = noodles();
        let changes = FieldChanges {
            stock: Some(12),
            extra: ExtraFields {
                weight: Some(85.0),
                ..ExtraFields::default()
            },
            ..FieldChanges::default()
        };

        changes.apply(&mut record).unwrap();
        assert_eq!(record.stock(), 12);
        assert_eq!(record.weight(), Some(85.0));
        assert_eq!(record.name(), "Ramen");
    }

    #[test]
    fn test_inapplicable_field_is_rejected() {
        let mut record = noodles();
        let changes = FieldChanges {
            extra: ExtraFields {
                volume: Some(500.0),
                ..ExtraFields::default()
            },
            ..FieldChanges::default()
        };

        let err = changes.apply(&mut record).unwrap_err();
        assert!(err.to_string().contains("volume"));
    }

    #[test]
    fn test_empty_changes() {
        assert!(FieldChanges::default().is_empty());
        let changes = FieldChanges {
            extra: ExtraFields {
                material: Some("Steel".to_string()),
                ..ExtraFields::default()
            },
            ..FieldChanges::default()
        };
        assert!(!changes.is_empty());
    }
}
