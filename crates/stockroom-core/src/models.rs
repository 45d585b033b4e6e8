//! Data models for Stockroom
//!
//! A [`Record`] is one inventory entry. Its [`Category`] is fixed at
//! creation and decides which optional [`Details`] fields it carries,
//! through the per-category [`Capabilities`] table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ValidationError, MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// The fixed kind of a record
///
/// Discriminants are the ordinals written to backup files. Ordinal 0 is
/// reserved and never names a record category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cosmetic = 1,
    Kitchenware = 2,
    SoftDrink = 3,
    BreakfastSpread = 4,
    Noodles = 5,
    Washing = 6,
    Fruit = 7,
    Vegetable = 8,
}

/// Which optional fields a category carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub calories: bool,
    pub volume: bool,
    pub weight: bool,
    pub material: bool,
}

impl Category {
    /// All categories, in ordinal order
    pub const ALL: [Category; 8] = [
        Category::Cosmetic,
        Category::Kitchenware,
        Category::SoftDrink,
        Category::BreakfastSpread,
        Category::Noodles,
        Category::Washing,
        Category::Fruit,
        Category::Vegetable,
    ];

    /// The ordinal used in backup files
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Look up a category by backup ordinal
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.ordinal() == ordinal)
    }

    /// The optional fields records of this category carry
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Category::Cosmetic | Category::Washing => Capabilities {
                calories: false,
                volume: false,
                weight: false,
                material: false,
            },
            Category::Kitchenware => Capabilities {
                calories: false,
                volume: false,
                weight: false,
                material: true,
            },
            Category::SoftDrink => Capabilities {
                calories: true,
                volume: true,
                weight: false,
                material: false,
            },
            Category::BreakfastSpread => Capabilities {
                calories: true,
                volume: false,
                weight: false,
                material: false,
            },
            Category::Noodles | Category::Fruit | Category::Vegetable => Capabilities {
                calories: true,
                volume: false,
                weight: true,
                material: false,
            },
        }
    }

    /// Whether this is a food category
    pub fn is_food(self) -> bool {
        self.capabilities().calories
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Category::Cosmetic => "Cosmetic",
            Category::Kitchenware => "Kitchenware",
            Category::SoftDrink => "Soft Drinks",
            Category::BreakfastSpread => "Breakfast Spread",
            Category::Noodles => "Noodles",
            Category::Washing => "Washing",
            Category::Fruit => "Fruit",
            Category::Vegetable => "Vegetables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrecognised category name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown category '{0}'. Valid: cosmetic, kitchenware, soft-drink, breakfast-spread, noodles, washing, fruit, vegetable")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Accepts names in any case with `-`, `_` or spaces, plural forms,
    /// and menu ordinals `1`-`8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let category = match normalized.as_str() {
            "cosmetic" | "cosmetics" => Category::Cosmetic,
            "kitchenware" => Category::Kitchenware,
            "softdrink" | "softdrinks" => Category::SoftDrink,
            "breakfastspread" | "breakfastspreads" => Category::BreakfastSpread,
            "noodles" | "noodle" => Category::Noodles,
            "washing" => Category::Washing,
            "fruit" | "fruits" => Category::Fruit,
            "vegetable" | "vegetables" => Category::Vegetable,
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Category::from_ordinal)
                .ok_or_else(|| ParseCategoryError(s.to_string()))?,
        };
        Ok(category)
    }
}

/// Category-conditional fields
///
/// A member is `Some` exactly when the record's category has the matching
/// capability; this is fixed when the record is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Details {
    #[serde(skip_serializing_if = "Option::is_none")]
    calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    material: Option<String>,
}

impl Details {
    /// Zeroed details for a category
    pub fn for_category(category: Category) -> Self {
        let caps = category.capabilities();
        Self {
            calories: caps.calories.then_some(0.0),
            volume: caps.volume.then_some(0.0),
            weight: caps.weight.then_some(0.0),
            material: caps.material.then(String::new),
        }
    }
}

/// One inventory entry
///
/// Fields are private: every change goes through a setter that validates
/// first and leaves the record untouched on error. `id` and `category`
/// have no setters. Deserialization runs the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordData")]
pub struct Record {
    id: u64,
    category: Category,
    name: String,
    description: String,
    stock: i64,
    price: f64,
    #[serde(flatten)]
    details: Details,
}

impl Record {
    /// Create a record with validated common fields
    ///
    /// Category-conditional fields start at zero (empty material).
    pub fn new(
        id: u64,
        category: Category,
        name: impl Into<String>,
        description: impl Into<String>,
        stock: i64,
        price: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let description = description.into();
        validate_name(&name)?;
        validate_description(&description)?;
        validate_stock(stock)?;
        validate_price(price)?;

        Ok(Self {
            id,
            category,
            name,
            description,
            stock,
            price,
            details: Details::for_category(category),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Calories in kcal, for food categories
    pub fn calories(&self) -> Option<f64> {
        self.details.calories
    }

    /// Volume in ml, for soft drinks
    pub fn volume(&self) -> Option<f64> {
        self.details.volume
    }

    /// Weight in g, for fruit, noodles and vegetables
    pub fn weight(&self) -> Option<f64> {
        self.details.weight
    }

    /// Material, for kitchenware
    pub fn material(&self) -> Option<&str> {
        self.details.material.as_deref()
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_description(
        &mut self,
        description: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let description = description.into();
        validate_description(&description)?;
        self.description = description;
        Ok(())
    }

    pub fn set_stock(&mut self, stock: i64) -> Result<(), ValidationError> {
        validate_stock(stock)?;
        self.stock = stock;
        Ok(())
    }

    pub fn set_price(&mut self, price: f64) -> Result<(), ValidationError> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }

    pub fn set_calories(&mut self, calories: f64) -> Result<(), ValidationError> {
        let category = self.category;
        let slot = applicable(&mut self.details.calories, "calories", category)?;
        *slot = validate_measure("calories", calories)?;
        Ok(())
    }

    pub fn set_volume(&mut self, volume: f64) -> Result<(), ValidationError> {
        let category = self.category;
        let slot = applicable(&mut self.details.volume, "volume", category)?;
        *slot = validate_measure("volume", volume)?;
        Ok(())
    }

    pub fn set_weight(&mut self, weight: f64) -> Result<(), ValidationError> {
        let category = self.category;
        let slot = applicable(&mut self.details.weight, "weight", category)?;
        *slot = validate_measure("weight", weight)?;
        Ok(())
    }

    pub fn set_material(&mut self, material: impl Into<String>) -> Result<(), ValidationError> {
        let category = self.category;
        let slot = applicable(&mut self.details.material, "material", category)?;
        *slot = material.into();
        Ok(())
    }
}

/// Unchecked record fields as they appear in serialized form
#[derive(Deserialize)]
struct RecordData {
    id: u64,
    category: Category,
    name: String,
    description: String,
    stock: i64,
    price: f64,
    #[serde(default)]
    calories: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    material: Option<String>,
}

impl TryFrom<RecordData> for Record {
    type Error = ValidationError;

    fn try_from(data: RecordData) -> Result<Self, Self::Error> {
        let mut record = Record::new(
            data.id,
            data.category,
            data.name,
            data.description,
            data.stock,
            data.price,
        )?;
        if let Some(calories) = data.calories {
            record.set_calories(calories)?;
        }
        if let Some(volume) = data.volume {
            record.set_volume(volume)?;
        }
        if let Some(weight) = data.weight {
            record.set_weight(weight)?;
        }
        if let Some(material) = data.material {
            record.set_material(material)?;
        }
        Ok(record)
    }
}

fn applicable<'a, T>(
    slot: &'a mut Option<T>,
    field: &'static str,
    category: Category,
) -> Result<&'a mut T, ValidationError> {
    slot.as_mut()
        .ok_or(ValidationError::NotApplicable { field, category })
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if len == 0 {
        return Err(ValidationError::EmptyName);
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

pub(crate) fn validate_description(description: &str) -> Result<(), ValidationError> {
    let len = description.chars().count();
    if len == 0 {
        return Err(ValidationError::EmptyDescription);
    }
    if len > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong {
            len,
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}

pub(crate) fn validate_stock(stock: i64) -> Result<(), ValidationError> {
    if stock < 0 {
        return Err(ValidationError::NegativeStock(stock));
    }
    Ok(())
}

pub(crate) fn validate_price(price: f64) -> Result<(), ValidationError> {
    // Written so that NaN is rejected too
    if !(price > 0.0) {
        return Err(ValidationError::NonPositivePrice(price));
    }
    Ok(())
}

fn validate_measure(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !(value >= 0.0) {
        return Err(ValidationError::NegativeMeasure { field, value });
    }
    Ok(value)
}
