//! Stockroom Core Library
//!
//! This crate provides the core functionality for Stockroom, a single-user
//! inventory record keeper for a small shop.
//!
//! # Architecture
//!
//! - **RecordStore**: records kept sorted by id, located by binary search
//! - **Search**: text and category filters plus a binary-insertion sort
//! - **Backups**: flat comma-separated files, one record per line
//!
//! Everything runs in memory; the [`Workspace`] persists the inventory
//! between CLI invocations.
//!
//! # Quick Start
//!
//! ```text
//! let mut workspace = Workspace::open()?;
//! let inventory = workspace.inventory_mut();
//!
//! // Add a record
//! let mut cola = inventory.new_record(Category::SoftDrink, "Cola", "Fizzy cola", 24, 1.5)?;
//! cola.set_volume(330.0)?;
//! inventory.add_record(cola);
//!
//! // Query records
//! let cheap = inventory.list_all(Some(SortKey::PriceAsc));
//! workspace.save()?;
//! ```
//!
//! # Modules
//!
//! - `inventory`: Records plus id generator (main entry point)
//! - `models`: Records and their categories
//! - `store`: Sorted record storage
//! - `search`: Filtering and sorting
//! - `backup`: Backup format and backup directory
//! - `workspace`: Working inventory on disk
//! - `config`: Application configuration

pub mod backup;
pub mod config;
pub mod error;
pub mod identifier;
pub mod inventory;
pub mod models;
pub mod search;
pub mod store;
pub mod workspace;

pub use backup::{Backup, BackupArchive, BackupError};
pub use config::Config;
pub use error::{DecodeError, ValidationError};
pub use identifier::IdGenerator;
pub use inventory::{Inventory, InventorySheet};
pub use models::{Category, Record};
pub use search::{FilterField, QuerySpec, SearchResult, SortKey};
pub use store::RecordStore;
pub use workspace::Workspace;
