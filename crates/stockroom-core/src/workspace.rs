//! Working inventory on disk
//!
//! The CLI runs one command per process, so the live inventory is kept
//! between invocations in the data directory:
//!
//! - `inventory.json` - the records, as a JSON array
//! - `id_watermark` - the last issued id, as a decimal number
//!
//! Both are written atomically by [`Workspace::save`]. The watermark is kept
//! separately so that removing the newest record does not let its id be
//! issued again.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::backup::persistence::atomic_write;
use crate::backup::BackupArchive;
use crate::config::Config;
use crate::inventory::Inventory;
use crate::models::Record;

/// Persistent wrapper around an [`Inventory`]
pub struct Workspace {
    inventory: Inventory,
    config: Config,
}

impl Workspace {
    /// Open the workspace from the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the workspace with a specific configuration
    ///
    /// A data directory without an inventory file opens as an empty
    /// inventory; nothing is written until [`save`](Self::save).
    pub fn open_with_config(config: Config) -> Result<Self> {
        let records = load_records(&config.inventory_path())?;
        let watermark = load_watermark(&config.watermark_path())?;

        let mut inventory = Inventory::new();
        inventory.reload(&records, watermark);
        info!(
            data_dir = %config.data_dir.display(),
            records = inventory.len(),
            "Workspace opened"
        );

        Ok(Self { inventory, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// The archive backups are written to
    pub fn backup_archive(&self) -> BackupArchive {
        BackupArchive::from_config(&self.config)
    }

    /// Persist the records and the watermark
    pub fn save(&self) -> Result<()> {
        let path = self.config.inventory_path();
        let text = serde_json::to_string_pretty(self.inventory.store().records())
            .context("Failed to serialize inventory")?;
        atomic_write(&path, text.as_bytes())
            .with_context(|| format!("Failed to save inventory to {:?}", path))?;

        let path = self.config.watermark_path();
        atomic_write(&path, self.inventory.watermark().to_string().as_bytes())
            .with_context(|| format!("Failed to save id watermark to {:?}", path))?;

        debug!(
            records = self.inventory.len(),
            watermark = self.inventory.watermark(),
            "Workspace saved"
        );
        Ok(())
    }
}

fn load_records(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory from {:?}", path))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse inventory from {:?}", path))
}

fn load_watermark(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Ok(0);
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read id watermark from {:?}", path))?;
    text.trim()
        .parse()
        .with_context(|| format!("Invalid id watermark in {:?}", path))
}
