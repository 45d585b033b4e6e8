//! Backup command handlers

use anyhow::{anyhow, Context, Result};

use stockroom_core::{BackupError, Workspace};

use crate::output::{print_json, Output, OutputFormat};
use crate::prompt::confirm;

/// Write a backup of the current inventory
pub fn create(workspace: &Workspace, output: &Output) -> Result<()> {
    let backup = workspace.inventory().create_backup();
    let path = workspace
        .backup_archive()
        .write(&backup)
        .map_err(with_suggestion)?;

    match output.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "path": path,
            "records": backup.len(),
            "created_at": backup.created_at(),
        }))?,
        OutputFormat::Quiet => println!("{}", path.display()),
        OutputFormat::Human => {
            output.success(&format!(
                "Backed up {} record(s) to {}",
                backup.len(),
                path.display()
            ));
        }
    }
    Ok(())
}

/// List backups in the archive
pub fn list(workspace: &Workspace, output: &Output) -> Result<()> {
    let names = workspace.backup_archive().list().map_err(with_suggestion)?;
    output.print_backups(&names)
}

/// Replace the inventory with a backup's records
///
/// Restores the newest backup when no file is named.
pub fn restore(
    workspace: &mut Workspace,
    file: Option<String>,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let archive = workspace.backup_archive();
    let file = match file {
        Some(file) => file,
        None => archive
            .latest()
            .map_err(with_suggestion)?
            .ok_or_else(|| anyhow!("No backups found in {}", archive.dir().display()))?,
    };

    let backup = archive.read(&file).map_err(with_suggestion)?;

    if output.should_prompt() && !yes {
        println!(
            "Replace {} current record(s) with {} record(s) from {}",
            workspace.inventory().len(),
            backup.len(),
            file
        );
        if backup.is_empty() {
            println!("The backup is empty: the inventory will be cleared.");
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    workspace.inventory_mut().restore_backup(&backup);
    workspace.save().context("Failed to save inventory")?;

    output.success(&format!(
        "Restored {} record(s) from {}. Last issued id: {}",
        backup.len(),
        file,
        workspace.inventory().watermark()
    ));
    Ok(())
}

/// Attach the error's recovery hint, if it has one
fn with_suggestion(err: BackupError) -> anyhow::Error {
    match err.recovery_suggestion() {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => err.into(),
    }
}
