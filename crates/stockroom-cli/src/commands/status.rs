//! Status and report command handlers

use anyhow::Result;

use stockroom_core::Workspace;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(workspace: &Workspace, output: &Output) -> Result<()> {
    let config = workspace.config();
    let inventory = workspace.inventory();
    let archive = workspace.backup_archive();
    let backups = archive.list()?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "backup_dir": archive.dir(),
                    "counts": {
                        "records": inventory.len(),
                        "backups": backups.len()
                    },
                    "last_id": inventory.watermark(),
                    "latest_backup": backups.last()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", inventory.len());
        }
        OutputFormat::Human => {
            println!("Stockroom Status");
            println!("================");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Backups:  {}", archive.dir().display());
            println!();
            println!("Contents:");
            println!("  Records: {}", inventory.len());
            println!("  Last id: {}", inventory.watermark());
            println!();
            println!("Backups:");
            println!("  Count:  {}", backups.len());
            println!(
                "  Latest: {}",
                backups.last().map(String::as_str).unwrap_or("(none)")
            );
        }
    }

    Ok(())
}

/// Print the inventory sheet
pub fn report(workspace: &Workspace, output: &Output) -> Result<()> {
    let sheet = workspace.inventory().create_sheet();
    output.print_sheet(&sheet)
}
