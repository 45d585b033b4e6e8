//! Stockroom CLI
//!
//! Command-line interface for Stockroom - shop inventory records.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockroom_core::{Category, Config, FilterField, SortKey, Workspace};

mod commands;
mod output;
mod prompt;

use commands::item::{FieldChanges, NewItem};
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Stockroom - inventory records for a small shop")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage inventory items
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Search items by text and category
    Search {
        /// Text to look for (case-insensitive); omit to match everything
        query: Option<String>,
        /// Field the query is matched against (name, description)
        #[arg(short, long, default_value = "name")]
        field: FilterField,
        /// Sort key (id, name, price-asc, price-desc, stock-asc, stock-desc)
        #[arg(short, long, default_value = "id")]
        sort: SortKey,
        /// Only include this category (repeatable)
        #[arg(short = 't', long = "type", value_name = "CATEGORY")]
        types: Vec<Category>,
    },
    /// Create, list and restore backups
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
    /// Print the inventory sheet
    Report,
    /// Show status (record count, storage, backups)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// Add a new item
    #[command(alias = "create")]
    Add(NewItem),
    /// List all items
    #[command(alias = "ls")]
    List {
        /// Sort key (id, name, price-asc, price-desc, stock-asc, stock-desc)
        #[arg(short, long)]
        sort: Option<SortKey>,
    },
    /// Show item details
    Show {
        /// Item ID
        id: u64,
    },
    /// Edit an item (prompts for each field when no field flags are given)
    Edit {
        /// Item ID
        id: u64,
        #[command(flatten)]
        changes: FieldChanges,
    },
    /// Remove an item
    #[command(alias = "rm")]
    Remove {
        /// Item ID
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum BackupCommands {
    /// Back up the current inventory
    Create,
    /// List backups, oldest first
    #[command(alias = "ls")]
    List,
    /// Replace the inventory with a backup
    Restore {
        /// Backup file name (defaults to the newest backup)
        file: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backup_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_deref();

    match cli.command {
        // Config commands work without opening the inventory
        Commands::Config { command } => handle_config_command(command, config_path, &output),
        Commands::Item { command } => {
            let mut workspace = open_workspace(config_path)?;
            handle_item_command(command, &mut workspace, &output)
        }
        Commands::Search {
            query,
            field,
            sort,
            types,
        } => {
            let workspace = open_workspace(config_path)?;
            let spec = commands::search::build_spec(query, field, sort, &types);
            commands::search::run(&workspace, &spec, &output)
        }
        Commands::Backup { command } => {
            let mut workspace = open_workspace(config_path)?;
            handle_backup_command(command, &mut workspace, &output)
        }
        Commands::Report => commands::status::report(&open_workspace(config_path)?, &output),
        Commands::Status => commands::status::show(&open_workspace(config_path)?, &output),
    }
}

fn open_workspace(config_path: Option<&Path>) -> Result<Workspace> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);
    Workspace::open_with_config(config).context("Failed to open inventory")
}

fn handle_item_command(
    command: ItemCommands,
    workspace: &mut Workspace,
    output: &Output,
) -> Result<()> {
    match command {
        ItemCommands::Add(item) => commands::item::add(workspace, item, output),
        ItemCommands::List { sort } => commands::item::list(workspace, sort, output),
        ItemCommands::Show { id } => commands::item::show(workspace, id, output),
        ItemCommands::Edit { id, changes } => commands::item::edit(workspace, id, changes, output),
        ItemCommands::Remove { id, yes } => commands::item::remove(workspace, id, yes, output),
    }
}

fn handle_backup_command(
    command: BackupCommands,
    workspace: &mut Workspace,
    output: &Output,
) -> Result<()> {
    match command {
        BackupCommands::Create => commands::backup::create(workspace, output),
        BackupCommands::List => commands::backup::list(workspace, output),
        BackupCommands::Restore { file, yes } => {
            commands::backup::restore(workspace, file, yes, output)
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&Path>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging
///
/// Only initializes if STOCKROOM_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var("STOCKROOM_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::options().create(true).append(true).open(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "stockroom_core={},stockroom={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("Logging initialized to {:?}", log_path);
}
