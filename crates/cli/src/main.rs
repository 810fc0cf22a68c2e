//! Bistro CLI - Data directory management tools.
//!
//! # Usage
//!
//! ```bash
//! # Write the built-in menu and site content
//! bistro-cli init
//!
//! # Dump the current site state as JSON
//! bistro-cli export --output backup.json
//!
//! # Replace the site state from a JSON file
//! bistro-cli import backup.json
//!
//! # Remove the stored site state (and guest lists with --all)
//! bistro-cli reset --all
//! ```
//!
//! Every command reads `STOREFRONT_DATA_DIR` unless `--data-dir` is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bistro-cli")]
#[command(author, version, about = "Bistro CLI tools")]
struct Cli {
    /// Directory holding the storefront's JSON documents
    #[arg(long, env = "STOREFRONT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the built-in defaults to an empty data directory
    Init {
        /// Overwrite existing site state
        #[arg(short, long)]
        force: bool,
    },
    /// Print the stored site state as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replace the stored site state with a JSON document
    Import {
        /// Path to a document produced by `export`
        file: PathBuf,
    },
    /// Delete the stored site state
    Reset {
        /// Also delete newsletter subscribers and contact messages
        #[arg(long)]
        all: bool,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let storage = commands::open_storage(&cli.data_dir);
    match cli.command {
        Commands::Init { force } => commands::data::init(storage, force),
        Commands::Export { output } => commands::data::export(storage, output.as_deref()),
        Commands::Import { file } => commands::data::import(storage, &file),
        Commands::Reset { all } => commands::data::reset(storage.as_ref(), all),
    }
}
