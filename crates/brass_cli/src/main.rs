//! Brass CLI
//!
//! Command-line tools for Brass database directories.
//!
//! # Commands
//!
//! - `inspect` - Display the most recent revision and its table roots
//! - `verify` - Check every revision file in the directory
//! - `init` - Create a new, empty database

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Brass command-line database tools.
#[derive(Parser)]
#[command(name = "brass")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the most recent revision and its table roots
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Verify every revision file belongs to one intact lineage
    Verify,

    /// Create a new database
    Init,

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Database path required for inspect")?;
            commands::inspect::run(&path, &format)?;
        }
        Commands::Verify => {
            let path = cli.path.ok_or("Database path required for verify")?;
            commands::verify::run(&path)?;
        }
        Commands::Init => {
            let path = cli.path.ok_or("Database path required for init")?;
            commands::init::run(&path)?;
        }
        Commands::Version => {
            println!("Brass CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Brass Core v{}", brass_core::VERSION);
            println!("Format version {}", brass_core::FormatVersion::CURRENT);
        }
    }

    Ok(())
}
