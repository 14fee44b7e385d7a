//! Inspect command implementation.

use brass_core::{Config, FormatVersion, RevisionState, Table};
use serde::Serialize;
use std::path::Path;

/// Database inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Database path.
    pub path: String,
    /// Most recent revision number.
    pub revision: u32,
    /// Database UUID.
    pub uuid: String,
    /// On-disk format version (YYYYMMDD).
    pub format_version: String,
    /// Root of every table.
    pub tables: Vec<TableRoot>,
}

/// Root block of a single table.
#[derive(Debug, Serialize)]
pub struct TableRoot {
    /// Table name.
    pub name: &'static str,
    /// Root block, absent for an empty table.
    pub root: Option<u32>,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Loads the most recent revision in `path`.
pub fn inspect(path: &Path) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let mut state = RevisionState::os(Config::default());
    state.open_most_recent(path)?;

    let uuid = state
        .uuid()
        .ok_or_else(|| format!("No database found at {}", path.display()))?;

    let tables = Table::ALL
        .iter()
        .map(|&table| TableRoot {
            name: table.name(),
            root: state.root(table).map(|block| block.as_u32()),
        })
        .collect();

    Ok(InspectResult {
        path: path.display().to_string(),
        revision: state.revision().as_u32(),
        uuid: uuid.to_string(),
        format_version: FormatVersion::CURRENT.to_string(),
        tables,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("Brass Database Inspection");
    println!("=========================");
    println!();
    println!("Path:     {}", result.path);
    println!("Revision: {}", result.revision);
    println!("UUID:     {}", result.uuid);
    println!("Format:   {}", result.format_version);
    println!();
    println!("Tables:");
    for table in &result.tables {
        match table.root {
            Some(root) => println!("  {:<10} root block {}", table.name, root),
            None => println!("  {:<10} (empty)", table.name),
        }
    }
}
