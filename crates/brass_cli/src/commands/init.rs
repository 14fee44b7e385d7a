//! Init command implementation.

use brass_core::scan::scan_most_recent;
use brass_core::{Config, OsFileSystem, RevisionState};
use std::path::Path;
use tracing::info;

/// Runs the init command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if let Some(existing) = scan_most_recent(&OsFileSystem::new(), path)? {
            return Err(format!(
                "Database already exists at {} ({})",
                path.display(),
                existing.revision
            )
            .into());
        }
    }

    let mut state = RevisionState::os(Config::default());
    state.create(path)?;
    info!(path = %path.display(), "initialized database");

    println!("Created database at {}", path.display());
    if let Some(uuid) = state.uuid() {
        println!("  UUID:     {uuid}");
    }
    println!("  Revision: {}", state.revision().as_u32());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_revision_zero() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("index");

        run(&db).unwrap();
        assert_eq!(std::fs::metadata(db.join("v00000000")).unwrap().len(), 32);
    }

    #[test]
    fn refuses_existing_database() {
        let dir = tempdir().unwrap();
        run(dir.path()).unwrap();

        let err = run(dir.path()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
