//! Verify command implementation.

use brass_core::{verify_lineage, CheckOutcome, Config, LineageReport, OsFileSystem};
use std::path::Path;

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying database at {}", path.display());
    println!();

    let report = verify_lineage(&OsFileSystem::new(), path, &Config::default())?;
    print_report(&report);

    println!();
    if report.revisions.is_empty() {
        println!("No revision files found (this may be normal for a new directory)");
        Ok(())
    } else if report.is_ok() {
        println!("✓ Database verification passed");
        Ok(())
    } else {
        println!("✗ Database verification failed");
        Err("Verification failed".into())
    }
}

fn print_report(report: &LineageReport) {
    match report.uuid {
        Some(uuid) => println!("Lineage UUID: {uuid}"),
        None => println!("Lineage UUID: (none)"),
    }
    println!(
        "  Revisions checked: {}, problems: {}",
        report.revisions.len(),
        report.problems().count()
    );

    for check in &report.revisions {
        match &check.outcome {
            CheckOutcome::Valid { roots, .. } => {
                let present = roots.iter().filter(|(_, root)| root.is_some()).count();
                println!("  {}  ok ({present} tables with roots)", check.revision);
            }
            CheckOutcome::UuidMismatch { found } => {
                println!("    ERROR: {}: UUID {found} does not match lineage", check.revision);
            }
            CheckOutcome::Failed { error } => {
                println!("    ERROR: {}: {error}", check.revision);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brass_core::{RevisionNumber, RevisionState};
    use tempfile::tempdir;

    #[test]
    fn passes_for_fresh_database() {
        let dir = tempdir().unwrap();
        let mut state = RevisionState::os(Config::default());
        state.create(dir.path()).unwrap();
        state.write(dir.path(), RevisionNumber::new(1)).unwrap();

        assert!(run(dir.path()).is_ok());
    }

    #[test]
    fn fails_for_truncated_revision() {
        let dir = tempdir().unwrap();
        let mut state = RevisionState::os(Config::default());
        state.create(dir.path()).unwrap();
        std::fs::write(dir.path().join("v00000001"), b"short").unwrap();

        assert!(run(dir.path()).is_err());
    }
}
