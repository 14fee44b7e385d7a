//! Database UUID generation.

use uuid::Uuid;

/// Produces the UUID assigned to a new database by
/// [`crate::RevisionState::create`].
pub trait UuidSource: Send + Sync {
    /// Returns a new UUID.
    fn generate(&self) -> Uuid;
}

/// Random (version 4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUuid;

impl UuidSource for RandomUuid {
    fn generate(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Always returns the same UUID. For tests and reproducible fixtures.
#[derive(Debug, Clone, Copy)]
pub struct FixedUuid(pub Uuid);

impl UuidSource for FixedUuid {
    fn generate(&self) -> Uuid {
        self.0
    }
}
