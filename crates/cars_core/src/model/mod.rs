//! Domain model for persisted cars.
//!
//! # Responsibility
//! - Define the entity shapes the repositories read and write.
//! - Expose identity through `Identifiable` so contracts stay generic.
//!
//! # Invariants
//! - Identifiers are assigned by the store, never by callers on insert.
//! - An entity without an identifier has not been persisted yet.

pub mod car;

/// Read/write access to an entity's store-assigned identifier.
pub trait Identifiable<Id> {
    /// Returns `None` while the entity is transient.
    fn id(&self) -> Option<&Id>;
    fn set_id(&mut self, id: Id);
}
