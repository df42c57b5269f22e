//! Content model and the store interface link resolution reads from.

mod entity;
mod memory;
mod store;

pub use entity::{
    Author, AuthorId, CATEGORY, Entity, EntityId, EntityKind, Status, TAG, Term, TermId,
};
pub use memory::MemoryStore;
pub use store::{
    EntityFilter, EntityStore, Order, StoreError, TermConstraint, TimeBound, Viewer,
};
