//! Entity store.
//!
//! The native world is the single owner of entity state. Scripts address
//! entities only through [`EntityId`] handles and never hold references into
//! the store.

mod component;
mod entity;
mod world;

pub use component::{EntityRecord, ScriptComponent};
pub use entity::{EntityAllocator, EntityId};
pub use world::{World, WorldError};
