//! Entity handles
//!
//! Entities are lightweight 64-bit handles that reference records in the World.
//! Zero is reserved as the "no entity" sentinel, and an id is never handed out
//! twice within a session, so a stale handle can never alias a newer entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity handle (opaque 64-bit id)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// The "no entity" sentinel.
    pub const NONE: EntityId = EntityId(0);

    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Hands out monotonically increasing entity ids, starting at 1.
///
/// Once `u64::MAX` has been handed out or reserved the allocator is exhausted
/// and never wraps back to the sentinel.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: Option<u64>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self { next_id: Some(1) }
    }

    /// `None` once the id space is used up.
    pub fn allocate(&mut self) -> Option<EntityId> {
        let id = self.next_id?;
        self.next_id = id.checked_add(1);
        Some(EntityId(id))
    }

    /// Make sure ids handed out later never collide with an externally chosen one.
    pub fn reserve(&mut self, id: EntityId) {
        if let Some(next) = self.next_id {
            if id.0 >= next {
                self.next_id = id.0.checked_add(1);
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_id.is_none()
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
