// world.rs - Authoritative entity store with handle validation

use crate::ecs::{EntityAllocator, EntityId, EntityRecord};
use crate::transform::Transform;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Errors raised when spawning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("entity id 0 is reserved for the null handle")]
    NullEntity,

    #[error("{0} is already alive")]
    DuplicateEntity(EntityId),

    #[error("{0} was despawned earlier in this session and cannot be reused")]
    RetiredEntity(EntityId),

    #[error("every entity id has been handed out")]
    IdsExhausted,
}

/// The world containing all entities and their transforms.
///
/// Records are kept in handle order so iteration is deterministic.
#[derive(Debug)]
pub struct World {
    allocator: EntityAllocator,
    records: BTreeMap<EntityId, EntityRecord>,
    retired: HashSet<EntityId>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            records: BTreeMap::new(),
            retired: HashSet::new(),
        }
    }

    /// Spawn an entity with a freshly allocated id.
    pub fn spawn(&mut self, record: EntityRecord) -> Result<EntityId, WorldError> {
        let id = self.allocator.allocate().ok_or(WorldError::IdsExhausted)?;
        self.records.insert(id, record);
        Ok(id)
    }

    /// Spawn an entity under a caller-chosen id (e.g. loaded from a scene).
    ///
    /// The id must be non-zero, not alive, and not retired in this session.
    pub fn spawn_with_id(
        &mut self,
        id: EntityId,
        record: EntityRecord,
    ) -> Result<EntityId, WorldError> {
        if id.is_none() {
            return Err(WorldError::NullEntity);
        }
        if self.records.contains_key(&id) {
            return Err(WorldError::DuplicateEntity(id));
        }
        if self.retired.contains(&id) {
            return Err(WorldError::RetiredEntity(id));
        }

        self.allocator.reserve(id);
        self.records.insert(id, record);
        Ok(id)
    }

    /// Despawn an entity.
    ///
    /// The id is retired for the rest of the session, so every handle still
    /// pointing at it stays invalid.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if self.records.remove(&id).is_some() {
            self.retired.insert(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.records.get_mut(&id)
    }

    /// Returns None if the handle is null, stale or was never spawned.
    pub fn transform(&self, id: EntityId) -> Option<&Transform> {
        self.records.get(&id).map(|r| &r.transform)
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        self.records.get_mut(&id).map(|r| &mut r.transform)
    }

    /// First live entity with the given name, in handle order.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.records
            .iter()
            .find(|(_, r)| r.name == name)
            .map(|(&id, _)| id)
    }

    /// Iterate live entities in ascending handle order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &EntityRecord)> {
        self.records.iter().map(|(&id, r)| (id, r))
    }

    /// Get the number of live entities.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_assigns_increasing_ids() {
        let mut world = World::new();
        let a = world.spawn(EntityRecord::new("a")).unwrap();
        let b = world.spawn(EntityRecord::new("b")).unwrap();
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn new_entities_get_identity_transform() {
        let mut world = World::new();
        let e = world.spawn(EntityRecord::default()).unwrap();
        assert_eq!(world.transform(e), Some(&Transform::IDENTITY));
    }

    #[test]
    fn despawned_handles_are_stale() {
        let mut world = World::new();
        let e = world.spawn(EntityRecord::new("doomed")).unwrap();
        assert!(world.despawn(e));
        assert!(!world.contains(e));
        assert!(world.transform(e).is_none());
        assert!(!world.despawn(e));
    }

    #[test]
    fn ids_are_not_reused_after_despawn() {
        let mut world = World::new();
        let e = world.spawn(EntityRecord::default()).unwrap();
        world.despawn(e);
        let next = world.spawn(EntityRecord::default()).unwrap();
        assert_ne!(e, next);
        assert_eq!(
            world.spawn_with_id(e, EntityRecord::default()),
            Err(WorldError::RetiredEntity(e))
        );
    }

    #[test]
    fn spawn_with_id_rejects_null_and_duplicates() {
        let mut world = World::new();
        assert_eq!(
            world.spawn_with_id(EntityId::NONE, EntityRecord::default()),
            Err(WorldError::NullEntity)
        );

        let id = EntityId::from_raw(42);
        assert_eq!(world.spawn_with_id(id, EntityRecord::default()), Ok(id));
        assert_eq!(
            world.spawn_with_id(id, EntityRecord::default()),
            Err(WorldError::DuplicateEntity(id))
        );

        // The allocator moves past externally chosen ids.
        assert_eq!(world.spawn(EntityRecord::default()).unwrap().id(), 43);
    }

    #[test]
    fn max_id_exhausts_spawn_instead_of_wrapping() {
        let mut world = World::new();
        let last = EntityId::from_raw(u64::MAX);
        assert_eq!(world.spawn_with_id(last, EntityRecord::default()), Ok(last));

        assert_eq!(world.spawn(EntityRecord::default()), Err(WorldError::IdsExhausted));
        assert!(!world.contains(EntityId::NONE));
        assert_eq!(world.len(), 1);

        // Externally chosen ids below the cursor still work.
        let low = EntityId::from_raw(7);
        assert_eq!(world.spawn_with_id(low, EntityRecord::default()), Ok(low));
    }

    #[test]
    fn transform_mut_writes_through() {
        let mut world = World::new();
        let e = world.spawn(EntityRecord::default()).unwrap();
        world.transform_mut(e).unwrap().position = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(world.transform(e).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn null_handle_never_resolves() {
        let mut world = World::new();
        world.spawn(EntityRecord::default()).unwrap();
        assert!(world.transform(EntityId::NONE).is_none());
    }

    #[test]
    fn find_by_name_and_iteration_order() {
        let mut world = World::new();
        world
            .spawn_with_id(EntityId::from_raw(10), EntityRecord::new("late"))
            .unwrap();
        world
            .spawn_with_id(EntityId::from_raw(5), EntityRecord::new("early"))
            .unwrap();

        assert_eq!(world.find_by_name("late"), Some(EntityId::from_raw(10)));
        assert_eq!(world.find_by_name("missing"), None);

        let order: Vec<u64> = world.iter().map(|(id, _)| id.id()).collect();
        assert_eq!(order, vec![5, 10]);
    }
}
