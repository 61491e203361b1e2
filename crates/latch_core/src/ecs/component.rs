// component.rs - Per-entity data held by the world
//
// The bridge only needs a name, a transform and (optionally) the script class
// that drives the entity, so records are plain structs rather than archetype rows.

use crate::transform::Transform;
use serde::{Deserialize, Serialize};

/// Names the script class instantiated for an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptComponent {
    pub class_name: String,
}

impl ScriptComponent {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

/// Everything the world stores for one entity.
///
/// # Example
/// ```
/// use latch_core::ecs::EntityRecord;
/// use latch_core::glam::Vec3;
/// use latch_core::transform::Transform;
///
/// let record = EntityRecord::new("Player")
///     .with_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
///     .with_script("PlayerController");
/// assert_eq!(record.script.unwrap().class_name, "PlayerController");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub name: String,
    pub transform: Transform,
    pub script: Option<ScriptComponent>,
}

impl EntityRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            script: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_script(mut self, class_name: impl Into<String>) -> Self {
        self.script = Some(ScriptComponent::new(class_name));
        self
    }
}

impl Default for EntityRecord {
    fn default() -> Self {
        Self::new("Entity")
    }
}
