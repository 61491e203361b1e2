//! Scene documents
//!
//! JSON snapshot of a world: every entity with its id, name, transform and
//! optional script class. Ids are preserved on load so scripts and saved data
//! keep referring to the same handles.
//!
//! ```json
//! {
//!   "name": "Demo",
//!   "entities": [
//!     { "id": 42, "name": "Player",
//!       "transform": { "position": [1.0, 2.0, 3.0] },
//!       "script": { "class_name": "Spinner" } }
//!   ]
//! }
//! ```

use crate::ecs::{EntityId, EntityRecord, ScriptComponent, World, WorldError};
use crate::transform::Transform;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("malformed scene document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot place entity '{name}': {source}")]
    World {
        name: String,
        #[source]
        source: WorldError,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub name: String,
    #[serde(default)]
    pub entities: Vec<SceneEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneEntity {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<ScriptComponent>,
}

impl SceneDocument {
    /// Snapshot a world in handle order.
    pub fn from_world(name: impl Into<String>, world: &World) -> Self {
        let entities = world
            .iter()
            .map(|(id, record)| SceneEntity {
                id,
                name: record.name.clone(),
                transform: record.transform,
                script: record.script.clone(),
            })
            .collect();

        Self {
            name: name.into(),
            entities,
        }
    }

    /// Build a fresh world containing every entity of the document.
    pub fn into_world(self) -> Result<World, SceneError> {
        let mut world = World::new();
        for entity in self.entities {
            let record = EntityRecord {
                name: entity.name,
                transform: entity.transform,
                script: entity.script,
            };
            let name = record.name.clone();
            world
                .spawn_with_id(entity.id, record)
                .map_err(|source| SceneError::World { name, source })?;
        }
        Ok(world)
    }
}

/// Parse a scene and build its world. Returns the scene name alongside.
pub fn load_world(json: &str) -> Result<(String, World), SceneError> {
    let document: SceneDocument = serde_json::from_str(json)?;
    let name = document.name.clone();
    let world = document.into_world()?;
    tracing::info!(scene = %name, entities = world.len(), "Scene loaded");
    Ok((name, world))
}

/// Serialize a world as a pretty-printed scene document.
pub fn save_world(name: &str, world: &World) -> Result<String, SceneError> {
    let document = SceneDocument::from_world(name, world);
    Ok(serde_json::to_string_pretty(&document)?)
}
