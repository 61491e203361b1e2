//! Transform bridge
//!
//! The six native calls scripts use to read and write an entity's transform:
//!
//! | Call          | Inputs          | Output   |
//! |---------------|-----------------|----------|
//! | `GetPosition` | handle          | `Vec3`   |
//! | `SetPosition` | handle, `Vec3`  |          |
//! | `GetRotation` | handle          | `Vec3`   |
//! | `SetRotation` | handle, `Vec3`  |          |
//! | `GetScale`    | handle          | `Vec3`   |
//! | `SetScale`    | handle, `Vec3`  |          |
//!
//! Vectors are always copied. Rotation is Euler degrees (see
//! [`latch_core::transform::Transform`]). What happens on an invalid handle is
//! decided once per bridge by [`InvalidHandlePolicy`], so all six calls behave
//! the same way.

use crate::ffi::ScriptHandle;
use latch_core::ecs::World;
use latch_core::glam::Vec3;
use latch_core::transform::Transform;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;

/// World shared between the host and every bridge on the simulation thread.
pub type SharedWorld = Rc<RefCell<World>>;

pub const GET_POSITION: &str = "GetPosition";
pub const SET_POSITION: &str = "SetPosition";
pub const GET_ROTATION: &str = "GetRotation";
pub const SET_ROTATION: &str = "SetRotation";
pub const GET_SCALE: &str = "GetScale";
pub const SET_SCALE: &str = "SetScale";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("invalid entity handle {0}")]
    InvalidHandle(u64),
}

/// What a bridge call does when its handle is null, stale or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidHandlePolicy {
    /// Every call returns [`BridgeError::InvalidHandle`]; scripts see an exception.
    Fail,
    /// Getters return `Vec3::ZERO`, setters do nothing; each use is logged.
    Fallback,
}

impl Default for InvalidHandlePolicy {
    /// `Fail` in debug builds, `Fallback` in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Fail
        } else {
            Self::Fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformField {
    Position,
    Rotation,
    Scale,
}

impl TransformField {
    fn read(self, transform: &Transform) -> Vec3 {
        match self {
            Self::Position => transform.position,
            Self::Rotation => transform.rotation,
            Self::Scale => transform.scale,
        }
    }

    fn write(self, transform: &mut Transform, value: Vec3) {
        match self {
            Self::Position => transform.position = value,
            Self::Rotation => transform.rotation = value,
            Self::Scale => transform.scale = value,
        }
    }

    fn getter(self) -> &'static str {
        match self {
            Self::Position => GET_POSITION,
            Self::Rotation => GET_ROTATION,
            Self::Scale => GET_SCALE,
        }
    }

    fn setter(self) -> &'static str {
        match self {
            Self::Position => SET_POSITION,
            Self::Rotation => SET_ROTATION,
            Self::Scale => SET_SCALE,
        }
    }
}

/// Services transform calls against the shared world.
#[derive(Clone)]
pub struct TransformBridge {
    world: SharedWorld,
    policy: InvalidHandlePolicy,
}

impl TransformBridge {
    pub fn new(world: SharedWorld, policy: InvalidHandlePolicy) -> Self {
        Self { world, policy }
    }

    pub fn world(&self) -> &SharedWorld {
        &self.world
    }

    pub fn policy(&self) -> InvalidHandlePolicy {
        self.policy
    }

    pub fn get(&self, handle: ScriptHandle, field: TransformField) -> Result<Vec3, BridgeError> {
        let world = self.world.borrow();
        match world.transform(handle.into()) {
            Some(transform) => Ok(field.read(transform)),
            None => self.invalid(handle, field.getter()).map(|()| Vec3::ZERO),
        }
    }

    pub fn set(
        &self,
        handle: ScriptHandle,
        field: TransformField,
        value: Vec3,
    ) -> Result<(), BridgeError> {
        let mut world = self.world.borrow_mut();
        match world.transform_mut(handle.into()) {
            Some(transform) => {
                field.write(transform, value);
                Ok(())
            }
            None => self.invalid(handle, field.setter()),
        }
    }

    pub fn get_position(&self, handle: ScriptHandle) -> Result<Vec3, BridgeError> {
        self.get(handle, TransformField::Position)
    }

    pub fn set_position(&self, handle: ScriptHandle, position: Vec3) -> Result<(), BridgeError> {
        self.set(handle, TransformField::Position, position)
    }

    pub fn get_rotation(&self, handle: ScriptHandle) -> Result<Vec3, BridgeError> {
        self.get(handle, TransformField::Rotation)
    }

    pub fn set_rotation(&self, handle: ScriptHandle, degrees: Vec3) -> Result<(), BridgeError> {
        self.set(handle, TransformField::Rotation, degrees)
    }

    pub fn get_scale(&self, handle: ScriptHandle) -> Result<Vec3, BridgeError> {
        self.get(handle, TransformField::Scale)
    }

    pub fn set_scale(&self, handle: ScriptHandle, scale: Vec3) -> Result<(), BridgeError> {
        self.set(handle, TransformField::Scale, scale)
    }

    fn invalid(&self, handle: ScriptHandle, call: &'static str) -> Result<(), BridgeError> {
        match self.policy {
            InvalidHandlePolicy::Fail => Err(BridgeError::InvalidHandle(handle.raw())),
            InvalidHandlePolicy::Fallback => {
                tracing::warn!(handle = %handle, call, "Bridge call on invalid entity handle ignored");
                Ok(())
            }
        }
    }
}

pub type NativeGetter = fn(&TransformBridge, ScriptHandle) -> Result<Vec3, BridgeError>;
pub type NativeSetter = fn(&TransformBridge, ScriptHandle, Vec3) -> Result<(), BridgeError>;

/// One registered native call.
#[derive(Clone, Copy)]
pub enum NativeCall {
    Get(NativeGetter),
    Set(NativeSetter),
}

/// Native calls keyed by their stable script-visible name.
///
/// The script runtime installs every entry; nothing else is reachable from script.
#[derive(Clone, Default)]
pub struct NativeCallTable {
    calls: BTreeMap<&'static str, NativeCall>,
}

impl NativeCallTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The six transform calls.
    pub fn transform() -> Self {
        let mut table = Self::new();
        table.register(GET_POSITION, NativeCall::Get(TransformBridge::get_position));
        table.register(SET_POSITION, NativeCall::Set(TransformBridge::set_position));
        table.register(GET_ROTATION, NativeCall::Get(TransformBridge::get_rotation));
        table.register(SET_ROTATION, NativeCall::Set(TransformBridge::set_rotation));
        table.register(GET_SCALE, NativeCall::Get(TransformBridge::get_scale));
        table.register(SET_SCALE, NativeCall::Set(TransformBridge::set_scale));
        table
    }

    /// Register a call, returning the one it replaced.
    pub fn register(&mut self, name: &'static str, call: NativeCall) -> Option<NativeCall> {
        self.calls.insert(name, call)
    }

    pub fn get(&self, name: &str) -> Option<NativeCall> {
        self.calls.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, NativeCall)> + '_ {
        self.calls.iter().map(|(&name, &call)| (name, call))
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
