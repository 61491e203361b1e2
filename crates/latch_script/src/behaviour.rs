//! Entity lifecycle hooks
//!
//! A behaviour fills in whichever of the four hooks it cares about; the rest
//! default to no-ops. The host guarantees, per entity:
//!
//! - `on_create` exactly once, before anything else
//! - `on_start` exactly once, on the first tick, right before the first `on_update`
//! - `on_update(dt)` once per tick while attached
//! - `on_destroy` exactly once, last; the handle is invalid once it returns
//!
//! Hooks receive an [`EntityContext`] carrying the entity's handle. The handle
//! is fixed when the context is built and cannot be changed by the behaviour.

use crate::bridge::TransformBridge;
use crate::error::ScriptError;
use crate::ffi::ScriptHandle;
use latch_core::glam::Vec3;
use std::fmt;

/// The four engine-invoked hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleHook {
    Create,
    Start,
    Update,
    Destroy,
}

impl LifecycleHook {
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "OnCreate",
            Self::Start => "OnStart",
            Self::Update => "OnUpdate",
            Self::Destroy => "OnDestroy",
        }
    }

    /// Method name on the JavaScript `Entity` class.
    pub fn js_method(self) -> &'static str {
        match self {
            Self::Create => "onCreate",
            Self::Start => "onStart",
            Self::Update => "onUpdate",
            Self::Destroy => "onDestroy",
        }
    }
}

impl fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a hook can see and do for its own entity.
pub struct EntityContext<'a> {
    handle: ScriptHandle,
    bridge: &'a TransformBridge,
    destroy_requested: bool,
}

impl<'a> EntityContext<'a> {
    pub(crate) fn new(handle: ScriptHandle, bridge: &'a TransformBridge) -> Self {
        Self {
            handle,
            bridge,
            destroy_requested: false,
        }
    }

    pub fn handle(&self) -> ScriptHandle {
        self.handle
    }

    pub fn bridge(&self) -> &TransformBridge {
        self.bridge
    }

    pub fn position(&self) -> Result<Vec3, ScriptError> {
        Ok(self.bridge.get_position(self.handle)?)
    }

    pub fn set_position(&self, position: Vec3) -> Result<(), ScriptError> {
        Ok(self.bridge.set_position(self.handle, position)?)
    }

    pub fn rotation(&self) -> Result<Vec3, ScriptError> {
        Ok(self.bridge.get_rotation(self.handle)?)
    }

    pub fn set_rotation(&self, degrees: Vec3) -> Result<(), ScriptError> {
        Ok(self.bridge.set_rotation(self.handle, degrees)?)
    }

    pub fn scale(&self) -> Result<Vec3, ScriptError> {
        Ok(self.bridge.get_scale(self.handle)?)
    }

    pub fn set_scale(&self, scale: Vec3) -> Result<(), ScriptError> {
        Ok(self.bridge.set_scale(self.handle, scale)?)
    }

    /// Ask the host to destroy this entity once the current tick's updates are done.
    pub fn destroy(&mut self) {
        self.destroy_requested = true;
    }

    pub(crate) fn destroy_requested(&self) -> bool {
        self.destroy_requested
    }
}

/// Script-side behaviour of one entity.
pub trait ScriptBehaviour {
    /// Shown in logs and hook failure reports.
    fn class_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn on_create(&mut self, _ctx: &mut EntityContext<'_>) -> Result<(), ScriptError> {
        Ok(())
    }

    fn on_start(&mut self, _ctx: &mut EntityContext<'_>) -> Result<(), ScriptError> {
        Ok(())
    }

    fn on_update(&mut self, _ctx: &mut EntityContext<'_>, _dt: f32) -> Result<(), ScriptError> {
        Ok(())
    }

    fn on_destroy(&mut self, _ctx: &mut EntityContext<'_>) -> Result<(), ScriptError> {
        Ok(())
    }
}

/// Dispatch one hook to a behaviour.
pub(crate) fn dispatch(
    behaviour: &mut dyn ScriptBehaviour,
    hook: LifecycleHook,
    ctx: &mut EntityContext<'_>,
    dt: f32,
) -> Result<(), ScriptError> {
    match hook {
        LifecycleHook::Create => behaviour.on_create(ctx),
        LifecycleHook::Start => behaviour.on_start(ctx),
        LifecycleHook::Update => behaviour.on_update(ctx, dt),
        LifecycleHook::Destroy => behaviour.on_destroy(ctx),
    }
}
