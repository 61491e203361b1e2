//! Script host
//!
//! Owns one behaviour per entity and drives the lifecycle. All calls happen on
//! the simulation thread; `update` and `destroy` take `&mut self`, so an
//! entity can never be destroyed while its own update is running. Behaviours
//! that want to remove themselves call [`EntityContext::destroy`] and are
//! destroyed after every entity has been updated for the tick.

use crate::behaviour::{dispatch, EntityContext, LifecycleHook, ScriptBehaviour};
use crate::bridge::{BridgeError, SharedWorld, TransformBridge};
use crate::error::ScriptError;
use latch_core::ecs::EntityId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Started,
}

struct Slot {
    behaviour: Box<dyn ScriptBehaviour>,
    phase: Phase,
}

/// A hook that returned an error. The lifecycle carries on regardless.
#[derive(Debug)]
pub struct HookFailure {
    pub entity: EntityId,
    pub class_name: String,
    pub hook: LifecycleHook,
    pub error: ScriptError,
}

/// Summary of one `update` call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub started: usize,
    pub updated: usize,
    pub failed: usize,
    pub destroyed: Vec<EntityId>,
}

pub struct ScriptHost {
    bridge: TransformBridge,
    slots: BTreeMap<EntityId, Slot>,
    failures: Vec<HookFailure>,
}

impl ScriptHost {
    pub fn new(bridge: TransformBridge) -> Self {
        Self {
            bridge,
            slots: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn bridge(&self) -> &TransformBridge {
        &self.bridge
    }

    pub fn world(&self) -> &SharedWorld {
        self.bridge.world()
    }

    pub fn is_attached(&self, entity: EntityId) -> bool {
        self.slots.contains_key(&entity)
    }

    /// Attached entities in update order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Hook failures recorded since the last call.
    pub fn take_failures(&mut self) -> Vec<HookFailure> {
        std::mem::take(&mut self.failures)
    }

    /// Attach a behaviour to a live entity and run its `OnCreate`.
    pub fn attach(
        &mut self,
        entity: EntityId,
        behaviour: Box<dyn ScriptBehaviour>,
    ) -> Result<(), ScriptError> {
        if !self.world().borrow().contains(entity) {
            return Err(BridgeError::InvalidHandle(entity.id()).into());
        }
        if self.slots.contains_key(&entity) {
            return Err(ScriptError::AlreadyAttached(entity));
        }

        let mut slot = Slot {
            behaviour,
            phase: Phase::Created,
        };
        tracing::debug!(entity = %entity, class = slot.behaviour.class_name(), "Attaching script");

        let mut ctx = EntityContext::new(entity.into(), &self.bridge);
        run_hook(&mut self.failures, entity, &mut slot, LifecycleHook::Create, &mut ctx, 0.0);
        self.slots.insert(entity, slot);

        if ctx.destroy_requested() {
            self.destroy(entity)?;
        }
        Ok(())
    }

    /// Run one tick: `OnStart` for entities that have not started yet, then
    /// `OnUpdate(dt)` for everyone, in ascending handle order.
    ///
    /// Entities despawned from the world behind the host's back get their
    /// `OnDestroy` here and are reported as destroyed.
    pub fn update(&mut self, dt: f32) -> Result<TickReport, ScriptError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(ScriptError::InvalidDelta(dt));
        }

        let mut report = TickReport::default();
        let mut pending = Vec::new();
        let failures_before = self.failures.len();

        self.reap_despawned(&mut report)?;

        for (&entity, slot) in self.slots.iter_mut() {
            if !self.bridge.world().borrow().contains(entity) {
                continue;
            }
            let mut ctx = EntityContext::new(entity.into(), &self.bridge);

            if slot.phase == Phase::Created {
                run_hook(&mut self.failures, entity, slot, LifecycleHook::Start, &mut ctx, dt);
                slot.phase = Phase::Started;
                report.started += 1;
            }

            run_hook(&mut self.failures, entity, slot, LifecycleHook::Update, &mut ctx, dt);
            report.updated += 1;

            if ctx.destroy_requested() {
                pending.push(entity);
            }
        }

        for entity in pending {
            self.destroy(entity)?;
            report.destroyed.push(entity);
        }
        self.reap_despawned(&mut report)?;

        report.failed = self.failures.len() - failures_before;
        Ok(report)
    }

    /// Run `OnDestroy`, detach the behaviour and despawn the entity.
    pub fn destroy(&mut self, entity: EntityId) -> Result<(), ScriptError> {
        let mut slot = self
            .slots
            .remove(&entity)
            .ok_or(ScriptError::NotAttached(entity))?;

        let mut ctx = EntityContext::new(entity.into(), &self.bridge);
        run_hook(&mut self.failures, entity, &mut slot, LifecycleHook::Destroy, &mut ctx, 0.0);

        self.world().borrow_mut().despawn(entity);
        tracing::debug!(entity = %entity, class = slot.behaviour.class_name(), "Destroyed scripted entity");
        Ok(())
    }

    fn reap_despawned(&mut self, report: &mut TickReport) -> Result<(), ScriptError> {
        let gone: Vec<EntityId> = {
            let world = self.bridge.world().borrow();
            self.slots.keys().copied().filter(|&e| !world.contains(e)).collect()
        };
        for entity in gone {
            tracing::debug!(entity = %entity, "Entity despawned outside the host");
            self.destroy(entity)?;
            report.destroyed.push(entity);
        }
        Ok(())
    }

    /// Destroy every attached entity in handle order. Returns how many were destroyed.
    pub fn shutdown(&mut self) -> usize {
        let entities: Vec<EntityId> = self.slots.keys().copied().collect();
        let count = entities.len();
        for entity in entities {
            // Every id came from `slots`, so `NotAttached` cannot happen here.
            let _ = self.destroy(entity);
        }
        tracing::info!(count, "Script host shut down");
        count
    }
}

fn run_hook(
    failures: &mut Vec<HookFailure>,
    entity: EntityId,
    slot: &mut Slot,
    hook: LifecycleHook,
    ctx: &mut EntityContext<'_>,
    dt: f32,
) {
    if hook == LifecycleHook::Update {
        tracing::trace!(entity = %entity, dt, "OnUpdate");
    } else {
        tracing::debug!(entity = %entity, hook = hook.name(), "Dispatching hook");
    }

    if let Err(error) = dispatch(slot.behaviour.as_mut(), hook, ctx, dt) {
        let class_name = slot.behaviour.class_name().to_string();
        tracing::error!(entity = %entity, class = %class_name, hook = hook.name(), %error, "Script hook failed");
        failures.push(HookFailure {
            entity,
            class_name,
            hook,
            error,
        });
    }
}
