//! Latch Scripting System
//!
//! Entity scripts in JavaScript via QuickJS, plus the same lifecycle contract
//! for native Rust behaviours.
//!
//! ## Architecture
//!
//! - **Bridge:** six transform calls (get/set position, rotation, scale) keyed
//!   by entity handle, registered in a native call table
//! - **Host:** owns one script instance per entity and drives
//!   `OnCreate -> OnStart -> OnUpdate* -> OnDestroy`
//! - **Runtime:** QuickJS context with the `Entity`/`Vector3` prelude, the
//!   script class registry and hot reload

pub mod behaviour;
pub mod bridge;
mod error;
pub mod ffi;
pub mod host;
pub mod runtime;

pub use behaviour::{EntityContext, LifecycleHook, ScriptBehaviour};
pub use bridge::{BridgeError, InvalidHandlePolicy, NativeCallTable, SharedWorld, TransformBridge};
pub use error::ScriptError;
pub use ffi::ScriptHandle;
pub use host::{HookFailure, ScriptHost, TickReport};
pub use runtime::{JsBehaviour, ScriptRuntime};

pub use rquickjs;
