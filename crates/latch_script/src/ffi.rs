//! FFI layer between Rust and scripts
//!
//! Handle-based access to engine entities. Handles reach JavaScript as plain
//! numbers, so only ids up to 2^53 - 1 survive the trip exactly.

use latch_core::ecs::EntityId;
use std::fmt;

/// Largest handle a JavaScript number represents exactly.
pub const MAX_SCRIPT_HANDLE: u64 = (1 << 53) - 1;

/// Opaque handle for script access
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptHandle(u64);

impl ScriptHandle {
    pub const NONE: ScriptHandle = ScriptHandle(0);

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Decode a number coming from script. Anything that is not an exact,
    /// non-negative, safe integer maps to [`ScriptHandle::NONE`].
    pub fn from_js_number(value: f64) -> Self {
        if value.is_finite()
            && value >= 0.0
            && value.fract() == 0.0
            && value <= MAX_SCRIPT_HANDLE as f64
        {
            Self(value as u64)
        } else {
            Self::NONE
        }
    }

    /// Encode for script, or None if the id is too large to be exact.
    pub fn to_js_number(self) -> Option<f64> {
        (self.0 <= MAX_SCRIPT_HANDLE).then_some(self.0 as f64)
    }
}

impl fmt::Display for ScriptHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntityId> for ScriptHandle {
    fn from(entity: EntityId) -> Self {
        ScriptHandle(entity.id())
    }
}

impl From<ScriptHandle> for EntityId {
    fn from(handle: ScriptHandle) -> Self {
        EntityId::from_raw(handle.0)
    }
}
