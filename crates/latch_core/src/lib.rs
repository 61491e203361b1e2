//! Latch Engine Core
//!
//! Contains the native side of the entity/script bridge:
//! - Entity handles and the authoritative entity store
//! - Transforms (position, Euler rotation in degrees, scale)
//! - Fixed-rate simulation time
//! - Scene documents

pub mod ecs;
pub mod math;
pub mod scene;
pub mod time;
pub mod transform;

pub use glam;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
