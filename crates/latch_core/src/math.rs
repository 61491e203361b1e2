//! Math utilities
//!
//! Re-exports glam with the engine's rotation convention on top.

pub use glam::*;

/// Convert Euler angles in degrees (applied X, then Y, then Z) to a quaternion.
///
/// Matches the rotation part of [`crate::transform::Transform::matrix`].
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}
