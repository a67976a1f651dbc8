//! Plane-vector helpers on top of [`glam::DVec2`].
//!
//! The kernel works in two frames: the world frame (x right, y down, as the
//! host canvas) and body frames attached to a hull or a sail. Moving between
//! them is always a rotation by the frame's angle.

use glam::DVec2;

/// The kernel's 2D vector type.
pub type Vector2 = DVec2;

/// Rotates `v` counter-clockwise (in a y-up frame) by `angle` radians.
///
/// Equivalent to `(x cos a - y sin a, x sin a + y cos a)`.
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(v)
}

/// True when both components are finite.
pub fn is_finite(v: DVec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
