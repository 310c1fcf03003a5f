//! Rotation Helpers
//!
//! Free functions operating on [`Quat`] values used as joint rotations.
//!
//! A rotation produced by arithmetic (a sum, a scaled blend) is not guaranteed to be
//! unit length. Only normalized rotations are valid inputs to [`Vqs`](crate::Vqs)
//! composition or matrix conversion, so interpolation results go through
//! [`normalize`] before use.

use glam::{Quat, Vec3, Vec4};

/// Below this angle (radians) [`slerp`] falls back to component-wise lerp.
pub const SLERP_EPSILON: f32 = 1e-3;

/// Divides a rotation by its magnitude.
///
/// The caller guarantees a non-zero magnitude; every rotation in the runtime
/// originates from validated keyframe data or the identity.
#[inline]
#[must_use]
pub fn normalize(q: Quat) -> Quat {
    let v = Vec4::from(q);
    let length = v.length();
    debug_assert!(length > 0.0, "cannot normalize a zero-length rotation");
    Quat::from_vec4(v / length)
}

/// Spherical interpolation between two unit rotations.
///
/// Takes the shortest arc (negating `q2` when the dot product is negative) and clamps
/// the dot product before `acos`. Nearly identical rotations are blended linearly to
/// avoid dividing by a vanishing `sin(angle)`. The result is close to unit length but
/// callers still [`normalize`] it.
#[must_use]
pub fn slerp(q1: Quat, q2: Quat, t: f32) -> Quat {
    let a = Vec4::from(q1);
    let mut b = Vec4::from(q2);

    let mut dot = a.dot(b);
    if dot < 0.0 {
        b = -b;
        dot = -dot;
    }

    let angle = dot.clamp(0.0, 1.0).acos();
    if angle < SLERP_EPSILON {
        return Quat::from_vec4(a * (1.0 - t) + b * t);
    }

    let sin_angle = angle.sin();
    let w1 = ((1.0 - t) * angle).sin() / sin_angle;
    let w2 = (t * angle).sin() / sin_angle;
    Quat::from_vec4(a * w1 + b * w2)
}

/// Linear interpolation between two vectors. `t` is not clamped.
#[inline]
#[must_use]
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Rotates `v` by the unit rotation `q` (`q · v · q⁻¹`).
#[inline]
#[must_use]
pub fn rotate(q: Quat, v: Vec3) -> Vec3 {
    // Expanded form of the sandwich product for a unit quaternion.
    let u = Vec3::new(q.x, q.y, q.z);
    let s = q.w;
    u * (2.0 * u.dot(v)) + v * (s * s - u.dot(u)) + u.cross(v) * (2.0 * s)
}
