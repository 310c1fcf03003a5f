use glam::{Quat, Vec3, Vec4};
use marrow_math::{lerp, normalize, slerp};

/// A value that can be stored in a keyframe channel.
pub trait Interpolatable: Copy + Sized {
    /// Blends two keyframe values. `t` is in `[0, 1]`.
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;

    /// Validates a keyframe value at load time and brings it into canonical form.
    /// Returns `None` when the value cannot be used.
    fn canonicalize(self) -> Option<Self>;
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        lerp(start, end, t)
    }

    fn canonicalize(self) -> Option<Self> {
        self.is_finite().then_some(self)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        normalize(slerp(start, end, t))
    }

    fn canonicalize(self) -> Option<Self> {
        let v = Vec4::from(self);
        if !v.is_finite() || v.length_squared() <= f32::EPSILON {
            return None;
        }
        Some(normalize(self))
    }
}
