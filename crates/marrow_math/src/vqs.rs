use std::ops::Mul;

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::rotation::rotate;

/// Translation / rotation / scale transform.
///
/// A point is transformed scale first, then rotation, then translation:
/// `p' = translation + rotation · (scale ∘ p)`.
///
/// Scale is kept as a component-wise vector. Composing two transforms multiplies the
/// scales component-wise, which is exact for uniform scale and for axis-aligned
/// scale under axis-aligned rotations only. Non-uniform scale under an arbitrary
/// parent rotation does not compose into a true shear-free result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vqs {
    pub translation: Vec3,
    /// Must be unit length when the transform is composed or converted.
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Vqs {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY, Vec3::ONE)
    }

    #[inline]
    #[must_use]
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self::new(Vec3::ZERO, rotation, Vec3::ONE)
    }

    #[inline]
    #[must_use]
    pub const fn from_scale(scale: Vec3) -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, scale)
    }

    /// Returns the transform equivalent to applying `rhs` first, then `self`.
    #[must_use]
    pub fn compose(&self, rhs: &Self) -> Self {
        Self {
            translation: self.apply(rhs.translation),
            rotation: self.rotation * rhs.rotation,
            scale: self.scale * rhs.scale,
        }
    }

    /// Transforms a point.
    #[inline]
    #[must_use]
    pub fn apply(&self, point: Vec3) -> Vec3 {
        self.translation + rotate(self.rotation, self.scale * point)
    }

    /// `T · R · S` as a column-major matrix, matching [`Vqs::apply`] on points.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.rotation)
            * Mat4::from_scale(self.scale)
    }

    /// Decomposes an affine matrix.
    ///
    /// Scale is the length of each basis column, the rotation is extracted from the
    /// basis with that scale divided out, and the translation is the last column.
    ///
    /// This is not a general decomposition: singular or sheared matrices produce an
    /// approximate (possibly meaningless) rotation without reporting an error.
    #[must_use]
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let x = matrix.x_axis.truncate();
        let y = matrix.y_axis.truncate();
        let z = matrix.z_axis.truncate();

        let scale = Vec3::new(x.length(), y.length(), z.length());
        let basis = Mat3::from_cols(x / scale.x, y / scale.y, z / scale.z);

        Self {
            translation: matrix.w_axis.truncate(),
            rotation: Quat::from_mat3(&basis),
            scale,
        }
    }
}

impl Default for Vqs {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Vqs {
    type Output = Vqs;

    #[inline]
    fn mul(self, rhs: Vqs) -> Vqs {
        self.compose(&rhs)
    }
}

impl Mul<Vec3> for Vqs {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.apply(rhs)
    }
}

impl From<Vqs> for Mat4 {
    fn from(vqs: Vqs) -> Self {
        vqs.to_matrix()
    }
}
