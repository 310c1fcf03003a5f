//! Transform Algebra
//!
//! Value types and helpers shared by the animation runtime:
//!
//! - [`Vqs`]: translation / rotation / scale transform with composition,
//!   point application, matrix conversion and decomposition
//! - [`rotation`]: `normalize`, `slerp`, `lerp` and vector rotation
//!
//! Vectors, rotations and matrices are plain [`glam`] types. The rotation value is a
//! [`glam::Quat`]; the algorithms whose exact behavior matters to keyframe playback
//! (composition order, shortest-path slerp with its small-angle fallback) are
//! implemented here rather than delegated to glam.

pub mod rotation;
pub mod vqs;

pub use glam::{Mat4, Quat, Vec3};
pub use rotation::{SLERP_EPSILON, lerp, normalize, rotate, slerp};
pub use vqs::Vqs;
