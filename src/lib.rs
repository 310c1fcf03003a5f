//! Marrow
//!
//! Skeletal animation runtime. Given a joint hierarchy, keyframe tracks per joint and
//! a playback time, produces the flat array of skinning matrices consumed by a GPU
//! vertex-skinning stage.
//!
//! - [`math`]: VQS transform algebra and rotation interpolation
//! - [`animation`]: tracks, clips and the [`Animator`]
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marrow::prelude::*;
//!
//! let clip = Arc::new(AnimationAsset::load(desc, hierarchy, &mut registry)?);
//! let mut animator = Animator::with_clip(AnimatorSettings::default(), clip);
//!
//! // Each frame:
//! animator.advance(dt);
//! queue.write_buffer(&bones_buffer, 0, animator.output_bytes());
//! ```

pub use glam;
pub use marrow_animation as animation;
pub use marrow_math as math;

pub use animation::{
    AnimationAsset, AnimationError, Animator, AnimatorSettings, BoneRegistry, JointHierarchy,
    JointTrack,
};
pub use math::Vqs;

pub mod prelude {
    pub use crate::animation::{
        AnimationAsset, AnimationError, Animator, AnimatorSettings, BoneInfo, BoneRegistry,
        ClipDesc, HierarchyBuilder, JointDesc, JointHierarchy, JointTrack, Keyframe, NodeIndex,
        PlaybackState,
    };
    pub use crate::math::{Vqs, lerp, normalize, slerp};
    pub use glam::{Mat4, Quat, Vec3};
}
