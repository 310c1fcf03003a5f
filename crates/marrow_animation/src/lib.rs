//! Skeletal Animation
//!
//! Evaluates keyframed joint hierarchies into skinning matrices.
//!
//! # Data Flow
//!
//! ```text
//! importer ──► JointHierarchy + JointTrack[] + BoneRegistry
//!                      │ AnimationAsset::load (validated, frozen)
//!                      ▼
//!              Arc<AnimationAsset>  (shared, read-only)
//!                      │ Animator::play / Animator::advance(dt)
//!                      ▼
//!              Animator::output_matrices()  ──► skinning shader
//! ```
//!
//! # Modules
//!
//! - [`channel`]: keyframes and single-component channels
//! - [`track`]: [`JointTrack`], the three channels of one joint
//! - [`hierarchy`]: bind-pose joint arena
//! - [`skeleton`]: bone indices and inverse bind offsets
//! - [`asset`]: [`AnimationAsset`], a loaded clip
//! - [`animator`]: per-entity playback

pub mod animator;
pub mod asset;
pub mod channel;
pub mod error;
pub mod hierarchy;
pub mod settings;
pub mod skeleton;
pub mod track;
pub mod values;

pub use animator::{Animator, PlaybackState, PoseBounds};
pub use asset::{AnimationAsset, ClipDesc, DEFAULT_TICKS_PER_SECOND};
pub use channel::{ChannelKind, Keyframe, KeyframeChannel};
pub use error::{AnimationError, ChannelError, Result};
pub use hierarchy::{HierarchyBuilder, JointDesc, JointHierarchy, JointNode, NodeIndex};
pub use settings::{AnimatorSettings, DEFAULT_MAX_BONES};
pub use skeleton::{BoneInfo, BoneMap, BoneRegistry};
pub use track::JointTrack;
pub use values::Interpolatable;
