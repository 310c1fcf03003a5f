//! Error Types
//!
//! Every error here is a load-time validation failure surfaced to whoever builds
//! hierarchies, tracks and clips (normally the asset importer). Playback itself has
//! no error path: a missing track falls back to the bind pose and out-of-range
//! sampling is a contract violation, not a recoverable condition.

use thiserror::Error;

use crate::channel::ChannelKind;

/// Why a single keyframe channel was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel has no keyframes.
    #[error("channel has no keyframes")]
    Empty,

    /// A timestamp is not strictly greater than its predecessor.
    #[error("keyframe {index} is not strictly after the previous keyframe")]
    NonMonotonic { index: usize },

    /// A timestamp or value is non-finite, or a rotation has zero length.
    #[error("keyframe {index} has an invalid timestamp or value")]
    InvalidValue { index: usize },
}

/// The main error type for animation loading.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    // ========================================================================
    // Track Errors
    // ========================================================================
    /// One of the three keyframe channels of a joint track is malformed.
    #[error("invalid {channel} channel on joint '{joint}': {source}")]
    InvalidChannel {
        joint: String,
        channel: ChannelKind,
        #[source]
        source: ChannelError,
    },

    /// Two tracks in the same clip target the same joint.
    #[error("joint '{0}' is animated by more than one track")]
    DuplicateTrack(String),

    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// Clip duration is zero, negative or non-finite.
    #[error("clip duration must be positive and finite, got {0}")]
    InvalidDuration(f32),

    /// Tick rate is negative or non-finite.
    #[error("ticks per second must be positive and finite, got {0}")]
    InvalidTicksPerSecond(f32),

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// No joints were supplied.
    #[error("joint hierarchy is empty")]
    EmptyHierarchy,

    /// Every joint has a parent.
    #[error("joint hierarchy has no root")]
    MissingRoot,

    /// More than one joint has no parent.
    #[error("joint hierarchy has more than one root ('{first}' and '{second}')")]
    MultipleRoots { first: String, second: String },

    /// A parent link points outside the joint list or at the joint itself.
    #[error("joint '{joint}' references missing parent {parent}")]
    DanglingParent { joint: String, parent: usize },

    /// A joint is not reachable from the root (the parent links form a cycle).
    #[error("joint '{0}' is not reachable from the root")]
    DetachedJoint(String),

    /// Two joints share a name.
    #[error("joint name '{0}' appears more than once")]
    DuplicateJoint(String),
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
