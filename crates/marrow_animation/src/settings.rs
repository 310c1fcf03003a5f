//! Animator Settings
//!
//! ```rust,ignore
//! use marrow::animation::{Animator, AnimatorSettings};
//!
//! // Default: 100 output matrices
//! let animator = Animator::new(AnimatorSettings::default());
//!
//! // Larger uniform block for a dense rig
//! let animator = Animator::new(AnimatorSettings { max_bones: 256 });
//! ```

use serde::{Deserialize, Serialize};

/// Output matrix count used by [`AnimatorSettings::default`].
pub const DEFAULT_MAX_BONES: usize = 100;

/// Per-animator configuration, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorSettings {
    /// Length of the skinning matrix array handed to the renderer. Must match the
    /// array size declared by the skinning shader; bones with a higher index are
    /// not written.
    pub max_bones: usize,
}

impl Default for AnimatorSettings {
    fn default() -> Self {
        Self {
            max_bones: DEFAULT_MAX_BONES,
        }
    }
}
