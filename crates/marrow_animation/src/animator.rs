use std::sync::Arc;

use glam::{Mat4, Vec3};
use log::{debug, trace, warn};
use marrow_math::Vqs;

use crate::asset::AnimationAsset;
use crate::hierarchy::NodeIndex;
use crate::settings::AnimatorSettings;

/// Playback state of an [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No clip assigned; `advance` does nothing.
    Idle,
    Playing,
}

/// Axis-aligned box around the joint origins of a pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseBounds {
    pub min: Vec3,
    pub max: Vec3,
}

/// Per-entity playback state and skinning output.
///
/// One animator belongs to one logical owner. The clip it plays is shared and
/// read-only; the animator's own time and output buffer must not be touched by two
/// callers at once, and the renderer reads [`Animator::output_matrices`] only after
/// the frame's `advance` calls have returned.
#[derive(Debug)]
pub struct Animator {
    settings: AnimatorSettings,
    clip: Option<Arc<AnimationAsset>>,
    /// Clip time in ticks, in `[0, duration)` while playing.
    current_time: f32,

    // Data flow: clip -> global_transforms -> output_matrices -> GPU buffer
    output_matrices: Vec<Mat4>,
    global_transforms: Vec<Vqs>,
    stack: Vec<(NodeIndex, Vqs)>,
}

impl Animator {
    #[must_use]
    pub fn new(settings: AnimatorSettings) -> Self {
        Self {
            settings,
            clip: None,
            current_time: 0.0,
            output_matrices: vec![Mat4::IDENTITY; settings.max_bones],
            global_transforms: Vec::new(),
            stack: Vec::with_capacity(64),
        }
    }

    #[must_use]
    pub fn with_clip(settings: AnimatorSettings, clip: Arc<AnimationAsset>) -> Self {
        let mut animator = Self::new(settings);
        animator.play(clip);
        animator
    }

    /// Switches to `clip` immediately and rewinds to time zero.
    ///
    /// There is no cross-fade: the previous pose is discarded and every output matrix
    /// is reset to identity until the next [`Animator::advance`].
    pub fn play(&mut self, clip: Arc<AnimationAsset>) {
        if clip.bone_count() > self.output_matrices.len() {
            warn!(
                "Clip '{}' uses {} bones but the animator holds {}; extra bones are not skinned",
                clip.name(),
                clip.bone_count(),
                self.output_matrices.len()
            );
        }
        debug!(
            "Playing clip '{}' ({:.2}s)",
            clip.name(),
            clip.duration_seconds()
        );

        self.current_time = 0.0;
        self.output_matrices.fill(Mat4::IDENTITY);
        self.global_transforms.clear();
        self.clip = Some(clip);
    }

    /// Advances playback by `dt` seconds and re-evaluates the pose.
    ///
    /// Time wraps at the clip's duration. Does nothing while idle.
    pub fn advance(&mut self, dt: f32) {
        let Self {
            clip,
            current_time,
            output_matrices,
            global_transforms,
            stack,
            ..
        } = self;

        let Some(clip) = clip.as_deref() else {
            return;
        };
        // A finite dt can still overflow once scaled to ticks.
        let step = clip.ticks_per_second() * dt;
        if !step.is_finite() {
            warn!("Ignoring animation step {dt}: not finite in ticks ({step})");
            return;
        }

        // 1. Accumulate time (ticks); reducing the step first keeps the sum finite
        let duration = clip.duration();
        *current_time += step % duration;

        // 2. Wrap into [0, duration); rem_euclid can round up to duration itself
        *current_time = current_time.rem_euclid(duration);
        if *current_time >= duration {
            *current_time = 0.0;
        }

        trace!("Advancing clip '{}' to tick {}", clip.name(), *current_time);

        // 3. Evaluate the hierarchy
        evaluate_pose(
            clip,
            *current_time,
            output_matrices,
            global_transforms,
            stack,
        );
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        if self.clip.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    #[inline]
    #[must_use]
    pub fn clip(&self) -> Option<&Arc<AnimationAsset>> {
        self.clip.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &AnimatorSettings {
        &self.settings
    }

    /// Skinning matrices indexed by bone index. Fixed length
    /// ([`AnimatorSettings::max_bones`]); unused slots stay identity.
    #[inline]
    #[must_use]
    pub fn output_matrices(&self) -> &[Mat4] {
        &self.output_matrices
    }

    /// [`Animator::output_matrices`] as raw bytes, ready for a buffer upload.
    #[inline]
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.output_matrices)
    }

    /// Model-space transform of `node` from the last `advance`.
    /// `None` before the first evaluation of the current clip.
    #[inline]
    #[must_use]
    pub fn global_transform(&self, node: NodeIndex) -> Option<Vqs> {
        self.global_transforms.get(node.index()).copied()
    }

    /// Tight bounds of the joint origins of the last evaluated pose.
    #[must_use]
    pub fn pose_bounds(&self) -> Option<PoseBounds> {
        if self.global_transforms.is_empty() {
            return None;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for transform in &self.global_transforms {
            min = min.min(transform.translation);
            max = max.max(transform.translation);
        }
        Some(PoseBounds { min, max })
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimatorSettings::default())
    }
}

/// Depth-first pre-order walk from the root, composing parent before child.
///
/// Uses an explicit stack instead of recursion. Children are pushed in reverse so
/// siblings are visited in hierarchy order.
fn evaluate_pose(
    clip: &AnimationAsset,
    time: f32,
    output_matrices: &mut [Mat4],
    global_transforms: &mut Vec<Vqs>,
    stack: &mut Vec<(NodeIndex, Vqs)>,
) {
    let hierarchy = clip.hierarchy();
    global_transforms.resize(hierarchy.len(), Vqs::IDENTITY);

    stack.clear();
    stack.push((NodeIndex::ROOT, Vqs::IDENTITY));

    while let Some((index, parent_global)) = stack.pop() {
        let (Some(node), Some(local)) = (hierarchy.node(index), clip.local_transform(index, time))
        else {
            continue;
        };

        let global = parent_global.compose(&local);
        global_transforms[index.index()] = global;

        if let Some(info) = clip.node_bone(index) {
            // Bones past the output capacity were reported in `play`.
            if let Some(slot) = output_matrices.get_mut(info.bone_index as usize) {
                *slot = global.to_matrix() * info.inverse_bind_offset;
            }
        }

        for &child in node.children().iter().rev() {
            stack.push((child, global));
        }
    }
}
