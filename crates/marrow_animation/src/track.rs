use glam::{Quat, Vec3};
use marrow_math::Vqs;

use crate::channel::{ChannelKind, Keyframe, KeyframeChannel};
use crate::error::{AnimationError, Result};

/// Keyframe data for one joint: three independently timed channels.
///
/// A track is created once when its clip is loaded and never mutated afterwards.
/// Sampling is a pure function of the keyframes and the query time.
#[derive(Debug, Clone)]
pub struct JointTrack {
    name: String,
    bone_index: Option<u32>,
    translation: KeyframeChannel<Vec3>,
    rotation: KeyframeChannel<Quat>,
    scale: KeyframeChannel<Vec3>,
}

impl JointTrack {
    /// Validates the three channels. The bone index is assigned by the clip loader.
    pub fn new(
        name: impl Into<String>,
        translations: Vec<Keyframe<Vec3>>,
        rotations: Vec<Keyframe<Quat>>,
        scales: Vec<Keyframe<Vec3>>,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |channel: ChannelKind| {
            let joint = name.clone();
            move |source| AnimationError::InvalidChannel {
                joint,
                channel,
                source,
            }
        };

        let translation =
            KeyframeChannel::new(translations).map_err(invalid(ChannelKind::Translation))?;
        let rotation = KeyframeChannel::new(rotations).map_err(invalid(ChannelKind::Rotation))?;
        let scale = KeyframeChannel::new(scales).map_err(invalid(ChannelKind::Scale))?;

        Ok(Self {
            name,
            bone_index: None,
            translation,
            rotation,
            scale,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output slot of this joint. `None` until the track is loaded into a clip.
    #[inline]
    #[must_use]
    pub fn bone_index(&self) -> Option<u32> {
        self.bone_index
    }

    #[inline]
    #[must_use]
    pub fn translation(&self) -> &KeyframeChannel<Vec3> {
        &self.translation
    }

    #[inline]
    #[must_use]
    pub fn rotation(&self) -> &KeyframeChannel<Quat> {
        &self.rotation
    }

    #[inline]
    #[must_use]
    pub fn scale(&self) -> &KeyframeChannel<Vec3> {
        &self.scale
    }

    /// Interpolated local transform at `time` (clip ticks).
    #[must_use]
    pub fn local_transform_at(&self, time: f32) -> Vqs {
        Vqs::new(
            self.translation.sample(time),
            self.rotation.sample(time),
            self.scale.sample(time),
        )
    }

    /// Latest keyframe across the three channels.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.translation
            .last_timestamp()
            .max(self.rotation.last_timestamp())
            .max(self.scale.last_timestamp())
    }

    pub(crate) fn set_bone_index(&mut self, bone_index: u32) {
        self.bone_index = Some(bone_index);
    }

    /// Pads every channel to `duration`. Returns whether anything was added.
    pub(crate) fn extend_to(&mut self, duration: f32) -> bool {
        let t = self.translation.extend_to(duration);
        let r = self.rotation.extend_to(duration);
        let s = self.scale.extend_to(duration);
        t || r || s
    }
}
