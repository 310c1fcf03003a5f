//! Animation Asset
//!
//! A loaded clip: the bind-pose hierarchy, one [`JointTrack`] per animated joint, and
//! a frozen copy of the skeleton's bone registry. Immutable after
//! [`AnimationAsset::load`] and meant to be shared (behind an `Arc`) by any number of
//! animators, including animators driven from different threads.
//!
//! # Loading
//!
//! Loading either fully succeeds or leaves the caller's [`BoneRegistry`] untouched:
//! every check runs before the first bone is registered.
//!
//! - Every animated joint without a registry entry gets one (identity offset, next
//!   free index)
//! - Joints in the hierarchy with no track keep their static local transform and are
//!   skinned as rigid children of their nearest animated ancestor
//! - Channels that stop before the clip's duration are padded with a hold keyframe

use glam::Vec3;
use log::{debug, warn};
use marrow_math::Vqs;
use rustc_hash::FxHashMap;

use crate::error::{AnimationError, Result};
use crate::hierarchy::{JointHierarchy, JointNode, NodeIndex};
use crate::skeleton::{BoneInfo, BoneMap, BoneRegistry};
use crate::track::JointTrack;

/// Tick rate used when the importer reports `0` ("unspecified").
pub const DEFAULT_TICKS_PER_SECOND: f32 = 25.0;

/// Importer-side description of a clip.
#[derive(Debug, Clone)]
pub struct ClipDesc {
    pub name: String,
    /// In ticks.
    pub duration: f32,
    pub ticks_per_second: f32,
    pub tracks: Vec<JointTrack>,
}

#[derive(Debug, Clone)]
pub struct AnimationAsset {
    name: String,
    duration: f32,
    ticks_per_second: f32,
    hierarchy: JointHierarchy,
    tracks: Vec<JointTrack>,
    track_lookup: FxHashMap<String, usize>,
    bone_info: BoneMap,

    // Resolved once per hierarchy node so playback does no name lookups.
    node_tracks: Vec<Option<usize>>,
    node_bones: Vec<Option<BoneInfo>>,
}

impl AnimationAsset {
    /// Validates a clip against its hierarchy and registers its bones.
    pub fn load(
        desc: ClipDesc,
        hierarchy: JointHierarchy,
        registry: &mut BoneRegistry,
    ) -> Result<Self> {
        let ClipDesc {
            name,
            duration,
            ticks_per_second,
            mut tracks,
        } = desc;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(AnimationError::InvalidDuration(duration));
        }
        let ticks_per_second = resolve_tick_rate(&name, ticks_per_second)?;

        let mut track_lookup = FxHashMap::default();
        for (i, track) in tracks.iter().enumerate() {
            if track_lookup.insert(track.name().to_string(), i).is_some() {
                return Err(AnimationError::DuplicateTrack(track.name().to_string()));
            }
        }

        // Everything below is infallible; the registry may now be extended.
        let known_bones = registry.len();
        for track in &mut tracks {
            track.set_bone_index(registry.ensure(track.name()));

            if track.extend_to(duration) {
                debug!(
                    "Clip '{name}': padded track '{}' to duration {duration}",
                    track.name()
                );
            }
            if hierarchy.find(track.name()).is_none() {
                warn!(
                    "Clip '{name}': track '{}' targets a joint missing from the hierarchy",
                    track.name()
                );
            }
        }
        if registry.len() > known_bones {
            debug!(
                "Clip '{name}': registered {} new bones",
                registry.len() - known_bones
            );
        }

        let bone_info = registry.freeze();
        let node_tracks = hierarchy
            .nodes()
            .iter()
            .map(|node| track_lookup.get(node.name()).copied())
            .collect();
        let node_bones = hierarchy
            .nodes()
            .iter()
            .map(|node| bone_info.get(node.name()))
            .collect();

        debug!(
            "Loaded clip '{name}': {} joints, {} tracks, {} bones, {duration} ticks",
            hierarchy.len(),
            tracks.len(),
            bone_info.len(),
        );

        Ok(Self {
            name,
            duration,
            ticks_per_second,
            hierarchy,
            tracks,
            track_lookup,
            bone_info,
            node_tracks,
            node_bones,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clip length in ticks. Always positive.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.duration / self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &JointNode {
        self.hierarchy.root()
    }

    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &JointHierarchy {
        &self.hierarchy
    }

    #[inline]
    #[must_use]
    pub fn tracks(&self) -> &[JointTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn track_for(&self, name: &str) -> Option<&JointTrack> {
        self.track_lookup.get(name).map(|&i| &self.tracks[i])
    }

    #[inline]
    #[must_use]
    pub fn bone_info_for(&self, name: &str) -> Option<BoneInfo> {
        self.bone_info.get(name)
    }

    #[inline]
    #[must_use]
    pub fn bone_map(&self) -> &BoneMap {
        &self.bone_info
    }

    /// Output slots needed to skin this clip (highest bone index + 1).
    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bone_info.slot_count()
    }

    /// Local transform of `node` at `time`: the sampled track if the joint is
    /// animated, its static bind transform otherwise.
    #[must_use]
    pub fn local_transform(&self, node: NodeIndex, time: f32) -> Option<Vqs> {
        let joint = self.hierarchy.node(node)?;
        Some(match self.node_tracks[node.index()] {
            Some(track) => self.tracks[track].local_transform_at(time),
            None => *joint.static_local_transform(),
        })
    }

    #[inline]
    pub(crate) fn node_bone(&self, node: NodeIndex) -> Option<BoneInfo> {
        self.node_bones.get(node.index()).copied().flatten()
    }

    /// Joint origins of the bind pose in model space, for debugging and bounds.
    #[must_use]
    pub fn bind_pose_origins(&self) -> Vec<Vec3> {
        let mut globals: Vec<Vqs> = Vec::with_capacity(self.hierarchy.len());
        for node in self.hierarchy.nodes() {
            let parent = node.parent().map_or(Vqs::IDENTITY, |p| globals[p.index()]);
            globals.push(parent.compose(node.static_local_transform()));
        }
        globals.iter().map(|g| g.translation).collect()
    }
}

fn resolve_tick_rate(clip: &str, ticks_per_second: f32) -> Result<f32> {
    if ticks_per_second == 0.0 {
        warn!("Clip '{clip}': ticks per second unspecified, using {DEFAULT_TICKS_PER_SECOND}");
        return Ok(DEFAULT_TICKS_PER_SECOND);
    }
    if !ticks_per_second.is_finite() || ticks_per_second < 0.0 {
        return Err(AnimationError::InvalidTicksPerSecond(ticks_per_second));
    }
    Ok(ticks_per_second)
}
