use glam::Mat4;
use rustc_hash::FxHashMap;

/// Skinning data of one bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfo {
    /// Slot in the animator's output matrix array.
    pub bone_index: u32,
    /// Maps a vertex from bind-pose model space into this bone's local space.
    pub inverse_bind_offset: Mat4,
}

/// Name → [`BoneInfo`] registry of a skeleton, shared by every clip targeting it.
///
/// Append-only: indices are handed out in first-encounter order and an existing
/// entry is never replaced, removed or reindexed. The importer seeds it with the
/// skin's joints and offsets; loading a clip registers any animated joint the skin
/// did not mention.
#[derive(Debug, Clone, Default)]
pub struct BoneRegistry {
    entries: FxHashMap<String, BoneInfo>,
    names: Vec<String>,
}

impl BoneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with its inverse bind offset and returns its bone index.
    /// If the name is already known the existing entry wins.
    pub fn register(&mut self, name: &str, inverse_bind_offset: Mat4) -> u32 {
        if let Some(info) = self.entries.get(name) {
            return info.bone_index;
        }

        let bone_index = self.names.len() as u32;
        self.entries.insert(
            name.to_string(),
            BoneInfo {
                bone_index,
                inverse_bind_offset,
            },
        );
        self.names.push(name.to_string());
        bone_index
    }

    /// Registers `name` with an identity offset if it is unknown.
    pub fn ensure(&mut self, name: &str) -> u32 {
        self.register(name, Mat4::IDENTITY)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<BoneInfo> {
        self.entries.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Bone names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Immutable copy of the current entries.
    #[must_use]
    pub fn freeze(&self) -> BoneMap {
        BoneMap {
            entries: self.entries.clone(),
        }
    }
}

/// Frozen snapshot of a [`BoneRegistry`], owned by a loaded clip.
#[derive(Debug, Clone, Default)]
pub struct BoneMap {
    entries: FxHashMap<String, BoneInfo>,
}

impl BoneMap {
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<BoneInfo> {
        self.entries.get(name).copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of output slots needed to hold every bone (highest index + 1).
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.entries
            .values()
            .map(|info| info.bone_index as usize + 1)
            .max()
            .unwrap_or(0)
    }
}
