//! Joint Hierarchy
//!
//! The bind-pose skeleton as a flat arena of nodes referenced by index.
//!
//! # Layout
//!
//! - Nodes are stored in depth-first pre-order; the root is always index 0
//! - Each node keeps its parent index and the indices of its children
//! - The arena is built once and never mutated, so indices stay valid for the
//!   lifetime of the owning clip
//!
//! Importers supply joints in whatever order their file format uses, with parent
//! links by position ([`JointHierarchy::from_links`]). [`HierarchyBuilder`] is the
//! in-code equivalent.

use glam::Mat4;
use log::debug;
use marrow_math::Vqs;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{AnimationError, Result};

/// Index of a node inside a [`JointHierarchy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(u32);

impl NodeIndex {
    pub const ROOT: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A joint of the bind-pose hierarchy.
#[derive(Debug, Clone)]
pub struct JointNode {
    name: String,
    static_local_transform: Vqs,
    parent: Option<NodeIndex>,
    children: SmallVec<[NodeIndex; 4]>,
}

impl JointNode {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind-time local transform, used when the clip has no track for this joint.
    #[inline]
    #[must_use]
    pub fn static_local_transform(&self) -> &Vqs {
        &self.static_local_transform
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }
}

/// Importer-side description of one joint.
#[derive(Debug, Clone)]
pub struct JointDesc {
    pub name: String,
    pub local_transform: Vqs,
    /// Position of the parent in the same description list.
    pub parent: Option<usize>,
}

impl JointDesc {
    #[must_use]
    pub fn new(name: impl Into<String>, local_transform: Vqs, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            local_transform,
            parent,
        }
    }

    /// Decomposes a bind-time local matrix into its VQS form.
    #[must_use]
    pub fn from_matrix(
        name: impl Into<String>,
        local_matrix: &Mat4,
        parent: Option<usize>,
    ) -> Self {
        Self::new(name, Vqs::from_matrix(local_matrix), parent)
    }
}

#[derive(Debug, Clone)]
pub struct JointHierarchy {
    nodes: Vec<JointNode>,
    lookup: FxHashMap<String, NodeIndex>,
}

impl JointHierarchy {
    /// Builds the arena from parent links.
    ///
    /// Fails if the list is empty, has zero or several roots, names a parent that
    /// does not exist, repeats a joint name, or contains joints unreachable from the
    /// root.
    pub fn from_links(joints: &[JointDesc]) -> Result<Self> {
        if joints.is_empty() {
            return Err(AnimationError::EmptyHierarchy);
        }

        let mut root = None;
        let mut children: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); joints.len()];
        let mut seen: FxHashMap<&str, usize> = FxHashMap::default();

        for (i, joint) in joints.iter().enumerate() {
            if seen.insert(joint.name.as_str(), i).is_some() {
                return Err(AnimationError::DuplicateJoint(joint.name.clone()));
            }
            match joint.parent {
                None => {
                    if let Some(first) = root {
                        let first: &JointDesc = &joints[first];
                        return Err(AnimationError::MultipleRoots {
                            first: first.name.clone(),
                            second: joint.name.clone(),
                        });
                    }
                    root = Some(i);
                }
                Some(parent) if parent >= joints.len() || parent == i => {
                    return Err(AnimationError::DanglingParent {
                        joint: joint.name.clone(),
                        parent,
                    });
                }
                Some(parent) => children[parent].push(i),
            }
        }

        let root = root.ok_or(AnimationError::MissingRoot)?;

        // Depth-first pre-order re-indexing. Children are pushed in reverse so they
        // are visited in their original order.
        let mut nodes: Vec<JointNode> = Vec::with_capacity(joints.len());
        let mut remap = vec![None; joints.len()];
        let mut stack: Vec<(usize, Option<NodeIndex>)> = vec![(root, None)];

        while let Some((source, parent)) = stack.pop() {
            let index = NodeIndex(nodes.len() as u32);
            remap[source] = Some(index);

            let desc = &joints[source];
            nodes.push(JointNode {
                name: desc.name.clone(),
                static_local_transform: desc.local_transform,
                parent,
                children: SmallVec::new(),
            });
            if let Some(parent) = parent {
                nodes[parent.index()].children.push(index);
            }

            for &child in children[source].iter().rev() {
                stack.push((child, Some(index)));
            }
        }

        if let Some(detached) = remap.iter().position(Option::is_none) {
            return Err(AnimationError::DetachedJoint(joints[detached].name.clone()));
        }

        let lookup = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.name.clone(), NodeIndex(i as u32)))
            .collect();

        debug!(
            "Built joint hierarchy: {} joints rooted at '{}'",
            nodes.len(),
            nodes[0].name
        );

        Ok(Self { nodes, lookup })
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &JointNode {
        &self.nodes[0]
    }

    #[inline]
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&JointNode> {
        self.nodes.get(index.index())
    }

    #[inline]
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.lookup.get(name).copied()
    }

    /// Nodes in depth-first pre-order.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[JointNode] {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a hierarchy has at least its root.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Builds a [`JointHierarchy`] in code, root first.
#[derive(Debug, Default)]
pub struct HierarchyBuilder {
    joints: Vec<JointDesc>,
}

impl HierarchyBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the root joint. Returns its handle for [`HierarchyBuilder::child`].
    pub fn root(&mut self, name: impl Into<String>, local_transform: Vqs) -> usize {
        self.push(JointDesc::new(name, local_transform, None))
    }

    pub fn child(
        &mut self,
        parent: usize,
        name: impl Into<String>,
        local_transform: Vqs,
    ) -> usize {
        self.push(JointDesc::new(name, local_transform, Some(parent)))
    }

    pub fn build(self) -> Result<JointHierarchy> {
        JointHierarchy::from_links(&self.joints)
    }

    fn push(&mut self, desc: JointDesc) -> usize {
        self.joints.push(desc);
        self.joints.len() - 1
    }
}
