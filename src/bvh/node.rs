//! BVH node data structure

use crate::float_types::parry3d::bounding_volume::Aabb;

/// What a node holds besides its bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Primitives `indices[start..start + count]` of the owning [`Bvh`](super::Bvh)
    Leaf { start: u32, count: u32 },
    /// Children, stored as positions in the node array
    Internal { left: u32, right: u32 },
}

/// A BVH node. `aabb` encloses every primitive below the node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    pub aabb: Aabb,
    pub kind: NodeKind,
}

impl BvhNode {
    pub const fn leaf(aabb: Aabb, start: u32, count: u32) -> Self {
        Self {
            aabb,
            kind: NodeKind::Leaf { start, count },
        }
    }

    pub const fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}
