//! Bounding volume hierarchy over primitive bounding boxes
//!
//! Built top-down by median splits on the longest axis of the primitives'
//! centroid bounds, which keeps the tree balanced (depth `O(log M)`, build
//! `O(M log M)`). Nodes live in a flat array in depth-first order; leaves
//! reference contiguous runs of a permuted primitive index array, so every
//! primitive appears in exactly one leaf.
//!
//! The tree knows nothing about triangles: [`Bvh::nearest`] takes the exact
//! squared distance to a primitive as a closure, which lets the same index
//! serve faces and vertices.

use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::geometry::aabb_distance_squared;
use nalgebra::Point3;

pub mod node;

pub use node::{BvhNode, NodeKind};

/// Tuning knobs for BVH construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvhConfig {
    /// Largest number of primitives stored in one leaf (at least 1)
    pub max_leaf_size: usize,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self { max_leaf_size: 4 }
    }
}

/// A bounding volume hierarchy over a fixed set of primitive boxes.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    indices: Vec<u32>,
    config: BvhConfig,
}

impl Bvh {
    /// Build a hierarchy over `boxes`; primitive `i` is `boxes[i]`.
    pub fn build(boxes: &[Aabb], config: BvhConfig) -> Self {
        let mut bvh = Bvh {
            nodes: Vec::new(),
            indices: Vec::new(),
            config,
        };
        bvh.rebuild(boxes);
        bvh
    }

    /// Rebuild in place over a new set of boxes, reusing allocations.
    pub fn rebuild(&mut self, boxes: &[Aabb]) {
        let start = std::time::Instant::now();
        self.nodes.clear();
        self.indices.clear();
        self.indices.extend(0..boxes.len() as u32);

        if !boxes.is_empty() {
            self.nodes.reserve(2 * boxes.len() / self.max_leaf_size() + 1);
            let centroids: Vec<Point3<Real>> = boxes.iter().map(|b| b.center()).collect();
            self.build_range(boxes, &centroids, 0, boxes.len());
        }

        tracing::debug!(
            primitives = boxes.len(),
            nodes = self.nodes.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "built BVH"
        );
    }

    fn max_leaf_size(&self) -> usize {
        self.config.max_leaf_size.max(1)
    }

    /// Build the subtree over `indices[start..end]` and return its node position.
    fn build_range(
        &mut self,
        boxes: &[Aabb],
        centroids: &[Point3<Real>],
        start: usize,
        end: usize,
    ) -> u32 {
        let range = &self.indices[start..end];
        let aabb = range[1..]
            .iter()
            .fold(boxes[range[0] as usize], |acc, &i| {
                acc.merged(&boxes[i as usize])
            });

        let node = self.nodes.len() as u32;
        let count = end - start;
        self.nodes.push(BvhNode::leaf(aabb, start as u32, count as u32));
        if count <= self.max_leaf_size() {
            return node;
        }

        let mut bounds = Aabb::new_invalid();
        for &i in range {
            bounds.take_point(centroids[i as usize]);
        }
        let extents = bounds.extents();
        let axis = extents.imax();

        // Tie-break on the primitive index so the layout only depends on the input
        let half = count / 2;
        self.indices[start..end].select_nth_unstable_by(half, |&a, &b| {
            centroids[a as usize][axis]
                .total_cmp(&centroids[b as usize][axis])
                .then(a.cmp(&b))
        });

        let left = self.build_range(boxes, centroids, start, start + half);
        let right = self.build_range(boxes, centroids, start + half, end);
        self.nodes[node as usize].kind = NodeKind::Internal { left, right };
        node
    }

    /// Nodes in depth-first order; the root is at position 0.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Primitive indices referenced by a leaf (empty for internal nodes)
    pub fn primitives(&self, node: &BvhNode) -> &[u32] {
        match node.kind {
            NodeKind::Leaf { start, count } => {
                &self.indices[start as usize..(start + count) as usize]
            },
            NodeKind::Internal { .. } => &[],
        }
    }

    /// Number of primitives indexed
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Box enclosing every primitive, `None` for an empty tree
    pub fn root_aabb(&self) -> Option<&Aabb> {
        self.nodes.first().map(|n| &n.aabb)
    }

    /// Find the primitive closest to `point`.
    ///
    /// `distance_squared(i)` must return the exact squared distance from
    /// `point` to primitive `i`, never less than the squared distance to its box.
    /// Traversal is depth-first, nearer child first, and skips any subtree whose
    /// box is not strictly closer than the best distance so far. Among equally
    /// close primitives the first one reached wins, so results are
    /// deterministic for a given tree.
    ///
    /// Returns `None` only when the tree is empty.
    pub fn nearest<F>(&self, point: &Point3<Real>, mut distance_squared: F) -> Option<(u32, Real)>
    where
        F: FnMut(u32) -> Real,
    {
        let root = self.nodes.first()?;
        let mut best: Option<(u32, Real)> = None;
        let mut best_d2 = Real::INFINITY;
        let mut stack: Vec<(u32, Real)> = Vec::with_capacity(64);
        stack.push((0, aabb_distance_squared(&root.aabb, point)));

        while let Some((node, box_d2)) = stack.pop() {
            if box_d2 >= best_d2 {
                continue;
            }
            let node = &self.nodes[node as usize];
            match node.kind {
                NodeKind::Leaf { .. } => {
                    for &prim in self.primitives(node) {
                        let d2 = distance_squared(prim);
                        if d2 < best_d2 || best.is_none() {
                            best_d2 = d2;
                            best = Some((prim, d2));
                        }
                    }
                },
                NodeKind::Internal { left, right } => {
                    let dl = aabb_distance_squared(&self.nodes[left as usize].aabb, point);
                    let dr = aabb_distance_squared(&self.nodes[right as usize].aabb, point);
                    // push the farther child first so the nearer one is popped next
                    let (near, d_near, far, d_far) = if dr < dl {
                        (right, dr, left, dl)
                    } else {
                        (left, dl, right, dr)
                    };
                    if d_far < best_d2 {
                        stack.push((far, d_far));
                    }
                    if d_near < best_d2 {
                        stack.push((near, d_near));
                    }
                },
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_boxes(points: &[Point3<Real>]) -> Vec<Aabb> {
        points.iter().map(|p| Aabb::new(*p, *p)).collect()
    }

    fn grid(n: usize) -> Vec<Point3<Real>> {
        let mut pts = Vec::new();
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    pts.push(Point3::new(i as Real, j as Real, k as Real));
                }
            }
        }
        pts
    }

    #[test]
    fn empty_tree_has_no_nearest() {
        let bvh = Bvh::build(&[], BvhConfig::default());
        assert!(bvh.is_empty());
        assert!(bvh.root_aabb().is_none());
        assert!(bvh.nearest(&Point3::origin(), |_| 0.0).is_none());
    }

    #[test]
    fn nearest_matches_linear_scan() {
        let pts = grid(6);
        let bvh = Bvh::build(&point_boxes(&pts), BvhConfig::default());
        let queries = [
            Point3::new(0.2, 0.1, 0.4),
            Point3::new(2.6, 3.4, 1.1),
            Point3::new(-4.0, 10.0, 2.2),
            Point3::new(5.4, 5.4, 5.4),
        ];
        for q in &queries {
            let (idx, d2) = bvh
                .nearest(q, |i| (pts[i as usize] - q).norm_squared())
                .unwrap();
            let brute = pts
                .iter()
                .map(|p| (p - q).norm_squared())
                .fold(Real::INFINITY, Real::min);
            assert_eq!(d2, brute);
            assert_eq!((pts[idx as usize] - q).norm_squared(), brute);
        }
    }

    #[test]
    fn leaves_partition_primitives() {
        let pts = grid(5);
        let config = BvhConfig { max_leaf_size: 3 };
        let bvh = Bvh::build(&point_boxes(&pts), config);
        let mut seen = vec![0usize; pts.len()];
        for node in bvh.nodes().iter().filter(|n| n.is_leaf()) {
            let prims = bvh.primitives(node);
            assert!(!prims.is_empty() && prims.len() <= 3);
            for &p in prims {
                seen[p as usize] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn rebuild_is_deterministic() {
        let pts = grid(4);
        let boxes = point_boxes(&pts);
        let a = Bvh::build(&boxes, BvhConfig::default());
        let mut b = a.clone();
        b.rebuild(&boxes);
        assert_eq!(a.nodes(), b.nodes());
        assert_eq!(a.indices, b.indices);
    }
}
