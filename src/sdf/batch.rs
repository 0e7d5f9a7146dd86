//! Batch front-ends over the single-point queries

use crate::batch::{BatchOps, DefaultBatchOps};
use crate::float_types::Real;
use crate::geometry::aabb_contains;
use crate::sdf::{QueryOptions, Sdf};
use nalgebra::Point3;

impl Sdf<'_> {
    /// Signed distance for every point, in input order.
    ///
    /// With `trunc_aabb`, points outside the bounding box get
    /// [`FAR_OUTSIDE`](crate::float_types::FAR_OUTSIDE) instead of their exact distance.
    pub fn evaluate_batch(&self, points: &[Point3<Real>], options: &QueryOptions) -> Vec<Real> {
        let trunc = options.trunc_aabb;
        DefaultBatchOps::new(options.n_threads)
            .map(points, |p| self.evaluate_truncated(p, trunc))
    }

    /// Containment flag for every point, in input order.
    pub fn contains_batch(&self, points: &[Point3<Real>], options: &QueryOptions) -> Vec<bool> {
        let trunc = options.trunc_aabb;
        DefaultBatchOps::new(options.n_threads)
            .map(points, |p| self.contains_truncated(p, trunc))
    }

    /// Nearest face index for every point, in input order.
    pub fn nearest_batch(
        &self,
        points: &[Point3<Real>],
        options: &QueryOptions,
    ) -> Vec<Option<u32>> {
        let trunc = options.trunc_aabb;
        DefaultBatchOps::new(options.n_threads)
            .map(points, |p| self.nearest_truncated(p, trunc))
    }

    /// Nearest vertex index for every point, in input order.
    pub fn nearest_vertex_batch(
        &self,
        points: &[Point3<Real>],
        options: &QueryOptions,
    ) -> Vec<Option<u32>> {
        let trunc = options.trunc_aabb;
        DefaultBatchOps::new(options.n_threads).map(points, |p| {
            if trunc && !aabb_contains(self.aabb(), p) {
                None
            } else {
                self.nearest_vertex(p)
            }
        })
    }
}
