//! Area-weighted uniform sampling of points on a mesh surface

use crate::errors::{SdfError, SdfResult};
use crate::float_types::Real;
use crate::store::MeshStore;
use nalgebra::Point3;
use rand::Rng;

/// Cumulative distribution of face areas.
#[derive(Debug, Clone, Default)]
pub struct SurfaceSampler {
    cumulative: Vec<Real>,
}

impl SurfaceSampler {
    /// Running sums of `face_areas`; the last entry is the total area.
    pub fn new(face_areas: &[Real]) -> Self {
        let cumulative = face_areas
            .iter()
            .scan(0.0, |acc, &a| {
                *acc += a;
                Some(*acc)
            })
            .collect();
        Self { cumulative }
    }

    pub fn total_area(&self) -> Real {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Face owning position `r` in `[0, total_area)` of the distribution.
    ///
    /// Zero-area faces own an empty interval and are never returned for
    /// in-range `r`.
    pub fn pick_face(&self, r: Real) -> usize {
        self.cumulative
            .partition_point(|&c| c <= r)
            .min(self.cumulative.len().saturating_sub(1))
    }

    /// Draw `num_points` points uniformly distributed over the surface of `store`.
    ///
    /// Each sample picks a face with probability proportional to its area,
    /// then a uniform point inside it with barycentric weights
    /// `(1 - √u, √u (1 - v), √u v)`.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        store: &MeshStore<'_>,
        num_points: usize,
        rng: &mut R,
    ) -> SdfResult<Vec<Point3<Real>>> {
        let total = self.total_area();
        if !(total > 0.0 && total.is_finite()) {
            return Err(SdfError::ZeroSurfaceArea);
        }

        let points = (0..num_points)
            .map(|_| {
                let face = self.pick_face(rng.random::<Real>() * total);
                let [a, b, c] = store.triangle(face);
                let su = rng.random::<Real>().sqrt();
                let v = rng.random::<Real>();
                Point3::from(
                    a.coords * (1.0 - su) + b.coords * (su * (1.0 - v)) + c.coords * (su * v),
                )
            })
            .collect();
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_faces_by_cumulative_area() {
        let sampler = SurfaceSampler::new(&[1.0, 0.0, 2.0, 1.0]);
        assert_eq!(sampler.total_area(), 4.0);
        assert_eq!(sampler.pick_face(0.0), 0);
        assert_eq!(sampler.pick_face(0.999), 0);
        // zero-area face 1 is skipped
        assert_eq!(sampler.pick_face(1.0), 2);
        assert_eq!(sampler.pick_face(2.5), 2);
        assert_eq!(sampler.pick_face(3.5), 3);
        assert_eq!(sampler.pick_face(4.0), 3);
    }

    #[test]
    fn empty_distribution() {
        let sampler = SurfaceSampler::new(&[]);
        assert_eq!(sampler.total_area(), 0.0);
        assert_eq!(sampler.pick_face(0.0), 0);
    }
}
