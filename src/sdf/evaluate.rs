//! Single-point distance and sign evaluation

use crate::float_types::{FAR_OUTSIDE, Real};
use crate::geometry::{ClosestPoint, Feature, aabb_contains, closest_point_on_triangle};
use crate::sdf::{Sdf, SignMode};
use nalgebra::{Point3, Vector3};

/// Everything known about the surface point nearest to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceQuery {
    /// Index of the nearest face
    pub face: u32,
    /// Closest point on that face
    pub point: Point3<Real>,
    /// Barycentric weights of `point` on the face's corners
    pub bary: Vector3<Real>,
    /// Face, edge or vertex the closest point lies on
    pub feature: Feature,
    /// Squared distance from the query to `point`
    pub distance_squared: Real,
    /// Distance to the surface, positive inside
    pub signed_distance: Real,
}

impl Sdf<'_> {
    #[inline]
    fn closest_on_face(&self, p: &Point3<Real>, face: u32) -> ClosestPoint {
        let [a, b, c] = self.store.triangle(face as usize);
        closest_point_on_triangle(p, &a, &b, &c)
    }

    /// Nearest face and its exact closest point, without the sign.
    fn closest(&self, p: &Point3<Real>) -> Option<(u32, ClosestPoint, Real)> {
        let (face, d2) = self
            .face_bvh
            .nearest(p, |f| (p - self.closest_on_face(p, f).point).norm_squared())?;
        Some((face, self.closest_on_face(p, face), d2))
    }

    /// Normal whose half-space decides the sign for a closest point on `face`.
    /// Zero only when `face` has no area and no neighbour with area shares the feature.
    fn sign_normal(&self, face: usize, feature: Feature) -> Vector3<Real> {
        let face_normal = &self.store.face_normals()[face];
        let pseudo = || {
            self.store
                .pseudo_normals()
                .for_feature(self.store.faces(), face, feature, face_normal)
        };
        match self.mode {
            SignMode::Fast if *face_normal != Vector3::zeros() => *face_normal,
            SignMode::Fast => pseudo(),
            SignMode::Robust => {
                let n = pseudo();
                if n != Vector3::zeros() { n } else { *face_normal }
            },
        }
    }

    /// Whether `p` lies outside, judged from its closest point on `face`.
    fn is_outside(&self, p: &Point3<Real>, face: u32, closest: &ClosestPoint) -> bool {
        let n = self.sign_normal(face as usize, closest.feature);
        if n != Vector3::zeros() {
            return (p - closest.point).dot(&n) > 0.0;
        }

        // A zero-area face won the distance tie; ask the nearest face with area.
        let areas = self.store.face_areas();
        let fallback = self.face_bvh.nearest(p, |f| {
            if areas[f as usize] > 0.0 {
                (p - self.closest_on_face(p, f).point).norm_squared()
            } else {
                Real::INFINITY
            }
        });
        match fallback {
            Some((f, d2)) if d2.is_finite() => {
                let cp = self.closest_on_face(p, f);
                let n = self.sign_normal(f as usize, cp.feature);
                (p - cp.point).dot(&n) > 0.0
            },
            // no face has area, so nothing is enclosed
            _ => true,
        }
    }

    /// Full nearest-surface query for one point, `None` on a mesh without faces.
    pub fn query(&self, p: &Point3<Real>) -> Option<SurfaceQuery> {
        let (face, closest, distance_squared) = self.closest(p)?;
        let distance = distance_squared.sqrt();
        let signed_distance = if self.is_outside(p, face, &closest) {
            -distance
        } else {
            distance
        };
        Some(SurfaceQuery {
            face,
            point: closest.point,
            bary: closest.bary,
            feature: closest.feature,
            distance_squared,
            signed_distance,
        })
    }

    /// Signed distance from `p` to the surface: positive inside, negative outside.
    ///
    /// A mesh without faces has no inside, so every point is [`FAR_OUTSIDE`].
    pub fn evaluate(&self, p: &Point3<Real>) -> Real {
        self.query(p).map_or(FAR_OUTSIDE, |q| q.signed_distance)
    }

    /// [`Sdf::evaluate`] with the optional AABB pre-filter: points outside the
    /// mesh's bounding box return [`FAR_OUTSIDE`] without touching the index.
    pub fn evaluate_truncated(&self, p: &Point3<Real>, trunc_aabb: bool) -> Real {
        if trunc_aabb && !aabb_contains(self.store.aabb(), p) {
            return FAR_OUTSIDE;
        }
        self.evaluate(p)
    }

    /// Whether `p` is inside the mesh or on its surface (`evaluate(p) >= 0`).
    pub fn contains(&self, p: &Point3<Real>) -> bool {
        self.evaluate(p) >= 0.0
    }

    /// [`Sdf::contains`] that rejects points outside the bounding box up front.
    pub fn contains_truncated(&self, p: &Point3<Real>, trunc_aabb: bool) -> bool {
        if trunc_aabb && !aabb_contains(self.store.aabb(), p) {
            return false;
        }
        self.contains(p)
    }

    /// Index of the face nearest to `p`.
    pub fn nearest(&self, p: &Point3<Real>) -> Option<u32> {
        self.closest(p).map(|(face, _, _)| face)
    }

    /// [`Sdf::nearest`] that reports `None` for points outside the bounding box.
    pub fn nearest_truncated(&self, p: &Point3<Real>, trunc_aabb: bool) -> Option<u32> {
        if trunc_aabb && !aabb_contains(self.store.aabb(), p) {
            return None;
        }
        self.nearest(p)
    }

    /// Index of the vertex nearest to `p`.
    pub fn nearest_vertex(&self, p: &Point3<Real>) -> Option<u32> {
        let verts = self.store.verts();
        self.vertex_bvh
            .nearest(p, |v| (verts[v as usize] - p).norm_squared())
            .map(|(v, _)| v)
    }
}
