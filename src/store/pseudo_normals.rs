//! Angle-weighted pseudo-normals for sign determination at edges and vertices
//!
//! Bærentzen & Aanæs, "Signed distance computation using the angle weighted
//! pseudonormal" (2005): for a closed, consistently oriented mesh the sign of
//! `dot(p - c, N)` is correct for every query point `p` with closest point `c`
//! when `N` is the pseudo-normal of the feature `c` lies on.
//! - face: the face normal
//! - edge: the sum of the normals of the faces sharing the edge
//! - vertex: the sum of incident face normals weighted by the face's angle at the vertex

use crate::float_types::Real;
use crate::geometry::{Feature, vertex_angle};
use crate::store::Face;
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};

/// Cached per-vertex and per-face-edge pseudo-normals.
#[derive(Debug, Clone, Default)]
pub struct PseudoNormals {
    /// Unit pseudo-normal per vertex (zero for isolated or fully degenerate fans)
    pub vertex: Vec<Vector3<Real>>,
    /// Unit pseudo-normal per face and local edge
    pub edge: Vec<[Vector3<Real>; 3]>,
}

#[inline]
fn normalize_or_zero(v: Vector3<Real>) -> Vector3<Real> {
    let len = v.norm();
    if len > Real::MIN_POSITIVE && len.is_finite() {
        v / len
    } else {
        Vector3::zeros()
    }
}

#[inline]
const fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

impl PseudoNormals {
    /// Compute pseudo-normals from validated faces and their unit normals.
    ///
    /// Zero-area faces carry a zero normal and therefore drop out of every sum.
    pub fn compute(
        verts: &[Point3<Real>],
        faces: &[Face],
        face_normals: &[Vector3<Real>],
    ) -> Self {
        let mut vertex = vec![Vector3::zeros(); verts.len()];
        let mut edge_sums: HashMap<(u32, u32), Vector3<Real>> =
            HashMap::with_capacity(faces.len() * 3 / 2);

        for (face, n) in faces.iter().zip(face_normals) {
            if *n == Vector3::zeros() {
                continue;
            }
            let p = face.map(|i| verts[i as usize]);
            for k in 0..3 {
                let angle = vertex_angle(&p[k], &p[(k + 1) % 3], &p[(k + 2) % 3]);
                vertex[face[k] as usize] += n * angle;
                *edge_sums
                    .entry(edge_key(face[k], face[(k + 1) % 3]))
                    .or_insert_with(Vector3::zeros) += n;
            }
        }

        vertex.iter_mut().for_each(|v| *v = normalize_or_zero(*v));

        let edge = faces
            .iter()
            .map(|face| {
                [0, 1, 2].map(|k| {
                    edge_sums
                        .get(&edge_key(face[k], face[(k + 1) % 3]))
                        .copied()
                        .map(normalize_or_zero)
                        .unwrap_or_else(Vector3::zeros)
                })
            })
            .collect();

        Self { vertex, edge }
    }

    /// Pseudo-normal of `feature` on face `face`, with `face_normal` used for
    /// [`Feature::Face`].
    #[inline]
    pub fn for_feature(
        &self,
        faces: &[Face],
        face: usize,
        feature: Feature,
        face_normal: &Vector3<Real>,
    ) -> Vector3<Real> {
        match feature {
            Feature::Face => *face_normal,
            Feature::Edge(k) => self.edge[face][k],
            Feature::Vertex(k) => self.vertex[faces[face][k] as usize],
        }
    }
}
