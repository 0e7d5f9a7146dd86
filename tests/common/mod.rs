//! Mesh fixtures shared by the integration tests

#![allow(dead_code)]

use mesdf::{Face, Real};
use nalgebra::{Point3, Vector3};

/// Axis-aligned cube spanning `[-0.5, 0.5]³`: 8 vertices, 12 outward-facing triangles.
///
/// Vertex `i` has coordinate `+0.5` on x/y/z when bit 0/1/2 of `i` is set.
pub fn cube() -> (Vec<Point3<Real>>, Vec<Face>) {
    let verts = (0..8)
        .map(|i| {
            let c = |bit: u32| if i & (1 << bit) != 0 { 0.5 } else { -0.5 };
            Point3::new(c(0), c(1), c(2))
        })
        .collect();
    let faces = vec![
        // -z
        [0, 2, 3],
        [0, 3, 1],
        // +z
        [4, 5, 7],
        [4, 7, 6],
        // -y
        [0, 1, 5],
        [0, 5, 4],
        // +y
        [2, 6, 7],
        [2, 7, 3],
        // -x
        [0, 4, 6],
        [0, 6, 2],
        // +x
        [1, 3, 7],
        [1, 7, 5],
    ];
    (verts, faces)
}

/// L-shaped prism: the polygon (0,0) (2,0) (2,1) (1,1) (1,2) (0,2) extruded
/// over z in [0, 1]. Non-convex, with a reflex vertical edge at (1, 1).
pub fn l_prism() -> (Vec<Point3<Real>>, Vec<Face>) {
    let outline: [(Real, Real); 6] = [
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 2.0),
        (0.0, 2.0),
    ];
    let n = outline.len() as u32;
    let mut verts: Vec<Point3<Real>> = outline
        .iter()
        .map(|&(x, y)| Point3::new(x, y, 0.0))
        .collect();
    verts.extend(outline.iter().map(|&(x, y)| Point3::new(x, y, 1.0)));

    let mut faces = Vec::new();
    // caps are fans around the reflex corner, which sees the whole outline
    for [a, b, c] in [[3, 4, 5], [3, 5, 0], [3, 0, 1], [3, 1, 2]] {
        faces.push([n + a, n + b, n + c]);
        faces.push([c, b, a]);
    }
    for i in 0..n {
        let j = (i + 1) % n;
        faces.push([i, j, n + j]);
        faces.push([i, n + j, n + i]);
    }
    (verts, faces)
}

/// Whether `p` lies strictly inside the L prism.
pub fn l_prism_inside(p: &Point3<Real>) -> bool {
    let in_z = p.z > 0.0 && p.z < 1.0;
    let in_foot = p.x > 0.0 && p.x < 2.0 && p.y > 0.0 && p.y < 1.0;
    let in_leg = p.x > 0.0 && p.x < 1.0 && p.y > 0.0 && p.y < 2.0;
    in_z && (in_foot || in_leg)
}

/// Convex hull mesh from a point list and faces, with every face re-wound to
/// point away from the centroid.
pub fn orient_convex(verts: &[Point3<Real>], faces: &[Face]) -> Vec<Face> {
    let centroid =
        verts.iter().fold(Vector3::zeros(), |acc, v| acc + v.coords) / verts.len() as Real;
    faces
        .iter()
        .map(|&[a, b, c]| {
            let (pa, pb, pc) = (verts[a as usize], verts[b as usize], verts[c as usize]);
            let n = (pb - pa).cross(&(pc - pa));
            if n.dot(&(pa.coords - centroid)) < 0.0 { [a, c, b] } else { [a, b, c] }
        })
        .collect()
}

/// Signed plane distance of `p` to the most-violated face of a convex mesh:
/// negative strictly inside, positive outside.
pub fn convex_plane_distance(verts: &[Point3<Real>], faces: &[Face], p: &Point3<Real>) -> Real {
    faces
        .iter()
        .map(|&[a, b, c]| {
            let (pa, pb, pc) = (verts[a as usize], verts[b as usize], verts[c as usize]);
            let n = (pb - pa).cross(&(pc - pa)).normalize();
            (p - pa).dot(&n)
        })
        .fold(Real::NEG_INFINITY, Real::max)
}

/// Brute-force unsigned distance from `p` to the mesh.
pub fn brute_distance(verts: &[Point3<Real>], faces: &[Face], p: &Point3<Real>) -> Real {
    faces
        .iter()
        .map(|&[a, b, c]| {
            let [a, b, c] = [a, b, c].map(|i| verts[i as usize]);
            mesdf::geometry::dist_point2tri(p, &a, &b, &c)
        })
        .fold(Real::INFINITY, Real::min)
        .sqrt()
}
