//! Point/line/segment/triangle primitives shared by the index, the evaluator
//! and the public `util`-style helpers.

use crate::float_types::{Real, tolerance};
use crate::float_types::parry3d::bounding_volume::Aabb;
use nalgebra::{Point2, Point3, Vector3};

/// Which part of a triangle a closest point landed on.
///
/// Local edge `k` joins local vertices `k` and `(k + 1) % 3`, so edge 0 is
/// `ab`, edge 1 is `bc` and edge 2 is `ca`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Strictly inside the face
    Face,
    /// On local edge `k`, excluding its end points
    Edge(usize),
    /// On local vertex `k`
    Vertex(usize),
}

/// Closest point on a triangle together with its barycentric weights
/// `(w_a, w_b, w_c)` and the feature it lies on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    pub point: Point3<Real>,
    pub bary: Vector3<Real>,
    pub feature: Feature,
}

impl ClosestPoint {
    #[inline]
    fn vertex(point: Point3<Real>, k: usize) -> Self {
        let mut w = [0.0; 3];
        w[k] = 1.0;
        ClosestPoint {
            point,
            bary: Vector3::new(w[0], w[1], w[2]),
            feature: Feature::Vertex(k),
        }
    }

    /// Point on local edge `k` at parameter `t` from vertex `k` towards vertex `k + 1`.
    /// Parameters of exactly 0 or 1 collapse onto the vertex.
    #[inline]
    fn edge(tri: &[Point3<Real>; 3], k: usize, t: Real) -> Self {
        let next = (k + 1) % 3;
        if t <= 0.0 || t.is_nan() {
            return Self::vertex(tri[k], k);
        }
        if t >= 1.0 {
            return Self::vertex(tri[next], next);
        }
        let mut w = [0.0; 3];
        w[k] = 1.0 - t;
        w[next] = t;
        ClosestPoint {
            point: tri[k] + (tri[next] - tri[k]) * t,
            bary: Vector3::new(w[0], w[1], w[2]),
            feature: Feature::Edge(k),
        }
    }
}

/// Un-normalized triangle normal `(b - a) × (c - a)`; its length is twice the area.
#[inline]
pub fn normal(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Vector3<Real> {
    (b - a).cross(&(c - a))
}

/// Area and unit normal of a triangle.
///
/// Zero-area triangles report a zero normal rather than NaN.
pub fn area_and_normal(
    a: &Point3<Real>,
    b: &Point3<Real>,
    c: &Point3<Real>,
) -> (Real, Vector3<Real>) {
    let n = normal(a, b, c);
    let len = n.norm();
    if len > Real::MIN_POSITIVE && len.is_finite() {
        (0.5 * len, n / len)
    } else {
        (0.0, Vector3::zeros())
    }
}

/// Interior angle of the triangle at `apex`, 0 when either adjacent edge is degenerate.
pub fn vertex_angle(apex: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Real {
    let u = b - apex;
    let v = c - apex;
    let denom = u.norm() * v.norm();
    if denom <= Real::MIN_POSITIVE {
        return 0.0;
    }
    (u.dot(&v) / denom).clamp(-1.0, 1.0).acos()
}

/// Barycentric weights of the projection of `p` onto the plane of `abc`.
///
/// `n` must be the unit normal and `area2` the length of the un-normalized
/// normal (twice the triangle area), as produced by [`normal`].
pub fn bary(
    p: &Point3<Real>,
    a: &Point3<Real>,
    b: &Point3<Real>,
    c: &Point3<Real>,
    n: &Vector3<Real>,
    area2: Real,
) -> Vector3<Real> {
    if area2 <= Real::MIN_POSITIVE {
        return Vector3::new(1.0, 0.0, 0.0);
    }
    let wa = n.dot(&(c - b).cross(&(p - b))) / area2;
    let wb = n.dot(&(a - c).cross(&(p - c))) / area2;
    Vector3::new(wa, wb, 1.0 - wa - wb)
}

/// Barycentric weights of `p` with respect to the 2D triangle `abc`.
pub fn bary2d(
    p: &Point2<Real>,
    a: &Point2<Real>,
    b: &Point2<Real>,
    c: &Point2<Real>,
) -> Option<Vector3<Real>> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let denom = v0.x * v1.y - v1.x * v0.y;
    if denom.abs() <= Real::MIN_POSITIVE {
        return None;
    }
    let wb = (v2.x * v1.y - v1.x * v2.y) / denom;
    let wc = (v0.x * v2.y - v2.x * v0.y) / denom;
    Some(Vector3::new(1.0 - wb - wc, wb, wc))
}

/// `true` when `p` lies inside the 2D triangle `abc` or within
/// [`tolerance`] (in barycentric units) of its boundary.
pub fn point_in_triangle_2d(
    p: &Point2<Real>,
    a: &Point2<Real>,
    b: &Point2<Real>,
    c: &Point2<Real>,
) -> bool {
    let eps = tolerance();
    bary2d(p, a, b, c).is_some_and(|w| w.iter().all(|&x| x >= -eps))
}

/// Squared distance from `p` to the infinite line through `a` and `b`.
pub fn dist_point2line(p: &Point3<Real>, a: &Point3<Real>, b: &Point3<Real>) -> Real {
    let ab = b - a;
    let ap = p - a;
    let len2 = ab.norm_squared();
    if len2 <= Real::MIN_POSITIVE {
        return ap.norm_squared();
    }
    (ap.norm_squared() - ap.dot(&ab).powi(2) / len2).max(0.0)
}

/// Squared distance from `p` to the segment `ab`.
pub fn dist_point2lineseg(p: &Point3<Real>, a: &Point3<Real>, b: &Point3<Real>) -> Real {
    let ab = b - a;
    let ap = p - a;
    let len2 = ab.norm_squared();
    if len2 <= Real::MIN_POSITIVE {
        return ap.norm_squared();
    }
    let t = (ap.dot(&ab) / len2).clamp(0.0, 1.0);
    (ap - ab * t).norm_squared()
}

/// Closest point on triangle `abc` to `p`.
///
/// Voronoi-region walk from "Real-Time Collision Detection" (Ericson, 5.1.5),
/// extended to report the feature hit. Degenerate triangles fall back to the
/// nearest of their three edges.
pub fn closest_point_on_triangle(
    p: &Point3<Real>,
    a: &Point3<Real>,
    b: &Point3<Real>,
    c: &Point3<Real>,
) -> ClosestPoint {
    let tri = [*a, *b, *c];
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return ClosestPoint::vertex(*a, 0);
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return ClosestPoint::vertex(*b, 1);
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return ClosestPoint::edge(&tri, 0, d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return ClosestPoint::vertex(*c, 2);
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        // edge 2 runs from c back to a
        let w = d2 / (d2 - d6);
        return ClosestPoint::edge(&tri, 2, 1.0 - w);
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return ClosestPoint::edge(&tri, 1, (d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    let denom = va + vb + vc;
    if denom <= Real::MIN_POSITIVE || !denom.is_finite() {
        return closest_point_on_degenerate(p, &tri);
    }
    let v = vb / denom;
    let w = vc / denom;
    ClosestPoint {
        point: a + ab * v + ac * w,
        bary: Vector3::new(1.0 - v - w, v, w),
        feature: Feature::Face,
    }
}

fn closest_point_on_degenerate(p: &Point3<Real>, tri: &[Point3<Real>; 3]) -> ClosestPoint {
    let mut best: Option<(Real, ClosestPoint)> = None;
    for k in 0..3 {
        let a = tri[k];
        let ab = tri[(k + 1) % 3] - a;
        let len2 = ab.norm_squared();
        let t = if len2 > Real::MIN_POSITIVE {
            ((p - a).dot(&ab) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let candidate = ClosestPoint::edge(tri, k, t);
        let d = (p - candidate.point).norm_squared();
        if best.as_ref().is_none_or(|(bd, _)| d < *bd) {
            best = Some((d, candidate));
        }
    }
    // three candidates are always produced
    best.map(|(_, cp)| cp)
        .unwrap_or_else(|| ClosestPoint::vertex(tri[0], 0))
}

/// Squared distance from `p` to triangle `abc`.
#[inline]
pub fn dist_point2tri(
    p: &Point3<Real>,
    a: &Point3<Real>,
    b: &Point3<Real>,
    c: &Point3<Real>,
) -> Real {
    (p - closest_point_on_triangle(p, a, b, c).point).norm_squared()
}

/// Squared distance from `p` to the box, 0 when `p` is inside.
#[inline]
pub fn aabb_distance_squared(aabb: &Aabb, p: &Point3<Real>) -> Real {
    let mut d2 = 0.0;
    for i in 0..3 {
        let v = p[i];
        if v < aabb.mins[i] {
            d2 += (aabb.mins[i] - v).powi(2);
        } else if v > aabb.maxs[i] {
            d2 += (v - aabb.maxs[i]).powi(2);
        }
    }
    d2
}

/// `true` when `p` lies inside or on the boundary of the box.
#[inline]
pub fn aabb_contains(aabb: &Aabb, p: &Point3<Real>) -> bool {
    (0..3).all(|i| p[i] >= aabb.mins[i] && p[i] <= aabb.maxs[i])
}
