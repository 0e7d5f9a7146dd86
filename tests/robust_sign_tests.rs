//! Sign determination near creases, spikes and degenerate faces

mod common;

use mesdf::float_types::{Real, tolerance};
use mesdf::{Sdf, SignMode};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_points(
    rng: &mut StdRng,
    n: usize,
    lo: Point3<Real>,
    hi: Point3<Real>,
) -> Vec<Point3<Real>> {
    (0..n)
        .map(|_| {
            Point3::new(
                rng.random_range(lo.x..hi.x),
                rng.random_range(lo.y..hi.y),
                rng.random_range(lo.z..hi.z),
            )
        })
        .collect()
}

/// The robust sign must agree with the analytic inside test of a non-convex
/// prism everywhere away from the surface.
#[test]
fn test_robust_sign_on_nonconvex_prism() {
    let (verts, faces) = common::l_prism();
    let sdf = Sdf::new(&verts, &faces, true).unwrap();
    assert_eq!(sdf.sign_mode(), SignMode::Robust);

    let mut rng = StdRng::seed_from_u64(7);
    let points = random_points(
        &mut rng,
        4000,
        Point3::new(-0.5, -0.5, -0.5),
        Point3::new(2.5, 2.5, 1.5),
    );

    let mut checked = 0;
    for p in &points {
        let brute = common::brute_distance(&verts, &faces, p);
        if brute < tolerance() {
            continue;
        }
        let d = sdf.evaluate(p);
        assert!((d.abs() - brute).abs() < 1e-12, "distance mismatch at {p}: {d} vs {brute}");
        assert_eq!(d > 0.0, common::l_prism_inside(p), "wrong sign at {p}: {d}");
        checked += 1;
    }
    println!("checked {checked} points against the analytic L prism");
    assert!(checked > 3900);
}

/// A point in the notch of the L is equidistant from both walls meeting at
/// the reflex edge; whichever wall wins the tie must report "outside".
#[test]
fn test_reflex_edge_bisector() {
    let (verts, faces) = common::l_prism();
    for robust in [true, false] {
        let sdf = Sdf::new(&verts, &faces, robust).unwrap();
        let outside = Point3::new(1.3, 1.3, 0.5);
        let d = sdf.evaluate(&outside);
        assert!(d < 0.0, "robust={robust}: {d}");
        let inside = Point3::new(0.7, 0.7, 0.5);
        assert!(sdf.evaluate(&inside) > 0.0);
    }
}

/// A needle-like tetrahedron: most exterior points near the tip have their
/// closest point on the apex vertex or a sharp edge.
#[test]
fn test_robust_sign_on_spike() {
    let verts = vec![
        Point3::new(0.3, 0.0, 0.0),
        Point3::new(-0.15, 0.26, 0.0),
        Point3::new(-0.15, -0.26, 0.0),
        Point3::new(0.0, 0.0, 5.0),
    ];
    let faces = common::orient_convex(&verts, &[[0, 1, 2], [0, 1, 3], [1, 2, 3], [2, 0, 3]]);
    let robust = Sdf::new(&verts, &faces, true).unwrap();
    let fast = Sdf::new(&verts, &faces, false).unwrap();

    let mut rng = StdRng::seed_from_u64(11);
    let points = random_points(
        &mut rng,
        4000,
        Point3::new(-1.0, -1.0, -1.0),
        Point3::new(1.0, 1.0, 6.5),
    );

    let mut fast_errors = 0;
    for p in &points {
        let plane = common::convex_plane_distance(&verts, &faces, p);
        if plane.abs() < 1e-6 || common::brute_distance(&verts, &faces, p) < 1e-6 {
            continue;
        }
        let inside = plane < 0.0;
        assert_eq!(robust.contains(p), inside, "robust sign wrong at {p}");
        if fast.contains(p) != inside {
            fast_errors += 1;
        }
    }
    println!("fast mode sign errors on the spike: {fast_errors}");
}

/// Zero-area faces must neither poison the pseudo-normals nor leak NaN.
#[test]
fn test_degenerate_faces_are_ignored() {
    let (mut verts, mut faces) = common::cube();
    // a sliver lying along the top front edge and a fully collapsed face
    verts.push(Point3::new(0.0, -0.5, 0.5));
    faces.push([4, 8, 5]);
    faces.push([7, 7, 7]);

    for robust in [true, false] {
        let sdf = Sdf::new(&verts, &faces, robust).unwrap();
        assert_eq!(sdf.face_areas()[12], 0.0);
        assert_eq!(sdf.face_areas()[13], 0.0);
        assert!(sdf.face_normals().iter().all(|n| n.iter().all(|c| c.is_finite())));

        let mut rng = StdRng::seed_from_u64(3);
        let lo = Point3::new(-1.0, -1.0, -1.0);
        let hi = Point3::new(1.0, 1.0, 1.0);
        for p in random_points(&mut rng, 500, lo, hi) {
            let d = sdf.evaluate(&p);
            assert!(d.is_finite());
            let inside = p.coords.iter().all(|c| c.abs() < 0.5);
            if robust && (d.abs() > 1e-6) {
                assert_eq!(d > 0.0, inside, "robust sign wrong at {p}");
            }
        }
        assert!((sdf.evaluate(&Point3::origin()) - 0.5).abs() < 1e-12);
        assert!(sdf.evaluate(&Point3::new(0.0, -0.7, 0.7)) < 0.0);
    }
}
