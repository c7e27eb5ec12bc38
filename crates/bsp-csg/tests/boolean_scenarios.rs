use approx::assert_relative_eq;
use bsp_csg::{
    CsgOptions, Face, Mesh, Plane3D, PointLocation, SplitHeuristic, Splittable, Tolerance,
};
use nalgebra::{Point3, Rotation3, Vector3};

fn cube(min: [f32; 3], max: [f32; 3]) -> Mesh {
    Mesh::cuboid(Point3::from(min), Point3::from(max)).unwrap()
}

/// Two unit cubes sharing half their volume.
fn half_overlap() -> (Mesh, Mesh) {
    (
        cube([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
        cube([0.5, 0.0, 0.0], [1.5, 1.0, 1.0]),
    )
}

/// A cube rotated about its centre, so none of its planes line up with the axes.
fn tilted_cube(center: [f32; 3], size: f32) -> Mesh {
    let rotation = Rotation3::from_euler_angles(0.3, 0.5, 0.2);
    let center = Point3::from(center);
    let half = size / 2.0;
    let faces = cube([-half; 3], [half; 3])
        .faces()
        .iter()
        .map(|face| {
            let [a, b, c] = face.positions().map(|p| center + rotation * p.coords);
            Face::from_positions(a, b, c).unwrap()
        })
        .collect();
    Mesh::from_faces(faces)
}

/// Probe points on a regular grid offset so they never land on a face plane.
fn probes() -> Vec<Point3<f32>> {
    let coords: Vec<f32> = (0..20).map(|i| -0.45 + 0.1 * i as f32).collect();
    let mut points = Vec::new();
    for &x in &coords {
        for &y in &coords {
            for &z in &coords {
                points.push(Point3::new(x, y, z));
            }
        }
    }
    points
}

fn p(x: f32, y: f32, z: f32) -> Point3<f32> {
    Point3::new(x, y, z)
}

#[test]
fn combine_spans_both_cubes() {
    let (mut a, b) = half_overlap();
    a.combine(&b);

    let bounds = a.bounding_box().unwrap();
    assert_eq!(bounds.min, p(0.0, 0.0, 0.0));
    assert_eq!(bounds.max, p(1.5, 1.0, 1.0));
    assert_eq!(a.point_position(p(0.75, 0.5, 0.5)), PointLocation::Inside);
    assert_eq!(a.point_position(p(0.25, 0.5, 0.5)), PointLocation::Inside);
    assert_eq!(a.point_position(p(1.25, 0.5, 0.5)), PointLocation::Inside);
    assert_eq!(a.point_position(p(1.75, 0.5, 0.5)), PointLocation::Outside);
    assert_relative_eq!(a.volume(), 1.5, epsilon = 1e-4);
}

#[test]
fn combine_has_no_duplicate_coplanar_faces() {
    let (mut a, b) = half_overlap();
    a.combine(&b);

    // Surface of a 1.5 x 1 x 1 box; duplicated shared faces would inflate it.
    assert_relative_eq!(a.surface_area(), 2.0 * (1.5 + 1.5 + 1.0), epsilon = 1e-4);
}

#[test]
fn intersect_keeps_overlap_only() {
    let (mut a, b) = half_overlap();
    a.intersect(&b);

    assert_relative_eq!(a.volume(), 0.5, epsilon = 1e-4);
    assert_eq!(a.point_position(p(0.75, 0.5, 0.5)), PointLocation::Inside);
    assert_eq!(a.point_position(p(0.25, 0.5, 0.5)), PointLocation::Outside);
    assert_eq!(a.point_position(p(1.25, 0.5, 0.5)), PointLocation::Outside);

    let bounds = a.bounding_box().unwrap();
    assert_relative_eq!(bounds.min.x, 0.5, epsilon = 1e-5);
    assert_relative_eq!(bounds.max.x, 1.0, epsilon = 1e-5);
}

#[test]
fn intersect_corner_overlap_is_half_cubed() {
    let mut a = cube([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let b = cube([0.5, 0.5, 0.5], [1.5, 1.5, 1.5]);
    a.intersect(&b);

    assert_relative_eq!(a.volume(), 0.5_f32.powi(3), epsilon = 1e-4);
    assert_eq!(a.point_position(p(0.75, 0.75, 0.75)), PointLocation::Inside);
    assert_eq!(a.point_position(p(0.25, 0.75, 0.75)), PointLocation::Outside);
}

#[test]
fn subtract_removes_overlap() {
    let (mut a, b) = half_overlap();
    a.subtract(&b);

    assert_eq!(a.point_position(p(0.25, 0.5, 0.5)), PointLocation::Inside);
    assert_eq!(a.point_position(p(0.75, 0.5, 0.5)), PointLocation::Outside);
    assert_eq!(a.point_position(p(1.25, 0.5, 0.5)), PointLocation::Outside);
    assert_relative_eq!(a.volume(), 0.5, epsilon = 1e-4);
}

#[test]
fn combine_with_empty_is_a_no_op() {
    let (a, _) = half_overlap();
    let mut result = a.clone();
    result.combine(&Mesh::new());

    assert_eq!(result.len(), a.len());
    for face in a.faces() {
        assert!(result.faces().contains(face));
    }
}

#[test]
fn operands_are_not_modified() {
    let (a, b) = half_overlap();
    let mut result = a.clone();
    result.intersect(&b);

    assert_eq!(b, half_overlap().1);
    assert_ne!(result, a);
}

#[test]
fn combine_is_commutative_up_to_volume() {
    let (a, b) = half_overlap();
    let ab = a.union(&b);
    let ba = b.union(&a);

    let ab_tree = ab.to_tree();
    let ba_tree = ba.to_tree();
    for point in probes() {
        assert_eq!(
            ab_tree.point_position(point),
            ba_tree.point_position(point),
            "disagreement at {point:?}"
        );
    }
}

#[test]
fn subtract_then_combine_covers_original() {
    let (a, b) = half_overlap();
    let restored = a.difference(&b).union(&b);

    let a_tree = a.to_tree();
    let restored_tree = restored.to_tree();
    for point in probes() {
        if a_tree.point_position(point) == PointLocation::Inside {
            assert_eq!(
                restored_tree.point_position(point),
                PointLocation::Inside,
                "lost {point:?}"
            );
        }
    }
}

#[test]
fn tilted_operands_satisfy_inclusion_exclusion() {
    let a = cube([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let b = tilted_cube([0.8, 0.7, 0.6], 0.9);

    let union = a.union(&b).volume();
    let intersection = a.intersection(&b).volume();
    let difference = a.difference(&b).volume();

    assert_relative_eq!(b.volume(), 0.9_f32.powi(3), epsilon = 1e-4);
    assert!(intersection > 0.0);
    assert_relative_eq!(union, a.volume() + b.volume() - intersection, epsilon = 1e-3);
    assert_relative_eq!(difference, a.volume() - intersection, epsilon = 1e-3);
}

#[test]
fn balanced_heuristic_gives_same_solid() {
    let options = CsgOptions::default().with_heuristic(SplitHeuristic::Balanced);
    let (a, b) = half_overlap();
    let a = a.with_options(options);

    let union = a.union(&b);
    assert_relative_eq!(union.volume(), 1.5, epsilon = 1e-4);
    assert_relative_eq!(a.intersection(&b).volume(), 0.5, epsilon = 1e-4);
    assert_relative_eq!(a.difference(&b).volume(), 0.5, epsilon = 1e-4);
}

#[test]
fn split_preserves_area_and_sides() {
    let tol = Tolerance::default();
    let face = Face::from_positions(p(-0.3, -1.2, 0.4), p(1.7, 0.2, -0.5), p(0.1, 1.9, 0.8)).unwrap();
    let planes = [
        Plane3D::new(Vector3::new(1.0, 0.0, 0.0), 0.2).unwrap(),
        Plane3D::new(Vector3::new(0.3, 1.0, -0.2), 0.1).unwrap(),
        Plane3D::new(Vector3::new(-1.0, 0.4, 0.9), -0.3).unwrap(),
        Plane3D::new(Vector3::new(0.0, 0.0, 1.0), 5.0).unwrap(),
    ];

    for plane in &planes {
        let mut front = Vec::new();
        let mut back = Vec::new();
        face.split(plane, tol).partition_into(&mut front, &mut back);

        let area: f32 = front.iter().chain(&back).map(Face::area).sum();
        assert_relative_eq!(area, face.area(), epsilon = 1e-5);

        for piece in &front {
            for v in piece.vertices() {
                assert!(plane.signed_distance(v.position) > -tol.get() * 10.0);
            }
        }
        for piece in &back {
            for v in piece.vertices() {
                assert!(plane.signed_distance(v.position) < tol.get() * 10.0);
            }
        }
    }
}
