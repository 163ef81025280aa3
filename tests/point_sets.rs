// Copyright 2025 Lars Brubaker
// Unconstrained point sets: convex-hull output, degenerate input, merging.

mod helpers;

use helpers::{assert_close, pts, square};
use sweep_cdt::{
    triangulate, triangulate_with, Point, PointSet, SweepConfig, TriangulationError,
};

#[test]
fn single_triangle() {
    let tr = triangulate(&PointSet::new(pts(&[(0.0, 0.0), (4.0, 0.0), (1.0, 3.0)]))).unwrap();
    helpers::verify_mesh(&tr);
    assert_eq!(tr.len(), 1);
    assert_close(tr.total_area(), 6.0, 1e-12);
    assert_eq!(tr.triangles[0].neighbors, [None; 3]);
    assert_eq!(tr.triangles[0].constrained, [false; 3]);
}

#[test]
fn square_point_set() {
    let tr = triangulate(&PointSet::new(square(0.0, 0.0, 1.0))).unwrap();
    helpers::verify_mesh(&tr);
    assert_eq!(tr.len(), 2);
    assert_close(tr.total_area(), 1.0, 1e-12);
    assert_eq!(tr.constrained_edge_count(), 0);
}

#[test]
fn hexagon_with_center() {
    let mut points: Vec<Point> = (0..6)
        .map(|i| {
            let a = std::f64::consts::PI / 3.0 * i as f64 + 0.2;
            Point::new(2.0 * a.cos(), 2.0 * a.sin())
        })
        .collect();
    points.push(Point::new(0.0, 0.0));
    let tr = triangulate(&PointSet::new(points.clone())).unwrap();
    helpers::verify_mesh(&tr);
    assert_eq!(tr.len(), 6);
    let hull = helpers::ring_area(&points[..6]);
    assert_close(tr.total_area(), hull, 1e-9);
    // the center touches every triangle
    assert_eq!(helpers::vertex_use(&tr)[6], 6);
}

#[test]
fn jittered_grid() {
    let mut points = Vec::new();
    for j in 0..8 {
        for i in 0..8 {
            let jitter = ((i * 7 + j * 13) % 5) as f64 * 0.01;
            points.push(Point::new(i as f64 + jitter, j as f64 - jitter));
        }
    }
    let tr = triangulate(&PointSet::new(points)).unwrap();
    helpers::verify_mesh(&tr);
    assert!(tr.len() > 64, "only {} triangles", tr.len());
    let uses = helpers::vertex_use(&tr);
    assert!(uses.iter().all(|&u| u > 0), "every grid point is meshed");
}

#[test]
fn flips_below_a_flip_are_rechecked() {
    // (2, 17) sets off nested flips; the side (2, 6)-(12, 14) they leave
    // behind has (2, 10) inside its circle unless it is checked again
    let points = pts(&[(2.0, 6.0), (4.0, 2.0), (12.0, 14.0), (8.0, 2.0), (2.0, 10.0), (2.0, 17.0)]);
    let tr = triangulate(&PointSet::new(points)).unwrap();
    helpers::verify_mesh(&tr);
    assert_eq!(tr.len(), 4);
    assert_eq!(tr.triangles_with_edge(3, 4).len(), 2);
    assert!(tr.triangles_with_edge(0, 2).is_empty());
}

#[test]
fn duplicate_points_merge() {
    let mut points = square(0.0, 0.0, 1.0);
    points.push(Point::new(1.0, 1.0));
    points.push(Point::new(-0.0, 0.0));
    let tr = triangulate(&PointSet::new(points)).unwrap();
    assert_eq!(tr.points.len(), 4);
    assert_eq!(tr.len(), 2);
}

#[test]
fn collinear_points_give_empty_result() {
    let tr = triangulate(&PointSet::new(pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]))).unwrap();
    assert!(tr.is_empty());
    assert_eq!(tr.points.len(), 3);

    let tr = triangulate(&PointSet::new(pts(&[(0.0, 5.0), (3.0, 5.0), (-2.0, 5.0), (1.0, 5.0)])))
        .unwrap();
    assert!(tr.is_empty());
}

#[test]
fn too_few_points_give_empty_result() {
    assert!(triangulate(&PointSet::new(Vec::new())).unwrap().is_empty());
    let tr = triangulate(&PointSet::new(pts(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]))).unwrap();
    assert!(tr.is_empty());
    assert_eq!(tr.points.len(), 2);
}

#[test]
fn infinite_coordinate_rejected() {
    let err = triangulate(&PointSet::new(pts(&[(0.0, 0.0), (1.0, f64::INFINITY), (2.0, 1.0)])))
        .unwrap_err();
    assert_eq!(err, TriangulationError::InvalidCoordinate { x: 1.0, y: f64::INFINITY });
}

#[test]
fn bounds_margin_does_not_change_result() {
    let points = pts(&[(0.0, 0.0), (3.0, 0.5), (1.0, 2.0), (2.5, 3.0), (-1.0, 1.5)]);
    let a = triangulate(&PointSet::new(points.clone())).unwrap();
    let b = triangulate_with(
        &PointSet::new(points),
        SweepConfig { bounds_margin: 2.0 },
        sweep_cdt::NoopObserver,
    )
    .unwrap();
    helpers::verify_mesh(&b);
    assert_eq!(a.len(), b.len());
    assert_close(a.total_area(), b.total_area(), 1e-9);
}

#[test]
fn large_coordinates() {
    let points: Vec<Point> = square(0.0, 0.0, 1.0)
        .into_iter()
        .chain([Point::new(0.3, 0.6)])
        .map(|p| Point::new(p.x * 1e6 + 5e8, p.y * 1e6 - 3e8))
        .collect();
    let tr = triangulate(&PointSet::new(points)).unwrap();
    helpers::verify_valid_output(&tr);
    helpers::verify_neighbors(&tr);
    assert_eq!(tr.len(), 4);
    assert_close(tr.total_area(), 1e12, 1e3);
}
