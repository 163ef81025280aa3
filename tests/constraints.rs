// Copyright 2025 Lars Brubaker
// Constrained point sets: enforced edges, edge walks, conflicting input.

mod helpers;

use helpers::{assert_close, pts, square};
use sweep_cdt::{
    triangulate, triangulate_with, ConstrainedPointSet, Point, SweepConfig, SweepObserver,
    TriangulationError,
};

fn constrained(points: Vec<Point>, index: Vec<usize>) -> sweep_cdt::Triangulation {
    let tr = triangulate(&ConstrainedPointSet::with_indices(points, index))
        .expect("triangulation failed");
    helpers::verify_valid_output(&tr);
    helpers::verify_neighbors(&tr);
    tr
}

#[test]
fn square_diagonal_is_kept() {
    let tr = constrained(square(0.0, 0.0, 1.0), vec![0, 2]);
    assert_eq!(tr.len(), 2);
    assert_close(tr.total_area(), 1.0, 1e-12);

    let sides = tr.triangles_with_edge(0, 2);
    assert_eq!(sides.len(), 2);
    for (t, side) in sides {
        assert!(tr.triangles[t].constrained[side]);
    }
    assert_eq!(tr.constrained_edge_count(), 1);
}

#[test]
fn other_diagonal_is_kept() {
    let tr = constrained(square(0.0, 0.0, 1.0), vec![1, 3]);
    assert_eq!(tr.triangles_with_edge(1, 3).len(), 2);
    assert!(tr.triangles_with_edge(0, 2).is_empty());
}

#[test]
fn edges_given_by_coordinates() {
    let points = square(0.0, 0.0, 1.0);
    let set = ConstrainedPointSet::with_edges(
        points,
        vec![(Point::new(1.0, 1.0), Point::new(0.0, 0.0))],
    );
    let tr = triangulate(&set).unwrap();
    assert!(helpers::has_constrained_edge(
        &tr,
        &Point::new(0.0, 0.0),
        &Point::new(1.0, 1.0)
    ));
}

#[test]
fn long_edge_across_a_fan() {
    // a shallow constraint threading a zig-zag row crosses many triangles
    let mut points = pts(&[(0.0, 0.0), (10.0, 0.5)]);
    for i in 1..10 {
        let x = i as f64;
        points.push(Point::new(x, if i % 2 == 0 { 1.0 } else { -1.0 }));
    }
    points.push(Point::new(5.0, 3.0));
    let tr = constrained(points.clone(), vec![0, 1]);
    assert!(helpers::has_constrained_edge(&tr, &points[0], &points[1]));
    assert_eq!(tr.constrained_edge_count(), 1);
    assert_eq!(helpers::vertex_use(&tr).iter().filter(|&&u| u == 0).count(), 0);
}

#[test]
fn several_disjoint_constraints() {
    let mut points = Vec::new();
    for j in 0..6 {
        for i in 0..6 {
            let skew = 0.07 * ((i * 3 + j * 5) % 4) as f64;
            points.push(Point::new(i as f64 + skew, j as f64 + 0.5 * skew));
        }
    }
    // a short chain, a slanted edge top left and a near-vertical one on the right
    let index = vec![0, 8, 8, 14, 30, 19, 35, 17];
    let tr = constrained(points.clone(), index.clone());
    for pair in index.chunks(2) {
        assert!(
            helpers::has_constrained_edge(&tr, &points[pair[0]], &points[pair[1]]),
            "constraint {:?} missing",
            pair
        );
    }
}

#[test]
fn crossing_constraints_fail() {
    let err = triangulate(&ConstrainedPointSet::with_indices(
        square(0.0, 0.0, 1.0),
        vec![0, 2, 1, 3],
    ))
    .unwrap_err();
    assert!(
        matches!(err, TriangulationError::IntersectingConstraints { .. }),
        "unexpected error {err}"
    );
    assert!(!err.is_recoverable());
}

#[test]
fn constraint_through_a_vertex() {
    // (1, 1) sits exactly on the constraint from (0, 0) to (2, 2)
    let points = pts(&[(0.0, 0.0), (2.0, 2.0), (1.0, 1.0), (2.0, 0.0), (0.0, 2.0)]);
    let tr = constrained(points, vec![0, 1]);
    assert_close(tr.total_area(), 4.0, 1e-12);
    assert_eq!(tr.len(), 4);
    // enforced as two pieces meeting at the middle vertex, each flagged on
    // both of its triangles
    for (a, b) in [(0, 2), (2, 1)] {
        let sides = tr.triangles_with_edge(a, b);
        assert_eq!(sides.len(), 2);
        for (t, side) in sides {
            assert!(tr.triangles[t].constrained[side], "piece {a}-{b} open on triangle {t}");
        }
    }
    assert_eq!(tr.constrained_edge_count(), 2);
}

fn grid(n: usize) -> Vec<Point> {
    let mut points = Vec::new();
    for j in 0..n {
        for i in 0..n {
            points.push(Point::new(i as f64, j as f64));
        }
    }
    points
}

#[test]
fn grid_diagonal_pieces_are_closed_on_both_sides() {
    // the diagonal of a 6x6 grid passes through four grid points
    let tr = constrained(grid(6), vec![0, 35]);
    for k in 0..5u32 {
        let sides = tr.triangles_with_edge(k * 7, (k + 1) * 7);
        assert_eq!(sides.len(), 2, "piece {k} is not a mesh edge");
        for (t, side) in sides {
            assert!(tr.triangles[t].constrained[side], "piece {k} open on triangle {t}");
        }
    }
    assert_eq!(tr.constrained_edge_count(), 5);
}

#[test]
fn crossing_diagonals_of_a_grid_fail() {
    // both diagonals of a 4x4 grid; each runs through two grid points and
    // they cross between (1, 1), (2, 1), (1, 2) and (2, 2)
    let err = triangulate(&ConstrainedPointSet::with_indices(grid(4), vec![0, 15, 3, 12]))
        .unwrap_err();
    assert!(
        matches!(err, TriangulationError::IntersectingConstraints { .. }),
        "unexpected error {err}"
    );
}

#[test]
fn blocked_flip_on_a_collinear_point_drops_only_its_edge() {
    // (3, 6) lies on the constraint (1, 4)-(5, 8). Flipping toward (1, 4)
    // ends at a quad that cannot be flipped and has (1, 4) itself as the
    // next flip point, so that constraint is skipped while (5, 7)-(4, 1)
    // is still enforced.
    let points = pts(&[(5.0, 8.0), (3.0, 7.0), (5.0, 7.0), (1.0, 4.0), (3.0, 6.0), (4.0, 1.0)]);
    let tr = constrained(points.clone(), vec![3, 0, 2, 5]);
    assert_eq!(tr.len(), 5);
    assert_close(tr.total_area(), 14.5, 1e-12);

    assert!(!helpers::has_constrained_edge(&tr, &points[3], &points[4]));
    assert!(!helpers::has_constrained_edge(&tr, &points[4], &points[0]));
    assert!(tr.triangles_with_edge(3, 0).is_empty());
    assert!(helpers::has_constrained_edge(&tr, &points[2], &points[5]));
    assert_eq!(tr.constrained_edge_count(), 1);
}

#[test]
fn repeated_and_degenerate_constraints() {
    let tr = constrained(square(0.0, 0.0, 1.0), vec![0, 2, 2, 0, 3, 3]);
    assert_eq!(tr.len(), 2);
    assert_eq!(tr.constrained_edge_count(), 1);
}

#[test]
fn hull_edge_constraint() {
    let tr = constrained(square(0.0, 0.0, 2.0), vec![0, 1, 1, 2]);
    assert_eq!(tr.len(), 2);
    // a hull edge has one triangle, flagged on its side
    let sides = tr.triangles_with_edge(0, 1);
    assert_eq!(sides.len(), 1);
    assert!(tr.triangles[sides[0].0].constrained[sides[0].1]);
}

#[test]
fn bad_indices_rejected() {
    let err = triangulate(&ConstrainedPointSet::with_indices(square(0.0, 0.0, 1.0), vec![0, 4]))
        .unwrap_err();
    assert_eq!(err, TriangulationError::InvalidConstraintIndex { index: 4, len: 4 });
}

#[derive(Default)]
struct Counts {
    constraints: usize,
    flips: usize,
    steps: usize,
}

impl SweepObserver for Counts {
    fn active_constraint(&mut self, _edge: &sweep_cdt::mesh::Constraint) {
        self.constraints += 1;
    }
    fn secondary_triangle(&mut self, _t: u32) {
        self.flips += 1;
    }
    fn step(&mut self, mesh: &sweep_cdt::mesh::Mesh) {
        assert!(!mesh.tris.is_empty());
        self.steps += 1;
    }
}

#[test]
fn observer_follows_the_sweep() {
    let mut counts = Counts::default();
    let set = ConstrainedPointSet::with_indices(square(0.0, 0.0, 1.0), vec![0, 2]);
    let tr = triangulate_with(&set, SweepConfig::default(), &mut counts).unwrap();
    assert_eq!(tr.len(), 2);
    assert_eq!(counts.constraints, 1);
    assert_eq!(counts.steps, 3);
    // the sweep builds the other diagonal first, so enforcing this one flips
    assert!(counts.flips >= 1);
}
