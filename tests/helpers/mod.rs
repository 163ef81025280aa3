// Copyright 2025 Lars Brubaker
// Shared test utilities for sweep-cdt tests.

#![allow(dead_code)]

use sweep_cdt::{Point, Triangulation};

pub fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
    coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

/// Axis-aligned square with lower-left corner (x0, y0), counter-clockwise.
pub fn square(x0: f64, y0: f64, s: f64) -> Vec<Point> {
    pts(&[(x0, y0), (x0 + s, y0), (x0 + s, y0 + s), (x0, y0 + s)])
}

/// Same square, clockwise.
pub fn square_cw(x0: f64, y0: f64, s: f64) -> Vec<Point> {
    let mut ring = square(x0, y0, s);
    ring.reverse();
    ring
}

/// Signed area of a closed ring (positive when CCW).
pub fn ring_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    let mut area = 0.0;
    for i in 0..n {
        let (a, b) = (&ring[i], &ring[(i + 1) % n]);
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {}, got {} (tolerance {})",
        expected,
        actual,
        tol
    );
}

/// Vertex indices in range and every triangle counter-clockwise.
pub fn verify_valid_output(tr: &Triangulation) {
    let n = tr.points.len() as u32;
    for (i, t) in tr.triangles.iter().enumerate() {
        for &v in &t.vertices {
            assert!(v < n, "triangle {} references vertex {} of {}", i, v, n);
        }
        let area = tr.area(t);
        assert!(area > 0.0, "triangle {} is not CCW (area={})", i, area);
    }
}

/// Every neighbor link points back and the two triangles share that side.
pub fn verify_neighbors(tr: &Triangulation) {
    for (i, t) in tr.triangles.iter().enumerate() {
        for side in 0..3 {
            let Some(n) = t.neighbors[side] else { continue };
            let other = &tr.triangles[n as usize];
            let (a, b) = t.edge(side);
            let back = other
                .edge_index(a, b)
                .unwrap_or_else(|| panic!("triangle {} and neighbor {} share no side", i, n));
            assert_eq!(
                other.neighbors[back],
                Some(i as u32),
                "link {} -> {} is one-sided",
                i,
                n
            );
        }
    }
}

/// Positive when `d` lies inside the circumcircle of CCW triangle abc.
fn incircle(a: &Point, b: &Point, c: &Point, d: &Point) -> f64 {
    let (adx, ady) = (a.x - d.x, a.y - d.y);
    let (bdx, bdy) = (b.x - d.x, b.y - d.y);
    let (cdx, cdy) = (c.x - d.x, c.y - d.y);
    (adx * adx + ady * ady) * (bdx * cdy - cdx * bdy)
        + (bdx * bdx + bdy * bdy) * (cdx * ady - adx * cdy)
        + (cdx * cdx + cdy * cdy) * (adx * bdy - bdx * ady)
}

/// No unconstrained interior edge has the opposite vertex of its neighbor
/// strictly inside the circumcircle, up to `tol` scaled by the triangle size.
pub fn verify_locally_delaunay(tr: &Triangulation, tol: f64) {
    for (i, t) in tr.triangles.iter().enumerate() {
        let [a, b, c] = tr.corners(t);
        let scale = [a, b, c]
            .iter()
            .flat_map(|p| [p.x.abs(), p.y.abs()])
            .fold(1.0f64, f64::max);
        for side in 0..3 {
            if t.constrained[side] {
                continue;
            }
            let Some(n) = t.neighbors[side] else { continue };
            let other = &tr.triangles[n as usize];
            let (p, q) = t.edge(side);
            let op = other
                .vertices
                .iter()
                .copied()
                .find(|&v| v != p && v != q)
                .expect("neighbor has a third vertex");
            let det = incircle(a, b, c, &tr.points[op as usize]);
            assert!(
                det <= tol * scale.powi(4),
                "edge {} of triangle {} is not Delaunay (det={})",
                side,
                i,
                det
            );
        }
    }
}

/// True when the segment a-b appears as a constrained side of some triangle.
pub fn has_constrained_edge(tr: &Triangulation, a: &Point, b: &Point) -> bool {
    let (Some(ia), Some(ib)) = (tr.point_index(a), tr.point_index(b)) else {
        return false;
    };
    tr.triangles_with_edge(ia, ib)
        .iter()
        .any(|&(t, side)| tr.triangles[t].constrained[side])
}

/// Number of triangles touching each input point; unused points give 0.
pub fn vertex_use(tr: &Triangulation) -> Vec<usize> {
    let mut uses = vec![0; tr.points.len()];
    for t in &tr.triangles {
        for &v in &t.vertices {
            uses[v as usize] += 1;
        }
    }
    uses
}

/// Full sanity pass shared by most tests.
pub fn verify_mesh(tr: &Triangulation) {
    verify_valid_output(tr);
    verify_neighbors(tr);
    verify_locally_delaunay(tr, 1e-9);
}
