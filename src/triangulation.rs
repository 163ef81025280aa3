// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)

use std::collections::HashSet;

use crate::context::{SweepConfig, SweepContext};
use crate::error::TriangulationError;
use crate::geom::{signed_area2, Point, Real};
use crate::observer::{NoopObserver, SweepObserver};
use crate::shapes::Triangulatable;

/// One output triangle. Vertices are counter-clockwise indices into
/// `Triangulation::points`; side i is the side opposite `vertices[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTriangle {
    pub vertices: [u32; 3],
    /// Index into `Triangulation::triangles` of the triangle across each side.
    pub neighbors: [Option<u32>; 3],
    pub constrained: [bool; 3],
}

impl OutputTriangle {
    /// Index of the side joining `a` and `b`, in either order.
    pub fn edge_index(&self, a: u32, b: u32) -> Option<usize> {
        let ia = self.vertices.iter().position(|&v| v == a)?;
        let ib = self.vertices.iter().position(|&v| v == b)?;
        (ia != ib).then(|| 3 - ia - ib)
    }

    /// The two endpoints of side `i`.
    pub fn edge(&self, i: usize) -> (u32, u32) {
        (self.vertices[(i + 1) % 3], self.vertices[(i + 2) % 3])
    }
}

/// Result of a triangulation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triangulation {
    /// Distinct input points, in first-seen order.
    pub points: Vec<Point>,
    pub triangles: Vec<OutputTriangle>,
}

impl Triangulation {
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn corners(&self, t: &OutputTriangle) -> [&Point; 3] {
        t.vertices.map(|v| &self.points[v as usize])
    }

    /// Area of triangle `t` (positive for the CCW output).
    pub fn area(&self, t: &OutputTriangle) -> Real {
        let [a, b, c] = self.corners(t);
        0.5 * signed_area2(a, b, c)
    }

    pub fn total_area(&self) -> Real {
        self.triangles.iter().map(|t| self.area(t)).sum()
    }

    /// Number of distinct mesh edges flagged constrained on at least one side.
    pub fn constrained_edge_count(&self) -> usize {
        let mut seen = HashSet::new();
        for t in &self.triangles {
            for i in 0..3 {
                if t.constrained[i] {
                    let (a, b) = t.edge(i);
                    seen.insert((a.min(b), a.max(b)));
                }
            }
        }
        seen.len()
    }

    /// Index of the input point with exactly these coordinates.
    pub fn point_index(&self, p: &Point) -> Option<u32> {
        self.points.iter().position(|q| q == p).map(|i| i as u32)
    }

    /// Triangles having `a`-`b` as a side, with the side's index.
    pub fn triangles_with_edge(&self, a: u32, b: u32) -> Vec<(usize, usize)> {
        self.triangles
            .iter()
            .enumerate()
            .filter_map(|(ti, t)| t.edge_index(a, b).map(|i| (ti, i)))
            .collect()
    }
}

/// Triangulate `shape` with the default configuration.
pub fn triangulate<T: Triangulatable>(shape: &T) -> Result<Triangulation, TriangulationError> {
    triangulate_with(shape, SweepConfig::default(), NoopObserver)
}

/// Triangulate `shape`, reporting progress to `observer`.
///
/// Pass `&mut observer` to keep ownership of it.
pub fn triangulate_with<T: Triangulatable, O: SweepObserver>(
    shape: &T,
    config: SweepConfig,
    observer: O,
) -> Result<Triangulation, TriangulationError> {
    let mut ctx = SweepContext::with_observer(shape.mode(), config, observer);
    shape.prepare(&mut ctx)?;
    ctx.triangulate()?;
    Ok(ctx.into_triangulation())
}
