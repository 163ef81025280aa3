// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)
//
// Triangle mesh for the sweep.
//
// Triangles and points live in Vec arenas addressed by u32 indices; neighbor
// links are Option<TriIdx>. Edge i of a triangle is the edge opposite
// points[i], so neighbors[i], constrained[i] and delaunay[i] all describe
// that same edge.
//
// All triangles are wound counter-clockwise. "CW of p" and "CCW of p" name
// the vertex (or the edge leading to it) one step around the triangle from p.

use crate::error::TriangulationError;
use crate::geom::{Point, Real};

pub mod delaunay;

/// Index into Mesh::verts
pub type PointIdx = u32;
/// Index into Mesh::tris
pub type TriIdx = u32;

/// A constraint edge. `q` is the endpoint that comes later in sweep order
/// (greater y, ties broken by greater x); the edge is stored at `q`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub p: PointIdx,
    pub q: PointIdx,
}

#[derive(Clone, Debug, Default)]
pub struct Vertex {
    pub point: Point,
    /// Constraints for which this vertex is the upper endpoint.
    pub edges: Vec<Constraint>,
}

#[derive(Clone, Debug)]
pub struct Triangle {
    pub points: [PointIdx; 3],
    pub neighbors: [Option<TriIdx>; 3],
    pub constrained: [bool; 3],
    /// Valid only for the duration of one legalization pass.
    pub delaunay: [bool; 3],
    pub interior: bool,
    /// Cleared when the triangle is dropped from the triangle list.
    pub live: bool,
}

impl Triangle {
    pub fn new(a: PointIdx, b: PointIdx, c: PointIdx) -> Self {
        Triangle {
            points: [a, b, c],
            neighbors: [None; 3],
            constrained: [false; 3],
            delaunay: [false; 3],
            interior: false,
            live: true,
        }
    }

    #[inline]
    fn slot(&self, p: PointIdx) -> Option<usize> {
        self.points.iter().position(|&q| q == p)
    }

    /// Index of p among the three points.
    pub fn index(&self, p: PointIdx) -> Result<usize, TriangulationError> {
        self.slot(p)
            .ok_or(TriangulationError::PointNotInTriangle { point: p })
    }

    #[inline]
    pub fn index_cw(&self, p: PointIdx) -> Result<usize, TriangulationError> {
        Ok((self.index(p)? + 2) % 3)
    }

    #[inline]
    pub fn index_ccw(&self, p: PointIdx) -> Result<usize, TriangulationError> {
        Ok((self.index(p)? + 1) % 3)
    }

    #[inline]
    pub fn contains(&self, p: PointIdx) -> bool {
        self.slot(p).is_some()
    }

    #[inline]
    pub fn contains_edge(&self, p: PointIdx, q: PointIdx) -> bool {
        self.contains(p) && self.contains(q)
    }

    /// The point counter-clockwise to p.
    pub fn point_ccw(&self, p: PointIdx) -> Result<PointIdx, TriangulationError> {
        Ok(self.points[self.index_ccw(p)?])
    }

    /// The point clockwise to p.
    pub fn point_cw(&self, p: PointIdx) -> Result<PointIdx, TriangulationError> {
        Ok(self.points[self.index_cw(p)?])
    }

    // Edge lookups by point fall through to the last slot when p is absent,
    // the same way the neighbor queries do.
    #[inline]
    fn cw_slot(&self, p: PointIdx) -> usize {
        match self.slot(p) {
            Some(0) => 1,
            Some(1) => 2,
            _ => 0,
        }
    }

    #[inline]
    fn ccw_slot(&self, p: PointIdx) -> usize {
        match self.slot(p) {
            Some(0) => 2,
            Some(1) => 0,
            _ => 1,
        }
    }

    #[inline]
    fn across_slot(&self, p: PointIdx) -> usize {
        match self.slot(p) {
            Some(0) => 0,
            Some(1) => 1,
            _ => 2,
        }
    }

    /// The neighbor clockwise to p.
    #[inline]
    pub fn neighbor_cw(&self, p: PointIdx) -> Option<TriIdx> {
        self.neighbors[self.cw_slot(p)]
    }

    /// The neighbor counter-clockwise to p.
    #[inline]
    pub fn neighbor_ccw(&self, p: PointIdx) -> Option<TriIdx> {
        self.neighbors[self.ccw_slot(p)]
    }

    /// The neighbor across from p.
    #[inline]
    pub fn neighbor_across(&self, p: PointIdx) -> Option<TriIdx> {
        self.neighbors[self.across_slot(p)]
    }

    pub fn constrained_cw(&self, p: PointIdx) -> bool {
        self.constrained[self.cw_slot(p)]
    }

    pub fn constrained_ccw(&self, p: PointIdx) -> bool {
        self.constrained[self.ccw_slot(p)]
    }

    pub fn constrained_across(&self, p: PointIdx) -> bool {
        self.constrained[self.across_slot(p)]
    }

    pub fn set_constrained_cw(&mut self, p: PointIdx, ce: bool) {
        let i = self.cw_slot(p);
        self.constrained[i] = ce;
    }

    pub fn set_constrained_ccw(&mut self, p: PointIdx, ce: bool) {
        let i = self.ccw_slot(p);
        self.constrained[i] = ce;
    }

    pub fn set_constrained_across(&mut self, p: PointIdx, ce: bool) {
        let i = self.across_slot(p);
        self.constrained[i] = ce;
    }

    pub fn delaunay_cw(&self, p: PointIdx) -> bool {
        self.delaunay[self.cw_slot(p)]
    }

    pub fn delaunay_ccw(&self, p: PointIdx) -> bool {
        self.delaunay[self.ccw_slot(p)]
    }

    pub fn delaunay_across(&self, p: PointIdx) -> bool {
        self.delaunay[self.across_slot(p)]
    }

    pub fn set_delaunay_cw(&mut self, p: PointIdx, de: bool) {
        let i = self.cw_slot(p);
        self.delaunay[i] = de;
    }

    pub fn set_delaunay_ccw(&mut self, p: PointIdx, de: bool) {
        let i = self.ccw_slot(p);
        self.delaunay[i] = de;
    }

    pub fn set_delaunay_across(&mut self, p: PointIdx, de: bool) {
        let i = self.across_slot(p);
        self.delaunay[i] = de;
    }

    pub fn clear_delaunay_edges(&mut self) {
        self.delaunay = [false; 3];
    }

    pub fn clear_neighbors(&mut self) {
        self.neighbors = [None; 3];
    }

    /// Drop the link to `t`, whichever slot holds it.
    pub fn clear_neighbor(&mut self, t: TriIdx) {
        if self.neighbors[0] == Some(t) {
            self.neighbors[0] = None;
        } else if self.neighbors[1] == Some(t) {
            self.neighbors[1] = None;
        } else {
            self.neighbors[2] = None;
        }
    }

    /// Index of the edge joining p1 and p2, in either order.
    pub fn edge_index(&self, p1: PointIdx, p2: PointIdx) -> Option<usize> {
        let i1 = self.slot(p1)?;
        let i2 = self.slot(p2)?;
        if i1 == i2 {
            return None;
        }
        Some(3 - i1 - i2)
    }

    pub fn mark_constrained_edge_index(&mut self, index: usize) {
        self.constrained[index] = true;
    }

    /// Flag the edge pq as constrained. No-op when pq is not an edge.
    pub fn mark_constrained_edge(&mut self, p: PointIdx, q: PointIdx) {
        if let Some(i) = self.edge_index(p, q) {
            self.constrained[i] = true;
        }
    }

    /// Rotate the vertex labels clockwise around `o_point`, replacing the
    /// vertex that leaves with `n_point`. This turns the triangle into its
    /// post-flip form; the companion triangle is rotated by the caller.
    pub fn legalize(
        &mut self,
        o_point: PointIdx,
        n_point: PointIdx,
    ) -> Result<(), TriangulationError> {
        let [p0, p1, p2] = self.points;
        self.points = match self.index(o_point)? {
            0 => [p2, p0, n_point],
            1 => [n_point, p0, p1],
            _ => [p2, n_point, p1],
        };
        Ok(())
    }
}

/// Point and triangle arenas for one triangulation run.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub verts: Vec<Vertex>,
    pub tris: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Mesh {
            verts: Vec::new(),
            tris: Vec::new(),
        }
    }

    #[inline]
    pub fn point(&self, p: PointIdx) -> &Point {
        &self.verts[p as usize].point
    }

    #[inline]
    pub fn x(&self, p: PointIdx) -> Real {
        self.verts[p as usize].point.x
    }

    #[inline]
    pub fn y(&self, p: PointIdx) -> Real {
        self.verts[p as usize].point.y
    }

    #[inline]
    pub fn tri(&self, t: TriIdx) -> &Triangle {
        &self.tris[t as usize]
    }

    #[inline]
    pub fn tri_mut(&mut self, t: TriIdx) -> &mut Triangle {
        &mut self.tris[t as usize]
    }

    pub fn add_point(&mut self, point: Point) -> PointIdx {
        let idx = self.verts.len() as PointIdx;
        self.verts.push(Vertex {
            point,
            edges: Vec::new(),
        });
        idx
    }

    /// Append a new live triangle. Neighbors are wired separately.
    pub fn add_triangle(&mut self, a: PointIdx, b: PointIdx, c: PointIdx) -> TriIdx {
        let idx = self.tris.len() as TriIdx;
        self.tris.push(Triangle::new(a, b, c));
        idx
    }

    /// Drop a triangle from the triangle list. Its links stay intact.
    #[inline]
    pub fn remove_from_list(&mut self, t: TriIdx) {
        self.tris[t as usize].live = false;
    }

    /// The neighbor across from p in `t`, or MissingNeighbor.
    pub fn across(&self, t: TriIdx, p: PointIdx) -> Result<TriIdx, TriangulationError> {
        self.tri(t)
            .neighbor_across(p)
            .ok_or(TriangulationError::MissingNeighbor { triangle: t, point: p })
    }

    /// The point of `ot` that is not shared with `t`, where p is the point of
    /// `t` that is not shared with `ot`.
    pub fn opposite_point(
        &self,
        ot: TriIdx,
        t: TriIdx,
        p: PointIdx,
    ) -> Result<PointIdx, TriangulationError> {
        debug_assert_ne!(ot, t, "self-pointer error");
        let cw = self.tri(t).point_cw(p)?;
        self.tri(ot).point_cw(cw)
    }

    /// Twice the signed area of triangle t.
    pub fn signed_area2(&self, t: TriIdx) -> Real {
        let [a, b, c] = self.tri(t).points;
        crate::geom::signed_area2(self.point(a), self.point(b), self.point(c))
    }

    pub fn area(&self, t: TriIdx) -> Real {
        0.5 * self.signed_area2(t).abs()
    }
}
