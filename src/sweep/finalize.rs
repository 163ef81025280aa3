// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)
//
// Trimming the finished sweep down to the requested region.

use crate::context::SweepContext;
use crate::error::TriangulationError;
use crate::front::NodeIdx;
use crate::geom::{orient2d, Orientation};
use crate::mesh::{PointIdx, TriIdx};
use crate::observer::SweepObserver;

impl<O: SweepObserver> SweepContext<O> {
    /// Point sets: fill the front out to the convex hull, then drop the
    /// triangle fans hanging off the two bound points.
    pub(crate) fn finalization_convex_hull(&mut self) -> Result<(), TriangulationError> {
        let n1 = self.next(self.front.head)?;
        let n2 = self.next(n1)?;
        self.turn_advancing_front_convex(n1, n2)?;

        // When the first or last three front nodes share one triangle it would
        // be lost with the fan, so flip it away from the bound point first.
        let last = self.prev(self.front.tail)?;
        self.rotate_off_bound(last)?;
        let first = self.next(self.front.head)?;
        self.rotate_off_bound(first)?;

        self.remove_bound_fans()?;

        let head = self.next(self.front.head)?;
        let tail = self.prev(self.front.tail)?;
        self.front.head = head;
        self.front.node_mut(head).prev = None;
        self.front.tail = tail;
        self.front.node_mut(tail).next = None;

        self.finalize_triangulation();
        Ok(())
    }

    fn rotate_off_bound(&mut self, node: NodeIdx) -> Result<(), TriangulationError> {
        let t = self.node_triangle(node)?;
        let prev = self.front.point(self.prev(node)?);
        let next = self.front.point(self.next(node)?);
        let tri = self.mesh.tri(t);
        if !(tri.contains(next) && tri.contains(prev)) {
            return Ok(());
        }
        let p = self.front.point(node);
        let ot = self.mesh.across(t, p)?;
        let op = self.mesh.opposite_point(ot, t, p)?;
        self.mesh.rotate_triangle_pair(t, p, ot, op)?;
        self.map_triangle_to_nodes(t)?;
        self.map_triangle_to_nodes(ot)
    }

    /// Walk the fan around the right bound point from the last front node
    /// down to the left bound, then the fan around the left bound up to the
    /// first front node, clearing every triangle on the way.
    fn remove_bound_fans(&mut self) -> Result<(), TriangulationError> {
        let missing = |triangle: TriIdx, point: PointIdx| TriangulationError::MissingNeighbor {
            triangle,
            point,
        };

        let left_bound = self.front.point(self.front.head);
        let last = self.prev(self.front.tail)?;
        let mut t1 = self.node_triangle(last)?;
        let mut p1 = self.front.point(last);
        self.front.node_mut(last).triangle = None;
        loop {
            self.mesh.remove_from_list(t1);
            p1 = self.mesh.tri(t1).point_ccw(p1)?;
            if p1 == left_bound {
                break;
            }
            let t2 = self.mesh.tri(t1).neighbor_ccw(p1).ok_or(missing(t1, p1))?;
            self.mesh.clear(t1);
            t1 = t2;
        }

        let first = self.front.point(self.next(self.front.head)?);
        p1 = self.mesh.tri(t1).point_cw(left_bound)?;
        let mut t2 = self.mesh.tri(t1).neighbor_cw(left_bound);
        self.mesh.clear(t1);
        while p1 != first {
            let t = t2.ok_or(missing(t1, p1))?;
            self.mesh.remove_from_list(t);
            p1 = self.mesh.tri(t).point_ccw(p1)?;
            t2 = self.mesh.tri(t).neighbor_ccw(p1);
            self.mesh.clear(t);
            t1 = t;
        }
        Ok(())
    }

    /// Fill every concave wedge of the front between `b` and the tail.
    fn turn_advancing_front_convex(
        &mut self,
        b: NodeIdx,
        c: NodeIdx,
    ) -> Result<(), TriangulationError> {
        let first = b;
        let (mut b, mut c) = (b, c);
        while c != self.front.tail {
            self.observer.active_node(c);
            let d = self.next(c)?;
            if orient2d(self.node_point(b), self.node_point(c), self.node_point(d)) == Orientation::Ccw {
                // [b,c,d] concave
                self.fill(c)?;
                c = d;
                continue;
            }
            if b != first {
                let a = self.prev(b)?;
                if orient2d(self.node_point(a), self.node_point(b), self.node_point(c))
                    == Orientation::Ccw
                {
                    // [a,b,c] concave
                    self.fill(b)?;
                    b = a;
                    continue;
                }
            }
            b = c;
            c = d;
        }
        Ok(())
    }

    /// Polygons: find a triangle inside the outer boundary next to the
    /// leftmost front point and keep everything reachable from it without
    /// crossing a constrained edge.
    pub(crate) fn finalization_polygon(&mut self) -> Result<(), TriangulationError> {
        let n = self.next(self.front.head)?;
        let p = self.front.point(n);
        let mut t = self.node_triangle(n)?;
        let mut steps = 0usize;
        while !self.mesh.tri(t).constrained_cw(p) {
            steps += 1;
            t = match self.mesh.tri(t).neighbor_ccw(p) {
                Some(next) if steps <= self.mesh.tris.len() => next,
                _ => return Err(TriangulationError::NoInteriorTriangle { point: p }),
            };
        }
        self.mesh_clean(t);
        Ok(())
    }
}
