// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)
//
// Constraint enforcement.
//
// An edge event runs when the upper endpoint q of a constraint p-q has just
// been inserted. The front between q and p is filled first, so that every
// triangle the edge crosses exists. The mesh is then walked from q toward p,
// flipping each crossed triangle pair until p-q is a mesh edge. When a pair
// cannot be flipped yet, the flip-scan walks further along the edge for a
// point that makes a valid flip, then resumes.

use crate::context::{EdgeEvent, SweepContext};
use crate::error::TriangulationError;
use crate::front::NodeIdx;
use crate::geom::{in_scan_area, orient2d, Orientation, Point};
use crate::mesh::{Constraint, PointIdx, TriIdx};
use crate::observer::SweepObserver;

impl<O: SweepObserver> SweepContext<O> {
    #[inline]
    fn pt(&self, p: PointIdx) -> &Point {
        self.mesh.point(p)
    }

    /// Enforce `edge`, whose upper point was just inserted at `node`.
    ///
    /// A point found exactly on the edge is not supported: the edge is
    /// dropped with a warning and the sweep goes on.
    pub(crate) fn edge_event_for(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        match self.constraint_edge_event(edge, node) {
            Err(e) if e.is_recoverable() => {
                tracing::warn!(p = edge.p, q = edge.q, error = %e, "skipping constraint edge");
                Ok(())
            }
            r => r,
        }
    }

    fn constraint_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        self.edge_event = EdgeEvent {
            constrained_edge: edge,
            right: self.mesh.x(edge.p) > self.mesh.x(edge.q),
        };

        let t = self.node_triangle(node)?;
        self.observer.primary_triangle(t);
        if self.mesh.mark_constrained_pair(t, edge.p, edge.q) {
            return Ok(());
        }

        // Fill everything between q and p first; flips only ever see
        // triangles that already exist.
        if self.edge_event.right {
            self.fill_right_above_edge_event(edge, node)?;
        } else {
            self.fill_left_above_edge_event(edge, node)?;
        }

        let t = self.node_triangle(node)?;
        self.edge_event(edge.p, edge.q, t, edge.q)
    }

    /// Orientation of `p` against the directed line eq -> ep, as used by every
    /// above/below test.
    #[inline]
    fn side_of_edge(&self, edge: &Constraint, p: PointIdx) -> Orientation {
        orient2d(self.pt(edge.q), self.pt(p), self.pt(edge.p))
    }

    #[inline]
    fn orient_nodes(&self, a: NodeIdx, b: NodeIdx, c: NodeIdx) -> Orientation {
        orient2d(self.node_point(a), self.node_point(b), self.node_point(c))
    }

    fn fill_right_above_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        let mut node = node;
        let px = self.mesh.x(edge.p);
        while self.front.node(self.next(node)?).x < px {
            self.observer.active_node(node);
            let next = self.next(node)?;
            if self.side_of_edge(&edge, self.front.point(next)) == Orientation::Ccw {
                self.fill_right_below_edge_event(edge, node)?;
            } else {
                node = next;
            }
        }
        Ok(())
    }

    fn fill_right_below_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        loop {
            self.observer.active_node(node);
            if self.front.node(node).x >= self.mesh.x(edge.p) {
                return Ok(());
            }
            let next = self.next(node)?;
            let next2 = self.next(next)?;
            if self.orient_nodes(node, next, next2) == Orientation::Ccw {
                return self.fill_right_concave_edge_event(edge, node);
            }
            self.fill_right_convex_edge_event(edge, node)?;
        }
    }

    fn fill_right_concave_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        loop {
            let next = self.next(node)?;
            self.fill(next)?;
            let next = self.next(node)?;
            if self.front.point(next) == edge.p {
                return Ok(());
            }
            if self.side_of_edge(&edge, self.front.point(next)) != Orientation::Ccw {
                return Ok(());
            }
            // below the edge; keep filling while the next wedge is concave
            let next2 = self.next(next)?;
            if self.orient_nodes(node, next, next2) != Orientation::Ccw {
                return Ok(());
            }
        }
    }

    fn fill_right_convex_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        let mut node = node;
        loop {
            let n1 = self.next(node)?;
            let n2 = self.next(n1)?;
            let n3 = self.next(n2)?;
            if self.orient_nodes(n1, n2, n3) == Orientation::Ccw {
                return self.fill_right_concave_edge_event(edge, n1);
            }
            if self.side_of_edge(&edge, self.front.point(n2)) != Orientation::Ccw {
                return Ok(());
            }
            node = n1;
        }
    }

    fn fill_left_above_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        let mut node = node;
        let px = self.mesh.x(edge.p);
        while self.front.node(self.prev(node)?).x > px {
            self.observer.active_node(node);
            let prev = self.prev(node)?;
            if self.side_of_edge(&edge, self.front.point(prev)) == Orientation::Cw {
                self.fill_left_below_edge_event(edge, node)?;
            } else {
                node = prev;
            }
        }
        Ok(())
    }

    fn fill_left_below_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        loop {
            self.observer.active_node(node);
            if self.front.node(node).x <= self.mesh.x(edge.p) {
                return Ok(());
            }
            let prev = self.prev(node)?;
            let prev2 = self.prev(prev)?;
            if self.orient_nodes(node, prev, prev2) == Orientation::Cw {
                return self.fill_left_concave_edge_event(edge, node);
            }
            self.fill_left_convex_edge_event(edge, node)?;
        }
    }

    fn fill_left_concave_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        loop {
            let prev = self.prev(node)?;
            self.fill(prev)?;
            let prev = self.prev(node)?;
            if self.front.point(prev) == edge.p {
                return Ok(());
            }
            if self.side_of_edge(&edge, self.front.point(prev)) != Orientation::Cw {
                return Ok(());
            }
            let prev2 = self.prev(prev)?;
            if self.orient_nodes(node, prev, prev2) != Orientation::Cw {
                return Ok(());
            }
        }
    }

    fn fill_left_convex_edge_event(
        &mut self,
        edge: Constraint,
        node: NodeIdx,
    ) -> Result<(), TriangulationError> {
        let mut node = node;
        loop {
            let n1 = self.prev(node)?;
            let n2 = self.prev(n1)?;
            let n3 = self.prev(n2)?;
            if self.orient_nodes(n1, n2, n3) == Orientation::Cw {
                return self.fill_left_concave_edge_event(edge, n1);
            }
            if self.side_of_edge(&edge, self.front.point(n2)) != Orientation::Cw {
                return Ok(());
            }
            node = n1;
        }
    }

    /// Walk from `triangle` (which has `point` as a vertex) toward ep until
    /// ep-eq is a mesh edge, flipping crossed triangles on the way.
    fn edge_event(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        triangle: TriIdx,
        point: PointIdx,
    ) -> Result<(), TriangulationError> {
        let (mut eq, mut triangle, mut point) = (eq, triangle, point);
        loop {
            self.observer.primary_triangle(triangle);
            if self.mesh.mark_constrained_pair(triangle, ep, eq) {
                return Ok(());
            }

            let tri = self.mesh.tri(triangle);
            let p1 = tri.point_ccw(point)?;
            let p2 = tri.point_cw(point)?;

            let o1 = orient2d(self.pt(eq), self.pt(p1), self.pt(ep));
            let o2 = if o1 == Orientation::Collinear {
                Orientation::Collinear
            } else {
                orient2d(self.pt(eq), self.pt(p2), self.pt(ep))
            };

            // A mesh point sits on the edge: enforce eq-on first, then carry
            // on from that point with the shortened edge.
            let on_edge = match (o1, o2) {
                (Orientation::Collinear, _) => Some(p1),
                (_, Orientation::Collinear) => Some(p2),
                _ => None,
            };
            if let Some(on) = on_edge {
                if !tri.contains_edge(eq, on) {
                    return Err(TriangulationError::PointOnConstrainedEdge { point: on, p: ep, q: eq });
                }
                self.mesh.mark_constrained_pair(triangle, eq, on);
                self.edge_event.constrained_edge.q = on;
                triangle = self.mesh.across(triangle, point)?;
                tracing::debug!(point = on, p = ep, q = eq, "constraint passes through a mesh point");
                eq = on;
                point = on;
                continue;
            }

            if o1 == o2 {
                // Both far points on one side: rotate toward the triangle
                // that crosses the edge.
                let next = if o1 == Orientation::Cw {
                    tri.neighbor_ccw(point)
                } else {
                    tri.neighbor_cw(point)
                };
                triangle = next.ok_or(TriangulationError::MissingNeighbor { triangle, point })?;
                continue;
            }

            return self.flip_edge_event(ep, eq, triangle, point);
        }
    }

    /// Flip `t` with the triangle across from `p` until ep-eq is a mesh edge.
    fn flip_edge_event(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        t: TriIdx,
        p: PointIdx,
    ) -> Result<(), TriangulationError> {
        let mut t = t;
        loop {
            let ot = self.mesh.across(t, p)?;
            let op = self.mesh.opposite_point(ot, t, p)?;

            if self.mesh.tri(t).constrained_across(p) {
                return Err(TriangulationError::IntersectingConstraints { triangle: t, p: ep, q: eq });
            }

            self.observer.primary_triangle(t);
            self.observer.secondary_triangle(ot);

            let tri = self.mesh.tri(t);
            let flippable = in_scan_area(
                self.pt(p),
                self.pt(tri.point_ccw(p)?),
                self.pt(tri.point_cw(p)?),
                self.pt(op),
            );
            if !flippable {
                let new_p = self.next_flip_point(ep, eq, ot, op)?;
                self.flip_scan_edge_event(ep, eq, t, ot, new_p)?;
                return self.edge_event(ep, eq, t, p);
            }

            self.mesh.rotate_triangle_pair(t, p, ot, op)?;
            self.map_triangle_to_nodes(t)?;
            self.map_triangle_to_nodes(ot)?;

            if p == eq && op == ep {
                // A sub-edge from the flip-scan is left for the outer walk to
                // mark; only the active constraint itself is marked here.
                let active = self.edge_event.constrained_edge;
                if eq == active.q && ep == active.p {
                    self.mesh.tri_mut(t).mark_constrained_edge(ep, eq);
                    self.mesh.tri_mut(ot).mark_constrained_edge(ep, eq);
                    self.legalize(t)?;
                    self.legalize(ot)?;
                }
                return Ok(());
            }

            let o = orient2d(self.pt(eq), self.pt(op), self.pt(ep));
            t = self.next_flip_triangle(o, t, ot, p, op)?;
        }
    }

    /// After a flip only one of the pair still crosses the edge. Legalize the
    /// other one, with the shared side pinned, and return the crossing one.
    fn next_flip_triangle(
        &mut self,
        o: Orientation,
        t: TriIdx,
        ot: TriIdx,
        p: PointIdx,
        op: PointIdx,
    ) -> Result<TriIdx, TriangulationError> {
        let (done, crossing) = if o == Orientation::Ccw { (ot, t) } else { (t, ot) };
        let i = self
            .mesh
            .tri(done)
            .edge_index(p, op)
            .ok_or(TriangulationError::EdgeNotInTriangle { triangle: done, p, q: op })?;
        self.mesh.tri_mut(done).delaunay[i] = true;
        self.legalize(done)?;
        self.mesh.tri_mut(done).clear_delaunay_edges();
        // a rotation inside legalize may have carried the flag off `done`
        self.clear_delaunay_edge(p, op);
        Ok(crossing)
    }

    /// The vertex of `ot` to continue a flip-scan from, chosen by which side
    /// of the edge `op` lies on.
    fn next_flip_point(
        &self,
        ep: PointIdx,
        eq: PointIdx,
        ot: TriIdx,
        op: PointIdx,
    ) -> Result<PointIdx, TriangulationError> {
        match orient2d(self.pt(eq), self.pt(op), self.pt(ep)) {
            Orientation::Cw => self.mesh.tri(ot).point_ccw(op),
            Orientation::Ccw => self.mesh.tri(ot).point_cw(op),
            Orientation::Collinear => {
                Err(TriangulationError::PointOnConstrainedEdge { point: op, p: ep, q: eq })
            }
        }
    }

    /// Walk across triangles past `flip_triangle` until a point is found that
    /// lies in its scan area, then flip toward that point.
    fn flip_scan_edge_event(
        &mut self,
        ep: PointIdx,
        eq: PointIdx,
        flip_triangle: TriIdx,
        t: TriIdx,
        p: PointIdx,
    ) -> Result<(), TriangulationError> {
        let (mut t, mut p) = (t, p);
        loop {
            let ot = self.mesh.across(t, p)?;
            let op = self.mesh.opposite_point(ot, t, p)?;

            self.observer.primary_triangle(t);
            self.observer.secondary_triangle(ot);

            let ft = self.mesh.tri(flip_triangle);
            let in_scan = in_scan_area(
                self.pt(eq),
                self.pt(ft.point_ccw(eq)?),
                self.pt(ft.point_cw(eq)?),
                self.pt(op),
            );
            if in_scan {
                return self.flip_edge_event(eq, op, ot, op);
            }
            p = self.next_flip_point(ep, eq, ot, op)?;
            t = ot;
        }
    }
}
