// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)
//
// Sweep-line constrained Delaunay triangulation.
//
// Points are visited bottom to top. Each point event hangs a new triangle off
// the advancing front and legalizes it; the front is then patched by filling
// small holes next to the new node and any basin to its right. Constraints
// owned by the point are enforced right after its point event (edge_event.rs).
// Once every point is in, the mesh is trimmed to the convex hull or to the
// polygon interior (finalize.rs).
//
// All logic is driven through SweepContext.

use crate::context::SweepContext;
use crate::error::TriangulationError;
use crate::front::NodeIdx;
use crate::geom::{
    angle, basin_angle, orient2d, smart_incircle, Orientation, EPSILON, PI_3DIV4, PI_DIV2,
};
use crate::mesh::{PointIdx, TriIdx};
use crate::observer::SweepObserver;
use crate::shapes::TriangulationMode;

mod edge_event;
mod finalize;


impl<O: SweepObserver> SweepContext<O> {
    /// Run the whole sweep on the registered points and constraints.
    ///
    /// Degenerate input (fewer than three distinct points, or all of them
    /// collinear) finishes with an empty result rather than an error.
    pub fn triangulate(&mut self) -> Result<(), TriangulationError> {
        if !self.prepare_sweep() {
            return Ok(());
        }
        self.create_advancing_front();
        self.sweep_points()?;
        match self.mode() {
            TriangulationMode::Polygon => self.finalization_polygon()?,
            TriangulationMode::Unconstrained | TriangulationMode::Constrained => {
                self.finalization_convex_hull()?
            }
        }
        tracing::debug!(
            points = self.input_count(),
            constraints = self.constraint_count(),
            triangles = self.result().len(),
            "sweep finished"
        );
        Ok(())
    }

    fn sweep_points(&mut self) -> Result<(), TriangulationError> {
        for i in 1..self.points().len() {
            let point = self.points()[i];
            let node = self.point_event(point)?;
            let edges = self.mesh.verts[point as usize].edges.clone();
            for edge in edges {
                self.observer.active_constraint(&edge);
                self.edge_event_for(edge, node)?;
            }
            self.observer.step(&self.mesh);
        }
        Ok(())
    }

    /// Attach `point` to the front node left of it and patch the front
    /// around the new node.
    fn point_event(&mut self, point: PointIdx) -> Result<NodeIdx, TriangulationError> {
        let node = self.locate_node(point)?;
        self.observer.active_node(node);
        let new_node = self.new_front_triangle(point, node)?;

        // The point is never left of the located node, so only the upper
        // side of the tolerance matters.
        if self.mesh.x(point) <= self.front.node(node).x + EPSILON {
            self.fill(node)?;
        }

        self.fill_advancing_front(new_node)?;
        Ok(new_node)
    }

    fn new_front_triangle(
        &mut self,
        point: PointIdx,
        node: NodeIdx,
    ) -> Result<NodeIdx, TriangulationError> {
        let next = self.next(node)?;
        let t = self
            .mesh
            .add_triangle(point, self.front.point(node), self.front.point(next));
        let nt = self.node_triangle(node)?;
        self.mesh.mark_neighbor(t, nt);

        let new_node = self.front.insert_after(node, point, self.mesh.x(point));
        self.observer.active_node(new_node);

        if !self.legalize(t)? {
            self.map_triangle_to_nodes(t)?;
        }
        Ok(new_node)
    }

    /// Close the wedge at `node` with the triangle (prev, node, next) and drop
    /// `node` from the front.
    pub(crate) fn fill(&mut self, node: NodeIdx) -> Result<(), TriangulationError> {
        let prev = self.prev(node)?;
        let next = self.next(node)?;
        let t = self.mesh.add_triangle(
            self.front.point(prev),
            self.front.point(node),
            self.front.point(next),
        );
        // constrained flags are picked up from the neighbors by legalize
        let pt = self.node_triangle(prev)?;
        self.mesh.mark_neighbor(t, pt);
        let nt = self.node_triangle(node)?;
        self.mesh.mark_neighbor(t, nt);

        self.front.remove(node);

        if !self.legalize(t)? {
            self.map_triangle_to_nodes(t)?;
        }
        Ok(())
    }

    /// Restore the Delaunay condition around `t` by flipping. Returns true
    /// if a flip happened; the flipped triangles are then already mapped onto
    /// the front and the caller must not map `t` again.
    pub(crate) fn legalize(&mut self, t: TriIdx) -> Result<bool, TriangulationError> {
        if self.legalization.depth == 0 {
            self.legalization.flipped.clear();
        }
        self.legalization.depth += 1;
        let legalized = self.legalize_edges(t);
        self.legalization.depth -= 1;
        legalized
    }

    fn legalize_edges(&mut self, t: TriIdx) -> Result<bool, TriangulationError> {
        for i in 0..3 {
            let tri = self.mesh.tri(t);
            if tri.delaunay[i] {
                continue;
            }
            let Some(ot) = tri.neighbors[i] else {
                continue;
            };
            let p = tri.points[i];
            let op = self.mesh.opposite_point(ot, t, p)?;
            let oi = self.mesh.tri(ot).index(op)?;

            // Constrained edges never flip. A Delaunay edge is fixed for the
            // rest of this legalization pass.
            let (oc, od) = {
                let o = self.mesh.tri(ot);
                (o.constrained[oi], o.delaunay[oi])
            };
            if oc || od {
                self.mesh.tri_mut(t).constrained[i] = oc;
                continue;
            }

            let tri = self.mesh.tri(t);
            let inside = smart_incircle(
                self.mesh.point(p),
                self.mesh.point(tri.point_ccw(p)?),
                self.mesh.point(tri.point_cw(p)?),
                self.mesh.point(op),
            );
            if inside {
                self.mesh.tri_mut(t).delaunay[i] = true;
                self.mesh.tri_mut(ot).delaunay[oi] = true;

                self.mesh.rotate_triangle_pair(t, p, ot, op)?;
                self.legalization.flipped.extend([t, ot]);
                let before = self.apexes(&[t, ot], p, op);

                // Four new outer edges to check. Each triangle is mapped
                // onto the front once, by whoever legalized it last.
                if !self.legalize(t)? {
                    self.map_triangle_to_nodes(t)?;
                }
                if !self.legalize(ot)? {
                    self.map_triangle_to_nodes(ot)?;
                }

                // The flag on p-op may have travelled with later rotations,
                // so it is looked up by its points rather than by slot. If a
                // deeper flip replaced a triangle beside p-op, the side
                // faces a new quad and is checked again.
                let holders = self.clear_delaunay_edge(p, op);
                if self.apexes(&holders, p, op) != before {
                    if let Some(&h) = holders.first() {
                        self.legalize(h)?;
                    }
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Drop the provisional Delaunay flag on side p-q from every triangle
    /// rotated during the current legalization. Returns the triangles that
    /// hold the side.
    pub(crate) fn clear_delaunay_edge(&mut self, p: PointIdx, q: PointIdx) -> Vec<TriIdx> {
        let mut holders = Vec::with_capacity(2);
        for k in 0..self.legalization.flipped.len() {
            let x = self.legalization.flipped[k];
            if holders.contains(&x) {
                continue;
            }
            if let Some(i) = self.mesh.tri(x).edge_index(p, q) {
                self.mesh.tri_mut(x).delaunay[i] = false;
                holders.push(x);
            }
        }
        holders
    }

    /// Sorted points across side p-q in each of `tris`.
    fn apexes(&self, tris: &[TriIdx], p: PointIdx, q: PointIdx) -> Vec<PointIdx> {
        let mut apexes: Vec<PointIdx> = tris
            .iter()
            .filter_map(|&x| {
                let tri = self.mesh.tri(x);
                tri.edge_index(p, q).map(|i| tri.points[i])
            })
            .collect();
        apexes.sort_unstable();
        apexes
    }

    /// Fill small holes right and left of a newly added node, then a basin
    /// to its right if the front dips there.
    fn fill_advancing_front(&mut self, n: NodeIdx) -> Result<(), TriangulationError> {
        let mut node = self.next(n)?;
        while self.front.next(node).is_some() {
            if self.is_large_hole(node)? {
                break;
            }
            self.fill(node)?;
            node = self.next(node)?;
        }

        let mut node = self.prev(n)?;
        while self.front.prev(node).is_some() {
            if self.is_large_hole(node)? {
                break;
            }
            self.fill(node)?;
            node = self.prev(node)?;
        }

        if let Some(next) = self.front.next(n) {
            if let Some(next2) = self.front.next(next) {
                let a = basin_angle(self.node_point(n), self.node_point(next2));
                if a < PI_3DIV4 {
                    self.fill_basin(n)?;
                }
            }
        }
        Ok(())
    }

    /// True when the front angle at `node` is above 90 degrees or negative.
    fn is_large_hole(&self, node: NodeIdx) -> Result<bool, TriangulationError> {
        let next = self.next(node)?;
        let prev = self.prev(node)?;
        let a = angle(self.node_point(node), self.node_point(next), self.node_point(prev));
        Ok(a > PI_DIV2 || a < 0.0)
    }

    /// Find the basin right of `node` (left, bottom and right boundary
    /// nodes) and fill it from the bottom up.
    fn fill_basin(&mut self, node: NodeIdx) -> Result<(), TriangulationError> {
        let next = self.next(node)?;
        let next2 = self.next(next)?;
        let left = if orient2d(self.node_point(node), self.node_point(next), self.node_point(next2))
            == Orientation::Ccw
        {
            node
        } else {
            next
        };

        let mut bottom = left;
        while let Some(n) = self.front.next(bottom) {
            if self.node_point(bottom).y >= self.node_point(n).y {
                bottom = n;
            } else {
                break;
            }
        }
        if bottom == left {
            return Ok(());
        }

        let mut right = bottom;
        while let Some(n) = self.front.next(right) {
            if self.node_point(right).y < self.node_point(n).y {
                right = n;
            } else {
                break;
            }
        }
        if right == bottom {
            return Ok(());
        }

        self.basin.left_node = left;
        self.basin.bottom_node = bottom;
        self.basin.right_node = right;
        self.basin.width = self.node_point(right).x - self.node_point(left).x;
        self.basin.left_highest = self.node_point(left).y > self.node_point(right).y;

        self.fill_basin_req(bottom)
    }

    /// Fill the basin one node at a time, always moving toward the lower
    /// neighbor, until it gets shallow or reaches a boundary node.
    fn fill_basin_req(&mut self, node: NodeIdx) -> Result<(), TriangulationError> {
        let mut node = node;
        loop {
            if self.is_shallow(node) {
                return Ok(());
            }
            self.fill(node)?;

            let prev = self.prev(node)?;
            let next = self.next(node)?;
            let (left, right) = (self.basin.left_node, self.basin.right_node);
            if prev == left && next == right {
                return Ok(());
            } else if prev == left {
                let next2 = self.next(next)?;
                let o = orient2d(self.node_point(node), self.node_point(next), self.node_point(next2));
                if o == Orientation::Cw {
                    return Ok(());
                }
                node = next;
            } else if next == right {
                let prev2 = self.prev(prev)?;
                let o = orient2d(self.node_point(node), self.node_point(prev), self.node_point(prev2));
                if o == Orientation::Ccw {
                    return Ok(());
                }
                node = prev;
            } else if self.node_point(prev).y < self.node_point(next).y {
                node = prev;
            } else {
                node = next;
            }
        }
    }

    /// A basin is shallow at `node` once it is wider than it is deep.
    fn is_shallow(&self, node: NodeIdx) -> bool {
        let top = if self.basin.left_highest {
            self.basin.left_node
        } else {
            self.basin.right_node
        };
        let height = self.node_point(top).y - self.node_point(node).y;
        self.basin.width > height
    }
}
