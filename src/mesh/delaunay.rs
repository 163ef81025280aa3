// Copyright 2025 Lars Brubaker
// Neighbor wiring and edge flips for Mesh.

use super::{Mesh, PointIdx, TriIdx};
use crate::error::TriangulationError;

impl Mesh {
    /// Record `t` as the neighbor of `o` across the edge p1-p2 of `o`.
    fn mark_neighbor_edge(&mut self, o: TriIdx, p1: PointIdx, p2: PointIdx, t: TriIdx) {
        let tri = self.tri_mut(o);
        match tri.edge_index(p1, p2) {
            Some(i) => tri.neighbors[i] = Some(t),
            None => tracing::error!(triangle = o, p1, p2, "neighbor wiring mismatch"),
        }
    }

    /// Find which side of `t` is shared with `other` and link the two
    /// triangles symmetrically. Logs and does nothing if they share no side.
    pub fn mark_neighbor(&mut self, t: TriIdx, other: TriIdx) {
        let [a, b, c] = self.tri(t).points;
        let o = self.tri(other);
        let (slot, p1, p2) = if o.contains_edge(b, c) {
            (0, b, c)
        } else if o.contains_edge(a, c) {
            (1, a, c)
        } else if o.contains_edge(a, b) {
            (2, a, b)
        } else {
            tracing::error!(triangle = t, other, "mark_neighbor found no shared edge");
            return;
        };
        self.tri_mut(t).neighbors[slot] = Some(other);
        self.mark_neighbor_edge(other, p1, p2, t);
    }

    /// Sever `t` from all of its neighbors and drop it from the list.
    pub fn clear(&mut self, t: TriIdx) {
        for n in self.tri(t).neighbors.into_iter().flatten() {
            self.tri_mut(n).clear_neighbor(t);
        }
        let tri = self.tri_mut(t);
        tri.clear_neighbors();
        tri.live = false;
    }

    /// Mark p-q constrained on `t` and on the neighbor sharing that side.
    /// Returns false when p-q is not a side of `t`.
    pub fn mark_constrained_pair(&mut self, t: TriIdx, p: PointIdx, q: PointIdx) -> bool {
        let Some(i) = self.tri(t).edge_index(p, q) else {
            return false;
        };
        self.tri_mut(t).mark_constrained_edge_index(i);
        if let Some(n) = self.tri(t).neighbors[i] {
            self.tri_mut(n).mark_constrained_edge(p, q);
        }
        true
    }

    /// Rotate the pair (t, ot) one vertex clockwise: the shared edge is
    /// replaced by the other diagonal p-op.
    ///
    /// ```text
    ///       n2                    n2
    ///  P +-----+             P +-----+
    ///    | t  /|               |\  t |
    ///    |   / |               | \   |
    ///  n1|  /  |n3           n1|  \  |n3
    ///    | /   |    after CW   |   \ |
    ///    |/ oT |               | oT \|
    ///    +-----+ oP            +-----+
    ///       n4                    n4
    /// ```
    ///
    /// Constrained and Delaunay flags on the four outer sides travel with
    /// their sides; the outer neighbors are re-wired to the new triangles.
    pub fn rotate_triangle_pair(
        &mut self,
        t: TriIdx,
        p: PointIdx,
        ot: TriIdx,
        op: PointIdx,
    ) -> Result<(), TriangulationError> {
        let tt = self.tri(t);
        let oo = self.tri(ot);
        let n1 = tt.neighbor_ccw(p);
        let n2 = tt.neighbor_cw(p);
        let n3 = oo.neighbor_ccw(op);
        let n4 = oo.neighbor_cw(op);

        let ce1 = tt.constrained_ccw(p);
        let ce2 = tt.constrained_cw(p);
        let ce3 = oo.constrained_ccw(op);
        let ce4 = oo.constrained_cw(op);

        let de1 = tt.delaunay_ccw(p);
        let de2 = tt.delaunay_cw(p);
        let de3 = oo.delaunay_ccw(op);
        let de4 = oo.delaunay_cw(op);

        self.tri_mut(t).legalize(p, op)?;
        self.tri_mut(ot).legalize(op, p)?;

        {
            let o = self.tri_mut(ot);
            o.set_delaunay_ccw(p, de1);
            o.set_delaunay_cw(op, de4);
            o.set_constrained_ccw(p, ce1);
            o.set_constrained_cw(op, ce4);
        }
        {
            let n = self.tri_mut(t);
            n.set_delaunay_cw(p, de2);
            n.set_delaunay_ccw(op, de3);
            n.set_constrained_cw(p, ce2);
            n.set_constrained_ccw(op, ce3);
        }

        self.tri_mut(t).clear_neighbors();
        self.tri_mut(ot).clear_neighbors();
        if let Some(n) = n1 {
            self.mark_neighbor(ot, n);
        }
        if let Some(n) = n2 {
            self.mark_neighbor(t, n);
        }
        if let Some(n) = n3 {
            self.mark_neighbor(t, n);
        }
        if let Some(n) = n4 {
            self.mark_neighbor(ot, n);
        }
        self.mark_neighbor(t, ot);
        Ok(())
    }
}
