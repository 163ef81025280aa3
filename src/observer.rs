// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)

use crate::front::NodeIdx;
use crate::mesh::{Constraint, Mesh, TriIdx};

/// Hooks called at fixed points of the sweep, for step-by-step visualization
/// or tracing. Every method defaults to doing nothing.
///
/// The mesh passed to `step` is mid-construction: triangles may be dead
/// (`live == false`) and the two sweep bound points are present.
pub trait SweepObserver {
    fn active_node(&mut self, _node: NodeIdx) {}
    fn active_constraint(&mut self, _edge: &Constraint) {}
    fn primary_triangle(&mut self, _t: TriIdx) {}
    fn secondary_triangle(&mut self, _t: TriIdx) {}
    /// Called once per input point after its point and edge events.
    fn step(&mut self, _mesh: &Mesh) {}
}

/// Observer that ignores every hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SweepObserver for NoopObserver {}

impl<T: SweepObserver + ?Sized> SweepObserver for &mut T {
    fn active_node(&mut self, node: NodeIdx) {
        (**self).active_node(node)
    }
    fn active_constraint(&mut self, edge: &Constraint) {
        (**self).active_constraint(edge)
    }
    fn primary_triangle(&mut self, t: TriIdx) {
        (**self).primary_triangle(t)
    }
    fn secondary_triangle(&mut self, t: TriIdx) {
        (**self).secondary_triangle(t)
    }
    fn step(&mut self, mesh: &Mesh) {
        (**self).step(mesh)
    }
}
