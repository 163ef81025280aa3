// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)
//
// SweepContext: all mutable state of one triangulation run.
//
// Owns the mesh arenas, the sorted point order, the advancing front and the
// per-event scratch (active constraint, basin, legalization). Input shapes
// feed points and constraints in through add_point / add_constraint; the
// sweep then reads everything back from here.

use std::collections::{HashMap, VecDeque};

use crate::error::TriangulationError;
use crate::front::{AdvancingFront, FrontNode, NodeIdx};
use crate::geom::{orient2d, Orientation, Point, Real};
use crate::mesh::{Constraint, Mesh, PointIdx, TriIdx};
use crate::observer::{NoopObserver, SweepObserver};
use crate::shapes::TriangulationMode;
use crate::triangulation::{OutputTriangle, Triangulation};

/// Tunables for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepConfig {
    /// Fraction of the input bounding box added on each side when placing the
    /// two artificial points that seed the front. Must be positive.
    pub bounds_margin: Real,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig { bounds_margin: 0.3 }
    }
}

/// The constraint currently being enforced. `q` may be moved toward `p` while
/// a long edge is enforced piecewise.
#[derive(Clone, Copy, Debug)]
pub struct EdgeEvent {
    pub constrained_edge: Constraint,
    pub right: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Basin {
    pub left_node: NodeIdx,
    pub bottom_node: NodeIdx,
    pub right_node: NodeIdx,
    pub width: Real,
    pub left_highest: bool,
}

/// Bookkeeping for one outermost `legalize` call. Every triangle rotated
/// during the call is recorded so a provisional Delaunay flag can be found
/// again after the rotations that followed it moved it to another triangle.
#[derive(Clone, Debug, Default)]
pub struct Legalization {
    pub depth: u32,
    pub flipped: Vec<TriIdx>,
}

pub struct SweepContext<O: SweepObserver = NoopObserver> {
    pub mesh: Mesh,
    pub front: AdvancingFront,
    pub(crate) edge_event: EdgeEvent,
    pub(crate) basin: Basin,
    pub(crate) legalization: Legalization,
    pub(crate) observer: O,
    mode: TriangulationMode,
    config: SweepConfig,
    lookup: HashMap<(u64, u64), PointIdx>,
    /// Input points in sweep order (y ascending, then x ascending).
    order: Vec<PointIdx>,
    input_count: u32,
    left_bound: PointIdx,
    right_bound: PointIdx,
    constraint_count: usize,
    /// Triangles making up the finished triangulation.
    result: Vec<TriIdx>,
}

impl SweepContext<NoopObserver> {
    pub fn new(mode: TriangulationMode) -> Self {
        Self::with_observer(mode, SweepConfig::default(), NoopObserver)
    }
}

impl<O: SweepObserver> SweepContext<O> {
    pub fn with_observer(mode: TriangulationMode, config: SweepConfig, observer: O) -> Self {
        SweepContext {
            mesh: Mesh::new(),
            front: AdvancingFront::default(),
            edge_event: EdgeEvent {
                constrained_edge: Constraint { p: 0, q: 0 },
                right: false,
            },
            basin: Basin::default(),
            legalization: Legalization::default(),
            observer,
            mode,
            config,
            lookup: HashMap::new(),
            order: Vec::new(),
            input_count: 0,
            left_bound: 0,
            right_bound: 0,
            constraint_count: 0,
            result: Vec::new(),
        }
    }

    #[inline]
    pub fn mode(&self) -> TriangulationMode {
        self.mode
    }

    #[inline]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Register an input point. A point with the same x and y as an earlier
    /// one maps to the earlier vertex.
    pub fn add_point(&mut self, point: Point) -> Result<PointIdx, TriangulationError> {
        if !point.is_finite() {
            return Err(TriangulationError::InvalidCoordinate {
                x: point.x,
                y: point.y,
            });
        }
        if let Some(&idx) = self.lookup.get(&point.key()) {
            tracing::debug!(x = point.x, y = point.y, vertex = idx, "merged coincident point");
            return Ok(idx);
        }
        let normalized = Point::with_z(point.x + 0.0, point.y + 0.0, point.z);
        let idx = self.mesh.add_point(normalized);
        self.lookup.insert(point.key(), idx);
        Ok(idx)
    }

    pub fn add_points<I>(&mut self, points: I) -> Result<Vec<PointIdx>, TriangulationError>
    where
        I: IntoIterator<Item = Point>,
    {
        points.into_iter().map(|p| self.add_point(p)).collect()
    }

    /// The vertex registered for these exact coordinates, if any.
    pub fn point_index(&self, point: &Point) -> Option<PointIdx> {
        self.lookup.get(&point.key()).copied()
    }

    /// Register the constraint a-b. The endpoint later in sweep order owns it.
    pub fn add_constraint(&mut self, a: PointIdx, b: PointIdx) {
        let (pa, pb) = (self.mesh.point(a), self.mesh.point(b));
        let a_first = pa.y < pb.y || (pa.y == pb.y && pa.x < pb.x);
        let (p, q) = if a_first { (a, b) } else { (b, a) };
        if p == q {
            tracing::debug!(vertex = p, "ignored constraint with identical endpoints");
            return;
        }
        self.mesh.verts[q as usize].edges.push(Constraint { p, q });
        self.constraint_count += 1;
    }

    /// Register a constraint given by coordinates of two already added points.
    pub fn add_constraint_points(&mut self, a: &Point, b: &Point) -> Result<(), TriangulationError> {
        let lookup = |p: &Point| {
            self.point_index(p)
                .ok_or(TriangulationError::UnknownConstraintPoint { x: p.x, y: p.y })
        };
        let (ia, ib) = (lookup(a)?, lookup(b)?);
        self.add_constraint(ia, ib);
        Ok(())
    }

    #[inline]
    pub fn constraint_count(&self) -> usize {
        self.constraint_count
    }

    /// Number of distinct input points.
    #[inline]
    pub fn input_count(&self) -> usize {
        self.input_count as usize
    }

    /// Input points in sweep order.
    #[inline]
    pub fn points(&self) -> &[PointIdx] {
        &self.order
    }

    #[inline]
    pub fn left_bound(&self) -> PointIdx {
        self.left_bound
    }

    #[inline]
    pub fn right_bound(&self) -> PointIdx {
        self.right_bound
    }

    #[inline]
    pub fn is_bound(&self, p: PointIdx) -> bool {
        p >= self.input_count
    }

    /// Sort the input and add the two bound points below it. Returns false
    /// when the input cannot form a triangle: fewer than three distinct
    /// points, or all of them on one line.
    pub fn prepare_sweep(&mut self) -> bool {
        let n = self.mesh.verts.len();
        self.input_count = n as u32;
        if n < 3 {
            tracing::debug!(points = n, "too few distinct points to triangulate");
            return false;
        }
        let (p0, p1) = (*self.mesh.point(0), *self.mesh.point(1));
        if self
            .mesh
            .verts
            .iter()
            .all(|v| orient2d(&p0, &p1, &v.point) == Orientation::Collinear)
        {
            tracing::debug!(points = n, "all points collinear");
            return false;
        }

        let first = self.mesh.point(0);
        let (mut xmin, mut xmax, mut ymin, mut ymax) = (first.x, first.x, first.y, first.y);
        for v in &self.mesh.verts {
            xmin = xmin.min(v.point.x);
            xmax = xmax.max(v.point.x);
            ymin = ymin.min(v.point.y);
            ymax = ymax.max(v.point.y);
        }
        let mut margin = self.config.bounds_margin;
        if !(margin.is_finite() && margin > 0.0) {
            tracing::warn!(margin, "bounds margin must be positive, using the default");
            margin = SweepConfig::default().bounds_margin;
        }
        let dx = margin * (xmax - xmin);
        let dy = margin * (ymax - ymin);

        let mesh = &self.mesh;
        self.order = (0..n as PointIdx).collect();
        self.order.sort_by(|&a, &b| {
            let (pa, pb) = (mesh.point(a), mesh.point(b));
            pa.y.total_cmp(&pb.y).then(pa.x.total_cmp(&pb.x))
        });

        self.right_bound = self.mesh.add_point(Point::new(xmax + dx, ymin - dy));
        self.left_bound = self.mesh.add_point(Point::new(xmin - dx, ymin - dy));
        true
    }

    /// Seed the mesh with the triangle (first point, left bound, right bound)
    /// and the front with its three vertices.
    pub fn create_advancing_front(&mut self) {
        let first = self.order[0];
        let t = self.mesh.add_triangle(first, self.left_bound, self.right_bound);
        let node = |p: PointIdx| FrontNode::new(p, self.mesh.x(p));
        self.front = AdvancingFront::seed(
            node(self.left_bound),
            node(first),
            node(self.right_bound),
            t,
        );
    }

    /// The front node at or immediately left of `point`.
    pub fn locate_node(&mut self, point: PointIdx) -> Result<NodeIdx, TriangulationError> {
        self.front
            .locate_node(self.mesh.x(point))
            .ok_or(TriangulationError::MissingFrontNode { point })
    }

    /// For every side of `t` with no neighbor, make `t` the triangle of the
    /// front node that starts that side.
    pub fn map_triangle_to_nodes(&mut self, t: TriIdx) -> Result<(), TriangulationError> {
        for i in 0..3 {
            let tri = self.mesh.tri(t);
            if tri.neighbors[i].is_some() {
                continue;
            }
            let p = tri.point_cw(tri.points[i])?;
            if let Some(n) = self.front.locate_point(p, self.mesh.x(p))? {
                self.front.node_mut(n).triangle = Some(t);
            }
        }
        Ok(())
    }

    pub(crate) fn node_triangle(&self, n: NodeIdx) -> Result<TriIdx, TriangulationError> {
        self.front
            .triangle(n)
            .ok_or(TriangulationError::MissingFrontTriangle { node: n })
    }

    pub(crate) fn next(&self, n: NodeIdx) -> Result<NodeIdx, TriangulationError> {
        self.front
            .next(n)
            .ok_or(TriangulationError::MissingFrontNode {
                point: self.front.point(n),
            })
    }

    pub(crate) fn prev(&self, n: NodeIdx) -> Result<NodeIdx, TriangulationError> {
        self.front
            .prev(n)
            .ok_or(TriangulationError::MissingFrontNode {
                point: self.front.point(n),
            })
    }

    #[inline]
    pub(crate) fn node_point(&self, n: NodeIdx) -> &Point {
        self.mesh.point(self.front.point(n))
    }

    /// Collect every triangle reachable from `t` without crossing a
    /// constrained edge.
    pub fn mesh_clean(&mut self, t: TriIdx) {
        let mut queue = VecDeque::new();
        self.mesh.tri_mut(t).interior = true;
        queue.push_back(t);
        while let Some(t) = queue.pop_front() {
            self.result.push(t);
            let tri = self.mesh.tri(t);
            let next: Vec<TriIdx> = (0..3)
                .filter(|&i| !tri.constrained[i])
                .filter_map(|i| tri.neighbors[i])
                .collect();
            for n in next {
                if !self.mesh.tri(n).interior {
                    self.mesh.tri_mut(n).interior = true;
                    queue.push_back(n);
                }
            }
        }
    }

    /// Keep every triangle still in the list.
    pub fn finalize_triangulation(&mut self) {
        self.result = (0..self.mesh.tris.len() as TriIdx)
            .filter(|&t| self.mesh.tri(t).live)
            .collect();
    }

    #[inline]
    pub fn result(&self) -> &[TriIdx] {
        &self.result
    }

    /// Build the public output. Triangles touching a bound point are dropped,
    /// and neighbor links are re-indexed into the output list.
    pub fn into_triangulation(self) -> Triangulation {
        let points: Vec<Point> = self.mesh.verts[..self.input_count()]
            .iter()
            .map(|v| v.point)
            .collect();

        let mut kept = Vec::with_capacity(self.result.len());
        for &t in &self.result {
            let tri = self.mesh.tri(t);
            if tri.points.iter().any(|&p| self.is_bound(p)) {
                tracing::warn!(triangle = t, "discarded triangle attached to a sweep bound point");
                continue;
            }
            kept.push(t);
        }

        let mut remap: Vec<Option<u32>> = vec![None; self.mesh.tris.len()];
        for (i, &t) in kept.iter().enumerate() {
            remap[t as usize] = Some(i as u32);
        }

        let triangles = kept
            .iter()
            .map(|&t| {
                let tri = self.mesh.tri(t);
                OutputTriangle {
                    vertices: tri.points,
                    neighbors: tri.neighbors.map(|n| n.and_then(|n| remap[n as usize])),
                    constrained: tri.constrained,
                }
            })
            .collect();

        Triangulation { points, triangles }
    }
}
