// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)
//
// Input shapes. Each one knows its triangulation mode and how to load its
// points and constraint edges into a SweepContext.

use crate::context::SweepContext;
use crate::error::TriangulationError;
use crate::geom::Point;
use crate::mesh::PointIdx;
use crate::observer::SweepObserver;

/// Selects how the finished sweep is trimmed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TriangulationMode {
    /// Plain point set; the result covers the convex hull.
    #[default]
    Unconstrained,
    /// Point set with constraint edges; the result covers the convex hull.
    Constrained,
    /// Polygon with optional holes; the result covers the polygon interior.
    Polygon,
}

/// Something that can be fed into the sweep.
pub trait Triangulatable {
    fn mode(&self) -> TriangulationMode;

    /// Register points and constraints with the context.
    fn prepare<O: SweepObserver>(
        &self,
        ctx: &mut SweepContext<O>,
    ) -> Result<(), TriangulationError>;
}

/// Unconstrained point set.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    pub fn new(points: Vec<Point>) -> Self {
        PointSet { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Triangulatable for PointSet {
    fn mode(&self) -> TriangulationMode {
        TriangulationMode::Unconstrained
    }

    fn prepare<O: SweepObserver>(
        &self,
        ctx: &mut SweepContext<O>,
    ) -> Result<(), TriangulationError> {
        ctx.add_points(self.points.iter().copied())?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
enum Constraints {
    Edges(Vec<(Point, Point)>),
    Indices(Vec<usize>),
}

/// Point set with constraint edges, given either as coordinate pairs or as
/// index pairs into the point list.
///
/// Crossing constraints are not detected up front; the sweep reports them
/// as `IntersectingConstraints`.
#[derive(Clone, Debug)]
pub struct ConstrainedPointSet {
    points: Vec<Point>,
    constraints: Constraints,
}

impl ConstrainedPointSet {
    /// Constraints as point pairs. Both ends must be in `points`.
    pub fn with_edges(points: Vec<Point>, edges: Vec<(Point, Point)>) -> Self {
        ConstrainedPointSet {
            points,
            constraints: Constraints::Edges(edges),
        }
    }

    /// Constraints as a flat list of index pairs: `[a0, b0, a1, b1, ...]`.
    pub fn with_indices(points: Vec<Point>, index: Vec<usize>) -> Self {
        ConstrainedPointSet {
            points,
            constraints: Constraints::Indices(index),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

impl Triangulatable for ConstrainedPointSet {
    fn mode(&self) -> TriangulationMode {
        TriangulationMode::Constrained
    }

    fn prepare<O: SweepObserver>(
        &self,
        ctx: &mut SweepContext<O>,
    ) -> Result<(), TriangulationError> {
        let ids = ctx.add_points(self.points.iter().copied())?;
        match &self.constraints {
            Constraints::Edges(edges) => {
                for (a, b) in edges {
                    ctx.add_constraint_points(a, b)?;
                }
            }
            Constraints::Indices(index) => {
                let len = ids.len();
                let id = |i: usize| {
                    ids.get(i)
                        .copied()
                        .ok_or(TriangulationError::InvalidConstraintIndex { index: i, len })
                };
                for pair in index.chunks(2) {
                    let &[a, b] = pair else {
                        return Err(TriangulationError::InvalidConstraintIndex {
                            index: pair[0],
                            len,
                        });
                    };
                    ctx.add_constraint(id(a)?, id(b)?);
                }
            }
        }
        Ok(())
    }
}

/// Simple polygon with optional holes and interior Steiner points.
///
/// Rings are closed implicitly; the last point connects back to the first.
/// Holes must lie inside the outer ring and must not overlap each other.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    points: Vec<Point>,
    holes: Vec<Polygon>,
    steiner_points: Vec<Point>,
}

impl Polygon {
    /// A ring whose last point repeats the first has that last point removed.
    pub fn new(mut points: Vec<Point>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            tracing::warn!("removed duplicate closing point");
            points.pop();
        }
        Polygon {
            points,
            holes: Vec::new(),
            steiner_points: Vec::new(),
        }
    }

    pub fn add_hole(&mut self, hole: Polygon) {
        self.holes.push(hole);
    }

    pub fn add_steiner_point(&mut self, point: Point) {
        self.steiner_points.push(point);
    }

    pub fn add_steiner_points<I: IntoIterator<Item = Point>>(&mut self, points: I) {
        self.steiner_points.extend(points);
    }

    pub fn clear_steiner_points(&mut self) {
        self.steiner_points.clear();
    }

    /// Append a point after the current last ring point.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn add_points<I: IntoIterator<Item = Point>>(&mut self, points: I) {
        self.points.extend(points);
    }

    /// Insert `point` right after the ring point equal to `after`. Returns
    /// false when `after` is not on the ring.
    pub fn insert_point_after(&mut self, after: &Point, point: Point) -> bool {
        match self.points.iter().position(|p| p == after) {
            Some(i) => {
                self.points.insert(i + 1, point);
                true
            }
            None => false,
        }
    }

    /// Remove the ring point equal to `point`. Returns false if absent.
    pub fn remove_point(&mut self, point: &Point) -> bool {
        match self.points.iter().position(|p| p == point) {
            Some(i) => {
                self.points.remove(i);
                true
            }
            None => false,
        }
    }

    /// Ring points plus Steiner points; holes are not counted.
    pub fn point_count(&self) -> usize {
        self.points.len() + self.steiner_points.len()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn holes(&self) -> &[Polygon] {
        &self.holes
    }

    pub fn steiner_points(&self) -> &[Point] {
        &self.steiner_points
    }

    /// Twice the signed area of the ring (positive when CCW).
    pub fn signed_area2(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let (a, b) = (&self.points[i], &self.points[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum()
    }

    fn prepare_ring<O: SweepObserver>(
        ring: &[Point],
        ctx: &mut SweepContext<O>,
    ) -> Result<(), TriangulationError> {
        if ring.len() < 3 {
            return Err(TriangulationError::TooFewPoints { count: ring.len() });
        }
        let ids: Vec<PointIdx> = ctx.add_points(ring.iter().copied())?;
        for w in ids.windows(2) {
            ctx.add_constraint(w[0], w[1]);
        }
        ctx.add_constraint(ids[0], ids[ids.len() - 1]);
        Ok(())
    }
}

impl Triangulatable for Polygon {
    fn mode(&self) -> TriangulationMode {
        TriangulationMode::Polygon
    }

    fn prepare<O: SweepObserver>(
        &self,
        ctx: &mut SweepContext<O>,
    ) -> Result<(), TriangulationError> {
        Self::prepare_ring(&self.points, ctx)?;
        for hole in &self.holes {
            Self::prepare_ring(&hole.points, ctx)?;
        }
        ctx.add_points(self.steiner_points.iter().copied())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, s: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x0 + s, y0),
            Point::new(x0 + s, y0 + s),
            Point::new(x0, y0 + s),
        ]
    }

    #[test]
    fn closing_point_removed() {
        let mut pts = square(0.0, 0.0, 1.0);
        pts.push(Point::new(0.0, 0.0));
        let poly = Polygon::new(pts);
        assert_eq!(poly.points().len(), 4);
        assert!((poly.signed_area2() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn ring_edits() {
        let mut poly = Polygon::new(square(0.0, 0.0, 1.0));
        assert!(poly.insert_point_after(&Point::new(1.0, 0.0), Point::new(1.5, 0.5)));
        assert_eq!(poly.points()[2], Point::new(1.5, 0.5));
        assert!(!poly.insert_point_after(&Point::new(9.0, 9.0), Point::new(1.0, 1.0)));
        assert!(poly.remove_point(&Point::new(1.5, 0.5)));
        assert!(!poly.remove_point(&Point::new(1.5, 0.5)));
        poly.add_point(Point::new(-0.5, 0.5));
        poly.add_steiner_points([Point::new(0.5, 0.5), Point::new(0.25, 0.25)]);
        assert_eq!(poly.point_count(), 7);
        poly.clear_steiner_points();
        assert_eq!(poly.point_count(), 5);
    }

    #[test]
    fn polygon_prepare_registers_ring_constraints() {
        let mut poly = Polygon::new(square(0.0, 0.0, 4.0));
        poly.add_hole(Polygon::new(square(1.0, 1.0, 1.0)));
        poly.add_steiner_point(Point::new(3.0, 3.0));
        let mut ctx = SweepContext::new(poly.mode());
        poly.prepare(&mut ctx).unwrap();
        assert_eq!(ctx.mesh.verts.len(), 9);
        assert_eq!(ctx.constraint_count(), 8);
        // Steiner point owns no edges
        let s = ctx.point_index(&Point::new(3.0, 3.0)).unwrap();
        assert!(ctx.mesh.verts[s as usize].edges.is_empty());
    }

    #[test]
    fn short_ring_rejected() {
        let poly = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        let mut ctx = SweepContext::new(poly.mode());
        assert_eq!(
            poly.prepare(&mut ctx),
            Err(TriangulationError::TooFewPoints { count: 2 })
        );
    }

    #[test]
    fn index_constraints_validated() {
        let pts = square(0.0, 0.0, 1.0);
        let set = ConstrainedPointSet::with_indices(pts.clone(), vec![0, 2, 1]);
        let mut ctx = SweepContext::new(set.mode());
        assert_eq!(
            set.prepare(&mut ctx),
            Err(TriangulationError::InvalidConstraintIndex { index: 1, len: 4 })
        );

        let set = ConstrainedPointSet::with_indices(pts.clone(), vec![0, 7]);
        let mut ctx = SweepContext::new(set.mode());
        assert_eq!(
            set.prepare(&mut ctx),
            Err(TriangulationError::InvalidConstraintIndex { index: 7, len: 4 })
        );

        let set = ConstrainedPointSet::with_indices(pts, vec![0, 2]);
        let mut ctx = SweepContext::new(set.mode());
        set.prepare(&mut ctx).unwrap();
        assert_eq!(ctx.constraint_count(), 1);
    }

    #[test]
    fn edge_constraints_must_reference_points() {
        let pts = square(0.0, 0.0, 1.0);
        let set = ConstrainedPointSet::with_edges(
            pts,
            vec![(Point::new(0.0, 0.0), Point::new(0.5, 0.5))],
        );
        let mut ctx = SweepContext::new(set.mode());
        assert!(matches!(
            set.prepare(&mut ctx),
            Err(TriangulationError::UnknownConstraintPoint { .. })
        ));
    }
}
