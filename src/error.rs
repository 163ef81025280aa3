// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)

use thiserror::Error;

use crate::front::NodeIdx;
use crate::mesh::{PointIdx, TriIdx};

/// Errors raised while building or running a triangulation.
///
/// Only `PointOnConstrainedEdge` is recoverable: the sweep drops the one
/// constraint that triggered it and carries on. Every other variant aborts the
/// run and no partial result is returned.
#[derive(Clone, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum TriangulationError {
    /// A vertex lookup named a point the triangle does not have.
    #[error("point {point} is not a vertex of the triangle")]
    PointNotInTriangle {
        /// The point that was looked up.
        point: PointIdx,
    },
    /// An edge lookup named two points that are not a side of the triangle.
    #[error("edge {p}-{q} is not a side of triangle {triangle}")]
    EdgeNotInTriangle { triangle: TriIdx, p: PointIdx, q: PointIdx },
    /// A flip needed the triangle across from a point and there was none.
    #[error("triangle {triangle} has no neighbor across point {point}")]
    MissingNeighbor { triangle: TriIdx, point: PointIdx },
    /// The advancing front has no node bracketing the point.
    #[error("advancing front has no node for point {point}")]
    MissingFrontNode { point: PointIdx },
    /// A front node that must carry a triangle has none.
    #[error("front node {node} has no triangle")]
    MissingFrontTriangle { node: NodeIdx },
    /// A flip would cross an edge that is already constrained, which means two
    /// input constraints intersect.
    #[error("constraint {p}-{q} crosses an existing constrained edge in triangle {triangle}")]
    IntersectingConstraints { triangle: TriIdx, p: PointIdx, q: PointIdx },
    /// A mesh point lies exactly on the constraint being enforced.
    #[error("point {point} lies on constraint {p}-{q}")]
    PointOnConstrainedEdge { point: PointIdx, p: PointIdx, q: PointIdx },
    /// Polygon finalization found no triangle inside the constrained boundary.
    #[error("no interior triangle found around point {point}")]
    NoInteriorTriangle { point: PointIdx },
    /// An input coordinate was NaN or infinite.
    #[error("point ({x}, {y}) has a non-finite coordinate")]
    InvalidCoordinate { x: f64, y: f64 },
    /// A constraint endpoint is not one of the input points.
    #[error("constraint endpoint ({x}, {y}) is not an input point")]
    UnknownConstraintPoint { x: f64, y: f64 },
    /// An index-based constraint list is odd or out of range.
    #[error("constraint index {index} is invalid for {len} points")]
    InvalidConstraintIndex { index: usize, len: usize },
    /// A polygon ring has fewer than three points.
    #[error("polygon ring has {count} points, at least 3 are required")]
    TooFewPoints { count: usize },
}

impl TriangulationError {
    /// True for errors the sweep absorbs by dropping a single constraint.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TriangulationError::PointOnConstrainedEdge { .. })
    }
}
