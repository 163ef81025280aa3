// sweep-cdt: sweep-line constrained Delaunay triangulation
// Copyright 2025 Lars Brubaker
// License: MIT (sweep algorithm derived from Poly2Tri, BSD 3-Clause)

pub mod context;
pub mod error;
pub mod front;
pub mod geom;
pub mod mesh;
pub mod observer;
pub mod shapes;
pub mod sweep;
pub mod triangulation;

pub use context::{SweepConfig, SweepContext};
pub use error::TriangulationError;
pub use geom::{Orientation, Point};
pub use observer::{NoopObserver, SweepObserver};
pub use shapes::{ConstrainedPointSet, PointSet, Polygon, Triangulatable, TriangulationMode};
pub use triangulation::{triangulate, triangulate_with, OutputTriangle, Triangulation};
