// Copyright 2025 Lars Brubaker
// WASM bindings for sweep-cdt

use sweep_cdt::{triangulate, Point, Polygon, Triangulation};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

fn ring(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect()
}

/// Builds a polygon with holes and Steiner points, then triangulates it.
#[wasm_bindgen]
pub struct CdtJs {
    polygon: Polygon,
    result: Option<Triangulation>,
    error: Option<String>,
}

#[wasm_bindgen]
impl CdtJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CdtJs {
        CdtJs {
            polygon: Polygon::default(),
            result: None,
            error: None,
        }
    }

    /// Append one outer ring point.
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.polygon.add_point(Point::new(x, y));
    }

    /// Replace the outer ring with a flat [x0,y0, x1,y1, ...] Float64Array.
    pub fn set_outer(&mut self, coords: &[f64]) {
        let holes = self.polygon.holes().to_vec();
        let steiner = self.polygon.steiner_points().to_vec();
        self.polygon = Polygon::new(ring(coords));
        for hole in holes {
            self.polygon.add_hole(hole);
        }
        self.polygon.add_steiner_points(steiner);
    }

    /// Add a hole from a flat [x0,y0, x1,y1, ...] Float64Array.
    pub fn add_hole(&mut self, coords: &[f64]) {
        self.polygon.add_hole(Polygon::new(ring(coords)));
    }

    pub fn add_steiner(&mut self, x: f64, y: f64) {
        self.polygon.add_steiner_point(Point::new(x, y));
    }

    /// Triangulate and return true on success. On failure `error` holds
    /// the message.
    pub fn triangulate(&mut self) -> bool {
        match triangulate(&self.polygon) {
            Ok(tr) => {
                self.result = Some(tr);
                self.error = None;
                true
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e.to_string());
                false
            }
        }
    }

    pub fn error(&self) -> Option<String> {
        self.error.clone()
    }

    pub fn triangle_count(&self) -> u32 {
        self.result.as_ref().map_or(0, |r| r.len() as u32)
    }

    /// Flat triangle vertex-index triples [i0,i1,i2, ...].
    pub fn get_triangles(&self) -> Vec<u32> {
        self.result
            .as_ref()
            .map(|r| r.triangles.iter().flat_map(|t| t.vertices).collect())
            .unwrap_or_default()
    }

    /// Flat per-side constraint flags matching `get_triangles`: 1 = constrained.
    pub fn get_constrained(&self) -> Vec<u8> {
        self.result
            .as_ref()
            .map(|r| {
                r.triangles
                    .iter()
                    .flat_map(|t| t.constrained.map(u8::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Flat vertex positions [x0,y0, x1,y1, ...] indexed by `get_triangles`.
    pub fn get_vertices(&self) -> Vec<f64> {
        self.result
            .as_ref()
            .map(|r| r.points.iter().flat_map(|p| [p.x, p.y]).collect())
            .unwrap_or_default()
    }
}

impl Default for CdtJs {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience: triangulate a single ring of 2D vertices.
/// Returns flat corner coordinates, six values per triangle.
#[wasm_bindgen]
pub fn triangulate_polygon(outer: &[f64]) -> Vec<f64> {
    let mut cdt = CdtJs::new();
    cdt.set_outer(outer);
    if !cdt.triangulate() {
        return Vec::new();
    }
    let verts = cdt.get_vertices();
    cdt.get_triangles()
        .iter()
        .flat_map(|&i| [verts[2 * i as usize], verts[2 * i as usize + 1]])
        .collect()
}
