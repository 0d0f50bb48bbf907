//! Marching Cubes isosurface extraction
//!
//! This module walks every cube of a [`ScalarGrid`], classifies its eight corners
//! against the isovalue, interpolates the crossed edges and appends the triangles
//! listed in the lookup tables. The walk is sequential and visits cubes in a fixed
//! (i, j, k) nested order, so the output is deterministic.

use crate::grid::ScalarGrid;
use crate::tables::{triangle_edges, CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE};
use cloudmesh_core::{Error, Point3f, Result, Triangle, TriangleSoup};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default isovalue for unsigned distance fields
pub const DEFAULT_ISO_LEVEL: f32 = 0.05;

/// Below this value difference an edge is treated as flat and snaps to its first end
pub const INTERPOLATION_EPSILON: f32 = 1e-6;

/// Configuration for Marching Cubes algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarchingCubesConfig {
    /// Isosurface level (scalar value to extract)
    pub iso_level: f32,
}

impl Default for MarchingCubesConfig {
    fn default() -> Self {
        Self {
            iso_level: DEFAULT_ISO_LEVEL,
        }
    }
}

impl MarchingCubesConfig {
    pub fn with_iso_level(mut self, iso_level: f32) -> Self {
        self.iso_level = iso_level;
        self
    }
}

/// 8-bit configuration of a cube: bit c is set when corner c is strictly below
/// `iso_level`.
pub fn cube_index(values: &[f32; 8], iso_level: f32) -> u8 {
    let mut index = 0u8;
    for (corner, &value) in values.iter().enumerate() {
        if value < iso_level {
            index |= 1 << corner;
        }
    }
    index
}

/// Point where the field crosses `iso_level` along the segment p1→p2.
///
/// Uses `t = (iso - v1) / (v2 - v1)`. When the end values are closer than
/// [`INTERPOLATION_EPSILON`] the edge is flat and `p1` is returned as is.
pub fn interpolate_edge(p1: Point3f, p2: Point3f, v1: f32, v2: f32, iso_level: f32) -> Point3f {
    if (v1 - v2).abs() < INTERPOLATION_EPSILON {
        return p1;
    }
    let t = (iso_level - v1) / (v2 - v1);
    p1 + (p2 - p1) * t
}

/// Polygonize cube (i, j, k), appending its triangles to `soup`.
///
/// The cube spans nodes (i..=i+1, j..=j+1, k..=k+1), so each index must be at most
/// R-2. Returns the number of triangles emitted (0 to 5).
pub fn polygonize_cell(
    grid: &ScalarGrid,
    i: usize,
    j: usize,
    k: usize,
    iso_level: f32,
    soup: &mut TriangleSoup,
) -> usize {
    let mut values = [0.0f32; 8];
    for (corner, [di, dj, dk]) in CORNER_OFFSETS.iter().enumerate() {
        values[corner] = grid.value_unchecked(i + di, j + dj, k + dk);
    }

    let index = cube_index(&values, iso_level);
    let crossed = EDGE_TABLE[index as usize];
    if crossed == 0 {
        return 0;
    }

    let corner_position = |corner: usize| {
        let [di, dj, dk] = CORNER_OFFSETS[corner];
        grid.node_position(i + di, j + dj, k + dk)
    };

    let mut edge_points = [Point3f::origin(); 12];
    for (edge, &[a, b]) in EDGE_CORNERS.iter().enumerate() {
        if crossed & (1 << edge) != 0 {
            edge_points[edge] = interpolate_edge(
                corner_position(a),
                corner_position(b),
                values[a],
                values[b],
                iso_level,
            );
        }
    }

    let mut emitted = 0;
    for [e0, e1, e2] in triangle_edges(index) {
        soup.push(Triangle::new(edge_points[e0], edge_points[e1], edge_points[e2]));
        emitted += 1;
    }
    emitted
}

/// Marching Cubes implementation
#[derive(Debug, Clone, Default)]
pub struct MarchingCubes {
    config: MarchingCubesConfig,
}

impl MarchingCubes {
    /// Create a new Marching Cubes instance
    pub fn new(config: MarchingCubesConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MarchingCubesConfig {
        &self.config
    }

    /// Extract the isosurface of a fully sampled grid.
    ///
    /// Must only be called once the grid fill has completed. A grid that never
    /// crosses the isovalue yields an empty soup, not an error.
    pub fn extract_isosurface(&self, grid: &ScalarGrid) -> Result<TriangleSoup> {
        let iso_level = self.config.iso_level;
        if !iso_level.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "Isovalue must be finite, got {}",
                iso_level
            )));
        }

        let cells = grid.resolution() - 1;
        let mut soup = TriangleSoup::new();
        let mut active_cells = 0usize;

        for (i, j, k) in iproduct!(0..cells, 0..cells, 0..cells) {
            if polygonize_cell(grid, i, j, k, iso_level, &mut soup) > 0 {
                active_cells += 1;
            }
        }

        info!(
            triangles = soup.len(),
            active_cells,
            cells = grid.cell_count(),
            iso_level,
            "isosurface extracted"
        );

        Ok(soup)
    }
}

/// Convenience function for basic marching cubes
pub fn marching_cubes(grid: &ScalarGrid, iso_level: f32) -> Result<TriangleSoup> {
    MarchingCubes::new(MarchingCubesConfig::default().with_iso_level(iso_level))
        .extract_isosurface(grid)
}
