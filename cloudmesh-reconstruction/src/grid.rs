//! Dense scalar grid stored as a single flat buffer

use crate::bounds::BoundingBox;
use cloudmesh_core::{Error, Point3f, Result};

/// Dense R×R×R grid of scalar samples spanning a [`BoundingBox`] inclusively.
///
/// Node (i, j, k) sits at `min + (index / (R - 1)) * (max - min)` on each axis, so
/// node 0 is on `min` and node R-1 is on `max`. Values live in one contiguous
/// buffer at `(i * R + j) * R + k`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    values: Vec<f32>,
    resolution: usize,
    bounds: BoundingBox,
}

/// Smallest resolution that still forms one cube
pub const MIN_RESOLUTION: usize = 2;

pub(crate) fn check_resolution(resolution: usize) -> Result<()> {
    if resolution < MIN_RESOLUTION {
        return Err(Error::InvalidConfiguration(format!(
            "Grid resolution must be at least {}, got {}",
            MIN_RESOLUTION, resolution
        )));
    }
    resolution
        .checked_pow(3)
        .map(|_| ())
        .ok_or_else(|| {
            Error::InvalidConfiguration(format!(
                "Grid resolution {} overflows the node count",
                resolution
            ))
        })
}

impl ScalarGrid {
    /// Create a zero-filled grid
    pub fn new(bounds: BoundingBox, resolution: usize) -> Result<Self> {
        check_resolution(resolution)?;
        Ok(Self {
            values: vec![0.0; resolution * resolution * resolution],
            resolution,
            bounds,
        })
    }

    /// Wrap an existing buffer laid out as `(i * R + j) * R + k`.
    ///
    /// Values must be finite and non-negative, like any nearest-point distance.
    pub fn from_values(bounds: BoundingBox, resolution: usize, values: Vec<f32>) -> Result<Self> {
        check_resolution(resolution)?;
        let expected = resolution * resolution * resolution;
        if values.len() != expected {
            return Err(Error::InvalidData(format!(
                "Grid of resolution {} needs {} values, got {}",
                resolution,
                expected,
                values.len()
            )));
        }
        if let Some(position) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(Error::InvalidData(format!(
                "Grid value at linear index {} is {}, expected a finite non-negative distance",
                position, values[position]
            )));
        }
        Ok(Self {
            values,
            resolution,
            bounds,
        })
    }

    /// Nodes per axis
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Domain covered by the grid
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Total number of nodes (R³)
    pub fn node_count(&self) -> usize {
        self.values.len()
    }

    /// Total number of cubes ((R-1)³)
    pub fn cell_count(&self) -> usize {
        let cells = self.resolution - 1;
        cells * cells * cells
    }

    /// Linear index of node (i, j, k). Callers keep the indices below R.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.resolution + j) * self.resolution + k
    }

    /// Value at node (i, j, k), or `None` outside the grid
    pub fn value(&self, i: usize, j: usize, k: usize) -> Option<f32> {
        let r = self.resolution;
        if i < r && j < r && k < r {
            Some(self.values[self.index(i, j, k)])
        } else {
            None
        }
    }

    /// Value at node (i, j, k) without the `Option`; indices must be in range
    #[inline]
    pub(crate) fn value_unchecked(&self, i: usize, j: usize, k: usize) -> f32 {
        self.values[self.index(i, j, k)]
    }

    /// World position of node (i, j, k)
    #[inline]
    pub fn node_position(&self, i: usize, j: usize, k: usize) -> Point3f {
        node_position(&self.bounds, self.resolution, i, j, k)
    }

    /// All values in linear-index order
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Smallest sampled value
    pub fn min_value(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// Largest sampled value
    pub fn max_value(&self) -> f32 {
        self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Consume the grid and return its buffer
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// World position of node (i, j, k) for a grid of `resolution` nodes over `bounds`
#[inline]
pub(crate) fn node_position(
    bounds: &BoundingBox,
    resolution: usize,
    i: usize,
    j: usize,
    k: usize,
) -> Point3f {
    let denom = (resolution - 1) as f32;
    let extent = bounds.extent();
    Point3f::new(
        bounds.min.x + (i as f32 / denom) * extent.x,
        bounds.min.y + (j as f32 / denom) * extent.y,
        bounds.min.z + (k as f32 / denom) * extent.z,
    )
}
