//! Padded axis-aligned sampling domain for a point cloud

use cloudmesh_core::{is_finite_point, Error, Point3f, PointCloud3f, Result, Vector3f};
use serde::{Deserialize, Serialize};

/// Default padding, as a fraction of each axis' extent
pub const DEFAULT_PAD_FRACTION: f32 = 0.1;

/// Absolute padding applied to an axis whose extent is zero
pub const ZERO_EXTENT_PADDING: f32 = 0.1;

/// Axis-aligned box spanned by the sampling grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3f,
    pub max: Point3f,
}

impl BoundingBox {
    /// Create a box from explicit corners
    pub fn new(min: Point3f, max: Point3f) -> Result<Self> {
        if !is_finite_point(&min) || !is_finite_point(&max) {
            return Err(Error::InvalidData(format!(
                "Bounding box corners must be finite, got {:?} and {:?}",
                min, max
            )));
        }
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(Error::InvalidData(format!(
                "Bounding box min {:?} exceeds max {:?}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Compute the padded sampling domain of a cloud.
    ///
    /// Each axis grows by `pad_fraction * extent` on both sides. An axis with zero
    /// extent (flat or single-point clouds) grows by [`ZERO_EXTENT_PADDING`] instead,
    /// so the grid never collapses to zero volume.
    pub fn from_cloud(cloud: &PointCloud3f, pad_fraction: f32) -> Result<Self> {
        if cloud.is_empty() {
            return Err(Error::EmptyInput(
                "Point cloud is empty; no sampling domain can be derived".to_string(),
            ));
        }
        if !pad_fraction.is_finite() || pad_fraction < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "Pad fraction must be a finite, non-negative number, got {}",
                pad_fraction
            )));
        }

        let mut min = Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);

        for (index, point) in cloud.iter().enumerate() {
            if !is_finite_point(point) {
                return Err(Error::InvalidData(format!(
                    "Point {} has non-finite coordinates {:?}",
                    index, point
                )));
            }
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            min.z = min.z.min(point.z);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            max.z = max.z.max(point.z);
        }

        for axis in 0..3 {
            let extent = max[axis] - min[axis];
            let padding = if extent > 0.0 {
                pad_fraction * extent
            } else {
                ZERO_EXTENT_PADDING
            };
            min[axis] -= padding;
            max[axis] += padding;
        }

        Ok(Self { min, max })
    }

    /// Size of the box along each axis
    pub fn extent(&self) -> Vector3f {
        self.max - self.min
    }

    /// Center of the box
    pub fn center(&self) -> Point3f {
        nalgebra::center(&self.min, &self.max)
    }

    /// Returns true when `point` lies inside or on the boundary
    pub fn contains(&self, point: &Point3f) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }
}
