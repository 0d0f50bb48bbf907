//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// Squared Euclidean distance, summed in x, y, z order.
///
/// Every nearest-distance strategy goes through this expression so that their
/// results stay bit-identical.
#[inline]
pub fn squared_distance(a: &Point3f, b: &Point3f) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: &Point3f, b: &Point3f) -> f32 {
    squared_distance(a, b).sqrt()
}

/// Returns true when all three coordinates are finite
#[inline]
pub fn is_finite_point(p: &Point3f) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance() {
        let a = Point3f::new(1.0, 2.0, 3.0);
        let b = Point3f::new(4.0, 6.0, 3.0);
        assert_eq!(squared_distance(&a, &b), 25.0);
        assert_eq!(distance(&a, &b), 5.0);
        assert_relative_eq!(distance(&a, &b), (a - b).magnitude());
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point3f::new(0.3, -1.7, 2.2);
        let b = Point3f::new(-4.1, 0.9, 0.05);
        assert_eq!(distance(&a, &b).to_bits(), distance(&b, &a).to_bits());
    }

    #[test]
    fn test_is_finite_point() {
        assert!(is_finite_point(&Point3f::new(0.0, 1.0, -2.0)));
        assert!(!is_finite_point(&Point3f::new(f32::NAN, 1.0, -2.0)));
        assert!(!is_finite_point(&Point3f::new(0.0, f32::INFINITY, -2.0)));
    }
}
