//! Triangle soup data structures and functionality
//!
//! Marching cubes emits every triangle with its own three vertex positions. Two
//! cells that cross the same shared edge each interpolate that edge on their own,
//! so the soup carries numerically coincident but distinct vertex instances. No
//! welding or index buffer is built here.

use crate::point::*;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A triangle with three independent vertex positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(C)]
pub struct Triangle {
    pub vertices: [Point3f; 3],
}

unsafe impl Pod for Triangle {}
unsafe impl Zeroable for Triangle {}

impl Triangle {
    /// Create a triangle from its three corners, in winding order
    pub fn new(a: Point3f, b: Point3f, c: Point3f) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// Unit normal following the right-hand rule on the winding order.
    ///
    /// Degenerate (zero-area) triangles return the zero vector.
    pub fn normal(&self) -> Vector3f {
        let [a, b, c] = self.vertices;
        (b - a)
            .cross(&(c - a))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3f::zeros)
    }

    /// Triangle area
    pub fn area(&self) -> f32 {
        let [a, b, c] = self.vertices;
        0.5 * (b - a).cross(&(c - a)).magnitude()
    }
}

/// An ordered, append-only triangle soup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleSoup {
    triangles: Vec<Triangle>,
}

impl TriangleSoup {
    /// Create a new empty soup
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    /// Create a new soup with room for `capacity` triangles
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    /// Append a triangle
    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Get the number of triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Alias of [`len`](Self::len), named after the mesh statistic it reports
    pub fn triangle_count(&self) -> usize {
        self.len()
    }

    /// Get the number of vertex instances (three per triangle, never deduplicated)
    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }

    /// Check if the soup has no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Triangles in emission order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get an iterator over the triangles
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Every vertex instance in emission order, three per triangle
    pub fn vertices(&self) -> impl Iterator<Item = &Point3f> + '_ {
        self.triangles.iter().flat_map(|t| t.vertices.iter())
    }

    /// Flat `[x0, y0, z0, x1, ...]` view of the soup, ready for a vertex buffer upload
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Per-triangle unit normals
    pub fn face_normals(&self) -> Vec<Vector3f> {
        self.triangles.iter().map(Triangle::normal).collect()
    }

    /// Arithmetic mean of all vertex instances.
    ///
    /// Each triangle contributes its three vertices, so shared positions are
    /// counted once per occurrence and densely tessellated regions pull harder.
    /// This is a sample mean, not an area-weighted centroid. Returns `None` for an
    /// empty soup.
    pub fn centroid(&self) -> Option<Point3f> {
        if self.triangles.is_empty() {
            return None;
        }

        let mut sum = [0.0f64; 3];
        for v in self.vertices() {
            sum[0] += v.x as f64;
            sum[1] += v.y as f64;
            sum[2] += v.z as f64;
        }

        let count = self.vertex_count() as f64;
        Some(Point3f::new(
            (sum[0] / count) as f32,
            (sum[1] / count) as f32,
            (sum[2] / count) as f32,
        ))
    }

    /// Clear the soup
    pub fn clear(&mut self) {
        self.triangles.clear();
    }
}

impl Extend<Triangle> for TriangleSoup {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        self.triangles.extend(iter);
    }
}

impl FromIterator<Triangle> for TriangleSoup {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        Self {
            triangles: Vec::from_iter(iter),
        }
    }
}

impl<'a> IntoIterator for &'a TriangleSoup {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

impl From<TriangleSoup> for Vec<Triangle> {
    fn from(soup: TriangleSoup) -> Self {
        soup.triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_empty_soup() {
        let soup = TriangleSoup::new();
        assert!(soup.is_empty());
        assert_eq!(soup.triangle_count(), 0);
        assert_eq!(soup.vertex_count(), 0);
        assert_eq!(soup.centroid(), None);
        assert!(soup.as_f32_slice().is_empty());
    }

    #[test]
    fn test_triangle_normal_and_area() {
        let tri = unit_triangle();
        assert_eq!(tri.normal(), Vector3f::new(0.0, 0.0, 1.0));
        assert_relative_eq!(tri.area(), 0.5);

        let flat = Triangle::new(Point3f::origin(), Point3f::origin(), Point3f::origin());
        assert_eq!(flat.normal(), Vector3f::zeros());
    }

    #[test]
    fn test_centroid_counts_every_occurrence() {
        let mut soup = TriangleSoup::new();
        soup.push(unit_triangle());
        // Shares two positions with the first triangle; they are counted again.
        soup.push(Triangle::new(
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(1.0, 1.0, 3.0),
        ));

        let centroid = soup.centroid().unwrap();
        assert_relative_eq!(centroid.x, 3.0 / 6.0);
        assert_relative_eq!(centroid.y, 3.0 / 6.0);
        assert_relative_eq!(centroid.z, 3.0 / 6.0);
    }

    #[test]
    fn test_centroid_differs_from_deduplicated_mean() {
        let mut soup = TriangleSoup::new();
        soup.push(unit_triangle());
        soup.push(unit_triangle());
        soup.push(Triangle::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(9.0, 0.0, 0.0),
        ));

        // 9 instances: x sum = 1 + 1 + 9 = 11
        let centroid = soup.centroid().unwrap();
        assert_relative_eq!(centroid.x, 11.0 / 9.0, epsilon = 1e-6);
    }

    #[test]
    fn test_flat_buffer_layout() {
        let mut soup = TriangleSoup::with_capacity(1);
        soup.push(unit_triangle());

        assert_eq!(
            soup.as_f32_slice(),
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(soup.vertices().count(), 3);
        assert_eq!(soup.triangle_count(), soup.len());
        assert_eq!(soup.face_normals(), vec![Vector3f::new(0.0, 0.0, 1.0)]);
    }

    #[test]
    fn test_emission_order_is_preserved() {
        let a = unit_triangle();
        let b = Triangle::new(
            Point3f::new(5.0, 5.0, 5.0),
            Point3f::new(6.0, 5.0, 5.0),
            Point3f::new(5.0, 6.0, 5.0),
        );
        let soup: TriangleSoup = vec![a, b].into_iter().collect();

        assert_eq!(soup.triangles(), &[a, b]);
        let triangles: Vec<Triangle> = soup.into();
        assert_eq!(triangles, vec![a, b]);
    }
}
