//! Core data structures and traits for cloudmesh
//!
//! This crate provides the fundamental types shared by every reconstruction stage:
//! points, point clouds, triangle soups, the nearest-distance trait and the error type.

pub mod point;
pub mod point_cloud;
pub mod mesh;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use mesh::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

// Type aliases for easier imports
pub type Point = Point3f;
pub type Mesh = TriangleSoup;
