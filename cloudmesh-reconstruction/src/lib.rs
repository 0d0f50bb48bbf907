//! # cloudmesh Reconstruction
//!
//! Surface extraction from unorganized 3D point clouds.
//!
//! A run samples the unsigned distance to the cloud on a regular grid spanning the
//! padded bounding box, using a pool of worker threads, and then polygonizes the
//! level set `distance == iso_level` with Marching Cubes. The result is a triangle
//! soup whose vertices lie on a thin shell around the input points.

pub mod bounds;
pub mod grid;
pub mod nearest;
pub mod parallel;
pub mod field;
pub mod tables;
pub mod marching_cubes;
pub mod pipeline;

// Re-export commonly used items
pub use bounds::*;
pub use grid::*;
pub use nearest::*;
pub use parallel::{build_pool, default_worker_count, hardware_parallelism, WorkerPoolConfig};
pub use field::*;
pub use marching_cubes::*;
pub use pipeline::*;
