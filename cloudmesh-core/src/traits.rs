//! Core traits for cloudmesh

use crate::point::*;

/// Trait for nearest-point distance queries against a fixed point set
///
/// Implementations must return exactly the same value for the same query: the
/// square root of the smallest [`squared_distance`] to any point of the set.
/// `Sync` lets the distance field fill share one index across workers.
pub trait NearestDistance: Sync {
    /// Distance from `query` to the closest point of the set.
    ///
    /// Returns `f32::INFINITY` when the set is empty.
    fn nearest_distance(&self, query: &Point3f) -> f32;
}
