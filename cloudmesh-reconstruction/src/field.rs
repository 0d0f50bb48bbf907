//! Unsigned distance field sampling over a dense grid
//!
//! Every node stores the distance from its position to the closest cloud point.
//! Nodes are independent of each other, so the fill is split into rows and handed
//! to a worker pool. Any split produces the same grid bit for bit.

use crate::bounds::BoundingBox;
use crate::grid::{node_position, ScalarGrid};
use crate::nearest::{build_search, NearestSearch};
use crate::parallel::{self, WorkerPoolConfig};
use cloudmesh_core::{Error, NearestDistance, PointCloud3f, Result};
use rayon::ThreadPool;
use std::time::Instant;
use tracing::{info, trace};

/// Default number of grid nodes per axis
pub const DEFAULT_RESOLUTION: usize = 100;

/// Fills a [`ScalarGrid`] with nearest-point distances
#[derive(Debug, Clone)]
pub struct DistanceFieldSampler {
    resolution: usize,
    search: NearestSearch,
    workers: WorkerPoolConfig,
}

impl Default for DistanceFieldSampler {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            search: NearestSearch::default(),
            workers: WorkerPoolConfig::default(),
        }
    }
}

impl DistanceFieldSampler {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: NearestSearch) -> Self {
        self.search = search;
        self
    }

    pub fn with_workers(mut self, workers: WorkerPoolConfig) -> Self {
        self.workers = workers;
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Sample the field on a freshly built worker pool
    pub fn sample(&self, cloud: &PointCloud3f, bounds: &BoundingBox) -> Result<ScalarGrid> {
        // Reject before spawning any thread
        let grid = self.allocate(cloud, bounds)?;
        let pool = parallel::build_pool(&self.workers)?;
        Ok(self.fill(grid, cloud, &pool))
    }

    /// Sample the field on an existing pool
    pub fn sample_on(
        &self,
        pool: &ThreadPool,
        cloud: &PointCloud3f,
        bounds: &BoundingBox,
    ) -> Result<ScalarGrid> {
        let grid = self.allocate(cloud, bounds)?;
        Ok(self.fill(grid, cloud, pool))
    }

    fn allocate(&self, cloud: &PointCloud3f, bounds: &BoundingBox) -> Result<ScalarGrid> {
        if cloud.is_empty() {
            return Err(Error::EmptyInput(
                "Cannot sample a distance field from an empty point cloud".to_string(),
            ));
        }
        ScalarGrid::new(*bounds, self.resolution)
    }

    fn fill(&self, mut grid: ScalarGrid, cloud: &PointCloud3f, pool: &ThreadPool) -> ScalarGrid {
        let r = self.resolution;
        let bounds = *grid.bounds();
        let search = build_search(self.search, cloud.as_slice());
        let search: &dyn NearestDistance = search.as_ref();

        info!(
            nodes = grid.node_count(),
            points = cloud.len(),
            search = ?self.search,
            "sampling distance field"
        );
        let start = Instant::now();

        // Row (i, j) holds nodes (i, j, 0..r)
        parallel::fill_rows(pool, grid.values_mut(), r, |row, values| {
            let i = row / r;
            let j = row % r;
            if j == 0 {
                trace!(slice = i, of = r, "filling slice");
            }
            for (k, value) in values.iter_mut().enumerate() {
                let position = node_position(&bounds, r, i, j, k);
                *value = search.nearest_distance(&position);
            }
        });

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "distance field complete"
        );
        grid
    }
}

/// Convenience function for a one-off field fill
pub fn sample_distance_field(
    cloud: &PointCloud3f,
    bounds: &BoundingBox,
    resolution: usize,
    search: NearestSearch,
    workers: &WorkerPoolConfig,
) -> Result<ScalarGrid> {
    DistanceFieldSampler::new(resolution)
        .with_search(search)
        .with_workers(workers.clone())
        .sample(cloud, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::DEFAULT_PAD_FRACTION;
    use approx::assert_relative_eq;
    use cloudmesh_core::Point3f;

    fn one_worker() -> WorkerPoolConfig {
        WorkerPoolConfig::default().with_threads(1)
    }

    #[test]
    fn test_empty_cloud_is_rejected() {
        let bounds = BoundingBox::new(Point3f::origin(), Point3f::new(1.0, 1.0, 1.0)).unwrap();
        let result = sample_distance_field(
            &PointCloud3f::new(),
            &bounds,
            4,
            NearestSearch::BruteForce,
            &one_worker(),
        );
        assert!(matches!(result, Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_low_resolution_is_rejected() {
        let cloud = PointCloud3f::from(vec![[0.0, 0.0, 0.0]]);
        let bounds = BoundingBox::from_cloud(&cloud, DEFAULT_PAD_FRACTION).unwrap();
        for resolution in [0, 1] {
            let result = DistanceFieldSampler::new(resolution)
                .with_workers(one_worker())
                .sample(&cloud, &bounds);
            assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
        }
    }

    #[test]
    fn test_single_point_field_is_exact() {
        let p = Point3f::new(0.25, -0.5, 1.0);
        let cloud = PointCloud3f::from_points(vec![p]);
        let bounds = BoundingBox::from_cloud(&cloud, DEFAULT_PAD_FRACTION).unwrap();
        let grid = DistanceFieldSampler::new(6)
            .with_workers(one_worker())
            .sample(&cloud, &bounds)
            .unwrap();

        for i in 0..6 {
            for j in 0..6 {
                for k in 0..6 {
                    let expected = (grid.node_position(i, j, k) - p).magnitude();
                    assert_relative_eq!(grid.value(i, j, k).unwrap(), expected, max_relative = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_values_are_non_negative_and_zero_on_points() {
        // Points on grid nodes of the tight box
        let cloud = PointCloud3f::from(vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let bounds = BoundingBox::from_cloud(&cloud, 0.0).unwrap();
        let grid = DistanceFieldSampler::new(3)
            .with_workers(one_worker())
            .sample(&cloud, &bounds)
            .unwrap();

        assert!(grid.values().iter().all(|v| *v >= 0.0));
        assert_eq!(grid.value(0, 0, 0), Some(0.0));
        assert_eq!(grid.value(2, 2, 2), Some(0.0));
        assert_relative_eq!(grid.value(1, 1, 1).unwrap(), 0.75f32.sqrt());
    }

    #[test]
    fn test_sample_on_shared_pool() {
        let cloud = PointCloud3f::from(vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let bounds = BoundingBox::from_cloud(&cloud, DEFAULT_PAD_FRACTION).unwrap();
        let sampler = DistanceFieldSampler::new(5);
        let pool = parallel::build_pool(&WorkerPoolConfig::default().with_threads(2)).unwrap();

        let first = sampler.sample_on(&pool, &cloud, &bounds).unwrap();
        let second = sampler.sample_on(&pool, &cloud, &bounds).unwrap();
        assert_eq!(first, second);
    }
}
