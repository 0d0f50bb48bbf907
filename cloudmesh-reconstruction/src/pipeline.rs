//! Two-phase point cloud to surface pipeline
//!
//! bounds → parallel distance field fill → barrier → sequential polygonization →
//! centroid. The fill runs on a dedicated worker pool; polygonization only starts
//! once every node of the grid has been written.

use crate::bounds::{BoundingBox, DEFAULT_PAD_FRACTION};
use crate::field::{DistanceFieldSampler, DEFAULT_RESOLUTION};
use crate::grid::check_resolution;
use crate::marching_cubes::{MarchingCubes, MarchingCubesConfig, DEFAULT_ISO_LEVEL};
use crate::nearest::NearestSearch;
use crate::parallel::{self, WorkerPoolConfig};
use cloudmesh_core::{Error, Point3f, PointCloud3f, Result, TriangleSoup};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Configuration for the reconstruction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    /// Grid nodes per axis (at least 2)
    pub resolution: usize,
    /// Distance at which the surface is extracted
    pub iso_level: f32,
    /// Bounding box padding as a fraction of each axis' extent
    pub pad_fraction: f32,
    /// Nearest-point index used by the field fill
    pub search: NearestSearch,
    /// Worker pool for the field fill
    pub workers: WorkerPoolConfig,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            iso_level: DEFAULT_ISO_LEVEL,
            pad_fraction: DEFAULT_PAD_FRACTION,
            search: NearestSearch::default(),
            workers: WorkerPoolConfig::default(),
        }
    }
}

impl ReconstructionConfig {
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_iso_level(mut self, iso_level: f32) -> Self {
        self.iso_level = iso_level;
        self
    }

    pub fn with_pad_fraction(mut self, pad_fraction: f32) -> Self {
        self.pad_fraction = pad_fraction;
        self
    }

    pub fn with_search(mut self, search: NearestSearch) -> Self {
        self.search = search;
        self
    }

    /// Set an explicit worker count for the field fill
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.workers.num_threads = Some(num_threads);
        self
    }

    pub fn with_workers(mut self, workers: WorkerPoolConfig) -> Self {
        self.workers = workers;
        self
    }

    /// Check every setting without touching the input
    pub fn validate(&self) -> Result<()> {
        check_resolution(self.resolution)?;
        if !self.iso_level.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "Isovalue must be finite, got {}",
                self.iso_level
            )));
        }
        if !self.pad_fraction.is_finite() || self.pad_fraction < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "Pad fraction must be a finite, non-negative number, got {}",
                self.pad_fraction
            )));
        }
        self.workers.resolved_threads()?;
        Ok(())
    }
}

/// Timing and size figures of one run
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionStats {
    pub point_count: usize,
    pub resolution: usize,
    pub worker_threads: usize,
    pub triangle_count: usize,
    pub field_time: Duration,
    pub polygonize_time: Duration,
}

/// Output of a reconstruction run
#[derive(Debug, Clone)]
pub struct ReconstructionResult {
    /// Triangle soup in cube traversal order
    pub mesh: TriangleSoup,
    /// Mean of all vertex instances, `None` when no triangle was emitted
    pub centroid: Option<Point3f>,
    /// Sampling domain that was used
    pub bounds: BoundingBox,
    pub stats: ReconstructionStats,
}

/// Point cloud to triangle soup pipeline
#[derive(Debug, Clone, Default)]
pub struct ReconstructionPipeline {
    config: ReconstructionConfig,
}

impl ReconstructionPipeline {
    pub fn new(config: ReconstructionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Run both phases on `cloud`
    pub fn run(&self, cloud: &PointCloud3f) -> Result<ReconstructionResult> {
        self.config.validate()?;
        let bounds = BoundingBox::from_cloud(cloud, self.config.pad_fraction)?;

        let pool = parallel::build_pool(&self.config.workers)?;
        let worker_threads = pool.current_num_threads();

        // Phase 1: the sampler returns only after the whole grid is written
        let start = Instant::now();
        let grid = DistanceFieldSampler::new(self.config.resolution)
            .with_search(self.config.search)
            .sample_on(&pool, cloud, &bounds)?;
        let field_time = start.elapsed();
        drop(pool);

        // Phase 2: sequential polygonization of the read-only grid
        let start = Instant::now();
        let marching_cubes = MarchingCubes::new(
            MarchingCubesConfig::default().with_iso_level(self.config.iso_level),
        );
        let mesh = marching_cubes.extract_isosurface(&grid)?;
        let polygonize_time = start.elapsed();

        let centroid = mesh.centroid();
        match centroid {
            Some(c) => debug!(x = c.x, y = c.y, z = c.z, "mesh centroid"),
            None => debug!("mesh is empty, no centroid"),
        }

        let stats = ReconstructionStats {
            point_count: cloud.len(),
            resolution: self.config.resolution,
            worker_threads,
            triangle_count: mesh.len(),
            field_time,
            polygonize_time,
        };
        info!(
            points = stats.point_count,
            triangles = stats.triangle_count,
            field_ms = field_time.as_millis() as u64,
            polygonize_ms = polygonize_time.as_millis() as u64,
            "reconstruction finished"
        );

        Ok(ReconstructionResult {
            mesh,
            centroid,
            bounds,
            stats,
        })
    }
}

/// Convenience function running the pipeline once
pub fn reconstruct_surface(
    cloud: &PointCloud3f,
    config: &ReconstructionConfig,
) -> Result<ReconstructionResult> {
    ReconstructionPipeline::new(config.clone()).run(cloud)
}
