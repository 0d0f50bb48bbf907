//! Worker pool management for the distance field fill
//!
//! The field fill is the only parallel phase. Each run builds its own rayon pool
//! sized from [`WorkerPoolConfig`]; by default it uses half of the detected
//! hardware parallelism, never fewer than one thread.

use cloudmesh_core::{Error, Result};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Worker pool configuration for the field fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerPoolConfig {
    /// Number of worker threads (None = half of the hardware threads)
    pub num_threads: Option<usize>,
    /// Thread stack size in bytes
    pub stack_size: Option<usize>,
    /// Thread name prefix
    pub thread_name_prefix: String,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            stack_size: None,
            thread_name_prefix: "cloudmesh-field".to_string(),
        }
    }
}

impl WorkerPoolConfig {
    /// Set number of threads
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = Some(num_threads);
        self
    }

    /// Set stack size
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    /// Set thread name prefix
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Number of workers this configuration asks for
    pub fn resolved_threads(&self) -> Result<usize> {
        match self.num_threads {
            Some(0) => Err(Error::InvalidConfiguration(
                "Worker thread count must be at least 1".to_string(),
            )),
            Some(n) => Ok(n),
            None => Ok(default_worker_count()),
        }
    }
}

/// Hardware threads reported by the OS
pub fn hardware_parallelism() -> usize {
    num_cpus::get()
}

/// Default pool size: half of the hardware threads, at least one
pub fn default_worker_count() -> usize {
    (hardware_parallelism() / 2).max(1)
}

/// Build a dedicated pool for one field fill
pub fn build_pool(config: &WorkerPoolConfig) -> Result<ThreadPool> {
    let num_threads = config.resolved_threads()?;

    let mut builder = ThreadPoolBuilder::new().num_threads(num_threads);

    if let Some(stack_size) = config.stack_size {
        builder = builder.stack_size(stack_size);
    }

    if !config.thread_name_prefix.is_empty() {
        let prefix = config.thread_name_prefix.clone();
        builder = builder.thread_name(move |index| format!("{}-{}", prefix, index));
    }

    let pool = builder
        .build()
        .map_err(|e| Error::Algorithm(format!("Failed to create worker pool: {}", e)))?;

    info!(
        workers = num_threads,
        available = hardware_parallelism(),
        "worker pool ready"
    );

    Ok(pool)
}

/// Fill `buffer` row by row on `pool`.
///
/// `buffer` is split into disjoint rows of `row_len` elements and `fill` is called
/// once per row with the row number. Rows may run on any worker in any order. The
/// call returns only after every row is written, which is the barrier between the
/// fill and anything that reads the buffer afterwards.
pub fn fill_rows<T, F>(pool: &ThreadPool, buffer: &mut [T], row_len: usize, fill: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync + Send,
{
    if row_len == 0 {
        return;
    }
    pool.install(|| {
        buffer
            .par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(row, chunk)| fill(row, chunk));
    });
}
