//! Error types for cloudmesh

use thiserror::Error;

/// Main error type for cloudmesh operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The input point cloud has no points, so no sampling domain exists.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// A configuration value makes the run impossible (e.g. resolution < 2).
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input values are unusable, such as non-finite coordinates or a grid buffer
    /// of the wrong length.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A run failed for a reason unrelated to its input (e.g. the worker pool
    /// could not be created).
    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for cloudmesh operations
pub type Result<T> = std::result::Result<T, Error>;
