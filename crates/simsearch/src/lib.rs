//! Exact vector similarity search.
//!
//! This crate provides the building blocks for brute-force k-nearest-neighbor
//! search over dense `f64` embeddings:
//!
//! - **Distance functions**: Euclidean (L2) and Cosine, pairwise and batched
//! - **VectorBatch**: N×D row-major candidate set
//! - **Generator**: uniform random vectors, optionally unit-normalized
//! - **Search**: exact k-NN by full scan with deterministic tie-breaking
//!
//! Every function is pure. Nothing is cached between calls, so concurrent
//! callers need no synchronization as long as they only share candidate
//! batches by reference.
//!
//! # Example
//!
//! ```
//! use simsearch::{find_nearest_neighbors, Metric, VectorBatch};
//!
//! let candidates = VectorBatch::from_rows(vec![
//!     vec![0.0, 0.0, 0.0],
//!     vec![1.0, 1.0, 1.0],
//!     vec![10.0, 10.0, 10.0],
//! ])
//! .unwrap();
//!
//! let nearest = find_nearest_neighbors(&[0.9, 0.9, 0.9], &candidates, 2, Metric::Euclidean).unwrap();
//! assert_eq!(nearest.len(), 2);
//! assert_eq!(nearest.row(0), Some(&[1.0, 1.0, 1.0][..]));
//! ```

mod batch;
mod config;
mod distance;
mod generate;
mod search;

pub use batch::VectorBatch;
pub use config::{GeneratorConfig, SearchConfig};
pub use distance::{
    cosine_distance, cosine_distances, dot, euclidean_distance, euclidean_distance_squared,
    euclidean_distances, l2_norm, normalize_in_place, Metric,
};
pub use generate::{generate_vectors, VectorGenerator};
pub use search::{find_nearest_neighbors, nearest_neighbors, Neighbor};

/// Error type for vector operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VectorError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unknown distance metric: {0}")]
    InvalidMetric(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    #[error("Invalid vector: {0}")]
    InvalidVector(String),
}

/// Result type for vector operations.
pub type Result<T> = std::result::Result<T, VectorError>;
