//! Exact k-nearest-neighbor search.
//!
//! Linear scan - O(N * D) distance computation plus O(N + k log k)
//! selection. Every candidate is scored; there is no index structure.
//!
//! # Ordering
//!
//! Results are sorted by non-decreasing distance. Candidates at the same
//! distance keep their original row order, so the output is identical to a
//! stable argsort of the distances truncated to `k`. A NaN distance (from a
//! candidate holding NaN or infinite components) ranks after every number.
//!
//! # k larger than the candidate set
//!
//! `k` is clamped to the number of candidates: asking for 1000 neighbors of
//! a 5-row batch returns all 5 rows.

use crate::batch::VectorBatch;
use crate::distance::Metric;
use crate::{Result, VectorError};
use std::cmp::Ordering;

/// A candidate ranked by distance to the query.
///
/// Equality and ordering agree: two neighbors are equal only when they share
/// an index and compare equal under [`Ord`].
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    /// Row of the candidate in the searched batch.
    pub index: usize,
    /// Distance to the query (lower = more similar).
    pub distance: f64,
}

impl Neighbor {
    pub fn new(index: usize, distance: f64) -> Self {
        Self { index, distance }
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        // NaN of either sign sorts last, then distance, then row order
        let distance = match (self.distance.is_nan(), other.distance.is_nan()) {
            (false, false) => self.distance.total_cmp(&other.distance),
            (a, b) => a.cmp(&b),
        };
        distance.then_with(|| self.index.cmp(&other.index))
    }
}

/// Find the `k` rows of `candidates` nearest to `query`.
///
/// Returns a new batch holding those rows, nearest first.
///
/// # Errors
///
/// - `InvalidArgument` if `k` is zero
/// - `DimensionMismatch` if `query` and `candidates` differ in dimensionality
/// - `InvalidVector` if `query` contains NaN or infinite values
/// - `DegenerateVector` for a zero vector under [`Metric::Cosine`]
///
/// # Example
///
/// ```
/// use simsearch::{find_nearest_neighbors, Metric, VectorBatch};
///
/// let candidates = VectorBatch::from_rows(vec![[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0]]).unwrap();
/// let nearest = find_nearest_neighbors(&[0.2, 1.0], &candidates, 1, Metric::Cosine).unwrap();
/// assert_eq!(nearest.to_rows(), vec![vec![0.0, 1.0]]);
/// ```
pub fn find_nearest_neighbors(
    query: &[f64],
    candidates: &VectorBatch,
    k: usize,
    metric: Metric,
) -> Result<VectorBatch> {
    let neighbors = nearest_neighbors(query, candidates, k, metric)?;
    let indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
    candidates.select(&indices)
}

/// Rank the `k` rows of `candidates` nearest to `query`.
///
/// Same ranking as [`find_nearest_neighbors`], but returns row indices and
/// distances instead of copying rows, so callers can map results back to
/// their own identifiers.
pub fn nearest_neighbors(
    query: &[f64],
    candidates: &VectorBatch,
    k: usize,
    metric: Metric,
) -> Result<Vec<Neighbor>> {
    if k == 0 {
        return Err(VectorError::InvalidArgument("k must be > 0".to_string()));
    }
    validate_query(query, candidates.dimensions())?;

    let n = candidates.len();
    let k = if k > n {
        tracing::debug!(k, candidates = n, "k exceeds candidate count, clamping");
        n
    } else {
        k
    };

    if k == 0 {
        return Ok(Vec::new());
    }

    let mut results: Vec<Neighbor> = metric
        .distances(query, candidates)?
        .into_iter()
        .enumerate()
        .map(|(index, distance)| Neighbor::new(index, distance))
        .collect();

    // Partition the k smallest to the front, then order just that prefix.
    // Indices are unique, so the order is strict and the result matches a
    // full stable sort.
    if k < results.len() {
        results.select_nth_unstable(k - 1);
        results.truncate(k);
    }
    results.sort_unstable();

    tracing::trace!(
        metric = %metric,
        candidates = n,
        k,
        best = ?results.first().map(|best| best.distance),
        "nearest neighbor search complete"
    );

    Ok(results)
}

/// Validate a query's dimensions and values.
fn validate_query(query: &[f64], dimensions: usize) -> Result<()> {
    if query.len() != dimensions {
        return Err(VectorError::DimensionMismatch {
            expected: dimensions,
            actual: query.len(),
        });
    }

    for (i, &v) in query.iter().enumerate() {
        if v.is_nan() {
            return Err(VectorError::InvalidVector(format!(
                "NaN value at index {}",
                i
            )));
        }
        if v.is_infinite() {
            return Err(VectorError::InvalidVector(format!(
                "Infinite value at index {}",
                i
            )));
        }
    }

    Ok(())
}
