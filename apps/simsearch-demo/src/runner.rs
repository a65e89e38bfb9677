//! Workload generation and result verification.

use crate::config::DemoConfig;
use simsearch::{Metric, Neighbor, VectorBatch, VectorError, VectorGenerator};

/// Relative tolerance between library and reference distances.
const TOLERANCE: f64 = 1e-9;

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoReport {
    pub candidates: usize,
    pub dimensions: usize,
    pub k: usize,
    pub metrics: Vec<MetricReport>,
}

/// Per-metric summary across all queries.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReport {
    pub metric: Metric,
    pub queries: usize,
    /// Neighbors returned for the last query
    pub last_neighbors: Vec<Neighbor>,
}

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("Vector error: {0}")]
    Vector(#[from] VectorError),

    #[error("{metric} ranking for query {query} disagrees with reference sort: got {actual:?}, expected {expected:?}")]
    Mismatch {
        metric: Metric,
        query: usize,
        actual: Vec<usize>,
        expected: Vec<usize>,
    },
}

/// Generate the workload described by `config` and check every ranking.
pub fn run(config: &DemoConfig) -> Result<DemoReport, DemoError> {
    let workload = &config.workload;
    let mut generator = VectorGenerator::new(config.generator.clone())?;

    let candidates = generator.generate(workload.candidates, workload.dimensions)?;
    let queries = generator.generate(workload.queries, workload.dimensions)?;

    tracing::info!(
        candidates = candidates.len(),
        dimensions = candidates.dimensions(),
        queries = queries.len(),
        k = config.k,
        "generated workload"
    );

    let mut reports = Vec::with_capacity(config.metrics.len());
    for &metric in &config.metrics {
        let search = config.search(metric);
        let mut last_neighbors = Vec::new();

        for (qi, query) in queries.rows().enumerate() {
            let neighbors = search.neighbors(query, &candidates)?;
            let expected = reference_ranking(query, &candidates, metric, search.k)?;

            if !rankings_agree(&neighbors, &expected) {
                return Err(DemoError::Mismatch {
                    metric,
                    query: qi,
                    actual: neighbors.iter().map(|n| n.index).collect(),
                    expected: expected.iter().map(|&(index, _)| index).collect(),
                });
            }

            tracing::debug!(
                %metric,
                query = qi,
                nearest = ?neighbors.iter().map(|n| n.index).collect::<Vec<_>>(),
                "ranking verified"
            );
            last_neighbors = neighbors;
        }

        if let Some(best) = last_neighbors.first() {
            tracing::info!(
                %metric,
                queries = queries.len(),
                best_index = best.index,
                best_distance = best.distance,
                "metric verified"
            );
        }

        reports.push(MetricReport {
            metric,
            queries: queries.len(),
            last_neighbors,
        });
    }

    Ok(DemoReport {
        candidates: candidates.len(),
        dimensions: candidates.dimensions(),
        k: config.k.min(candidates.len()),
        metrics: reports,
    })
}

/// Distance straight from the textbook formula, independent of the library
/// kernels.
fn reference_distance(metric: Metric, query: &[f64], row: &[f64]) -> Result<f64, VectorError> {
    if query.len() != row.len() {
        return Err(VectorError::DimensionMismatch {
            expected: row.len(),
            actual: query.len(),
        });
    }

    match metric {
        Metric::Euclidean => Ok(query
            .iter()
            .zip(row)
            .map(|(q, r)| (q - r).powi(2))
            .sum::<f64>()
            .sqrt()),
        Metric::Cosine => {
            let dot: f64 = query.iter().zip(row).map(|(q, r)| q * r).sum();
            let norm_q = query.iter().map(|q| q * q).sum::<f64>().sqrt();
            let norm_r = row.iter().map(|r| r * r).sum::<f64>().sqrt();
            if norm_q == 0.0 || norm_r == 0.0 {
                return Err(VectorError::DegenerateVector(
                    "zero vector in reference cosine".to_string(),
                ));
            }
            Ok(1.0 - (dot / (norm_q * norm_r)).clamp(-1.0, 1.0))
        }
    }
}

/// Stable full sort of every candidate by reference distance, cut to `k`.
fn reference_ranking(
    query: &[f64],
    candidates: &VectorBatch,
    metric: Metric,
    k: usize,
) -> Result<Vec<(usize, f64)>, VectorError> {
    let mut ranked = candidates
        .rows()
        .enumerate()
        .map(|(index, row)| Ok((index, reference_distance(metric, query, row)?)))
        .collect::<Result<Vec<_>, VectorError>>()?;

    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(k);
    Ok(ranked)
}

/// Same length, and the distance at every rank matches within tolerance.
///
/// Candidates whose distances differ only by rounding may trade places.
fn rankings_agree(actual: &[Neighbor], expected: &[(usize, f64)]) -> bool {
    actual.len() == expected.len()
        && actual.iter().zip(expected).all(|(n, &(_, reference))| {
            let scale = n.distance.abs().max(reference.abs()).max(1.0);
            (n.distance - reference).abs() <= TOLERANCE * scale
        })
}
