//! Search and generator configuration.
//!
//! Both structs deserialize from partial documents; missing fields take the
//! defaults below.
//!
//! Example YAML:
//! ```yaml
//! search:
//!   k: 10
//!   metric: cosine
//! generator:
//!   low: 0.0
//!   high: 1.0
//!   normalize: true
//!   seed: 42
//! ```

use crate::batch::VectorBatch;
use crate::distance::Metric;
use crate::search::{find_nearest_neighbors, nearest_neighbors, Neighbor};
use crate::{Result, VectorError};
use serde::{Deserialize, Serialize};

/// k-NN search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of neighbors to return (clamped to the candidate count).
    /// Default: 1
    #[serde(default = "default_k")]
    pub k: usize,

    /// Ranking metric.
    /// Default: euclidean
    #[serde(default)]
    pub metric: Metric,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k: default_k(),
            metric: Metric::default(),
        }
    }
}

impl SearchConfig {
    pub fn new(k: usize, metric: Metric) -> Self {
        Self { k, metric }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(VectorError::InvalidArgument("k must be > 0".to_string()));
        }
        Ok(())
    }

    /// Rows of `candidates` nearest to `query`.
    pub fn search(&self, query: &[f64], candidates: &VectorBatch) -> Result<VectorBatch> {
        find_nearest_neighbors(query, candidates, self.k, self.metric)
    }

    /// Indices and distances of the rows nearest to `query`.
    pub fn neighbors(&self, query: &[f64], candidates: &VectorBatch) -> Result<Vec<Neighbor>> {
        nearest_neighbors(query, candidates, self.k, self.metric)
    }
}

/// Random vector generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Inclusive lower bound of each component.
    /// Default: 0.0
    #[serde(default = "default_low")]
    pub low: f64,

    /// Exclusive upper bound of each component.
    /// Default: 1.0
    #[serde(default = "default_high")]
    pub high: f64,

    /// Scale every vector to unit L2 norm.
    /// Default: true
    #[serde(default = "default_normalize")]
    pub normalize: bool,

    /// Seed for reproducible output; `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            low: default_low(),
            high: default_high(),
            normalize: default_normalize(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Set a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the component range `[low, high)`.
    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Enable or disable unit normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(VectorError::InvalidArgument(format!(
                "generator range [{}, {}) must be finite",
                self.low, self.high
            )));
        }
        if self.low >= self.high {
            return Err(VectorError::InvalidArgument(format!(
                "generator range [{}, {}) is empty",
                self.low, self.high
            )));
        }
        if !(self.high - self.low).is_finite() {
            return Err(VectorError::InvalidArgument(format!(
                "generator range [{}, {}) is wider than f64::MAX",
                self.low, self.high
            )));
        }
        Ok(())
    }
}

fn default_k() -> usize {
    1
}

fn default_low() -> f64 {
    0.0
}

fn default_high() -> f64 {
    1.0
}

fn default_normalize() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let search = SearchConfig::default();
        assert_eq!(search.k, 1);
        assert_eq!(search.metric, Metric::Euclidean);
        assert!(search.validate().is_ok());

        let generator = GeneratorConfig::default();
        assert_eq!((generator.low, generator.high), (0.0, 1.0));
        assert!(generator.normalize);
        assert!(generator.seed.is_none());
        assert!(generator.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let search: SearchConfig = serde_yaml::from_str("metric: cosine").unwrap();
        assert_eq!(search, SearchConfig::new(1, Metric::Cosine));

        let generator: GeneratorConfig = serde_yaml::from_str("seed: 7\nnormalize: false").unwrap();
        assert_eq!(generator.seed, Some(7));
        assert!(!generator.normalize);
        assert_eq!(generator.high, 1.0);
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let result = serde_yaml::from_str::<SearchConfig>("metric: manhattan");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("manhattan"), "unexpected error: {}", err);
    }

    #[test]
    fn test_validate() {
        assert!(SearchConfig::new(0, Metric::Euclidean).validate().is_err());

        let empty = GeneratorConfig::default().with_range(1.0, 1.0);
        assert!(matches!(empty.validate(), Err(VectorError::InvalidArgument(_))));

        let infinite = GeneratorConfig::default().with_range(0.0, f64::INFINITY);
        assert!(infinite.validate().is_err());

        let too_wide = GeneratorConfig::default().with_range(-f64::MAX, f64::MAX);
        assert!(matches!(too_wide.validate(), Err(VectorError::InvalidArgument(_))));

        let widest = GeneratorConfig::default().with_range(-f64::MAX / 2.0, f64::MAX / 2.0);
        assert!(widest.validate().is_ok());
    }

    #[test]
    fn test_search_uses_configured_k() {
        let candidates =
            VectorBatch::from_rows(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![5.0, 0.0]]).unwrap();
        let config = SearchConfig::new(2, Metric::Euclidean);

        let rows = config.search(&[0.9, 0.0], &candidates).unwrap();
        assert_eq!(rows.to_rows(), vec![vec![1.0, 0.0], vec![0.0, 0.0]]);

        let neighbors = config.neighbors(&[0.9, 0.0], &candidates).unwrap();
        assert_eq!(neighbors.iter().map(|n| n.index).collect::<Vec<_>>(), vec![1, 0]);
    }
}
