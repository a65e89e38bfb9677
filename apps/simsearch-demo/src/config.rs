//! Demo configuration.
//!
//! Loads and validates configuration from a YAML file or environment variables.

use serde::{Deserialize, Serialize};
use simsearch::{GeneratorConfig, Metric, SearchConfig};

/// Demo configuration.
///
/// Example YAML:
/// ```yaml
/// workload:
///   candidates: 1000
///   dimensions: 32
///   queries: 4
/// k: 10
/// metrics: [euclidean, cosine]
/// generator:
///   normalize: false
///   seed: 42
/// ```
///
/// Unknown keys are rejected, so a misspelled or stale field fails to load
/// instead of being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemoConfig {
    /// Size of the random workload
    #[serde(default)]
    pub workload: WorkloadConfig,

    /// Neighbors requested per query
    #[serde(default = "default_k")]
    pub k: usize,

    /// Metrics to check, in order
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,

    /// Random vector generation
    #[serde(default = "default_generator")]
    pub generator: GeneratorConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            workload: WorkloadConfig::default(),
            k: default_k(),
            metrics: default_metrics(),
            generator: default_generator(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadConfig {
    /// Number of candidate vectors
    #[serde(default = "default_candidates")]
    pub candidates: usize,

    /// Dimensionality of every vector
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Number of queries per metric
    #[serde(default = "default_queries")]
    pub queries: usize,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            dimensions: default_dimensions(),
            queries: default_queries(),
        }
    }
}

fn default_k() -> usize {
    10
}

fn default_metrics() -> Vec<Metric> {
    Metric::ALL.to_vec()
}

fn default_generator() -> GeneratorConfig {
    GeneratorConfig::default().with_normalize(false)
}

fn default_candidates() -> usize {
    1000
}

fn default_dimensions() -> usize {
    32
}

fn default_queries() -> usize {
    1
}

impl DemoConfig {
    /// Search settings for one of the configured metrics.
    pub fn search(&self, metric: Metric) -> SearchConfig {
        SearchConfig::new(self.k, metric)
    }

    /// Load configuration from a YAML file.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        let config: DemoConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; unset ones keep their defaults.
    /// Supported variables:
    /// - SIMSEARCH_CANDIDATES
    /// - SIMSEARCH_DIMENSIONS
    /// - SIMSEARCH_QUERIES
    /// - SIMSEARCH_K
    /// - SIMSEARCH_METRICS (comma-separated)
    /// - SIMSEARCH_SEED
    pub fn load_from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build a configuration from a variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = DemoConfig::default();

        if let Some(v) = lookup("SIMSEARCH_CANDIDATES") {
            config.workload.candidates = parse_var("SIMSEARCH_CANDIDATES", &v)?;
        }
        if let Some(v) = lookup("SIMSEARCH_DIMENSIONS") {
            config.workload.dimensions = parse_var("SIMSEARCH_DIMENSIONS", &v)?;
        }
        if let Some(v) = lookup("SIMSEARCH_QUERIES") {
            config.workload.queries = parse_var("SIMSEARCH_QUERIES", &v)?;
        }
        if let Some(v) = lookup("SIMSEARCH_K") {
            config.k = parse_var("SIMSEARCH_K", &v)?;
        }
        if let Some(v) = lookup("SIMSEARCH_METRICS") {
            config.metrics = v
                .split(',')
                .map(|s| parse_var("SIMSEARCH_METRICS", s.trim()))
                .collect::<Result<_, _>>()?;
        }
        if let Some(v) = lookup("SIMSEARCH_SEED") {
            config.generator.seed = Some(parse_var("SIMSEARCH_SEED", &v)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workload.candidates == 0 {
            return Err(ConfigError::InvalidField(
                "workload.candidates must be > 0".to_string(),
            ));
        }

        if self.workload.dimensions == 0 {
            return Err(ConfigError::InvalidField(
                "workload.dimensions must be > 0".to_string(),
            ));
        }

        if self.metrics.is_empty() {
            return Err(ConfigError::InvalidField(
                "metrics cannot be empty".to_string(),
            ));
        }

        if self.k == 0 {
            return Err(ConfigError::InvalidField("k must be > 0".to_string()));
        }

        self.generator
            .validate()
            .map_err(|e| ConfigError::InvalidField(format!("generator: {}", e)))?;

        Ok(())
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ConfigError::InvalidField(format!("{}={:?}: {}", name, value, e)))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),
}
