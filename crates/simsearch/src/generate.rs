//! Random vector generation for tests and benchmarks.
//!
//! Components are drawn independently from a uniform distribution over
//! `[low, high)`, `[0, 1)` unless configured otherwise. With normalization
//! on, every row is scaled to unit L2 norm.

use crate::batch::VectorBatch;
use crate::config::GeneratorConfig;
use crate::distance::normalize_in_place;
use crate::{Result, VectorError};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rows whose norm underflows to zero are redrawn at most this many times.
const MAX_REDRAWS: usize = 16;

/// Generate `count` random vectors of `dimensions` components in `[0, 1)`.
///
/// Uses the thread-local RNG, so output is not reproducible. Use
/// [`VectorGenerator`] with a seed when it needs to be.
///
/// # Errors
///
/// Returns `InvalidArgument` if `dimensions` is zero or the batch would hold
/// more than `usize::MAX` components.
///
/// # Example
///
/// ```
/// use simsearch::{generate_vectors, l2_norm};
///
/// let batch = generate_vectors(100, 32, true).unwrap();
/// assert_eq!(batch.len(), 100);
/// assert!(batch.rows().all(|row| (l2_norm(row) - 1.0).abs() < 1e-6));
/// ```
pub fn generate_vectors(count: usize, dimensions: usize, normalize: bool) -> Result<VectorBatch> {
    let uniform = Uniform::new(0.0, 1.0);
    fill_batch(&mut rand::thread_rng(), &uniform, count, dimensions, normalize)
}

/// Seedable random vector generator.
///
/// Two generators built from configs with the same seed produce identical
/// sequences of batches.
pub struct VectorGenerator {
    config: GeneratorConfig,
    uniform: Uniform<f64>,
    rng: StdRng,
}

impl VectorGenerator {
    /// Create a generator from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the configured range is empty, not finite,
    /// or wider than `f64::MAX`.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            uniform: Uniform::new(config.low, config.high),
            config,
            rng,
        })
    }

    /// Shorthand for a seeded generator over `[0, 1)`.
    pub fn seeded(seed: u64, normalize: bool) -> Self {
        Self {
            config: GeneratorConfig::default()
                .with_seed(seed)
                .with_normalize(normalize),
            uniform: Uniform::new(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a batch of `count` vectors.
    pub fn generate(&mut self, count: usize, dimensions: usize) -> Result<VectorBatch> {
        tracing::trace!(count, dimensions, normalize = self.config.normalize, "generating vectors");
        fill_batch(
            &mut self.rng,
            &self.uniform,
            count,
            dimensions,
            self.config.normalize,
        )
    }

    /// Generate a single vector.
    pub fn generate_one(&mut self, dimensions: usize) -> Result<Vec<f64>> {
        if dimensions == 0 {
            return Err(VectorError::InvalidArgument(
                "dimensions must be > 0".to_string(),
            ));
        }

        let mut v = vec![0.0; dimensions];
        fill_row(&mut self.rng, &self.uniform, &mut v, self.config.normalize)?;
        Ok(v)
    }
}

fn fill_batch<R: Rng + ?Sized>(
    rng: &mut R,
    uniform: &Uniform<f64>,
    count: usize,
    dimensions: usize,
    normalize: bool,
) -> Result<VectorBatch> {
    if dimensions == 0 {
        return Err(VectorError::InvalidArgument(
            "dimensions must be > 0".to_string(),
        ));
    }

    let len = count.checked_mul(dimensions).ok_or_else(|| {
        VectorError::InvalidArgument(format!(
            "{} x {} components overflows usize",
            count, dimensions
        ))
    })?;

    let mut data = vec![0.0; len];
    for row in data.chunks_exact_mut(dimensions) {
        fill_row(rng, uniform, row, normalize)?;
    }

    VectorBatch::from_flat(dimensions, data)
}

fn fill_row<R: Rng + ?Sized>(
    rng: &mut R,
    uniform: &Uniform<f64>,
    row: &mut [f64],
    normalize: bool,
) -> Result<()> {
    for _ in 0..MAX_REDRAWS {
        for x in row.iter_mut() {
            *x = uniform.sample(rng);
        }

        if !normalize || normalize_in_place(row) > 0.0 {
            return Ok(());
        }
    }

    Err(VectorError::DegenerateVector(format!(
        "could not draw a non-zero vector in {} attempts",
        MAX_REDRAWS
    )))
}
