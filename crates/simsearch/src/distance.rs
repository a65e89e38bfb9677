//! Distance functions for vector similarity.
//!
//! Provides two distance metrics, each lower = more similar:
//! - **Euclidean (L2)**: straight-line distance, `sqrt(sum((a[i] - b[i])^2))`
//! - **Cosine**: angle-based, `1 - (a · b) / (||a|| * ||b||)`
//!
//! Every metric comes in two shapes: a pairwise form taking two vectors and a
//! batched form scoring one query against every row of a [`VectorBatch`].
//! The batched form applies the exact pairwise formula per row, so
//! `euclidean_distances(q, batch)[i] == euclidean_distance(q, batch.row(i))`
//! holds bit-for-bit.
//!
//! Inner loops are unrolled by four so the compiler can auto-vectorize them
//! in release builds.

use crate::batch::VectorBatch;
use crate::{Result, VectorError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance metric used to rank candidates.
///
/// Parses from and serializes to its lowercase name (`"euclidean"`,
/// `"cosine"`). Any other name is rejected with
/// [`VectorError::InvalidMetric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Metric {
    /// Euclidean (L2) distance: sqrt(sum((a[i] - b[i])^2))
    #[default]
    Euclidean,
    /// Cosine distance: 1 - (a · b) / (||a|| * ||b||)
    Cosine,
}

impl Metric {
    /// All supported metrics.
    pub const ALL: [Metric; 2] = [Metric::Euclidean, Metric::Cosine];

    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Cosine => "cosine",
        }
    }

    /// Compute distance between two vectors.
    #[inline]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        match self {
            Self::Euclidean => euclidean_distance(a, b),
            Self::Cosine => cosine_distance(a, b),
        }
    }

    /// Compute the distance from `query` to every row of `batch`.
    pub fn distances(&self, query: &[f64], batch: &VectorBatch) -> Result<Vec<f64>> {
        match self {
            Self::Euclidean => euclidean_distances(query, batch),
            Self::Cosine => cosine_distances(query, batch),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| s.eq_ignore_ascii_case(m.name()))
            .ok_or_else(|| VectorError::InvalidMetric(s.to_string()))
    }
}

impl TryFrom<String> for Metric {
    type Error = VectorError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Metric> for String {
    fn from(m: Metric) -> Self {
        m.name().to_string()
    }
}

/// Compute Euclidean (L2) distance between two vectors.
///
/// # Errors
///
/// Returns `DimensionMismatch` if the vectors differ in length.
///
/// # Example
///
/// ```
/// use simsearch::euclidean_distance;
///
/// let a = [1.0, 2.0, 3.0];
/// let b = [4.0, 5.0, 6.0];
/// let dist = euclidean_distance(&a, &b).unwrap();
/// assert!((dist - 27.0f64.sqrt()).abs() < 1e-12);
/// ```
#[inline]
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a.len(), b.len())?;
    Ok(l2_distance(a, b))
}

/// Compute squared Euclidean distance (avoids sqrt for comparisons).
#[inline]
pub fn euclidean_distance_squared(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a.len(), b.len())?;
    Ok(squared_l2(a, b))
}

/// Euclidean distance from `query` to every row of `batch`.
pub fn euclidean_distances(query: &[f64], batch: &VectorBatch) -> Result<Vec<f64>> {
    check_dimensions(batch.dimensions(), query.len())?;
    Ok(batch.rows().map(|row| l2_distance(query, row)).collect())
}

/// Compute cosine distance between two vectors.
///
/// Cosine distance = 1 - cosine_similarity, with the similarity clamped to
/// [-1, 1], so the result lies in [0, 2]:
/// - 0 = identical direction
/// - 1 = orthogonal
/// - 2 = opposite direction
///
/// # Errors
///
/// - `DimensionMismatch` if the vectors differ in length
/// - `DegenerateVector` if either vector has zero norm
///
/// # Example
///
/// ```
/// use simsearch::cosine_distance;
///
/// let a = [1.0, 0.0];
/// let b = [0.0, 1.0];
/// assert!((cosine_distance(&a, &b).unwrap() - 1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn cosine_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a.len(), b.len())?;
    cosine_checked(a, b).ok_or_else(|| {
        VectorError::DegenerateVector("cosine distance is undefined for a zero vector".to_string())
    })
}

/// Cosine distance from `query` to every row of `batch`.
///
/// # Errors
///
/// `DegenerateVector` names the first zero-norm row, or the query if it is
/// the zero vector.
pub fn cosine_distances(query: &[f64], batch: &VectorBatch) -> Result<Vec<f64>> {
    check_dimensions(batch.dimensions(), query.len())?;

    if query.iter().all(|&x| x == 0.0) {
        return Err(VectorError::DegenerateVector(
            "query is the zero vector".to_string(),
        ));
    }

    batch
        .rows()
        .enumerate()
        .map(|(i, row)| {
            cosine_checked(query, row).ok_or_else(|| {
                VectorError::DegenerateVector(format!("candidate row {} is the zero vector", i))
            })
        })
        .collect()
}

/// Compute the dot product of two equal-length vectors.
///
/// Callers are responsible for matching lengths; extra components of the
/// longer vector are ignored.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);

    let mut sum = 0.0f64;
    let chunks = n / 4;

    for i in 0..chunks {
        let base = i * 4;
        sum += a[base] * b[base]
            + a[base + 1] * b[base + 1]
            + a[base + 2] * b[base + 2]
            + a[base + 3] * b[base + 3];
    }

    for i in (chunks * 4)..n {
        sum += a[i] * b[i];
    }

    sum
}

/// L2 norm of a vector.
#[inline]
pub fn l2_norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Scale `v` to unit L2 norm in place.
///
/// Returns the original norm. A zero vector is left unchanged.
pub fn normalize_in_place(v: &mut [f64]) -> f64 {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
    norm
}

#[inline]
fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(VectorError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Squared L2 distance over equal-length slices.
#[inline]
fn squared_l2(a: &[f64], b: &[f64]) -> f64 {
    let mut sum = 0.0f64;
    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;
        let d0 = a[base] - b[base];
        let d1 = a[base + 1] - b[base + 1];
        let d2 = a[base + 2] - b[base + 2];
        let d3 = a[base + 3] - b[base + 3];
        sum += d0 * d0 + d1 * d1 + d2 * d2 + d3 * d3;
    }

    for i in (chunks * 4)..a.len() {
        let d = a[i] - b[i];
        sum += d * d;
    }

    sum
}

/// L2 distance over equal-length slices.
///
/// Falls back to a rescaled pass when the squared sum overflows or
/// underflows, so any finite pair gets a finite answer.
#[inline]
fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    let sum = squared_l2(a, b);
    if sum.is_finite() && sum >= f64::MIN_POSITIVE {
        return sum.sqrt();
    }

    let scale = a
        .iter()
        .zip(b)
        .fold(0.0f64, |m, (x, y)| m.max((x - y).abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }

    let scaled: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = (x - y) / scale;
            d * d
        })
        .sum();
    scale * scaled.sqrt()
}

/// Cosine distance over equal-length slices, `None` when a norm is zero.
#[inline]
fn cosine_checked(a: &[f64], b: &[f64]) -> Option<f64> {
    let (mut dot, mut norm_a, mut norm_b) = dot_and_norms(a, b);

    if !well_scaled(dot, norm_a, norm_b) {
        let max_a = max_abs(a);
        let max_b = max_abs(b);
        if max_a == 0.0 || max_b == 0.0 {
            return None;
        }
        (dot, norm_a, norm_b) = scaled_dot_and_norms(a, b, max_a, max_b);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    Some(1.0 - similarity.clamp(-1.0, 1.0))
}

/// Squared norms neither overflowed nor lost precision to subnormals.
#[inline]
fn well_scaled(dot: f64, norm_a: f64, norm_b: f64) -> bool {
    dot.is_finite()
        && norm_a.is_finite()
        && norm_b.is_finite()
        && norm_a >= f64::MIN_POSITIVE
        && norm_b >= f64::MIN_POSITIVE
}

#[inline]
fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0f64, |m, x| m.max(x.abs()))
}

/// `dot_and_norms` of `a / scale_a` and `b / scale_b`.
fn scaled_dot_and_norms(a: &[f64], b: &[f64], scale_a: f64, scale_b: f64) -> (f64, f64, f64) {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b) {
        let x = x / scale_a;
        let y = y / scale_b;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    (dot, norm_a, norm_b)
}

/// Compute dot product and squared norms in a single pass.
///
/// Returns (dot, norm_a_squared, norm_b_squared)
#[inline]
fn dot_and_norms(a: &[f64], b: &[f64]) -> (f64, f64, f64) {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;

        dot += a[base] * b[base]
            + a[base + 1] * b[base + 1]
            + a[base + 2] * b[base + 2]
            + a[base + 3] * b[base + 3];

        norm_a += a[base] * a[base]
            + a[base + 1] * a[base + 1]
            + a[base + 2] * a[base + 2]
            + a[base + 3] * a[base + 3];

        norm_b += b[base] * b[base]
            + b[base + 1] * b[base + 1]
            + b[base + 2] * b[base + 2]
            + b[base + 3] * b[base + 3];
    }

    for i in (chunks * 4)..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    (dot, norm_a, norm_b)
}
