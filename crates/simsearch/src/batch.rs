//! Row-major vector batches.
//!
//! A `VectorBatch` is the candidate set searched by k-NN: N vectors of the
//! same dimensionality D, stored contiguously. Row position is the identity
//! of each vector; search results refer back to it by index.

use crate::{Result, VectorError};

/// N×D batch of `f64` vectors stored as one contiguous row-major buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorBatch {
    /// Concatenated rows, each of length `dimensions`
    data: Vec<f64>,
    /// Length of every row
    dimensions: usize,
}

impl VectorBatch {
    /// Create an empty batch for vectors of `dimensions` components.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        Self::with_capacity(dimensions, 0)
    }

    /// Create an empty batch with room for `rows` vectors.
    pub fn with_capacity(dimensions: usize, rows: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(VectorError::InvalidArgument(
                "dimensions must be > 0".to_string(),
            ));
        }

        Ok(Self {
            data: Vec::with_capacity(dimensions * rows),
            dimensions,
        })
    }

    /// Build a batch from individual rows.
    ///
    /// The first row fixes the dimensionality; every other row must match it.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `rows` is empty or the rows have zero length
    /// - `DimensionMismatch` if any row differs in length from the first
    pub fn from_rows<R: AsRef<[f64]>>(rows: impl IntoIterator<Item = R>) -> Result<Self> {
        let mut rows = rows.into_iter();
        let first = rows.next().ok_or_else(|| {
            VectorError::InvalidArgument(
                "cannot infer dimensions from an empty row list".to_string(),
            )
        })?;

        let first = first.as_ref();
        let (lower, _) = rows.size_hint();
        let mut batch = Self::with_capacity(first.len(), lower + 1)?;
        batch.data.extend_from_slice(first);

        for row in rows {
            batch.push(row.as_ref())?;
        }

        Ok(batch)
    }

    /// Wrap an already flattened row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `dimensions` is zero or `data.len()` is
    /// not a multiple of `dimensions`.
    pub fn from_flat(dimensions: usize, data: Vec<f64>) -> Result<Self> {
        if dimensions == 0 {
            return Err(VectorError::InvalidArgument(
                "dimensions must be > 0".to_string(),
            ));
        }
        if data.len() % dimensions != 0 {
            return Err(VectorError::InvalidArgument(format!(
                "buffer of {} values is not a whole number of {}-dimensional rows",
                data.len(),
                dimensions
            )));
        }

        Ok(Self { data, dimensions })
    }

    /// Append a row.
    pub fn push(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.dimensions {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimensions,
                actual: row.len(),
            });
        }

        self.data.extend_from_slice(row);
        Ok(())
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.dimensions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length of every row.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Row `index`, or `None` if out of range.
    #[inline]
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.dimensions)?;
        let end = start.checked_add(self.dimensions)?;
        self.data.get(start..end)
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dimensions)
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy the rows out into owned vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Gather the rows at `indices`, in that order, into a new batch.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any index is out of range.
    pub fn select(&self, indices: &[usize]) -> Result<Self> {
        let mut out = Self::with_capacity(self.dimensions, indices.len())?;
        for &i in indices {
            let row = self.row(i).ok_or_else(|| {
                VectorError::InvalidArgument(format!(
                    "row {} out of range for batch of {} rows",
                    i,
                    self.len()
                ))
            })?;
            out.data.extend_from_slice(row);
        }
        Ok(out)
    }
}
