//! Validated cost models consumed by the solvers.
//!
//! All input checking happens here, at construction. A [`DenseCost`] or
//! [`SparseCost`] handed to a solver is already structurally sound, so the
//! solvers themselves only ever report [`Error::Infeasible`].

use num_traits::Float;

use crate::error::{Error, Result};

// Relative tolerance used when testing whether several entries tie for a
// column minimum during initialization. Distance comparisons inside the
// augmenting search are exact.
pub(crate) fn tie_epsilon<F: Float>(reference: F) -> F {
    F::epsilon() * (F::one() + reference.abs())
}

/// Dense row-major cost matrix with `nrows <= ncols`.
///
/// Entries may be positive infinity to mark a forbidden pairing; NaN and
/// negative infinity are rejected. Rectangular problems are solved over the
/// row dimension, so callers wanting a bijection on both sides of a wide
/// matrix must pad it square themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseCost<F> {
    nrows: usize,
    ncols: usize,
    values: Vec<F>,
}

impl<F: Float> DenseCost<F> {
    /// Builds a dense cost matrix from row-major `values`.
    pub fn new(nrows: usize, ncols: usize, values: Vec<F>) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(Error::EmptyProblem);
        }
        if nrows > ncols {
            return Err(Error::ShapeMismatch { nrows, ncols });
        }
        if values.len() != nrows * ncols {
            return Err(Error::EdgeCountMismatch {
                expected: nrows * ncols,
                got: values.len(),
            });
        }
        for (k, &c) in values.iter().enumerate() {
            if c.is_nan() || c == F::neg_infinity() {
                return Err(Error::NonFiniteCost {
                    row: k / ncols,
                    col: k % ncols,
                });
            }
        }
        Ok(Self {
            nrows,
            ncols,
            values,
        })
    }

    /// Builds a dense cost matrix from nested rows.
    pub fn from_rows(rows: &[Vec<F>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        for r in rows {
            if r.len() != ncols {
                return Err(Error::EdgeCountMismatch {
                    expected: ncols,
                    got: r.len(),
                });
            }
        }
        let values = rows.iter().flatten().copied().collect();
        Self::new(nrows, ncols, values)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Cost of assigning `row` to `col`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> F {
        self.values[row * self.ncols + col]
    }

    #[inline]
    pub(crate) fn row(&self, row: usize) -> &[F] {
        &self.values[row * self.ncols..(row + 1) * self.ncols]
    }
}

/// Compressed row-oriented sparse cost structure.
///
/// Any `(row, column)` pair without a stored entry has implicit cost
/// `+infinity` and can never be matched. Stored costs must be finite;
/// unreachable pairs are expressed by omission, not by storing infinities.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseCost<F> {
    nrows: usize,
    ncols: usize,
    row_starts: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<F>,
}

impl<F: Float> SparseCost<F> {
    /// Builds a sparse cost structure from raw CSR arrays.
    ///
    /// `row_starts` must hold `nrows + 1` monotonically non-decreasing
    /// offsets starting at zero; `col_indices` and `values` hold one entry
    /// per edge, with column indices unique within each row.
    pub fn new(
        nrows: usize,
        ncols: usize,
        row_starts: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<F>,
    ) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(Error::EmptyProblem);
        }
        if nrows > ncols {
            return Err(Error::ShapeMismatch { nrows, ncols });
        }
        if row_starts.len() != nrows + 1 {
            return Err(Error::RowStartsLength {
                expected: nrows + 1,
                got: row_starts.len(),
            });
        }
        if row_starts[0] != 0 {
            return Err(Error::InvalidRowStarts { index: 0 });
        }
        for i in 0..nrows {
            if row_starts[i + 1] < row_starts[i] {
                return Err(Error::InvalidRowStarts { index: i + 1 });
            }
        }
        let ne = row_starts[nrows];
        if col_indices.len() != ne {
            return Err(Error::EdgeCountMismatch {
                expected: ne,
                got: col_indices.len(),
            });
        }
        if values.len() != ne {
            return Err(Error::EdgeCountMismatch {
                expected: ne,
                got: values.len(),
            });
        }

        // last_row[j] is the row that most recently used column j.
        let mut last_row = vec![usize::MAX; ncols];
        for i in 0..nrows {
            for k in row_starts[i]..row_starts[i + 1] {
                let j = col_indices[k];
                if j >= ncols {
                    return Err(Error::ColumnOutOfRange {
                        row: i,
                        col: j,
                        ncols,
                    });
                }
                if last_row[j] == i {
                    return Err(Error::DuplicateColumn { row: i, col: j });
                }
                last_row[j] = i;
                if !values[k].is_finite() {
                    return Err(Error::NonFiniteCost { row: i, col: j });
                }
            }
        }

        Ok(Self {
            nrows,
            ncols,
            row_starts,
            col_indices,
            values,
        })
    }

    /// Builds a sparse cost structure from `(row, column, cost)` triplets in
    /// any order.
    pub fn from_entries(nrows: usize, ncols: usize, entries: &[(usize, usize, F)]) -> Result<Self> {
        if nrows == 0 || ncols == 0 {
            return Err(Error::EmptyProblem);
        }
        let mut row_starts = vec![0usize; nrows + 1];
        for &(i, _, _) in entries {
            if i >= nrows {
                return Err(Error::RowOutOfRange { row: i, nrows });
            }
            row_starts[i + 1] += 1;
        }
        for i in 0..nrows {
            row_starts[i + 1] += row_starts[i];
        }
        let mut next = row_starts.clone();
        let mut col_indices = vec![0usize; entries.len()];
        let mut values = vec![F::zero(); entries.len()];
        for &(i, j, c) in entries {
            let k = next[i];
            col_indices[k] = j;
            values[k] = c;
            next[i] = k + 1;
        }
        Self::new(nrows, ncols, row_starts, col_indices, values)
    }

    /// Converts a dense matrix into the equivalent sparse structure,
    /// dropping infinite (forbidden) entries.
    pub fn from_dense(dense: &DenseCost<F>) -> Self {
        let nrows = dense.nrows();
        let ncols = dense.ncols();
        let mut row_starts = Vec::with_capacity(nrows + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();
        row_starts.push(0);
        for i in 0..nrows {
            for (j, &c) in dense.row(i).iter().enumerate() {
                if c.is_finite() {
                    col_indices.push(j);
                    values.push(c);
                }
            }
            row_starts.push(col_indices.len());
        }
        Self {
            nrows,
            ncols,
            row_starts,
            col_indices,
            values,
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Total number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.col_indices.len()
    }

    /// Number of reachable columns in `row`.
    pub fn degree(&self, row: usize) -> usize {
        self.row_starts[row + 1] - self.row_starts[row]
    }

    /// The `(column, cost)` entries of `row`.
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, F)> + '_ {
        self.row_range(row)
            .map(move |k| (self.col_indices[k], self.values[k]))
    }

    #[inline]
    pub(crate) fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        self.row_starts[row]..self.row_starts[row + 1]
    }

    #[inline]
    pub(crate) fn col(&self, edge: usize) -> usize {
        self.col_indices[edge]
    }

    #[inline]
    pub(crate) fn value(&self, edge: usize) -> F {
        self.values[edge]
    }
}
