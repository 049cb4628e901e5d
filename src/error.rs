//! Error types for the assignment solvers.

use thiserror::Error;

/// Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by cost-model construction and by the solvers.
///
/// Every variant except [`Error::Infeasible`] describes malformed input and
/// is detected before any optimization work begins. `Infeasible` is a
/// terminal solve outcome: the cost structure admits no complete matching.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// More rows than columns. Problems are solved over the smaller (row)
    /// dimension; callers wanting the other orientation should transpose.
    #[error("cost matrix has {nrows} rows but only {ncols} columns; rows must not exceed columns")]
    ShapeMismatch {
        /// Number of rows supplied.
        nrows: usize,
        /// Number of columns supplied.
        ncols: usize,
    },

    /// A zero-sized dimension.
    #[error("cost matrix must have at least one row and one column")]
    EmptyProblem,

    /// NaN or negative infinity in a dense cost, or any non-finite stored
    /// cost in a sparse structure.
    #[error("disallowed non-finite cost at ({row}, {col})")]
    NonFiniteCost {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
    },

    /// Row offsets out of order, or not starting at zero.
    #[error("row offsets are not monotonically non-decreasing at index {index}")]
    InvalidRowStarts {
        /// Index of the first offending offset.
        index: usize,
    },

    /// Offset array has the wrong length for the declared row count.
    #[error("expected {expected} row offsets, got {got}")]
    RowStartsLength {
        /// Required length (`nrows + 1`).
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// Column index and cost arrays disagree with the declared edge count.
    #[error("expected {expected} edge entries, got {got}")]
    EdgeCountMismatch {
        /// Edge count implied by the structure.
        expected: usize,
        /// Number of entries supplied.
        got: usize,
    },

    /// A row index at or beyond the declared row count.
    #[error("row index {row} out of range for {nrows} rows")]
    RowOutOfRange {
        /// The offending row index.
        row: usize,
        /// Number of rows declared.
        nrows: usize,
    },

    /// A column index at or beyond the declared column count.
    #[error("column index {col} in row {row} out of range for {ncols} columns")]
    ColumnOutOfRange {
        /// Row the entry belongs to.
        row: usize,
        /// The offending column index.
        col: usize,
        /// Number of columns declared.
        ncols: usize,
    },

    /// The same column listed twice within one row.
    #[error("column {col} appears more than once in row {row}")]
    DuplicateColumn {
        /// Row containing the duplicate.
        row: usize,
        /// The duplicated column index.
        col: usize,
    },

    /// No complete matching exists on the given cost structure.
    #[error("no complete matching exists: row {row} cannot reach an unassigned column")]
    Infeasible {
        /// The row whose augmenting search was exhausted.
        row: usize,
    },
}

impl Error {
    /// `true` for every variant describing malformed input, `false` for the
    /// structural [`Error::Infeasible`] outcome.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Error::Infeasible { .. })
    }
}
