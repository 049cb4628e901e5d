// Post-solve assembly of the assignment returned to the caller.
//
// Validates that the solvers produced a complete matching with consistent
// inverse arrays, reconciles the total cost against the dual potentials and
// applies the column-primary presentation swap. The checks guard solver
// invariants, not input conditions, so they are debug assertions.

use num_traits::Float;

/// Sentinel index marking an unassigned row or column.
pub const UNASSIGNED: usize = usize::MAX;

/// Options accepted by [`solve_dense`](crate::solve_dense) and
/// [`solve_sparse`](crate::solve_sparse).
#[derive(Default, Debug, Clone, Copy)]
pub struct SolveOptions {
    /// Report the assignment from the column side: the returned
    /// [`Assignment`] is transposed, so `row_to_col` is indexed by the
    /// input's columns. Presentation only; the optimization is identical.
    pub col_primary: bool,
}

/// An optimal assignment together with its cost and dual certificate.
///
/// For a direct solve of an `n`x`m` problem, `row_to_col` has length `n`
/// and every entry is a valid column; `col_to_row` has length `m` with
/// [`UNASSIGNED`] for the `m - n` unmatched columns. The duals satisfy
/// `cost(i, j) - dualu[i] - dualv[j] >= 0` for every pair, with equality on
/// matched pairs, certifying optimality of `cost`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<F> {
    /// Total cost of the matching, summed over the original costs.
    pub cost: F,
    /// Column matched to each row.
    pub row_to_col: Vec<usize>,
    /// Row matched to each column.
    pub col_to_row: Vec<usize>,
    /// Dual potential of each row.
    pub dualu: Vec<F>,
    /// Dual potential of each column.
    pub dualv: Vec<F>,
}

impl<F: Float> Assignment<F> {
    /// Swaps the row and column sides of the assignment.
    pub fn transposed(self) -> Self {
        Self {
            cost: self.cost,
            row_to_col: self.col_to_row,
            col_to_row: self.row_to_col,
            dualu: self.dualv,
            dualv: self.dualu,
        }
    }

    /// Iterates over the matched `(row, column)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row_to_col
            .iter()
            .enumerate()
            .filter(|&(_, &j)| j != UNASSIGNED)
            .map(|(i, &j)| (i, j))
    }
}

// `matched_cost(i, j)` returns the original (unreduced) cost of the matched
// pair; `dualv` is the column potential array as left by the solver.
pub(crate) fn assemble<F: Float>(
    matched_cost: impl Fn(usize, usize) -> F,
    row_to_col: Vec<usize>,
    col_to_row: Vec<usize>,
    dualv: Vec<F>,
    options: &SolveOptions,
) -> Assignment<F> {
    let nrows = row_to_col.len();

    let mut total = F::zero();
    let mut dualu = vec![F::zero(); nrows];
    for (i, &j) in row_to_col.iter().enumerate() {
        debug_assert!(j != UNASSIGNED, "row {i} left unmatched by the solver");
        debug_assert_eq!(col_to_row[j], i, "inverse arrays disagree at row {i}");
        let c = matched_cost(i, j);
        dualu[i] = c - dualv[j];
        total = total + c;
    }
    debug_assert_eq!(
        col_to_row.iter().filter(|&&i| i != UNASSIGNED).count(),
        nrows,
        "matched column count does not equal the row count"
    );

    // Matched reduced costs are zero under complementary slackness, so the
    // total must reconcile with sum(u) + sum(v over matched columns).
    #[cfg(debug_assertions)]
    {
        let dual_total = dualu.iter().fold(F::zero(), |acc, &u| acc + u)
            + row_to_col.iter().fold(F::zero(), |acc, &j| acc + dualv[j]);
        let tol = crate::cost::tie_epsilon(total) * F::from(nrows).unwrap_or_else(F::one);
        debug_assert!(
            (total - dual_total).abs() <= tol,
            "dual reconciliation failed"
        );
    }

    let assignment = Assignment {
        cost: total,
        row_to_col,
        col_to_row,
        dualu,
        dualv,
    };
    if options.col_primary {
        assignment.transposed()
    } else {
        assignment
    }
}
