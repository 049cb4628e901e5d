// Dense Jonker-Volgenant solver.
//
// A primal-dual shortest-augmenting-path method: a column reduction seeds
// the dual potentials and a partial matching, then each remaining row is
// assigned by a Dijkstra-style search over reduced costs. Columns move
// through three regions of the `cols` scratch array: ready (fully scanned),
// the batch at the current minimum distance, and todo.

use log::{debug, trace};
use num_traits::Float;
use std::fmt::Debug;
use std::mem;

use crate::cost::{tie_epsilon, DenseCost};
use crate::error::{Error, Result};
use crate::postproc::{assemble, Assignment, SolveOptions, UNASSIGNED};

/// Solves the linear sum assignment problem on a dense cost matrix.
///
/// Returns the minimum-cost matching of every row to a distinct column,
/// together with the dual potentials certifying it. Entries of `+infinity`
/// mark forbidden pairings; if they leave some row without a reachable
/// unassigned column the solve fails with [`Error::Infeasible`], which
/// cannot happen for an all-finite matrix.
pub fn solve_dense<F: Float + Debug>(
    cost: &DenseCost<F>,
    options: &SolveOptions,
) -> Result<Assignment<F>> {
    let n = cost.nrows();
    let m = cost.ncols();
    debug!("solving dense {n}x{m} assignment problem");

    let mut v = vec![F::zero(); m];
    let mut row_to_col = vec![UNASSIGNED; n];
    let mut col_to_row = vec![UNASSIGNED; m];
    // Column reduction assumes every column ends up matched, so rectangular
    // solves keep zero potentials and rely on the augmenting loop alone.
    if n == m {
        column_reduction(cost, &mut v, &mut row_to_col, &mut col_to_row);
    }

    // Working arrays owned by this call and reused across augmentations.
    let mut d = vec![F::infinity(); m];
    let mut pred = vec![0usize; m];
    let mut cols: Vec<usize> = (0..m).collect();

    for f in 0..n {
        if row_to_col[f] != UNASSIGNED {
            continue;
        }
        augment(
            cost,
            f,
            &mut v,
            &mut row_to_col,
            &mut col_to_row,
            &mut d,
            &mut pred,
            &mut cols,
        )?;
    }

    Ok(assemble(
        |i, j| cost.at(i, j),
        row_to_col,
        col_to_row,
        v,
        options,
    ))
}

// Column reduction: v[j] becomes the minimum cost in column j, and a row
// attaining that minimum uniquely claims the column outright (so its
// implicit dual u is zero). The epsilon guards only the tie test.
fn column_reduction<F: Float>(
    cost: &DenseCost<F>,
    v: &mut [F],
    row_to_col: &mut [usize],
    col_to_row: &mut [usize],
) {
    let n = cost.nrows();
    let m = cost.ncols();
    for j in 0..m {
        let mut imin = 0;
        let mut vmin = cost.at(0, j);
        for i in 1..n {
            let c = cost.at(i, j);
            if c < vmin {
                vmin = c;
                imin = i;
            }
        }
        if !vmin.is_finite() {
            // Unreachable column; keep its dual at zero.
            continue;
        }
        v[j] = vmin;

        if row_to_col[imin] != UNASSIGNED {
            continue;
        }
        let eps = tie_epsilon(vmin);
        let unique = (0..n).all(|i| i == imin || cost.at(i, j) - vmin > eps);
        if unique {
            row_to_col[imin] = j;
            col_to_row[j] = imin;
        }
    }
}

// One shortest augmenting path from unassigned row `f`, followed by the
// dual update over ready columns and the reversal of the path.
#[allow(clippy::too_many_arguments)]
fn augment<F: Float + Debug>(
    cost: &DenseCost<F>,
    f: usize,
    v: &mut [F],
    row_to_col: &mut [usize],
    col_to_row: &mut [usize],
    d: &mut [F],
    pred: &mut [usize],
    cols: &mut [usize],
) -> Result<()> {
    let m = cost.ncols();
    let free_row = cost.row(f);
    for j in 0..m {
        cols[j] = j;
        d[j] = free_row[j] - v[j];
        pred[j] = f;
    }

    // cols[..low] ready, cols[low..up] at the current minimum, cols[up..] todo.
    let mut low = 0;
    let mut up = 0;
    let mut n_ready = 0;
    let mut mind = F::zero();

    let sink = 'search: loop {
        if low == up {
            n_ready = low;
            // Find the next distance plateau among the todo columns.
            mind = F::infinity();
            for &j in cols[up..].iter() {
                if d[j] < mind {
                    mind = d[j];
                }
            }
            if !mind.is_finite() {
                return Err(Error::Infeasible { row: f });
            }
            let mut k = up;
            while k < m {
                let j = cols[k];
                if d[j] <= mind {
                    cols[k] = cols[up];
                    cols[up] = j;
                    up += 1;
                }
                k += 1;
            }
            for &j in cols[low..up].iter() {
                if col_to_row[j] == UNASSIGNED {
                    break 'search j;
                }
            }
        }

        // Scan the cheapest ready column; relax todo columns through the
        // row it is matched to.
        let j0 = cols[low];
        low += 1;
        let i = col_to_row[j0];
        let row = cost.row(i);
        let h = row[j0] - v[j0] - mind;
        let mut k = up;
        while k < m {
            let j = cols[k];
            let dnew = row[j] - v[j] - h;
            if dnew < d[j] {
                d[j] = dnew;
                pred[j] = i;
                if dnew == mind {
                    if col_to_row[j] == UNASSIGNED {
                        break 'search j;
                    }
                    cols[k] = cols[up];
                    cols[up] = j;
                    up += 1;
                }
            }
            k += 1;
        }
    };

    // Decrease the duals of ready columns by their slack to the path cost;
    // columns in the final batch sit exactly at `mind` and need no change.
    for &j in cols[..n_ready].iter() {
        v[j] = v[j] + (d[j] - mind);
    }

    // Reverse the augmenting path back to `f`.
    let mut j = sink;
    loop {
        let i = pred[j];
        col_to_row[j] = i;
        mem::swap(&mut row_to_col[i], &mut j);
        if i == f {
            break;
        }
    }
    trace!("augmented row {f} at path cost {mind:?}");
    Ok(())
}
