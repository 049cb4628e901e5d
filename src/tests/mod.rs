use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::{Assignment, DenseCost, UNASSIGNED};

mod sparse;

// Comparison tolerance for f64 cost totals built from small integers.
const TOL: f64 = 1e-9;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Minimum assignment cost by exhaustive enumeration of all row-to-column
/// injections. Infinite if no feasible assignment exists. Only sensible for
/// tiny problems; the suites keep `nrows <= 8`.
fn brute_force(nrows: usize, ncols: usize, cost: &dyn Fn(usize, usize) -> f64) -> f64 {
    fn go(
        i: usize,
        nrows: usize,
        ncols: usize,
        used: &mut [bool],
        cost: &dyn Fn(usize, usize) -> f64,
    ) -> f64 {
        if i == nrows {
            return 0.0;
        }
        let mut best = f64::INFINITY;
        for j in 0..ncols {
            if used[j] {
                continue;
            }
            let c = cost(i, j);
            if !c.is_finite() {
                continue;
            }
            used[j] = true;
            let rest = go(i + 1, nrows, ncols, used, cost);
            used[j] = false;
            if c + rest < best {
                best = c + rest;
            }
        }
        best
    }
    go(0, nrows, ncols, &mut vec![false; ncols], cost)
}

/// Random dense matrix with small integer-valued costs.
fn random_dense(rng: &mut ChaCha8Rng, nrows: usize, ncols: usize, max_cost: u32) -> DenseCost<f64> {
    let values = (0..nrows * ncols)
        .map(|_| rng.gen_range(0..max_cost) as f64)
        .collect();
    DenseCost::new(nrows, ncols, values).unwrap()
}

/// Checks the structural and dual-certificate invariants of a solution
/// against the original costs.
fn check_certificate(
    a: &Assignment<f64>,
    nrows: usize,
    ncols: usize,
    cost: &dyn Fn(usize, usize) -> f64,
) {
    assert_eq!(a.row_to_col.len(), nrows);
    assert_eq!(a.col_to_row.len(), ncols);

    // Complete matching with mutually inverse arrays.
    let mut matched_cols = 0;
    for (i, &j) in a.row_to_col.iter().enumerate() {
        assert!(j != UNASSIGNED, "row {i} unmatched");
        assert!(j < ncols, "row {i} matched out of range");
        assert_eq!(a.col_to_row[j], i, "inverse arrays disagree at row {i}");
    }
    for (j, &i) in a.col_to_row.iter().enumerate() {
        if i != UNASSIGNED {
            matched_cols += 1;
            assert_eq!(a.row_to_col[i], j, "column {j} not inverse-consistent");
        }
    }
    assert_eq!(matched_cols, nrows, "matched column count");

    // Total equals the sum of original costs over the matching.
    let total: f64 = a.pairs().map(|(i, j)| cost(i, j)).sum();
    assert!(
        (total - a.cost).abs() <= TOL,
        "reported cost {} != recomputed {total}",
        a.cost
    );

    // Dual feasibility everywhere, tightness on matched pairs.
    for i in 0..nrows {
        for j in 0..ncols {
            let slack = cost(i, j) - a.dualu[i] - a.dualv[j];
            assert!(
                slack >= -TOL,
                "dual infeasible at ({i}, {j}): slack {slack}"
            );
            if a.row_to_col[i] == j {
                assert!(
                    slack.abs() <= TOL,
                    "matched pair ({i}, {j}) not tight: slack {slack}"
                );
            }
        }
    }

    // Cost reconciliation from the duals.
    let dual_total: f64 = a.dualu.iter().sum::<f64>()
        + a.row_to_col.iter().map(|&j| a.dualv[j]).sum::<f64>();
    assert!(
        (dual_total - a.cost).abs() <= TOL,
        "dual total {dual_total} != cost {}",
        a.cost
    );
}
