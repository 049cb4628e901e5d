use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::tests::{brute_force, check_certificate, init, random_dense, TOL};
use crate::{solve_sparse, Error, SolveOptions, SparseCost};

// Random sparse structure: every row reaches a random non-empty subset of
// columns with small integer costs.
fn random_sparse(rng: &mut ChaCha8Rng, nrows: usize, ncols: usize, max_cost: u32) -> SparseCost<f64> {
    let mut entries = Vec::new();
    let mut cols: Vec<usize> = (0..ncols).collect();
    for i in 0..nrows {
        let degree = rng.gen_range(1..=ncols);
        cols.shuffle(rng);
        for &j in cols.iter().take(degree) {
            entries.push((i, j, rng.gen_range(0..max_cost) as f64));
        }
    }
    SparseCost::from_entries(nrows, ncols, &entries).unwrap()
}

// Dense view of a sparse structure with absent pairs at infinity.
fn sparse_lookup(cost: &SparseCost<f64>) -> impl Fn(usize, usize) -> f64 + '_ {
    |i, j| {
        cost.row_entries(i)
            .find(|&(c, _)| c == j)
            .map_or(f64::INFINITY, |(_, v)| v)
    }
}

#[test]
fn test_diagonal() {
    let cost =
        SparseCost::<f64>::from_entries(3, 3, &[(0, 0, 2.0), (1, 1, 3.0), (2, 2, 4.0)]).unwrap();
    let a = solve_sparse(&cost, &SolveOptions::default()).unwrap();
    assert!((a.cost - 9.0).abs() <= TOL);
    assert_eq!(a.row_to_col, vec![0, 1, 2]);
}

#[test]
fn test_zero_degree_row_is_infeasible() {
    // Row 1 has no reachable column at all.
    let cost = SparseCost::new(
        3,
        3,
        vec![0, 2, 2, 4],
        vec![0, 1, 1, 2],
        vec![1.0, 2.0, 3.0, 4.0],
    )
    .unwrap();
    assert_eq!(
        solve_sparse(&cost, &SolveOptions::default()).unwrap_err(),
        Error::Infeasible { row: 1 }
    );
}

#[test]
fn test_structural_infeasibility() {
    // Two rows contending for the single reachable column.
    let cost = SparseCost::from_entries(2, 2, &[(0, 0, 1.0), (1, 0, 5.0)]).unwrap();
    let err = solve_sparse(&cost, &SolveOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Infeasible { .. }));
    assert!(!err.is_invalid_input());
}

#[test]
fn test_matches_dense_on_full_structures() {
    init();
    let mut rng = ChaCha8Rng::seed_from_u64(41);
    for n in 1..=8 {
        for _ in 0..25 {
            let dense = random_dense(&mut rng, n, n, 25);
            let sparse = SparseCost::from_dense(&dense);
            let a = crate::solve_dense(&dense, &SolveOptions::default()).unwrap();
            let b = solve_sparse(&sparse, &SolveOptions::default()).unwrap();
            assert!(
                (a.cost - b.cost).abs() <= TOL,
                "{n}x{n}: dense {} != sparse {}",
                a.cost,
                b.cost
            );
        }
    }
}

#[test]
fn test_brute_force_sparse() {
    init();
    let mut rng = ChaCha8Rng::seed_from_u64(59);
    for n in 1..=7 {
        for m in n..=8 {
            for _ in 0..25 {
                let cost = random_sparse(&mut rng, n, m, 12);
                let lookup = sparse_lookup(&cost);
                let expect = brute_force(n, m, &lookup);
                match solve_sparse(&cost, &SolveOptions::default()) {
                    Ok(a) => {
                        check_certificate(&a, n, m, &lookup);
                        assert!(
                            (a.cost - expect).abs() <= TOL,
                            "{n}x{m}: cost {} != brute force {expect}",
                            a.cost
                        );
                    }
                    Err(Error::Infeasible { .. }) => {
                        assert!(
                            expect.is_infinite(),
                            "{n}x{m}: solver infeasible but enumeration found {expect}"
                        );
                    }
                    Err(other) => panic!("unexpected error {other:?}"),
                }
            }
        }
    }
}

#[test]
fn test_determinism() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let cost = random_sparse(&mut rng, 6, 7, 4);
    let a = solve_sparse(&cost, &SolveOptions::default());
    let b = solve_sparse(&cost, &SolveOptions::default());
    match (a, b) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a.cost, b.cost);
            assert_eq!(a.row_to_col, b.row_to_col);
        }
        (Err(a), Err(b)) => assert_eq!(a, b),
        other => panic!("solves disagreed: {other:?}"),
    }
}

#[test]
fn test_malformed_structures() {
    assert_eq!(
        SparseCost::<f64>::new(0, 1, vec![0], vec![], vec![]).unwrap_err(),
        Error::EmptyProblem
    );
    assert_eq!(
        SparseCost::<f64>::new(2, 1, vec![0, 1, 2], vec![0, 0], vec![1.0, 2.0]).unwrap_err(),
        Error::ShapeMismatch { nrows: 2, ncols: 1 }
    );
    assert_eq!(
        SparseCost::<f64>::new(2, 2, vec![0, 1], vec![0], vec![1.0]).unwrap_err(),
        Error::RowStartsLength {
            expected: 3,
            got: 2
        }
    );
    assert_eq!(
        SparseCost::<f64>::new(2, 2, vec![1, 1, 2], vec![0, 1], vec![1.0, 2.0]).unwrap_err(),
        Error::InvalidRowStarts { index: 0 }
    );
    assert_eq!(
        SparseCost::<f64>::new(2, 2, vec![0, 2, 1], vec![0, 1], vec![1.0, 2.0]).unwrap_err(),
        Error::InvalidRowStarts { index: 2 }
    );
    assert_eq!(
        SparseCost::<f64>::new(2, 2, vec![0, 1, 3], vec![0, 1], vec![1.0, 2.0]).unwrap_err(),
        Error::EdgeCountMismatch {
            expected: 3,
            got: 2
        }
    );
    assert_eq!(
        SparseCost::<f64>::new(2, 2, vec![0, 1, 2], vec![0, 5], vec![1.0, 2.0]).unwrap_err(),
        Error::ColumnOutOfRange {
            row: 1,
            col: 5,
            ncols: 2
        }
    );
    assert_eq!(
        SparseCost::<f64>::new(1, 2, vec![0, 2], vec![1, 1], vec![1.0, 2.0]).unwrap_err(),
        Error::DuplicateColumn { row: 0, col: 1 }
    );
    assert_eq!(
        SparseCost::<f64>::new(1, 1, vec![0, 1], vec![0], vec![f64::INFINITY]).unwrap_err(),
        Error::NonFiniteCost { row: 0, col: 0 }
    );
    assert_eq!(
        SparseCost::from_entries(2, 2, &[(3, 0, 1.0)]).unwrap_err(),
        Error::RowOutOfRange { row: 3, nrows: 2 }
    );
}

#[test]
fn test_col_primary_presentation() {
    let cost = SparseCost::from_entries(
        2,
        3,
        &[(0, 0, 1.0), (0, 2, 4.0), (1, 1, 2.0), (1, 2, 6.0)],
    )
    .unwrap();
    let row_side = solve_sparse(&cost, &SolveOptions::default()).unwrap();
    let col_side = solve_sparse(&cost, &SolveOptions { col_primary: true }).unwrap();
    assert_eq!(col_side.cost, row_side.cost);
    assert_eq!(col_side.row_to_col, row_side.col_to_row);
    assert_eq!(col_side.col_to_row, row_side.row_to_col);
}

#[test]
fn test_wide_single_row() {
    let cost = SparseCost::<f64>::from_entries(1, 5, &[(0, 3, 2.5), (0, 1, 4.0)]).unwrap();
    let a = solve_sparse(&cost, &SolveOptions::default()).unwrap();
    assert!((a.cost - 2.5).abs() <= TOL);
    assert_eq!(a.row_to_col, vec![3]);
}
