// Sparse assignment solver on a compressed row-oriented cost structure.
//
// The same primal-dual shortest-augmenting-path scheme as the dense solver,
// restricted to the stored edges: the search from an unassigned row keeps a
// binary heap of reachable columns keyed by their tentative distance, so the
// work per row is proportional to the degrees of the rows it scans rather
// than to the full column count. A row that exhausts its reachable columns
// without finding an unassigned one makes the problem infeasible.

use log::{debug, trace};
use num_traits::Float;
use std::fmt::Debug;

use crate::cost::{tie_epsilon, SparseCost};
use crate::error::{Error, Result};
use crate::postproc::{assemble, Assignment, SolveOptions, UNASSIGNED};

// Heap position marker for a column already scanned in this search.
const SCANNED: usize = usize::MAX;

/// Solves the linear sum assignment problem on a sparse cost structure.
///
/// Pairs without a stored entry are unreachable. Fails with
/// [`Error::Infeasible`] when some row has no stored entries at all, or when
/// the bipartite reachability graph admits no matching covering every row.
pub fn solve_sparse<F: Float + Debug>(
    cost: &SparseCost<F>,
    options: &SolveOptions,
) -> Result<Assignment<F>> {
    let n = cost.nrows();
    let m = cost.ncols();
    debug!(
        "solving sparse {n}x{m} assignment problem with {} edges",
        cost.edge_count()
    );

    // A row with no reachable column can never be matched.
    for i in 0..n {
        if cost.degree(i) == 0 {
            return Err(Error::Infeasible { row: i });
        }
    }

    let mut v = vec![F::zero(); m];
    // matched_edge[i] is the index of row i's matched entry, giving O(1)
    // access to both the matched column and its original cost.
    let mut matched_edge = vec![UNASSIGNED; n];
    let mut col_to_row = vec![UNASSIGNED; m];
    // Column reduction assumes every column ends up matched, so rectangular
    // solves keep zero potentials and rely on the augmenting loop alone.
    if n == m {
        column_reduction(cost, &mut v, &mut matched_edge, &mut col_to_row);
    }

    // Working arrays owned by this call and reused across augmentations:
    // d[j] is the tentative distance to column j, pr[i]/out[i] encode the
    // predecessor row and entering edge for rows on the path tree, q is the
    // heap of reachable columns with pos[] as its position inverse, and
    // done lists the scanned columns awaiting the dual update.
    let mut d = vec![F::infinity(); m];
    let mut pr = vec![UNASSIGNED; n];
    let mut out = vec![UNASSIGNED; n];
    let mut q = Vec::with_capacity(m);
    let mut pos = vec![0usize; m];
    let mut done = Vec::with_capacity(m);

    for f in 0..n {
        if matched_edge[f] != UNASSIGNED {
            continue;
        }
        augment(
            cost,
            f,
            &mut v,
            &mut matched_edge,
            &mut col_to_row,
            &mut d,
            &mut pr,
            &mut out,
            &mut q,
            &mut pos,
            &mut done,
        )?;
    }

    let row_to_col: Vec<usize> = matched_edge.iter().map(|&k| cost.col(k)).collect();
    Ok(assemble(
        |i, _| cost.value(matched_edge[i]),
        row_to_col,
        col_to_row,
        v,
        options,
    ))
}

// Column reduction over the stored entries: v[j] becomes the smallest cost
// in column j, and rows attaining a unique minimum claim the column.
// Unreachable columns keep a zero dual.
fn column_reduction<F: Float>(
    cost: &SparseCost<F>,
    v: &mut [F],
    matched_edge: &mut [usize],
    col_to_row: &mut [usize],
) {
    let n = cost.nrows();
    let m = cost.ncols();

    let mut min_edge = vec![UNASSIGNED; m];
    let mut min_row = vec![UNASSIGNED; m];
    v.fill(F::infinity());
    for i in 0..n {
        for k in cost.row_range(i) {
            let j = cost.col(k);
            if cost.value(k) < v[j] {
                v[j] = cost.value(k);
                min_edge[j] = k;
                min_row[j] = i;
            }
        }
    }

    // Count how many rows tie for each column minimum.
    let mut ties = vec![0usize; m];
    for i in 0..n {
        for k in cost.row_range(i) {
            let j = cost.col(k);
            if cost.value(k) - v[j] <= tie_epsilon(v[j]) {
                ties[j] += 1;
            }
        }
    }

    for j in 0..m {
        if min_edge[j] == UNASSIGNED {
            v[j] = F::zero();
            continue;
        }
        let i = min_row[j];
        if ties[j] == 1 && matched_edge[i] == UNASSIGNED {
            matched_edge[i] = min_edge[j];
            col_to_row[j] = i;
        }
    }
}

// One shortest augmenting path from unassigned row `f`. Tracks csp, the
// cost of the best path to an unassigned column found so far, and its final
// edge; the heap only keeps columns that might still beat it.
#[allow(clippy::too_many_arguments)]
fn augment<F: Float + Debug>(
    cost: &SparseCost<F>,
    f: usize,
    v: &mut [F],
    matched_edge: &mut [usize],
    col_to_row: &mut [usize],
    d: &mut [F],
    pr: &mut [usize],
    out: &mut [usize],
    q: &mut Vec<usize>,
    pos: &mut [usize],
    done: &mut Vec<usize>,
) -> Result<()> {
    let mut csp = F::infinity();
    let mut ksp = UNASSIGNED; // edge closing the best path
    let mut rsp = UNASSIGNED; // row that edge is scanned from
    pr[f] = UNASSIGNED;

    // Scan the root row.
    for k in cost.row_range(f) {
        let j = cost.col(k);
        let dnew = cost.value(k) - v[j];
        if dnew >= csp {
            continue;
        }
        if col_to_row[j] == UNASSIGNED {
            csp = dnew;
            ksp = k;
            rsp = f;
        } else if dnew < d[j] {
            d[j] = dnew;
            let i = col_to_row[j];
            pr[i] = f;
            out[i] = k;
            heap_update(j, q, d, pos);
        }
    }

    // Dijkstra over reduced costs: pop the closest column, scan the row it
    // is matched to, relax that row's other entries.
    while let Some(&top) = q.first() {
        if d[top] >= csp {
            break;
        }
        let j0 = heap_pop(q, d, pos);
        pos[j0] = SCANNED;
        done.push(j0);

        let r0 = col_to_row[j0];
        let h = cost.value(matched_edge[r0]) - v[j0] - d[j0];
        for k in cost.row_range(r0) {
            let j = cost.col(k);
            if pos[j] == SCANNED {
                continue;
            }
            let dnew = cost.value(k) - v[j] - h;
            if dnew >= csp {
                continue;
            }
            if col_to_row[j] == UNASSIGNED {
                csp = dnew;
                ksp = k;
                rsp = r0;
            } else if dnew < d[j] {
                d[j] = dnew;
                let i = col_to_row[j];
                pr[i] = r0;
                out[i] = k;
                heap_update(j, q, d, pos);
            }
        }
    }

    if !csp.is_finite() {
        return Err(Error::Infeasible { row: f });
    }

    // Scanned columns lie on shortest paths below csp; shift their duals so
    // matched reduced costs stay zero after the reassignment.
    for &j in done.iter() {
        v[j] = v[j] + (d[j] - csp);
    }

    // Reverse the path: each row on it takes the edge it was reached by,
    // handing its old column to its predecessor.
    let mut r = rsp;
    let mut k = ksp;
    loop {
        matched_edge[r] = k;
        col_to_row[cost.col(k)] = r;
        if r == f {
            break;
        }
        k = out[r];
        r = pr[r];
    }

    // Reset the scratch state touched by this search.
    for &j in done.iter() {
        d[j] = F::infinity();
        pos[j] = 0;
    }
    done.clear();
    for &j in q.iter() {
        d[j] = F::infinity();
        pos[j] = 0;
    }
    q.clear();

    trace!("augmented row {f} at path cost {csp:?}");
    Ok(())
}

// Binary heap of columns keyed by d[], with pos[] holding each column's
// 1-based heap position (0 = absent). Insert or move a column towards the
// root after its key decreased.
fn heap_update<F: Float>(j: usize, q: &mut Vec<usize>, d: &[F], pos: &mut [usize]) {
    let mut p = pos[j];
    if p == 0 {
        q.push(j);
        p = q.len();
    }
    while p > 1 {
        let parent = p / 2;
        let jp = q[parent - 1];
        if d[jp] <= d[j] {
            break;
        }
        q[p - 1] = jp;
        pos[jp] = p;
        p = parent;
    }
    q[p - 1] = j;
    pos[j] = p;
}

// Remove and return the root of the heap.
fn heap_pop<F: Float>(q: &mut Vec<usize>, d: &[F], pos: &mut [usize]) -> usize {
    let root = q[0];
    pos[root] = 0;
    let last = q[q.len() - 1];
    q.truncate(q.len() - 1);
    if q.is_empty() {
        return root;
    }

    // Sift the displaced last element down from the root.
    let mut p = 1;
    loop {
        let mut child = 2 * p;
        if child > q.len() {
            break;
        }
        if child < q.len() && d[q[child]] < d[q[child - 1]] {
            child += 1;
        }
        let jc = q[child - 1];
        if d[last] <= d[jc] {
            break;
        }
        q[p - 1] = jc;
        pos[jc] = p;
        p = child;
    }
    q[p - 1] = last;
    pos[last] = p;
    root
}
