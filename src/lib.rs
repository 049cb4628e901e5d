//! This package solves the linear sum assignment problem: given an
//! `n`×`m` matrix of real costs (`n <= m`), find the one-to-one mapping of
//! rows to columns that minimizes the total assigned cost.
//!
//! Two solvers are provided, both primal-dual shortest-augmenting-path
//! methods that maintain row and column potentials (`u`, `v`) with
//!
//! ```text
//! cost(i, j) - u[i] - v[j] >= 0
//! ```
//!
//! everywhere and equality on matched pairs, so the returned duals certify
//! optimality of the returned cost.
//!
//! **Dense**
//!    [`solve_dense`] runs the Jonker-Volgenant algorithm on a full
//!    [`DenseCost`] matrix: a column reduction seeds the potentials and a
//!    partial matching, then each remaining row is assigned along a
//!    shortest augmenting path found by a Dijkstra-style scan over all
//!    columns. `O(n^2 m)` worst case.
//!
//! **Sparse**
//!    [`solve_sparse`] runs the same scheme on a compressed row-oriented
//!    [`SparseCost`] structure in which absent entries are unreachable
//!    (infinite cost), using a binary heap sized to the columns actually
//!    reachable from the rows scanned. Structures admitting no complete
//!    matching are reported as [`Error::Infeasible`].
//!
//! Each solve owns its working state exclusively, so independent solves may
//! run in parallel on separate inputs with no locking.

mod cost;
mod dense;
mod error;
mod postproc;
mod sparse;

#[cfg(test)]
mod tests;

pub use cost::*;
pub use dense::*;
pub use error::*;
pub use postproc::*;
pub use sparse::*;
