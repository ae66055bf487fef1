//! Matrix-to-edge-list unrolling.
//!
//! # Algorithm
//!
//! Walk the matrix row by row in index order and emit one edge per
//! off-diagonal cell:
//!
//! ```text
//! for i in ids, for j in ids, i != j  =>  (i, j, M[i][j])
//! ```
//!
//! Both `(i, j)` and `(j, i)` are emitted. Output length is `n² - n`.
//!
//! # Complexity
//!
//! O(n²) time, one allocation of exactly `n² - n` edges.

use tracing::{debug, instrument};

use super::DistanceMatrix;
use crate::models::Edge;

/// Unrolls a distance matrix into an edge list in row-major order.
///
/// Self-pairs are skipped; every other ordered pair appears once. With the
/// `parallel` feature, rows are unrolled on the rayon pool and concatenated
/// in row order, so the output is identical either way.
///
/// Unrolling is a right inverse of [`DistanceMatrix::from_edges`] only when
/// the source table held one edge per unordered pair; accumulated sums are
/// not split back into their parts.
///
/// # Examples
///
/// ```
/// use u_toll::models::Edge;
/// use u_toll::distance::{DistanceMatrix, unroll_distance_matrix};
///
/// let dm = DistanceMatrix::from_edges(&[
///     Edge::new(1, 2, 4.0).unwrap(),
///     Edge::new(2, 3, 6.0).unwrap(),
/// ]);
/// let edges = unroll_distance_matrix(&dm);
/// assert_eq!(edges.len(), 6);
/// assert_eq!((edges[0].id_start(), edges[0].id_end(), edges[0].distance()), (1, 2, 4.0));
/// assert_eq!((edges[1].id_start(), edges[1].id_end(), edges[1].distance()), (1, 3, 0.0));
/// assert_eq!((edges[2].id_start(), edges[2].id_end(), edges[2].distance()), (2, 1, 4.0));
/// ```
#[instrument(level = "debug", skip(matrix), fields(size = matrix.size()))]
pub fn unroll_distance_matrix(matrix: &DistanceMatrix) -> Vec<Edge> {
    let edges = unroll_rows(matrix);
    debug!(edges = edges.len(), "unrolled distance matrix");
    edges
}

fn row_edges(matrix: &DistanceMatrix, i: usize) -> impl Iterator<Item = Edge> + '_ {
    let ids = matrix.ids();
    let from = ids[i];
    matrix
        .row(i)
        .iter()
        .zip(ids)
        .filter(move |&(_, &to)| to != from)
        .map(move |(&d, &to)| Edge::from_matrix_cell(from, to, d))
}

#[cfg(not(feature = "parallel"))]
fn unroll_rows(matrix: &DistanceMatrix) -> Vec<Edge> {
    let n = matrix.size();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1));
    for i in 0..n {
        edges.extend(row_edges(matrix, i));
    }
    edges
}

#[cfg(feature = "parallel")]
fn unroll_rows(matrix: &DistanceMatrix) -> Vec<Edge> {
    use rayon::prelude::*;

    let n = matrix.size();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1));
    edges.par_extend(
        (0..n)
            .into_par_iter()
            .flat_map_iter(|i| row_edges(matrix, i)),
    );
    edges
}
