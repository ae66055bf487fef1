//! Distance matrices over toll locations.
//!
//! Builds a dense symmetric matrix from an edge list and unrolls a matrix
//! back into edge-list form.

mod matrix;
mod unroll;

pub use matrix::DistanceMatrix;
pub use unroll::unroll_distance_matrix;
