//! Linear algebra over generic rings.
//!
//! Every algorithm is written against the [Ring](crate::domains::Ring) trait only, and the
//! composite ones call each other through the method table of the ring kind, so that a ring
//! that overrides, for example, its LU decomposition is picked up by the determinant, the rank,
//! the linear solvers and the recursive algorithms alike.
//!
//! The algorithms operate on [MatrixView](crate::tensors::matrix::MatrixView) windows and are
//! also available as methods on [Matrix](crate::tensors::matrix::Matrix).

pub mod charpoly;
pub mod det;
pub mod fflu;
pub mod lu;
pub mod mul;
pub mod pivot;
pub mod random;
pub mod rank;
pub mod rref;
pub mod solve;
pub mod triangular;
