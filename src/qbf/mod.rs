//! Quadratic Binary Function (QBF).
//!
//! The index formulation of a binary assignment problem: `n` binary
//! variables, an interaction matrix `A`, and the objective
//! `f(x) = x' A x`. A solution is the set of indices whose variable is 1.
//!
//! Insertion, removal and exchange deltas touch one row and one column of
//! `A` only, so a move is priced in `O(|S|)` instead of `O(n^2)`.

mod evaluator;

pub use evaluator::Qbf;
