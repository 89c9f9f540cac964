//! Greedy Randomized Adaptive Search Procedure (GRASP).
//!
//! A multi-start metaheuristic: each iteration builds a solution with a
//! randomized-greedy construction (sampling from a restricted candidate
//! list whose breadth is controlled by `alpha`) and then improves it with
//! local search over insertion, removal and exchange moves. The best
//! feasible local optimum across iterations is returned.
//!
//! Reactive GRASP replaces the fixed `alpha` with a grid of values whose
//! selection probabilities adapt to the quality each value produced.
//!
//! # References
//!
//! - Feo & Resende (1995), "Greedy Randomized Adaptive Search Procedures"
//! - Prais & Ribeiro (2000), "Reactive GRASP"

mod candidates;
mod config;
mod construction;
mod local_search;
mod reactive;
mod runner;
mod solution;
mod types;

pub use candidates::{restricted_candidates, BestMove, Move, IMPROVEMENT_EPSILON};
pub use config::{AlphaMode, ConstructionStrategy, GraspConfig, LocalSearchStrategy};
pub use construction::construct;
pub use local_search::{local_search, LocalSearchStats};
pub use reactive::{AlphaProbability, ReactiveAlpha};
pub use runner::{GraspResult, GraspRunner, Termination};
pub use solution::Solution;
pub use types::{GraspProblem, Sense};
