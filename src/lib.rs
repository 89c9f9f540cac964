//! GRASP metaheuristic engine.
//!
//! Provides a generic Greedy Randomized Adaptive Search Procedure and two
//! problem evaluators built on it:
//!
//! - **GRASP**: randomized-greedy construction over a restricted candidate
//!   list, first- or best-improving local search over insertion, removal
//!   and exchange moves, and fixed or reactive control of the greediness
//!   parameter `alpha`.
//! - **QBF**: maximization or minimization of a quadratic binary function
//!   `x' A x`, with exact incremental move deltas.
//! - **PAP**: the professor allocation problem, assigning professors to
//!   disciplines and disciplines to weekly periods under room, availability
//!   and load limits.
//!
//! # Architecture
//!
//! The engine in [`grasp`] knows nothing about any concrete problem. A
//! problem implements [`grasp::GraspProblem`]: an objective, the three
//! incremental deltas, a feasibility check and the candidate-list hooks.
//! Infeasible moves are reported with the worst value of the objective's
//! [`grasp::Sense`] and never enter a solution.

pub mod error;
pub mod grasp;
pub mod pap;
pub mod qbf;
