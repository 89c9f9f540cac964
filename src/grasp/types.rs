//! Core trait for GRASP problems.

use std::fmt::Debug;
use std::hash::Hash;

use super::solution::Solution;

/// Direction of the objective function.
///
/// Every comparison made by the engine (RCL thresholds, local-search
/// acceptance, incumbent replacement, reactive quality scores) reads the
/// sense instead of assuming lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    /// Lower objective values are better.
    #[default]
    Minimize,
    /// Higher objective values are better.
    Maximize,
}

impl Sense {
    /// The worst possible objective value.
    ///
    /// Used as the cost of an empty solution before its first evaluation
    /// and as the sentinel delta of an infeasible move.
    pub fn worst(self) -> f64 {
        match self {
            Sense::Minimize => f64::INFINITY,
            Sense::Maximize => f64::NEG_INFINITY,
        }
    }

    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Sense::Minimize => a < b,
            Sense::Maximize => a > b,
        }
    }

    /// Maps a value (cost or delta) into minimization space.
    ///
    /// After mapping, lower is always better and an infeasible sentinel is
    /// always `+inf`.
    pub fn to_min(self, value: f64) -> f64 {
        match self {
            Sense::Minimize => value,
            Sense::Maximize => -value,
        }
    }
}

/// Defines a GRASP problem: the evaluator plus the candidate-list hooks.
///
/// The evaluator owns the immutable problem data. All deltas are expressed
/// in the problem's own objective space (see [`sense`](Self::sense)); an
/// infeasible move is reported by returning [`Sense::worst`].
///
/// # Examples
///
/// ```ignore
/// struct Knapsackish { values: Vec<f64> }
///
/// impl GraspProblem for Knapsackish {
///     type Element = usize;
///
///     fn sense(&self) -> Sense { Sense::Maximize }
///     fn domain_size(&self) -> usize { self.values.len() }
///     fn objective(&self, sol: &Solution<usize>) -> f64 {
///         sol.iter().map(|&i| self.values[i]).sum()
///     }
///     fn insertion_delta(&self, &i: &usize, sol: &Solution<usize>) -> f64 {
///         if sol.contains(&i) { 0.0 } else { self.values[i] }
///     }
///     // ...
/// }
/// ```
pub trait GraspProblem: Send + Sync {
    /// The decision unit stored in a solution. Compared by value.
    type Element: Clone + Eq + Hash + Debug + Send;

    /// Objective direction.
    fn sense(&self) -> Sense;

    /// Total number of distinct elements.
    fn domain_size(&self) -> usize;

    /// Computes the objective of `solution` from scratch.
    fn objective(&self, solution: &Solution<Self::Element>) -> f64;

    /// Recomputes the objective and caches it on the solution.
    fn evaluate(&self, solution: &mut Solution<Self::Element>) -> f64 {
        let cost = self.objective(solution);
        solution.set_cost(cost);
        cost
    }

    /// Objective change caused by inserting `elem`.
    ///
    /// Returns `0.0` if `elem` is already selected.
    fn insertion_delta(&self, elem: &Self::Element, solution: &Solution<Self::Element>) -> f64;

    /// Objective change caused by removing `elem`.
    ///
    /// Returns `0.0` if `elem` is not selected.
    fn removal_delta(&self, elem: &Self::Element, solution: &Solution<Self::Element>) -> f64;

    /// Objective change caused by inserting `incoming` and removing
    /// `outgoing` in one step.
    fn exchange_delta(
        &self,
        incoming: &Self::Element,
        outgoing: &Self::Element,
        solution: &Solution<Self::Element>,
    ) -> f64;

    /// Checks every problem constraint.
    fn validate(&self, solution: &Solution<Self::Element>) -> bool;

    /// Builds the candidate list: elements currently eligible to enter
    /// `solution`. Must be disjoint from the solution's elements.
    fn candidates(&self, solution: &Solution<Self::Element>) -> Vec<Self::Element>;

    /// Hook run after every commit so problem-specific rules can prune or
    /// rebuild the candidate list. The default keeps it as is.
    fn update_candidates(
        &self,
        _candidates: &mut Vec<Self::Element>,
        _solution: &Solution<Self::Element>,
    ) {
    }
}
