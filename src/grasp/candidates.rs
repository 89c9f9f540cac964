//! Candidate list filtering and move bookkeeping.

use super::solution::Solution;
use super::types::GraspProblem;

/// Smallest delta magnitude that counts as an improvement.
///
/// A move improves iff its minimization-space delta is below `-IMPROVEMENT_EPSILON`,
/// so zero-delta moves never cycle.
pub const IMPROVEMENT_EPSILON: f64 = f64::MIN_POSITIVE;

/// A prospective change to a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum Move<E> {
    /// Move an element from the candidate list into the solution.
    Insert(E),
    /// Move an element from the solution back to the candidate list.
    Remove(E),
    /// Both at once.
    Exchange { incoming: E, outgoing: E },
}

/// The best move seen during a neighborhood scan.
///
/// `delta` is in minimization space and starts at `+inf` (no move found).
#[derive(Debug, Clone)]
pub struct BestMove<E> {
    pub mv: Option<Move<E>>,
    pub delta: f64,
}

impl<E> Default for BestMove<E> {
    fn default() -> Self {
        Self {
            mv: None,
            delta: f64::INFINITY,
        }
    }
}

impl<E> BestMove<E> {
    /// Records `mv` if `delta` beats the current best. Returns whether it did.
    pub fn offer(&mut self, mv: Move<E>, delta: f64) -> bool {
        if delta < self.delta {
            self.mv = Some(mv);
            self.delta = delta;
            true
        } else {
            false
        }
    }

    /// Acceptance threshold for the next scan: the recorded delta, capped
    /// at `-IMPROVEMENT_EPSILON`.
    pub fn threshold(&self) -> f64 {
        self.delta.min(-IMPROVEMENT_EPSILON)
    }

    pub fn is_improving(&self) -> bool {
        self.mv.is_some() && self.delta < -IMPROVEMENT_EPSILON
    }
}

/// Builds the restricted candidate list.
///
/// Every candidate's insertion delta is mapped to minimization space;
/// infeasible candidates (non-finite delta) are dropped. With `min` and
/// `max` the extreme deltas, the RCL holds every candidate whose delta is
/// at most `min + alpha * (max - min)`, ties included. `alpha = 0` keeps
/// only the greedy choices, `alpha = 1` keeps every feasible candidate.
pub fn restricted_candidates<P: GraspProblem>(
    problem: &P,
    candidates: &[P::Element],
    solution: &Solution<P::Element>,
    alpha: f64,
) -> Vec<P::Element> {
    let sense = problem.sense();
    let scored: Vec<(usize, f64)> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (i, sense.to_min(problem.insertion_delta(c, solution))))
        .filter(|&(_, delta)| delta.is_finite())
        .collect();

    if scored.is_empty() {
        return Vec::new();
    }

    let (min_cost, max_cost) = scored
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, d)| {
            (lo.min(d), hi.max(d))
        });

    let threshold = if alpha >= 1.0 {
        max_cost
    } else {
        min_cost + alpha * (max_cost - min_cost)
    };

    scored
        .into_iter()
        .filter(|&(_, delta)| delta <= threshold)
        .map(|(i, _)| candidates[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qbf::Qbf;
    use proptest::prelude::*;

    fn diagonal(values: &[f64]) -> Qbf {
        let n = values.len();
        let matrix = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { values[i] } else { 0.0 })
                    .collect()
            })
            .collect();
        Qbf::new(matrix).expect("square matrix")
    }

    #[test]
    fn test_alpha_zero_keeps_all_minimal_ties() {
        let qbf = diagonal(&[3.0, -2.0, 5.0, -2.0, 0.0]);
        let sol = Solution::new(qbf.sense());
        let cl: Vec<usize> = (0..5).collect();

        let rcl = restricted_candidates(&qbf, &cl, &sol, 0.0);
        assert_eq!(rcl, vec![1, 3]);
    }

    #[test]
    fn test_alpha_one_keeps_whole_list() {
        let qbf = diagonal(&[0.1, -0.2, 0.3, 0.7]);
        let sol = Solution::new(qbf.sense());
        let cl: Vec<usize> = (0..4).collect();

        let rcl = restricted_candidates(&qbf, &cl, &sol, 1.0);
        assert_eq!(rcl, cl);
    }

    #[test]
    fn test_intermediate_alpha_threshold() {
        // deltas 0, 10, 20, 30, 40; alpha 0.5 -> threshold 20
        let qbf = diagonal(&[0.0, 10.0, 20.0, 30.0, 40.0]);
        let sol = Solution::new(qbf.sense());
        let cl: Vec<usize> = vec![4, 3, 2, 1, 0];

        let rcl = restricted_candidates(&qbf, &cl, &sol, 0.5);
        assert_eq!(rcl, vec![2, 1, 0]);
    }

    #[test]
    fn test_maximization_prefers_large_deltas() {
        let qbf = diagonal(&[1.0, 9.0, 4.0]).with_sense(crate::grasp::Sense::Maximize);
        let sol = Solution::new(qbf.sense());
        let cl: Vec<usize> = (0..3).collect();

        let rcl = restricted_candidates(&qbf, &cl, &sol, 0.0);
        assert_eq!(rcl, vec![1]);
    }

    #[test]
    fn test_empty_candidate_list() {
        let qbf = diagonal(&[1.0]);
        let sol = Solution::new(qbf.sense());
        assert!(restricted_candidates(&qbf, &[], &sol, 0.5).is_empty());
    }

    #[test]
    fn test_best_move_tracks_minimum() {
        let mut best: BestMove<usize> = BestMove::default();
        assert!(!best.is_improving());
        assert!(best.offer(Move::Insert(1), -1.0));
        assert!(!best.offer(Move::Insert(2), -0.5));
        assert!(best.offer(Move::Remove(3), -2.0));
        assert_eq!(best.mv, Some(Move::Remove(3)));
        assert!(best.is_improving());
        assert_eq!(best.threshold(), -2.0);
    }

    #[test]
    fn test_zero_delta_is_not_improving() {
        let mut best: BestMove<usize> = BestMove::default();
        best.offer(Move::Insert(0), 0.0);
        assert!(!best.is_improving());
    }

    proptest! {
        #[test]
        fn prop_rcl_is_subset_of_cl(
            diag in proptest::collection::vec(-50.0f64..50.0, 1..20),
            alpha in 0.0f64..=1.0,
        ) {
            let qbf = diagonal(&diag);
            let sol = Solution::new(qbf.sense());
            let cl: Vec<usize> = (0..diag.len()).collect();
            let rcl = restricted_candidates(&qbf, &cl, &sol, alpha);
            prop_assert!(!rcl.is_empty());
            for e in &rcl {
                prop_assert!(cl.contains(e));
            }
        }
    }
}
