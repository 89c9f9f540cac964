//! Local search phase.
//!
//! Three move families are explored around the current solution:
//! insertion (candidate list to solution), removal (solution to candidate
//! list) and exchange (one of each). A move improves iff its
//! minimization-space delta is below `-IMPROVEMENT_EPSILON`. The search
//! stops at a local optimum: a round in which no family yields an
//! improving move.

use super::candidates::{BestMove, Move};
use super::config::LocalSearchStrategy;
use super::solution::Solution;
use super::types::GraspProblem;

/// Counters from one local search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalSearchStats {
    /// Neighborhood scans performed, including the final non-improving one.
    pub rounds: usize,
    /// Moves applied.
    pub moves: usize,
}

/// Improves `solution` in place until it is a local optimum.
pub fn local_search<P: GraspProblem>(
    problem: &P,
    solution: &mut Solution<P::Element>,
    strategy: LocalSearchStrategy,
) -> LocalSearchStats {
    let first_improving = strategy == LocalSearchStrategy::FirstImproving;
    let mut candidates = problem.candidates(solution);
    let mut stats = LocalSearchStats::default();

    loop {
        stats.rounds += 1;
        problem.update_candidates(&mut candidates, solution);

        let best = scan(problem, solution, &candidates, first_improving);
        if !best.is_improving() {
            break;
        }
        let Some(mv) = best.mv else { break };

        apply(problem, solution, &mut candidates, mv);
        stats.moves += 1;
    }

    problem.evaluate(solution);
    tracing::trace!(rounds = stats.rounds, moves = stats.moves, "local search done");
    stats
}

/// Scans the three neighborhoods and returns the best improving move.
///
/// With `first_improving`, each family's scan stops at the first move that
/// beats the best delta recorded so far.
pub fn scan<P: GraspProblem>(
    problem: &P,
    solution: &Solution<P::Element>,
    candidates: &[P::Element],
    first_improving: bool,
) -> BestMove<P::Element> {
    let sense = problem.sense();
    let mut best = BestMove::default();

    for cand in candidates {
        let delta = sense.to_min(problem.insertion_delta(cand, solution));
        if delta < best.threshold() {
            best.offer(Move::Insert(cand.clone()), delta);
            if first_improving {
                break;
            }
        }
    }

    for elem in solution {
        let delta = sense.to_min(problem.removal_delta(elem, solution));
        if delta < best.threshold() {
            best.offer(Move::Remove(elem.clone()), delta);
            if first_improving {
                break;
            }
        }
    }

    'exchange: for cand in candidates {
        for elem in solution {
            let delta = sense.to_min(problem.exchange_delta(cand, elem, solution));
            if delta < best.threshold() {
                best.offer(
                    Move::Exchange {
                        incoming: cand.clone(),
                        outgoing: elem.clone(),
                    },
                    delta,
                );
                if first_improving {
                    break 'exchange;
                }
            }
        }
    }

    best
}

/// Applies `mv`, keeping the candidate list disjoint from the solution,
/// then re-syncs the cached cost with a full evaluation.
fn apply<P: GraspProblem>(
    problem: &P,
    solution: &mut Solution<P::Element>,
    candidates: &mut Vec<P::Element>,
    mv: Move<P::Element>,
) {
    match mv {
        Move::Insert(elem) => {
            candidates.retain(|c| c != &elem);
            solution.insert(elem);
        }
        Move::Remove(elem) => {
            solution.remove(&elem);
            candidates.push(elem);
        }
        Move::Exchange { incoming, outgoing } => {
            solution.remove(&outgoing);
            candidates.retain(|c| c != &incoming);
            solution.insert(incoming);
            candidates.push(outgoing);
        }
    }
    problem.evaluate(solution);
}
