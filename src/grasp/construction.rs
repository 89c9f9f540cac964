//! Construction phase.
//!
//! Builds a solution from empty by repeatedly sampling one element
//! uniformly from the restricted candidate list. The loop stops when the
//! RCL is empty, when the candidate list is exhausted, or as soon as a
//! commit fails to strictly improve the objective.

use rand::Rng;

use super::candidates::restricted_candidates;
use super::config::ConstructionStrategy;
use super::solution::Solution;
use super::types::GraspProblem;

/// Runs one construction with the given greediness `alpha`.
pub fn construct<P: GraspProblem, R: Rng>(
    problem: &P,
    alpha: f64,
    strategy: ConstructionStrategy,
    rng: &mut R,
) -> Solution<P::Element> {
    let sense = problem.sense();
    let mut solution = Solution::new(sense);
    let mut candidates = problem.candidates(&solution);

    if let ConstructionStrategy::RandomPlus { fraction } = strategy {
        seed_randomly(problem, &mut solution, &mut candidates, fraction, rng);
    }

    let mut previous = sense.worst();
    loop {
        let cost = problem.evaluate(&mut solution);
        if !sense.is_better(cost, previous) || candidates.is_empty() {
            break;
        }
        previous = cost;

        let rcl = restricted_candidates(problem, &candidates, &solution, alpha);
        if rcl.is_empty() {
            break;
        }

        let chosen = rcl[rng.random_range(0..rcl.len())].clone();
        candidates.retain(|c| c != &chosen);
        solution.insert(chosen);
        problem.update_candidates(&mut candidates, &solution);
    }

    solution
}

/// Inserts `floor(fraction * |CL|)` feasible candidates picked uniformly at
/// random, ignoring their cost.
fn seed_randomly<P: GraspProblem, R: Rng>(
    problem: &P,
    solution: &mut Solution<P::Element>,
    candidates: &mut Vec<P::Element>,
    fraction: f64,
    rng: &mut R,
) {
    let target = (fraction * candidates.len() as f64).floor() as usize;

    for _ in 0..target {
        let feasible: Vec<usize> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| problem.insertion_delta(c, solution).is_finite())
            .map(|(i, _)| i)
            .collect();
        if feasible.is_empty() {
            break;
        }

        let chosen = candidates.remove(feasible[rng.random_range(0..feasible.len())]);
        solution.insert(chosen);
        problem.update_candidates(candidates, solution);
    }

    problem.evaluate(solution);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grasp::Sense;
    use crate::qbf::Qbf;
    use u_numflow::random::create_rng;

    fn diagonal(values: &[f64]) -> Qbf {
        let n = values.len();
        Qbf::new(
            (0..n)
                .map(|i| (0..n).map(|j| if i == j { values[i] } else { 0.0 }).collect())
                .collect(),
        )
        .expect("square matrix")
    }

    #[test]
    fn test_greedy_takes_improving_elements_in_order() {
        // Greedy picks -3, then -1, then the only remaining candidate (+2)
        // which worsens the objective and stops the loop.
        let qbf = diagonal(&[-3.0, -1.0, 2.0]);
        let mut rng = create_rng(42);

        let sol = construct(&qbf, 0.0, ConstructionStrategy::GreedyRandomized, &mut rng);

        assert_eq!(sol.elements(), &[0, 1, 2]);
        assert_eq!(sol.cost(), qbf.objective(&sol));
    }

    #[test]
    fn test_stops_when_no_commit_improves() {
        let qbf = diagonal(&[1.0, 2.0, 3.0]);
        let mut rng = create_rng(42);

        let sol = construct(&qbf, 0.0, ConstructionStrategy::GreedyRandomized, &mut rng);

        // The first commit (+1) does not improve on the empty solution (0).
        assert_eq!(sol.elements(), &[0]);
        assert_eq!(sol.cost(), 1.0);
    }

    #[test]
    fn test_maximization_construction() {
        let qbf = diagonal(&[4.0, -1.0, 6.0]).with_sense(Sense::Maximize);
        let mut rng = create_rng(7);

        let sol = construct(&qbf, 0.0, ConstructionStrategy::GreedyRandomized, &mut rng);

        assert_eq!(&sol.elements()[..2], &[2, 0]);
        assert_eq!(qbf.objective(&sol), sol.cost());
    }

    #[test]
    fn test_random_plus_seeds_fraction() {
        let qbf = diagonal(&[5.0; 10]);
        let mut rng = create_rng(3);

        let sol = construct(
            &qbf,
            0.0,
            ConstructionStrategy::RandomPlus { fraction: 0.5 },
            &mut rng,
        );

        // Five random seeds, then one greedy commit that does not improve.
        assert_eq!(sol.len(), 6);
        assert_eq!(sol.cost(), 30.0);
    }

    #[test]
    fn test_random_plus_is_seed_deterministic() {
        let qbf = diagonal(&[1.0, -2.0, 3.0, -4.0, 5.0, -6.0, 7.0, -8.0]);
        let strategy = ConstructionStrategy::RandomPlus { fraction: 0.4 };

        let a = construct(&qbf, 0.3, strategy, &mut create_rng(11));
        let b = construct(&qbf, 0.3, strategy, &mut create_rng(11));
        assert_eq!(a.elements(), b.elements());
    }

    #[test]
    fn test_cost_matches_full_evaluation() {
        let qbf = Qbf::new(vec![
            vec![-2.0, 1.0, -1.0, 0.5],
            vec![1.0, -3.0, 2.0, 0.0],
            vec![-1.0, 2.0, -1.0, -1.0],
            vec![0.5, 0.0, -1.0, -4.0],
        ])
        .expect("square matrix");

        for seed in 0..10 {
            let mut rng = create_rng(seed);
            let sol = construct(&qbf, 0.5, ConstructionStrategy::GreedyRandomized, &mut rng);
            assert!((sol.cost() - qbf.objective(&sol)).abs() < 1e-12);
        }
    }
}
