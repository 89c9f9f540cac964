//! GRASP execution loop.
//!
//! # Algorithm
//!
//! 1. Pick alpha (fixed, or sampled from the reactive grid)
//! 2. Build a solution with the randomized-greedy construction
//! 3. Improve it with local search until a local optimum
//! 4. Replace the incumbent if the result is feasible and strictly better
//! 5. In reactive mode, feed the result back into the alpha probabilities
//! 6. Repeat until the iteration budget, the deadline, or cancellation
//!
//! The deadline and cancellation flag are checked once at the top of each
//! iteration; a started iteration always runs to completion.
//!
//! # References
//!
//! Feo, T. A. & Resende, M. G. C. (1995). "Greedy Randomized Adaptive
//! Search Procedures", *Journal of Global Optimization* 6, 109-133.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use u_numflow::random::create_rng;

use super::config::{AlphaMode, GraspConfig};
use super::construction::construct;
use super::local_search::local_search;
use super::reactive::{AlphaProbability, ReactiveAlpha};
use super::solution::Solution;
use super::types::{GraspProblem, Sense};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// All `max_iterations` iterations ran.
    IterationBudget,
    /// The wall-clock time limit elapsed.
    Deadline,
    /// The external cancellation flag was set.
    Cancelled,
}

/// Result of a GRASP run.
#[derive(Debug, Clone)]
pub struct GraspResult<E> {
    /// The best feasible solution found (empty if none was).
    pub best: Solution<E>,

    /// Cost of the best solution.
    pub best_cost: f64,

    /// Wall-clock time of the run.
    pub elapsed: Duration,

    /// Completed construct + local search iterations.
    pub iterations: usize,

    /// Iteration at which the best solution was found.
    pub best_iteration: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// Incumbent cost after each iteration.
    pub cost_history: Vec<f64>,

    /// Alpha used by each iteration.
    pub alpha_history: Vec<f64>,

    /// Final reactive alpha statistics (empty for a fixed alpha).
    pub alpha_probabilities: Vec<AlphaProbability>,
}

/// Source of each iteration's alpha.
enum AlphaSource {
    Fixed(f64),
    Reactive(ReactiveAlpha),
}

impl AlphaSource {
    fn new(mode: AlphaMode, sense: Sense) -> Self {
        match mode {
            AlphaMode::Fixed(alpha) => AlphaSource::Fixed(alpha),
            AlphaMode::Reactive { grid_size } => {
                AlphaSource::Reactive(ReactiveAlpha::new(grid_size, sense))
            }
        }
    }

    /// Returns the alpha to use and, in reactive mode, its grid slot.
    fn next<R: Rng>(&self, rng: &mut R) -> (f64, Option<usize>) {
        match self {
            AlphaSource::Fixed(alpha) => (*alpha, None),
            AlphaSource::Reactive(controller) => {
                let slot = controller.select(rng);
                (controller.alpha(slot), Some(slot))
            }
        }
    }

    fn record(&mut self, slot: Option<usize>, cost: f64, incumbent: f64) {
        if let (AlphaSource::Reactive(controller), Some(slot)) = (self, slot) {
            controller.record(slot, cost, incumbent);
        }
    }

    fn into_probabilities(self) -> Vec<AlphaProbability> {
        match self {
            AlphaSource::Fixed(_) => Vec::new(),
            AlphaSource::Reactive(controller) => controller.into_entries(),
        }
    }
}

/// Executes the GRASP algorithm.
pub struct GraspRunner;

impl GraspRunner {
    /// Runs GRASP optimization.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_grasp::grasp::{GraspConfig, GraspRunner};
    /// use u_grasp::qbf::Qbf;
    ///
    /// let qbf = Qbf::new(vec![
    ///     vec![-2.0, 3.0, 0.0],
    ///     vec![3.0, -1.0, 1.0],
    ///     vec![0.0, 1.0, -3.0],
    /// ])
    /// .unwrap();
    ///
    /// let config = GraspConfig::default()
    ///     .with_alpha(0.3)
    ///     .with_max_iterations(20)
    ///     .with_seed(42);
    /// let result = GraspRunner::run(&qbf, &config);
    /// assert!(result.best_cost <= -5.0);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`GraspConfig::validate`].
    pub fn run<P: GraspProblem>(problem: &P, config: &GraspConfig) -> GraspResult<P::Element> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs GRASP with an optional cancellation token.
    pub fn run_with_cancel<P: GraspProblem>(
        problem: &P,
        config: &GraspConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GraspResult<P::Element> {
        config.validate().expect("invalid GraspConfig");

        let start = Instant::now();
        let deadline = config.time_limit.map(|limit| start + limit);

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let sense = problem.sense();
        let mut alphas = AlphaSource::new(config.alpha_mode, sense);

        let mut best: Option<Solution<P::Element>> = None;
        let mut best_cost = sense.worst();
        let mut best_iteration = 0;
        let mut iterations = 0;
        let mut termination = Termination::IterationBudget;

        let mut cost_history = Vec::with_capacity(config.max_iterations);
        let mut alpha_history = Vec::with_capacity(config.max_iterations);

        for iteration in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    termination = Termination::Cancelled;
                    break;
                }
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                termination = Termination::Deadline;
                break;
            }

            let (alpha, slot) = alphas.next(&mut rng);

            let mut solution = construct(problem, alpha, config.construction, &mut rng);
            local_search(problem, &mut solution, config.local_search);
            let cost = solution.cost();

            if !problem.validate(&solution) {
                tracing::warn!(iteration, cost, "discarding infeasible solution");
            } else if best.is_none() || sense.is_better(cost, best_cost) {
                tracing::debug!(iteration, alpha, cost, "new incumbent");
                best_cost = cost;
                best_iteration = iteration;
                best = Some(solution);
            }

            alphas.record(slot, cost, best_cost);
            cost_history.push(best_cost);
            alpha_history.push(alpha);
            iterations += 1;
        }

        let best = best.unwrap_or_else(|| {
            let mut empty = Solution::new(sense);
            problem.evaluate(&mut empty);
            empty
        });
        let best_cost = best.cost();
        let elapsed = start.elapsed();

        tracing::info!(
            ?termination,
            iterations,
            best_cost,
            elapsed_ms = elapsed.as_millis() as u64,
            "GRASP finished"
        );

        GraspResult {
            best,
            best_cost,
            elapsed,
            iterations,
            best_iteration,
            termination,
            cost_history,
            alpha_history,
            alpha_probabilities: alphas.into_probabilities(),
        }
    }
}
