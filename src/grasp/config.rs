//! GRASP configuration.

use std::time::Duration;

/// How alpha (RCL greediness) is chosen each iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlphaMode {
    /// The same alpha for the whole run, in `[0, 1]`.
    Fixed(f64),

    /// Reactive GRASP: alpha is sampled each iteration from a grid of
    /// `grid_size` equally spaced values in `(0, 1]`, with probabilities
    /// adapted to the solution quality each value produced.
    ///
    /// Reference: Prais & Ribeiro (2000)
    Reactive {
        /// Number of alpha values in the grid.
        grid_size: usize,
    },
}

impl Default for AlphaMode {
    fn default() -> Self {
        AlphaMode::Fixed(0.2)
    }
}

/// Construction phase variant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructionStrategy {
    /// Standard randomized-greedy construction from an empty solution.
    #[default]
    GreedyRandomized,

    /// Pre-insert a `fraction` of the candidate list chosen uniformly at
    /// random (ignoring cost), then continue greedily. Diversifies starting
    /// points on tightly constrained instances.
    RandomPlus {
        /// Fraction of the initial candidate list to seed, in `[0, 1]`.
        fraction: f64,
    },
}

/// Neighborhood exploration strategy for the local search phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LocalSearchStrategy {
    /// Truncate each neighborhood scan at its first improving move.
    #[default]
    FirstImproving,
    /// Evaluate the full neighborhood and apply the single best move.
    BestImproving,
}

/// Configuration for the GRASP algorithm.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_grasp::grasp::{GraspConfig, LocalSearchStrategy};
///
/// let config = GraspConfig::default()
///     .with_reactive(20)
///     .with_max_iterations(500)
///     .with_time_limit(Duration::from_secs(30))
///     .with_local_search(LocalSearchStrategy::BestImproving)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraspConfig {
    /// Fixed alpha or reactive alpha grid.
    pub alpha_mode: AlphaMode,

    /// Number of construct + local search iterations.
    pub max_iterations: usize,

    /// Wall-clock budget. Checked once per iteration, so a run may
    /// overshoot by at most one iteration.
    pub time_limit: Option<Duration>,

    /// Construction variant.
    pub construction: ConstructionStrategy,

    /// Local search variant.
    pub local_search: LocalSearchStrategy,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            alpha_mode: AlphaMode::default(),
            max_iterations: 1000,
            time_limit: None,
            construction: ConstructionStrategy::default(),
            local_search: LocalSearchStrategy::default(),
            seed: None,
        }
    }
}

impl GraspConfig {
    /// Uses a fixed alpha for every iteration.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha_mode = AlphaMode::Fixed(alpha);
        self
    }

    /// Enables reactive alpha selection over `grid_size` values.
    pub fn with_reactive(mut self, grid_size: usize) -> Self {
        self.alpha_mode = AlphaMode::Reactive { grid_size };
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_construction(mut self, construction: ConstructionStrategy) -> Self {
        self.construction = construction;
        self
    }

    /// Shorthand for [`ConstructionStrategy::RandomPlus`].
    pub fn with_random_plus(mut self, fraction: f64) -> Self {
        self.construction = ConstructionStrategy::RandomPlus { fraction };
        self
    }

    pub fn with_local_search(mut self, local_search: LocalSearchStrategy) -> Self {
        self.local_search = local_search;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("max_iterations must be positive".into());
        }
        match self.alpha_mode {
            AlphaMode::Fixed(alpha) => {
                if !(0.0..=1.0).contains(&alpha) {
                    return Err(format!("alpha must be in [0, 1], got {alpha}"));
                }
            }
            AlphaMode::Reactive { grid_size } => {
                if grid_size == 0 {
                    return Err("reactive grid_size must be positive".into());
                }
            }
        }
        if let ConstructionStrategy::RandomPlus { fraction } = self.construction {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(format!(
                    "random-plus fraction must be in [0, 1], got {fraction}"
                ));
            }
        }
        Ok(())
    }
}
