//! Reactive alpha control.
//!
//! Keeps a fixed grid of alpha values, each with a selection probability
//! and running quality statistics. After every iteration the probabilities
//! are re-weighted toward the alphas whose average solution was closest to
//! the incumbent, without ever dropping any alpha to zero.
//!
//! # References
//!
//! Prais, M. & Ribeiro, C. C. (2000). "Reactive GRASP: An Application to a
//! Matrix Decomposition Problem in TDMA Traffic Assignment",
//! *INFORMS Journal on Computing* 12(3), 164-176.

use rand::Rng;

use super::types::Sense;

/// One alpha value with its selection probability and statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlphaProbability {
    pub alpha: f64,
    pub probability: f64,
    /// Times this alpha was chosen.
    pub samples: usize,
    /// Sum of final costs of the iterations that used this alpha.
    pub total: f64,
    /// `total / samples`, or 0 before the first sample.
    pub average: f64,
    /// Distance of `average` from the incumbent as a ratio `>= 1`.
    pub quality: f64,
}

/// Reactive alpha controller.
#[derive(Debug, Clone)]
pub struct ReactiveAlpha {
    entries: Vec<AlphaProbability>,
    sense: Sense,
}

impl ReactiveAlpha {
    /// Creates a grid of `grid_size` alphas `1/n, 2/n, ..., 1` with uniform
    /// probabilities.
    ///
    /// # Panics
    ///
    /// Panics if `grid_size` is zero.
    pub fn new(grid_size: usize, sense: Sense) -> Self {
        assert!(grid_size > 0, "grid_size must be positive");
        let uniform = 1.0 / grid_size as f64;
        let entries = (1..=grid_size)
            .map(|i| AlphaProbability {
                alpha: i as f64 / grid_size as f64,
                probability: uniform,
                samples: 0,
                total: 0.0,
                average: 0.0,
                quality: 0.0,
            })
            .collect();
        Self { entries, sense }
    }

    pub fn entries(&self) -> &[AlphaProbability] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<AlphaProbability> {
        self.entries
    }

    /// Alpha value at grid slot `index`.
    pub fn alpha(&self, index: usize) -> f64 {
        self.entries[index].alpha
    }

    /// Roulette-wheel selection of a grid slot.
    ///
    /// Slots are visited in ascending order of probability; the first slot
    /// whose cumulative probability exceeds a uniform draw is returned.
    pub fn select<R: Rng>(&self, rng: &mut R) -> usize {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.sort_by(|&a, &b| {
            self.entries[a]
                .probability
                .total_cmp(&self.entries[b].probability)
        });

        let draw: f64 = rng.random_range(0.0..1.0);
        let mut acc = 0.0;
        for &i in &order {
            acc += self.entries[i].probability;
            if acc > draw {
                return i;
            }
        }
        // Rounding left the total just under the draw.
        order[order.len() - 1]
    }

    /// Records the final `cost` of an iteration run with slot `index` and
    /// re-weights every sampled alpha against `incumbent`.
    ///
    /// Alphas that were never chosen keep their probability, and so does a
    /// sampled alpha whose quality ratio is undefined (zero, mixed-sign or
    /// non-finite values). The remaining alphas share the rest of the mass
    /// in proportion to `1 - Q / sum(Q)`.
    pub fn record(&mut self, index: usize, cost: f64, incumbent: f64) {
        let entry = &mut self.entries[index];
        entry.samples += 1;
        entry.total += cost;

        let mut rated = Vec::new();
        let mut held_mass = 0.0;
        for (i, e) in self.entries.iter_mut().enumerate() {
            if e.samples == 0 {
                held_mass += e.probability;
                continue;
            }
            e.average = e.total / e.samples as f64;
            match quality_ratio(self.sense, e.average, incumbent) {
                Some(q) => rated.push((i, q)),
                None => {
                    tracing::debug!(
                        alpha = e.alpha,
                        average = e.average,
                        incumbent,
                        "holding alpha probability: undefined quality ratio"
                    );
                    held_mass += e.probability;
                }
            }
        }
        if rated.is_empty() {
            return;
        }

        let weights: Vec<f64> = if rated.len() == 1 {
            vec![1.0]
        } else {
            let q_sum: f64 = rated.iter().map(|&(_, q)| q).sum();
            rated.iter().map(|&(_, q)| 1.0 - q / q_sum).collect()
        };
        let w_sum: f64 = weights.iter().sum();
        if w_sum.is_nan() || w_sum <= 0.0 {
            return;
        }

        let mass = (1.0 - held_mass).max(0.0);
        for (&(i, q), &w) in rated.iter().zip(&weights) {
            let e = &mut self.entries[i];
            e.quality = q;
            e.probability = mass * w / w_sum;
        }
    }
}

/// How far `average` is from `incumbent`, as a ratio `>= 1` when the
/// incumbent is at least as good as the average.
fn quality_ratio(sense: Sense, average: f64, incumbent: f64) -> Option<f64> {
    let ratio = match sense {
        Sense::Maximize => incumbent / average,
        Sense::Minimize => average / incumbent,
    };
    // Both values negative: the ratio runs the other way.
    let q = if incumbent < 0.0 { 1.0 / ratio } else { ratio };
    (q.is_finite() && q > 0.0).then_some(q)
}
