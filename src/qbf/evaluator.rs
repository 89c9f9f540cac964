//! QBF evaluator.

use crate::error::InstanceError;
use crate::grasp::{GraspProblem, Sense, Solution};

/// Quadratic binary function `f(x) = x' A x` over `n` variables.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawQbf"))]
pub struct Qbf {
    size: usize,
    /// Row-major `size x size` interaction matrix.
    matrix: Vec<f64>,
    sense: Sense,
}

impl Qbf {
    /// Builds a minimizing QBF from a square matrix.
    ///
    /// # Errors
    ///
    /// Fails if the matrix is empty, not square, or holds a non-finite entry.
    pub fn new(matrix: Vec<Vec<f64>>) -> Result<Self, InstanceError> {
        let size = matrix.len();
        if size == 0 {
            return Err(InstanceError::EmptyDimension("matrix size"));
        }
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != size {
                return Err(InstanceError::DimensionMismatch {
                    what: "matrix row",
                    expected: size,
                    actual: row.len(),
                });
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(InstanceError::NonFinite {
                    what: "matrix",
                    row: i,
                    col: j,
                });
            }
        }
        Ok(Self {
            size,
            matrix: matrix.into_iter().flatten().collect(),
            sense: Sense::Minimize,
        })
    }

    /// Sets the objective direction.
    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.sense = sense;
        self
    }

    /// Interaction coefficient `A[i][j]`.
    pub fn coefficient(&self, i: usize, j: usize) -> f64 {
        self.matrix[i * self.size + j]
    }

    /// Selected variables that exist in this function. `validate` rejects
    /// a solution holding any other index.
    fn selected<'a>(&self, solution: &'a Solution<usize>) -> impl Iterator<Item = usize> + 'a {
        let size = self.size;
        solution.iter().copied().filter(move |&i| i < size)
    }

    /// Change of `f` when variable `i` flips from 0 to 1 given the other
    /// selected variables, ignoring whether `i` is already selected.
    fn contribution(&self, i: usize, solution: &Solution<usize>) -> f64 {
        let mut sum = self.coefficient(i, i);
        for j in self.selected(solution) {
            if j != i {
                sum += self.coefficient(i, j) + self.coefficient(j, i);
            }
        }
        sum
    }
}

/// Serialized shape of [`Qbf`], checked by [`Qbf::new`] on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawQbf {
    size: usize,
    matrix: Vec<f64>,
    sense: Sense,
}

#[cfg(feature = "serde")]
impl TryFrom<RawQbf> for Qbf {
    type Error = InstanceError;

    fn try_from(raw: RawQbf) -> Result<Self, Self::Error> {
        if raw.size == 0 {
            return Err(InstanceError::EmptyDimension("matrix size"));
        }
        let cells = raw
            .size
            .checked_mul(raw.size)
            .ok_or(InstanceError::Overflow("matrix"))?;
        if raw.matrix.len() != cells {
            return Err(InstanceError::DimensionMismatch {
                what: "matrix",
                expected: cells,
                actual: raw.matrix.len(),
            });
        }
        let rows = raw.matrix.chunks(raw.size).map(<[f64]>::to_vec).collect();
        Ok(Qbf::new(rows)?.with_sense(raw.sense))
    }
}

impl GraspProblem for Qbf {
    type Element = usize;

    fn sense(&self) -> Sense {
        self.sense
    }

    fn domain_size(&self) -> usize {
        self.size
    }

    fn objective(&self, solution: &Solution<usize>) -> f64 {
        let mut sum = 0.0;
        for i in self.selected(solution) {
            for j in self.selected(solution) {
                sum += self.coefficient(i, j);
            }
        }
        sum
    }

    fn insertion_delta(&self, &elem: &usize, solution: &Solution<usize>) -> f64 {
        if elem >= self.size {
            return self.sense.worst();
        }
        if solution.contains(&elem) {
            return 0.0;
        }
        self.contribution(elem, solution)
    }

    fn removal_delta(&self, &elem: &usize, solution: &Solution<usize>) -> f64 {
        if elem >= self.size || !solution.contains(&elem) {
            return 0.0;
        }
        -self.contribution(elem, solution)
    }

    fn exchange_delta(&self, &incoming: &usize, &outgoing: &usize, solution: &Solution<usize>) -> f64 {
        if incoming == outgoing {
            return 0.0;
        }
        if solution.contains(&incoming) {
            return self.removal_delta(&outgoing, solution);
        }
        if outgoing >= self.size || !solution.contains(&outgoing) {
            return self.insertion_delta(&incoming, solution);
        }
        if incoming >= self.size {
            return self.sense.worst();
        }

        self.contribution(incoming, solution)
            - self.contribution(outgoing, solution)
            - (self.coefficient(incoming, outgoing) + self.coefficient(outgoing, incoming))
    }

    fn validate(&self, solution: &Solution<usize>) -> bool {
        solution.iter().all(|&i| i < self.size)
    }

    fn candidates(&self, solution: &Solution<usize>) -> Vec<usize> {
        (0..self.size).filter(|i| !solution.contains(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Qbf {
        Qbf::new(vec![
            vec![-1.0, 2.0, 0.0],
            vec![0.0, -3.0, 1.0],
            vec![4.0, -2.0, 5.0],
        ])
        .expect("valid matrix")
    }

    fn solution_of(elems: &[usize]) -> Solution<usize> {
        let mut sol = Solution::new(Sense::Minimize);
        for &e in elems {
            sol.insert(e);
        }
        sol
    }

    #[test]
    fn test_objective_is_quadratic_form() {
        let qbf = sample();
        // x = (1, 1, 0): -1 + 2 + 0 - 3 = -2
        assert_eq!(qbf.objective(&solution_of(&[0, 1])), -2.0);
        // x = (1, 1, 1): sum of all entries = 6
        assert_eq!(qbf.objective(&solution_of(&[0, 1, 2])), 6.0);
        assert_eq!(qbf.objective(&solution_of(&[])), 0.0);
    }

    #[test]
    fn test_evaluate_caches_cost() {
        let qbf = sample();
        let mut sol = solution_of(&[1]);
        assert_eq!(sol.cost(), f64::INFINITY);
        assert_eq!(qbf.evaluate(&mut sol), -3.0);
        assert_eq!(sol.cost(), -3.0);
    }

    #[test]
    fn test_insertion_of_selected_is_zero() {
        let qbf = sample();
        let sol = solution_of(&[0, 2]);
        assert_eq!(qbf.insertion_delta(&2, &sol), 0.0);
        assert_eq!(qbf.removal_delta(&1, &sol), 0.0);
    }

    #[test]
    fn test_exchange_includes_cross_term() {
        let qbf = sample();
        let sol = solution_of(&[0, 1]);
        let delta = qbf.exchange_delta(&2, &1, &sol);
        let after = qbf.objective(&solution_of(&[0, 2]));
        let before = qbf.objective(&sol);
        assert!((delta - (after - before)).abs() < 1e-12);
    }

    #[test]
    fn test_exchange_degenerates() {
        let qbf = sample();
        let sol = solution_of(&[0]);
        // incoming already selected -> pure removal of outgoing
        assert_eq!(qbf.exchange_delta(&0, &0, &sol), 0.0);
        assert_eq!(
            qbf.exchange_delta(&0, &0, &solution_of(&[1])),
            0.0
        );
        // outgoing not selected -> pure insertion of incoming
        assert_eq!(
            qbf.exchange_delta(&1, &2, &sol),
            qbf.insertion_delta(&1, &sol)
        );
    }

    #[test]
    fn test_out_of_range_is_infeasible() {
        let qbf = sample();
        let sol = solution_of(&[]);
        assert_eq!(qbf.insertion_delta(&7, &sol), f64::INFINITY);
        assert!(!qbf.validate(&solution_of(&[0, 9])));
        assert!(qbf.validate(&solution_of(&[0, 2])));
    }

    #[test]
    fn test_stray_index_contributes_nothing() {
        let qbf = sample();
        let sol = solution_of(&[0, 9, 1]);
        assert!(!qbf.validate(&sol));
        assert_eq!(qbf.objective(&sol), -2.0);
        assert_eq!(qbf.removal_delta(&9, &sol), 0.0);
        assert_eq!(qbf.insertion_delta(&2, &sol), qbf.insertion_delta(&2, &solution_of(&[0, 1])));
        assert_eq!(qbf.exchange_delta(&2, &9, &sol), qbf.insertion_delta(&2, &sol));
    }

    #[test]
    fn test_candidates_are_complement() {
        let qbf = sample();
        assert_eq!(qbf.candidates(&solution_of(&[1])), vec![0, 2]);
        assert_eq!(qbf.domain_size(), 3);
    }

    #[test]
    fn test_new_rejects_bad_matrices() {
        assert!(matches!(
            Qbf::new(vec![]),
            Err(InstanceError::EmptyDimension(_))
        ));
        assert!(matches!(
            Qbf::new(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(InstanceError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            Qbf::new(vec![vec![f64::NAN]]),
            Err(InstanceError::NonFinite { row: 0, col: 0, .. })
        ));
    }

    #[test]
    fn test_many_empty_rows_rejected_cheaply() {
        assert!(matches!(
            Qbf::new(vec![Vec::new(); 100_000]),
            Err(InstanceError::DimensionMismatch {
                expected: 100_000,
                actual: 0,
                ..
            })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates() {
        let qbf = sample().with_sense(Sense::Maximize);
        let json = serde_json::to_string(&qbf).expect("serialize");
        let back: Qbf = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.sense(), Sense::Maximize);
        assert_eq!(back.coefficient(2, 1), -2.0);

        let short = r#"{"size":3,"matrix":[0.0],"sense":"Minimize"}"#;
        assert!(serde_json::from_str::<Qbf>(short).is_err());
        let empty = r#"{"size":0,"matrix":[],"sense":"Minimize"}"#;
        assert!(serde_json::from_str::<Qbf>(empty).is_err());
        let huge = format!(r#"{{"size":{},"matrix":[],"sense":"Minimize"}}"#, usize::MAX);
        assert!(serde_json::from_str::<Qbf>(&huge).is_err());
    }

    #[test]
    fn test_maximize_keeps_raw_deltas() {
        let qbf = sample().with_sense(Sense::Maximize);
        let sol = solution_of(&[0]);
        assert_eq!(qbf.insertion_delta(&1, &sol), -3.0 + 2.0 + 0.0);
        assert_eq!(qbf.insertion_delta(&9, &sol), f64::NEG_INFINITY);
    }

    fn matrix_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (2usize..8).prop_flat_map(|n| {
            proptest::collection::vec(proptest::collection::vec(-10i32..10, n), n)
                .prop_map(|rows| {
                    rows.into_iter()
                        .map(|r| r.into_iter().map(f64::from).collect())
                        .collect()
                })
        })
    }

    proptest! {
        #[test]
        fn prop_incremental_matches_full_recompute(
            matrix in matrix_strategy(),
            ops in proptest::collection::vec((0u8..3, 0usize..8, 0usize..8), 1..40),
        ) {
            let qbf = Qbf::new(matrix).expect("square");
            let n = qbf.domain_size();
            let mut sol = Solution::new(Sense::Minimize);
            let mut running = qbf.evaluate(&mut sol);

            for (kind, a, b) in ops {
                let (a, b) = (a % n, b % n);
                match kind {
                    0 => {
                        running += qbf.insertion_delta(&a, &sol);
                        sol.insert(a);
                    }
                    1 => {
                        running += qbf.removal_delta(&a, &sol);
                        sol.remove(&a);
                    }
                    _ => {
                        running += qbf.exchange_delta(&a, &b, &sol);
                        if a != b && !sol.contains(&a) && sol.contains(&b) {
                            sol.remove(&b);
                            sol.insert(a);
                        } else if a != b && sol.contains(&a) {
                            sol.remove(&b);
                        } else if a != b {
                            sol.insert(a);
                        }
                    }
                }
                let full = qbf.evaluate(&mut sol);
                prop_assert!((running - full).abs() < 1e-9, "running {} vs full {}", running, full);
            }
        }

        #[test]
        fn prop_insertion_is_inverse_of_removal(
            matrix in matrix_strategy(),
            picks in proptest::collection::vec(0usize..8, 0..8),
            elem in 0usize..8,
        ) {
            let qbf = Qbf::new(matrix).expect("square");
            let n = qbf.domain_size();
            let elem = elem % n;
            let mut sol = Solution::new(Sense::Minimize);
            for p in picks {
                if p % n != elem {
                    sol.insert(p % n);
                }
            }
            let ins = qbf.insertion_delta(&elem, &sol);
            sol.insert(elem);
            let rem = qbf.removal_delta(&elem, &sol);
            prop_assert!((ins + rem).abs() < 1e-9);
        }

        #[test]
        fn prop_self_exchange_is_zero(
            matrix in matrix_strategy(),
            picks in proptest::collection::vec(0usize..8, 0..8),
            elem in 0usize..8,
        ) {
            let qbf = Qbf::new(matrix).expect("square");
            let n = qbf.domain_size();
            let mut sol = Solution::new(Sense::Minimize);
            for p in picks {
                sol.insert(p % n);
            }
            prop_assert_eq!(qbf.exchange_delta(&(elem % n), &(elem % n), &sol), 0.0);
        }
    }
}
