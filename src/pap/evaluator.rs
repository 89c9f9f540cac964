//! PAP evaluator.

use std::borrow::Cow;

use super::instance::PapInstance;
use crate::grasp::{GraspProblem, Sense, Solution};

/// One professor teaching one discipline in a set of periods.
///
/// Periods are kept sorted and distinct so that two assignments covering
/// the same `(p, d, t)` triples compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub professor: usize,
    pub discipline: usize,
    pub periods: Vec<usize>,
}

impl Assignment {
    pub fn new(professor: usize, discipline: usize, mut periods: Vec<usize>) -> Self {
        periods.sort_unstable();
        periods.dedup();
        Self {
            professor,
            discipline,
            periods,
        }
    }

    /// The `(professor, discipline, period)` triples this assignment sets.
    pub fn triples(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.periods
            .iter()
            .map(move |&t| (self.professor, self.discipline, t))
    }
}

/// Professor allocation problem.
///
/// Assigns professors to disciplines and disciplines to periods. The value
/// of an assignment is `|periods| * apd[p][d]` plus an optional bonus per
/// covered discipline. Maximized by default.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pap {
    instance: PapInstance,
    sense: Sense,
    coverage_bonus: f64,
}

impl Pap {
    pub fn new(instance: PapInstance) -> Self {
        Self {
            instance,
            sense: Sense::Maximize,
            coverage_bonus: 0.0,
        }
    }

    /// Sets the objective direction.
    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.sense = sense;
        self
    }

    /// Reward added for every discipline that has a professor.
    pub fn with_coverage_bonus(mut self, bonus: f64) -> Self {
        self.coverage_bonus = bonus;
        self
    }

    pub fn instance(&self) -> &PapInstance {
        &self.instance
    }

    /// Objective contribution of `a`. An assignment outside the instance
    /// contributes nothing; `validate` rejects it.
    fn value(&self, a: &Assignment) -> f64 {
        let dims = self.instance.dimensions();
        if a.professor >= dims.professors || a.discipline >= dims.disciplines {
            return 0.0;
        }
        a.periods.len() as f64 * self.instance.preference(a.professor, a.discipline)
            + self.coverage_bonus
    }

    /// Resource usage of `solution` without `excluding`, or `None` if the
    /// remaining assignments break a constraint.
    fn occupancy(
        &self,
        solution: &Solution<Assignment>,
        excluding: Option<&Assignment>,
    ) -> Option<Occupancy> {
        let mut occ = Occupancy::new(&self.instance);
        for a in solution.iter().filter(|&a| Some(a) != excluding) {
            if !occ.admits(&self.instance, a) {
                return None;
            }
            occ.occupy(a);
        }
        Some(occ)
    }

    /// Whether `a` can join `solution` once `excluding` has left it.
    fn fits(
        &self,
        a: &Assignment,
        solution: &Solution<Assignment>,
        excluding: Option<&Assignment>,
    ) -> bool {
        self.occupancy(solution, excluding)
            .is_some_and(|occ| occ.admits(&self.instance, a))
    }
}

/// Resource usage of a set of assignments.
#[derive(Debug, Clone)]
struct Occupancy {
    periods: usize,
    /// Classes running in each period.
    rooms_used: Vec<usize>,
    /// `P x T`: professor already teaching in the period.
    busy: Vec<bool>,
    /// Periods taught by each professor.
    load: Vec<usize>,
    /// Professor holding each discipline.
    holder: Vec<Option<usize>>,
}

impl Occupancy {
    fn new(instance: &PapInstance) -> Self {
        let dims = instance.dimensions();
        Self {
            periods: dims.periods,
            rooms_used: vec![0; dims.periods],
            busy: vec![false; dims.professors * dims.periods],
            load: vec![0; dims.professors],
            holder: vec![None; dims.disciplines],
        }
    }

    /// Records `a`, which [`admits`](Self::admits) must have accepted.
    fn occupy(&mut self, a: &Assignment) {
        for &t in &a.periods {
            self.rooms_used[t] += 1;
            self.busy[a.professor * self.periods + t] = true;
        }
        self.load[a.professor] += a.periods.len();
        self.holder[a.discipline] = Some(a.professor);
    }

    fn release(&mut self, a: &Assignment) {
        for &t in &a.periods {
            self.rooms_used[t] -= 1;
            self.busy[a.professor * self.periods + t] = false;
        }
        self.load[a.professor] -= a.periods.len();
        self.holder[a.discipline] = None;
    }

    fn is_open(&self, instance: &PapInstance, p: usize, t: usize) -> bool {
        instance.is_available(p, t)
            && !self.busy[p * self.periods + t]
            && self.rooms_used[t] < instance.dimensions().rooms
    }

    fn admits(&self, instance: &PapInstance, a: &Assignment) -> bool {
        let dims = instance.dimensions();
        if a.professor >= dims.professors || a.discipline >= dims.disciplines {
            return false;
        }
        let well_formed = a.periods.windows(2).all(|w| w[0] < w[1])
            && a.periods.last().map_or(true, |&t| t < dims.periods);
        well_formed
            && a.periods.len() == instance.required_periods(a.discipline)
            && self.holder[a.discipline].is_none()
            && self.load[a.professor] + a.periods.len() <= dims.max_load
            && a.periods
                .iter()
                .all(|&t| self.is_open(instance, a.professor, t))
    }

    /// The first `count` periods open to professor `p`, if there are enough.
    fn earliest_periods(&self, instance: &PapInstance, p: usize, count: usize) -> Option<Vec<usize>> {
        let periods: Vec<usize> = (0..self.periods)
            .filter(|&t| self.is_open(instance, p, t))
            .take(count)
            .collect();
        (periods.len() == count).then_some(periods)
    }
}

impl GraspProblem for Pap {
    type Element = Assignment;

    fn sense(&self) -> Sense {
        self.sense
    }

    fn domain_size(&self) -> usize {
        let dims = self.instance.dimensions();
        dims.professors * dims.disciplines
    }

    fn objective(&self, solution: &Solution<Assignment>) -> f64 {
        solution.iter().map(|a| self.value(a)).sum()
    }

    fn insertion_delta(&self, elem: &Assignment, solution: &Solution<Assignment>) -> f64 {
        if solution.contains(elem) {
            return 0.0;
        }
        if !self.fits(elem, solution, None) {
            return self.sense.worst();
        }
        self.value(elem)
    }

    fn removal_delta(&self, elem: &Assignment, solution: &Solution<Assignment>) -> f64 {
        if !solution.contains(elem) {
            return 0.0;
        }
        -self.value(elem)
    }

    fn exchange_delta(
        &self,
        incoming: &Assignment,
        outgoing: &Assignment,
        solution: &Solution<Assignment>,
    ) -> f64 {
        if incoming == outgoing {
            return 0.0;
        }
        if solution.contains(incoming) {
            return self.removal_delta(outgoing, solution);
        }
        if !solution.contains(outgoing) {
            return self.insertion_delta(incoming, solution);
        }
        if !self.fits(incoming, solution, Some(outgoing)) {
            return self.sense.worst();
        }
        // Assignments share no objective term, so there is no cross term.
        self.value(incoming) - self.value(outgoing)
    }

    fn validate(&self, solution: &Solution<Assignment>) -> bool {
        self.occupancy(solution, None).is_some()
    }

    /// For every professor/discipline pair the professor does not already
    /// teach, schedules the discipline in the professor's earliest open
    /// periods as if the discipline's current holder had left. Pairs that
    /// cannot be scheduled are omitted. The list is ordered from the most
    /// to the least preferred pair, and is empty for an infeasible solution.
    fn candidates(&self, solution: &Solution<Assignment>) -> Vec<Assignment> {
        let dims = self.instance.dimensions();
        let Some(base) = self.occupancy(solution, None) else {
            return Vec::new();
        };
        let mut candidates = Vec::new();

        for d in 0..dims.disciplines {
            let required = self.instance.required_periods(d);
            if required == 0 {
                continue;
            }
            let current = solution.iter().find(|a| a.discipline == d);
            let occ = match current {
                Some(a) => {
                    let mut freed = base.clone();
                    freed.release(a);
                    Cow::Owned(freed)
                }
                None => Cow::Borrowed(&base),
            };

            for p in 0..dims.professors {
                if current.is_some_and(|a| a.professor == p) {
                    continue;
                }
                if occ.load[p] + required > dims.max_load {
                    continue;
                }
                if let Some(periods) = occ.earliest_periods(&self.instance, p, required) {
                    candidates.push(Assignment::new(p, d, periods));
                }
            }
        }

        let sense = self.sense;
        candidates.sort_by(|a, b| {
            let pa = sense.to_min(self.instance.preference(a.professor, a.discipline));
            let pb = sense.to_min(self.instance.preference(b.professor, b.discipline));
            pa.total_cmp(&pb)
        });
        candidates
    }

    fn update_candidates(&self, candidates: &mut Vec<Assignment>, solution: &Solution<Assignment>) {
        *candidates = self.candidates(solution);
    }
}
