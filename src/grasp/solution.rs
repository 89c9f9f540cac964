//! Solution container shared by construction, local search and the driver.

use std::collections::HashSet;
use std::hash::Hash;

use super::types::Sense;

/// An insertion-ordered set of elements with a cached objective value.
///
/// Membership is answered by a hash index kept beside the ordered list.
///
/// The cached cost is only refreshed by [`GraspProblem::evaluate`]; the
/// engine calls it after every mutation so the cache never diverges from a
/// from-scratch recomputation.
///
/// [`GraspProblem::evaluate`]: super::GraspProblem::evaluate
#[derive(Debug, Clone)]
pub struct Solution<E> {
    elements: Vec<E>,
    index: HashSet<E>,
    cost: f64,
}

impl<E: PartialEq> PartialEq for Solution<E> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements && self.cost == other.cost
    }
}

impl<E: Clone + Eq + Hash> Solution<E> {
    /// Creates an empty solution whose cost is the sense's worst value.
    pub fn new(sense: Sense) -> Self {
        Self {
            elements: Vec::new(),
            index: HashSet::new(),
            cost: sense.worst(),
        }
    }

    /// Cached objective value.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Overwrites the cached objective value.
    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }

    /// Appends `elem`. Returns `false` (and leaves the solution unchanged)
    /// if it is already present.
    pub fn insert(&mut self, elem: E) -> bool {
        if !self.index.insert(elem.clone()) {
            return false;
        }
        self.elements.push(elem);
        true
    }

    /// Removes `elem`, preserving the order of the remaining elements.
    pub fn remove(&mut self, elem: &E) -> bool {
        if !self.index.remove(elem) {
            return false;
        }
        if let Some(pos) = self.elements.iter().position(|e| e == elem) {
            self.elements.remove(pos);
        }
        true
    }

    pub fn contains(&self, elem: &E) -> bool {
        self.index.contains(elem)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.elements.iter()
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[E] {
        &self.elements
    }
}

impl<'a, E> IntoIterator for &'a Solution<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_solution_has_sentinel_cost() {
        let sol: Solution<usize> = Solution::new(Sense::Minimize);
        assert!(sol.is_empty());
        assert_eq!(sol.cost(), f64::INFINITY);

        let sol: Solution<usize> = Solution::new(Sense::Maximize);
        assert_eq!(sol.cost(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut sol = Solution::new(Sense::Minimize);
        assert!(sol.insert(3usize));
        assert!(sol.insert(1));
        assert!(!sol.insert(3));
        assert_eq!(sol.elements(), &[3, 1]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut sol = Solution::new(Sense::Minimize);
        for e in [4usize, 2, 7, 5] {
            sol.insert(e);
        }
        assert!(sol.remove(&2));
        assert!(!sol.remove(&2));
        assert_eq!(sol.elements(), &[4, 7, 5]);
        assert!(!sol.contains(&2));
    }

    #[test]
    fn test_index_tracks_elements() {
        let mut sol = Solution::new(Sense::Minimize);
        for e in 0usize..100 {
            sol.insert(e * 3);
        }
        for e in (0usize..100).step_by(2) {
            assert!(sol.remove(&(e * 3)));
        }
        assert_eq!(sol.len(), 50);
        assert!(sol.contains(&3));
        assert!(!sol.contains(&0));
        assert!(!sol.contains(&4));
        assert!(sol.insert(0));
        assert_eq!(sol.elements().last(), Some(&0));
        assert!(sol.iter().all(|e| sol.contains(e)));
    }

    #[test]
    fn test_equality_ignores_index_layout() {
        let mut a = Solution::new(Sense::Minimize);
        let mut b = Solution::new(Sense::Minimize);
        for e in [1usize, 2, 3] {
            a.insert(e);
            b.insert(e);
        }
        b.insert(9);
        b.remove(&9);
        assert_eq!(a, b);
    }
}
