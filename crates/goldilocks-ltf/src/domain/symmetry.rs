//! Chow parameters and symmetry-orbit counting.
//!
//! Every separable candidate is the canonical representative of one class
//! of its self-dualization on n+1 coordinates. The counter reads the
//! class structure off the dual-up Chow vector: coordinates sharing a
//! Chow value are interchangeable, and each equivalence class of
//! coordinates yields one pair of restrictions of the self-dualization.
//! The class of the dualizing coordinate restricts back to the candidate
//! itself and carries the Goldilocks contribution; the remaining classes
//! contribute positive-small relatives. Orbit sizes under the symmetric
//! group come from multiset-permutation counting over the reduced Chow
//! vector rather than from enumerating the orbit.

use crate::domain::function::BooleanFunction;
use crate::domain::order::{bit, low_complement};

/// Per-candidate class counters.
///
/// `gold`/`semi` count functions, the `_sn` variants count classes up to
/// the symmetric-group action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub gold: u64,
    pub gold_sn: u64,
    pub semi: u64,
    pub semi_sn: u64,
}

impl ClassCounts {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// The dual-up Chow vector of `f`: n+1 entries, entry j counting the
/// 1-points of the self-dualization [f, dual(f)] with coordinate j set.
/// Entry n belongs to the dualizing coordinate.
pub fn chow_dual_up(f: &BooleanFunction, n: usize) -> Vec<u64> {
    let tn = 1usize << n;
    debug_assert_eq!(f.len(), tn);
    let mut chow = vec![0u64; n + 1];
    for i in 0..tn {
        if f.get(i) {
            for (j, entry) in chow.iter_mut().enumerate().take(n) {
                *entry += bit(i, j);
            }
        } else {
            let h = low_complement(n + 1, i);
            for (j, entry) in chow.iter_mut().enumerate() {
                *entry += bit(h, j);
            }
        }
    }
    chow
}

/// Orbit-multiplicity counter for one fixed n.
///
/// Holds the factorial table so the per-candidate path does no repeated
/// factorial work.
pub struct SymmetryCounter {
    n: usize,
    tn: usize,
    factorials: Vec<u64>,
}

impl SymmetryCounter {
    pub fn new(n: usize) -> Self {
        let mut factorials = vec![1u64; n + 1];
        for k in 1..=n {
            factorials[k] = factorials[k - 1] * k as u64;
        }
        Self {
            n,
            tn: 1usize << n,
            factorials,
        }
    }

    /// Count the Goldilocks and positive-small classes generated by a
    /// separable candidate. Non-separable candidates contribute nothing;
    /// callers pass only functions the separability tester accepted.
    ///
    /// Exactly one coordinate class of the self-dualization restricts
    /// back to the candidate: the one holding the dualizing coordinate.
    /// The candidate is Goldilocks when it is small, so each separable
    /// small candidate adds one to `gold_sn` and its whole orbit to
    /// `gold`. Every other small restriction, from any coordinate class,
    /// is a positive-small relative and lands in the `semi` counters.
    pub fn count(&self, f: &BooleanFunction) -> ClassCounts {
        let n = self.n;
        let tn = self.tn;
        let dual = f.dual(n);
        // Self-dualization on n+1 variables: f on the x_n = 0 half, the
        // dual on the x_n = 1 half.
        let sd = |idx: usize| {
            if idx < tn {
                f.get(idx)
            } else {
                dual.get(idx - tn)
            }
        };

        let chow = chow_dual_up(f, n);
        let half = (tn / 2) as u64;
        let mut counts = ClassCounts::default();

        // The dualizing coordinate's class. Its x_n = 0 restriction is
        // the candidate itself; the x_n = 1 restriction is the dual.
        let reps = self.orbit_multiplicity(&chow, n);
        if self.is_small(&sd, n, 0) {
            counts.gold += reps;
            counts.gold_sn += 1;
            counts.semi += reps;
            counts.semi_sn += 1;
        }
        if chow[n] != half && self.is_small(&sd, n, tn) {
            counts.semi += reps;
            counts.semi_sn += 1;
        }

        // Remaining coordinate classes, one representative each. Equal
        // Chow values mark interchangeable coordinates, and a value
        // shared with the dualizing coordinate is already covered above.
        for i in 0..n {
            if chow[i] == chow[n] || (i > 0 && chow[i] == chow[i - 1]) {
                continue;
            }

            let reps = self.orbit_multiplicity(&chow, i);
            if chow[i] == half {
                // The two restrictions at this pivot form a dual pair in
                // one class; test either side once.
                if self.is_small(&sd, i, 0) {
                    counts.semi += reps;
                    counts.semi_sn += 1;
                }
            } else {
                if self.is_small(&sd, i, 0) {
                    counts.semi += reps;
                    counts.semi_sn += 1;
                }
                if self.is_small(&sd, i, 1usize << i) {
                    counts.semi += reps;
                    counts.semi_sn += 1;
                }
            }
        }
        counts
    }

    // Smallness of the restriction at the given pivot: no remaining
    // singleton input may force the self-dualization to 1. `offset` is 0
    // for the x_pivot = 0 restriction and 2^pivot for x_pivot = 1.
    fn is_small<F>(&self, sd: &F, pivot: usize, offset: usize) -> bool
    where
        F: Fn(usize) -> bool,
    {
        for j in 0..=self.n {
            if j != pivot && sd((1usize << j) + offset) {
                return false;
            }
        }
        true
    }

    // Size of the S_n orbit of the restriction at the given pivot: n!
    // divided by the factorial of each multiplicity of equal Chow values
    // with the pivot's entry removed.
    fn orbit_multiplicity(&self, chow: &[u64], pivot: usize) -> u64 {
        let n = self.n;
        let mut reduced = Vec::with_capacity(n);
        for (j, &value) in chow.iter().enumerate() {
            if j != pivot {
                reduced.push(value);
            }
        }
        reduced.sort_unstable();

        let mut reps = self.factorials[n];
        let mut run = 1usize;
        for j in 1..n {
            if reduced[j] == reduced[j - 1] {
                run += 1;
            } else {
                reps /= self.factorials[run];
                run = 1;
            }
        }
        reps / self.factorials[run]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function_of(tn: usize, ones: &[usize]) -> BooleanFunction {
        let mut f = BooleanFunction::zeros(tn);
        for &i in ones {
            f.set(i);
        }
        f
    }

    #[test]
    fn test_chow_dual_up_majority() {
        let f = function_of(8, &[3, 5, 6, 7]);
        // Each variable sits in three 1-points of F; the four 0-points
        // each contribute one to three of the coordinates of the dual
        // half; the dualizing coordinate counts one per 0-point.
        assert_eq!(chow_dual_up(&f, 3), vec![6, 6, 6, 4]);
    }

    #[test]
    fn test_chow_dual_up_empty() {
        let f = BooleanFunction::zeros(8);
        assert_eq!(chow_dual_up(&f, 3), vec![4, 4, 4, 8]);
    }

    #[test]
    fn test_majority_counts() {
        // Majority on 3 variables is small and fully symmetric: one
        // Goldilocks class of orbit size 1. The coordinate class shared
        // by the three inputs adds one positive-small relative with
        // orbit size 3.
        let counter = SymmetryCounter::new(3);
        let f = function_of(8, &[3, 5, 6, 7]);
        let counts = counter.count(&f);
        assert_eq!(
            counts,
            ClassCounts {
                gold: 1,
                gold_sn: 1,
                semi: 4,
                semi_sn: 2,
            }
        );
    }

    #[test]
    fn test_empty_function_counts() {
        // The constant-0 candidate is small, so it carries its own
        // Goldilocks class; its dual and the input-coordinate
        // restrictions are dictators, none of which is small.
        let counter = SymmetryCounter::new(3);
        let counts = counter.count(&BooleanFunction::zeros(8));
        assert_eq!(
            counts,
            ClassCounts {
                gold: 1,
                gold_sn: 1,
                semi: 1,
                semi_sn: 1,
            }
        );
    }

    #[test]
    fn test_two_input_conjunction_counts() {
        // F = x2 AND x1 on 3 variables: orbit size 3 under S_3, one
        // Goldilocks class, plus the self-dual coordinate class of the
        // unused input.
        let counter = SymmetryCounter::new(3);
        let f = function_of(8, &[6, 7]);
        let counts = counter.count(&f);
        assert_eq!(
            counts,
            ClassCounts {
                gold: 3,
                gold_sn: 1,
                semi: 4,
                semi_sn: 2,
            }
        );
    }

    #[test]
    fn test_orbit_multiplicity_distinct_values() {
        let counter = SymmetryCounter::new(4);
        // All reduced Chow values distinct: full 4! orbit.
        assert_eq!(counter.orbit_multiplicity(&[1, 2, 3, 4, 9], 4), 24);
        // One run of three equal values: 4!/3!.
        assert_eq!(counter.orbit_multiplicity(&[2, 2, 2, 5, 9], 4), 4);
        // All equal: single representative.
        assert_eq!(counter.orbit_multiplicity(&[7, 7, 7, 7, 9], 4), 1);
        // A value tied with the removed pivot's still counts its run.
        assert_eq!(counter.orbit_multiplicity(&[1, 5, 5, 9, 9], 3), 12);
    }

    #[test]
    fn test_counts_are_zero_default() {
        assert!(ClassCounts::default().is_zero());
    }
}
