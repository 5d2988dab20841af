//! Winder dominance order over the Boolean hypercube.
//!
//! Points of {0,1}^n are encoded as integers in [0, 2^n). With the
//! variables assumed ordered by non-increasing weight (coordinate n-1
//! heaviest), point j dominates point i exactly when every prefix sum of
//! j's coordinate bits, taken from the heaviest coordinate downward, is at
//! least i's. The covering edges of this partial order drive both the
//! candidate generator and the boundary-point selection of the
//! separability tester.
//!
//! R. O. Winder. Enumeration of seven-argument threshold functions.
//! IEEE Transactions on Electronic Computers, EC-14(3):315-325, 1965.

use crate::domain::function::BooleanFunction;

/// Coordinate bit k of point x, as an integer.
#[inline]
pub fn bit(x: usize, k: usize) -> u64 {
    ((x >> k) & 1) as u64
}

/// Complement of the low `bits` bits of x, higher bits dropped.
#[inline]
pub fn low_complement(bits: usize, x: usize) -> usize {
    !x & ((1usize << bits) - 1)
}

/// True when j strictly dominates i in the weighted dot-product order.
pub fn dominates(n: usize, i: usize, j: usize) -> bool {
    if i == j {
        return false;
    }
    let mut si = 0u32;
    let mut sj = 0u32;
    for k in (0..n).rev() {
        si += bit(i, k) as u32;
        sj += bit(j, k) as u32;
        if sj < si {
            return false;
        }
    }
    true
}

/// Precomputed covering relations of the dominance order.
///
/// `less[i]` and `great[i]` keep only covering edges: a dominance
/// relation is dropped when it is already implied through an accepted
/// nearer point. Built once at startup and shared read-only afterwards.
pub struct OrderTable {
    n: usize,
    size: usize,
    less: Vec<Vec<u32>>,
    great: Vec<Vec<u32>>,
}

impl OrderTable {
    /// Build the covering tables for n variables.
    pub fn build(n: usize) -> Self {
        let tn = 1usize << n;
        let mut less: Vec<Vec<u32>> = vec![Vec::new(); tn];
        let mut great: Vec<Vec<u32>> = vec![Vec::new(); tn];

        for i in 0..tn {
            for j in i + 1..tn {
                if dominates(n, i, j) {
                    let tightest = great[i].iter().all(|&k| !dominates(n, k as usize, j));
                    if tightest {
                        great[i].push(j as u32);
                    }
                }
            }
            for j in (0..i).rev() {
                if dominates(n, j, i) {
                    let tightest = less[i].iter().all(|&k| !dominates(n, j, k as usize));
                    if tightest {
                        less[i].push(j as u32);
                    }
                }
            }
        }

        Self {
            n,
            size: tn,
            less,
            great,
        }
    }

    /// Number of variables.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of hypercube points (2^n).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Covering predecessors of point i.
    pub fn less(&self, i: usize) -> &[u32] {
        &self.less[i]
    }

    /// Covering successors of point i.
    pub fn great(&self, i: usize) -> &[u32] {
        &self.great[i]
    }

    /// True when i (assumed a 1-point of `f`) is a high boundary point:
    /// no covering predecessor of i is also a 1-point.
    pub fn is_high_boundary(&self, i: usize, f: &BooleanFunction) -> bool {
        self.less[i].iter().all(|&j| !f.get(j as usize))
    }

    /// True when i (assumed a 0-point of `f`) is a low boundary point:
    /// every covering successor of i is a 1-point.
    pub fn is_low_boundary(&self, i: usize, f: &BooleanFunction) -> bool {
        self.great[i].iter().all(|&j| f.get(j as usize))
    }

    /// Per-point exclusion masks for the generator: mask j clears j itself
    /// and every point j dominates, leaving exactly the points that stay
    /// free once j is excluded from a candidate.
    pub fn exclusion_masks(&self) -> Vec<BooleanFunction> {
        (0..self.size)
            .map(|j| {
                let mut mask = BooleanFunction::ones(self.size);
                mask.clear(j);
                for i in 0..self.size {
                    if dominates(self.n, i, j) {
                        mask.clear(i);
                    }
                }
                mask
            })
            .collect()
    }
}
