//! Linear separability testing via a dual-simplex feasibility search.
//!
//! A candidate function is a threshold function exactly when the linear
//! system built from its boundary points admits a solution: one inequality
//! per high-boundary 1-point and per low-boundary 0-point, over n+2
//! unknowns (an objective slot, a threshold, and one weight per variable).
//! Only boundary constraints are assembled; interior points are dominated
//! by them in the induced cone.
//!
//! The solver works on a column tableau and breaks pivot ties by taking
//! the lexicographically smallest ratio column, which rules out cycling on
//! degenerate vertices.

use crate::domain::function::BooleanFunction;
use crate::domain::order::{OrderTable, bit};

/// Tolerance for pivot-entry comparisons against zero.
const EPSILON: f64 = 1e-9;

/// Test a candidate for linear separability.
pub fn is_separable(f: &BooleanFunction, order: &OrderTable) -> bool {
    separate(f, order).is_some()
}

/// Test a candidate for linear separability, returning the solution vector
/// on success.
///
/// The returned vector has n+2 entries: the objective value, the threshold
/// `t`, then one weight per variable in coordinate order. A witness
/// classifies point x as a 1-point when the weighted sum of its
/// coordinates reaches `t`, and as a 0-point when it stays at or below
/// `t - 1`.
pub fn separate(f: &BooleanFunction, order: &OrderTable) -> Option<Vec<f64>> {
    let n = order.n();
    let tn = order.size();

    let mut constraints: Vec<Vec<f64>> = Vec::new();
    for i in 0..tn {
        if f.get(i) {
            if order.is_high_boundary(i, f) {
                let mut row = Vec::with_capacity(n + 2);
                row.push(0.0);
                row.push(-1.0);
                for j in 0..n {
                    row.push(bit(i, j) as f64);
                }
                constraints.push(row);
            }
        } else if order.is_low_boundary(i, f) {
            let mut row = Vec::with_capacity(n + 2);
            row.push(-1.0);
            row.push(1.0);
            for j in 0..n {
                row.push(-(bit(i, j) as f64));
            }
            constraints.push(row);
        }
    }

    let q = n + 2;
    let p = constraints.len() + n - 1;
    let mut mat = vec![vec![0.0f64; q]; p + q];

    // Objective row.
    for j in 1..q {
        mat[0][j] = 1.0;
    }
    // Boundary constraints.
    for (r, row) in constraints.iter().enumerate() {
        mat[r + 1].clone_from(row);
    }
    // Weight ordering: the dominance order assumes non-decreasing weights
    // by coordinate index.
    for (r, col) in (constraints.len() + 1..=p).zip(2..) {
        mat[r][col] = -1.0;
        mat[r][col + 1] = 1.0;
    }
    // Tracking rows, one per unknown, so the solution can be read off the
    // value column at the end.
    for (r, col) in (p + 1..p + q).zip(1..) {
        mat[r][col] = 1.0;
    }

    dual_simplex(&mut mat, p, q)
}

fn lex_less(a: &[f64], b: &[f64]) -> bool {
    for (x, y) in a.iter().zip(b.iter()) {
        if x < y {
            return true;
        }
        if x > y {
            return false;
        }
    }
    false
}

/// Dual-simplex feasibility search on a column tableau of `p + q` rows by
/// `q` columns. Returns the solution vector when the system is feasible.
fn dual_simplex(mat: &mut [Vec<f64>], p: usize, q: usize) -> Option<Vec<f64>> {
    let rows = p + q;
    loop {
        // A negative entry in the value column marks a primal violation.
        let i = match (0..rows).find(|&r| mat[r][0] < 0.0) {
            Some(i) => i,
            None => {
                let mut soln = vec![0.0; q];
                soln[0] = mat[0][0];
                for (k, entry) in soln.iter_mut().enumerate().skip(1) {
                    *entry = mat[p + k][0];
                }
                return Some(soln);
            }
        };

        // Candidate pivot columns have a positive entry in the violated row.
        let candidates: Vec<usize> = (1..q).filter(|&j| mat[i][j] > EPSILON).collect();
        if candidates.is_empty() {
            return None;
        }

        // Normalize each candidate column by its pivot entry and keep the
        // lexicographically smallest; degenerate ties cannot cycle.
        let mut ratios: Vec<Vec<f64>> = Vec::with_capacity(candidates.len());
        for &j in &candidates {
            let piv = mat[i][j];
            ratios.push((0..rows).map(|k| mat[k][j] / piv).collect());
        }
        let mut best = 0;
        for c in 1..ratios.len() {
            if lex_less(&ratios[c], &ratios[best]) {
                best = c;
            }
        }
        let j = candidates[best];

        // Pivot: install the normalized column, then eliminate the violated
        // row from every other column.
        let pivot_row: Vec<f64> = mat[i].clone();
        for k in 0..rows {
            mat[k][j] = ratios[best][k];
        }
        for (l, &mult) in pivot_row.iter().enumerate() {
            if l == j || mult == 0.0 {
                continue;
            }
            for k in 0..rows {
                mat[k][l] -= mult * mat[k][j];
            }
        }
    }
}
