//! Candidate generation workflow.
//!
//! Depth-first backtracking over the lattice of dominance-monotone
//! up-sets. Each stack frame pairs a partial function F with the set of
//! points still free to decide; descending excludes the largest free
//! point together with everything it dominates, and advancing a popped
//! checkpoint includes that point instead. When the included point has
//! both of the two heaviest coordinate bits set, the mirrored branch
//! under swapping those coordinates is folded away by excluding the
//! complementary point as well — a pruning of known-isomorphic subtrees,
//! not a change to the emitted set.

use std::io;

use crate::domain::function::BooleanFunction;
use crate::domain::order::{OrderTable, bit, low_complement};

#[derive(Clone)]
struct Frame {
    f: BooleanFunction,
    free: BooleanFunction,
}

/// Enumerate every candidate generator exactly once, feeding each to
/// `emit` (depth-first order; callers must not rely on it). Returns the
/// number of candidates generated.
pub fn enumerate<E>(order: &OrderTable, emit: E) -> io::Result<u64>
where
    E: FnMut(&BooleanFunction) -> io::Result<()>,
{
    enumerate_with_progress(order, emit, |_| {})
}

/// Enumerate candidates with a progress callback invoked every 100,000
/// emissions (and once at the end) with the running count.
pub fn enumerate_with_progress<E, P>(
    order: &OrderTable,
    mut emit: E,
    mut on_progress: P,
) -> io::Result<u64>
where
    E: FnMut(&BooleanFunction) -> io::Result<()>,
    P: FnMut(u64),
{
    let n = order.n();
    debug_assert!(n >= 2);
    let tn = order.size();
    let masks = order.exclusion_masks();

    let mut generated = 0u64;
    let mut stack = vec![Frame {
        f: BooleanFunction::zeros(tn),
        free: BooleanFunction::ones(tn),
    }];

    while let Some(mut frame) = stack.pop() {
        // Descend: exclude the largest free point, checkpointing the
        // branch where it is included instead.
        while let Some(j) = frame.free.highest_set() {
            stack.push(frame.clone());
            frame.free.intersect_with(&masks[j]);
        }

        emit(&frame.f)?;
        generated += 1;
        if generated % 100_000 == 0 {
            on_progress(generated);
        }

        // Advance the most recent checkpoint: include its largest free
        // point. Checkpoints always retain at least one free point.
        if let Some(mut frame) = stack.pop() {
            if let Some(j) = frame.free.highest_set() {
                frame.f.set(j);
                frame.free.clear(j);
                if bit(j, n - 1) == 1 && bit(j, n - 2) == 1 {
                    let z = low_complement(n - 2, j) | (1usize << (n - 1));
                    frame.free.intersect_with(&masks[z]);
                }
                stack.push(frame);
            }
        }
    }

    on_progress(generated);
    Ok(generated)
}
