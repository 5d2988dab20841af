//! Enumeration parameters and published reference totals.

// =============================================================================
// Problem size limits
// =============================================================================

/// Smallest number of Boolean variables the enumeration supports.
pub const MIN_VARIABLES: usize = 2;

/// Largest number of Boolean variables the enumeration supports.
///
/// Beyond n = 9 the 2^n-bit function vectors and the per-point covering
/// tables no longer fit comfortably in memory.
pub const MAX_VARIABLES: usize = 9;

// =============================================================================
// Pipeline defaults
// =============================================================================

/// Default number of tester threads.
///
/// Sized for a 16-core node with two cores left for the producer and
/// the aggregator.
pub const DEFAULT_WORKERS: usize = 14;

/// Soft cap on the work-queue length before the producer backs off.
pub const QUEUE_SOFT_LIMIT: usize = 5000;

/// How long the producer sleeps while the work queue is over the soft cap (ms).
pub const BACKPRESSURE_POLL_MS: u64 = 5;

/// Progress-report granularity, in percent of candidates processed.
pub const PROGRESS_STEP_PERCENT: u64 = 1;

// =============================================================================
// Candidate file format
// =============================================================================

/// Byte value encoding a 0-bit in a candidate record.
pub const RECORD_ZERO: u8 = b'0';

/// Byte value encoding a 1-bit in a candidate record.
pub const RECORD_ONE: u8 = b'1';

// =============================================================================
// Published totals
// =============================================================================

/// Known totals per variable count, from the published enumeration.
/// Each value is both the number of generated candidates and the summed
/// Goldilocks class count over a full run.
///
/// Used as a startup cross-check against the candidate file so that a wrong
/// total is caught before the pipeline starts instead of hanging the
/// aggregator.
pub const KNOWN_CANDIDATE_TOTALS: [(usize, u64); 5] = [
    (5, 21),
    (6, 135),
    (7, 2470),
    (8, 319_124),
    (9, 1_214_554_343),
];

/// Look up the published candidate total for `n`, if one is known.
pub fn known_candidate_total(n: usize) -> Option<u64> {
    KNOWN_CANDIDATE_TOTALS
        .iter()
        .find(|&&(m, _)| m == n)
        .map(|&(_, total)| total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_totals_lookup() {
        assert_eq!(known_candidate_total(5), Some(21));
        assert_eq!(known_candidate_total(8), Some(319_124));
        assert_eq!(known_candidate_total(4), None);
    }
}
