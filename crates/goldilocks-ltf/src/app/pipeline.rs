//! Concurrent testing pipeline.
//!
//! One producer thread streams persisted candidates into a work queue
//! under soft-limit backpressure, a pool of worker threads runs the
//! separability tester and the symmetry counter on each candidate, and a
//! single aggregator accumulates the per-candidate class counts until the
//! expected total is reached:
//!
//! ```text
//!                       /--> worker --\
//! producer --> workq -------> worker ------> countq --> aggregator
//!                       \--> worker --/
//! ```
//!
//! Shutdown is an explicit tagged work item, one per worker, enqueued
//! after the last real candidate. The expected total is derived from the
//! fixed-size candidate file rather than trusted blindly, so a wrong
//! configured total fails at startup instead of hanging the aggregator.

use std::path::Path;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use thiserror::Error;

use crate::constants::{
    BACKPRESSURE_POLL_MS, DEFAULT_WORKERS, MAX_VARIABLES, MIN_VARIABLES, PROGRESS_STEP_PERCENT,
    QUEUE_SOFT_LIMIT, known_candidate_total,
};
use crate::domain::function::BooleanFunction;
use crate::domain::order::OrderTable;
use crate::domain::simplex::is_separable;
use crate::domain::symmetry::{ClassCounts, SymmetryCounter};
use crate::infra::candidate_io::{CandidateReader, count_records};
use crate::infra::report::{ResultsSink, RunningTotals};

/// A unit of work for a tester thread.
enum WorkItem {
    Candidate(BooleanFunction),
    Shutdown,
}

/// Runtime pipeline configuration.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Number of Boolean variables.
    pub n: usize,
    /// Number of tester threads.
    pub workers: usize,
    /// Soft cap on the work-queue length before the producer backs off.
    pub queue_soft_limit: usize,
    /// Producer sleep interval while over the soft cap.
    pub poll_interval: Duration,
    /// Progress-report granularity in percent.
    pub progress_step: u64,
    /// Externally known candidate total, cross-checked against the file.
    pub expected_total: Option<u64>,
}

impl PipelineConfig {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            workers: DEFAULT_WORKERS,
            queue_soft_limit: QUEUE_SOFT_LIMIT,
            poll_interval: Duration::from_millis(BACKPRESSURE_POLL_MS),
            progress_step: PROGRESS_STEP_PERCENT,
            expected_total: None,
        }
    }
}

/// Pipeline failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("candidate source error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported variable count {0} (supported {MIN_VARIABLES}..={MAX_VARIABLES})")]
    UnsupportedVariables(usize),

    #[error("no tester threads configured")]
    NoWorkers,

    #[error("expected total {expected} does not match the candidate file ({found} records)")]
    TotalMismatch { expected: u64, found: u64 },

    #[error("result stream closed after {received} of {expected} candidates")]
    Incomplete { received: u64, expected: u64 },
}

/// Run the full pipeline over a candidate file, appending per-candidate
/// lines, progress blocks and the final summary to `sink`. Returns the
/// grand totals.
pub fn run(
    config: &PipelineConfig,
    candidate_file: &Path,
    sink: &ResultsSink,
) -> Result<RunningTotals, PipelineError> {
    if !(MIN_VARIABLES..=MAX_VARIABLES).contains(&config.n) {
        return Err(PipelineError::UnsupportedVariables(config.n));
    }
    if config.workers == 0 {
        return Err(PipelineError::NoWorkers);
    }
    let tn = 1usize << config.n;

    // An unreadable candidate source is fatal before any thread spawns.
    let total = count_records(candidate_file, tn)?;
    let reader = CandidateReader::open(candidate_file, tn)?;

    if let Some(expected) = config.expected_total {
        if expected != total {
            return Err(PipelineError::TotalMismatch {
                expected,
                found: total,
            });
        }
    }
    if let Some(published) = known_candidate_total(config.n) {
        if published != total {
            log::warn!(
                "candidate file holds {} records but the published total for n={} is {}",
                total,
                config.n,
                published
            );
        }
    }

    let order = OrderTable::build(config.n);
    let counter = SymmetryCounter::new(config.n);

    let (work_tx, work_rx) = unbounded::<WorkItem>();
    let (count_tx, count_rx) = unbounded::<ClassCounts>();

    log::info!(
        "pipeline starting: n={}, {} candidates, {} workers",
        config.n,
        total,
        config.workers
    );

    thread::scope(|scope| {
        for id in 0..config.workers {
            let work_rx = work_rx.clone();
            let count_tx = count_tx.clone();
            let order = &order;
            let counter = &counter;
            scope.spawn(move || worker(id, work_rx, count_tx, order, counter, sink));
        }
        // The aggregator must observe the channel close once every worker
        // is done, so the local sender clone is dropped here.
        drop(count_tx);

        let workers = config.workers;
        let soft_limit = config.queue_soft_limit;
        let poll = config.poll_interval;
        scope.spawn(move || produce(reader, work_tx, workers, soft_limit, poll));

        aggregate(config, total, count_rx, sink)
    })
}

// Producer: stream candidates into the work queue with soft-limit
// backpressure, then enqueue one shutdown item per worker.
fn produce(
    reader: CandidateReader,
    work_tx: Sender<WorkItem>,
    workers: usize,
    soft_limit: usize,
    poll: Duration,
) {
    let mut sent = 0u64;
    for item in reader {
        match item {
            Ok(f) => {
                while work_tx.len() > soft_limit {
                    thread::sleep(poll);
                }
                if work_tx.send(WorkItem::Candidate(f)).is_err() {
                    log::error!("work queue closed early; stopping producer");
                    break;
                }
                sent += 1;
            }
            Err(e) => {
                log::error!("candidate stream read failed after {} records: {}", sent, e);
                break;
            }
        }
    }
    for _ in 0..workers {
        let _ = work_tx.send(WorkItem::Shutdown);
    }
    log::info!(
        "producer done: {} candidates enqueued, {} shutdown items",
        sent,
        workers
    );
}

// Worker: test one candidate at a time until the shutdown item arrives.
fn worker(
    id: usize,
    work_rx: Receiver<WorkItem>,
    count_tx: Sender<ClassCounts>,
    order: &OrderTable,
    counter: &SymmetryCounter,
    sink: &ResultsSink,
) {
    let mut tested = 0u64;
    loop {
        match work_rx.recv() {
            Ok(WorkItem::Candidate(f)) => {
                let counts = if is_separable(&f, order) {
                    let counts = counter.count(&f);
                    if let Err(e) = sink.candidate(&f, &counts) {
                        log::error!("worker {}: results write failed: {}", id, e);
                    }
                    counts
                } else {
                    ClassCounts::default()
                };
                tested += 1;
                if count_tx.send(counts).is_err() {
                    // Aggregator is gone; drain quietly until shutdown.
                    log::warn!("worker {}: count queue closed", id);
                }
            }
            Ok(WorkItem::Shutdown) => {
                log::info!("worker {} terminating after testing {} functions", id, tested);
                return;
            }
            Err(_) => {
                log::warn!("worker {}: work queue closed without shutdown item", id);
                return;
            }
        }
    }
}

// Aggregator: sum per-candidate counts until the expected total arrives,
// reporting progress at the configured granularity. Arrival order is
// irrelevant; the sums are commutative.
fn aggregate(
    config: &PipelineConfig,
    total: u64,
    count_rx: Receiver<ClassCounts>,
    sink: &ResultsSink,
) -> Result<RunningTotals, PipelineError> {
    let mut totals = RunningTotals::default();
    let step = config.progress_step.max(1);
    let mut next_percent = step;

    while totals.tested < total {
        let counts = count_rx.recv().map_err(|_| PipelineError::Incomplete {
            received: totals.tested,
            expected: total,
        })?;
        totals.absorb(&counts);

        let percent = totals.tested * 100 / total;
        while next_percent <= percent {
            sink.progress(config.n, next_percent, &totals)?;
            log::info!("aggregator: {}% complete", next_percent);
            next_percent += step;
        }
    }

    sink.summary(config.n, &totals)?;
    log::info!(
        "aggregator done: {} tested, {} Goldilocks(/Sn)",
        totals.tested,
        totals.gold_sn
    );
    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::generator::enumerate;
    use crate::infra::candidate_io::{CandidateWriter, candidate_path, results_path};
    use tempfile::TempDir;

    fn write_candidates(dir: &Path, n: usize) -> (std::path::PathBuf, u64) {
        let order = OrderTable::build(n);
        let path = candidate_path(dir, n);
        let mut writer = CandidateWriter::create(&path, 1 << n).expect("create");
        let generated = enumerate(&order, |f| writer.write(f)).expect("enumerate");
        writer.finish().expect("finish");
        (path, generated)
    }

    /// Single-threaded reference over the same candidate stream.
    fn sequential_totals(path: &Path, n: usize) -> RunningTotals {
        let order = OrderTable::build(n);
        let counter = SymmetryCounter::new(n);
        let mut totals = RunningTotals::default();
        let reader = CandidateReader::open(path, 1 << n).expect("open");
        for item in reader {
            let f = item.expect("read");
            let counts = if is_separable(&f, &order) {
                counter.count(&f)
            } else {
                ClassCounts::default()
            };
            totals.absorb(&counts);
        }
        totals
    }

    #[test]
    fn test_pipeline_matches_sequential_reference() {
        let dir = TempDir::new().expect("temp dir");
        let (path, generated) = write_candidates(dir.path(), 4);

        let mut config = PipelineConfig::new(4);
        config.workers = 3;
        let sink = ResultsSink::append(results_path(dir.path(), 4)).expect("sink");
        let totals = run(&config, &path, &sink).expect("pipeline");

        assert_eq!(totals.tested, generated);
        assert_eq!(totals, sequential_totals(&path, 4));
    }

    #[test]
    fn test_pipeline_deterministic_across_worker_counts() {
        let dir = TempDir::new().expect("temp dir");
        let (path, _) = write_candidates(dir.path(), 3);

        let mut results = Vec::new();
        for workers in [1usize, 4] {
            let mut config = PipelineConfig::new(3);
            config.workers = workers;
            let sink =
                ResultsSink::append(dir.path().join(format!("counts-{}.txt", workers)))
                    .expect("sink");
            results.push(run(&config, &path, &sink).expect("pipeline"));
        }
        assert_eq!(results[0], results[1]);
    }

    #[test]
    fn test_missing_candidate_file_is_fatal() {
        let dir = TempDir::new().expect("temp dir");
        let config = PipelineConfig::new(3);
        let sink = ResultsSink::append(results_path(dir.path(), 3)).expect("sink");
        let result = run(&config, Path::new("/nonexistent/goldcands3.dat"), &sink);
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }

    #[test]
    fn test_wrong_expected_total_is_fatal() {
        let dir = TempDir::new().expect("temp dir");
        let (path, generated) = write_candidates(dir.path(), 3);

        let mut config = PipelineConfig::new(3);
        config.expected_total = Some(generated + 1);
        let sink = ResultsSink::append(results_path(dir.path(), 3)).expect("sink");
        let result = run(&config, &path, &sink);
        assert!(matches!(
            result,
            Err(PipelineError::TotalMismatch { .. })
        ));
    }

    #[test]
    fn test_unsupported_variable_count() {
        let dir = TempDir::new().expect("temp dir");
        let config = PipelineConfig::new(1);
        let sink = ResultsSink::append(results_path(dir.path(), 1)).expect("sink");
        let result = run(&config, Path::new("ignored.dat"), &sink);
        assert!(matches!(
            result,
            Err(PipelineError::UnsupportedVariables(1))
        ));
    }

    #[test]
    fn test_results_file_has_summary_and_candidate_lines() {
        let dir = TempDir::new().expect("temp dir");
        let (path, _) = write_candidates(dir.path(), 3);

        let mut config = PipelineConfig::new(3);
        config.workers = 2;
        let results = results_path(dir.path(), 3);
        let sink = ResultsSink::append(&results).expect("sink");
        let totals = run(&config, &path, &sink).expect("pipeline");

        let text = std::fs::read_to_string(&results).expect("read");
        assert!(text.contains("Final results!"));
        let candidate_lines = text.lines().filter(|l| l.contains(';')).count() as u64;
        // One line per separable candidate; all counted candidates that
        // produced classes are separable.
        assert!(candidate_lines <= totals.tested);
        assert!(candidate_lines > 0);
    }
}
