//! Append-only results reporting.
//!
//! All pipeline stages share one results sink; the inner mutex is held
//! only for the duration of a single write, so per-candidate lines from
//! different workers never interleave mid-line. Diagnostic messages go
//! through the `log` facade instead.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use crate::domain::function::BooleanFunction;
use crate::domain::symmetry::ClassCounts;

/// Running grand totals across all tested candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunningTotals {
    pub tested: u64,
    pub gold: u64,
    pub gold_sn: u64,
    pub semi: u64,
    pub semi_sn: u64,
}

impl RunningTotals {
    pub fn absorb(&mut self, counts: &ClassCounts) {
        self.tested += 1;
        self.gold += counts.gold;
        self.gold_sn += counts.gold_sn;
        self.semi += counts.semi;
        self.semi_sn += counts.semi_sn;
    }
}

/// Shared append-only results file.
pub struct ResultsSink {
    file: Mutex<File>,
}

impl ResultsSink {
    /// Open (appending, creating if absent) the results file.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn locked(&self) -> std::sync::MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One line per tested separable candidate:
    /// `<bitstring>;<gold>,<gold_sn>,<semi>,<semi_sn>`.
    pub fn candidate(&self, f: &BooleanFunction, counts: &ClassCounts) -> io::Result<()> {
        let mut file = self.locked();
        writeln!(
            file,
            "{};{},{},{},{}",
            f, counts.gold, counts.gold_sn, counts.semi, counts.semi_sn
        )
    }

    /// Periodic progress block.
    pub fn progress(&self, n: usize, percent: u64, totals: &RunningTotals) -> io::Result<()> {
        let mut file = self.locked();
        writeln!(file, "Aggregator: {}% complete.", percent)?;
        writeln!(file, "Current progress:")?;
        write_totals(&mut *file, n, totals)
    }

    /// Final summary block.
    pub fn summary(&self, n: usize, totals: &RunningTotals) -> io::Result<()> {
        let mut file = self.locked();
        writeln!(file, "Final results!")?;
        write_totals(&mut *file, n, totals)
    }
}

/// Open (appending, creating if absent) the diagnostic log file. Like the
/// results file, the log accumulates across runs.
pub fn open_log_file(path: impl AsRef<Path>) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// The shared totals block, also printed to stdout by the CLI.
pub fn write_totals(out: &mut dyn Write, n: usize, totals: &RunningTotals) -> io::Result<()> {
    writeln!(out, "n = {}", n)?;
    writeln!(out, "Number tested : {}", totals.tested)?;
    writeln!(out, "Number Goldilocks(/Sn): {}", totals.gold_sn)?;
    writeln!(out, "Number Goldilocks: {}", totals.gold)?;
    writeln!(out, "Number SemiGold(/Sn): {}", totals.semi_sn)?;
    writeln!(out, "Number SemiGold: {}", totals.semi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidate_line_format() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("counts.txt");
        let sink = ResultsSink::append(&path).expect("open");

        let mut f = BooleanFunction::zeros(4);
        f.set(3);
        let counts = ClassCounts {
            gold: 1,
            gold_sn: 1,
            semi: 4,
            semi_sn: 2,
        };
        sink.candidate(&f, &counts).expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text, "0001;1,1,4,2\n");
    }

    #[test]
    fn test_summary_block() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("counts.txt");
        let sink = ResultsSink::append(&path).expect("open");

        let totals = RunningTotals {
            tested: 21,
            gold: 3514,
            gold_sn: 21,
            semi: 7028,
            semi_sn: 42,
        };
        sink.summary(5, &totals).expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.starts_with("Final results!\n"));
        assert!(text.contains("n = 5\n"));
        assert!(text.contains("Number tested : 21\n"));
        assert!(text.contains("Number Goldilocks(/Sn): 21\n"));
    }

    #[test]
    fn test_log_file_opens_for_append() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("goldlog3.txt");
        std::fs::write(&path, "earlier run\n").expect("seed");

        let mut file = open_log_file(&path).expect("open");
        writeln!(file, "later run").expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text, "earlier run\nlater run\n");
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("counts.txt");
        std::fs::write(&path, "existing\n").expect("seed");

        let sink = ResultsSink::append(&path).expect("open");
        sink.progress(3, 50, &RunningTotals::default())
            .expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.starts_with("existing\n"));
        assert!(text.contains("Aggregator: 50% complete.\n"));
    }
}
