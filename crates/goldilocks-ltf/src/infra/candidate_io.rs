//! Candidate file I/O.
//!
//! A candidate file is a sequence of fixed-size records with no header or
//! delimiter: each record is exactly `tn` ASCII '0'/'1' bytes, bit i of
//! the function at byte i. End-of-file ends the stream; truncated
//! trailing bytes are not consumed. The writer and reader must agree
//! bit-for-bit on this layout.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::domain::function::BooleanFunction;

/// Buffered writer of candidate records.
///
/// Buffering is a throughput optimization only; it never changes the
/// emitted bytes or their order.
pub struct CandidateWriter {
    inner: BufWriter<File>,
    record: Vec<u8>,
    width: usize,
}

impl CandidateWriter {
    /// Create (truncating) a candidate file for functions on `width`
    /// hypercube points.
    pub fn create(path: impl AsRef<Path>, width: usize) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: BufWriter::new(file),
            record: Vec::with_capacity(width),
            width,
        })
    }

    /// Append one candidate record.
    pub fn write(&mut self, f: &BooleanFunction) -> io::Result<()> {
        debug_assert_eq!(f.len(), self.width);
        self.record.clear();
        f.encode_record(&mut self.record);
        self.inner.write_all(&self.record)
    }

    /// Flush and close the file.
    pub fn finish(mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Streaming reader of candidate records.
pub struct CandidateReader {
    inner: BufReader<File>,
    record: Vec<u8>,
}

impl CandidateReader {
    /// Open a candidate file of functions on `width` hypercube points.
    pub fn open(path: impl AsRef<Path>, width: usize) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            inner: BufReader::new(file),
            record: vec![0u8; width],
        })
    }

    fn read_next(&mut self) -> io::Result<Option<BooleanFunction>> {
        match self.inner.read_exact(&mut self.record) {
            Ok(()) => BooleanFunction::decode_record(&self.record)
                .map(Some)
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidData, "malformed candidate record")
                }),
            // A short trailing record ends the stream.
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Iterator for CandidateReader {
    type Item = io::Result<BooleanFunction>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

/// Number of whole records in a candidate file, from its size.
pub fn count_records(path: impl AsRef<Path>, width: usize) -> io::Result<u64> {
    let metadata = std::fs::metadata(path)?;
    Ok(metadata.len() / width as u64)
}

/// Expected candidate file path for n variables.
pub fn candidate_path(dir: impl AsRef<Path>, n: usize) -> PathBuf {
    dir.as_ref().join(format!("goldcands{}.dat", n))
}

/// Expected results file path for n variables.
pub fn results_path(dir: impl AsRef<Path>, n: usize) -> PathBuf {
    dir.as_ref().join(format!("goldcounts{}.txt", n))
}

/// Expected log file path for n variables.
pub fn log_path(dir: impl AsRef<Path>, n: usize) -> PathBuf {
    dir.as_ref().join(format!("goldlog{}.txt", n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn function_of(tn: usize, ones: &[usize]) -> BooleanFunction {
        let mut f = BooleanFunction::zeros(tn);
        for &i in ones {
            f.set(i);
        }
        f
    }

    #[test]
    fn test_write_and_read_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cands.dat");

        let functions = vec![
            function_of(8, &[]),
            function_of(8, &[7]),
            function_of(8, &[3, 5, 6, 7]),
        ];

        let mut writer = CandidateWriter::create(&path, 8).expect("create");
        for f in &functions {
            writer.write(f).expect("write");
        }
        writer.finish().expect("finish");

        let reader = CandidateReader::open(&path, 8).expect("open");
        let loaded: Vec<_> = reader.map(|r| r.expect("read")).collect();
        assert_eq!(loaded, functions);
    }

    #[test]
    fn test_count_records() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cands.dat");

        let mut writer = CandidateWriter::create(&path, 16).expect("create");
        for _ in 0..5 {
            writer.write(&function_of(16, &[15])).expect("write");
        }
        writer.finish().expect("finish");

        assert_eq!(count_records(&path, 16).expect("count"), 5);
    }

    #[test]
    fn test_truncated_trailing_record_is_ignored() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cands.dat");

        let mut bytes = Vec::new();
        function_of(8, &[7]).encode_record(&mut bytes);
        bytes.extend_from_slice(b"0101"); // half a record
        std::fs::write(&path, &bytes).expect("write raw");

        let reader = CandidateReader::open(&path, 8).expect("open");
        let loaded: Vec<_> = reader.map(|r| r.expect("read")).collect();
        assert_eq!(loaded, vec![function_of(8, &[7])]);
        assert_eq!(count_records(&path, 8).expect("count"), 1);
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("cands.dat");
        std::fs::write(&path, b"01x10101").expect("write raw");

        let mut reader = CandidateReader::open(&path, 8).expect("open");
        let first = reader.next().expect("one item");
        assert!(first.is_err());
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(CandidateReader::open("/nonexistent/cands.dat", 8).is_err());
    }

    #[test]
    fn test_paths() {
        let dir = Path::new("/data");
        assert_eq!(candidate_path(dir, 7), Path::new("/data/goldcands7.dat"));
        assert_eq!(results_path(dir, 7), Path::new("/data/goldcounts7.txt"));
        assert_eq!(log_path(dir, 7), Path::new("/data/goldlog7.txt"));
    }
}
