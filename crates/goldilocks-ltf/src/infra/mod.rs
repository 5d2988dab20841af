//! Infrastructure layer - I/O and external dependencies
//!
//! This module handles candidate files and results reporting.

pub mod candidate_io;
pub mod report;
