//! goldilocks-ltf - Enumeration and counting of Goldilocks threshold functions
//!
//! This crate provides functionality to:
//! - Enumerate candidate generator functions over the dominance order
//! - Test candidates for linear separability via a dual simplex solver
//! - Count Goldilocks and positive-small classes from Chow parameters
//! - Run the concurrent producer / worker / aggregator counting pipeline

pub mod constants;
pub mod domain;
pub mod infra;
pub mod app;

// Re-export commonly used types
pub use constants::*;
pub use domain::function::BooleanFunction;
pub use domain::order::OrderTable;
pub use domain::symmetry::{ClassCounts, SymmetryCounter};
pub use infra::report::{ResultsSink, RunningTotals};
