//! Domain layer - Pure computational logic
//!
//! This module contains pure functions and algorithms without I/O dependencies.

pub mod function;
pub mod order;
pub mod simplex;
pub mod symmetry;
