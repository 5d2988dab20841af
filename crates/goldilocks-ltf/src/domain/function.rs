//! Boolean functions as fixed-width bit vectors.
//!
//! A function F on n variables is stored as a bit vector of length
//! `tn = 2^n`; bit i holds F evaluated at the binary representation of i.
//! For n = 6, bit 4 set means F(000100) = 1.

use std::fmt;

use crate::constants::{RECORD_ONE, RECORD_ZERO};
use crate::domain::order::low_complement;

const BLOCK_BITS: usize = 64;

/// A Boolean function on a fixed number of hypercube points.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BooleanFunction {
    len: usize,
    blocks: Vec<u64>,
}

impl BooleanFunction {
    /// The all-zeros function (constant false) on `len` points.
    pub fn zeros(len: usize) -> Self {
        let blocks = vec![0u64; len.div_ceil(BLOCK_BITS)];
        Self { len, blocks }
    }

    /// The all-ones function (constant true) on `len` points.
    pub fn ones(len: usize) -> Self {
        let mut f = Self::zeros(len);
        for block in &mut f.blocks {
            *block = u64::MAX;
        }
        f.mask_tail();
        f
    }

    // Bits past `len` in the last block are kept zero so that equality
    // and popcounts stay exact.
    fn mask_tail(&mut self) {
        let rem = self.len % BLOCK_BITS;
        if rem != 0 {
            if let Some(last) = self.blocks.last_mut() {
                *last &= (1u64 << rem) - 1;
            }
        }
    }

    /// Number of hypercube points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Value of the function at point `i`.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        (self.blocks[i / BLOCK_BITS] >> (i % BLOCK_BITS)) & 1 != 0
    }

    /// Set the function to 1 at point `i`.
    #[inline]
    pub fn set(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.blocks[i / BLOCK_BITS] |= 1u64 << (i % BLOCK_BITS);
    }

    /// Set the function to 0 at point `i`.
    #[inline]
    pub fn clear(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.blocks[i / BLOCK_BITS] &= !(1u64 << (i % BLOCK_BITS));
    }

    /// Number of 1-points.
    pub fn count_ones(&self) -> usize {
        self.blocks.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Index of the highest 1-point, if any.
    pub fn highest_set(&self) -> Option<usize> {
        for (bi, &block) in self.blocks.iter().enumerate().rev() {
            if block != 0 {
                let top = BLOCK_BITS - 1 - block.leading_zeros() as usize;
                return Some(bi * BLOCK_BITS + top);
            }
        }
        None
    }

    /// In-place intersection with another function of the same width.
    pub fn intersect_with(&mut self, other: &Self) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.blocks.iter_mut().zip(other.blocks.iter()) {
            *a &= *b;
        }
    }

    /// The dual function: `dual(x) = !f(!x)`, with the complement taken
    /// over the low `n` coordinate bits.
    pub fn dual(&self, n: usize) -> Self {
        debug_assert_eq!(self.len, 1usize << n);
        let mut out = Self::zeros(self.len);
        for i in 0..self.len {
            if !self.get(low_complement(n, i)) {
                out.set(i);
            }
        }
        out
    }

    // =========================================================================
    // Candidate record encoding
    // =========================================================================

    /// Append the fixed-width record encoding to `buf`: one ASCII '0'/'1'
    /// byte per point, bit i at byte i.
    pub fn encode_record(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.len);
        for i in 0..self.len {
            buf.push(if self.get(i) { RECORD_ONE } else { RECORD_ZERO });
        }
    }

    /// Decode a fixed-width record. Returns `None` if any byte is not an
    /// ASCII '0' or '1'.
    pub fn decode_record(bytes: &[u8]) -> Option<Self> {
        let mut f = Self::zeros(bytes.len());
        for (i, &b) in bytes.iter().enumerate() {
            match b {
                RECORD_ONE => f.set(i),
                RECORD_ZERO => {}
                _ => return None,
            }
        }
        Some(f)
    }

    /// The record encoding as a string, for the results file.
    pub fn to_bitstring(&self) -> String {
        let mut buf = Vec::new();
        self.encode_record(&mut buf);
        // Records are ASCII by construction.
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl fmt::Display for BooleanFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bitstring())
    }
}

impl fmt::Debug for BooleanFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BooleanFunction({})", self.to_bitstring())
    }
}
