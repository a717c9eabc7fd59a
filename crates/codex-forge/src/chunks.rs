//! Chunked artifact reassembly
//!
//! Large artifacts arrive as an ordered sequence of byte chunks keyed by
//! index. Chunks may arrive in any order; assembly orders strictly by
//! declared index and validates contiguity from zero before any digesting
//! happens. A gap is a terminal error, never silently skipped.

use crate::error::{BuildError, Result};
use std::collections::BTreeMap;

/// Buffer collecting out-of-order chunks keyed by declared index
#[derive(Debug, Default, Clone)]
pub struct ChunkBuffer {
    chunks: BTreeMap<usize, Vec<u8>>,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a chunk under its declared index
    ///
    /// A repeated index replaces the earlier bytes.
    pub fn push(&mut self, index: usize, bytes: Vec<u8>) {
        self.chunks.insert(index, bytes);
    }

    /// Number of chunks received so far
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Reassemble into one contiguous byte sequence
    ///
    /// Fails with [`BuildError::ChunkGap`] if any index in `0..n` is
    /// missing, where `n` is one past the highest index seen.
    pub fn assemble(self) -> Result<Vec<u8>> {
        let expected = match self.chunks.keys().next_back() {
            Some(last) => last + 1,
            None => return Ok(Vec::new()),
        };
        for index in 0..expected {
            if !self.chunks.contains_key(&index) {
                return Err(BuildError::ChunkGap { index, expected });
            }
        }
        let mut bytes = Vec::with_capacity(self.chunks.values().map(Vec::len).sum());
        for chunk in self.chunks.into_values() {
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}
