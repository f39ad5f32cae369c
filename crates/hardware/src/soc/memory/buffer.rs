//! Sparse Byte Buffer.
//!
//! Backing storage for data memory. Only written bytes occupy host memory;
//! every other address reads as zero, so the full 32-bit address space can be
//! modelled without allocation up front.

use std::collections::BTreeMap;

/// Sparse byte-addressed storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseBuffer {
    bytes: BTreeMap<u32, u8>,
}

impl SparseBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the byte at `addr` (zero if never written).
    pub fn get(&self, addr: u32) -> u8 {
        self.bytes.get(&addr).copied().unwrap_or(0)
    }

    /// Writes the byte at `addr`.
    pub fn set(&mut self, addr: u32, val: u8) {
        let _ = self.bytes.insert(addr, val);
    }

    /// Number of bytes that have been written.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if no byte has been written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterates written bytes in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.bytes.iter().map(|(&addr, &val)| (addr, val))
    }
}
