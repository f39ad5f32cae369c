//! Data and Instruction Memory.
//!
//! This module implements the two memories of the simulated machine. It provides:
//! 1. **Buffer:** Sparse byte storage (`SparseBuffer`) for data memory contents.
//! 2. **Data Memory:** Little-endian byte/half/word access bounded by a configured window.
//! 3. **Program Memory:** The instruction stream, keyed by address.

/// Sparse byte storage backing data memory.
pub mod buffer;

/// Instruction memory holding the program.
pub mod program;

use self::buffer::SparseBuffer;
use crate::common::constants::{DATA_MEMORY_BASE, DATA_MEMORY_SIZE};
use crate::common::error::ExecutionError;
use crate::config::MemoryConfig;

pub use self::program::InstructionMemory;

/// Data memory.
///
/// Every byte touched by an access must lie in `[base, base + size)`. Misaligned
/// accesses are allowed; multi-byte values are little-endian.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataMemory {
    buffer: SparseBuffer,
    base: u32,
    size: u64,
}

impl Default for DataMemory {
    fn default() -> Self {
        Self::new(DATA_MEMORY_BASE, DATA_MEMORY_SIZE)
    }
}

impl DataMemory {
    /// Creates an empty data memory covering `[base, base + size)`.
    ///
    /// # Arguments
    ///
    /// * `base` - Lowest valid address.
    /// * `size` - Window size in bytes; clipped to the end of the 32-bit space.
    pub fn new(base: u32, size: u64) -> Self {
        let size = size.min((1u64 << 32) - u64::from(base));
        Self {
            buffer: SparseBuffer::new(),
            base,
            size,
        }
    }

    /// Creates an empty data memory from configuration.
    pub fn from_config(config: &MemoryConfig) -> Self {
        Self::new(config.base, config.size)
    }

    /// Lowest valid address.
    pub const fn min_address(&self) -> u32 {
        self.base
    }

    /// Highest valid address (inclusive).
    pub const fn max_address(&self) -> u32 {
        if self.size == 0 {
            self.base
        } else {
            (self.base as u64 + self.size - 1) as u32
        }
    }

    fn contains(&self, addr: u64) -> bool {
        addr >= u64::from(self.base) && addr < u64::from(self.base) + self.size
    }

    /// Verifies that every byte of an access lies inside the window.
    fn check(&self, addr: u32, len: u32) -> Result<(), ExecutionError> {
        for offset in 0..u64::from(len) {
            let byte = u64::from(addr) + offset;
            if !self.contains(byte) {
                return Err(ExecutionError::MemoryAccess {
                    address: byte as u32,
                    min: self.min_address(),
                    max: self.max_address(),
                });
            }
        }
        Ok(())
    }

    /// Reads `len` bytes (1, 2, or 4) as a little-endian value.
    ///
    /// # Returns
    ///
    /// The zero-extended value, or `ExecutionError::MemoryAccess` if any byte is out of range.
    pub fn read(&self, addr: u32, len: u32) -> Result<u32, ExecutionError> {
        self.check(addr, len)?;
        Ok((0..len).rev().fold(0u32, |acc, i| {
            (acc << 8) | u32::from(self.buffer.get(addr.wrapping_add(i)))
        }))
    }

    /// Writes the low `len` bytes (1, 2, or 4) of `val` in little-endian order.
    ///
    /// Nothing is written if any byte of the access is out of range.
    pub fn write(&mut self, addr: u32, len: u32, val: u32) -> Result<(), ExecutionError> {
        self.check(addr, len)?;
        for i in 0..len {
            self.buffer
                .set(addr.wrapping_add(i), (val >> (8 * i)) as u8);
        }
        Ok(())
    }

    /// Reads one byte.
    pub fn load_byte(&self, addr: u32) -> Result<u8, ExecutionError> {
        self.read(addr, 1).map(|v| v as u8)
    }

    /// Reads a little-endian half-word.
    pub fn load_halfword(&self, addr: u32) -> Result<u16, ExecutionError> {
        self.read(addr, 2).map(|v| v as u16)
    }

    /// Reads a little-endian word.
    pub fn load_word(&self, addr: u32) -> Result<u32, ExecutionError> {
        self.read(addr, 4)
    }

    /// Writes one byte.
    pub fn store_byte(&mut self, addr: u32, val: u8) -> Result<(), ExecutionError> {
        self.write(addr, 1, u32::from(val))
    }

    /// Writes a little-endian half-word.
    pub fn store_halfword(&mut self, addr: u32, val: u16) -> Result<(), ExecutionError> {
        self.write(addr, 2, u32::from(val))
    }

    /// Writes a little-endian word.
    pub fn store_word(&mut self, addr: u32, val: u32) -> Result<(), ExecutionError> {
        self.write(addr, 4, val)
    }

    /// Iterates written bytes in address order, for reporting.
    pub fn written_bytes(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.buffer.iter()
    }
}
