//! Control and Status Register (CSR) file.
//!
//! This module implements the CSR storage used by the Zicsr instructions. It provides:
//! 1. **Address Definitions:** Constants for the user-level counters and common machine CSRs.
//! 2. **Register Storage:** A sparse 4096-entry file where unwritten CSRs read as zero.
//! 3. **Access Logic:** Read and write operations that reject writes to read-only CSRs.

use std::collections::BTreeMap;

use crate::common::constants::CSR_COUNT;
use crate::common::error::ExecutionError;

/// Cycle counter CSR address (read-only).
pub const CYCLE: u16 = 0xC00;

/// Retired instruction counter CSR address (read-only).
pub const INSTRET: u16 = 0xC02;

/// Machine status register CSR address.
pub const MSTATUS: u16 = 0x300;

/// Machine scratch register CSR address.
pub const MSCRATCH: u16 = 0x340;

/// Machine exception program counter CSR address.
pub const MEPC: u16 = 0x341;

/// Bits 11-10 of a CSR address; `0b11` marks a read-only CSR.
const ACCESS_SHIFT: u16 = 10;

/// Control and Status Register file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsrFile {
    regs: BTreeMap<u16, u32>,
}

impl CsrFile {
    /// Creates an empty CSR file (every CSR reads as zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the CSR at `addr` is read-only by its address encoding.
    pub const fn is_read_only(addr: u16) -> bool {
        (addr >> ACCESS_SHIFT) & 0b11 == 0b11
    }

    /// Reads a CSR.
    ///
    /// # Arguments
    ///
    /// * `addr` - 12-bit CSR address.
    pub fn read(&self, addr: u16) -> u32 {
        self.regs.get(&addr).copied().unwrap_or(0)
    }

    /// Writes a CSR.
    ///
    /// # Arguments
    ///
    /// * `addr` - 12-bit CSR address.
    /// * `val` - The value to store.
    ///
    /// # Returns
    ///
    /// `ExecutionError::ReadOnlyCsr` if the CSR is read-only; nothing is written in that case.
    pub fn write(&mut self, addr: u16, val: u32) -> Result<(), ExecutionError> {
        if Self::is_read_only(addr) || usize::from(addr) >= CSR_COUNT {
            return Err(ExecutionError::ReadOnlyCsr(addr));
        }
        let _ = self.regs.insert(addr, val);
        Ok(())
    }

    /// Sets a CSR regardless of its access mode (used to preload counters).
    pub fn set(&mut self, addr: u16, val: u32) {
        let _ = self.regs.insert(addr, val);
    }
}
