//! RISC-V General-Purpose Register File.
//!
//! This module implements the General-Purpose Register (GPR) file for RV32I.
//! It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`) of 32 bits each.
//! 2. **Invariant Enforcement:** Ensures that register `x0` is hardwired to zero.
//! 3. **Reporting:** Provides read-only views and a formatted dump of the register state.

use std::fmt;

use crate::common::constants::REGISTER_COUNT;
use crate::isa::abi;

/// General-Purpose Register file.
///
/// Contains 32 general-purpose registers used for integer operations. Register `x0`
/// is hardwired to zero and cannot be modified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u32; REGISTER_COUNT],
}

impl Gpr {
    /// Creates a new general-purpose register file with all registers initialized to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a register file from initial values; the value given for `x0` is discarded.
    ///
    /// # Arguments
    ///
    /// * `values` - Initial values for `x0`..`xN`; missing registers start at zero.
    pub fn from_values(values: &[u32]) -> Self {
        let mut gpr = Self::new();
        for (idx, &val) in values.iter().enumerate().take(REGISTER_COUNT) {
            gpr.write(idx, val);
        }
        gpr
    }

    /// Reads a general-purpose register value.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    ///
    /// # Returns
    ///
    /// The 32-bit value stored in the specified register. Register `x0` always returns 0.
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 {
            0
        } else {
            self.regs.get(idx).copied().unwrap_or(0)
        }
    }

    /// Writes a value to a general-purpose register.
    ///
    /// Writes to `x0` or to an out-of-range index are discarded.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `val` - The 32-bit value to write.
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            if let Some(reg) = self.regs.get_mut(idx) {
                *reg = val;
            }
        }
    }

    /// Returns all 32 register values, `x0` first.
    pub const fn values(&self) -> &[u32; REGISTER_COUNT] {
        &self.regs
    }
}

impl fmt::Display for Gpr {
    /// Formats registers in pairs with ABI names and hexadecimal values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..REGISTER_COUNT).step_by(2) {
            writeln!(
                f,
                "x{:<2} ({:>4}) = {:#010x}    x{:<2} ({:>4}) = {:#010x}",
                i,
                abi::name(i),
                self.regs[i],
                i + 1,
                abi::name(i + 1),
                self.regs[i + 1]
            )?;
        }
        Ok(())
    }
}
