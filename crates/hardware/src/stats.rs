//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for a simulation run. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (IPC, CPI).
//! 2. **Control flow:** Taken conditional branches and procedure calls (`JAL`/`JALR`).
//! 3. **Hazards:** Data hazard stalls and control flushes.
//! 4. **Host timing:** Wall-clock execution time and instructions per second.

use std::fmt;
use std::time::{Duration, Instant};

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,
    /// Number of conditional branches that were taken.
    pub branches_taken: u64,
    /// Number of procedure calls and returns (`JAL` and `JALR`).
    pub procedure_calls: u64,
    /// Stalls inserted by Decode for read-after-write conflicts.
    pub stalls_data: u64,
    /// Pipeline flushes caused by taken branches and jumps.
    pub flushes_control: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            branches_taken: 0,
            procedure_calls: 0,
            stalls_data: 0,
            flushes_control: 0,
        }
    }
}

impl SimStats {
    /// Wall-clock time since the statistics were created.
    pub fn execution_time(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Retired instructions per host second.
    pub fn instructions_per_second(&self) -> f64 {
        let seconds = self.execution_time().as_secs_f64();
        if seconds > 0.0 {
            self.instructions_retired as f64 / seconds
        } else {
            0.0
        }
    }

    /// Instructions retired per cycle.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.instructions_retired as f64 / self.cycles as f64
        }
    }

    /// Cycles per retired instruction.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Prints the statistics summary to stdout.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for SimStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "PIPELINE SIMULATION STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(
            f,
            "host_seconds             {:.4} s",
            self.execution_time().as_secs_f64()
        )?;
        writeln!(f, "sim_cycles               {}", self.cycles)?;
        writeln!(f, "sim_insts                {}", self.instructions_retired)?;
        writeln!(f, "sim_ipc                  {:.4}", self.ipc())?;
        writeln!(f, "sim_cpi                  {:.4}", self.cpi())?;
        writeln!(
            f,
            "sim_ips                  {:.0}",
            self.instructions_per_second()
        )?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "branches.taken           {}", self.branches_taken)?;
        writeln!(f, "procedure_calls          {}", self.procedure_calls)?;
        writeln!(f, "stalls.data              {}", self.stalls_data)?;
        write!(f, "flushes.control          {}", self.flushes_control)
    }
}
