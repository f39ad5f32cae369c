//! Configuration system for the pipeline simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a simulation run. It provides:
//! 1. **Defaults:** Baseline values for the program counter, cycle budget, and memory window.
//! 2. **Structures:** Hierarchical config for general, pipeline, and memory settings.
//! 3. **Enums:** Pipeline mode and hazard detection selection.
//!
//! Configuration is supplied as JSON (`Config::from_json`, `Config::from_file`) or built
//! with `Config::default()`. Every field is optional in JSON and falls back to its default.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::SimError;

/// Default configuration constants for the simulator.
mod defaults {
    use crate::common::constants;

    /// Address of the first instruction.
    pub const START_PC: u32 = 0;

    /// Cycle budget for `Simulator::run` (zero disables the limit).
    pub const MAX_CYCLES: u64 = 1_000_000;

    /// Lowest valid data memory address.
    pub const MEMORY_BASE: u32 = constants::DATA_MEMORY_BASE;

    /// Size of the data memory window in bytes.
    pub const MEMORY_SIZE: u64 = constants::DATA_MEMORY_SIZE;

    /// Write-Back runs first so its register write is visible to Decode in the same cycle.
    pub const EXECUTION_ORDERING: [usize; 5] = [4, 0, 1, 2, 3];
}

/// Execution model used to run the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PipelineMode {
    /// One instruction completes fully every cycle.
    SingleCycle,
    /// Classic five-stage pipeline (IF, ID, EX, MEM, WB).
    #[default]
    #[serde(alias = "FiveStagePipeline")]
    FiveStage,
}

/// Whether Decode checks for read-after-write conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum HazardDetection {
    /// Stall (or forward) on in-flight writes to a source register.
    #[default]
    Enabled,
    /// Never stall; dependent instructions may read stale values.
    Disabled,
}

impl HazardDetection {
    /// Returns `true` when hazard detection is enabled.
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use archsim_core::config::{Config, HazardDetection, PipelineMode};
///
/// let json = r#"{
///     "general": { "max_cycles": 500 },
///     "pipeline": { "mode": "FiveStage", "hazard_detection": "Disabled", "forwarding": true }
/// }"#;
///
/// let config = Config::from_json(json).unwrap_or_default();
/// assert_eq!(config.general.max_cycles, 500);
/// assert_eq!(config.pipeline.mode, PipelineMode::FiveStage);
/// assert_eq!(config.pipeline.hazard_detection, HazardDetection::Disabled);
/// assert!(config.pipeline.forwarding);
/// assert_eq!(config.memory.base, 0x4000);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline shape and hazard handling
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Data memory window
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// # Arguments
    ///
    /// * `json` - The JSON text.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or `SimError::ConfigParse` describing the syntax error.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json).map_err(|e| SimError::ConfigParse(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| SimError::ConfigParse(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Initial program counter.
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u32,

    /// Cycle budget for a full run; zero means unlimited.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// Log every retired instruction at `debug` level.
    #[serde(default)]
    pub trace: bool,
}

impl GeneralConfig {
    fn default_start_pc() -> u32 {
        defaults::START_PC
    }

    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_pc: defaults::START_PC,
            max_cycles: defaults::MAX_CYCLES,
            trace: false,
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Single-cycle or five-stage execution.
    #[serde(default)]
    pub mode: PipelineMode,

    /// Data hazard detection in Decode.
    #[serde(default)]
    pub hazard_detection: HazardDetection,

    /// Bypass EX/MEM and MEM/WB results into Execute instead of stalling.
    #[serde(default)]
    pub forwarding: bool,

    /// Order in which the five stages are invoked within one cycle.
    ///
    /// A permutation of `0..5` where 0 is Fetch and 4 is Write-Back.
    #[serde(default = "PipelineConfig::default_execution_ordering")]
    pub execution_ordering: Vec<usize>,
}

impl PipelineConfig {
    fn default_execution_ordering() -> Vec<usize> {
        defaults::EXECUTION_ORDERING.to_vec()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: PipelineMode::default(),
            hazard_detection: HazardDetection::default(),
            forwarding: false,
            execution_ordering: Self::default_execution_ordering(),
        }
    }
}

/// Data memory window configuration.
///
/// Every byte of a load or store must fall within `[base, base + size)`.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Lowest valid data address.
    #[serde(default = "MemoryConfig::default_base")]
    pub base: u32,

    /// Window size in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: u64,
}

impl MemoryConfig {
    fn default_base() -> u32 {
        defaults::MEMORY_BASE
    }

    fn default_size() -> u64 {
        defaults::MEMORY_SIZE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::MEMORY_BASE,
            size: defaults::MEMORY_SIZE,
        }
    }
}
