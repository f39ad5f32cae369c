//! # Unit Components
//!
//! This module mirrors the layout of the library sources: the processor core,
//! ISA definitions, memories, configuration and the simulation driver.
