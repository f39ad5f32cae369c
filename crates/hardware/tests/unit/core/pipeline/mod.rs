/// Orchestrator: construction, flush precedence, emptiness and completion.
pub mod engine;

/// Data and control hazard handling.
pub mod hazards;
