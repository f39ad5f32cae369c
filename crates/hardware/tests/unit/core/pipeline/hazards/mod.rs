/// Branch and jump misprediction recovery.
pub mod control_hazards;

/// Operand bypassing into Execute.
pub mod data_forwarding;
