use crate::steps::StepKind;
use thiserror::Error;

/// Errors raised by the circuit-parameterization pipeline.
///
/// Every variant is terminal for the step being compiled: the inputs are
/// fixed, so retrying without changing them cannot succeed. A compilation
/// that succeeds but whose constraint count cannot be parsed is NOT an error;
/// it is reported as `CompilationResult { constraints: None, .. }`.
#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("quantized magnitude {magnitude} at precision {precision} exceeds the field sign bound")]
    PrecisionOverflow { magnitude: String, precision: u64 },

    #[error("unknown step kind `{0}` (expected forward, backward, or update)")]
    UnknownStep(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no circuit template for step `{0}`")]
    TemplateNotFound(StepKind),

    #[error("circuit template substitution failed: {0}")]
    Substitution(String),

    #[error("required dependency missing: {0}")]
    DependencyMissing(String),

    #[error("constraint compiler failed: {0}")]
    CompilationFailure(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
