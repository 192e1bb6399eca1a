//! Compile-time failures.

use thiserror::Error;

/// Fatal conditions during code generation.
///
/// Register and value-stack leaks at finalize are deliberately not here:
/// they indicate a generator bug, not an unusable artifact, and surface
/// as `tracing` warnings instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("all registers are allocated")]
    RegisterOverflow,
    #[error("variable `{0}` is not captured as an argument")]
    NotCaptured(String),
    #[error("string table exceeds the operand index space")]
    TooManyStrings,
}
