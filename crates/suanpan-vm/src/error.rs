//! Runtime failures.

use suanpan_bytecode::ModuleError;
use thiserror::Error;

/// Errors surfaced while loading or executing a program.
///
/// The `invalid binary` family covers structurally valid containers whose
/// code addresses resources out of range; the loader's own checks live in
/// [`ModuleError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error(transparent)]
    Module(#[from] ModuleError),
    #[error("invalid binary: jump out of code")]
    JumpOutOfCode,
    #[error("invalid binary: unknown opcode in word {0:#010x}")]
    InvalidOpcode(u32),
    #[error("invalid binary: register {register} out of range (stack size {stack_size})")]
    InvalidRegister { register: u16, stack_size: u32 },
    #[error("invalid binary: string index {0} out of range")]
    InvalidString(u32),
    #[error("cannot decode constant `{0}`")]
    InvalidConstant(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("attempt to call a {0} value")]
    NotCallable(&'static str),
    #[error("bad argument #{index} ({expected} expected, got {got})")]
    BadArgument {
        index: usize,
        expected: &'static str,
        got: &'static str,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("recursion limit {0} exceeded")]
    RecursionLimit(usize),
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("{given} arguments exceed the callee's register file of {registers}")]
    TooManyArguments { given: usize, registers: u32 },
}
