//! Stack-based virtual machine for compiled expression containers.
//!
//! The host-facing surface is [`Machine`]: an operand stack with a frame
//! watermark, a registry of named callables, and a uniform call protocol
//! that treats native functions and nested compiled units identically.
//! Values follow a one-directional numeric tower: integers promote to
//! rationals promote to reals, never back.

mod arith;
mod closure;
mod error;
mod execute;
mod machine;
mod stack;
mod stdlib;
mod value;

#[cfg(test)]
mod stack_tests;

pub use arith::{BinOp, fold, pow};
pub use closure::{Closure, NativeFn};
pub use error::RuntimeError;
pub use machine::{DEFAULT_RECURSION_LIMIT, Machine};
pub use stack::ExecutionStack;
pub use value::{Kind, Value};
