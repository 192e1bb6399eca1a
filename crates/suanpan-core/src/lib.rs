//! Core data structures shared by the suanpan compiler and virtual machine.

pub mod ast;
pub mod interner;

#[cfg(test)]
mod interner_tests;

pub use ast::{NodeKind, SyntaxNode};
pub use interner::{Interner, Symbol};
