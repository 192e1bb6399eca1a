//! Compiles expression trees into bytecode containers.
//!
//! The compiler is a single post-order pass over the tree preceded by an
//! argument-collection pre-pass; it never interprets values. Constants
//! travel as text into the string table and are decoded by whichever
//! runtime loads the container.

mod assembler;
mod error;
mod registers;
mod writer;


pub use assembler::assemble;
pub use error::CompileError;
pub use registers::{REGISTER_LIMIT, RegisterAllocator};
pub use writer::ContainerWriter;
