//! Bytecode container format for compiled expressions.
//!
//! A compiled expression is a single self-describing binary: a 16-byte
//! header followed by typed sections. The `.code` section holds 32-bit
//! instruction words, `.stack` is a virtual section declaring the register
//! file size, and `.strtab` carries every string the code references
//! (constant literals, callable names, and the section names themselves).

mod checksum;
mod container;
mod dump;
mod instruction;
mod module;

#[cfg(test)]
pub(crate) mod testutil;

#[cfg(test)]
mod checksum_tests;
#[cfg(test)]
mod module_tests;

pub use checksum::checksum;
pub use container::{
    HEADER_SIZE, Header, MAGIC, Note, SECTION_ALIGN, SECTION_HEADER_SIZE, Section, SectionFlags,
    SectionType, align_up,
};
pub use dump::{decode_code, disassemble};
pub use instruction::{BX_MAX, INSTRUCTION_SIZE, Instruction, Opcode};
pub use module::{Module, ModuleError, SectionView};
