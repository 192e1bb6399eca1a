//! Tree-to-bytecode code generation.
//!
//! Compilation is two passes. The pre-pass collects distinct variables in
//! first-occurrence order and pins argument `i` to register `i`, so a
//! caller can load arguments positionally without consulting the string
//! table. The main pass walks the tree post-order, tracking each
//! subexpression's result register on a compile-time value stack.
//!
//! Call arguments must occupy numerically increasing adjacent registers
//! (the `CALL` operand is a base register plus a count). A call node
//! claims its target register before compiling its children, which keeps
//! sibling results adjacent in the common case; when recycling has
//! scattered them anyway, the results are reshuffled into a fresh
//! contiguous block with `MOVE`s.

use indexmap::IndexMap;
use tracing::warn;

use suanpan_bytecode::{BX_MAX, Instruction, SectionFlags, SectionType};
use suanpan_core::{Interner, NodeKind, SyntaxNode};

use crate::error::CompileError;
use crate::registers::RegisterAllocator;
use crate::writer::ContainerWriter;

/// Compile `tree` into a bytecode container.
pub fn assemble(tree: &SyntaxNode) -> Result<Vec<u8>, CompileError> {
    Assembler::new().run(tree)
}

struct Assembler {
    writer: ContainerWriter,
    strings: Interner,
    registers: RegisterAllocator,
    /// Variable name to argument register, in first-occurrence order.
    arguments: IndexMap<String, u8>,
    /// Result registers of compiled, not-yet-consumed subexpressions.
    stack: Vec<u8>,
}

impl Assembler {
    fn new() -> Self {
        Self {
            writer: ContainerWriter::new(),
            strings: Interner::new(),
            registers: RegisterAllocator::new(),
            arguments: IndexMap::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self, tree: &SyntaxNode) -> Result<Vec<u8>, CompileError> {
        let code_name = self.intern_name(".code")?;
        self.writer
            .begin_section(code_name, SectionType::Bits, SectionFlags::CODE);

        self.capture_arguments(tree)?;
        self.compile(tree)?;

        let result = self
            .stack
            .pop()
            .expect("code generation leaves exactly one result register");
        self.put(Instruction::Return { a: result });
        self.registers.free(result);

        if !self.stack.is_empty() {
            warn!(
                leftover = self.stack.len(),
                "value stack not empty after code generation"
            );
        }

        let argument_registers: Vec<u8> = self.arguments.values().copied().collect();
        for reg in argument_registers {
            self.registers.free(reg);
        }

        let stack_name = self.intern_name(".stack")?;
        self.writer.virtual_section(
            stack_name,
            SectionType::Stack,
            SectionFlags::BSS,
            u32::from(self.registers.high_water()),
        );

        if !self.registers.all_released() {
            warn!("registers still allocated at finalize");
        }

        let strtab_name = self.intern_name(".strtab")?;
        self.writer
            .begin_section(strtab_name, SectionType::Strtab, SectionFlags::DATA);
        for text in self.strings.iter() {
            self.writer.write(text.as_bytes());
            self.writer.write(&[0]);
        }

        Ok(self.writer.finish())
    }

    /// Pre-pass: bind each distinct variable to the next argument register.
    fn capture_arguments(&mut self, node: &SyntaxNode) -> Result<(), CompileError> {
        for child in node.children() {
            self.capture_arguments(child)?;
        }
        if node.kind() == NodeKind::Variable && !self.arguments.contains_key(node.symbol()) {
            let reg = self.registers.alloc()?;
            self.arguments.insert(node.symbol().to_owned(), reg);
        }
        Ok(())
    }

    fn compile(&mut self, node: &SyntaxNode) -> Result<(), CompileError> {
        match node.kind() {
            NodeKind::Constant => {
                let bx = self.intern(node.symbol())?;
                let reg = self.registers.alloc()?;
                self.put(Instruction::LoadK { a: reg, bx });
                self.stack.push(reg);
            }
            NodeKind::Variable => {
                let source = *self
                    .arguments
                    .get(node.symbol())
                    .ok_or_else(|| CompileError::NotCaptured(node.symbol().to_owned()))?;
                let reg = self.registers.alloc()?;
                self.put(Instruction::Move {
                    a: reg,
                    b: u16::from(source),
                });
                self.stack.push(reg);
            }
            NodeKind::Function => {
                let target = self.registers.alloc()?;
                for child in node.children() {
                    self.compile(child)?;
                }
                let args = self.prepare_call(node.child_count())?;
                let bx = self.intern(node.symbol())?;
                self.put(Instruction::LoadF { a: target, bx });
                self.put(Instruction::Call {
                    a: target,
                    b: args.first().copied().map(u16::from).unwrap_or(0),
                    c: node.child_count() as u16,
                });
                for reg in args {
                    self.registers.free(reg);
                }
                self.stack.push(target);
            }
        }
        Ok(())
    }

    /// Pop the argument registers for a call of `count` children and make
    /// them contiguous, reshuffling through fresh registers if needed.
    fn prepare_call(&mut self, count: usize) -> Result<Vec<u8>, CompileError> {
        let mut regs = vec![0u8; count];
        for slot in regs.iter_mut().rev() {
            *slot = self
                .stack
                .pop()
                .expect("value stack underflow while preparing a call");
        }

        let contiguous = regs
            .windows(2)
            .all(|pair| u16::from(pair[0]) + 1 == u16::from(pair[1]));
        if contiguous {
            return Ok(regs);
        }

        let block = self.registers.alloc_block(count)?;
        for (&dst, &src) in block.iter().zip(regs.iter()) {
            self.put(Instruction::Move {
                a: dst,
                b: u16::from(src),
            });
            self.registers.free(src);
        }
        Ok(block)
    }

    fn put(&mut self, instruction: Instruction) {
        self.writer.put_word(instruction.encode());
    }

    /// Intern for an 18-bit instruction operand.
    fn intern(&mut self, text: &str) -> Result<u32, CompileError> {
        let index = self.strings.intern(text).as_u32();
        if index > BX_MAX {
            return Err(CompileError::TooManyStrings);
        }
        Ok(index)
    }

    /// Intern for a 16-bit section name field.
    fn intern_name(&mut self, text: &str) -> Result<u16, CompileError> {
        let index = self.strings.intern(text).as_u32();
        u16::try_from(index).map_err(|_| CompileError::TooManyStrings)
    }
}
