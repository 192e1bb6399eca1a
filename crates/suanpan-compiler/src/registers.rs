//! Compile-time register allocation.
//!
//! Registers are bump-allocated with a FIFO free list for recycling. The
//! high-water mark becomes the `.stack` section size, so recycling
//! directly shrinks the register file the interpreter must provision.
//! Freeing is a compile-time discipline: nothing checks for double frees
//! or reads of freed registers.

use std::collections::VecDeque;

use crate::error::CompileError;

/// Registers are addressed by an 8-bit instruction operand.
pub const REGISTER_LIMIT: u16 = 256;

#[derive(Debug, Default)]
pub struct RegisterAllocator {
    free: VecDeque<u8>,
    next: u16,
}

impl RegisterAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a recycled register, or the next unissued one.
    pub fn alloc(&mut self) -> Result<u8, CompileError> {
        if let Some(reg) = self.free.pop_front() {
            return Ok(reg);
        }
        if self.next >= REGISTER_LIMIT {
            return Err(CompileError::RegisterOverflow);
        }
        let reg = self.next as u8;
        self.next += 1;
        Ok(reg)
    }

    /// Hand out `len` numerically contiguous registers.
    ///
    /// Blocks always come from unissued numbers: the free list holds
    /// scattered registers and cannot guarantee a run.
    pub fn alloc_block(&mut self, len: usize) -> Result<Vec<u8>, CompileError> {
        if self.next as usize + len > REGISTER_LIMIT as usize {
            return Err(CompileError::RegisterOverflow);
        }
        let start = self.next;
        self.next += len as u16;
        Ok((start..self.next).map(|reg| reg as u8).collect())
    }

    /// Return a register to the free list.
    pub fn free(&mut self, reg: u8) {
        self.free.push_back(reg);
    }

    /// Highest register count ever live; the register-file size.
    pub fn high_water(&self) -> u16 {
        self.next
    }

    /// True when every issued register has been freed.
    pub fn all_released(&self) -> bool {
        self.free.len() == self.next as usize
    }
}
