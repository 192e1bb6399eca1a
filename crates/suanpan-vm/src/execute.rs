//! The dispatch loop for compiled containers.

use suanpan_bytecode::{Instruction, Module};

use crate::error::RuntimeError;
use crate::machine::Machine;
use crate::stack::ExecutionStack;
use crate::value::Value;

/// Map a register operand to a slot in the register file.
fn slot(register: u16, stack_size: u32) -> Result<usize, RuntimeError> {
    if u32::from(register) < stack_size {
        Ok(usize::from(register))
    } else {
        Err(RuntimeError::InvalidRegister {
            register,
            stack_size,
        })
    }
}

impl Machine {
    /// Run `module` as the current frame's callee.
    ///
    /// The frame's values become the low registers, in order; the rest of
    /// the register file starts out nil. Returns the number of results
    /// pushed back onto the frame.
    pub(crate) fn execute(&mut self, module: &Module) -> Result<usize, RuntimeError> {
        let stack_size = module.stack_size();
        let argc = self.frame_len();
        if argc > stack_size as usize {
            return Err(RuntimeError::TooManyArguments {
                given: argc,
                registers: stack_size,
            });
        }

        let mut registers = ExecutionStack::with_nil(stack_size as usize);
        for index in 0..argc {
            registers.set(index, self.value(index as isize)?.clone());
        }
        self.set_top(0);

        let mut ip = 0;
        loop {
            let word = module.word(ip).ok_or(RuntimeError::JumpOutOfCode)?;
            let instruction =
                Instruction::decode(word).ok_or(RuntimeError::InvalidOpcode(word))?;
            ip += 1;

            match instruction {
                Instruction::Nop => {}
                Instruction::Move { a, b } => {
                    let from = slot(b, stack_size)?;
                    let to = slot(u16::from(a), stack_size)?;
                    let value = registers
                        .get(from)
                        .cloned()
                        .ok_or(RuntimeError::StackUnderflow)?;
                    registers.set(to, value);
                }
                Instruction::LoadK { a, bx } => {
                    let to = slot(u16::from(a), stack_size)?;
                    let text = module
                        .string(bx as usize)
                        .ok_or(RuntimeError::InvalidString(bx))?;
                    let value = Value::parse(self.lookup_constant(text), 10)
                        .ok_or_else(|| RuntimeError::InvalidConstant(text.to_owned()))?;
                    registers.set(to, value);
                }
                Instruction::LoadF { a, bx } => {
                    let to = slot(u16::from(a), stack_size)?;
                    let name = module
                        .string(bx as usize)
                        .ok_or(RuntimeError::InvalidString(bx))?;
                    let closure = self
                        .lookup_function(name)
                        .ok_or_else(|| RuntimeError::UnknownFunction(name.to_owned()))?;
                    registers.set(to, Value::Closure(closure));
                }
                Instruction::Call { a, b, c } => {
                    let target = slot(u16::from(a), stack_size)?;
                    let callee = registers
                        .get(target)
                        .cloned()
                        .ok_or(RuntimeError::StackUnderflow)?;
                    self.push(callee);
                    for offset in 0..c {
                        let from = slot(b + offset, stack_size)?;
                        let argument = registers
                            .get(from)
                            .cloned()
                            .ok_or(RuntimeError::StackUnderflow)?;
                        self.push(argument);
                    }
                    let produced = self.call(usize::from(c))?;
                    let result = if produced > 0 { self.pop()? } else { Value::Nil };
                    registers.set(target, result);
                }
                Instruction::Return { a } => {
                    let from = slot(u16::from(a), stack_size)?;
                    let value = registers
                        .get(from)
                        .cloned()
                        .ok_or(RuntimeError::StackUnderflow)?;
                    self.push(value);
                    return Ok(1);
                }
            }
        }
    }
}
