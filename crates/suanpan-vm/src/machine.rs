//! The host-facing machine: operand stack, registries and call protocol.

use std::collections::HashMap;

use crate::closure::Closure;
use crate::error::RuntimeError;
use crate::stack::ExecutionStack;
use crate::stdlib;
use crate::value::Value;

/// Default bound on nested `CALL` depth.
pub const DEFAULT_RECURSION_LIMIT: usize = 1024;

/// An execution context.
///
/// The operand stack is partitioned by a frame watermark: indices passed
/// to the accessors are frame-relative, with negative indices counting
/// down from the top (`-1` is the topmost value). During a call the
/// callee's frame holds exactly its arguments.
pub struct Machine {
    stack: ExecutionStack,
    frame_base: usize,
    functions: HashMap<String, Closure>,
    constants: HashMap<String, String>,
    depth: usize,
    recursion_limit: usize,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// A machine with empty registries.
    pub fn new() -> Self {
        Self {
            stack: ExecutionStack::new(),
            frame_base: 0,
            functions: HashMap::new(),
            constants: HashMap::new(),
            depth: 0,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// A machine with the arithmetic stdlib installed.
    pub fn with_stdlib() -> Self {
        let mut machine = Self::new();
        stdlib::install(&mut machine);
        machine
    }

    pub fn set_recursion_limit(&mut self, limit: usize) {
        self.recursion_limit = limit;
    }

    /// Make `closure` resolvable by `LOADF name`.
    pub fn register(&mut self, name: &str, closure: Closure) {
        self.functions.insert(name.to_owned(), closure);
    }

    pub fn register_native<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&mut Machine) -> Result<usize, RuntimeError> + 'static,
    {
        self.register(name, Closure::native(f));
    }

    /// Register a compiled container as a named callable.
    pub fn register_function(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), RuntimeError> {
        let closure = Closure::function(bytes)?;
        self.register(name, closure);
        Ok(())
    }

    /// Bind a named constant to a literal; `LOADK` consults this table
    /// before decoding the interned text itself.
    pub fn set_constant(&mut self, name: &str, literal: &str) {
        self.constants.insert(name.to_owned(), literal.to_owned());
    }

    pub(crate) fn lookup_function(&self, name: &str) -> Option<Closure> {
        self.functions.get(name).cloned()
    }

    pub(crate) fn lookup_constant<'a>(&'a self, name: &'a str) -> &'a str {
        self.constants.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Number of values in the current frame.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.stack.len() - self.frame_base
    }

    fn absolute(&self, index: isize) -> Result<usize, RuntimeError> {
        let frame = self.frame_len() as isize;
        let relative = if index < 0 { frame + index } else { index };
        if relative < 0 || relative >= frame {
            return Err(RuntimeError::StackUnderflow);
        }
        Ok(self.frame_base + relative as usize)
    }

    /// Borrow the frame value at `index`.
    pub fn value(&self, index: isize) -> Result<&Value, RuntimeError> {
        let at = self.absolute(index)?;
        self.stack.get(at).ok_or(RuntimeError::StackUnderflow)
    }

    /// Push onto the current frame.
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop from the current frame; the frame base is a floor.
    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        if self.frame_len() == 0 {
            return Err(RuntimeError::StackUnderflow);
        }
        self.stack.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Force the frame to exactly `len` values, padding with nil.
    pub fn set_top(&mut self, len: usize) {
        self.stack.resize(self.frame_base + len);
    }

    /// Push a copy of the frame value at `index`.
    pub fn duplicate(&mut self, index: isize) -> Result<(), RuntimeError> {
        let at = self.absolute(index)?;
        self.stack.duplicate(at);
        Ok(())
    }

    /// Swap the top of the frame with the value at `index`.
    pub fn exchange(&mut self, index: isize) -> Result<(), RuntimeError> {
        let at = self.absolute(index)?;
        self.stack.exchange(at);
        Ok(())
    }

    /// Move the top of the frame into position `index`.
    pub fn insert(&mut self, index: isize) -> Result<(), RuntimeError> {
        let at = self.absolute(index)?;
        self.stack.insert(at);
        Ok(())
    }

    /// Remove and return the frame value at `index`.
    pub fn remove(&mut self, index: isize) -> Result<Value, RuntimeError> {
        let at = self.absolute(index)?;
        Ok(self.stack.remove(at))
    }

    /// Push a compiled container as an anonymous callable.
    pub fn load(&mut self, bytes: Vec<u8>) -> Result<(), RuntimeError> {
        let closure = Closure::function(bytes)?;
        self.push(Value::Closure(closure));
        Ok(())
    }

    /// Invoke the callable sitting under `args` values on the stack.
    ///
    /// On success the callee and arguments are gone, replaced by the
    /// result if one was produced; the return value is the normalized
    /// result count (0 or 1).
    pub fn call(&mut self, args: usize) -> Result<usize, RuntimeError> {
        if self.frame_len() < args + 1 {
            return Err(RuntimeError::StackUnderflow);
        }
        let callee_at = self.stack.len() - args - 1;
        let callee = match self.stack.get(callee_at) {
            Some(Value::Closure(closure)) => closure.clone(),
            Some(other) => return Err(RuntimeError::NotCallable(other.kind_name())),
            None => return Err(RuntimeError::StackUnderflow),
        };
        if self.depth >= self.recursion_limit {
            return Err(RuntimeError::RecursionLimit(self.recursion_limit));
        }

        let saved_base = self.frame_base;
        self.frame_base = callee_at + 1;
        self.depth += 1;
        let outcome = match &callee {
            Closure::Native(f) => f.as_ref()(self),
            Closure::Function(module) => self.execute(module),
        };
        self.depth -= 1;

        let produced = match outcome {
            Ok(produced) => produced,
            Err(error) => {
                self.frame_base = saved_base;
                return Err(error);
            }
        };

        // Normalize to at most one result: keep the topmost pushed value.
        let delivered = produced > 0 && self.frame_len() > 0;
        if delivered {
            self.insert(0)?;
            self.set_top(1);
        } else {
            self.set_top(0);
        }
        self.frame_base = saved_base;
        self.stack.remove(callee_at);
        Ok(usize::from(delivered))
    }
}
