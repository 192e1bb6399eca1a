//! The resizable value stack backing both the machine's operand stack
//! and each call's register file.

use crate::value::Value;

#[derive(Debug, Default)]
pub struct ExecutionStack {
    values: Vec<Value>,
}

impl ExecutionStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack of `len` nil slots, used as a register file.
    pub fn with_nil(len: usize) -> Self {
        Self {
            values: vec![Value::Nil; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Value> {
        self.values.pop()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: Value) {
        self.values[index] = value;
    }

    /// Push a copy of the value at `index`.
    pub fn duplicate(&mut self, index: usize) {
        let value = self.values[index].clone();
        self.values.push(value);
    }

    /// Swap the top value with the one at `index`.
    pub fn exchange(&mut self, index: usize) {
        let top = self.values.len() - 1;
        self.values.swap(index, top);
    }

    /// Move the top value into position `index`, shifting the rest up.
    pub fn insert(&mut self, index: usize) {
        if let Some(value) = self.values.pop() {
            self.values.insert(index, value);
        }
    }

    /// Remove and return the value at `index`.
    pub fn remove(&mut self, index: usize) -> Value {
        self.values.remove(index)
    }

    /// Grow with nil or shrink to exactly `len` values.
    pub fn resize(&mut self, len: usize) {
        self.values.resize(len, Value::Nil);
    }
}
