//! Callable values.

use std::fmt;
use std::rc::Rc;

use suanpan_bytecode::{Module, ModuleError};

use crate::error::RuntimeError;
use crate::machine::Machine;

/// A host function callable from compiled code.
///
/// The callee sees its arguments as the machine's current frame and
/// returns how many results it pushed; the call protocol normalizes that
/// to at most one.
pub type NativeFn = Rc<dyn Fn(&mut Machine) -> Result<usize, RuntimeError>>;

/// Something `CALL` can invoke: a native function or another compiled
/// unit. Cloning shares the underlying callable.
#[derive(Clone)]
pub enum Closure {
    Native(NativeFn),
    Function(Rc<Module>),
}

impl Closure {
    pub fn native<F>(f: F) -> Self
    where
        F: Fn(&mut Machine) -> Result<usize, RuntimeError> + 'static,
    {
        Self::Native(Rc::new(f))
    }

    /// Wrap a compiled container, validating it once up front.
    pub fn function(bytes: Vec<u8>) -> Result<Self, ModuleError> {
        Ok(Self::Function(Rc::new(Module::from_bytes(bytes)?)))
    }
}

/// Closures compare by identity: two are equal only when they share the
/// same underlying callable.
impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => f.write_str("Closure::Native"),
            Self::Function(module) => f
                .debug_struct("Closure::Function")
                .field("instructions", &module.instruction_count())
                .finish(),
        }
    }
}
