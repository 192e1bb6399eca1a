//! The built-in arithmetic functions.

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::arith::{self, BinOp};
use crate::error::RuntimeError;
use crate::machine::Machine;
use crate::value::Value;

/// Register the arithmetic builtins: the variadic `+ - * /`, binary `^`,
/// and the root shorthands `sqrt` and `cbrt`.
pub fn install(machine: &mut Machine) {
    machine.register_native("+", |m| fold_frame(m, BinOp::Add));
    machine.register_native("-", |m| fold_frame(m, BinOp::Sub));
    machine.register_native("*", |m| fold_frame(m, BinOp::Mul));
    machine.register_native("/", |m| fold_frame(m, BinOp::Div));
    machine.register_native("^", power);
    machine.register_native("sqrt", |m| {
        m.push(Value::Real(0.5));
        power(m)
    });
    machine.register_native("cbrt", |m| {
        m.push(Value::Rational(BigRational::new(
            BigInt::from(1),
            BigInt::from(3),
        )));
        power(m)
    });
}

fn fold_frame(machine: &mut Machine, op: BinOp) -> Result<usize, RuntimeError> {
    let mut operands = Vec::with_capacity(machine.frame_len());
    for index in 0..machine.frame_len() {
        operands.push(machine.value(index as isize)?.clone());
    }
    let result = arith::fold(op, &operands)?;
    machine.push(result);
    Ok(1)
}

/// `^` takes the base at frame index 0 and the exponent at index 1, so
/// the root shorthands only have to push their fixed exponent.
fn power(machine: &mut Machine) -> Result<usize, RuntimeError> {
    if machine.frame_len() < 2 {
        return Err(RuntimeError::StackUnderflow);
    }
    let base = machine.value(0)?.clone();
    let expo = machine.value(1)?.clone();
    let result = arith::pow(&base, &expo)?;
    machine.push(result);
    Ok(1)
}
