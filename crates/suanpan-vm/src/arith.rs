//! Numeric operations over the value tower.
//!
//! Operands are combined pairwise at the rank of the wider kind. The
//! promotion is one-directional: an integer widens to a rational and a
//! rational to a real, but results are never narrowed back, even when
//! they happen to be whole.

use num_rational::BigRational;
use num_traits::{Pow, Signed, ToPrimitive, Zero};

use crate::error::RuntimeError;
use crate::value::{Kind, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

fn to_rational(value: &Value) -> BigRational {
    match value {
        Value::Integer(i) => BigRational::from_integer(i.clone()),
        Value::Rational(r) => r.clone(),
        _ => unreachable!("operand was checked to be exact"),
    }
}

fn to_real(value: &Value) -> f64 {
    match value {
        Value::Integer(i) => i.to_f64().unwrap_or(f64::NAN),
        Value::Rational(r) => r.to_f64().unwrap_or(f64::NAN),
        Value::Real(x) => *x,
        _ => unreachable!("operand was checked to be numeric"),
    }
}

fn check_number(index: usize, value: &Value) -> Result<(), RuntimeError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(RuntimeError::BadArgument {
            index,
            expected: "number",
            got: value.kind_name(),
        })
    }
}

fn combine(op: BinOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let mut rank = lhs.kind().max(rhs.kind());
    // Integer division would truncate, so it runs one rank up.
    if op == BinOp::Div && rank == Kind::Integer {
        rank = Kind::Rational;
    }
    match rank {
        Kind::Integer => {
            let (Value::Integer(a), Value::Integer(b)) = (lhs, rhs) else {
                unreachable!("rank is the maximum of both kinds");
            };
            Ok(Value::Integer(match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => unreachable!("integer division is promoted"),
            }))
        }
        Kind::Rational => {
            let a = to_rational(lhs);
            let b = to_rational(rhs);
            Ok(Value::Rational(match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => {
                    if b.is_zero() {
                        return Err(RuntimeError::DivisionByZero);
                    }
                    a / b
                }
            }))
        }
        // Real arithmetic follows IEEE 754, including division by zero.
        Kind::Real => {
            let a = to_real(lhs);
            let b = to_real(rhs);
            Ok(Value::Real(match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
            }))
        }
        Kind::Nil | Kind::Closure => unreachable!("operands were checked to be numeric"),
    }
}

/// Fold `op` over `operands` left to right, so `fold(Sub, [1, 2, 3])`
/// is `(1 - 2) - 3`. A single operand is returned unchanged, except that
/// unary `-` negates and unary `/` inverts.
pub fn fold(op: BinOp, operands: &[Value]) -> Result<Value, RuntimeError> {
    let (first, rest) = operands.split_first().ok_or(RuntimeError::StackUnderflow)?;
    check_number(1, first)?;
    if rest.is_empty() {
        return match op {
            BinOp::Sub => combine(BinOp::Sub, &Value::from(0), first),
            BinOp::Div => combine(BinOp::Div, &Value::from(1), first),
            BinOp::Add | BinOp::Mul => Ok(first.clone()),
        };
    }
    let mut accumulator = first.clone();
    for (offset, operand) in rest.iter().enumerate() {
        check_number(offset + 2, operand)?;
        accumulator = combine(op, &accumulator, operand)?;
    }
    Ok(accumulator)
}

/// Raise `base` to `expo`.
///
/// An integer exponent that fits a machine word is applied exactly on the
/// base's own representation; everything else goes through real
/// exponentiation.
pub fn pow(base: &Value, expo: &Value) -> Result<Value, RuntimeError> {
    check_number(1, base)?;
    check_number(2, expo)?;
    if let Value::Integer(e) = expo {
        if !e.is_negative() {
            if let Some(e) = e.to_u32() {
                return Ok(match base {
                    Value::Integer(b) => Value::Integer(b.pow(e)),
                    Value::Rational(b) => Value::Rational(BigRational::new(
                        b.numer().pow(e),
                        b.denom().pow(e),
                    )),
                    Value::Real(b) => real_pow(*b, e as f64),
                    _ => unreachable!("base was checked to be numeric"),
                });
            }
        }
    }
    Ok(real_pow(to_real(base), to_real(expo)))
}

fn real_pow(base: f64, expo: f64) -> Value {
    if expo.fract() == 0.0 && expo.abs() <= i32::MAX as f64 {
        Value::Real(base.powi(expo as i32))
    } else {
        Value::Real(base.powf(expo))
    }
}
