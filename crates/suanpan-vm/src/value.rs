//! Tagged values and literal decoding.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Pow, Zero};

use crate::closure::Closure;

/// Value kind, ordered by numeric promotion rank.
///
/// `Integer < Rational < Real`; promotion is one-directional and a value
/// is never demoted, so `6/3` stays a rational even though it is whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    Nil,
    Closure,
    Integer,
    Rational,
    Real,
}

/// A runtime value: an empty slot, a callable, or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Closure(Closure),
    Integer(BigInt),
    Rational(BigRational),
    Real(f64),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Nil => Kind::Nil,
            Self::Closure(_) => Kind::Closure,
            Self::Integer(_) => Kind::Integer,
            Self::Rational(_) => Kind::Rational,
            Self::Real(_) => Kind::Real,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind() {
            Kind::Nil => "nil",
            Kind::Closure => "closure",
            Kind::Integer => "integer",
            Kind::Rational => "rational",
            Kind::Real => "real",
        }
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Rational(_) | Self::Real(_))
    }

    /// Decode a constant literal in the given radix.
    ///
    /// Text with a `.` becomes an exact rational over `radix^k` where `k`
    /// is the number of fractional digits; text with a `/` parses as a
    /// reduced fraction; anything else parses as an integer. Decoding
    /// never yields a real: exactness is surrendered only by arithmetic.
    pub fn parse(text: &str, radix: u32) -> Option<Self> {
        if let Some(dot) = text.find('.') {
            let digits: String = text[..dot].chars().chain(text[dot + 1..].chars()).collect();
            let scale = text.len() - dot - 1;
            let numer = BigInt::parse_bytes(digits.as_bytes(), radix)?;
            let denom = BigInt::from(radix).pow(scale as u32);
            Some(Self::Rational(BigRational::new(numer, denom)))
        } else if let Some(slash) = text.find('/') {
            let numer = BigInt::parse_bytes(text[..slash].as_bytes(), radix)?;
            let denom = BigInt::parse_bytes(text[slash + 1..].as_bytes(), radix)?;
            if denom.is_zero() {
                return None;
            }
            Some(Self::Rational(BigRational::new(numer, denom)))
        } else {
            BigInt::parse_bytes(text.as_bytes(), radix).map(Self::Integer)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Closure(_) => f.write_str("<closure>"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Rational(r) => write!(f, "{r}"),
            Self::Real(x) => write!(f, "{x}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(BigInt::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}
