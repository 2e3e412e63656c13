pub mod error;

use crate::interpreter::dispatch::HostValue;
use compact_str::CompactString;

/// Rendering of `Boolean(true)`.
pub const TRUE_TOKEN: &str = "真";
/// Rendering of `Boolean(false)`.
pub const FALSE_TOKEN: &str = "假";
/// Rendering of `Null`.
pub const NULL_TOKEN: &str = "空";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(CompactString),
    Boolean(bool),
    Null,
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.6}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Boolean(true) => f.write_str(TRUE_TOKEN),
            Self::Boolean(false) => f.write_str(FALSE_TOKEN),
            Self::Null => f.write_str(NULL_TOKEN),
        }
    }
}

impl Value {
    /// Numeric literals carry no lexical integer/float distinction, so integer-ness is
    /// recovered from the value itself: `4.0` becomes `Integer(4)`.
    pub fn from_number(value: f64) -> Self {
        // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
        const LOWER: f64 = i64::MIN as f64;
        const UPPER: f64 = i64::MAX as f64;
        if value.fract() == 0.0 && (LOWER..UPPER).contains(&value) {
            Self::Integer(value as i64)
        } else {
            Self::Float(value)
        }
    }

    /// Only an exact `Boolean(true)` is true. There is no numeric or string coercion.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Self::Boolean(true))
    }

    pub fn to_host(&self) -> HostValue {
        match self {
            Self::Integer(v) => HostValue::Int(*v),
            Self::Float(v) => HostValue::Float(*v),
            Self::Text(v) => HostValue::Str(v.clone()),
            Self::Boolean(v) => HostValue::Bool(*v),
            Self::Null => HostValue::None,
        }
    }
}

// Binary operators. Only integer operands have defined semantics; every other
// combination degrades to `Null`.
impl Value {
    pub fn add(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => Value::Integer(lhs.wrapping_add(*rhs)),
            _ => Value::Null,
        }
    }

    pub fn subtract(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => Value::Integer(lhs.wrapping_sub(*rhs)),
            _ => Value::Null,
        }
    }

    pub fn multiply(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => Value::Integer(lhs.wrapping_mul(*rhs)),
            _ => Value::Null,
        }
    }

    /// Division by zero yields `Integer(0)`.
    pub fn divide(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Integer(_), Value::Integer(0)) => Value::Integer(0),
            (Value::Integer(lhs), Value::Integer(rhs)) => Value::Integer(lhs.wrapping_div(*rhs)),
            _ => Value::Null,
        }
    }

    // Comparison
    pub fn greater_than(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => Value::Boolean(lhs > rhs),
            _ => Value::Null,
        }
    }

    pub fn less_than(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => Value::Boolean(lhs < rhs),
            _ => Value::Null,
        }
    }

    pub fn is_equal(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Integer(lhs), Value::Integer(rhs)) => Value::Boolean(lhs == rhs),
            _ => Value::Null,
        }
    }
}
