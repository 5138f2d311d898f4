//! Tagged value union carried by every node in the tree, plus the numeric
//! promotion and comparison rules used when two values meet at an operator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// A dynamically-typed value living at a node.
///
/// `Int`/`Float` promote into each other at arithmetic and comparison time;
/// `Bool`, `Str`, and `Null` only ever compare against their own kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::Null => "null",
        }
    }

    pub fn as_bool(&self) -> Result<bool, EvalError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(EvalError::TypeError(format!(
                "expected bool, found {}",
                other.type_name()
            ))),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    fn numeric_binop(
        &self,
        other: &Value,
        op_name: &str,
        int_op: impl Fn(i64, i64) -> Option<i64>,
        float_op: impl Fn(f64, f64) -> f64,
    ) -> Result<Value, EvalError> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
                .map(Value::Int)
                .ok_or_else(|| EvalError::TypeError(format!("integer overflow in {op_name}"))),
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                match (a, b) {
                    (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
                    _ => Err(EvalError::TypeError(format!(
                        "{op_name} requires numeric operands, found {} and {}",
                        self.type_name(),
                        other.type_name()
                    ))),
                }
            }
        }
    }

    /// Integer overflow is a `TypeError`, not silent wrapping: a wrapped
    /// value would become a misleading "cause" in a rendered justification.
    pub fn add(&self, other: &Value) -> Result<Value, EvalError> {
        self.numeric_binop(other, "+", |a, b| a.checked_add(b), |a, b| a + b)
    }

    pub fn sub(&self, other: &Value) -> Result<Value, EvalError> {
        self.numeric_binop(other, "-", |a, b| a.checked_sub(b), |a, b| a - b)
    }

    pub fn mul(&self, other: &Value) -> Result<Value, EvalError> {
        self.numeric_binop(other, "*", |a, b| a.checked_mul(b), |a, b| a * b)
    }

    /// Division always promotes to `Float`, even for two `Int` operands.
    pub fn div(&self, other: &Value) -> Result<Value, EvalError> {
        let (a, b) = match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(EvalError::TypeError(format!(
                    "/ requires numeric operands, found {} and {}",
                    self.type_name(),
                    other.type_name()
                )));
            }
        };
        if b == 0.0 {
            return Err(EvalError::DivisionByZero);
        }
        Ok(Value::Float(a / b))
    }

    /// Equality is tolerant: values of unrelated variants simply aren't
    /// equal rather than raising a type error. Numeric variants compare
    /// numerically after promotion.
    pub fn eq_val(&self, other: &Value) -> Result<bool, EvalError> {
        let result = match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        };
        Ok(result)
    }

    pub fn ne_val(&self, other: &Value) -> Result<bool, EvalError> {
        self.eq_val(other).map(|eq| !eq)
    }

    fn ordering_pair(&self, other: &Value, op_name: &str) -> Result<(f64, f64), EvalError> {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(EvalError::TypeError(format!(
                "{op_name} requires numeric operands, found {} and {}",
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    pub fn gt(&self, other: &Value) -> Result<bool, EvalError> {
        let (a, b) = self.ordering_pair(other, ">")?;
        Ok(a > b)
    }

    pub fn ge(&self, other: &Value) -> Result<bool, EvalError> {
        let (a, b) = self.ordering_pair(other, ">=")?;
        Ok(a >= b)
    }

    pub fn lt(&self, other: &Value) -> Result<bool, EvalError> {
        let (a, b) = self.ordering_pair(other, "<")?;
        Ok(a < b)
    }

    pub fn le(&self, other: &Value) -> Result<bool, EvalError> {
        let (a, b) = self.ordering_pair(other, "<=")?;
        Ok(a <= b)
    }

    pub(crate) fn require_numeric(&self) -> Result<(), EvalError> {
        match self {
            Value::Int(_) | Value::Float(_) => Ok(()),
            other => Err(EvalError::TypeError(format!(
                "expected a numeric value, found {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Null => write!(f, "Null"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_plus_int_stays_int() {
        assert_eq!(Value::Int(2).add(&Value::Int(3)).unwrap(), Value::Int(5));
    }

    #[test]
    fn int_plus_float_promotes() {
        assert_eq!(
            Value::Int(2).add(&Value::Float(0.5)).unwrap(),
            Value::Float(2.5)
        );
    }

    #[test]
    fn division_always_promotes_to_float() {
        assert_eq!(Value::Int(4).div(&Value::Int(2)).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(matches!(
            Value::Int(1).div(&Value::Int(0)),
            Err(EvalError::DivisionByZero)
        ));
    }

    #[test]
    fn arithmetic_on_non_numeric_is_a_type_error() {
        assert!(matches!(
            Value::Str("x".into()).add(&Value::Int(1)),
            Err(EvalError::TypeError(_))
        ));
    }

    #[test]
    fn equality_across_numeric_variants_compares_numerically() {
        assert!(Value::Int(4).eq_val(&Value::Float(4.0)).unwrap());
    }

    #[test]
    fn equality_across_unrelated_variants_is_false_not_an_error() {
        assert!(!Value::Bool(true).eq_val(&Value::Int(1)).unwrap());
    }

    #[test]
    fn ordering_requires_numeric_operands() {
        assert!(matches!(
            Value::Str("x".into()).gt(&Value::Str("y".into())),
            Err(EvalError::TypeError(_))
        ));
    }

    #[test]
    fn display_matches_canonical_literal_form() {
        assert_eq!(Value::Bool(false).to_string(), "False");
        assert_eq!(Value::Null.to_string(), "Null");
        assert_eq!(Value::Str("hi".into()).to_string(), "\"hi\"");
    }
}
