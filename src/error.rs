//! Flat error vocabulary for building, evaluating, and persisting trees.

use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("type error: {0}")]
    TypeError(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("key not found: {0:?}")]
    KeyNotFound(Value),

    #[error("builder state error: {0}")]
    BuilderStateError(String),

    #[error("argument error: {0}")]
    ArgumentError(String),

    #[error("integrity error: {0}")]
    IntegrityError(String),
}
