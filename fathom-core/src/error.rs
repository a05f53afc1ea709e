//! Error types shared by the numeric primitives.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NumericError {
    /// Input string is not a valid decimal or scientific-notation literal.
    #[error("malformed numeric literal: {0:?}")]
    Parse(String),

    /// Division by a zero-valued fixed-point decimal.
    #[error("division by zero")]
    DivisionByZero,
}
