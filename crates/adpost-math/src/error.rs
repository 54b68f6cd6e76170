//! Error types for posterior computation.

use thiserror::Error;

/// Result type for math operations.
pub type Result<T> = std::result::Result<T, MathError>;

/// Errors raised by the posterior engine, transforms, and distribution helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// A prior, observation, or distribution parameter is outside its domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A distribution family tag that no kernel understands.
    #[error("unknown distribution family: {0:?}")]
    UnknownDistributionFamily(String),
}

impl MathError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        MathError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Require a finite, strictly positive value.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MathError::invalid(
            name,
            format!("must be finite and > 0 (got {value})"),
        ))
    }
}

/// Require a finite, non-negative count or amount.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MathError::invalid(
            name,
            format!("must be finite and >= 0 (got {value})"),
        ))
    }
}
