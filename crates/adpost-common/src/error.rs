//! Error types for table handling and configuration.
//!
//! Errors carry a stable numeric code and a category so that callers can
//! group failures without matching on message text:
//! - 10-19: configuration
//! - 20-29: input tables
//! - 30-39: posterior math
//! - 60-69: I/O and serialization

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for adpost common operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Priors or other configuration.
    Config,
    /// Malformed or incomplete input tables.
    Input,
    /// Parameter domain violations.
    Math,
    /// File I/O and serialization.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Math => write!(f, "math"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for adpost common operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid priors: {0}")]
    InvalidPriors(String),

    #[error("missing required column: {column}")]
    MissingColumn { column: String },

    #[error("invalid value in column '{column}' at row {row}: {reason}")]
    InvalidCell {
        column: String,
        row: usize,
        reason: String,
    },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Math(#[from] adpost_math::MathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable error code.
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidPriors(_) => 11,
            Error::MissingColumn { .. } => 20,
            Error::InvalidCell { .. } => 21,
            Error::RaggedRow { .. } => 22,
            Error::Math(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidPriors(_) => ErrorCategory::Config,
            Error::MissingColumn { .. } | Error::InvalidCell { .. } | Error::RaggedRow { .. } => {
                ErrorCategory::Input
            }
            Error::Math(_) => ErrorCategory::Math,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_the_column() {
        let err = Error::MissingColumn {
            column: "revenue".to_string(),
        };
        assert_eq!(err.to_string(), "missing required column: revenue");
        assert_eq!(err.code(), 20);
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    #[test]
    fn math_errors_pass_through_transparently() {
        let inner = adpost_math::MathError::UnknownDistributionFamily("weibull".into());
        let err: Error = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert_eq!(err.category(), ErrorCategory::Math);
    }
}
