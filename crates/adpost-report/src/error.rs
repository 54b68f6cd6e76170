//! Error types for rendering and report assembly.

use crate::builder::BuildState;
use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while rendering plots or assembling a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Posterior parameters or curve settings outside their domain.
    #[error(transparent)]
    Math(#[from] adpost_math::MathError),

    /// Missing columns or malformed cells in an input table.
    #[error(transparent)]
    Data(#[from] adpost_common::Error),

    /// The report was already written.
    #[error("report already finalized")]
    AlreadyFinalized,

    /// An earlier failure discarded the build.
    #[error("report build was aborted by an earlier error")]
    BuildAborted,

    /// A builder operation was called in the wrong state.
    #[error("cannot {operation} while the report is {state}")]
    OutOfOrder {
        operation: &'static str,
        state: BuildState,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The narrative collaborator failed to produce text.
    #[error("narrative generation failed: {0}")]
    Narrative(String),
}

impl From<tempfile::PersistError> for ReportError {
    fn from(err: tempfile::PersistError) -> Self {
        ReportError::Io(err.error)
    }
}
