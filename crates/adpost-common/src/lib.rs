//! adpost common types and errors.
//!
//! This crate provides the input-side types shared by the report pipeline:
//! - Column-named data tables handed over by data collaborators
//! - Typed per-item ad observations extracted from those tables
//! - Metric identities and their display labels
//! - Priors configuration loading and validation

pub mod config;
pub mod error;
pub mod metric;
pub mod observation;
pub mod table;

pub use config::{AdPriors, PRIORS_SCHEMA_VERSION};
pub use error::{Error, ErrorCategory, Result};
pub use metric::Metric;
pub use observation::{ad_records, ctr_observations, AdRecord, LabeledCtr, AD_METRIC_COLUMNS};
pub use table::{Cell, DataTable};
