//! Configuration loading and validation for adpost.
//!
//! Priors are the only configuration the posterior pipeline reads; they are
//! caller-supplied and never inferred.

pub mod priors;

pub use priors::{AdPriors, PRIORS_SCHEMA_VERSION};
