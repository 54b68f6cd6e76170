//! Report section data structures.

pub mod appendix;
pub mod metric;

pub use appendix::{DiagnosticEntry, DiagnosticImage};
pub use metric::{ItemPosterior, ReportSection};
