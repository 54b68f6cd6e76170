//! Posterior plots and paginated reports for ad-performance studies.
//!
//! Renders posterior densities as SVG images and assembles narrative,
//! summary tables and per-item plots into one self-contained HTML document.
//!
//! # Sections
//!
//! - Title and narrative paragraphs
//! - One section per metric: heading, summary table, one plot per item
//! - Optional diagnostics appendix with sampling checks
//!
//! # Example
//!
//! ```no_run
//! use adpost_common::{DataTable, Metric};
//! use adpost_math::PosteriorParams;
//! use adpost_report::{ReportBuilder, ReportSection};
//! use std::path::Path;
//!
//! let mut builder = ReportBuilder::with_defaults()?;
//! builder.start("CTR is holding steady.\n\nSpend is flat.")?;
//! let section = ReportSection::for_metric(Metric::Ctr, DataTable::default())
//!     .with_item("Ad A", PosteriorParams::beta(93.0, 909.0)?);
//! builder.add_section(&section)?;
//! builder.finalize(Path::new("out/report.html"))?;
//! # Ok::<(), adpost_report::ReportError>(())
//! ```

pub mod builder;
pub mod campaign;
pub mod config;
pub mod density;
pub mod diagnostics;
pub mod error;
mod html;
pub mod narrative;
pub mod plot;
pub mod sections;
pub mod semantics;

pub use builder::{BuildState, FinalizedReport, ReportBuilder, APPENDIX_TITLE, SCRATCH_PREFIX};
pub use campaign::{
    ad_posteriors, campaign_ctr_section, performance_summary, summary_table, AdPosteriors,
    CampaignPipeline, CampaignSections, DiagnosticsPlan,
};
pub use config::{PlotStyle, ReportConfig, ReportTheme};
pub use density::{
    render_curve, render_curve_tagged, support_window, trapezoid_area, DensityCurve,
    DEFAULT_CURVE_POINTS,
};
pub use diagnostics::PosteriorCheck;
pub use error::{ReportError, Result};
pub use narrative::{paragraphs, NarrativeSource, StaticNarrative};
pub use plot::{rasterize, rasterize_histogram, save_plot, save_posterior_plot, AxisLabels};
pub use sections::{DiagnosticEntry, DiagnosticImage, ItemPosterior, ReportSection};
pub use semantics::{explain_prior_impact, summarize_posterior_changes};
