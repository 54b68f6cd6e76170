//! Conjugate posterior engine for advertising metrics.
//!
//! Maps priors plus observed counters to posterior parameters for CTR, CVR
//! and CPA, derives the ROAS posterior from CPA, and exposes the distribution
//! kernels needed to draw, summarize and sample those posteriors.

pub mod conjugate;
pub mod error;
pub mod family;
pub mod math;
pub mod sampling;

pub use conjugate::{
    cpa_posterior, ctr_posterior, cvr_posterior, roas_from_cpa, roas_posterior, CpaObservation,
    CtrObservation, CvrObservation, PriorSpec,
};
pub use error::{MathError, Result};
pub use family::{DistributionFamily, PosteriorParams, PosteriorSummary};
pub use math::beta::*;
pub use math::gamma::*;
pub use math::inverse_gamma::*;
pub use math::lognormal::*;
pub use math::normal::*;
pub use math::stable::{ln_beta_fn, ln_gamma};
pub use sampling::{PosteriorSampler, SampleStats, DEFAULT_SAMPLE_SIZE};
