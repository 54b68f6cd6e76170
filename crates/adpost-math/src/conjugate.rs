//! Closed-form conjugate updates for ad metrics.
//!
//! Every update is pure bookkeeping of sufficient statistics:
//!
//! - CTR: `Beta(α + clicks, β + impressions − clicks)` (Beta–Binomial)
//! - CVR: `Beta(α + conversions, β + clicks − conversions)` (Beta–Binomial)
//! - CPA: `InvGamma(α + conversions, β + total_cost)`
//! - ROAS: `Gamma(α_cpa, revenue_per_conversion / β_cpa)`, derived from CPA
//!
//! The ROAS identity: if `CPA ~ InvGamma(α, β)` then `1/CPA ~ Gamma(α, scale = 1/β)`,
//! so `r / CPA ~ Gamma(α, scale = r/β)`. No new data enters that step.

use crate::error::{require_non_negative, require_positive, MathError, Result};
use crate::family::{DistributionFamily, PosteriorParams};
use serde::{Deserialize, Serialize};

/// Shape pair `(α, β)` of a conjugate prior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorSpec {
    pub alpha: f64,
    pub beta: f64,
}

impl PriorSpec {
    /// Build a prior, rejecting non-positive or non-finite parameters.
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        let prior = Self { alpha, beta };
        prior.validate()?;
        Ok(prior)
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("prior_alpha", self.alpha)?;
        require_positive("prior_beta", self.beta)?;
        Ok(())
    }
}

/// CTR posterior from clicks out of impressions.
pub fn ctr_posterior(prior: &PriorSpec, clicks: f64, impressions: f64) -> Result<PosteriorParams> {
    prior.validate()?;
    let clicks = require_non_negative("clicks", clicks)?;
    let impressions = require_non_negative("impressions", impressions)?;
    if clicks > impressions {
        return Err(MathError::invalid(
            "clicks",
            format!("clicks ({clicks}) exceed impressions ({impressions})"),
        ));
    }
    PosteriorParams::beta(prior.alpha + clicks, prior.beta + (impressions - clicks))
}

/// CVR posterior from conversions out of clicks.
pub fn cvr_posterior(prior: &PriorSpec, conversions: f64, clicks: f64) -> Result<PosteriorParams> {
    prior.validate()?;
    let conversions = require_non_negative("conversions", conversions)?;
    let clicks = require_non_negative("clicks", clicks)?;
    if conversions > clicks {
        return Err(MathError::invalid(
            "conversions",
            format!("conversions ({conversions}) exceed clicks ({clicks})"),
        ));
    }
    PosteriorParams::beta(prior.alpha + conversions, prior.beta + (clicks - conversions))
}

/// CPA posterior: each conversion adds one unit of shape, each unit of cost one unit of scale.
pub fn cpa_posterior(prior: &PriorSpec, conversions: f64, total_cost: f64) -> Result<PosteriorParams> {
    prior.validate()?;
    let conversions = require_non_negative("conversions", conversions)?;
    let total_cost = require_non_negative("total_cost", total_cost)?;
    PosteriorParams::inverse_gamma(prior.alpha + conversions, prior.beta + total_cost)
}

/// ROAS posterior re-expressed from CPA posterior parameters.
pub fn roas_posterior(
    alpha_cpa: f64,
    beta_cpa: f64,
    revenue_per_conversion: f64,
) -> Result<PosteriorParams> {
    let shape = require_positive("alpha_cpa", alpha_cpa)?;
    let beta_cpa = require_positive("beta_cpa", beta_cpa)?;
    let revenue = require_positive("revenue_per_conversion", revenue_per_conversion)?;
    PosteriorParams::gamma(shape, revenue / beta_cpa)
}

/// [`roas_posterior`] taking the CPA posterior itself.
pub fn roas_from_cpa(cpa: &PosteriorParams, revenue_per_conversion: f64) -> Result<PosteriorParams> {
    if cpa.family() != DistributionFamily::InverseGamma {
        return Err(MathError::invalid(
            "cpa",
            format!("expected an inverse-gamma posterior, got {}", cpa.family()),
        ));
    }
    roas_posterior(cpa.p1(), cpa.p2(), revenue_per_conversion)
}

/// Clicks out of impressions for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CtrObservation {
    pub clicks: f64,
    pub impressions: f64,
}

impl CtrObservation {
    pub fn posterior(&self, prior: &PriorSpec) -> Result<PosteriorParams> {
        ctr_posterior(prior, self.clicks, self.impressions)
    }

    /// Observed clicks / impressions, `None` without impressions.
    pub fn observed_rate(&self) -> Option<f64> {
        (self.impressions > 0.0).then(|| self.clicks / self.impressions)
    }
}

/// Conversions out of clicks for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CvrObservation {
    pub conversions: f64,
    pub clicks: f64,
}

impl CvrObservation {
    pub fn posterior(&self, prior: &PriorSpec) -> Result<PosteriorParams> {
        cvr_posterior(prior, self.conversions, self.clicks)
    }

    pub fn observed_rate(&self) -> Option<f64> {
        (self.clicks > 0.0).then(|| self.conversions / self.clicks)
    }
}

/// Conversions and total spend for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpaObservation {
    pub conversions: f64,
    pub total_cost: f64,
}

impl CpaObservation {
    pub fn posterior(&self, prior: &PriorSpec) -> Result<PosteriorParams> {
        cpa_posterior(prior, self.conversions, self.total_cost)
    }

    /// Observed cost / conversions, `None` without conversions.
    pub fn observed_cpa(&self) -> Option<f64> {
        (self.conversions > 0.0).then(|| self.total_cost / self.conversions)
    }
}
