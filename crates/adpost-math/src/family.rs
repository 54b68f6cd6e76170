//! Distribution families and posterior parameter values.

use crate::error::{require_positive, MathError, Result};
use crate::math::beta::{beta_inv_cdf, beta_mean, beta_pdf};
use crate::math::gamma::{gamma_inv_cdf, gamma_mean, gamma_pdf};
use crate::math::inverse_gamma::{inv_gamma_inv_cdf, inv_gamma_mean, inv_gamma_pdf};
use crate::math::lognormal::{lognormal_inv_cdf, lognormal_mean, lognormal_pdf};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Two-parameter families a posterior can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistributionFamily {
    /// `Beta(α, β)` over rates.
    #[serde(rename = "beta")]
    Beta,
    /// `InvGamma(shape, scale)` over costs.
    #[serde(rename = "inverse-gamma")]
    InverseGamma,
    /// `Gamma(shape, scale)` over ratios.
    #[serde(rename = "gamma")]
    Gamma,
    /// `LogNormal(μ, σ)` with log-space location and scale.
    #[serde(rename = "lognormal")]
    LogNormal,
}

impl DistributionFamily {
    /// Canonical tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionFamily::Beta => "beta",
            DistributionFamily::InverseGamma => "inverse-gamma",
            DistributionFamily::Gamma => "gamma",
            DistributionFamily::LogNormal => "lognormal",
        }
    }
}

impl fmt::Display for DistributionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionFamily {
    type Err = MathError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "beta" => Ok(DistributionFamily::Beta),
            "inverse-gamma" | "invgamma" => Ok(DistributionFamily::InverseGamma),
            "gamma" => Ok(DistributionFamily::Gamma),
            "lognormal" | "lognorm" => Ok(DistributionFamily::LogNormal),
            _ => Err(MathError::UnknownDistributionFamily(tag.to_string())),
        }
    }
}

/// A fully specified distribution: `(family, p1, p2)`.
///
/// | family          | p1        | p2        |
/// |-----------------|-----------|-----------|
/// | `beta`          | α         | β         |
/// | `inverse-gamma` | shape α   | scale β   |
/// | `gamma`         | shape     | scale     |
/// | `lognormal`     | μ (log)   | σ (log)   |
///
/// Construction validates the parameters, so every value of this type
/// describes a proper distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct PosteriorParams {
    family: DistributionFamily,
    p1: f64,
    p2: f64,
}

#[derive(Deserialize)]
struct RawParams {
    family: DistributionFamily,
    p1: f64,
    p2: f64,
}

impl TryFrom<RawParams> for PosteriorParams {
    type Error = MathError;

    fn try_from(raw: RawParams) -> Result<Self> {
        PosteriorParams::new(raw.family, raw.p1, raw.p2)
    }
}

impl PosteriorParams {
    /// Validate and build a parameter triple.
    pub fn new(family: DistributionFamily, p1: f64, p2: f64) -> Result<Self> {
        match family {
            DistributionFamily::Beta => {
                require_positive("alpha", p1)?;
                require_positive("beta", p2)?;
            }
            DistributionFamily::InverseGamma | DistributionFamily::Gamma => {
                require_positive("shape", p1)?;
                require_positive("scale", p2)?;
            }
            DistributionFamily::LogNormal => {
                if !p1.is_finite() {
                    return Err(MathError::invalid("mu", format!("must be finite (got {p1})")));
                }
                require_positive("sigma", p2)?;
            }
        }
        Ok(Self { family, p1, p2 })
    }

    /// Build from a textual family tag.
    pub fn from_tag(tag: &str, p1: f64, p2: f64) -> Result<Self> {
        Self::new(tag.parse()?, p1, p2)
    }

    pub fn beta(alpha: f64, beta: f64) -> Result<Self> {
        Self::new(DistributionFamily::Beta, alpha, beta)
    }

    pub fn inverse_gamma(shape: f64, scale: f64) -> Result<Self> {
        Self::new(DistributionFamily::InverseGamma, shape, scale)
    }

    pub fn gamma(shape: f64, scale: f64) -> Result<Self> {
        Self::new(DistributionFamily::Gamma, shape, scale)
    }

    pub fn lognormal(mu: f64, sigma: f64) -> Result<Self> {
        Self::new(DistributionFamily::LogNormal, mu, sigma)
    }

    pub fn family(&self) -> DistributionFamily {
        self.family
    }

    pub fn p1(&self) -> f64 {
        self.p1
    }

    pub fn p2(&self) -> f64 {
        self.p2
    }

    /// `(p1, p2)` as a pair.
    pub fn params(&self) -> (f64, f64) {
        (self.p1, self.p2)
    }

    /// Probability density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        match self.family {
            DistributionFamily::Beta => beta_pdf(x, self.p1, self.p2),
            DistributionFamily::InverseGamma => inv_gamma_pdf(x, self.p1, self.p2),
            DistributionFamily::Gamma => gamma_pdf(x, self.p1, 1.0 / self.p2),
            DistributionFamily::LogNormal => lognormal_pdf(x, self.p1, self.p2),
        }
    }

    /// Analytic mean; `None` for an inverse-gamma with shape ≤ 1.
    pub fn mean(&self) -> Option<f64> {
        match self.family {
            DistributionFamily::Beta => Some(beta_mean(self.p1, self.p2)),
            DistributionFamily::InverseGamma => inv_gamma_mean(self.p1, self.p2),
            DistributionFamily::Gamma => Some(gamma_mean(self.p1, 1.0 / self.p2)),
            DistributionFamily::LogNormal => Some(lognormal_mean(self.p1, self.p2)),
        }
    }

    /// Quantile function.
    pub fn quantile(&self, p: f64) -> f64 {
        match self.family {
            DistributionFamily::Beta => beta_inv_cdf(p, self.p1, self.p2),
            DistributionFamily::InverseGamma => inv_gamma_inv_cdf(p, self.p1, self.p2),
            DistributionFamily::Gamma => gamma_inv_cdf(p, self.p1, 1.0 / self.p2),
            DistributionFamily::LogNormal => lognormal_inv_cdf(p, self.p1, self.p2),
        }
    }

    /// Mean plus the equal-tailed credible interval holding `mass`.
    pub fn summary(&self, mass: f64) -> Result<PosteriorSummary> {
        if !(mass > 0.0 && mass < 1.0) {
            return Err(MathError::invalid(
                "mass",
                format!("credible mass must be in (0, 1) (got {mass})"),
            ));
        }
        let tail = 0.5 * (1.0 - mass);
        Ok(PosteriorSummary {
            mean: self.mean(),
            lower: self.quantile(tail),
            upper: self.quantile(1.0 - tail),
            mass,
        })
    }
}

impl fmt::Display for PosteriorParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.family, self.p1, self.p2)
    }
}

/// Point and interval summary of a posterior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSummary {
    /// Analytic mean, when it exists.
    pub mean: Option<f64>,
    /// Lower bound of the credible interval.
    pub lower: f64,
    /// Upper bound of the credible interval.
    pub upper: f64,
    /// Probability mass inside `[lower, upper]`.
    pub mass: f64,
}
