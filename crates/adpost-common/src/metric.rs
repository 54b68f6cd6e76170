//! Metric identities.

use adpost_math::DistributionFamily;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ad-performance metric with a conjugate posterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Ctr,
    Cvr,
    Cpa,
    Roas,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::Ctr, Metric::Cvr, Metric::Cpa, Metric::Roas];

    /// Short name used in headings.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Ctr => "CTR",
            Metric::Cvr => "CVR",
            Metric::Cpa => "CPA",
            Metric::Roas => "ROAS",
        }
    }

    /// Horizontal axis label for posterior plots.
    pub fn axis_label(&self) -> &'static str {
        match self {
            Metric::Ctr => "CTR",
            Metric::Cvr => "Conversion Rate",
            Metric::Cpa => "Cost per Acquisition (USD)",
            Metric::Roas => "Return on Ad Spend (Revenue/Cost)",
        }
    }

    /// Posterior family produced for this metric.
    pub fn family(&self) -> DistributionFamily {
        match self {
            Metric::Ctr | Metric::Cvr => DistributionFamily::Beta,
            Metric::Cpa => DistributionFamily::InverseGamma,
            Metric::Roas => DistributionFamily::Gamma,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
