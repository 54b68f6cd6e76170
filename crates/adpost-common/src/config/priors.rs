//! Conjugate prior set for the ad metrics.

use crate::error::{Error, Result};
use adpost_math::PriorSpec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Schema version for priors configuration.
pub const PRIORS_SCHEMA_VERSION: &str = "1.0.0";

/// Priors for every metric family the pipeline updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdPriors {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Beta prior on click-through rate
    #[serde(default = "default_rate_prior")]
    pub ctr: PriorSpec,

    /// Beta prior on conversion rate
    #[serde(default = "default_rate_prior")]
    pub cvr: PriorSpec,

    /// Inverse-gamma prior on cost per acquisition (shape, scale)
    #[serde(default = "default_cpa_prior")]
    pub cpa: PriorSpec,
}

fn default_rate_prior() -> PriorSpec {
    PriorSpec {
        alpha: 1.0,
        beta: 1.0,
    }
}

fn default_cpa_prior() -> PriorSpec {
    PriorSpec {
        alpha: 2.0,
        beta: 100.0,
    }
}

impl Default for AdPriors {
    fn default() -> Self {
        AdPriors {
            schema_version: PRIORS_SCHEMA_VERSION.to_string(),
            description: Some("Weakly informative defaults".to_string()),
            ctr: default_rate_prior(),
            cvr: default_rate_prior(),
            cpa: default_cpa_prior(),
        }
    }
}

impl AdPriors {
    /// Validate priors semantically.
    pub fn validate(&self) -> Result<()> {
        if self.schema_version != PRIORS_SCHEMA_VERSION {
            return Err(Error::InvalidPriors(format!(
                "schema version mismatch: expected {}, got {}",
                PRIORS_SCHEMA_VERSION, self.schema_version
            )));
        }

        for (name, prior) in [("ctr", &self.ctr), ("cvr", &self.cvr), ("cpa", &self.cpa)] {
            prior
                .validate()
                .map_err(|e| Error::InvalidPriors(format!("{name}: {e}")))?;
        }

        Ok(())
    }

    /// Parse and validate priors from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let priors: AdPriors = serde_json::from_str(json)?;
        priors.validate()?;
        Ok(priors)
    }

    /// Read, parse and validate a priors file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let priors: AdPriors = serde_json::from_str(&content).map_err(|e| {
            Error::InvalidPriors(format!("failed to parse {}: {}", path.display(), e))
        })?;
        priors.validate()?;
        debug!(path = %path.display(), "Loaded priors");
        Ok(priors)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
