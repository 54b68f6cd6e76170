//! Sampling checks for the diagnostics appendix.
//!
//! A check draws from a posterior with an explicit seeded sampler, compares
//! the sample mean with the analytic mean, and renders the draws as a
//! histogram with the analytic density on top.

use crate::config::PlotStyle;
use crate::density::render_curve;
use crate::error::Result;
use crate::plot::{rasterize_histogram, AxisLabels};
use crate::sections::DiagnosticEntry;
use adpost_math::{MathError, PosteriorParams, PosteriorSampler, SampleStats};
use serde::Serialize;
use tracing::debug;

/// Outcome of sampling one posterior.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosteriorCheck {
    pub label: String,
    pub params: PosteriorParams,
    pub seed: u64,
    pub stats: SampleStats,
    /// `None` when the posterior has no finite mean.
    pub analytic_mean: Option<f64>,
    #[serde(skip)]
    draws: Vec<f64>,
}

impl PosteriorCheck {
    /// Draw `n` samples from `params`.
    pub fn run(
        sampler: &mut PosteriorSampler,
        label: impl Into<String>,
        params: &PosteriorParams,
        n: usize,
    ) -> Result<Self> {
        let draws = sampler.draw(params, n)?;
        let stats = SampleStats::from_draws(&draws).ok_or_else(|| MathError::InvalidParameter {
            name: "draws",
            reason: "at least one draw is required".to_string(),
        })?;
        let check = Self {
            label: label.into(),
            params: *params,
            seed: sampler.seed(),
            stats,
            analytic_mean: params.mean(),
            draws,
        };
        debug!(
            label = %check.label,
            draws = n,
            sample_mean = check.stats.mean,
            "Posterior check sampled"
        );
        Ok(check)
    }

    pub fn draws(&self) -> &[f64] {
        &self.draws
    }

    /// Distance of the sample mean from the analytic mean in standard errors.
    pub fn z_score(&self) -> Option<f64> {
        let mean = self.analytic_mean?;
        let se = self.stats.std_error();
        (se > 0.0).then(|| (self.stats.mean - mean) / se)
    }

    pub fn explanation(&self) -> String {
        let head = format!(
            "{} draws from {} (seed {}): sample mean {:.4}, sd {:.4}.",
            self.stats.count, self.params, self.seed, self.stats.mean, self.stats.std_dev
        );
        match (self.analytic_mean, self.z_score()) {
            (Some(mean), Some(z)) => format!(
                "{head} Analytic mean {mean:.4}; the sample mean is {:.2} standard errors away.",
                z.abs()
            ),
            (Some(mean), None) => format!("{head} Analytic mean {mean:.4}."),
            (None, _) => format!("{head} The analytic mean is undefined for this posterior."),
        }
    }

    /// Appendix entry with an inline histogram image.
    pub fn entry(&self, labels: &AxisLabels, style: &PlotStyle, curve_points: usize) -> Result<DiagnosticEntry> {
        let curve = render_curve(&self.params, curve_points)?;
        let title = format!("Posterior draws – {}", self.label);
        let svg = rasterize_histogram(&self.draws, Some(&curve), &title, labels, style);
        Ok(DiagnosticEntry::inline(title, format!("draws_{}.svg", self.label), svg)
            .with_explanation(self.explanation()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::DiagnosticImage;

    #[test]
    fn same_seed_same_check() {
        let params = PosteriorParams::beta(93.0, 909.0).unwrap();
        let a = PosteriorCheck::run(&mut PosteriorSampler::seeded(5), "Ad A", &params, 500).unwrap();
        let b = PosteriorCheck::run(&mut PosteriorSampler::seeded(5), "Ad A", &params, 500).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.draws(), b.draws());
    }

    #[test]
    fn sample_mean_tracks_analytic_mean() {
        let params = PosteriorParams::gamma(14.0, 200.0 / 1300.0).unwrap();
        let check = PosteriorCheck::run(&mut PosteriorSampler::seeded(42), "Ad A", &params, 4000).unwrap();
        assert!(check.z_score().unwrap().abs() < 5.0);
        assert!(check.explanation().contains("standard errors"));
    }

    #[test]
    fn heavy_tail_has_no_analytic_mean() {
        let params = PosteriorParams::inverse_gamma(0.8, 50.0).unwrap();
        let check = PosteriorCheck::run(&mut PosteriorSampler::seeded(1), "Ad Z", &params, 100).unwrap();
        assert_eq!(check.analytic_mean, None);
        assert!(check.explanation().contains("undefined"));
    }

    #[test]
    fn zero_draws_rejected() {
        let params = PosteriorParams::beta(2.0, 5.0).unwrap();
        assert!(PosteriorCheck::run(&mut PosteriorSampler::seeded(1), "x", &params, 0).is_err());
    }

    #[test]
    fn entry_carries_inline_svg() {
        let params = PosteriorParams::beta(2.0, 5.0).unwrap();
        let check = PosteriorCheck::run(&mut PosteriorSampler::seeded(3), "Ad B", &params, 200).unwrap();
        let entry = check
            .entry(&AxisLabels::new("CTR", "Density"), &PlotStyle::default(), 100)
            .unwrap();
        assert_eq!(entry.title, "Posterior draws – Ad B");
        match entry.image {
            DiagnosticImage::Inline { file_name, bytes } => {
                assert_eq!(file_name, "draws_Ad B.svg");
                assert!(bytes.starts_with(b"<svg"));
            }
            other => panic!("unexpected image: {other:?}"),
        }
    }
}
