//! End-to-end campaign pipeline: ad table in, finished report out.
//!
//! For every ad row the pipeline derives CTR, CVR and CPA posteriors from the
//! configured priors and the ROAS posterior from CPA, builds one summary
//! table per metric, asks the narrative source for commentary on a plain
//! text performance summary, and assembles the report in metric order.

use crate::builder::{FinalizedReport, ReportBuilder};
use crate::config::ReportConfig;
use crate::diagnostics::PosteriorCheck;
use crate::error::Result;
use crate::narrative::NarrativeSource;
use crate::plot::AxisLabels;
use crate::sections::ReportSection;
use adpost_common::{ad_records, ctr_observations, AdPriors, AdRecord, Cell, DataTable, Metric};
use adpost_math::{roas_from_cpa, MathError, PosteriorParams, PosteriorSampler, PriorSpec};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

/// Posteriors of every metric for one ad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdPosteriors {
    pub label: String,
    pub ctr: PosteriorParams,
    /// `None` when the ad reports more conversions than clicks.
    pub cvr: Option<PosteriorParams>,
    pub cpa: PosteriorParams,
    pub roas: PosteriorParams,
}

impl AdPosteriors {
    pub fn get(&self, metric: Metric) -> Option<&PosteriorParams> {
        match metric {
            Metric::Ctr => Some(&self.ctr),
            Metric::Cvr => self.cvr.as_ref(),
            Metric::Cpa => Some(&self.cpa),
            Metric::Roas => Some(&self.roas),
        }
    }
}

/// Derive all four posteriors for one ad. ROAS needs revenue and at least one conversion.
///
/// Conversions may exceed clicks (view-through attribution); such an ad has
/// no CVR posterior but keeps its CTR, CPA and ROAS posteriors.
pub fn ad_posteriors(record: &AdRecord, priors: &AdPriors) -> Result<AdPosteriors> {
    let ctr = record.ctr().posterior(&priors.ctr)?;
    let cvr = if record.conversions <= record.clicks {
        Some(record.cvr().posterior(&priors.cvr)?)
    } else {
        debug!(
            ad = %record.label,
            conversions = record.conversions,
            clicks = record.clicks,
            "Conversions exceed clicks, skipping CVR posterior"
        );
        None
    };
    let cpa = record.cpa().posterior(&priors.cpa)?;
    let revenue_per_conversion = record.revenue_per_conversion().ok_or_else(|| {
        MathError::InvalidParameter {
            name: "conversions",
            reason: format!("ROAS for {:?} needs at least one conversion", record.label),
        }
    })?;
    let roas = roas_from_cpa(&cpa, revenue_per_conversion)?;
    Ok(AdPosteriors {
        label: record.label.clone(),
        ctr,
        cvr,
        cpa,
        roas,
    })
}

/// Observed (non-Bayesian) value of `metric` for one ad.
fn observed(record: &AdRecord, metric: Metric) -> Option<f64> {
    match metric {
        Metric::Ctr => record.ctr().observed_rate(),
        Metric::Cvr => record.cvr().observed_rate(),
        Metric::Cpa => record.cpa().observed_cpa(),
        Metric::Roas => (record.cost > 0.0).then(|| record.revenue / record.cost),
    }
}

fn mass_label(mass: f64) -> String {
    let pct = mass * 100.0;
    if pct.fract() == 0.0 {
        format!("{pct:.0}%")
    } else {
        format!("{pct:.1}%")
    }
}

fn number_or_na(value: Option<f64>) -> Cell {
    match value {
        Some(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Text("n/a".to_string()),
    }
}

/// One row per ad: observed value, posterior mean and credible bounds.
pub fn summary_table(
    metric: Metric,
    label_column: &str,
    records: &[AdRecord],
    posteriors: &[AdPosteriors],
    credible_mass: f64,
) -> Result<DataTable> {
    let mass = mass_label(credible_mass);
    let mut table = DataTable::new([
        label_column.to_string(),
        format!("Observed {}", metric.name()),
        "Posterior Mean".to_string(),
        format!("Lower {mass}"),
        format!("Upper {mass}"),
    ]);
    for (record, post) in records.iter().zip(posteriors) {
        let (mean, lower, upper) = match post.get(metric) {
            Some(params) => {
                let summary = params.summary(credible_mass)?;
                (summary.mean, Some(summary.lower), Some(summary.upper))
            }
            None => (None, None, None),
        };
        table.push_row(vec![
            Cell::Text(record.label.clone()),
            number_or_na(observed(record, metric)),
            number_or_na(mean),
            number_or_na(lower),
            number_or_na(upper),
        ])?;
    }
    Ok(table)
}

/// Plain-text performance summary handed to the narrative source.
pub fn performance_summary(records: &[AdRecord]) -> String {
    let mut out = String::new();
    for r in records {
        let _ = write!(
            out,
            "{}: {} impressions, {} clicks",
            r.label, r.impressions, r.clicks
        );
        if let Some(ctr) = r.ctr().observed_rate() {
            let _ = write!(out, " (CTR {:.2}%)", ctr * 100.0);
        }
        let _ = write!(out, ", {} conversions, cost ${:.2}", r.conversions, r.cost);
        if let Some(cpa) = r.cpa().observed_cpa() {
            let _ = write!(out, " (CPA ${cpa:.2})");
        }
        let _ = write!(out, ", revenue ${:.2}", r.revenue);
        if r.cost > 0.0 {
            let _ = write!(out, " (ROAS {:.2})", r.revenue / r.cost);
        }
        out.push('\n');
    }
    out
}

/// CTR section for a `{label, impressions, clicks}` campaign table.
pub fn campaign_ctr_section(
    table: &DataTable,
    label_column: &str,
    prior: &PriorSpec,
    credible_mass: f64,
) -> Result<ReportSection> {
    let observations = ctr_observations(table, label_column)?;
    let mass = mass_label(credible_mass);
    let mut summary = DataTable::new([
        label_column.to_string(),
        "Impressions".to_string(),
        "Clicks".to_string(),
        "Posterior Mean".to_string(),
        format!("Lower {mass}"),
        format!("Upper {mass}"),
    ]);
    let mut section_items = Vec::with_capacity(observations.len());
    for obs in &observations {
        let post = obs.observation.posterior(prior)?;
        let s = post.summary(credible_mass)?;
        summary.push_row(vec![
            Cell::Text(obs.label.clone()),
            Cell::Number(obs.observation.impressions),
            Cell::Number(obs.observation.clicks),
            number_or_na(s.mean),
            Cell::Number(s.lower),
            Cell::Number(s.upper),
        ])?;
        section_items.push((obs.label.clone(), post));
    }
    let mut section = ReportSection::for_metric(Metric::Ctr, summary);
    section.metric = "Campaign CTR".to_string();
    for (label, post) in section_items {
        section.push_item(label, post);
    }
    Ok(section)
}

/// Sampling checks to include as a diagnostics appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagnosticsPlan {
    pub seed: u64,
    pub draws: usize,
}

impl Default for DiagnosticsPlan {
    fn default() -> Self {
        Self {
            seed: 42,
            draws: adpost_math::DEFAULT_SAMPLE_SIZE,
        }
    }
}

/// Everything derived from an ad table before anything is rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSections {
    pub records: Vec<AdRecord>,
    pub posteriors: Vec<AdPosteriors>,
    /// One section per metric, in [`Metric::ALL`] order.
    pub sections: Vec<ReportSection>,
}

/// Configured ad-table to report pipeline.
#[derive(Debug, Clone)]
pub struct CampaignPipeline {
    config: ReportConfig,
    priors: AdPriors,
    label_column: String,
    campaign_label_column: String,
    diagnostics: Option<DiagnosticsPlan>,
}

impl CampaignPipeline {
    pub fn new(config: ReportConfig, priors: AdPriors) -> Self {
        Self {
            config,
            priors,
            label_column: "ad_name".to_string(),
            campaign_label_column: "campaign_name".to_string(),
            diagnostics: None,
        }
    }

    pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
        self.label_column = column.into();
        self
    }

    pub fn with_campaign_label_column(mut self, column: impl Into<String>) -> Self {
        self.campaign_label_column = column.into();
        self
    }

    pub fn with_diagnostics(mut self, plan: DiagnosticsPlan) -> Self {
        self.diagnostics = Some(plan);
        self
    }

    /// Posterior sections in metric order, without writing anything.
    pub fn sections(&self, ads: &DataTable) -> Result<CampaignSections> {
        self.priors.validate()?;
        let records = ad_records(ads, &self.label_column)?;
        let posteriors = records
            .iter()
            .map(|r| ad_posteriors(r, &self.priors))
            .collect::<Result<Vec<_>>>()?;

        let mut sections = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            let table = summary_table(
                metric,
                &self.label_column,
                &records,
                &posteriors,
                self.config.credible_mass,
            )?;
            let mut section = ReportSection::for_metric(metric, table);
            for post in &posteriors {
                if let Some(params) = post.get(metric) {
                    section.push_item(post.label.clone(), *params);
                }
            }
            sections.push(section);
        }
        Ok(CampaignSections {
            records,
            posteriors,
            sections,
        })
    }

    /// Run the whole pipeline and write the report to `destination`.
    pub fn run(
        &self,
        ads: &DataTable,
        campaigns: Option<&DataTable>,
        narrative: &dyn NarrativeSource,
        destination: &Path,
    ) -> Result<FinalizedReport> {
        let CampaignSections {
            records,
            posteriors,
            mut sections,
        } = self.sections(ads)?;
        if let Some(campaigns) = campaigns {
            sections.push(campaign_ctr_section(
                campaigns,
                &self.campaign_label_column,
                &self.priors.ctr,
                self.config.credible_mass,
            )?);
        }

        let summary = performance_summary(&records);
        let text = narrative.compose(&summary)?;
        debug!(ads = records.len(), chars = text.len(), "Narrative composed");

        let mut builder = ReportBuilder::new(self.config.clone())?;
        builder.start(&text)?;
        for section in &sections {
            builder.add_section(section)?;
        }

        if let Some(plan) = self.diagnostics {
            let mut sampler = PosteriorSampler::seeded(plan.seed);
            let mut entries = Vec::new();
            for post in &posteriors {
                for metric in Metric::ALL {
                    let Some(params) = post.get(metric) else {
                        continue;
                    };
                    let check = PosteriorCheck::run(
                        &mut sampler,
                        format!("{} {}", post.label, metric.name()),
                        params,
                        plan.draws,
                    )?;
                    entries.push(check.entry(
                        &AxisLabels::for_metric(metric),
                        &self.config.plot,
                        self.config.curve_points,
                    )?);
                }
            }
            builder.add_diagnostics_appendix(&entries)?;
        }

        let report = builder.finalize(destination)?;
        info!(
            path = %report.path.display(),
            ads = records.len(),
            sections = report.sections,
            "Campaign report complete"
        );
        Ok(report)
    }
}
