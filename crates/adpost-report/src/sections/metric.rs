//! Per-metric section data.

use crate::plot::AxisLabels;
use adpost_common::{DataTable, Metric};
use adpost_math::PosteriorParams;
use serde::Serialize;

/// One item's posterior within a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPosterior {
    pub label: String,
    pub params: PosteriorParams,
}

/// A metric heading, its summary table and one posterior per item.
///
/// Table rows and items are rendered in the order they were supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    /// Metric name used in headings.
    pub metric: String,
    /// Summary table shown under the heading.
    pub table: DataTable,
    /// Posteriors to plot, in display order.
    pub items: Vec<ItemPosterior>,
    /// Horizontal axis label of the plots.
    pub x_label: String,
}

impl ReportSection {
    /// Section with a free-form metric name; plots use the name as x label.
    pub fn new(metric: impl Into<String>, table: DataTable) -> Self {
        let metric = metric.into();
        Self {
            x_label: metric.clone(),
            metric,
            table,
            items: Vec::new(),
        }
    }

    /// Section for a known metric, with its standard axis label.
    pub fn for_metric(metric: Metric, table: DataTable) -> Self {
        Self {
            metric: metric.name().to_string(),
            table,
            items: Vec::new(),
            x_label: metric.axis_label().to_string(),
        }
    }

    pub fn with_item(mut self, label: impl Into<String>, params: PosteriorParams) -> Self {
        self.push_item(label, params);
        self
    }

    pub fn push_item(&mut self, label: impl Into<String>, params: PosteriorParams) {
        self.items.push(ItemPosterior {
            label: label.into(),
            params,
        });
    }

    pub fn axis_labels(&self) -> AxisLabels {
        AxisLabels::new(self.x_label.clone(), "Density")
    }

    /// Heading above one item's plot.
    pub fn item_heading(&self, label: &str) -> String {
        format!("{} Posterior – {}", self.metric, label)
    }
}
