//! Typed per-item observations extracted from data tables.

use crate::error::Result;
use crate::table::DataTable;
use adpost_math::{CpaObservation, CtrObservation, CvrObservation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Numeric columns every ad-level table must carry.
pub const AD_METRIC_COLUMNS: [&str; 5] = ["impressions", "clicks", "conversions", "cost", "revenue"];

/// Counters for one ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdRecord {
    pub label: String,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub cost: f64,
    pub revenue: f64,
}

impl AdRecord {
    pub fn ctr(&self) -> CtrObservation {
        CtrObservation {
            clicks: self.clicks,
            impressions: self.impressions,
        }
    }

    pub fn cvr(&self) -> CvrObservation {
        CvrObservation {
            conversions: self.conversions,
            clicks: self.clicks,
        }
    }

    pub fn cpa(&self) -> CpaObservation {
        CpaObservation {
            conversions: self.conversions,
            total_cost: self.cost,
        }
    }

    /// Revenue per conversion; `None` when nothing converted.
    pub fn revenue_per_conversion(&self) -> Option<f64> {
        (self.conversions > 0.0).then(|| self.revenue / self.conversions)
    }
}

/// CTR counters for one named item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCtr {
    pub label: String,
    pub observation: CtrObservation,
}

/// Extract one [`AdRecord`] per row, in row order.
pub fn ad_records(table: &DataTable, label_column: &str) -> Result<Vec<AdRecord>> {
    table.require_columns(&[label_column])?;
    table.require_columns(&AD_METRIC_COLUMNS)?;

    let labels = table.labels(label_column)?;
    let impressions = table.numbers("impressions")?;
    let clicks = table.numbers("clicks")?;
    let conversions = table.numbers("conversions")?;
    let cost = table.numbers("cost")?;
    let revenue = table.numbers("revenue")?;

    let records: Vec<AdRecord> = labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| AdRecord {
            label,
            impressions: impressions[i],
            clicks: clicks[i],
            conversions: conversions[i],
            cost: cost[i],
            revenue: revenue[i],
        })
        .collect();

    debug!(rows = records.len(), label_column, "Extracted ad records");
    Ok(records)
}

/// Extract CTR counters per row from a `{label, impressions, clicks}` table.
pub fn ctr_observations(table: &DataTable, label_column: &str) -> Result<Vec<LabeledCtr>> {
    table.require_columns(&[label_column, "impressions", "clicks"])?;

    let labels = table.labels(label_column)?;
    let impressions = table.numbers("impressions")?;
    let clicks = table.numbers("clicks")?;

    Ok(labels
        .into_iter()
        .zip(impressions.into_iter().zip(clicks))
        .map(|(label, (impressions, clicks))| LabeledCtr {
            label,
            observation: CtrObservation { clicks, impressions },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::table::Cell;

    fn ads() -> DataTable {
        let mut table = DataTable::new([
            "ad_name",
            "impressions",
            "clicks",
            "conversions",
            "cost",
            "revenue",
        ]);
        let rows: [(&str, [f64; 5]); 2] = [
            ("Ad A", [1000.0, 92.0, 12.0, 1200.0, 2400.0]),
            ("Ad B", [1050.0, 78.0, 9.0, 1500.0, 1800.0]),
        ];
        for (label, values) in rows {
            let mut cells = vec![Cell::from(label)];
            cells.extend(values.into_iter().map(Cell::from));
            table.push_row(cells).unwrap();
        }
        table
    }

    #[test]
    fn records_follow_row_order() {
        let records = ad_records(&ads(), "ad_name").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "Ad A");
        assert_eq!(records[1].label, "Ad B");
        assert_eq!(records[0].revenue_per_conversion(), Some(200.0));
        assert_eq!(records[1].cpa().total_cost, 1500.0);
    }

    #[test]
    fn missing_label_column() {
        let err = ad_records(&ads(), "campaign_name").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column } if column == "campaign_name"));
    }

    #[test]
    fn missing_revenue_column() {
        let table = DataTable::new(["ad_name", "impressions", "clicks", "conversions", "cost"]);
        let err = ad_records(&table, "ad_name").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column } if column == "revenue"));
    }

    #[test]
    fn ctr_only_table() {
        let table = DataTable::new(["campaign_name", "impressions", "clicks"])
            .with_row(vec!["Campaign 1".into(), 500u64.into(), 40u64.into()])
            .unwrap();
        let obs = ctr_observations(&table, "campaign_name").unwrap();
        assert_eq!(obs[0].label, "Campaign 1");
        assert_eq!(obs[0].observation.observed_rate(), Some(0.08));
    }

    #[test]
    fn zero_conversions_have_no_revenue_per_conversion() {
        let record = AdRecord {
            label: "Ad Z".into(),
            impressions: 10.0,
            clicks: 1.0,
            conversions: 0.0,
            cost: 5.0,
            revenue: 0.0,
        };
        assert_eq!(record.revenue_per_conversion(), None);
    }
}
