//! Cross-Board Correlator: pipeline (deals) vs execution (work orders) per sector.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use boardlens_core::{RecordTable, label_or_unknown};

use crate::coerce::{cell, coerce_amount};
use crate::columns::WorkOrderColumns;
use crate::numeric::{finite_groups, group_sum};

/// Both sector series, side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorSeriesPair {
    pub sales_pipeline_by_sector: BTreeMap<String, f64>,
    pub execution_revenue_by_sector: BTreeMap<String, f64>,
}

/// Cross-board record. Serializes as `{}` when the boards could not be joined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossBoardCorrelation {
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub series: Option<SectorSeriesPair>,
}

impl CrossBoardCorrelation {
    pub fn empty() -> Self {
        Self { series: None }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_none()
    }

    /// Pipeline minus execution per sector (union of sectors, absent side = 0).
    pub fn divergence(&self) -> BTreeMap<String, f64> {
        let Some(pair) = &self.series else {
            return BTreeMap::new();
        };

        let mut gap: BTreeMap<String, f64> = pair
            .sales_pipeline_by_sector
            .iter()
            .map(|(sector, v)| (sector.clone(), *v))
            .collect();
        for (sector, executed) in &pair.execution_revenue_by_sector {
            *gap.entry(sector.clone()).or_insert(0.0) -= executed;
        }
        gap
    }
}

/// Pair deals-side sector revenue with work-order revenue grouped by sector.
///
/// `sales_by_sector` is `None` when the deals board has no sector/amount
/// columns. The record is empty unless both boards resolve both columns and the
/// work-order grouping stays finite.
pub fn correlate(
    sales_by_sector: Option<&BTreeMap<String, f64>>,
    work_orders: &RecordTable,
    columns: &WorkOrderColumns,
) -> CrossBoardCorrelation {
    let (Some(sales), Some(sector_col), Some(amount_col)) =
        (sales_by_sector, &columns.sector, &columns.amount)
    else {
        debug!(
            work_sector = ?columns.sector,
            work_amount = ?columns.amount,
            deals_resolved = sales_by_sector.is_some(),
            "cross-board correlation unavailable"
        );
        return CrossBoardCorrelation::empty();
    };

    let labelled: Vec<(String, f64)> = work_orders
        .rows()
        .map(|row| {
            (
                label_or_unknown(cell(&row, sector_col)),
                coerce_amount(cell(&row, amount_col)).value,
            )
        })
        .collect();

    let execution = finite_groups(
        "execution_revenue_by_sector",
        group_sum(labelled.iter().map(|(s, v)| (s.as_str(), *v))),
    );
    // Rows always yield at least one group, so no groups here means the sum failed.
    if execution.is_empty() && !labelled.is_empty() {
        return CrossBoardCorrelation::empty();
    }

    CrossBoardCorrelation {
        series: Some(SectorSeriesPair {
            sales_pipeline_by_sector: sales.clone(),
            execution_revenue_by_sector: execution,
        }),
    }
}
