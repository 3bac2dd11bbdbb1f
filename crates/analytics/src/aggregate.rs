//! Revenue & Pipeline Aggregator.
//!
//! Model:
//! - Keep deals whose close date falls in the active window (all deals when no
//!   date column resolved).
//! - Weight each kept deal by its stage's conversion probability.
//! - Sum amounts per stage, per sector and overall.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coerce::{TypedDeal, TypedDeals};
use crate::numeric::{finite_groups, finite_total, group_sum};
use crate::stage::probability;
use crate::window::QuarterWindow;

/// One deal's contribution to the weighted forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedRow {
    pub stage: String,
    pub amount: f64,
    pub probability: f64,
    pub expected_value: f64,
}

/// Window-scoped aggregates over the deals board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub deal_count: usize,
    pub weighted_rows: Vec<WeightedRow>,
    /// Unrounded sum of `expected_value`.
    pub expected_revenue: f64,
    pub pipeline_by_stage: BTreeMap<String, f64>,
    pub sector_revenue: BTreeMap<String, f64>,
    pub total_pipeline: f64,
}

pub fn aggregate(deals: &TypedDeals, window: &QuarterWindow) -> Aggregation {
    let kept: Vec<&TypedDeal> = deals.rows.iter().filter(|d| d.in_window(window)).collect();
    let columns = &deals.columns;
    let weighted = columns.stage.is_some() && columns.amount.is_some();

    let mut weighted_rows: Vec<WeightedRow> = Vec::new();
    let mut expected_revenue = 0.0;

    if weighted {
        for deal in &kept {
            let (Some(stage), Some(amount)) = (&deal.stage, deal.amount) else {
                continue;
            };
            let p = probability(stage);
            let expected_value = amount.value * p;
            expected_revenue += expected_value;
            weighted_rows.push(WeightedRow {
                stage: stage.clone(),
                amount: amount.value,
                probability: p,
                expected_value,
            });
        }
    }

    let pipeline_by_stage = if weighted {
        finite_groups(
            "pipeline_by_stage",
            group_sum(
                kept.iter()
                    .filter_map(|d| d.stage.as_deref().map(|s| (s, d.amount_value()))),
            ),
        )
    } else {
        BTreeMap::new()
    };

    let sector_revenue = if columns.has_sector_amounts() {
        finite_groups(
            "sector_revenue",
            group_sum(
                kept.iter()
                    .filter_map(|d| d.sector.as_deref().map(|s| (s, d.amount_value()))),
            ),
        )
    } else {
        BTreeMap::new()
    };

    let total_pipeline = if columns.amount.is_some() {
        finite_total(
            "total_pipeline",
            kept.iter().map(|d| d.amount_value()).sum::<f64>(),
        )
    } else {
        0.0
    };

    Aggregation {
        deal_count: kept.len(),
        weighted_rows,
        expected_revenue: finite_total("expected_revenue", expected_revenue),
        pipeline_by_stage,
        sector_revenue,
        total_pipeline,
    }
}
