//! Metrics Bundle and the Intent-Driven Metric Filter.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregation, WeightedRow};
use crate::coerce::CoercionAudit;
use crate::correlate::CrossBoardCorrelation;
use crate::intent::{Intent, MetricTag};
use crate::numeric::round2;
use crate::quality::DataQuality;
use crate::window::QuarterWindow;

/// Number of weighted rows kept for explainability.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeBounds {
    pub quarter_start: NaiveDate,
    pub quarter_end: NaiveDate,
}

impl From<QuarterWindow> for TimeRangeBounds {
    fn from(w: QuarterWindow) -> Self {
        Self {
            quarter_start: w.start,
            quarter_end: w.end,
        }
    }
}

/// The intent-conditioned view. Entries the intent did not ask for are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredInsights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_by_stage: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pipeline_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_revenue_weighted: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector_revenue: Option<BTreeMap<String, f64>>,
}

impl FilteredInsights {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of one analysis run.
///
/// Everything except `filtered_insights` is the canonical baseline and is
/// always present; `filtered_insights` is the separate intent-filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub time_range: TimeRangeBounds,
    pub expected_revenue_weighted: f64,
    pub total_pipeline_value: f64,
    pub deal_count: usize,
    pub pipeline_by_stage: BTreeMap<String, f64>,
    pub sector_revenue: BTreeMap<String, f64>,
    pub weighted_pipeline_rows: Vec<WeightedRow>,
    pub cross_board_intelligence: CrossBoardCorrelation,
    pub data_quality: DataQuality,
    pub intent_used: Intent,
    pub filtered_insights: FilteredInsights,
    pub coercion_audit: CoercionAudit,
}

/// Everything computed before selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedMetrics {
    pub window: QuarterWindow,
    pub aggregation: Aggregation,
    pub cross_board: CrossBoardCorrelation,
    pub quality: DataQuality,
    pub audit: CoercionAudit,
}

/// Assemble the bundle: the full baseline plus the intent-filtered view.
pub fn select(intent: &Intent, computed: ComputedMetrics, sample_size: usize) -> MetricsBundle {
    let ComputedMetrics {
        window,
        aggregation,
        cross_board,
        quality,
        audit,
    } = computed;

    let expected_revenue_weighted = round2(aggregation.expected_revenue);
    let filtered_insights = filter_by_intent(intent, &aggregation, expected_revenue_weighted);

    let mut weighted_pipeline_rows = aggregation.weighted_rows;
    weighted_pipeline_rows.truncate(sample_size);

    MetricsBundle {
        time_range: window.into(),
        expected_revenue_weighted,
        total_pipeline_value: aggregation.total_pipeline,
        deal_count: aggregation.deal_count,
        pipeline_by_stage: aggregation.pipeline_by_stage,
        sector_revenue: aggregation.sector_revenue,
        weighted_pipeline_rows,
        cross_board_intelligence: cross_board,
        data_quality: quality,
        intent_used: intent.clone(),
        filtered_insights,
        coercion_audit: audit,
    }
}

fn filter_by_intent(
    intent: &Intent,
    aggregation: &Aggregation,
    expected_revenue_weighted: f64,
) -> FilteredInsights {
    let mut view = FilteredInsights::default();

    if intent.wants(MetricTag::Pipeline) {
        view.pipeline_by_stage = Some(aggregation.pipeline_by_stage.clone());
    }
    if intent.wants(MetricTag::Revenue) || intent.wants(MetricTag::Pipeline) {
        view.total_pipeline_value = Some(aggregation.total_pipeline);
        view.expected_revenue_weighted = Some(expected_revenue_weighted);
    }
    if intent.has_sector() {
        view.sector_revenue = Some(aggregation.sector_revenue.clone());
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn computed() -> ComputedMetrics {
        ComputedMetrics {
            window: QuarterWindow {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            },
            aggregation: Aggregation {
                deal_count: 12,
                weighted_rows: (0..12)
                    .map(|i| WeightedRow {
                        stage: "proposal".to_string(),
                        amount: i as f64,
                        probability: 0.5,
                        expected_value: i as f64 * 0.5,
                    })
                    .collect(),
                expected_revenue: 33.004,
                pipeline_by_stage: BTreeMap::from([("proposal".to_string(), 66.0)]),
                sector_revenue: BTreeMap::from([("tech".to_string(), 66.0)]),
                total_pipeline: 66.0,
            },
            cross_board: CrossBoardCorrelation::empty(),
            quality: DataQuality {
                missing_cells: 0,
                quality_score: 1.0,
                records: 12,
            },
            audit: CoercionAudit::default(),
        }
    }

    #[test]
    fn baseline_is_always_present() {
        let bundle = select(&Intent::default(), computed(), DEFAULT_SAMPLE_SIZE);

        assert_eq!(bundle.expected_revenue_weighted, 33.0);
        assert_eq!(bundle.total_pipeline_value, 66.0);
        assert_eq!(bundle.deal_count, 12);
        assert_eq!(bundle.pipeline_by_stage["proposal"], 66.0);
        assert_eq!(bundle.sector_revenue["tech"], 66.0);
        assert_eq!(bundle.weighted_pipeline_rows.len(), 10);
        assert_eq!(bundle.weighted_pipeline_rows[9].amount, 9.0);
        assert!(bundle.filtered_insights.is_empty());
    }

    #[test]
    fn pipeline_tag_selects_stage_view_and_totals() {
        let intent = Intent::default().with_metric(MetricTag::Pipeline);
        let view = select(&intent, computed(), DEFAULT_SAMPLE_SIZE).filtered_insights;

        assert!(view.pipeline_by_stage.is_some());
        assert_eq!(view.total_pipeline_value, Some(66.0));
        assert_eq!(view.expected_revenue_weighted, Some(33.0));
        assert!(view.sector_revenue.is_none());
    }

    #[test]
    fn revenue_tag_selects_totals_only() {
        let intent = Intent::default().with_metric(MetricTag::Revenue);
        let view = select(&intent, computed(), DEFAULT_SAMPLE_SIZE).filtered_insights;

        assert!(view.pipeline_by_stage.is_none());
        assert_eq!(view.total_pipeline_value, Some(66.0));
    }

    #[test]
    fn sector_in_intent_selects_sector_view() {
        let intent = Intent::default()
            .with_metric(MetricTag::Risk)
            .with_sector("tech");
        let view = select(&intent, computed(), DEFAULT_SAMPLE_SIZE).filtered_insights;

        assert_eq!(
            view.sector_revenue,
            Some(BTreeMap::from([("tech".to_string(), 66.0)]))
        );
        assert!(view.total_pipeline_value.is_none());
    }

    #[test]
    fn serializes_with_stable_keys() {
        let bundle = select(&Intent::fallback(), computed(), 1);
        let value = serde_json::to_value(&bundle).unwrap();

        assert_eq!(
            value["time_range"],
            json!({"quarter_start": "2024-01-01", "quarter_end": "2024-04-01"})
        );
        assert_eq!(value["cross_board_intelligence"], json!({}));
        assert_eq!(
            value["filtered_insights"],
            json!({"total_pipeline_value": 66.0, "expected_revenue_weighted": 33.0})
        );
        assert_eq!(
            value["intent_used"],
            json!({"metrics": ["revenue"], "sector": "", "time_range": "all"})
        );
        assert_eq!(value["weighted_pipeline_rows"].as_array().unwrap().len(), 1);
    }
}
