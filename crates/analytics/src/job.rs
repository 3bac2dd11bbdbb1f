use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use boardlens_core::RecordTable;

use crate::aggregate::aggregate;
use crate::bundle::{ComputedMetrics, DEFAULT_SAMPLE_SIZE, MetricsBundle, select};
use crate::coerce::coerce_deals;
use crate::columns::{DealColumns, WorkOrderColumns};
use crate::correlate::correlate;
use crate::error::{AnalysisError, AnalysisResult};
use crate::intent::Intent;
use crate::quality::quality;
use crate::window::{Clock, SystemClock, current_quarter};

/// A self-contained analysis unit.
///
/// Inputs are owned snapshots provided by callers; the crate never fetches
/// boards itself.
pub trait AnalysisJob: Send + Sync + 'static {
    type Input: Send + Sync + 'static;

    /// The snapshot the job will analyze.
    fn input(&self) -> &Self::Input;

    /// Execute the analysis. Must not mutate the input.
    fn run(&self) -> AnalysisResult<MetricsBundle>;
}

/// One invocation's pair of board tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub deals: RecordTable,
    pub work_orders: RecordTable,
}

impl BoardSnapshot {
    pub fn new(deals: RecordTable, work_orders: RecordTable) -> Self {
        Self { deals, work_orders }
    }

    /// Build both tables from JSON arrays of row objects.
    pub fn from_json(deals: &JsonValue, work_orders: &JsonValue) -> AnalysisResult<Self> {
        Ok(Self {
            deals: RecordTable::from_json(deals)?,
            work_orders: RecordTable::from_json(work_orders)?,
        })
    }
}

/// Deals/work-orders analysis for one intent.
///
/// Pipeline:
/// - Resolve column roles on both boards.
/// - Coerce deals, restrict to the current quarter, weight and aggregate.
/// - Correlate sector revenue across boards; score deals completeness.
/// - Select the baseline plus the intent-filtered view.
#[derive(Debug, Clone)]
pub struct BoardAnalysis {
    input: BoardSnapshot,
    intent: Intent,
    clock: Arc<dyn Clock>,
    /// Number of weighted rows kept in the bundle sample.
    sample_size: usize,
}

impl BoardAnalysis {
    pub fn new(input: BoardSnapshot, intent: Intent) -> Self {
        Self {
            input,
            intent,
            clock: Arc::new(SystemClock),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }
}

impl AnalysisJob for BoardAnalysis {
    type Input = BoardSnapshot;

    fn input(&self) -> &Self::Input {
        &self.input
    }

    fn run(&self) -> AnalysisResult<MetricsBundle> {
        if self.sample_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "sample size must be at least 1".to_string(),
            ));
        }

        analyze(
            &self.intent,
            &self.input.deals,
            &self.input.work_orders,
            self.clock.now(),
            self.sample_size,
        )
    }
}

/// Run the full analysis over borrowed tables with an explicit reference time.
pub fn analyze(
    intent: &Intent,
    deals: &RecordTable,
    work_orders: &RecordTable,
    now: DateTime<Utc>,
    sample_size: usize,
) -> AnalysisResult<MetricsBundle> {
    let deal_columns = DealColumns::resolve(deals);
    let work_columns = WorkOrderColumns::resolve(work_orders);
    debug!(deals = ?deal_columns, work_orders = ?work_columns, "resolved board columns");

    let window = current_quarter(now)?;
    let typed = coerce_deals(deals, &deal_columns);
    debug!(audit = ?typed.audit, "coerced deals");

    let aggregation = aggregate(&typed, &window);
    let sales_by_sector = deal_columns
        .has_sector_amounts()
        .then_some(&aggregation.sector_revenue);
    let cross_board = correlate(sales_by_sector, work_orders, &work_columns);
    let quality = quality(deals);

    info!(
        quarter_start = %window.start,
        quarter_end = %window.end,
        deal_count = aggregation.deal_count,
        total_pipeline = aggregation.total_pipeline,
        quality_score = quality.quality_score,
        cross_board = !cross_board.is_empty(),
        "board analysis complete"
    );

    Ok(select(
        intent,
        ComputedMetrics {
            window,
            audit: typed.audit,
            aggregation,
            cross_board,
            quality,
        },
        sample_size,
    ))
}
