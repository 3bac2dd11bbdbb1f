//! `boardlens-analytics`
//!
//! **Responsibility:** Deals/work-orders analysis engine.
//!
//! This crate is intentionally storage- and transport-agnostic:
//! - It consumes already-materialized [`boardlens_core::RecordTable`]s and an [`Intent`].
//! - It never fetches boards, interprets free text, or renders reports.
//! - It degrades (empty/zero aggregates) instead of failing on sparse data.

pub mod aggregate;
pub mod bundle;
pub mod coerce;
pub mod columns;
pub mod correlate;
pub mod error;
pub mod intent;
pub mod job;
pub mod numeric;
pub mod quality;
pub mod stage;
pub mod window;

pub use aggregate::{Aggregation, WeightedRow, aggregate};
pub use bundle::{
    ComputedMetrics, DEFAULT_SAMPLE_SIZE, FilteredInsights, MetricsBundle, TimeRangeBounds, select,
};
pub use coerce::{CoercionAudit, Coerced, Provenance, TypedDeal, TypedDeals, coerce_deals};
pub use columns::{ColumnRef, DealColumns, WorkOrderColumns, resolve};
pub use correlate::{CrossBoardCorrelation, SectorSeriesPair, correlate};
pub use error::{AnalysisError, AnalysisResult};
pub use intent::{Intent, MetricTag, TimeRange};
pub use job::{AnalysisJob, BoardAnalysis, BoardSnapshot, analyze};
pub use quality::{DataQuality, quality};
pub use stage::{DEFAULT_STAGE_PROBABILITY, STAGE_PROBABILITIES, probability};
pub use window::{Clock, FixedClock, QuarterWindow, SystemClock, current_quarter};
