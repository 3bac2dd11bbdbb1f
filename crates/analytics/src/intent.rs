//! Structured analysis intent supplied by the caller.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::AnalysisError;

/// Requested time window.
///
/// All variants are accepted; windowing currently always uses the calendar
/// quarter containing "now".
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ThisQuarter,
    ThisMonth,
    ThisYear,
    #[default]
    All,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::ThisQuarter => "this_quarter",
            TimeRange::ThisMonth => "this_month",
            TimeRange::ThisYear => "this_year",
            TimeRange::All => "all",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "this_quarter" => Ok(TimeRange::ThisQuarter),
            "this_month" => Ok(TimeRange::ThisMonth),
            "this_year" => Ok(TimeRange::ThisYear),
            "all" => Ok(TimeRange::All),
            other => Err(AnalysisError::InvalidInput(format!(
                "unknown time range: {other}"
            ))),
        }
    }
}

/// A metric family the caller cares about.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricTag {
    Revenue,
    Pipeline,
    Forecast,
    Sector,
    Risk,
}

impl MetricTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricTag::Revenue => "revenue",
            MetricTag::Pipeline => "pipeline",
            MetricTag::Forecast => "forecast",
            MetricTag::Sector => "sector",
            MetricTag::Risk => "risk",
        }
    }
}

impl fmt::Display for MetricTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricTag {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(MetricTag::Revenue),
            "pipeline" => Ok(MetricTag::Pipeline),
            "forecast" => Ok(MetricTag::Forecast),
            "sector" => Ok(MetricTag::Sector),
            "risk" => Ok(MetricTag::Risk),
            other => Err(AnalysisError::InvalidInput(format!(
                "unknown metric tag: {other}"
            ))),
        }
    }
}

/// Which metrics, sector and time window an analysis should emphasize.
///
/// Missing fields default to "no preference". Unknown metric tags are dropped
/// with a warning rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIntent")]
pub struct Intent {
    pub metrics: BTreeSet<MetricTag>,
    pub sector: String,
    pub time_range: TimeRange,
}

impl Intent {
    /// Intent used when the caller could not produce one: revenue over all time.
    pub fn fallback() -> Self {
        Self::default().with_metric(MetricTag::Revenue)
    }

    pub fn with_metric(mut self, tag: MetricTag) -> Self {
        self.metrics.insert(tag);
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = sector.into();
        self
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    pub fn wants(&self, tag: MetricTag) -> bool {
        self.metrics.contains(&tag)
    }

    /// Only the empty string means "no sector".
    pub fn has_sector(&self) -> bool {
        !self.sector.is_empty()
    }

    /// Parse an intent document.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// Wire shape before tag validation.
#[derive(Deserialize)]
struct RawIntent {
    #[serde(default)]
    metrics: Option<Vec<String>>,
    #[serde(default)]
    sector: Option<String>,
    #[serde(default, deserialize_with = "time_range_or_default")]
    time_range: Option<TimeRange>,
}

impl From<RawIntent> for Intent {
    fn from(raw: RawIntent) -> Self {
        let metrics = raw
            .metrics
            .unwrap_or_default()
            .iter()
            .filter_map(|tag| match tag.parse::<MetricTag>() {
                Ok(t) => Some(t),
                Err(_) => {
                    warn!(tag = %tag, "ignoring unrecognised metric tag");
                    None
                }
            })
            .collect();

        Self {
            metrics,
            sector: raw.sector.unwrap_or_default(),
            time_range: raw.time_range.unwrap_or_default(),
        }
    }
}

/// An empty string means "not specified".
fn time_range_or_default<'de, D>(deserializer: D) -> Result<Option<TimeRange>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
