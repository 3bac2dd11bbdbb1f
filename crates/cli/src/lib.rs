//! Command-line driver: board files in, metrics bundle JSON out.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use serde_json::Value as JsonValue;
use tracing::info;

use boardlens_analytics::{
    AnalysisJob, BoardAnalysis, BoardSnapshot, DEFAULT_SAMPLE_SIZE, FixedClock, Intent, MetricTag,
    MetricsBundle, TimeRange,
};
use boardlens_core::{RecordTable, parse_datetime};
use boardlens_ingest::{CleanOptions, clean_table, parse_board_json};
use boardlens_observability::LogFormat;

/// Shape of the deals / work-orders input files.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// JSON array of row objects.
    Rows,
    /// Board API response document.
    Board,
}

/// Deals/work-orders BI metrics from board snapshots
#[derive(Parser, Debug, Clone)]
#[command(name = "boardlens")]
#[command(about = "Compute pipeline, forecast and data-quality metrics from two board snapshots")]
pub struct Args {
    /// Deals board file
    #[arg(long, value_name = "PATH")]
    pub deals: PathBuf,

    /// Work-orders board file
    #[arg(long, value_name = "PATH")]
    pub work_orders: PathBuf,

    /// Intent JSON file ({"sector", "time_range", "metrics"})
    #[arg(long, value_name = "PATH")]
    pub intent: Option<PathBuf>,

    /// Sector of interest (overrides the intent file)
    #[arg(long)]
    pub sector: Option<String>,

    /// this_quarter, this_month, this_year or all (overrides the intent file)
    #[arg(long)]
    pub time_range: Option<TimeRange>,

    /// Requested metric; repeat for several (replaces the intent file's list)
    #[arg(long = "metric", value_name = "METRIC")]
    pub metrics: Vec<MetricTag>,

    /// Input file format
    #[arg(long, value_enum, default_value_t = InputFormat::Rows)]
    pub input_format: InputFormat,

    /// Trim/lower-case cells and normalize date columns before analysis
    #[arg(long)]
    pub clean: bool,

    /// Reference time (RFC 3339 or YYYY-MM-DD); defaults to the system clock
    #[arg(long, value_parser = parse_now)]
    pub now: Option<DateTime<Utc>>,

    /// Number of weighted rows kept in the sample
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Pretty-print the bundle
    #[arg(long)]
    pub pretty: bool,

    /// Log format on stderr: json, pretty or compact
    #[arg(long, default_value = "json")]
    pub log_format: LogFormat,
}

/// Raw file contents for one run.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub deals: String,
    pub work_orders: String,
    pub intent: Option<String>,
}

impl Inputs {
    pub fn read(args: &Args) -> Result<Self> {
        Ok(Self {
            deals: read_file(&args.deals)?,
            work_orders: read_file(&args.work_orders)?,
            intent: args.intent.as_deref().map(read_file).transpose()?,
        })
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_now(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_datetime(raw)
        .map(|at| at.and_utc())
        .ok_or_else(|| format!("unrecognised reference time: {raw}"))
}

/// Parse one board file according to `format`.
pub fn parse_table(raw: &str, format: InputFormat) -> Result<RecordTable> {
    match format {
        InputFormat::Rows => {
            let payload: JsonValue = serde_json::from_str(raw).context("input is not valid JSON")?;
            Ok(RecordTable::from_json(&payload)?)
        }
        InputFormat::Board => Ok(parse_board_json(raw)?),
    }
}

/// Intent from the optional file, with command-line overrides applied.
///
/// Without a file or any override the fallback intent (revenue, all time) is used.
pub fn resolve_intent(args: &Args, intent_json: Option<&str>) -> Result<Intent> {
    let overridden = args.sector.is_some() || args.time_range.is_some() || !args.metrics.is_empty();

    let mut intent = match intent_json {
        Some(raw) => {
            let value: JsonValue = serde_json::from_str(raw).context("intent is not valid JSON")?;
            Intent::from_json(&value).context("intent does not match the expected shape")?
        }
        None if overridden => Intent::default(),
        None => Intent::fallback(),
    };

    if let Some(sector) = &args.sector {
        intent.sector = sector.clone();
    }
    if let Some(time_range) = args.time_range {
        intent.time_range = time_range;
    }
    if !args.metrics.is_empty() {
        intent.metrics = args.metrics.iter().copied().collect();
    }

    Ok(intent)
}

/// Run the analysis over already-read inputs.
pub fn analyze_inputs(args: &Args, inputs: &Inputs) -> Result<MetricsBundle> {
    let mut deals = parse_table(&inputs.deals, args.input_format).context("deals board")?;
    let mut work_orders =
        parse_table(&inputs.work_orders, args.input_format).context("work-orders board")?;

    if args.clean {
        let options = CleanOptions::default();
        deals = clean_table(deals, &options);
        work_orders = clean_table(work_orders, &options);
    }

    let intent = resolve_intent(args, inputs.intent.as_deref())?;
    info!(
        deals = deals.len(),
        work_orders = work_orders.len(),
        sector = %intent.sector,
        time_range = %intent.time_range,
        "loaded boards"
    );

    let mut job = BoardAnalysis::new(BoardSnapshot::new(deals, work_orders), intent)
        .with_sample_size(args.sample_size);
    if let Some(now) = args.now {
        job = job.with_clock(FixedClock(now));
    }

    Ok(job.run()?)
}

/// Read the files named in `args` and run the analysis.
pub fn run(args: &Args) -> Result<MetricsBundle> {
    let inputs = Inputs::read(args)?;
    analyze_inputs(args, &inputs)
}

pub fn render(bundle: &MetricsBundle, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(bundle)?
    } else {
        serde_json::to_string(bundle)?
    };
    Ok(out)
}
