//! Table cleaning applied after flattening.

use chrono::Timelike;
use tracing::debug;

use boardlens_core::{RecordTable, parse_datetime};

/// Cleaning switches.
///
/// `fill_missing` is off by default: filling absent cells hides them from the
/// data-quality score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    /// Trim and lower-case every present cell.
    pub lowercase_text: bool,
    /// Rewrite parseable cells in columns whose name contains `date` as ISO dates.
    pub normalize_dates: bool,
    /// Placeholder for absent cells.
    pub fill_missing: Option<String>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            lowercase_text: true,
            normalize_dates: true,
            fill_missing: None,
        }
    }
}

impl CleanOptions {
    pub fn with_fill_missing(mut self, placeholder: impl Into<String>) -> Self {
        self.fill_missing = Some(placeholder.into());
        self
    }
}

pub fn clean_table(table: RecordTable, options: &CleanOptions) -> RecordTable {
    let mut filled = 0usize;
    let mut dates = 0usize;

    let cleaned = table.map_cells(|column, cell| {
        let Some(text) = cell else {
            if options.fill_missing.is_some() {
                filled += 1;
            }
            return options.fill_missing.clone();
        };

        if options.normalize_dates && column.to_lowercase().contains("date") {
            if let Some(at) = parse_datetime(&text) {
                dates += 1;
                let iso = if at.num_seconds_from_midnight() == 0 {
                    at.format("%Y-%m-%d").to_string()
                } else {
                    at.format("%Y-%m-%d %H:%M:%S").to_string()
                };
                return Some(iso);
            }
        }

        if options.lowercase_text {
            Some(text.trim().to_lowercase())
        } else {
            Some(text)
        }
    });

    debug!(filled, dates, "cleaned table");
    cleaned
}
