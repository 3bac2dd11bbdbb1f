//! Data Quality Scorer.

use serde::{Deserialize, Serialize};

use boardlens_core::RecordTable;

use crate::numeric::round2;

/// Completeness of a source table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub missing_cells: usize,
    /// `1 - missing/total`, rounded to 2 dp; 0 for a table with no cells.
    pub quality_score: f64,
    pub records: usize,
}

/// Score the whole (unfiltered) table. Only absent cells count as missing.
pub fn quality(table: &RecordTable) -> DataQuality {
    let total = table.cell_count();
    let missing = table.missing_cells();

    let quality_score = if total == 0 {
        0.0
    } else {
        round2(1.0 - (missing as f64 / total as f64))
    };

    DataQuality {
        missing_cells: missing,
        quality_score,
        records: table.len(),
    }
}
