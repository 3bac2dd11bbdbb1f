//! Column Resolver: heuristic discovery of column roles from header text.
//!
//! Boards do not declare a schema. Roles (amount, stage, sector, close date)
//! are found by case-insensitive substring match against keyword lists.

use serde::{Deserialize, Serialize};

use boardlens_core::RecordTable;

pub const AMOUNT_KEYWORDS: &[&str] = &["amount", "value", "revenue"];
pub const STAGE_KEYWORDS: &[&str] = &["stage", "status"];
pub const SECTOR_KEYWORDS: &[&str] = &["sector", "industry"];
pub const DATE_KEYWORDS: &[&str] = &["close_date", "date", "closing"];

/// A resolved column: its position in the table and its header text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

/// Find the column whose header best matches `keywords`.
///
/// Keywords are tried in order; the first keyword that matches any column wins,
/// and among columns matching the same keyword the earliest declared one wins.
/// Returns `None` when nothing matches.
pub fn resolve(table: &RecordTable, keywords: &[&str]) -> Option<ColumnRef> {
    let headers: Vec<String> = table.columns().iter().map(|c| c.to_lowercase()).collect();

    keywords.iter().find_map(|keyword| {
        let keyword = keyword.to_lowercase();
        headers
            .iter()
            .position(|h| h.contains(&keyword))
            .map(|index| ColumnRef {
                index,
                name: table.columns()[index].clone(),
            })
    })
}

/// Column roles on the deals board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealColumns {
    pub amount: Option<ColumnRef>,
    pub stage: Option<ColumnRef>,
    pub sector: Option<ColumnRef>,
    pub close_date: Option<ColumnRef>,
}

impl DealColumns {
    pub fn resolve(table: &RecordTable) -> Self {
        Self {
            amount: resolve(table, AMOUNT_KEYWORDS),
            stage: resolve(table, STAGE_KEYWORDS),
            sector: resolve(table, SECTOR_KEYWORDS),
            close_date: resolve(table, DATE_KEYWORDS),
        }
    }

    /// Both sides of a sector aggregate are available.
    pub fn has_sector_amounts(&self) -> bool {
        self.sector.is_some() && self.amount.is_some()
    }
}

/// Column roles on the work-orders board (resolved independently of deals).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderColumns {
    pub sector: Option<ColumnRef>,
    pub amount: Option<ColumnRef>,
}

impl WorkOrderColumns {
    pub fn resolve(table: &RecordTable) -> Self {
        Self {
            sector: resolve(table, SECTOR_KEYWORDS),
            amount: resolve(table, AMOUNT_KEYWORDS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(columns: &[&str]) -> RecordTable {
        RecordTable::new(columns.iter().copied()).unwrap()
    }

    #[test]
    fn matches_case_insensitive_substring() {
        let t = table(&["Deal Name", "Deal Value (USD)", "Deal Stage"]);
        let amount = resolve(&t, AMOUNT_KEYWORDS).unwrap();
        assert_eq!(amount.index, 1);
        assert_eq!(amount.name, "Deal Value (USD)");
    }

    #[test]
    fn earlier_keyword_beats_earlier_column() {
        // "value" matches column 0, but "amount" is the higher-priority keyword.
        let t = table(&["deal_value", "amount_usd"]);
        let amount = resolve(&t, AMOUNT_KEYWORDS).unwrap();
        assert_eq!(amount.name, "amount_usd");
    }

    #[test]
    fn ties_for_one_keyword_resolve_to_earliest_column() {
        let t = table(&["status_note", "stage", "status"]);
        assert_eq!(resolve(&t, STAGE_KEYWORDS).unwrap().name, "stage");

        let t = table(&["status_note", "status"]);
        assert_eq!(resolve(&t, STAGE_KEYWORDS).unwrap().name, "status_note");
    }

    #[test]
    fn close_date_preferred_over_other_dates() {
        let t = table(&["created_date", "close_date"]);
        assert_eq!(resolve(&t, DATE_KEYWORDS).unwrap().name, "close_date");
    }

    #[test]
    fn unmatched_roles_are_none() {
        let t = table(&["item_name", "owner"]);
        let cols = DealColumns::resolve(&t);
        assert_eq!(cols, DealColumns::default());
        assert!(!cols.has_sector_amounts());
    }

    #[test]
    fn work_order_roles_resolve_independently() {
        let t = table(&["industry", "billed_revenue"]);
        let cols = WorkOrderColumns::resolve(&t);
        assert_eq!(cols.sector.unwrap().name, "industry");
        assert_eq!(cols.amount.unwrap().name, "billed_revenue");
    }

    proptest! {
        /// Property: resolution is a pure function of headers and keywords.
        #[test]
        fn resolution_is_idempotent(headers in prop::collection::hash_set("[a-z_]{1,12}", 0..8)) {
            let t = RecordTable::new(headers).unwrap();
            for keywords in [AMOUNT_KEYWORDS, STAGE_KEYWORDS, SECTOR_KEYWORDS, DATE_KEYWORDS] {
                let first = resolve(&t, keywords);
                let second = resolve(&t, keywords);
                prop_assert_eq!(first, second);
            }
            prop_assert_eq!(DealColumns::resolve(&t), DealColumns::resolve(&t));
        }
    }
}
