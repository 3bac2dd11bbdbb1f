//! Raw string table -> typed deal rows.
//!
//! Every coerced value records whether it parsed, was defaulted because the
//! text was unparseable, or was missing, so the absorbed-failure policy can be
//! audited after the fact.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use boardlens_core::{RecordTable, Row, is_blank, label_or_unknown, parse_amount, parse_datetime};

use crate::columns::{ColumnRef, DealColumns};
use crate::window::QuarterWindow;

/// Where a coerced value came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Parsed,
    /// Text was present but did not parse; a default was substituted.
    Defaulted,
    /// Cell was absent or blank.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coerced<T> {
    pub value: T,
    pub provenance: Provenance,
}

/// Amount cell -> number; unparseable and missing values become 0.
pub fn coerce_amount(raw: Option<&str>) -> Coerced<f64> {
    match raw {
        None => missing(0.0),
        Some(text) if is_blank(text) => missing(0.0),
        Some(text) => match parse_amount(text) {
            Some(value) => parsed(value),
            None => defaulted(0.0),
        },
    }
}

/// Date cell -> timestamp; unparseable and missing values become "no date".
pub fn coerce_date(raw: Option<&str>) -> Coerced<Option<NaiveDateTime>> {
    match raw {
        None => missing(None),
        Some(text) if is_blank(text) => missing(None),
        Some(text) => match parse_datetime(text) {
            Some(at) => parsed(Some(at)),
            None => defaulted(None),
        },
    }
}

fn parsed<T>(value: T) -> Coerced<T> {
    Coerced {
        value,
        provenance: Provenance::Parsed,
    }
}

fn defaulted<T>(value: T) -> Coerced<T> {
    Coerced {
        value,
        provenance: Provenance::Defaulted,
    }
}

fn missing<T>(value: T) -> Coerced<T> {
    Coerced {
        value,
        provenance: Provenance::Missing,
    }
}

/// One deal after coercion. A field is `None` when its column did not resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedDeal {
    pub amount: Option<Coerced<f64>>,
    /// Normalized stage label.
    pub stage: Option<String>,
    /// Normalized sector label.
    pub sector: Option<String>,
    pub close_date: Option<Coerced<Option<NaiveDateTime>>>,
}

impl TypedDeal {
    /// Without a date column every deal is in window; with one, a deal needs a
    /// parsed date inside `window`.
    pub fn in_window(&self, window: &QuarterWindow) -> bool {
        match &self.close_date {
            None => true,
            Some(date) => date.value.is_some_and(|at| window.contains(at)),
        }
    }

    /// Coerced amount, 0 when the amount column is unresolved.
    pub fn amount_value(&self) -> f64 {
        self.amount.map(|a| a.value).unwrap_or(0.0)
    }
}

/// Per-column tallies of how values were obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoercionAudit {
    pub amounts_parsed: usize,
    pub amounts_defaulted: usize,
    pub amounts_missing: usize,
    pub dates_parsed: usize,
    pub dates_unparseable: usize,
    pub dates_missing: usize,
}

impl CoercionAudit {
    fn record_amount(&mut self, provenance: Provenance) {
        match provenance {
            Provenance::Parsed => self.amounts_parsed += 1,
            Provenance::Defaulted => self.amounts_defaulted += 1,
            Provenance::Missing => self.amounts_missing += 1,
        }
    }

    fn record_date(&mut self, provenance: Provenance) {
        match provenance {
            Provenance::Parsed => self.dates_parsed += 1,
            Provenance::Defaulted => self.dates_unparseable += 1,
            Provenance::Missing => self.dates_missing += 1,
        }
    }
}

/// The deals board after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedDeals {
    pub columns: DealColumns,
    pub rows: Vec<TypedDeal>,
    pub audit: CoercionAudit,
}

/// Coerce every deal row according to the resolved columns.
pub fn coerce_deals(table: &RecordTable, columns: &DealColumns) -> TypedDeals {
    let mut audit = CoercionAudit::default();
    let mut rows = Vec::with_capacity(table.len());

    for row in table.rows() {
        let amount = columns.amount.as_ref().map(|c| coerce_amount(cell(&row, c)));
        let close_date = columns
            .close_date
            .as_ref()
            .map(|c| coerce_date(cell(&row, c)));

        if let Some(a) = &amount {
            audit.record_amount(a.provenance);
        }
        if let Some(d) = &close_date {
            audit.record_date(d.provenance);
        }

        rows.push(TypedDeal {
            amount,
            stage: columns.stage.as_ref().map(|c| label_or_unknown(cell(&row, c))),
            sector: columns.sector.as_ref().map(|c| label_or_unknown(cell(&row, c))),
            close_date,
        });
    }

    TypedDeals {
        columns: columns.clone(),
        rows,
        audit,
    }
}

pub(crate) fn cell<'a>(row: &Row<'a>, column: &ColumnRef) -> Option<&'a str> {
    row.get(column.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amounts_record_provenance() {
        assert_eq!(coerce_amount(Some("100")), parsed(100.0));
        assert_eq!(coerce_amount(Some("1,000")), defaulted(0.0));
        assert_eq!(coerce_amount(Some("abc")), defaulted(0.0));
        assert_eq!(coerce_amount(Some("  ")), missing(0.0));
        assert_eq!(coerce_amount(None), missing(0.0));
    }

    #[test]
    fn dates_record_provenance() {
        assert_eq!(coerce_date(Some("2024-02-01")).provenance, Provenance::Parsed);
        assert_eq!(coerce_date(Some("soon")), defaulted(None));
        assert_eq!(coerce_date(None), missing(None));
    }

    #[test]
    fn coerce_deals_normalizes_labels_and_audits() {
        let table = RecordTable::from_json(&json!([
            {"amount": "100", "stage": " Won ", "sector": "Tech", "close_date": "2024-02-01"},
            {"amount": "1,000", "stage": null, "close_date": "whenever"},
            {"stage": "lead"},
        ]))
        .unwrap();
        let columns = DealColumns::resolve(&table);
        let typed = coerce_deals(&table, &columns);

        assert_eq!(typed.rows.len(), 3);
        assert_eq!(typed.rows[0].stage.as_deref(), Some("won"));
        assert_eq!(typed.rows[0].sector.as_deref(), Some("tech"));
        assert_eq!(typed.rows[1].stage.as_deref(), Some("unknown"));
        assert_eq!(typed.rows[1].amount_value(), 0.0);

        assert_eq!(
            typed.audit,
            CoercionAudit {
                amounts_parsed: 1,
                amounts_defaulted: 1,
                amounts_missing: 1,
                dates_parsed: 1,
                dates_unparseable: 1,
                dates_missing: 1,
            }
        );
    }

    #[test]
    fn unresolved_columns_leave_fields_empty() {
        let table = RecordTable::from_json(&json!([{"owner": "sam"}])).unwrap();
        let typed = coerce_deals(&table, &DealColumns::resolve(&table));

        let deal = &typed.rows[0];
        assert!(deal.amount.is_none());
        assert!(deal.stage.is_none());
        assert!(deal.close_date.is_none());
        assert_eq!(typed.audit, CoercionAudit::default());
    }
}
