//! Types Module
//!
//! Shared data types used across the crate: the fund/period metadata derived
//! from bulletin filenames, the anchor coordinates produced by the table
//! locator, and the externally visible extraction records.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which of the two logical tables a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Total return over a horizon ("Rentabilidad Acumulada").
    Accumulated,

    /// Equivalent average-per-year return ("Rentabilidad Anualizada").
    Annualized,
}

impl TableKind {
    /// Segment used inside composite value keys (e.g. `period_3_accumulated_real`).
    pub fn key_segment(&self) -> &'static str {
        match self {
            TableKind::Accumulated => "accumulated",
            TableKind::Annualized => "annualized",
        }
    }
}

/// Nominal (unadjusted) vs. real (inflation-adjusted) return variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Nominal,
    Real,
}

impl Variant {
    /// Segment used inside composite value keys.
    pub fn key_segment(&self) -> &'static str {
        match self {
            Variant::Nominal => "nominal",
            Variant::Real => "real",
        }
    }
}

/// Fund category and reporting period derived from a bulletin filename.
///
/// Fields the filename cannot justify are left unset rather than guessed;
/// a filename with no recognizable pattern yields an all-`None` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FundPeriod {
    /// Fund category 0..=3 (conservative through growth).
    pub fund_category: Option<u8>,

    /// Four-digit report year.
    pub report_year: Option<i32>,

    /// Report month, 1..=12.
    pub report_month: Option<u32>,
}

impl FundPeriod {
    /// `"YYYY-MM"` rendition of the reporting period, when both parts are known.
    pub fn period_string(&self) -> Option<String> {
        match (self.report_year, self.report_month) {
            (Some(y), Some(m)) => Some(format!("{:04}-{:02}", y, m)),
            _ => None,
        }
    }

    /// First calendar day of the reporting period, for chronological ordering.
    pub fn first_day(&self) -> Option<NaiveDate> {
        match (self.report_year, self.report_month) {
            (Some(y), Some(m)) => NaiveDate::from_ymd_opt(y, m, 1),
            _ => None,
        }
    }

    /// True when the filename matched no known pattern at all.
    pub fn is_empty(&self) -> bool {
        self.fund_category.is_none() && self.report_year.is_none() && self.report_month.is_none()
    }
}

/// Where one logical table begins inside the grid.
///
/// Anchors are ephemeral: computed fresh per extraction run, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableAnchor {
    /// Which logical table this anchor marks.
    pub kind: TableKind,

    /// Row of the table title (keyword row), or the estimated title position
    /// when the anchor was derived structurally.
    pub title_row: usize,

    /// Row holding the time-horizon headers.
    pub header_row: usize,

    /// First row of institution data.
    pub first_data_row: usize,
}

/// One detected time-horizon column pair.
///
/// The nominal value lives at `index`, the real value at `index + 1`. The
/// list of horizons is shared by all institutions within one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizonColumn {
    /// Column of the nominal cell.
    pub index: usize,

    /// Literal header text (e.g. `"05/2024"`), when a header cell was found.
    pub period: Option<String>,

    /// Descriptive label from the row below the header (e.g. `"5 años"`).
    pub label: Option<String>,
}

/// The externally visible per-institution unit.
///
/// Every float in `values` passed the cell classifier; placeholder tokens and
/// out-of-band values are never present. Multiple keys may point at the same
/// float (intentional denormalization for downstream consumers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionReturnRecord {
    /// Canonical institution (AFP) name, e.g. `"Habitat"`.
    pub institution_name: String,

    /// Composite-key → value mapping. `BTreeMap` keeps iteration and
    /// serialization order deterministic across runs.
    pub values: BTreeMap<String, f64>,
}

/// Which table kinds were actually populated, and the anchors that survived
/// the per-anchor sanity check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub has_accumulated: bool,
    pub has_annualized: bool,

    /// Anchors that yielded at least one institution. A keyword match whose
    /// extraction pass came up empty is treated as "anchor not found" and
    /// does not appear here.
    pub anchors_found: BTreeMap<TableKind, TableAnchor>,
}

/// Sole return value of the extraction orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub fund_period: FundPeriod,

    /// Institutions in canonical order; an institution with no data from
    /// either table is omitted entirely.
    pub institutions: Vec<InstitutionReturnRecord>,

    pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_kind_key_segment() {
        assert_eq!(TableKind::Accumulated.key_segment(), "accumulated");
        assert_eq!(TableKind::Annualized.key_segment(), "annualized");
    }

    #[test]
    fn test_variant_key_segment() {
        assert_eq!(Variant::Nominal.key_segment(), "nominal");
        assert_eq!(Variant::Real.key_segment(), "real");
    }

    #[test]
    fn test_fund_period_string() {
        let period = FundPeriod {
            fund_category: Some(1),
            report_year: Some(2025),
            report_month: Some(5),
        };
        assert_eq!(period.period_string(), Some("2025-05".to_string()));
        assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2025, 5, 1));
    }

    #[test]
    fn test_fund_period_partial() {
        let period = FundPeriod {
            fund_category: Some(2),
            report_year: None,
            report_month: Some(3),
        };
        assert_eq!(period.period_string(), None);
        assert_eq!(period.first_day(), None);
        assert!(!period.is_empty());
        assert!(FundPeriod::default().is_empty());
    }

    #[test]
    fn test_record_serialization_is_deterministic() {
        let mut values = BTreeMap::new();
        values.insert("period_1_accumulated_nominal".to_string(), 5.56);
        values.insert("period_1_nominal".to_string(), 5.56);
        let record = InstitutionReturnRecord {
            institution_name: "Habitat".to_string(),
            values,
        };

        let a = serde_json::to_string(&record).unwrap();
        let b = serde_json::to_string(&record).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("period_1_accumulated_nominal"));
    }
}
