//! Store Module
//!
//! In-memory query layer over extraction results, keyed by fund category and
//! reporting period. The store is an explicit value the caller owns and
//! passes around; there is no process-global instance. All lookups return
//! `Option`/empty collections for missing data rather than guessing.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ExtractionResult, InstitutionReturnRecord, TableKind};

/// Period key used when the bulletin filename carried no recognizable
/// reporting period.
const UNKNOWN_PERIOD: &str = "unknown";

/// Restrict a record's composite keys to one calculation type.
pub trait CalculationTypeFilter {
    /// The subset of values whose key carries the given kind's segment.
    /// Bare legacy aliases carry no segment and are never included.
    fn values_of_kind(&self, kind: TableKind) -> BTreeMap<String, f64>;
}

impl CalculationTypeFilter for InstitutionReturnRecord {
    fn values_of_kind(&self, kind: TableKind) -> BTreeMap<String, f64> {
        let segment = format!("_{}_", kind.key_segment());
        self.values
            .iter()
            .filter(|(key, _)| key.contains(&segment))
            .map(|(key, &value)| (key.clone(), value))
            .collect()
    }
}

/// One ranked entry of a cross-institution comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedReturn {
    /// 1-based rank, best (highest) return first.
    pub rank: usize,
    pub institution_name: String,
    pub value: f64,
}

/// Aggregate counts over everything the store holds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreSummary {
    pub total_results: usize,
    pub fund_categories: Vec<u8>,
    pub institutions: Vec<String>,

    /// Latest known period per fund category (categories with only
    /// unknown-period results are absent).
    pub latest_periods: BTreeMap<u8, String>,
}

/// In-memory collection of extraction results.
///
/// Results land under `(fund_category, period)`; a result whose filename
/// yielded no category is stored under category 0, and one with no period
/// under the `"unknown"` period key. Inserting a second result for the same
/// key replaces the first (re-processing a corrected bulletin wins).
///
/// # Examples
///
/// ```
/// use spp_rentability::{CellValue, Extractor, RawGrid, RentabilityStore};
///
/// # fn main() -> Result<(), spp_rentability::RentabilityError> {
/// let grid = RawGrid::from_rows(vec![vec![CellValue::Text("informe".into())]]);
/// let result = Extractor::new().extract_all(&grid, "FP-1220-1-my2025.XLS")?;
///
/// let mut store = RentabilityStore::new();
/// store.insert(result);
/// assert_eq!(store.available_periods(1), vec!["2025-05".to_string()]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RentabilityStore {
    entries: BTreeMap<(u8, String), Vec<InstitutionReturnRecord>>,
}

impl RentabilityStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one extraction result, replacing any previous result stored
    /// under the same fund category and period.
    pub fn insert(&mut self, result: ExtractionResult) {
        let category = result.fund_period.fund_category.unwrap_or(0);
        let period = result
            .fund_period
            .period_string()
            .unwrap_or_else(|| UNKNOWN_PERIOD.to_string());

        debug!(category, period = %period, institutions = result.institutions.len(), "result stored");
        self.entries.insert((category, period), result.institutions);
    }

    /// Number of stored results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All records for one fund category and period. Empty slice when the
    /// combination was never stored.
    pub fn records(&self, fund_category: u8, period: &str) -> &[InstitutionReturnRecord] {
        self.entries
            .get(&(fund_category, period.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// One institution's record for a fund category, at the given period or
    /// (when `period` is `None`) the latest known period of that category.
    /// `None` when the institution has no data there; absence is explicit,
    /// never substituted with another period's values.
    pub fn get_record(
        &self,
        institution: &str,
        fund_category: u8,
        period: Option<&str>,
    ) -> Option<&InstitutionReturnRecord> {
        let period = match period {
            Some(p) => p.to_string(),
            None => self.latest_period(fund_category)?,
        };

        self.records(fund_category, &period)
            .iter()
            .find(|r| r.institution_name.eq_ignore_ascii_case(institution))
    }

    /// Latest known period of a fund category (`"YYYY-MM"` keys sort
    /// chronologically). Unknown-period results never win.
    pub fn latest_period(&self, fund_category: u8) -> Option<String> {
        self.entries
            .keys()
            .filter(|(cat, period)| *cat == fund_category && period != UNKNOWN_PERIOD)
            .map(|(_, period)| period.clone())
            .max()
    }

    /// All periods stored for a fund category, chronologically ascending.
    pub fn available_periods(&self, fund_category: u8) -> Vec<String> {
        self.entries
            .keys()
            .filter(|(cat, _)| *cat == fund_category)
            .map(|(_, period)| period.clone())
            .collect()
    }

    /// All fund categories with at least one stored result.
    pub fn available_fund_categories(&self) -> Vec<u8> {
        self.entries
            .keys()
            .map(|(cat, _)| *cat)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// All institution names appearing anywhere in the store, sorted.
    pub fn institutions(&self) -> Vec<String> {
        self.entries
            .values()
            .flatten()
            .map(|r| r.institution_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rank all institutions of one fund category and period by a single
    /// composite key, best return first. Institutions lacking the key are
    /// omitted. `period = None` means the latest known period.
    pub fn compare(
        &self,
        fund_category: u8,
        period: Option<&str>,
        key: &str,
    ) -> Vec<RankedReturn> {
        let period = match period {
            Some(p) => p.to_string(),
            None => match self.latest_period(fund_category) {
                Some(p) => p,
                None => return Vec::new(),
            },
        };

        let mut returns: Vec<(String, f64)> = self
            .records(fund_category, &period)
            .iter()
            .filter_map(|r| {
                r.values
                    .get(key)
                    .map(|&v| (r.institution_name.clone(), v))
            })
            .collect();

        // Descending by value; ties broken by name for determinism.
        returns.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        returns
            .into_iter()
            .enumerate()
            .map(|(i, (institution_name, value))| RankedReturn {
                rank: i + 1,
                institution_name,
                value,
            })
            .collect()
    }

    /// Aggregate counts over the whole store.
    pub fn summary(&self) -> StoreSummary {
        let mut latest_periods = BTreeMap::new();
        for category in self.available_fund_categories() {
            if let Some(period) = self.latest_period(category) {
                latest_periods.insert(category, period);
            }
        }

        StoreSummary {
            total_results: self.entries.len(),
            fund_categories: self.available_fund_categories(),
            institutions: self.institutions(),
            latest_periods,
        }
    }
}
