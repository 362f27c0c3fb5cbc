//! Extraction Orchestrator Module
//!
//! Top-level entry point of the crate: receives a raw grid plus the source
//! filename, drives locator → extractor → combiner, and falls back to the
//! legacy single-pass extractor when the anchor-based pipeline yields no
//! institutions at all.
//!
//! The orchestrator never errors for malformed spreadsheet *content* — it
//! degrades to an empty result. It errors only when the grid itself is
//! structurally unusable, which batch callers treat as fatal for that single
//! file (skip and log, never abort the batch).

use tracing::{debug, warn};

use crate::builder::{ExtractionConfig, ExtractorBuilder};
use crate::combine;
use crate::error::RentabilityError;
use crate::extract::{self, PartialRecord};
use crate::filename;
use crate::grid::RawGrid;
use crate::legacy;
use crate::locate;
use crate::types::{Diagnostics, ExtractionResult, TableKind};

/// Stateless extraction engine. Cheap to construct; every call to
/// [`extract_all`](Extractor::extract_all) is independent and side-effect
/// free, so one instance may serve any number of threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractionConfig,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Extractor with the default SBS bulletin settings.
    ///
    /// Use [`ExtractorBuilder`] to override bounds or the institution list.
    pub fn new() -> Self {
        ExtractorBuilder::new()
            .build()
            .unwrap_or_else(|_| unreachable!("default configuration is valid"))
    }

    pub(crate) fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline on one grid.
    ///
    /// # Errors
    ///
    /// [`RentabilityError::Grid`] when the grid has zero rows or columns.
    /// Every other anomaly degrades to missing values or an empty
    /// institution list.
    ///
    /// # Examples
    ///
    /// ```
    /// use spp_rentability::{CellValue, Extractor, RawGrid};
    ///
    /// # fn main() -> Result<(), spp_rentability::RentabilityError> {
    /// let grid = RawGrid::from_rows(vec![vec![CellValue::Text("informe".into())]]);
    /// let result = Extractor::new().extract_all(&grid, "FP-1220-1-my2025.XLS")?;
    /// assert_eq!(result.fund_period.report_month, Some(5));
    /// # Ok(())
    /// # }
    /// ```
    pub fn extract_all(
        &self,
        grid: &RawGrid,
        source_filename: &str,
    ) -> Result<ExtractionResult, RentabilityError> {
        if grid.is_unusable() {
            return Err(RentabilityError::Grid(format!(
                "{} rows x {} columns",
                grid.rows(),
                grid.cols()
            )));
        }

        let fund_period = filename::parse_filename(source_filename);
        let anchors = locate::locate(grid, &self.config);

        let mut diagnostics = Diagnostics::default();
        let mut partials: Vec<PartialRecord> = Vec::new();

        for (kind, anchor) in &anchors {
            let table_partials = extract::extract_table(grid, anchor, &self.config);
            if table_partials.is_empty() {
                // Zero-yield anchor: treated the same as "anchor not found"
                // so a mis-anchored table cannot mask the fallback decision.
                debug!(?kind, title_row = anchor.title_row, "anchor yielded no institutions, discarding");
                continue;
            }
            diagnostics.anchors_found.insert(*kind, *anchor);
            partials.extend(table_partials);
        }

        let mut institutions = combine::combine(&partials, &self.config.institutions);

        if institutions.is_empty() {
            warn!(
                filename = source_filename,
                "anchor-based extraction found no institutions, trying legacy layout"
            );
            let (legacy_records, legacy_partials) = legacy::extract_legacy(grid, &self.config);
            institutions = legacy_records;
            partials = legacy_partials;
            diagnostics.anchors_found.clear();
        }

        diagnostics.has_accumulated = partials.iter().any(|p| p.kind == TableKind::Accumulated);
        diagnostics.has_annualized = partials.iter().any(|p| p.kind == TableKind::Annualized);

        Ok(ExtractionResult {
            fund_period,
            institutions,
            diagnostics,
        })
    }
}
