//! Table Locator Module
//!
//! Scans the top region of a grid for the signals that mark the start of the
//! accumulated and annualized sub-tables. Keyword detection runs first (most
//! reliable when present); structural detection — an institution-name row
//! that carries digits — covers bulletins whose titles were reworded. No
//! anchor is ever produced without positive evidence.

use std::collections::BTreeMap;

use tracing::debug;

use crate::builder::ExtractionConfig;
use crate::grid::RawGrid;
use crate::types::{TableAnchor, TableKind};

/// Title keyword families, uppercased (accent and gender variants).
const ACCUMULATED_KEYWORDS: &[&str] = &["ACUMULADA", "ACUMULADO"];
pub(crate) const ANNUALIZED_KEYWORDS: &[&str] = &["ANUALIZADA", "ANUALIZADO"];

/// Row offsets from the title row, tuned to the SBS layout family. The
/// annualized table carries one extra label row between title and data.
const ACCUMULATED_HEADER_OFFSET: usize = 2;
const ACCUMULATED_DATA_OFFSET: usize = 5;
const ANNUALIZED_HEADER_OFFSET: usize = 3;
const ANNUALIZED_DATA_OFFSET: usize = 6;

/// Locate the anchors of the two logical tables. Zero, one or two entries
/// may come back; callers must tolerate partial results.
pub(crate) fn locate(grid: &RawGrid, config: &ExtractionConfig) -> BTreeMap<TableKind, TableAnchor> {
    let mut anchors = BTreeMap::new();

    scan_keywords(grid, config, &mut anchors);

    if !anchors.contains_key(&TableKind::Accumulated) {
        if let Some(anchor) = structural_accumulated(grid, config) {
            debug!(first_data_row = anchor.first_data_row, "accumulated table anchored structurally");
            anchors.insert(TableKind::Accumulated, anchor);
        }
    }

    if !anchors.contains_key(&TableKind::Annualized) {
        if let Some(accumulated) = anchors.get(&TableKind::Accumulated).copied() {
            if let Some(anchor) = structural_annualized(grid, config, &accumulated) {
                debug!(first_data_row = anchor.first_data_row, "annualized table anchored structurally");
                anchors.insert(TableKind::Annualized, anchor);
            }
        }
    }

    anchors
}

/// Keyword pass over the bounded top region.
fn scan_keywords(
    grid: &RawGrid,
    config: &ExtractionConfig,
    anchors: &mut BTreeMap<TableKind, TableAnchor>,
) {
    let max_row = config.scan_rows.min(grid.rows());
    let max_col = config.scan_cols.min(grid.cols());

    for row in 0..max_row {
        for col in 0..max_col {
            let text = grid.text(row, col).to_uppercase();
            if text.is_empty() {
                continue;
            }

            let accumulated = contains_any(&text, ACCUMULATED_KEYWORDS);
            let annualized = contains_any(&text, ANNUALIZED_KEYWORDS);

            // A cell naming both families is the bulletin's overall title,
            // not a sub-table title.
            if accumulated && annualized {
                continue;
            }

            if accumulated && !anchors.contains_key(&TableKind::Accumulated) {
                debug!(row, col, "accumulated title keyword found");
                anchors.insert(
                    TableKind::Accumulated,
                    TableAnchor {
                        kind: TableKind::Accumulated,
                        title_row: row,
                        header_row: row + ACCUMULATED_HEADER_OFFSET,
                        first_data_row: row + ACCUMULATED_DATA_OFFSET,
                    },
                );
            } else if annualized && !anchors.contains_key(&TableKind::Annualized) {
                debug!(row, col, "annualized title keyword found");
                anchors.insert(
                    TableKind::Annualized,
                    TableAnchor {
                        kind: TableKind::Annualized,
                        title_row: row,
                        header_row: row + ANNUALIZED_HEADER_OFFSET,
                        first_data_row: row + ANNUALIZED_DATA_OFFSET,
                    },
                );
            }

            if anchors.len() == 2 {
                return;
            }
        }
    }
}

pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Whether the row starts with an institution name and carries at least one
/// digit — the structural signature of a data row.
fn is_institution_data_row(grid: &RawGrid, config: &ExtractionConfig, row: usize) -> bool {
    let first = grid.text(row, 0).to_lowercase();
    if first.is_empty() {
        return false;
    }
    let named = config
        .institutions
        .iter()
        .any(|name| first.contains(&name.to_lowercase()));
    named && grid.row_has_digit(row)
}

/// Structural detection of the first (accumulated) table: the first
/// institution data row in the plausible top band.
fn structural_accumulated(grid: &RawGrid, config: &ExtractionConfig) -> Option<TableAnchor> {
    let max_row = config.scan_rows.min(grid.rows());
    for row in 0..max_row {
        if is_institution_data_row(grid, config, row) {
            return Some(TableAnchor {
                kind: TableKind::Accumulated,
                title_row: row.saturating_sub(ACCUMULATED_DATA_OFFSET),
                header_row: row.saturating_sub(ACCUMULATED_DATA_OFFSET - ACCUMULATED_HEADER_OFFSET),
                first_data_row: row,
            });
        }
    }
    None
}

/// Structural detection of the second (annualized) table: the next
/// institution data row in a band below the accumulated block.
fn structural_annualized(
    grid: &RawGrid,
    config: &ExtractionConfig,
    accumulated: &TableAnchor,
) -> Option<TableAnchor> {
    let start = accumulated.first_data_row + config.institutions.len();
    let end = (start + config.scan_rows).min(grid.rows());
    for row in start..end {
        if is_institution_data_row(grid, config, row) {
            return Some(TableAnchor {
                kind: TableKind::Annualized,
                title_row: row.saturating_sub(ANNUALIZED_DATA_OFFSET),
                header_row: row.saturating_sub(ANNUALIZED_DATA_OFFSET - ANNUALIZED_HEADER_OFFSET),
                first_data_row: row,
            });
        }
    }
    None
}
