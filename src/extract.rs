//! Table Extractor Module
//!
//! Walks one anchored table: detects the time-horizon column pairs from the
//! header row, finds each institution's row inside a bounded window, and
//! pulls the (nominal, real) value pair per horizon through the cell
//! classifier. A missing or invalid cell simply contributes no key —
//! downstream consumers treat absence as "unknown", never as a zero return.

use std::collections::BTreeMap;

use crate::builder::{ExtractionConfig, FIXED_HORIZON_COLUMNS};
use crate::classify;
use crate::grid::RawGrid;
use crate::types::{HorizonColumn, TableAnchor, TableKind, Variant};

/// Per-institution values pulled from a single table; two of these (one per
/// table kind) are merged by the record combiner.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PartialRecord {
    pub institution_name: String,
    pub kind: TableKind,
    pub values: BTreeMap<String, f64>,
}

/// Extract all institutions under one anchor. Institutions whose row is not
/// found, or whose cells all fail classification, yield no partial record.
pub(crate) fn extract_table(
    grid: &RawGrid,
    anchor: &TableAnchor,
    config: &ExtractionConfig,
) -> Vec<PartialRecord> {
    let horizons = detect_horizons(grid, anchor, config);
    let mut partials = Vec::new();

    for institution in &config.institutions {
        let Some(row) = find_institution_row(grid, anchor, config, institution) else {
            continue;
        };

        let mut values = BTreeMap::new();
        for (ordinal, horizon) in horizons.iter().enumerate() {
            store_cell(
                grid,
                row,
                horizon.index,
                ordinal + 1,
                horizon,
                anchor.kind,
                Variant::Nominal,
                config,
                &mut values,
            );
            store_cell(
                grid,
                row,
                horizon.index + 1,
                ordinal + 1,
                horizon,
                anchor.kind,
                Variant::Real,
                config,
                &mut values,
            );
        }

        if !values.is_empty() {
            partials.push(PartialRecord {
                institution_name: institution.clone(),
                kind: anchor.kind,
                values,
            });
        }
    }

    partials
}

/// Classify one cell and, when valid, store it under its ordinal key plus the
/// literal-period and descriptive-label key forms when those were detected.
#[allow(clippy::too_many_arguments)]
fn store_cell(
    grid: &RawGrid,
    row: usize,
    col: usize,
    ordinal: usize,
    horizon: &HorizonColumn,
    kind: TableKind,
    variant: Variant,
    config: &ExtractionConfig,
    values: &mut BTreeMap<String, f64>,
) {
    let Some(value) = classify::to_float_with_band(grid.get(row, col), config.max_abs_return)
    else {
        return;
    };

    let kind_seg = kind.key_segment();
    let variant_seg = variant.key_segment();

    values.insert(format!("period_{}_{}_{}", ordinal, kind_seg, variant_seg), value);
    if let Some(period) = &horizon.period {
        values.insert(format!("{}_{}_{}", period, kind_seg, variant_seg), value);
    }
    if let Some(label) = &horizon.label {
        values.insert(format!("{}_{}_{}", label, kind_seg, variant_seg), value);
    }
}

/// Detect the horizon column pairs from the header row, trying up to two
/// adjacent rows below it before falling back to the fixed standard layout.
pub(crate) fn detect_horizons(
    grid: &RawGrid,
    anchor: &TableAnchor,
    config: &ExtractionConfig,
) -> Vec<HorizonColumn> {
    for header_row in anchor.header_row..=anchor.header_row + 2 {
        if header_row >= anchor.first_data_row {
            break;
        }
        let horizons = horizons_in_row(grid, header_row, config);
        if !horizons.is_empty() {
            return horizons;
        }
    }

    // Fixed standard layout: five horizon pairs at known offsets, with no
    // literal-period or label key forms.
    FIXED_HORIZON_COLUMNS
        .iter()
        .map(|&index| HorizonColumn {
            index,
            period: None,
            label: None,
        })
        .collect()
}

/// Horizon columns present in a single candidate header row.
fn horizons_in_row(grid: &RawGrid, row: usize, config: &ExtractionConfig) -> Vec<HorizonColumn> {
    let max_col = config.scan_cols.min(grid.cols());
    let mut horizons = Vec::new();

    for col in 1..max_col {
        let cell = grid.text(row, col);
        if !looks_like_period(&cell) {
            continue;
        }

        let label_text = grid.text(row + 1, col);
        let label = label_text
            .to_lowercase()
            .contains("año")
            .then(|| label_text.clone());

        horizons.push(HorizonColumn {
            index: col,
            period: Some(cell),
            label,
        });
    }

    horizons
}

/// Header cell heuristics: a slash plus a digit (e.g. `05/2024`), or a
/// standalone four-digit year token.
fn looks_like_period(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if text.contains('/') && text.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }
    text.split(|c: char| !c.is_ascii_digit())
        .any(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
}

/// Find the institution's data row inside the bounded window below the
/// anchor (case-insensitive substring match on the first cell).
fn find_institution_row(
    grid: &RawGrid,
    anchor: &TableAnchor,
    config: &ExtractionConfig,
    institution: &str,
) -> Option<usize> {
    let needle = institution.to_lowercase();
    let end = (anchor.first_data_row + config.row_window).min(grid.rows());

    (anchor.first_data_row..end).find(|&row| grid.text(row, 0).to_lowercase().contains(&needle))
}
