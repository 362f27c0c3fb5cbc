//! Legacy Extractor Module
//!
//! Self-contained single-pass extractor for bulletins the anchor-based
//! pipeline cannot parse. It assumes the oldest layout family: time-horizon
//! headers in row 4, descriptive labels in row 5, accumulated institution
//! rows in the fixed band 7..=10, and the annualized block located by
//! scanning for its label row. The orchestrator calls this deliberately when
//! the primary pipeline yields nothing — it is a named fallback, not an
//! alternate definition of the same logic.

use tracing::debug;

use crate::builder::ExtractionConfig;
use crate::combine;
use crate::extract::{self, PartialRecord};
use crate::grid::RawGrid;
use crate::locate;
use crate::types::{InstitutionReturnRecord, TableAnchor, TableKind};

/// Fixed legacy coordinates: title at row 2 puts headers at row 4 and the
/// first institution row at row 7.
const LEGACY_HEADER_ROW: usize = 4;
const LEGACY_FIRST_DATA_ROW: usize = 7;

/// Extract using the fixed legacy row bands. Returns combined institution
/// records, possibly empty.
pub(crate) fn extract_legacy(
    grid: &RawGrid,
    config: &ExtractionConfig,
) -> (Vec<InstitutionReturnRecord>, Vec<PartialRecord>) {
    let accumulated_anchor = TableAnchor {
        kind: TableKind::Accumulated,
        title_row: LEGACY_FIRST_DATA_ROW - 5,
        header_row: LEGACY_HEADER_ROW,
        first_data_row: LEGACY_FIRST_DATA_ROW,
    };

    let mut partials = extract::extract_table(grid, &accumulated_anchor, config);

    if let Some(label_row) = find_annualized_label_row(grid, config) {
        debug!(label_row, "legacy annualized label row found");
        let annualized_anchor = TableAnchor {
            kind: TableKind::Annualized,
            title_row: label_row,
            header_row: LEGACY_HEADER_ROW,
            first_data_row: label_row + 1,
        };
        partials.extend(extract::extract_table(grid, &annualized_anchor, config));
    }

    let records = combine::combine(&partials, &config.institutions);
    (records, partials)
}

/// Scan below the accumulated band for a cell naming the annualized table
/// (either gender variant).
fn find_annualized_label_row(grid: &RawGrid, config: &ExtractionConfig) -> Option<usize> {
    let start = LEGACY_FIRST_DATA_ROW + 1;
    let end = (start + 2 * config.scan_rows).min(grid.rows());
    let max_col = config.scan_cols.min(grid.cols());

    for row in start..end {
        for col in 0..max_col {
            let text = grid.text(row, col).to_uppercase();
            if locate::contains_any(&text, locate::ANNUALIZED_KEYWORDS) {
                return Some(row);
            }
        }
    }
    None
}
