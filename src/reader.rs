//! Workbook Reader Module
//!
//! Bridges calamine workbooks to the extraction core's [`RawGrid`]. The
//! bulletins circulate in both legacy `.xls` and modern `.xlsx` form, so the
//! auto-detecting openers are used throughout. Only the first worksheet is
//! read: the bulletins are single-sheet documents.
//!
//! [`process_batch`] fans a directory's worth of files out over rayon; a file
//! that fails to open or parse is logged and skipped, never aborting the rest
//! of the batch.

use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::RentabilityError;
use crate::extractor::Extractor;
use crate::grid::{CellValue, RawGrid};
use crate::types::ExtractionResult;

/// Read the first worksheet of a workbook provided as an in-memory or
/// streaming source (e.g. an HTTP download buffer).
///
/// # Errors
///
/// [`RentabilityError::Parse`] when calamine cannot decode the workbook or
/// the workbook contains no worksheets.
pub fn read_grid<RS: Read + Seek + Clone>(source: RS) -> Result<RawGrid, RentabilityError> {
    let mut workbook = open_workbook_auto_from_rs(source)?;
    first_sheet_grid(&mut workbook)
}

/// Read the first worksheet of a workbook on disk. The format (`.xls` vs
/// `.xlsx`) is detected from the file content, not the extension.
///
/// # Errors
///
/// [`RentabilityError::Io`] when the file cannot be opened,
/// [`RentabilityError::Parse`] when it cannot be decoded.
pub fn read_grid_from_path<P: AsRef<Path>>(path: P) -> Result<RawGrid, RentabilityError> {
    // Bulletins are small; buffering the whole file satisfies calamine's
    // cloneable-source requirement.
    let bytes = std::fs::read(path)?;
    read_grid(Cursor::new(bytes))
}

/// Read one bulletin file and run the full extraction pipeline on it. The
/// fund/period metadata is parsed from the file name component of `path`.
///
/// # Examples
///
/// ```no_run
/// use spp_rentability::{reader, Extractor};
///
/// # fn main() -> Result<(), spp_rentability::RentabilityError> {
/// let extractor = Extractor::new();
/// let result = reader::process_file(&extractor, "bulletins/FP-1220-1-my2025.XLS")?;
/// println!("{} institutions", result.institutions.len());
/// # Ok(())
/// # }
/// ```
pub fn process_file<P: AsRef<Path>>(
    extractor: &Extractor,
    path: P,
) -> Result<ExtractionResult, RentabilityError> {
    let path = path.as_ref();
    let grid = read_grid_from_path(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(file = %path.display(), rows = grid.rows(), cols = grid.cols(), "bulletin loaded");
    extractor.extract_all(&grid, &filename)
}

/// Process many bulletin files in parallel. Files that fail to open, parse
/// or extract are logged at warn level and dropped from the output; the
/// remaining files are unaffected. Results come back in input order.
pub fn process_batch(
    extractor: &Extractor,
    paths: &[PathBuf],
) -> Vec<(PathBuf, ExtractionResult)> {
    let results: Vec<(PathBuf, ExtractionResult)> = paths
        .par_iter()
        .filter_map(|path| match process_file(extractor, path) {
            Ok(result) => Some((path.clone(), result)),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "skipping bulletin");
                None
            }
        })
        .collect();

    info!(total = paths.len(), processed = results.len(), "batch finished");
    results
}

fn first_sheet_grid<RS: Read + Seek + Clone>(
    workbook: &mut Sheets<RS>,
) -> Result<RawGrid, RentabilityError> {
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(calamine::Error::Msg("workbook contains no worksheets"))??;
    Ok(grid_from_range(&range))
}

/// Convert a calamine range into an absolute-coordinate grid.
///
/// Calamine ranges start at the first non-empty cell; the extraction core
/// addresses cells by absolute position, so the range's start offset is
/// re-applied as leading empty rows and columns.
fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let Some((start_row, start_col)) = range.start() else {
        return RawGrid::from_rows(Vec::new());
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
    for range_row in range.rows() {
        let mut row = vec![CellValue::Empty; start_col];
        row.extend(range_row.iter().map(cell_from_data));
        rows.push(row);
    }

    RawGrid::from_rows(rows)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        // Header period cells are occasionally stored as real dates; keep
        // them textual so the horizon detector can still match the year.
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Text(naive.to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
