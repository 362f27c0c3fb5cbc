//! # spp-rentability
//!
//! Table-location and extraction engine for the monthly rentability
//! bulletins published by the Peruvian pension-fund supervisor (SBS). Each
//! bulletin is a spreadsheet carrying two logical tables — accumulated and
//! annualized nominal/real returns per AFP — whose position, headers and
//! formatting drift across years and fund categories.
//!
//! The pipeline locates both tables by keyword and structural signals,
//! classifies every candidate cell (placeholder tokens and implausible
//! values are dropped, never zero-filled), and merges the two tables into
//! one record per institution under stable composite keys.
//!
//! ## Quick Start
//!
//! ```no_run
//! use spp_rentability::{reader, Extractor, RentabilityStore};
//!
//! # fn main() -> Result<(), spp_rentability::RentabilityError> {
//! let extractor = Extractor::new();
//! let result = reader::process_file(&extractor, "FP-1220-1-my2025.XLS")?;
//!
//! for record in &result.institutions {
//!     println!("{}: {:?}", record.institution_name, record.values.get("period_1_nominal"));
//! }
//!
//! let mut store = RentabilityStore::new();
//! store.insert(result);
//! let ranking = store.compare(1, None, "period_1_accumulated_nominal");
//! # Ok(())
//! # }
//! ```
//!
//! ## Value keys
//!
//! Every extracted float is stored under an ordinal key
//! `period_<n>_<kind>_<variant>` (1-based horizon, `accumulated` or
//! `annualized`, `nominal` or `real`). When the header text was readable,
//! the same float also appears under the literal period
//! (`05/2024_accumulated_nominal`) and descriptive label
//! (`1 año_accumulated_nominal`) key forms. Accumulated keys additionally
//! get a bare alias with the kind segment removed (`period_1_nominal`);
//! annualized keys never do, so the two kinds cannot collide.
//!
//! ## Degradation
//!
//! Malformed content is not an error: a missing table, an unmatched
//! institution or a placeholder cell simply produces fewer keys. Only an
//! unreadable file or a structurally unusable grid fails, and batch
//! processing skips such files instead of aborting.

pub mod builder;
pub mod classify;
pub mod error;
pub mod extractor;
pub mod filename;
pub mod grid;
pub mod reader;
pub mod store;
pub mod types;

mod combine;
mod extract;
mod legacy;
mod locate;

pub use builder::ExtractorBuilder;
pub use classify::{is_numeric_candidate, to_float};
pub use error::RentabilityError;
pub use extractor::Extractor;
pub use filename::parse_filename;
pub use grid::{CellValue, RawGrid};
pub use reader::{process_batch, process_file, read_grid, read_grid_from_path};
pub use store::{CalculationTypeFilter, RankedReturn, RentabilityStore, StoreSummary};
pub use types::{
    Diagnostics, ExtractionResult, FundPeriod, HorizonColumn, InstitutionReturnRecord,
    TableAnchor, TableKind, Variant,
};
