//! Builder Module
//!
//! Fluent builder for [`Extractor`] instances. Every knob has a default tuned
//! to the SBS bulletin layout; overrides exist for the bounds that vary when
//! a new report family appears.

use crate::error::RentabilityError;
use crate::extractor::Extractor;

/// Default institution (AFP) list, in canonical output order.
pub(crate) const DEFAULT_INSTITUTIONS: [&str; 4] = ["Habitat", "Integra", "Prima", "Profuturo"];

/// Column indices of the nominal cells in the fixed standard layout
/// (the real cell is always one column to the right).
pub(crate) const FIXED_HORIZON_COLUMNS: [usize; 5] = [1, 3, 5, 7, 9];

/// Extraction settings shared by the locator, extractor and legacy path.
#[derive(Debug, Clone)]
pub(crate) struct ExtractionConfig {
    /// Institution names, matched case-insensitively as substrings of the
    /// first cell of a data row.
    pub institutions: Vec<String>,

    /// Keyword/structural scan bounds (top-left region of the grid).
    pub scan_rows: usize,
    pub scan_cols: usize,

    /// How many rows below `first_data_row` to search for an institution.
    pub row_window: usize,

    /// Plausibility band for classified values (absolute maximum).
    pub max_abs_return: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            institutions: DEFAULT_INSTITUTIONS.iter().map(|s| s.to_string()).collect(),
            scan_rows: 30,
            scan_cols: 30,
            row_window: 15,
            max_abs_return: crate::classify::DEFAULT_MAX_ABS_RETURN,
        }
    }
}

/// Fluent builder for [`Extractor`].
///
/// # Examples
///
/// ```
/// use spp_rentability::ExtractorBuilder;
///
/// # fn main() -> Result<(), spp_rentability::RentabilityError> {
/// let extractor = ExtractorBuilder::new()
///     .with_row_window(20)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    config: ExtractionConfig,
}

impl ExtractorBuilder {
    /// Builder with the default SBS bulletin settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the institution list (canonical output order).
    pub fn with_institutions<I, S>(mut self, institutions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.institutions = institutions.into_iter().map(Into::into).collect();
        self
    }

    /// Override the keyword/structural scan bounds.
    pub fn with_scan_bounds(mut self, rows: usize, cols: usize) -> Self {
        self.config.scan_rows = rows;
        self.config.scan_cols = cols;
        self
    }

    /// Override how far below an anchor institution rows are searched.
    pub fn with_row_window(mut self, rows: usize) -> Self {
        self.config.row_window = rows;
        self
    }

    /// Override the plausibility band (absolute maximum accepted value).
    pub fn with_plausibility_band(mut self, max_abs: f64) -> Self {
        self.config.max_abs_return = max_abs;
        self
    }

    /// Validate the configuration and build the extractor.
    ///
    /// # Errors
    ///
    /// [`RentabilityError::Config`] when the institution list is empty, a
    /// scan bound is zero, or the plausibility band is not a positive finite
    /// number.
    pub fn build(self) -> Result<Extractor, RentabilityError> {
        if self.config.institutions.is_empty() {
            return Err(RentabilityError::Config(
                "institution list must not be empty".to_string(),
            ));
        }
        if self.config.scan_rows == 0 || self.config.scan_cols == 0 {
            return Err(RentabilityError::Config(
                "scan bounds must be non-zero".to_string(),
            ));
        }
        if !(self.config.max_abs_return.is_finite() && self.config.max_abs_return > 0.0) {
            return Err(RentabilityError::Config(
                "plausibility band must be a positive finite number".to_string(),
            ));
        }

        Ok(Extractor::with_config(self.config))
    }
}
