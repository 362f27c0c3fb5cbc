//! Error Types Module
//!
//! Structured error type for the whole crate, built with `thiserror` for
//! automatic conversions and message formatting.
//!
//! The extraction core degrades gracefully for malformed spreadsheet content
//! (missing cells, placeholder tokens, absent tables) — none of that is an
//! error. The variants below cover the remaining cases: unreadable input
//! files, a structurally unusable grid (fatal for that one file), and invalid
//! builder configuration.

use thiserror::Error;

/// Error type used across the `spp-rentability` crate.
#[derive(Error, Debug)]
pub enum RentabilityError {
    /// I/O failure while reading a bulletin file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// calamine failed to decode the spreadsheet (corrupt or unsupported file).
    #[error("failed to parse spreadsheet: {0}")]
    Parse(#[from] calamine::Error),

    /// The grid argument itself is structurally unusable (cannot be indexed
    /// as rows/columns). Fatal for the file that produced it; batch callers
    /// must skip and log, never abort the remaining files.
    #[error("unusable grid: {0}")]
    Grid(String),

    /// Builder configuration failed validation.
    #[error("configuration error: {0}")]
    Config(String),
}
