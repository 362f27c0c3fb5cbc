//! Cell Classifier Module
//!
//! Decides whether a single cell value is a usable number and, if so, what
//! float it represents. Tolerates thousands separators, decimal commas and
//! the locale placeholder tokens the SPP bulletins use for "not available".
//!
//! Pure apart from logging: every failure path returns `None`/`false`, never
//! panics or errors.

use tracing::warn;

use crate::grid::CellValue;

/// Case-insensitive tokens that mean "no value" in the source bulletins.
const PLACEHOLDER_TOKENS: &[&str] = &[
    "N.A.", "NA", "N/A", "ND", "-", "--", "#N/A", "#VALUE!", "#REF!", "#DIV/0!",
];

/// Plausibility band for a percentage return. Values outside ±1000 are
/// mis-parsed table fragments, not data.
pub(crate) const DEFAULT_MAX_ABS_RETURN: f64 = 1000.0;

/// Whether the cell would classify as a usable number.
pub fn is_numeric_candidate(cell: &CellValue) -> bool {
    to_float(cell).is_some()
}

/// Classified float value of the cell, or `None` when the cell is empty, a
/// placeholder token, non-numeric text, or outside the plausibility band.
pub fn to_float(cell: &CellValue) -> Option<f64> {
    to_float_with_band(cell, DEFAULT_MAX_ABS_RETURN)
}

/// [`to_float`] with a caller-supplied plausibility band.
pub(crate) fn to_float_with_band(cell: &CellValue, max_abs: f64) -> Option<f64> {
    let value = match cell {
        CellValue::Number(n) => *n,
        CellValue::Text(s) => parse_numeric_text(s)?,
        CellValue::Bool(_) | CellValue::Error(_) | CellValue::Empty => return None,
    };

    if !value.is_finite() || value.abs() > max_abs {
        warn!(value, max_abs, "rejecting implausible return value");
        return None;
    }

    Some(value)
}

/// Parse a text cell as a locale-tolerant number.
fn parse_numeric_text(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        return None;
    }

    // Only digits, one leading sign, whitespace, dots and commas qualify.
    let mut seen_digit = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '0'..='9' => seen_digit = true,
            '+' | '-' if i == 0 => {}
            '.' | ',' => {}
            c if c.is_whitespace() => {}
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }

    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = normalize_separators(&compact);
    normalized.parse::<f64>().ok()
}

/// Normalize locale separator variants to a plain dot-decimal string.
///
/// Comma only → decimal separator (unless several commas, which can only be
/// thousands grouping). Comma and dot together → comma is the thousands
/// separator and is stripped.
fn normalize_separators(s: &str) -> String {
    let commas = s.matches(',').count();
    let has_dot = s.contains('.');

    if commas == 0 {
        s.to_string()
    } else if has_dot {
        s.replace(',', "")
    } else if commas == 1 {
        s.replace(',', ".")
    } else {
        s.replace(',', "")
    }
}

/// Whether the trimmed text is one of the known "not available" tokens.
fn is_placeholder(text: &str) -> bool {
    PLACEHOLDER_TOKENS
        .iter()
        .any(|token| token.eq_ignore_ascii_case(text))
}
