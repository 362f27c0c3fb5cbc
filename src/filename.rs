//! Filename Metadata Parser Module
//!
//! Derives fund category and reporting period from the naming conventions of
//! the SBS bulletin files (e.g. `FP-1220-1-my2025.XLS`). Fields the name
//! cannot justify are left unset — this module never guesses.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::FundPeriod;

/// Explicit "Tipo N" token anywhere in the name (wins over the code table).
static TIPO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tipo[\s_-]*([0-3])").expect("valid regex"));

/// SBS bulletin series code with an optional fund-type suffix digit,
/// e.g. `FP-1220-1`, `FP-1219-0` or `FP-1360`.
static SERIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)FP-(\d{4})(?:-(\d))?").expect("valid regex"));

/// Two-letter Spanish month abbreviation + four-digit year, delimiter-bound
/// so `ma` cannot match inside an unrelated word (e.g. `my2025`).
static PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|[-_ .])(en|fe|ma|ab|my|jn|jl|ag|se|oc|no|di)(\d{4})(?:[-_ .]|$)")
        .expect("valid regex")
});

/// Bulletin series code → fund category.
fn category_for_series(code: &str) -> Option<u8> {
    match code {
        "1219" => Some(0),
        "1220" => Some(1),
        "1360" => Some(2),
        "1361" => Some(3),
        _ => None,
    }
}

/// Fund category from a series-code capture: the explicit fund-type suffix
/// digit (`FP-1219-0`, `FP-1220-1`) when present and in range, otherwise the
/// series table.
fn category_for_captures(captures: &regex::Captures<'_>) -> Option<u8> {
    if let Some(suffix) = captures.get(2) {
        if let Ok(digit @ 0..=3) = suffix.as_str().parse::<u8>() {
            return Some(digit);
        }
    }
    category_for_series(&captures[1])
}

/// SBS two-letter month code → month number.
fn month_for_code(code: &str) -> Option<u32> {
    let month = match code.to_ascii_lowercase().as_str() {
        "en" => 1,
        "fe" => 2,
        "ma" => 3,
        "ab" => 4,
        "my" => 5,
        "jn" => 6,
        "jl" => 7,
        "ag" => 8,
        "se" => 9,
        "oc" => 10,
        "no" => 11,
        "di" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parse fund category and reporting period out of a bulletin filename.
///
/// Path components are ignored; only the final segment is inspected.
///
/// # Examples
///
/// ```
/// use spp_rentability::parse_filename;
///
/// let period = parse_filename("FP-1220-1-my2025.XLS");
/// assert_eq!(period.fund_category, Some(1));
/// assert_eq!(period.report_year, Some(2025));
/// assert_eq!(period.report_month, Some(5));
/// ```
pub fn parse_filename(filename: &str) -> FundPeriod {
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let fund_category = TIPO_RE
        .captures(name)
        .and_then(|c| c[1].parse::<u8>().ok())
        .or_else(|| {
            SERIES_RE
                .captures(name)
                .and_then(|c| category_for_captures(&c))
        });

    let (report_year, report_month) = match PERIOD_RE.captures(name) {
        Some(c) => {
            let month = month_for_code(&c[1]);
            let year = c[2].parse::<i32>().ok().filter(|_| month.is_some());
            (year, month)
        }
        None => (None, None),
    };

    FundPeriod {
        fund_category,
        report_year,
        report_month,
    }
}
