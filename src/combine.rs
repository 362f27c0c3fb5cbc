//! Record Combiner Module
//!
//! Merges the accumulated and annualized partial records of each institution
//! into one [`InstitutionReturnRecord`], inserting the legacy-compatible bare
//! aliases for accumulated keys. Annualized keys get no bare alias, so the
//! two kinds can never collide — accumulated owns the bare form by convention.

use crate::extract::PartialRecord;
use crate::types::{InstitutionReturnRecord, TableKind};

/// Marker segment removed (with its leading underscore) to form a bare alias.
const ACCUMULATED_SEGMENT: &str = "_accumulated";

/// Combine per-table partials into final institution records, in the given
/// canonical institution order. Institutions with no data from either table
/// are omitted entirely.
pub(crate) fn combine(
    partials: &[PartialRecord],
    institutions: &[String],
) -> Vec<InstitutionReturnRecord> {
    let mut records = Vec::new();

    for institution in institutions {
        let mut record = InstitutionReturnRecord {
            institution_name: institution.clone(),
            values: Default::default(),
        };

        for partial in partials
            .iter()
            .filter(|p| &p.institution_name == institution)
        {
            for (key, &value) in &partial.values {
                record.values.insert(key.clone(), value);
                if partial.kind == TableKind::Accumulated {
                    if let Some(alias) = bare_alias(key) {
                        record.values.insert(alias, value);
                    }
                }
            }
        }

        if !record.values.is_empty() {
            records.push(record);
        }
    }

    records
}

/// Bare alias of an accumulated key (`period_3_accumulated_real` →
/// `period_3_real`), or `None` when the key carries no accumulated segment.
fn bare_alias(key: &str) -> Option<String> {
    key.contains(ACCUMULATED_SEGMENT)
        .then(|| key.replacen(ACCUMULATED_SEGMENT, "", 1))
}
