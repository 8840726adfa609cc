//! Row restructuring from the legacy column layout to the revised one.

use tracing::{info, warn};

use crate::parser::{RawRow, MIN_LEGACY_FIELDS};
use crate::remap::IdMap;

/// Header line of the revised layout. AUTHOR and SECUNDUM are gone,
/// PARENT_NR and PARENT_NAME are new.
pub const NEW_HEADER: &str =
    "SPECIES_NR;NAME;GENUS;SPECIES;SYNONYM;VALID_NR;VALID_NAME;PARENT_NR;PARENT_NAME";

/// One data row in the revised column layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRow {
    pub fields: Vec<String>,
}

impl TransformedRow {
    /// The SYNONYM column value, still in its source spelling.
    pub fn synonym_flag(&self) -> &str {
        self.fields.get(4).map(String::as_str).unwrap_or("")
    }

    /// Whether the row marks a synonym, before or after boolean rewriting.
    pub fn is_synonym(&self) -> bool {
        matches!(self.synonym_flag(), "WAHR" | "TRUE")
    }

    pub fn to_line(&self) -> String {
        self.fields.join(";")
    }
}

/// Rebuild every raw row in the revised layout, swapping both identifier
/// columns for their surrogates. Rows without a complete mapping are
/// skipped.
pub fn transform_rows(rows: &[RawRow], ids: &IdMap) -> Vec<TransformedRow> {
    let mut transformed = Vec::with_capacity(rows.len());
    for row in rows {
        if row.fields.len() < MIN_LEGACY_FIELDS {
            continue;
        }
        let Some((own, valid)) = row.legacy_ids() else {
            warn!("dropping row with unusable identifiers: {:?}", row.head());
            continue;
        };
        let (Some(new_own), Some(new_valid)) = (ids.get(own), ids.get(valid)) else {
            warn!("dropping row with unmapped identifiers: {:?}", row.head());
            continue;
        };
        transformed.push(TransformedRow {
            fields: vec![
                new_own.to_string(),
                row.fields[1].clone(),
                row.fields[2].clone(),
                row.fields[3].clone(),
                row.fields[5].clone(),
                new_valid.to_string(),
                row.fields[7].clone(),
                String::new(),
                String::new(),
            ],
        });
    }
    info!("transformed {} of {} rows", transformed.len(), rows.len());
    transformed
}
