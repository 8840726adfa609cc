//! Parsing of the legacy semicolon-delimited species export: free-form
//! metadata lines, then the data header, then one record per line.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::encoding;
use crate::{Result, TaxaliftError};

/// Substrings that must all appear in a line for it to be the data header.
const HEADER_MARKERS: [&str; 3] = ["SPECIES_NR", "NAME", "GENUS"];

/// Minimum field count for a legacy data row (the secundum column is
/// optional).
pub const MIN_LEGACY_FIELDS: usize = 8;

/// Minimum field count for identifier extraction: own-ID through valid-ID.
const MIN_ID_FIELDS: usize = 7;

/// Field index of the valid-ID column in the legacy layout.
const VALID_NR_INDEX: usize = 6;

/// Legacy numeric identifier as written in the export.
pub type LegacyId = i128;

/// One semicolon-delimited data row in the legacy column layout:
/// own-ID;name;genus;species;author;synonym;valid-ID;valid-name[;secundum].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub fields: Vec<String>,
}

impl RawRow {
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Own-ID and valid-ID parsed from their legacy columns. The valid-ID
    /// falls back to the own-ID when its column is absent. Returns `None`
    /// for rows with fewer than 7 fields or unparseable identifiers.
    pub fn legacy_ids(&self) -> Option<(LegacyId, LegacyId)> {
        if self.fields.len() < MIN_ID_FIELDS {
            return None;
        }
        let own: LegacyId = self.fields[0].trim().parse().ok()?;
        let valid: LegacyId = match self.fields.get(VALID_NR_INDEX) {
            Some(field) => field.trim().parse().ok()?,
            None => own,
        };
        Some((own, valid))
    }

    /// Leading fields of the row, for diagnostics.
    pub fn head(&self) -> &[String] {
        &self.fields[..self.fields.len().min(3)]
    }
}

#[derive(Debug, Default)]
pub struct ParsedFile {
    pub metadata: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Read and split a legacy export into metadata lines and raw data rows.
///
/// Lines before the header that contain `;` are stored as metadata; the
/// header itself (any line containing all of SPECIES_NR, NAME, and GENUS)
/// is consumed; pre-header lines without `;` are ignored. Every line after
/// the header is split on `;` and kept when it has at least 8 fields.
pub fn parse_species_file(path: &Path) -> Result<ParsedFile> {
    let bytes = fs::read(path)?;
    let (encoding, text) = encoding::decode_text(&bytes)
        .ok_or_else(|| TaxaliftError::UndecodableFile(path.to_path_buf()))?;
    info!(
        "parsed {} using {} encoding",
        path.display(),
        encoding.name()
    );

    let mut parsed = ParsedFile::default();
    let mut header_found = false;
    // CR, LF, and CRLF all terminate lines; the empty fragment a CRLF pair
    // produces is dropped along with the other blank lines.
    for raw_line in text.split(['\r', '\n']) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if !header_found {
            if !line.contains(';') {
                continue;
            }
            if is_header_line(line) {
                header_found = true;
            } else {
                parsed.metadata.push(line.to_string());
            }
        } else {
            let fields: Vec<String> = line.split(';').map(str::to_string).collect();
            if fields.len() >= MIN_LEGACY_FIELDS {
                parsed.rows.push(RawRow::new(fields));
            }
        }
    }

    info!(
        "found {} metadata lines and {} data rows",
        parsed.metadata.len(),
        parsed.rows.len()
    );
    Ok(parsed)
}

fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().all(|marker| line.contains(marker))
}
