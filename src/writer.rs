//! Serialization of the revised export: metadata rename, header, rows,
//! and the whole-file boolean token rewrite.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::transform::{TransformedRow, NEW_HEADER};
use crate::Result;

/// Renames the SPECIES_LU_VERSION metadata field to SPECIES_LU, keeping
/// the rest of the line intact.
fn rewrite_metadata_line(line: &str) -> String {
    if !line.starts_with("SPECIES_LU_VERSION") {
        return line.to_string();
    }
    match line.split_once(';') {
        Some((_, rest)) => format!("SPECIES_LU;{rest}"),
        None => line.replace("SPECIES_LU_VERSION", "SPECIES_LU"),
    }
}

/// Rewrites German boolean tokens wherever they sit between field
/// delimiters. Tokens at line edges, without both semicolons, are left
/// alone.
fn normalize_boolean_tokens(text: &str) -> String {
    text.replace(";WAHR;", ";TRUE;").replace(";FALSCH;", ";FALSE;")
}

/// Assemble the full output text: rewritten metadata, the revised header,
/// one line per row, LF-terminated throughout.
pub fn render_output(metadata: &[String], rows: &[TransformedRow]) -> String {
    let mut lines = Vec::with_capacity(metadata.len() + rows.len() + 1);
    for line in metadata {
        lines.push(rewrite_metadata_line(line));
    }
    lines.push(NEW_HEADER.to_string());
    for row in rows {
        lines.push(row.to_line());
    }
    let mut text = lines.join("\n");
    text.push('\n');
    normalize_boolean_tokens(&text)
}

pub fn write_output(path: &Path, metadata: &[String], rows: &[TransformedRow]) -> Result<()> {
    fs::write(path, render_output(metadata, rows))?;
    info!(
        "wrote {} lines to {}",
        metadata.len() + rows.len() + 1,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trow(fields: &[&str]) -> TransformedRow {
        TransformedRow {
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn renames_the_version_metadata_field() {
        assert_eq!(
            rewrite_metadata_line("SPECIES_LU_VERSION;3.2"),
            "SPECIES_LU;3.2"
        );
        assert_eq!(
            rewrite_metadata_line("SPECIES_LU_VERSION"),
            "SPECIES_LU"
        );
        assert_eq!(
            rewrite_metadata_line("EXPORT_DATE;2024-01-01"),
            "EXPORT_DATE;2024-01-01"
        );
    }

    #[test]
    fn rewrites_delimited_boolean_tokens_only() {
        assert_eq!(normalize_boolean_tokens("a;WAHR;b"), "a;TRUE;b");
        assert_eq!(normalize_boolean_tokens("a;FALSCH;b"), "a;FALSE;b");
        // Missing a delimiter on either side: untouched.
        assert_eq!(normalize_boolean_tokens("a;WAHR"), "a;WAHR");
        assert_eq!(normalize_boolean_tokens("FALSCH;b"), "FALSCH;b");
        // Substring of a larger token: untouched.
        assert_eq!(normalize_boolean_tokens("a;WAHRLICH;b"), "a;WAHRLICH;b");
    }

    #[test]
    fn renders_metadata_header_rows_in_order() {
        let metadata = vec![
            "SPECIES_LU_VERSION;3.2".to_string(),
            "EXPORT_DATE;2024-01-01".to_string(),
        ];
        let rows = vec![trow(&["1", "A", "G", "s", "FALSCH", "1", "A", "", ""])];
        let text = render_output(&metadata, &rows);
        let expected = "SPECIES_LU;3.2\n\
                        EXPORT_DATE;2024-01-01\n\
                        SPECIES_NR;NAME;GENUS;SPECIES;SYNONYM;VALID_NR;VALID_NAME;PARENT_NR;PARENT_NAME\n\
                        1;A;G;s;FALSE;1;A;;\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn boolean_rewrite_applies_to_metadata_too() {
        let metadata = vec!["FLAGS;WAHR;on".to_string()];
        let text = render_output(&metadata, &[]);
        assert!(text.starts_with("FLAGS;TRUE;on\n"));
    }

    #[test]
    fn boolean_rewrite_does_not_spare_name_fields() {
        // The substitution is a blunt whole-text pass: a species literally
        // named WAHR is rewritten along with the flags.
        let rows = vec![trow(&["1", "WAHR", "G", "s", "FALSCH", "1", "A", "", ""])];
        let text = render_output(&[], &rows);
        assert!(text.contains("1;TRUE;G;s;FALSE;1;A;;"));
    }

    #[test]
    fn output_always_ends_with_a_newline() {
        let text = render_output(&[], &[]);
        assert_eq!(text, format!("{NEW_HEADER}\n"));
    }
}
