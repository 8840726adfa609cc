//! ZIP archive handling: locate the data member, transform a scratch copy,
//! and repack the result under the original member name.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::pipeline::{self, RunSummary};
use crate::{encoding, Result, TaxaliftError};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Whether a path should be treated as a ZIP archive, by extension.
pub fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

fn is_data_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".csv") || lower.ends_with(".txt")
}

/// Transform the first CSV or TXT member of `zip_path` and write a fresh
/// archive containing only that member, under its original name. Without an
/// explicit output the new archive sits next to the input with a
/// `_transformed` suffix.
pub fn process_archive(zip_path: &Path, output: Option<&Path>) -> Result<RunSummary> {
    info!("opening archive {}", zip_path.display());
    let scratch = TempDir::new()?;

    let (member_name, extracted) = extract_data_member(zip_path, scratch.path())?;
    verify_extracted(&extracted, zip_path)?;

    let transformed = scratch_output_path(&extracted);
    let mut summary = pipeline::transform_file(&extracted, &transformed)?;

    let out_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_archive_output(zip_path),
    };
    repack(&transformed, &member_name, &out_path)?;
    info!("archive written to {}", out_path.display());

    // scratch and everything in it are removed when the TempDir drops
    summary.output = out_path;
    Ok(summary)
}

/// Find the first CSV or TXT member in central-directory order and copy it
/// into the scratch directory. Falls back to unpacking the whole archive
/// when the single-member copy fails.
fn extract_data_member(zip_path: &Path, scratch: &Path) -> Result<(String, PathBuf)> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut members = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_file() && is_data_name(entry.name()) {
            members.push(entry.name().to_string());
        }
    }
    let Some(member) = members.first().cloned() else {
        return Err(TaxaliftError::NoDataFileFound(zip_path.to_path_buf()));
    };
    if members.len() > 1 {
        info!(
            "{} data members found, using the first: {member}",
            members.len()
        );
    }
    info!("extracting {member}");

    let basename = member.rsplit('/').next().unwrap_or(member.as_str());
    let target = scratch.join(basename);
    match copy_member(&mut archive, &member, &target) {
        Ok(()) => Ok((member, target)),
        Err(primary) => {
            warn!("direct extraction failed ({primary}), unpacking the whole archive");
            match extract_all_and_scan(&mut archive, scratch) {
                // The repacked archive keeps the original member name even
                // when the fallback landed on a differently named file.
                Ok(found) => Ok((member, found)),
                Err(fallback) => Err(TaxaliftError::ExtractionFailed {
                    archive: zip_path.to_path_buf(),
                    reason: format!("direct: {primary}; full unpack: {fallback}"),
                }),
            }
        }
    }
}

fn copy_member(
    archive: &mut ZipArchive<File>,
    member: &str,
    target: &Path,
) -> std::result::Result<(), String> {
    let mut entry = archive.by_name(member).map_err(|e| e.to_string())?;
    let mut out = File::create(target).map_err(|e| e.to_string())?;
    io::copy(&mut entry, &mut out).map_err(|e| e.to_string())?;
    Ok(())
}

fn extract_all_and_scan(
    archive: &mut ZipArchive<File>,
    scratch: &Path,
) -> std::result::Result<PathBuf, String> {
    archive.extract(scratch).map_err(|e| e.to_string())?;
    let mut candidates: Vec<PathBuf> = fs::read_dir(scratch)
        .map_err(|e| e.to_string())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(is_data_name)
                    .unwrap_or(false)
        })
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| "no CSV or TXT file at the archive root".to_string())
}

/// Sanity-check the extracted member. A blank first line is fatal; an
/// unusual encoding is only logged, the decoding trials handle it later.
fn verify_extracted(path: &Path, zip_path: &Path) -> Result<()> {
    let bytes = fs::read(path)?;
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or(&[]);
    let first_line = first_line.strip_prefix(UTF8_BOM).unwrap_or(first_line);
    match std::str::from_utf8(first_line) {
        Ok(text) => {
            if text.trim().is_empty() {
                return Err(TaxaliftError::ExtractionFailed {
                    archive: zip_path.to_path_buf(),
                    reason: format!("extracted member {} is empty", path.display()),
                });
            }
        }
        Err(_) => match encoding::decode_text(&bytes) {
            Some((encoding, _)) => debug!("member readable with {} encoding", encoding.name()),
            None => warn!("could not determine member encoding, proceeding anyway"),
        },
    }
    Ok(())
}

/// Scratch name for the transformed copy: the member filename with a
/// `_transformed` suffix appended after the extension.
fn scratch_output_path(extracted: &Path) -> PathBuf {
    let mut name = extracted
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push("_transformed");
    extracted.with_file_name(name)
}

/// Default output next to the input: `export.zip` becomes
/// `export_transformed.zip`.
fn default_archive_output(zip_path: &Path) -> PathBuf {
    let mut name = zip_path
        .file_stem()
        .map(OsString::from)
        .unwrap_or_default();
    name.push("_transformed");
    if let Some(ext) = zip_path.extension() {
        name.push(".");
        name.push(ext);
    }
    zip_path.with_file_name(name)
}

fn repack(transformed: &Path, member_name: &str, out_path: &Path) -> Result<()> {
    let out = File::create(out_path)?;
    let mut writer = ZipWriter::new(out);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(member_name, options)?;
    let mut source = File::open(transformed)?;
    io::copy(&mut source, &mut writer)?;
    writer.finish()?;
    Ok(())
}
