pub mod archive;
pub mod cli;
pub mod encoding;
pub mod parser;
pub mod pipeline;
pub mod remap;
pub mod transform;
pub mod writer;

pub use crate::pipeline::{run, RunSummary};
pub use crate::remap::IdMap;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxaliftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("no supported encoding could decode {}", .0.display())]
    UndecodableFile(PathBuf),

    #[error("no CSV or TXT member found in {}", .0.display())]
    NoDataFileFound(PathBuf),

    #[error("extraction failed for {}: {reason}", .archive.display())]
    ExtractionFailed { archive: PathBuf, reason: String },

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, TaxaliftError>;
