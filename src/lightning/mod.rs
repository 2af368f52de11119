// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lightning dataset: NetCDF extraction, TAI93 time correction and CSV output.

pub mod epoch;
pub mod extract;
pub mod table;

pub use epoch::{convert_timestamps, tai93_to_utc_string, EpochError};
pub use extract::{read_flash_file, try_read_flash_file};
pub use table::{csv_to_records, generate_lightning_csv, write_lightning_csv, FlashRecord};

use std::path::{Path, PathBuf};

/// Errors raised while building the lightning dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read data directory {}: {source}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open {}: {reason}", .path.display())]
    Open { path: PathBuf, reason: String },

    #[error("{} is {format}, only classic NetCDF is supported", .path.display())]
    UnsupportedFormat { path: PathBuf, format: &'static str },

    #[error("{} is missing required variable {variable}", .path.display())]
    MissingVariable {
        path: PathBuf,
        variable: &'static str,
    },

    #[error("failed to read {variable} from {}: {reason}", .path.display())]
    ReadVariable {
        path: PathBuf,
        variable: &'static str,
        reason: String,
    },

    #[error("{variable} in {} has unsupported type {data_type}", .path.display())]
    UnsupportedType {
        path: PathBuf,
        variable: &'static str,
        data_type: &'static str,
    },

    #[error("column lengths differ in {}: {lengths:?}", .path.display())]
    LengthMismatch { path: PathBuf, lengths: [usize; 4] },

    #[error("invalid flash time in {}: {source}", .path.display())]
    Timestamp {
        path: PathBuf,
        #[source]
        source: EpochError,
    },

    #[error("CSV file has no header row")]
    MissingHeader,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Regenerate the dataset for `data_dir` and return it as records.
///
/// The intermediate CSV lives in a temporary file owned by this call and is
/// removed on every exit path.
pub fn build_dataset(data_dir: &Path) -> Result<Vec<FlashRecord>, DatasetError> {
    let csv_file = tempfile::NamedTempFile::new()?;
    let rows = generate_lightning_csv(data_dir, csv_file.path())?;
    let records = csv_to_records(csv_file.path())?;
    debug_assert_eq!(rows, records.len());
    Ok(records)
}
