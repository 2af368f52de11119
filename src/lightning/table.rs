// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV generation from a directory of flash files, and CSV-to-record reading.

use super::extract::read_flash_file;
use super::DatasetError;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header row written first in every generated CSV.
pub const CSV_HEADER: [&str; 4] = [
    "flash_latitude",
    "flash_longitude",
    "flash_start_time",
    "flash_observe_time",
];

const NETCDF_EXTENSION: &str = "nc";

/// One CSV row keyed by column name. Values stay as strings.
pub type FlashRecord = BTreeMap<String, String>;

/// List the `.nc` files directly inside `dir`, sorted by file name.
pub fn discover_flash_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = fs::read_dir(dir).map_err(|source| DatasetError::DataDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DatasetError::DataDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_netcdf = path
            .extension()
            .is_some_and(|ext| ext == NETCDF_EXTENSION);
        if is_netcdf && path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Write the header and every flash found in `data_dir` to `out`.
///
/// Returns the number of data rows written (the header is not counted).
pub fn write_lightning_csv<W: Write>(data_dir: &Path, out: W) -> Result<usize, DatasetError> {
    let files = discover_flash_files(data_dir)?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;

    let mut rows_written = 0;
    for file in &files {
        let columns = read_flash_file(file);
        for row in columns.rows() {
            writer.write_record(row.to_record())?;
        }
        rows_written += columns.len();
    }

    writer.flush()?;
    tracing::info!(
        files = files.len(),
        rows = rows_written,
        "Generated lightning CSV"
    );
    Ok(rows_written)
}

/// Generate the lightning CSV for `data_dir` at `csv_path`, truncating it.
pub fn generate_lightning_csv(data_dir: &Path, csv_path: &Path) -> Result<usize, DatasetError> {
    let file = File::create(csv_path)?;
    write_lightning_csv(data_dir, file)
}

/// Read a generated CSV back as a list of string-valued records.
pub fn csv_to_records(csv_path: &Path) -> Result<Vec<FlashRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(csv_path)?;

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DatasetError::MissingHeader);
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        );
    }
    Ok(records)
}
