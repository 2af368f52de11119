// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flash extraction from ISS LIS NetCDF files.

use super::epoch::convert_timestamps;
use super::DatasetError;
use crate::models::flash::{FlashColumns, RawNumber};
use netcdf3::{DataVector, FileReader};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

pub const TAI93_TIME_VAR: &str = "lightning_flash_TAI93_time";
pub const OBSERVE_TIME_VAR: &str = "lightning_flash_observe_time";
pub const LATITUDE_VAR: &str = "lightning_flash_lat";
pub const LONGITUDE_VAR: &str = "lightning_flash_lon";

/// Leading bytes of an HDF5 container, which is what NetCDF-4 files are.
const HDF5_SIGNATURE: [u8; 8] = *b"\x89HDF\r\n\x1a\n";

/// Variables a file must carry to contribute flashes.
pub const REQUIRED_VARS: [&str; 4] = [TAI93_TIME_VAR, OBSERVE_TIME_VAR, LATITUDE_VAR, LONGITUDE_VAR];

/// Read the flash columns of one file.
///
/// Any problem with the file is logged and yields empty columns, so a bad
/// file never stops the rest of the directory from being processed.
pub fn read_flash_file(path: &Path) -> FlashColumns {
    match try_read_flash_file(path) {
        Ok(columns) => {
            tracing::debug!(file = %path.display(), flashes = columns.len(), "Read flash file");
            columns
        }
        Err(e @ DatasetError::UnsupportedFormat { .. }) => {
            tracing::error!(
                file = %path.display(),
                error = %e,
                "Flash file is NetCDF-4, convert it to classic format (nccopy -k classic)"
            );
            FlashColumns::default()
        }
        Err(e) => {
            tracing::warn!(
                file = %path.display(),
                error = %e,
                "Skipping flash file"
            );
            FlashColumns::default()
        }
    }
}

/// Read the flash columns of one file, reporting why it cannot be used.
pub fn try_read_flash_file(path: &Path) -> Result<FlashColumns, DatasetError> {
    let is_hdf5 = has_hdf5_signature(path).map_err(|e| DatasetError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if is_hdf5 {
        return Err(DatasetError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: "NetCDF-4/HDF5",
        });
    }

    let mut reader = FileReader::open(path).map_err(|e| DatasetError::Open {
        path: path.to_path_buf(),
        reason: format!("{e:?}"),
    })?;

    if let Some(missing) = REQUIRED_VARS
        .iter()
        .find(|name| !reader.data_set().has_var(name))
    {
        return Err(DatasetError::MissingVariable {
            path: path.to_path_buf(),
            variable: *missing,
        });
    }

    let tai93_times = read_var(&mut reader, path, TAI93_TIME_VAR)?;
    let tai93_times = as_f64(tai93_times, path, TAI93_TIME_VAR)?;
    let observe_time = as_raw_numbers(read_var(&mut reader, path, OBSERVE_TIME_VAR)?);
    let latitude = as_f32(read_var(&mut reader, path, LATITUDE_VAR)?, path, LATITUDE_VAR)?;
    let longitude = as_f32(read_var(&mut reader, path, LONGITUDE_VAR)?, path, LONGITUDE_VAR)?;

    let lengths = [
        latitude.len(),
        longitude.len(),
        tai93_times.len(),
        observe_time.len(),
    ];
    if lengths.iter().any(|&len| len != lengths[0]) {
        return Err(DatasetError::LengthMismatch {
            path: path.to_path_buf(),
            lengths,
        });
    }

    let start_time = convert_timestamps(&tai93_times).map_err(|source| DatasetError::Timestamp {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(FlashColumns {
        latitude,
        longitude,
        start_time,
        observe_time,
    })
}

fn has_hdf5_signature(path: &Path) -> std::io::Result<bool> {
    let mut magic = [0u8; HDF5_SIGNATURE.len()];
    match File::open(path)?.read_exact(&mut magic) {
        Ok(()) => Ok(magic == HDF5_SIGNATURE),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e),
    }
}

fn read_var(
    reader: &mut FileReader,
    path: &Path,
    variable: &'static str,
) -> Result<DataVector, DatasetError> {
    reader
        .read_var(variable)
        .map_err(|e| DatasetError::ReadVariable {
            path: path.to_path_buf(),
            variable,
            reason: format!("{e:?}"),
        })
}

/// Latitude and longitude are stored as 32-bit floats and must stay that way.
fn as_f32(data: DataVector, path: &Path, variable: &'static str) -> Result<Vec<f32>, DatasetError> {
    match data {
        DataVector::F32(values) => Ok(values),
        other => Err(DatasetError::UnsupportedType {
            path: path.to_path_buf(),
            variable,
            data_type: type_name(&other),
        }),
    }
}

fn as_f64(data: DataVector, path: &Path, variable: &'static str) -> Result<Vec<f64>, DatasetError> {
    match data {
        DataVector::F64(values) => Ok(values),
        DataVector::F32(values) => Ok(values.into_iter().map(f64::from).collect()),
        DataVector::I32(values) => Ok(values.into_iter().map(f64::from).collect()),
        other => Err(DatasetError::UnsupportedType {
            path: path.to_path_buf(),
            variable,
            data_type: type_name(&other),
        }),
    }
}

fn as_raw_numbers(data: DataVector) -> Vec<RawNumber> {
    match data {
        DataVector::I8(values) => values.into_iter().map(|v| RawNumber::Int(v.into())).collect(),
        DataVector::U8(values) => values.into_iter().map(|v| RawNumber::Int(v.into())).collect(),
        DataVector::I16(values) => values.into_iter().map(|v| RawNumber::Int(v.into())).collect(),
        DataVector::I32(values) => values.into_iter().map(|v| RawNumber::Int(v.into())).collect(),
        DataVector::F32(values) => values.into_iter().map(RawNumber::Float32).collect(),
        DataVector::F64(values) => values.into_iter().map(RawNumber::Float64).collect(),
    }
}

fn type_name(data: &DataVector) -> &'static str {
    match data {
        DataVector::I8(_) => "i8",
        DataVector::U8(_) => "u8",
        DataVector::I16(_) => "i16",
        DataVector::I32(_) => "i32",
        DataVector::F32(_) => "f32",
        DataVector::F64(_) => "f64",
    }
}
