// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! TAI93 timestamp conversion.
//!
//! ISS LIS science files store flash times as seconds since the TAI93 epoch.
//! The reference instant used here is 1992-01-01 23:59:59 UTC, one day and
//! one second before the nominal 1993-01-01 epoch. Published flash times line
//! up with that reference, so it must not be "corrected".

use chrono::DateTime;

/// 1992-01-01 23:59:59 UTC, in seconds since the Unix epoch.
pub const TAI93_REFERENCE_UNIX_SECS: i64 = 694_310_399;

const MICROS_PER_SEC: i64 = 1_000_000;

/// Timestamp conversion errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EpochError {
    #[error("timestamp is not a finite number: {0}")]
    NotFinite(f64),

    #[error("timestamp is negative: {0}")]
    Negative(f64),

    #[error("timestamp out of range: {0}")]
    OutOfRange(f64),
}

/// Convert a TAI93 timestamp into a UTC string such as
/// `2018-03-04 09:24:30.274144`.
///
/// Both the naive conversion and the shifted instant are rounded half-to-even
/// to whole microseconds. The fractional part is omitted when it is zero.
pub fn tai93_to_utc_string(tai93: f64) -> Result<String, EpochError> {
    if !tai93.is_finite() {
        return Err(EpochError::NotFinite(tai93));
    }
    if tai93 < 0.0 {
        return Err(EpochError::Negative(tai93));
    }

    let (secs, micros) = split_micros(tai93);
    let naive = (secs * MICROS_PER_SEC + micros) as f64 / MICROS_PER_SEC as f64;
    let shifted = naive + TAI93_REFERENCE_UNIX_SECS as f64;

    let (secs, micros) = split_micros(shifted);
    let instant = DateTime::from_timestamp(secs, (micros * 1_000) as u32)
        .ok_or(EpochError::OutOfRange(tai93))?;

    let base = instant.format("%Y-%m-%d %H:%M:%S");
    if micros == 0 {
        Ok(base.to_string())
    } else {
        Ok(format!("{base}.{micros:06}"))
    }
}

/// Convert every timestamp in `values`, failing on the first invalid one.
pub fn convert_timestamps(values: &[f64]) -> Result<Vec<String>, EpochError> {
    values.iter().map(|&v| tai93_to_utc_string(v)).collect()
}

/// Split non-negative float seconds into whole seconds and rounded microseconds.
fn split_micros(value: f64) -> (i64, i64) {
    let whole = value.trunc();
    let mut micros = ((value - whole) * MICROS_PER_SEC as f64).round_ties_even() as i64;
    let mut secs = whole as i64;
    if micros >= MICROS_PER_SEC {
        micros -= MICROS_PER_SEC;
        secs += 1;
    }
    (secs, micros)
}
