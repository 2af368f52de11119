// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Lightning flash columns extracted from one science file.

use std::fmt;

/// A numeric value kept in the type it was stored with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawNumber {
    Int(i64),
    Float32(f32),
    Float64(f64),
}

impl fmt::Display for RawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawNumber::Int(v) => write!(f, "{v}"),
            RawNumber::Float32(v) => f.write_str(&format_float(*v)),
            RawNumber::Float64(v) => f.write_str(&format_float(*v)),
        }
    }
}

/// Render a float so it always reads as one: whole numbers keep a `.0`
/// (`38.0`, `-0.0`) and non-finite values use `nan`/`inf`.
pub fn format_float<T: fmt::Display + Into<f64> + Copy>(value: T) -> String {
    let wide: f64 = value.into();
    if wide.is_nan() {
        return "nan".to_string();
    }
    if wide.is_infinite() {
        return if wide > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let text = value.to_string();
    if text.contains(['.', 'e']) {
        text
    } else {
        text + ".0"
    }
}

/// Parallel flash columns from a single file.
///
/// All four columns have the same length; a file that cannot provide
/// consistent columns contributes an empty set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlashColumns {
    pub latitude: Vec<f32>,
    pub longitude: Vec<f32>,
    /// Flash start times, already converted to UTC strings
    pub start_time: Vec<String>,
    pub observe_time: Vec<RawNumber>,
}

impl FlashColumns {
    pub fn len(&self) -> usize {
        self.latitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_empty()
    }

    /// Iterate rows in CSV column order.
    pub fn rows(&self) -> impl Iterator<Item = FlashRow<'_>> {
        self.latitude
            .iter()
            .zip(&self.longitude)
            .zip(&self.start_time)
            .zip(&self.observe_time)
            .map(|(((lat, lon), start), observe)| FlashRow {
                latitude: *lat,
                longitude: *lon,
                start_time: start,
                observe_time: *observe,
            })
    }
}

/// One flash borrowed from [`FlashColumns`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlashRow<'a> {
    pub latitude: f32,
    pub longitude: f32,
    pub start_time: &'a str,
    pub observe_time: RawNumber,
}

impl FlashRow<'_> {
    /// Render the row as CSV fields.
    pub fn to_record(&self) -> [String; 4] {
        [
            format_float(self.latitude),
            format_float(self.longitude),
            self.start_time.to_string(),
            self.observe_time.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_number_display() {
        assert_eq!(RawNumber::Int(93).to_string(), "93");
        assert_eq!(RawNumber::Float32(2.8195734).to_string(), "2.8195734");
        assert_eq!(RawNumber::Float64(0.5).to_string(), "0.5");
        assert_eq!(RawNumber::Float64(93.0).to_string(), "93.0");
    }

    #[test]
    fn test_whole_floats_keep_decimal_point() {
        assert_eq!(format_float(38.0f32), "38.0");
        assert_eq!(format_float(-0.0f32), "-0.0");
        assert_eq!(format_float(-122.25f32), "-122.25");
        assert_eq!(format_float(f32::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_rows_follow_column_order() {
        let columns = FlashColumns {
            latitude: vec![2.8195734, -10.0],
            longitude: vec![34.484116, 120.25],
            start_time: vec!["a".to_string(), "b".to_string()],
            observe_time: vec![RawNumber::Int(93), RawNumber::Int(7)],
        };

        let rows: Vec<_> = columns.rows().map(|r| r.to_record()).collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(rows[0], ["2.8195734", "34.484116", "a", "93"]);
        assert_eq!(rows[1], ["-10.0", "120.25", "b", "7"]);
    }
}
