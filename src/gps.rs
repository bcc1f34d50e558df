//! Coordinate file parsing.
//!
//! The file is comma separated with a header row. Columns are read by fixed
//! position rather than by header name: `id, <ignored>, lat, lon, ...`.

use std::{fmt, fs, path::Path};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Terminator, Trim};

use crate::model::{path_length, GeoPoint};

const ID: usize = 0;
const LAT: usize = 2;
const LON: usize = 3;

/// One line of the coordinate file. Fields that are missing or fail to parse
/// are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub id: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl RawRecord {
    fn from_record(record: &StringRecord) -> Self {
        Self {
            id: record.get(ID).and_then(|x| x.parse().ok()),
            lat: record.get(LAT).and_then(parse_degrees),
            lon: record.get(LON).and_then(parse_degrees),
        }
    }

    pub fn point(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lon?))
    }
}

/// Parse the longest numeric prefix of a field, so `10.5N` reads as 10.5.
fn parse_degrees(field: &str) -> Option<f64> {
    let bytes = field.as_bytes();
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_end = digits(end);
    let mut mantissa = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits(end + 1);
        mantissa |= frac_end > end + 1;
        end = frac_end;
    }
    if !mantissa {
        return None;
    }

    // an exponent only counts when it has digits
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut i = end + 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_end = digits(i);
        if exp_end > i {
            end = exp_end;
        }
    }

    field[..end].parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Parse the body of a coordinate file into an ordered path, silently
/// dropping every line that doesn't carry a usable lat/lon pair.
pub fn parse_path(data: &str) -> Vec<GeoPoint> {
    // the first line is the header, even when it is blank
    let body = data.split_once('\n').map_or("", |(_, rest)| rest);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    reader
        .records()
        .filter_map(|result| result.ok())
        .filter_map(|record| RawRecord::from_record(&record).point())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub points: usize,
    pub length_m: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} points, {:.2} km", self.points, self.length_m / 1000.0)
    }
}

pub fn summarize(path: &Path) -> Result<Summary> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let points = parse_path(&data);

    Ok(Summary {
        points: points.len(),
        length_m: path_length(&points),
    })
}

/// Parse a local coordinate file and print a summary.
pub fn check(path: &Path) -> Result<()> {
    println!("{}", summarize(path)?);
    Ok(())
}
