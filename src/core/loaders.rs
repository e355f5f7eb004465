//! Loading and extraction of Grasshopper point-track recordings.
//!
//! A recording is a CSV file with one header line (discarded) followed by
//! rows of the form:
//!
//! `TIMESTAMP, ORIGIN_X, ORIGIN_Y, ORIGIN_Z, XAXIS_X, XAXIS_Y, XAXIS_Z,
//!  YAXIS_X, YAXIS_Y, YAXIS_Z, STATE`
//!
//! Loading and extraction are separate stages: [`load_track_rows`] returns
//! the raw, unparsed records; [`extract_channels`] turns them into three
//! parallel per-frame vector channels scaled by a caller-supplied factor.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use nalgebra::Vector3;
use rayon::prelude::*;
use thiserror::Error;

/// Minimum number of columns a data row must have.
pub const MIN_COLUMNS: usize = 10;

/// Column index of the first origin component.
const ORIGIN_COL: usize = 1;
/// Column index of the first x-axis sample component.
const XAXIS_COL: usize = 4;
/// Column index of the first y-axis sample component.
const YAXIS_COL: usize = 7;

/// Errors that can occur while loading or extracting track data.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no data rows in file: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("row {row} has {found} columns, expected at least {}", MIN_COLUMNS)]
    TooFewColumns { row: usize, found: usize },

    #[error("row {row}, column {column}: '{value}' is not numeric")]
    InvalidField {
        row: usize,
        column: usize,
        value: String,
    },
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Three parallel per-frame channels extracted from a recording.
///
/// Invariant: the three vectors always have identical length, both after
/// extraction and after smoothing.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackChannels {
    /// Tracked object position per frame.
    pub origin: Vec<Vector3<f64>>,
    /// X-axis basis sample per frame.
    pub x_samples: Vec<Vector3<f64>>,
    /// Y-axis basis sample per frame.
    pub y_samples: Vec<Vector3<f64>>,
}

impl TrackChannels {
    /// Creates empty channels.
    pub fn new() -> Self {
        Self {
            origin: Vec::new(),
            x_samples: Vec::new(),
            y_samples: Vec::new(),
        }
    }

    /// Number of frames in the channels.
    #[inline]
    pub fn len(&self) -> usize {
        self.origin.len()
    }

    /// Returns true if the channels hold no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.origin.is_empty()
    }

    /// Checks the equal-length invariant across the three channels.
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.origin.len() == self.x_samples.len() && self.origin.len() == self.y_samples.len()
    }
}

impl Default for TrackChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the raw data rows of a track recording.
///
/// The first line of the file is treated as a header and discarded
/// unconditionally; no schema validation happens here. Malformed rows
/// surface later, when [`extract_channels`] fails to parse them.
///
/// # Errors
///
/// Returns [`LoaderError::Io`] when the file is missing or unreadable and
/// [`LoaderError::EmptyFile`] when the file holds no data rows.
pub fn load_track_rows<P: AsRef<Path>>(path: P) -> Result<Vec<StringRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut rows = Vec::with_capacity(1024);
    for result in reader.records() {
        rows.push(result?);
    }

    if rows.is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    Ok(rows)
}

/// Extract the origin / x-sample / y-sample channels from raw rows.
///
/// Reads fixed column indices (1-3 origin, 4-6 x-sample, 7-9 y-sample) and
/// multiplies every coordinate by `scale`. Rows are parsed in parallel; a
/// malformed row aborts the whole extraction.
///
/// # Errors
///
/// Returns [`LoaderError::TooFewColumns`] when a row has fewer than
/// [`MIN_COLUMNS`] fields and [`LoaderError::InvalidField`] when a field is
/// not numeric. Row indices count data rows, starting at 0 for the first
/// row after the header.
pub fn extract_channels(rows: &[StringRecord], scale: f64) -> Result<TrackChannels> {
    let parsed: Vec<(Vector3<f64>, Vector3<f64>, Vector3<f64>)> = rows
        .par_iter()
        .enumerate()
        .map(|(row, record)| {
            if record.len() < MIN_COLUMNS {
                return Err(LoaderError::TooFewColumns {
                    row,
                    found: record.len(),
                });
            }

            let origin = parse_vector(record, row, ORIGIN_COL)? * scale;
            let x_sample = parse_vector(record, row, XAXIS_COL)? * scale;
            let y_sample = parse_vector(record, row, YAXIS_COL)? * scale;

            Ok((origin, x_sample, y_sample))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut channels = TrackChannels {
        origin: Vec::with_capacity(parsed.len()),
        x_samples: Vec::with_capacity(parsed.len()),
        y_samples: Vec::with_capacity(parsed.len()),
    };

    for (origin, x_sample, y_sample) in parsed {
        channels.origin.push(origin);
        channels.x_samples.push(x_sample);
        channels.y_samples.push(y_sample);
    }

    debug_assert!(channels.is_aligned());

    Ok(channels)
}

/// Parse three consecutive fields starting at `column` as a 3-vector.
fn parse_vector(record: &StringRecord, row: usize, column: usize) -> Result<Vector3<f64>> {
    let mut components = [0.0f64; 3];
    for (offset, slot) in components.iter_mut().enumerate() {
        let col = column + offset;
        let raw = record.get(col).unwrap_or("");
        *slot = raw
            .trim()
            .parse()
            .map_err(|_| LoaderError::InvalidField {
                row,
                column: col,
                value: raw.to_string(),
            })?;
    }
    Ok(Vector3::new(components[0], components[1], components[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str =
        "TIMESTAMP,ORIGIN_X,ORIGIN_Y,ORIGIN_Z,XAXIS_X,XAXIS_Y,XAXIS_Z,YAXIS_X,YAXIS_Y,YAXIS_Z,STATE";

    fn write_recording(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_track_rows_skips_header() {
        let file = write_recording(&[
            "0.0,1,2,3,1,0,0,0,1,0,tracking",
            "0.1,4,5,6,1,0,0,0,1,0,tracking",
        ]);

        let rows = load_track_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(1), Some("1"));
    }

    #[test]
    fn test_load_track_rows_missing_file() {
        let err = load_track_rows("/nonexistent/recording.csv").unwrap_err();
        assert!(matches!(err, LoaderError::Io(_)));
    }

    #[test]
    fn test_load_track_rows_header_only() {
        let file = write_recording(&[]);
        let err = load_track_rows(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::EmptyFile(_)));
    }

    #[test]
    fn test_extract_channels_applies_scale() {
        let file = write_recording(&["0.0,1,2,3,4,5,6,7,8,9,tracking"]);
        let rows = load_track_rows(file.path()).unwrap();

        let channels = extract_channels(&rows, 2.0).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels.origin[0], Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(channels.x_samples[0], Vector3::new(8.0, 10.0, 12.0));
        assert_eq!(channels.y_samples[0], Vector3::new(14.0, 16.0, 18.0));
    }

    #[test]
    fn test_extract_channels_aligned() {
        let file = write_recording(&[
            "0.0,0,0,0,1,0,0,0,1,0,a",
            "0.1,1,0,0,1,0,0,0,1,0,a",
            "0.2,2,0,0,1,0,0,0,1,0,a",
        ]);
        let rows = load_track_rows(file.path()).unwrap();

        let channels = extract_channels(&rows, 1.0).unwrap();
        assert_eq!(channels.len(), 3);
        assert!(channels.is_aligned());
    }

    #[test]
    fn test_extract_channels_too_few_columns() {
        let file = write_recording(&["0.0,1,2,3,4,5,6", "0.1,1,2,3,4,5,6,7,8,9,a"]);
        let rows = load_track_rows(file.path()).unwrap();

        let err = extract_channels(&rows, 1.0).unwrap_err();
        match err {
            LoaderError::TooFewColumns { row, found } => {
                assert_eq!(row, 0);
                assert_eq!(found, 7);
            }
            other => panic!("expected TooFewColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_channels_non_numeric_field() {
        let file = write_recording(&[
            "0.0,1,2,3,4,5,6,7,8,9,a",
            "0.1,1,oops,3,4,5,6,7,8,9,a",
        ]);
        let rows = load_track_rows(file.path()).unwrap();

        let err = extract_channels(&rows, 1.0).unwrap_err();
        match err {
            LoaderError::InvalidField { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, 2);
                assert_eq!(value, "oops");
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_channels_direction_from_basis() {
        // Two rows, scale 1: the tracked direction is y_sample - origin.
        let file = write_recording(&[
            "0,0,0,0,1,0,0,0,1,0,a",
            "1,1,0,0,1,0,0,0,1,0,a",
        ]);
        let rows = load_track_rows(file.path()).unwrap();

        let channels = extract_channels(&rows, 1.0).unwrap();
        assert_eq!(channels.origin[0], Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(channels.origin[1], Vector3::new(1.0, 0.0, 0.0));

        let direction = channels.y_samples[0] - channels.origin[0];
        assert_eq!(direction, Vector3::new(0.0, 1.0, 0.0));
    }
}
