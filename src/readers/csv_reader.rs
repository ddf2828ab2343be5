use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::{debug, info};

use crate::error::{AuditError, Result};
use crate::models::{Dataset, FieldValue, Schema, StationRecord};
use crate::utils::constants::{
    CENTER_LATITUDE_COLUMN, CENTER_LONGITUDE_COLUMN, DEFAULT_DELIMITER, SITE_LATITUDE_COLUMN,
    SITE_LONGITUDE_COLUMN,
};


/// Result of loading one file: the cleaned dataset plus the row accounting
/// a caller needs for its status line
#[derive(Debug)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub total_rows: usize,
    pub dropped_rows: usize,
    pub encoding: &'static str,
}

impl LoadOutcome {
    pub fn status_message(&self) -> String {
        format!(
            "Loaded {} of {} rows ({} dropped for missing site coordinates; {} encoding)",
            self.dataset.len(),
            self.total_rows,
            self.dropped_rows,
            self.encoding
        )
    }
}

pub struct CsvReader {
    delimiter: u8,
}

impl CsvReader {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read and clean one station file
    ///
    /// Rows whose site coordinates are missing or unparseable are dropped and
    /// counted; center coordinates are coerced to numeric with invalid values
    /// becoming null.
    pub fn read_dataset(&self, path: &Path) -> Result<LoadOutcome> {
        let bytes = fs::read(path)?;
        let (content, encoding) =
            decode(&bytes).ok_or_else(|| AuditError::UnreadableEncoding(path.to_path_buf()))?;
        debug!(encoding, path = %path.display(), "decoded input file");

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let schema = Schema::new(columns);

        let site_lon = schema.column_index(SITE_LONGITUDE_COLUMN);
        let site_lat = schema.column_index(SITE_LATITUDE_COLUMN);
        let (Some(site_lon_idx), Some(site_lat_idx)) = (site_lon, site_lat) else {
            let missing = [
                (SITE_LONGITUDE_COLUMN, site_lon),
                (SITE_LATITUDE_COLUMN, site_lat),
            ]
            .iter()
            .filter(|(_, index)| index.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
            return Err(AuditError::MissingRequiredColumns(missing));
        };
        let center_lon_idx = schema.column_index(CENTER_LONGITUDE_COLUMN);
        let center_lat_idx = schema.column_index(CENTER_LATITUDE_COLUMN);

        let mut records = Vec::new();
        let mut total_rows = 0;
        let mut dropped_rows = 0;

        for row in reader.records() {
            let row = row?;
            total_rows += 1;

            let site_lon = parse_number(row.get(site_lon_idx).unwrap_or(""));
            let site_lat = parse_number(row.get(site_lat_idx).unwrap_or(""));
            let (Some(site_lon), Some(site_lat)) = (site_lon, site_lat) else {
                dropped_rows += 1;
                continue;
            };

            let center_lon = center_lon_idx.and_then(|i| parse_number(row.get(i).unwrap_or("")));
            let center_lat = center_lat_idx.and_then(|i| parse_number(row.get(i).unwrap_or("")));

            let values = schema
                .columns()
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    let raw = row.get(i).unwrap_or("");
                    if i == site_lon_idx {
                        FieldValue::Number(site_lon)
                    } else if i == site_lat_idx {
                        FieldValue::Number(site_lat)
                    } else if Some(i) == center_lon_idx {
                        center_lon.map_or(FieldValue::Null, FieldValue::Number)
                    } else if Some(i) == center_lat_idx {
                        center_lat.map_or(FieldValue::Null, FieldValue::Number)
                    } else if raw.is_empty() {
                        FieldValue::Null
                    } else {
                        FieldValue::Text(raw.to_string())
                    }
                })
                .collect();

            records.push(StationRecord::new(
                site_lat, site_lon, center_lat, center_lon, values,
            ));
        }

        if records.is_empty() {
            return Err(AuditError::EmptyAfterCleaning);
        }

        let outcome = LoadOutcome {
            dataset: Dataset::new(schema, records),
            total_rows,
            dropped_rows,
            encoding,
        };
        info!(
            kept = outcome.dataset.len(),
            total = outcome.total_rows,
            dropped = outcome.dropped_rows,
            "loaded station file"
        );

        Ok(outcome)
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Try the fallback chain in order. Windows-1252 is a superset of Latin-1
/// and decodes any byte sequence, so it doubles as the last resort.
fn decode(bytes: &[u8]) -> Option<(String, &'static str)> {
    let encodings: [&'static Encoding; 2] = [UTF_8, WINDOWS_1252];

    for encoding in encodings {
        let (content, had_errors) = encoding.decode_with_bom_removal(bytes);
        if !had_errors {
            return Some((content.into_owned(), encoding.name()));
        }
    }
    None
}

/// Numeric coercion for coordinate cells. Non-finite values count as
/// unparseable, so cleaned records always carry finite coordinates.
fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
