use tracing::debug;

use crate::analysis::tolerance::{exceeded_records, ToleranceClass};
use crate::error::Result;
use crate::models::Dataset;
use crate::utils::constants::{DISTANCE_COLUMN, STATUS_COLUMN};

/// Serializes filtered views back to the source tabular format
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// Round-trip the dataset: schema columns verbatim, numeric cells in
    /// shortest-roundtrip form so coordinates keep full precision
    pub fn export(&self, dataset: &Dataset) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(dataset.schema().columns())?;

        for record in dataset.records() {
            writer.write_record(record.values().iter().map(|v| v.to_csv_field()))?;
        }

        finish(writer)
    }

    /// Export only the records exceeding tolerance, with the computed
    /// distance and status columns appended after the schema columns
    pub fn export_exceeded(&self, dataset: &Dataset) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header: Vec<String> = dataset.schema().columns().to_vec();
        header.push(DISTANCE_COLUMN.to_string());
        header.push(STATUS_COLUMN.to_string());
        writer.write_record(&header)?;

        for (record, distance) in exceeded_records(dataset) {
            let mut row: Vec<String> =
                record.values().iter().map(|v| v.to_csv_field()).collect();
            row.push(format!("{:.2}", distance));
            row.push(ToleranceClass::Exceeded.label().to_string());
            writer.write_record(&row)?;
        }

        finish(writer)
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    debug!(bytes = bytes.len(), "export buffer ready");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldValue, Schema, StationRecord};

    fn dataset() -> Dataset {
        let schema = Schema::new(vec![
            "SID_LONG".to_string(),
            "SID_LAT".to_string(),
            "LONGITUDE_CENTER_KALKULASI".to_string(),
            "LATITUDE_CENTER_KALKULASI".to_string(),
            "STN_NAME".to_string(),
        ]);

        let near = StationRecord::new(
            -6.200000,
            106.816666,
            Some(-6.200010),
            Some(106.816666),
            vec![
                FieldValue::Number(106.816666),
                FieldValue::Number(-6.2),
                FieldValue::Number(106.816666),
                FieldValue::Number(-6.20001),
                FieldValue::Text("STASIUN SATU".to_string()),
            ],
        );

        // ~55 m east offset, well past tolerance
        let far = StationRecord::new(
            -6.200000,
            106.816666,
            Some(-6.200000),
            Some(106.817166),
            vec![
                FieldValue::Number(106.816666),
                FieldValue::Number(-6.2),
                FieldValue::Number(106.817166),
                FieldValue::Number(-6.2),
                FieldValue::Text("STASIUN DUA".to_string()),
            ],
        );

        Dataset::new(schema, vec![near, far])
    }

    #[test]
    fn test_export_round_trips_header_and_rows() -> Result<()> {
        let bytes = CsvExporter::new().export(&dataset())?;
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "SID_LONG,SID_LAT,LONGITUDE_CENTER_KALKULASI,LATITUDE_CENTER_KALKULASI,STN_NAME"
        );
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("106.816666,-6.2"));
        Ok(())
    }

    #[test]
    fn test_export_exceeded_appends_columns() -> Result<()> {
        let bytes = CsvExporter::new().export_exceeded(&dataset())?;
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.ends_with("STN_NAME,DISTANCE_M,TOLERANCE_STATUS"));

        // Only the far record exceeds tolerance
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("STASIUN DUA"));
        assert!(rows[0].ends_with(",exceeded"));
        Ok(())
    }
}
