use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::models::record::{FieldValue, StationRecord};
use crate::utils::constants::{CENTER_LATITUDE_COLUMN, CENTER_LONGITUDE_COLUMN};

/// Ordered column names of a loaded file, with O(1) index lookup
///
/// Capability checks against the schema are resolved once at load time;
/// nothing downstream probes individual records for column presence.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self { columns, index }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Whether this file carries the calculated-center coordinate pair, and
    /// tolerance classification is therefore available
    pub fn has_center_coordinates(&self) -> bool {
        self.has_column(CENTER_LATITUDE_COLUMN) && self.has_column(CENTER_LONGITUDE_COLUMN)
    }
}

/// Extent of the site coordinates, used for map centering
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeographicBounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// An ordered sequence of station records sharing one schema
///
/// Invariant: every record has finite site coordinates (rows failing this are
/// dropped during load). Filtered views are new `Dataset`s; records are never
/// mutated in place.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Schema,
    records: Vec<StationRecord>,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<StationRecord>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record's cell by column name
    pub fn field<'a>(&self, record: &'a StationRecord, column: &str) -> Option<&'a FieldValue> {
        self.schema
            .column_index(column)
            .and_then(|i| record.value(i))
    }

    /// Build a new dataset from a subsequence of this one's records
    pub fn with_records(&self, records: Vec<StationRecord>) -> Dataset {
        Dataset {
            schema: self.schema.clone(),
            records,
        }
    }

    /// Sorted distinct non-null values of a column, for filter pickers
    pub fn unique_values(&self, column: &str) -> Vec<String> {
        let Some(index) = self.schema.column_index(column) else {
            return Vec::new();
        };

        let mut values = BTreeSet::new();
        for record in &self.records {
            match record.value(index) {
                Some(FieldValue::Text(s)) => {
                    values.insert(s.clone());
                }
                Some(FieldValue::Number(n)) => {
                    values.insert(format!("{}", n));
                }
                _ => {}
            }
        }

        values.into_iter().collect()
    }

    /// Bounding box of the site coordinates, `None` for an empty dataset
    pub fn geographic_bounds(&self) -> Option<GeographicBounds> {
        let first = self.records.first()?;
        let mut bounds = GeographicBounds {
            min_lat: first.site_latitude,
            max_lat: first.site_latitude,
            min_lon: first.site_longitude,
            max_lon: first.site_longitude,
        };

        for record in &self.records[1..] {
            bounds.min_lat = bounds.min_lat.min(record.site_latitude);
            bounds.max_lat = bounds.max_lat.max(record.site_latitude);
            bounds.min_lon = bounds.min_lon.min(record.site_longitude);
            bounds.max_lon = bounds.max_lon.max(record.site_longitude);
        }

        Some(bounds)
    }

    /// Number of records whose coordinates fall outside valid lat/lon ranges.
    /// Reported as a data quality figure; such records are kept.
    pub fn out_of_range_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.coordinates_in_bounds())
            .count()
    }
}
