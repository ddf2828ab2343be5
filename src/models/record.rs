use serde::{Deserialize, Serialize};
use validator::Validate;

/// A single cell value from the source table
///
/// Non-coordinate columns pass through untyped as `Text`; the four coordinate
/// columns are coerced to `Number` at load time, with invalid center values
/// becoming `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the value for CSV output. Numbers use the shortest
    /// representation that round-trips, so coordinates keep full precision.
    pub fn to_csv_field(&self) -> String {
        match self {
            FieldValue::Number(n) => format!("{}", n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Null => String::new(),
        }
    }
}

/// One station row: licensed site coordinates, the optional independently
/// calculated center coordinates, and the full row of source cells aligned
/// with the dataset schema.
///
/// The typed coordinate fields mirror the corresponding cells in `values`;
/// records with missing or unparseable site coordinates are dropped during
/// load, so `site_latitude`/`site_longitude` are always finite.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct StationRecord {
    #[validate(range(min = -90.0, max = 90.0))]
    pub site_latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub site_longitude: f64,

    #[validate(range(min = -90.0, max = 90.0))]
    pub center_latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub center_longitude: Option<f64>,

    values: Vec<FieldValue>,
}

impl StationRecord {
    pub fn new(
        site_latitude: f64,
        site_longitude: f64,
        center_latitude: Option<f64>,
        center_longitude: Option<f64>,
        values: Vec<FieldValue>,
    ) -> Self {
        Self {
            site_latitude,
            site_longitude,
            center_latitude,
            center_longitude,
            values,
        }
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    pub fn has_center_coordinates(&self) -> bool {
        self.center_latitude.is_some() && self.center_longitude.is_some()
    }

    /// Advisory range check. Out-of-range coordinates are reported, not
    /// rejected: the distance formula stays finite for any finite input.
    pub fn coordinates_in_bounds(&self) -> bool {
        self.validate().is_ok()
    }
}
