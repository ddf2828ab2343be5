use std::str::FromStr;

use serde::Serialize;

use crate::analysis::tolerance::{classify, ToleranceClass};
use crate::error::{AuditError, Result};
use crate::models::{Dataset, FieldValue, Schema, StationRecord};

/// Three-way tolerance selector. `Any` is the inactive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceFilter {
    #[default]
    Any,
    WithinOnly,
    ExceededOnly,
}

impl FromStr for ToleranceFilter {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "any" => Ok(ToleranceFilter::Any),
            "within" => Ok(ToleranceFilter::WithinOnly),
            "exceeded" => Ok(ToleranceFilter::ExceededOnly),
            other => Err(AuditError::InvalidFilter(format!(
                "{} (expected any, within or exceeded)",
                other
            ))),
        }
    }
}

/// One exact-match constraint on a categorical column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldConstraint {
    pub column: String,
    pub value: String,
}

impl FieldConstraint {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Case-sensitive text equality, or numeric equality for numeric cells.
    /// Null cells fail every constraint.
    fn matches(&self, cell: &FieldValue) -> bool {
        match cell {
            FieldValue::Null => false,
            FieldValue::Text(s) => s == &self.value,
            FieldValue::Number(n) => self
                .value
                .parse::<f64>()
                .map(|v| v == *n)
                .unwrap_or(false),
        }
    }
}

impl FromStr for FieldConstraint {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((column, value)) if !column.is_empty() => {
                Ok(FieldConstraint::new(column, value))
            }
            _ => Err(AuditError::InvalidFilter(s.to_string())),
        }
    }
}

/// An explicit, immutable description of one filtered view: zero or more
/// categorical constraints plus the tolerance selector. Constructed once per
/// interaction and passed into `apply`; inactive constraints are simply
/// absent.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    constraints: Vec<FieldConstraint>,
    tolerance: ToleranceFilter,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraint(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints.push(FieldConstraint::new(column, value));
        self
    }

    pub fn with_tolerance(mut self, tolerance: ToleranceFilter) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn constraints(&self) -> &[FieldConstraint] {
        &self.constraints
    }

    pub fn tolerance(&self) -> ToleranceFilter {
        self.tolerance
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.tolerance == ToleranceFilter::Any
    }

    /// Reject constraints naming columns the schema does not carry
    pub fn validate_against(&self, schema: &Schema) -> Result<()> {
        for constraint in &self.constraints {
            if !schema.has_column(&constraint.column) {
                return Err(AuditError::UnknownFilterColumn(constraint.column.clone()));
            }
        }
        Ok(())
    }

    /// Produce the filtered view: an order-preserving subsequence containing
    /// the records satisfying every constraint. Conjunctive, so constraint
    /// order never changes the result, and reapplying is a no-op.
    ///
    /// The tolerance selector only applies when the schema carries both
    /// center columns; without them it is never offered, and is ignored here.
    pub fn apply(&self, dataset: &Dataset) -> Dataset {
        let tolerance = match self.tolerance {
            ToleranceFilter::Any => ToleranceFilter::Any,
            t if dataset.schema().has_center_coordinates() => t,
            _ => ToleranceFilter::Any,
        };

        let records = dataset
            .records()
            .iter()
            .filter(|record| self.matches_record(dataset, record, tolerance))
            .cloned()
            .collect();

        dataset.with_records(records)
    }

    fn matches_record(
        &self,
        dataset: &Dataset,
        record: &StationRecord,
        tolerance: ToleranceFilter,
    ) -> bool {
        for constraint in &self.constraints {
            match dataset.field(record, &constraint.column) {
                Some(cell) if constraint.matches(cell) => {}
                _ => return false,
            }
        }

        match tolerance {
            ToleranceFilter::Any => true,
            // Missing satisfies neither selection
            ToleranceFilter::WithinOnly => classify(record) == ToleranceClass::Within,
            ToleranceFilter::ExceededOnly => classify(record) == ToleranceClass::Exceeded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Schema;

    fn schema() -> Schema {
        Schema::new(vec![
            "SID_LONG".to_string(),
            "SID_LAT".to_string(),
            "LONGITUDE_CENTER_KALKULASI".to_string(),
            "LATITUDE_CENTER_KALKULASI".to_string(),
            "CLNT_NAME".to_string(),
            "FREQ".to_string(),
        ])
    }

    fn record(
        client: Option<&str>,
        freq: f64,
        center_offset_m: Option<f64>,
    ) -> StationRecord {
        let (site_lat, site_lon) = (-6.2, 106.816666);
        let center_lat = center_offset_m.map(|m| site_lat + m / 111_195.0);
        let center_lon = center_offset_m.map(|_| site_lon);

        let client_value = match client {
            Some(s) => FieldValue::Text(s.to_string()),
            None => FieldValue::Null,
        };

        StationRecord::new(
            site_lat,
            site_lon,
            center_lat,
            center_lon,
            vec![
                FieldValue::Number(site_lon),
                FieldValue::Number(site_lat),
                center_lon.map_or(FieldValue::Null, FieldValue::Number),
                center_lat.map_or(FieldValue::Null, FieldValue::Number),
                client_value,
                FieldValue::Number(freq),
            ],
        )
    }

    fn dataset() -> Dataset {
        Dataset::new(
            schema(),
            vec![
                record(Some("Radio Alpha"), 98.5, Some(4.0)),
                record(Some("Radio Beta"), 101.1, Some(30.0)),
                record(Some("Radio Alpha"), 101.1, None),
                record(None, 98.5, Some(12.0)),
            ],
        )
    }

    #[test]
    fn test_text_constraint_exact_match() {
        let ds = dataset();
        let filtered = FilterCriteria::new()
            .with_constraint("CLNT_NAME", "Radio Alpha")
            .apply(&ds);
        assert_eq!(filtered.len(), 2);

        // Case-sensitive
        let filtered = FilterCriteria::new()
            .with_constraint("CLNT_NAME", "radio alpha")
            .apply(&ds);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_null_cell_fails_constraint() {
        let ds = dataset();
        let filtered = FilterCriteria::new()
            .with_constraint("CLNT_NAME", "")
            .apply(&ds);
        // The record with a null client is excluded, not matched by ""
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_numeric_equality() {
        let ds = dataset();
        let filtered = FilterCriteria::new()
            .with_constraint("FREQ", "98.5")
            .apply(&ds);
        assert_eq!(filtered.len(), 2);

        let filtered = FilterCriteria::new()
            .with_constraint("FREQ", "not-a-number")
            .apply(&ds);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_conjunctive_and_order_independent() {
        let ds = dataset();

        let a = FilterCriteria::new()
            .with_constraint("CLNT_NAME", "Radio Alpha")
            .with_constraint("FREQ", "101.1")
            .apply(&ds);
        let b = FilterCriteria::new()
            .with_constraint("FREQ", "101.1")
            .with_constraint("CLNT_NAME", "Radio Alpha")
            .apply(&ds);

        assert_eq!(a.len(), 1);
        assert_eq!(a.len(), b.len());
    }

    #[test]
    fn test_idempotent() {
        let ds = dataset();
        let criteria = FilterCriteria::new()
            .with_constraint("CLNT_NAME", "Radio Alpha")
            .with_tolerance(ToleranceFilter::WithinOnly);

        let once = criteria.apply(&ds);
        let twice = criteria.apply(&once);
        assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn test_tolerance_filter() {
        let ds = dataset();

        let within = FilterCriteria::new()
            .with_tolerance(ToleranceFilter::WithinOnly)
            .apply(&ds);
        assert_eq!(within.len(), 2); // 4 m and 12 m records

        let exceeded = FilterCriteria::new()
            .with_tolerance(ToleranceFilter::ExceededOnly)
            .apply(&ds);
        assert_eq!(exceeded.len(), 1); // 30 m record

        // The record without center coordinates satisfies neither
        assert_eq!(within.len() + exceeded.len(), ds.len() - 1);
    }

    #[test]
    fn test_tolerance_filter_ignored_without_center_columns() {
        let schema = Schema::new(vec!["SID_LONG".to_string(), "SID_LAT".to_string()]);
        let ds = Dataset::new(
            schema,
            vec![StationRecord::new(
                -6.2,
                106.8,
                None,
                None,
                vec![FieldValue::Number(106.8), FieldValue::Number(-6.2)],
            )],
        );

        let filtered = FilterCriteria::new()
            .with_tolerance(ToleranceFilter::ExceededOnly)
            .apply(&ds);
        assert_eq!(filtered.len(), 1);
    }

    #[test]
    fn test_validate_against_schema() {
        let criteria = FilterCriteria::new().with_constraint("NO_SUCH_COLUMN", "x");
        assert!(criteria.validate_against(&schema()).is_err());

        let criteria = FilterCriteria::new().with_constraint("CLNT_NAME", "x");
        assert!(criteria.validate_against(&schema()).is_ok());
    }

    #[test]
    fn test_constraint_parsing() {
        let c: FieldConstraint = "CITY=JAKARTA PUSAT".parse().unwrap();
        assert_eq!(c.column, "CITY");
        assert_eq!(c.value, "JAKARTA PUSAT");

        // Value may contain '='; only the first split counts
        let c: FieldConstraint = "NOTE=a=b".parse().unwrap();
        assert_eq!(c.value, "a=b");

        assert!("no-equals-sign".parse::<FieldConstraint>().is_err());
        assert!("=value".parse::<FieldConstraint>().is_err());
    }

    #[test]
    fn test_tolerance_parsing() {
        assert_eq!("any".parse::<ToleranceFilter>().unwrap(), ToleranceFilter::Any);
        assert_eq!(
            "exceeded".parse::<ToleranceFilter>().unwrap(),
            ToleranceFilter::ExceededOnly
        );
        assert!("sometimes".parse::<ToleranceFilter>().is_err());
    }
}
