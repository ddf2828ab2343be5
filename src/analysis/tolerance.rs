use serde::Serialize;

use crate::models::{Dataset, StationRecord};
use crate::utils::constants::{BAND_10M, BAND_20M, BAND_5M, TOLERANCE_METERS};
use crate::utils::coordinates::haversine_distance;

/// Tolerance classification of one record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToleranceClass {
    /// Either center coordinate is absent; the record cannot be compared
    Missing,
    Within,
    Exceeded,
}

impl ToleranceClass {
    pub fn label(&self) -> &'static str {
        match self {
            ToleranceClass::Missing => "missing",
            ToleranceClass::Within => "within",
            ToleranceClass::Exceeded => "exceeded",
        }
    }

    pub fn is_comparable(&self) -> bool {
        !matches!(self, ToleranceClass::Missing)
    }
}

/// Distance between a record's site and calculated-center coordinates,
/// `None` when the center pair is incomplete
///
/// Computed on demand; never cached across filter changes.
pub fn separation_meters(record: &StationRecord) -> Option<f64> {
    let center_lat = record.center_latitude?;
    let center_lon = record.center_longitude?;

    Some(haversine_distance(
        record.site_latitude,
        record.site_longitude,
        center_lat,
        center_lon,
    ))
}

/// Classify a record against the fixed tolerance threshold
pub fn classify(record: &StationRecord) -> ToleranceClass {
    match separation_meters(record) {
        None => ToleranceClass::Missing,
        Some(d) if d > TOLERANCE_METERS => ToleranceClass::Exceeded,
        Some(_) => ToleranceClass::Within,
    }
}

/// Records exceeding the tolerance, with their distances, in dataset order
pub fn exceeded_records(dataset: &Dataset) -> Vec<(&StationRecord, f64)> {
    dataset
        .records()
        .iter()
        .filter_map(|record| {
            let d = separation_meters(record)?;
            (d > TOLERANCE_METERS).then_some((record, d))
        })
        .collect()
}

/// Banded histogram of separation distances. Bands are half-open on the
/// lower edge, inclusive on the upper; the first band includes 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DistanceBands {
    pub within_5m: usize,
    pub within_10m: usize,
    pub within_20m: usize,
    pub above_20m: usize,
}

impl DistanceBands {
    fn add(&mut self, distance: f64) {
        if distance <= BAND_5M {
            self.within_5m += 1;
        } else if distance <= BAND_10M {
            self.within_10m += 1;
        } else if distance <= BAND_20M {
            self.within_20m += 1;
        } else {
            self.above_20m += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.within_5m + self.within_10m + self.within_20m + self.above_20m
    }
}

/// Summary statistics over the comparable records of one filtered view
#[derive(Debug, Clone, Serialize)]
pub struct ToleranceStatistics {
    pub count: usize,
    pub mean_m: f64,
    pub median_m: f64,
    pub std_dev_m: f64,
    pub min_m: f64,
    pub max_m: f64,
    pub within_count: usize,
    pub exceeded_count: usize,
    pub within_percentage: f64,
    pub exceeded_percentage: f64,
    pub bands: DistanceBands,
}

impl ToleranceStatistics {
    pub fn summary(&self) -> String {
        format!(
            "Comparable records: {}\n\
            Distance: mean {:.2} m, median {:.2} m, std dev {:.2} m\n\
            Range: {:.2} m to {:.2} m\n\
            Tolerance ({:.0} m): {} within ({:.1}%), {} exceeded ({:.1}%)\n\
            Bands: <=5 m: {}, 5-10 m: {}, 10-20 m: {}, >20 m: {}",
            self.count,
            self.mean_m,
            self.median_m,
            self.std_dev_m,
            self.min_m,
            self.max_m,
            TOLERANCE_METERS,
            self.within_count,
            self.within_percentage,
            self.exceeded_count,
            self.exceeded_percentage,
            self.bands.within_5m,
            self.bands.within_10m,
            self.bands.within_20m,
            self.bands.above_20m,
        )
    }
}

pub struct ToleranceAnalyzer;

impl ToleranceAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Single pass over the comparable records of a dataset. Returns `None`
    /// when no record carries both coordinate pairs; callers render that as a
    /// distinct no-data state rather than zeroed statistics.
    pub fn summarize(&self, dataset: &Dataset) -> Option<ToleranceStatistics> {
        let mut distances = Vec::new();
        let mut bands = DistanceBands::default();
        let mut exceeded_count = 0;

        for record in dataset.records() {
            let Some(distance) = separation_meters(record) else {
                continue;
            };

            if distance > TOLERANCE_METERS {
                exceeded_count += 1;
            }
            bands.add(distance);
            distances.push(distance);
        }

        if distances.is_empty() {
            return None;
        }

        let count = distances.len();
        let mean = distances.iter().sum::<f64>() / count as f64;

        let variance = distances
            .iter()
            .map(|d| (d - mean).powi(2))
            .sum::<f64>()
            / count as f64;

        let mut sorted = distances.clone();
        sorted.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        let within_count = count - exceeded_count;

        Some(ToleranceStatistics {
            count,
            mean_m: mean,
            median_m: median,
            std_dev_m: variance.sqrt(),
            min_m: sorted[0],
            max_m: sorted[count - 1],
            within_count,
            exceeded_count,
            within_percentage: within_count as f64 / count as f64 * 100.0,
            exceeded_percentage: exceeded_count as f64 / count as f64 * 100.0,
            bands,
        })
    }
}

impl Default for ToleranceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
