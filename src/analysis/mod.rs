pub mod filter;
pub mod tolerance;

pub use filter::{FieldConstraint, FilterCriteria, ToleranceFilter};
pub use tolerance::{
    classify, exceeded_records, separation_meters, DistanceBands, ToleranceAnalyzer,
    ToleranceClass, ToleranceStatistics,
};
