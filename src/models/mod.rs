pub mod dataset;
pub mod record;

pub use dataset::{Dataset, GeographicBounds, Schema};
pub use record::{FieldValue, StationRecord};
