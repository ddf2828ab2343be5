/// Required coordinate columns (site position as licensed)
pub const SITE_LONGITUDE_COLUMN: &str = "SID_LONG";
pub const SITE_LATITUDE_COLUMN: &str = "SID_LAT";

/// Optional comparison coordinate columns (independently calculated center)
pub const CENTER_LONGITUDE_COLUMN: &str = "LONGITUDE_CENTER_KALKULASI";
pub const CENTER_LATITUDE_COLUMN: &str = "LATITUDE_CENTER_KALKULASI";

/// Display column used when naming stations in reports
pub const STATION_NAME_COLUMN: &str = "STN_NAME";

/// Columns appended to the exceeded-subset export
pub const DISTANCE_COLUMN: &str = "DISTANCE_M";
pub const STATUS_COLUMN: &str = "TOLERANCE_STATUS";

/// Tolerance threshold separating "within" from "exceeded", in meters
pub const TOLERANCE_METERS: f64 = 20.0;

/// Histogram band edges, in meters (upper edges, inclusive)
pub const BAND_5M: f64 = 5.0;
pub const BAND_10M: f64 = 10.0;
pub const BAND_20M: f64 = 20.0;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Defaults
pub const DEFAULT_DATA_DIR: &str = "Data";
pub const DEFAULT_DELIMITER: u8 = b',';
pub const CSV_EXTENSION: &str = "csv";
