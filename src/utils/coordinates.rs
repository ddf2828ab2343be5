use crate::utils::constants::EARTH_RADIUS_M;

/// Calculate the great-circle distance between two points in meters using the
/// Haversine formula
///
/// # Examples
/// ```
/// use sitecheck::utils::haversine_distance;
///
/// // One degree of longitude at the equator is roughly 111.2 km
/// let d = haversine_distance(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111_195.0).abs() < 1_000.0);
/// ```
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push `a` marginally past 1.0 for near-antipodal points,
    // which would take asin outside its domain
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}
