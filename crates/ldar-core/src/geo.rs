//! Site coordinates.
//!
//! Weather and daylight lookups are keyed by location, and mobile crews
//! derive travel time from the distance between consecutive sites when a
//! travel speed is configured.

use std::fmt;

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Latitude/longitude in decimal degrees (WGS-84).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let (lat1, lat2) = ((self.lat as f64).to_radians(), (other.lat as f64).to_radians());
        let half_dlat = (lat2 - lat1) / 2.0;
        let half_dlon = ((other.lon - self.lon) as f64).to_radians() / 2.0;

        let h = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
    }

    /// 1-degree cell containing this point; gridded weather is keyed on it.
    #[inline]
    pub fn grid_cell(self) -> (i32, i32) {
        (self.lat.floor() as i32, self.lon.floor() as i32)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}N {:.4}E", self.lat, self.lon)
    }
}
