use std::f64::consts::TAU;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A longitude/latitude pair in radians with sphere geometry
///
/// Plain immutable value, no normalization beyond what the caller provides.
/// All operations treat the Earth as a sphere of [`EARTH_RADIUS_M`].
///
/// # Limitations
///
/// The bearing formulas degenerate at the exact poles (`lat = ±π/2`), where
/// the result may be NaN. Callers evaluating bearings at the poles get
/// whatever the spherical formula yields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lon: f64,
    lat: f64,
}

impl GeoPoint {
    /// Create from radians
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Create from degrees
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self::new(lon_deg.to_radians(), lat_deg.to_radians())
    }

    /// Longitude in radians
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Latitude in radians
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees
    pub fn lon_deg(&self) -> f64 {
        self.lon.to_degrees()
    }

    /// Latitude in degrees
    pub fn lat_deg(&self) -> f64 {
        self.lat.to_degrees()
    }

    /// Great-circle distance in meters (haversine)
    pub fn distance_to(&self, to: &GeoPoint) -> f64 {
        let sin_lat = ((to.lat - self.lat) / 2.0).sin();
        let sin_lon = ((to.lon - self.lon) / 2.0).sin();
        let a = sin_lat * sin_lat + self.lat.cos() * to.lat.cos() * sin_lon * sin_lon;
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Initial great-circle bearing in radians, normalized into `[0, 2π)`
    pub fn bearing_to(&self, to: &GeoPoint) -> f64 {
        // formulas: http://www.movable-type.co.uk/scripts/latlong.html
        let d_lon = to.lon - self.lon;
        let cos_lat2 = to.lat.cos();
        let y = d_lon.sin() * cos_lat2;
        let x = self.lat.cos() * to.lat.sin() - self.lat.sin() * cos_lat2 * d_lon.cos();
        (y.atan2(x) + TAU) % TAU
    }

    /// Direct geodesic problem: destination after `distance` meters along
    /// the initial `bearing` (radians)
    pub fn step_direction(&self, distance: f64, bearing: f64) -> GeoPoint {
        let dr = distance / EARTH_RADIUS_M;
        let (sin_dr, cos_dr) = dr.sin_cos();
        let (sin_lat, cos_lat) = self.lat.sin_cos();
        let sin_lat2 = sin_lat * cos_dr + cos_lat * sin_dr * bearing.cos();
        let lat2 = sin_lat2.asin();
        let lon2 = self.lon + (bearing.sin() * sin_dr * cos_lat).atan2(cos_dr - sin_lat * sin_lat2);
        GeoPoint::new(lon2, lat2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_degrees_round_trip() {
        let p = GeoPoint::from_degrees(10.72005, 59.9423);
        assert!((p.lon_deg() - 10.72005).abs() < 1e-9);
        assert!((p.lat_deg() - 59.9423).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::from_degrees(10.0, 60.0);
        let b = GeoPoint::from_degrees(20.0, 70.0);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn distance_zero_to_self() {
        let a = GeoPoint::from_degrees(10.0, 60.0);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn step_direction_inverts_distance_and_bearing() {
        let a = GeoPoint::from_degrees(10.0, 60.0);
        let b = GeoPoint::from_degrees(12.0, 61.0);
        let d = a.distance_to(&b);
        let brg = a.bearing_to(&b);
        let c = a.step_direction(d, brg);
        assert!(a.distance_to(&c) > 0.0);
        assert!(b.distance_to(&c) < 1.0, "ended {} m off", b.distance_to(&c));
    }

    #[test]
    fn step_due_north() {
        let a = GeoPoint::from_degrees(10.0, 60.0);
        // one degree of latitude along a meridian
        let dist = EARTH_RADIUS_M * 1f64.to_radians();
        let b = a.step_direction(dist, 0.0);
        assert!((b.lon_deg() - 10.0).abs() < 1e-9);
        assert!((b.lat_deg() - 61.0).abs() < 1e-9);
    }
}
