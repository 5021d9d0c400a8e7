use std::fmt;
use std::ops::{Add, Div, Sub};
use std::str::FromStr;

use crate::error::Error;
use crate::types::{Angular, GeoPoint, SUBMINUTES_PER_DEGREE};

/// Kilometers per minute of arc on a great circle (one nautical mile)
pub const KM_PER_ARC_MINUTE: f64 = 1.852;

/// A longitude/latitude pair in fixed-point angles
///
/// Longitude is kept in `(-180, 180]` degrees and latitude in `[-90, 90]`.
/// Addition wraps the longitude at the date line; adding across a pole
/// reflects the latitude back under 90° and flips the longitude by 180°,
/// the way a path walking north through the pole continues south on the
/// opposite meridian.
///
/// Equality and hashing are exact (fixed-point representation), so a
/// `Coordinate` works as a set or map key. The floating projections exist
/// for the planar math only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Coordinate {
    lon: Angular,
    lat: Angular,
}

impl Coordinate {
    pub fn new(lon: Angular, lat: Angular) -> Self {
        Self { lon, lat }
    }

    /// Create from scaled-integer encodings (`degree * 10000 + subminute`)
    pub fn from_encoded(lon: i32, lat: i32) -> Self {
        Self::new(Angular::from_encoded(lon), Angular::from_encoded(lat))
    }

    /// Create from floating degrees
    pub fn from_degrees(lon: f64, lat: f64) -> Self {
        Self::new(Angular::from_degrees(lon), Angular::from_degrees(lat))
    }

    pub fn lon(&self) -> Angular {
        self.lon
    }

    pub fn lat(&self) -> Angular {
        self.lat
    }

    /// Longitude in floating degrees
    pub fn lon_deg(&self) -> f64 {
        self.lon.degrees()
    }

    /// Latitude in floating degrees
    pub fn lat_deg(&self) -> f64 {
        self.lat.degrees()
    }

    /// Longitude in the scaled-integer encoding
    pub fn lon_encoded(&self) -> i32 {
        self.lon.encoded()
    }

    /// Latitude in the scaled-integer encoding
    pub fn lat_encoded(&self) -> i32 {
        self.lat.encoded()
    }

    /// Radian view for the sphere-geometry operations
    pub fn to_geo_point(self) -> GeoPoint {
        GeoPoint::new(self.lon.radians(), self.lat.radians())
    }

    /// Round both axes to a multiple of `resolution` subminutes
    ///
    /// Latitude is rounded first; longitude only if that succeeded. A
    /// resolution below the minimum granularity leaves the coordinate
    /// unchanged.
    pub fn round(&mut self, resolution: i32) {
        if let Some(lat) = self.lat.rounded(resolution, true) {
            self.lat = lat;
            if let Some(lon) = self.lon.rounded(resolution, true) {
                self.lon = lon;
            }
        }
    }

    /// The four corners of the rounding cell containing this coordinate
    ///
    /// Combines the "round up" and "round down" neighbors of each axis
    /// independently. Empty if rounding is not possible at `resolution`.
    pub fn rounded_grid(&self, resolution: i32) -> Vec<Coordinate> {
        let (Some(lat_near), Some(lon_near), Some(lat_far), Some(lon_far)) = (
            self.lat.rounded(resolution, true),
            self.lon.rounded(resolution, true),
            self.lat.rounded(resolution, false),
            self.lon.rounded(resolution, false),
        ) else {
            return Vec::new();
        };

        vec![
            Coordinate::new(lon_near, lat_near),
            Coordinate::new(lon_far, lat_near),
            Coordinate::new(lon_near, lat_far),
            Coordinate::new(lon_far, lat_far),
        ]
    }

    /// Great-circle distance in whole kilometers, rounded to nearest
    pub fn distance(&self, to: &Coordinate) -> i32 {
        (self.distance_to(to) / 1000.0).round() as i32
    }

    /// Great-circle distance in meters
    pub fn distance_to(&self, to: &Coordinate) -> f64 {
        self.to_geo_point().distance_to(&to.to_geo_point())
    }

    /// Initial great-circle bearing in radians, in `[0, 2π)`
    pub fn bearing_to(&self, to: &Coordinate) -> f64 {
        self.to_geo_point().bearing_to(&to.to_geo_point())
    }

    /// Initial great-circle bearing in degrees, in `[0, 360)`
    pub fn bearing_to_deg(&self, to: &Coordinate) -> f64 {
        self.bearing_to(to).to_degrees()
    }

    /// 2-D cross product of the floating degree vectors
    ///
    /// A planar approximation used for local orientation tests over short
    /// polygon edges, not a spherical computation.
    pub fn cross(&self, other: &Coordinate) -> f64 {
        self.lon_deg() * other.lat_deg() - self.lat_deg() * other.lon_deg()
    }

    /// Distance threshold test; a zero tolerance means exact equality
    pub fn is_closer_than(&self, other: &Coordinate, tolerance_km: i32) -> bool {
        if tolerance_km == 0 {
            return self == other;
        }
        self.distance(other) <= tolerance_km
    }

    /// Axis-aligned containment between a northwest and southeast corner
    ///
    /// No date-line wraparound handling: a rectangle crossing ±180° is not
    /// representable by its NW/SE corners here.
    pub fn is_in_rect(&self, nw: &Coordinate, se: &Coordinate) -> bool {
        if nw.lat < self.lat || nw.lon > self.lon {
            return false;
        }
        if se.lat > self.lat || se.lon < self.lon {
            return false;
        }
        true
    }

    /// Convert a kilometer span into the scaled-integer angular encoding
    ///
    /// Uses the nautical-mile arc minute; for a span along the longitude
    /// axis the minutes shrink by the secant of this coordinate's latitude.
    pub fn km_to_encoded(&self, km: i32, along_lon: bool) -> i32 {
        let lat = if along_lon { self.lat.radians() } else { 0.0 };
        let mut result = (km as f64 / (KM_PER_ARC_MINUTE * lat.cos()) * 100.0) as i32;
        if result >= SUBMINUTES_PER_DEGREE {
            let degrees = result / SUBMINUTES_PER_DEGREE;
            result = result % SUBMINUTES_PER_DEGREE + degrees * 10000;
        }
        result
    }

    /// Text encoding `"lonDeg:lonSubmin:latDeg:latSubmin"`
    ///
    /// Decoded by [`Coordinate::from_str`]; the round trip is exact.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.lon.degree(),
            self.lon.subminute(),
            self.lat.degree(),
            self.lat.subminute()
        )
    }

    fn add_lon(&mut self, rhs: Angular) {
        let mut lon = Angular::from_parts(
            self.lon.degree() + rhs.degree() % 360,
            self.lon.subminute() + rhs.subminute(),
        );
        // wrap into (-180, 180]
        while lon.degrees() > 180.0 {
            lon = Angular::from_parts(lon.degree() - 360, lon.subminute());
        }
        while lon.degrees() <= -180.0 {
            lon = Angular::from_parts(lon.degree() + 360, lon.subminute());
        }
        self.lon = lon;
    }

    fn add_lat(&mut self, rhs: Angular) {
        let mut lat = Angular::from_parts(
            self.lat.degree() + rhs.degree() % 360,
            self.lat.subminute() + rhs.subminute(),
        );

        if lat.degrees() >= 270.0 {
            lat = Angular::from_parts(lat.degree() - 360, lat.subminute());
        }
        if lat.degrees() <= -270.0 {
            lat = Angular::from_parts(lat.degree() + 360, lat.subminute());
        }

        if lat.degrees() >= 90.0 {
            // over the north pole: reflect and continue on the antimeridian
            lat = Angular::from_parts(180 - lat.degree(), -lat.subminute());
            self.add_lon(Angular::from_degrees(180.0));
        } else if lat.degrees() <= -90.0 {
            lat = Angular::from_parts(-180 - lat.degree(), -lat.subminute());
            self.add_lon(Angular::from_degrees(180.0));
        }
        self.lat = lat;
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    fn add(self, rhs: Coordinate) -> Coordinate {
        let mut out = self;
        out.add_lon(rhs.lon);
        out.add_lat(rhs.lat);
        out
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    fn sub(self, rhs: Coordinate) -> Coordinate {
        self + Coordinate::new(-rhs.lon, -rhs.lat)
    }
}

impl Div<f64> for Coordinate {
    type Output = Coordinate;

    /// Scalar division of the floating degree projections
    ///
    /// Loses fixed-point exactness; meant for interpolation such as the
    /// bounding-box subdivision grid.
    fn div(self, rhs: f64) -> Coordinate {
        Coordinate::from_degrees(self.lon_deg() / rhs, self.lat_deg() / rhs)
    }
}

/// Magnitude of one axis as whole degrees and hundredth minutes
fn axis_parts(a: Angular) -> (i32, f64) {
    if a.encoded() >= 0 {
        (a.degree(), a.subminute() as f64 / 100.0)
    } else if a.subminute() == 0 {
        (-a.degree(), 0.0)
    } else {
        (
            -a.degree() - 1,
            (SUBMINUTES_PER_DEGREE - a.subminute()) as f64 / 100.0,
        )
    }
}

impl Coordinate {
    /// Human-readable longitude, e.g. `"10° 43.2'E"`
    pub fn lon_string(&self) -> String {
        let hemi = if self.lon.encoded() < 0 { 'W' } else { 'E' };
        let (deg, min) = axis_parts(self.lon);
        format!("{deg}° {min}'{hemi}")
    }

    /// Human-readable latitude, e.g. `"59° 56.54'N"`
    pub fn lat_string(&self) -> String {
        let hemi = if self.lat.encoded() < 0 { 'S' } else { 'N' };
        let (deg, min) = axis_parts(self.lat);
        format!("{deg}° {min}'{hemi}")
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.lon_string(), self.lat_string())
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    /// Decode the `"lonDeg:lonSubmin:latDeg:latSubmin"` text encoding
    ///
    /// All-or-nothing: malformed input produces an error, never a partial
    /// coordinate.
    fn from_str(s: &str) -> Result<Self, Error> {
        let fields: Vec<&str> = s.split(':').collect();
        let [lon_deg, lon_sub, lat_deg, lat_sub] = fields[..] else {
            return Err(Error::InvalidEncoding(s.to_owned()));
        };
        Ok(Coordinate::new(
            Angular::from_parts(lon_deg.parse()?, lon_sub.parse()?),
            Angular::from_parts(lat_deg.parse()?, lat_sub.parse()?),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err, assert_ok_eq};

    #[test]
    fn encode_decode_round_trip() {
        let cases = [
            Coordinate::from_degrees(10.72005, 59.9423),
            Coordinate::from_degrees(-5.5, -33.25),
            Coordinate::from_encoded(1795999, -895999),
            Coordinate::default(),
        ];
        for c in cases {
            assert_ok_eq!(c.encode().parse::<Coordinate>(), c);
        }
    }

    #[test]
    fn decode_rejects_malformed() {
        assert_err!("1:2:3".parse::<Coordinate>());
        assert_err!("1:2:3:4:5".parse::<Coordinate>());
        assert_err!("a:2:3:4".parse::<Coordinate>());
        assert_err!("".parse::<Coordinate>());
    }

    #[test]
    fn add_plain() {
        let a = Coordinate::from_degrees(10.0, 60.0);
        let b = Coordinate::from_degrees(2.5, -1.5);
        assert_eq!(a + b, Coordinate::from_degrees(12.5, 58.5));
    }

    #[test]
    fn add_wraps_date_line() {
        let a = Coordinate::from_degrees(179.5, 60.0);
        let b = Coordinate::from_degrees(1.0, 0.0);
        assert_eq!(a + b, Coordinate::from_degrees(-179.5, 60.0));

        let c = Coordinate::from_degrees(-179.5, 60.0);
        let d = Coordinate::from_degrees(-1.0, 0.0);
        assert_eq!(c + d, Coordinate::from_degrees(179.5, 60.0));
    }

    #[test]
    fn add_over_north_pole_flips_longitude() {
        let a = Coordinate::from_degrees(10.0, 89.0);
        let b = Coordinate::from_degrees(0.0, 2.0);
        assert_eq!(a + b, Coordinate::from_degrees(-170.0, 89.0));
    }

    #[test]
    fn add_over_south_pole_flips_longitude() {
        let a = Coordinate::from_degrees(10.0, -89.5);
        let b = Coordinate::from_degrees(0.0, -1.0);
        assert_eq!(a + b, Coordinate::from_degrees(-170.0, -89.5));
    }

    #[test]
    fn sub_is_add_of_negation() {
        let a = Coordinate::from_degrees(10.0, 60.0);
        let b = Coordinate::from_degrees(2.5, 1.5);
        assert_eq!(a - b, Coordinate::from_degrees(7.5, 58.5));
        assert_eq!((a - b) + b, a);
    }

    #[test]
    fn div_interpolates_degrees() {
        let a = Coordinate::from_degrees(10.0, 60.0);
        assert_eq!(a / 2.0, Coordinate::from_degrees(5.0, 30.0));
    }

    #[test]
    fn distance_blindern_fannarak() {
        let blindern = Coordinate::from_degrees(10.72005, 59.9423);
        let fannarak = Coordinate::from_degrees(7.9058, 61.5158);
        assert!((blindern.distance_to(&fannarak) - 232_400.0).abs() < 100.0);
        assert_eq!(blindern.distance(&fannarak), 232);
    }

    #[test]
    fn is_closer_than_zero_means_equal() {
        let a = Coordinate::from_degrees(10.0, 60.0);
        // one subminute is 1/6000°, so the offset must exceed that to
        // produce a distinct fixed-point value
        let b = Coordinate::from_degrees(10.001, 60.0);
        assert!(!a.is_closer_than(&b, 0));
        assert!(a.is_closer_than(&a, 0));
        assert!(a.is_closer_than(&b, 1));
    }

    #[test]
    fn in_rect() {
        let nw = Coordinate::from_degrees(5.0, 65.0);
        let se = Coordinate::from_degrees(15.0, 55.0);
        assert!(Coordinate::from_degrees(10.0, 60.0).is_in_rect(&nw, &se));
        assert!(!Coordinate::from_degrees(4.0, 60.0).is_in_rect(&nw, &se));
        assert!(!Coordinate::from_degrees(10.0, 66.0).is_in_rect(&nw, &se));
        // corners count as inside
        assert!(Coordinate::from_degrees(5.0, 65.0).is_in_rect(&nw, &se));
    }

    #[test]
    fn rounded_grid_has_four_cell_corners() {
        let c = Coordinate::from_encoded(105537, 595731);
        let grid = c.rounded_grid(100);
        assert_eq!(grid.len(), 4);
        // every corner sits on the resolution grid
        for g in &grid {
            assert_eq!(g.lon().subminute() % 100, 0);
            assert_eq!(g.lat().subminute() % 100, 0);
        }
        assert!(c.rounded_grid(5).is_empty());
    }

    #[test]
    fn round_snaps_both_axes() {
        let mut c = Coordinate::from_encoded(105537, 595731);
        c.round(100);
        assert_eq!(c, Coordinate::from_encoded(105500, 595700));

        let mut untouched = Coordinate::from_encoded(105537, 595731);
        untouched.round(5);
        assert_eq!(untouched, Coordinate::from_encoded(105537, 595731));
    }

    #[test]
    fn km_to_encoded_packs_degrees() {
        let equator = Coordinate::from_degrees(0.0, 0.0);
        // 111 km along a meridian is just under one degree
        assert_eq!(equator.km_to_encoded(111, false), 5993);
        // 223 km is 120.41 arc minutes; crosses the degree boundary and repacks
        assert_eq!(equator.km_to_encoded(223, false), 20041);
    }

    #[test]
    fn display_format() {
        let c = Coordinate::from_encoded(104320, 595654);
        assert_eq!(c.lon_string(), "10° 43.2'E");
        assert_eq!(c.lat_string(), "59° 56.54'N");
        assert_eq!(c.to_string(), "10° 43.2'E : 59° 56.54'N");

        let w = Coordinate::from_degrees(-5.5, -33.25);
        assert_eq!(w.lon_string(), "5° 30'W");
        assert_eq!(w.lat_string(), "33° 15'S");
    }
}
