use crate::types::Coordinate;

/// How two bounding boxes relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryRelation {
    /// The boxes overlap with positive area
    Intersecting,
    /// The boxes touch along a horizontal edge
    HorizontalTangent,
    /// The boxes touch along a vertical edge
    VerticalTangent,
    /// The boxes are disjoint
    Passant,
}

/// Axis-aligned bounding box in the scaled-integer angular encoding
///
/// Stored as the lower-left and upper-right corners. Integer encoding keeps
/// the comparisons exact; the tolerance parameters below are therefore in
/// subminute units.
///
/// # Limitations
///
/// Boxes crossing the ±180° meridian are not handled; min/max of the
/// encodings would span nearly the whole globe for such regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    ll_lon: i32,
    ll_lat: i32,
    ur_lon: i32,
    ur_lat: i32,
}

impl BoundingBox {
    /// Create from the lower-left and upper-right corners
    pub fn from_corners(lower_left: Coordinate, upper_right: Coordinate) -> Self {
        Self {
            ll_lon: lower_left.lon_encoded(),
            ll_lat: lower_left.lat_encoded(),
            ur_lon: upper_right.lon_encoded(),
            ur_lat: upper_right.lat_encoded(),
        }
    }

    /// Classify the relation to another box
    pub fn relation(&self, other: &BoundingBox) -> BoundaryRelation {
        if self.ll_lat > other.ur_lat
            || self.ll_lon > other.ur_lon
            || self.ur_lat < other.ll_lat
            || self.ur_lon < other.ll_lon
        {
            return BoundaryRelation::Passant;
        }

        if self.ll_lat == other.ur_lat || self.ur_lat == other.ll_lat {
            return BoundaryRelation::HorizontalTangent;
        }
        if self.ll_lon == other.ur_lon || self.ur_lon == other.ll_lon {
            return BoundaryRelation::VerticalTangent;
        }

        BoundaryRelation::Intersecting
    }

    /// Containment test with a tolerance in subminutes
    ///
    /// A positive tolerance shrinks the box before testing; boundary points
    /// count as inside at zero tolerance.
    pub fn contains(&self, c: &Coordinate, tolerance: i32) -> bool {
        let lon = c.lon_encoded();
        let lat = c.lat_encoded();

        self.ll_lat + tolerance <= lat
            && self.ll_lon + tolerance <= lon
            && self.ur_lat - tolerance >= lat
            && self.ur_lon - tolerance >= lon
    }
}
