use crate::types::Coordinate;

/// Tolerance for the segment range checks, in degrees on each axis
pub const RANGE_EPSILON_DEG: f64 = 0.0001;

/// An ordered pair of coordinates with precomputed line parameters
///
/// The slope and intercept are computed once from the floating degree
/// projections of the endpoints. They are meaningless when the segment is
/// vertical (identical integer-encoded longitudes) or horizontal (identical
/// integer-encoded latitudes); the intersection logic special-cases those
/// instead of dividing by zero.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    start: Coordinate,
    end: Coordinate,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    slope: f64,
    intercept: f64,
    vertical: bool,
    horizontal: bool,
}

impl Segment {
    pub fn new(start: Coordinate, end: Coordinate) -> Self {
        let (x1, y1) = (start.lon_deg(), start.lat_deg());
        let (x2, y2) = (end.lon_deg(), end.lat_deg());
        let slope = (y2 - y1) / (x2 - x1);
        Self {
            start,
            end,
            x1,
            y1,
            x2,
            y2,
            slope,
            intercept: y2 - slope * x2,
            vertical: start.lon_encoded() == end.lon_encoded(),
            horizontal: start.lat_encoded() == end.lat_encoded(),
        }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    /// Arithmetic midpoint of the endpoints in degree space
    ///
    /// Bypasses spherical interpolation; good enough for the short edges
    /// the polygon algorithms work with.
    pub fn midpoint(&self) -> Coordinate {
        Coordinate::from_degrees((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// True when `a` lies outside the interval spanned by `x1` and `x2`,
    /// with [`RANGE_EPSILON_DEG`] slack on both ends
    fn out_of_range(a: f64, x1: f64, x2: f64) -> bool {
        if a - x1 > RANGE_EPSILON_DEG && a - x2 > RANGE_EPSILON_DEG {
            return true;
        }
        if x1 - a > RANGE_EPSILON_DEG && x2 - a > RANGE_EPSILON_DEG {
            return true;
        }
        false
    }

    /// Solve the two line equations, special-casing vertical and horizontal
    ///
    /// `None` when both are vertical, both horizontal, or the slopes are
    /// equal (parallel or coincident lines have no single crossing point).
    fn solve(&self, other: &Segment) -> Option<(f64, f64)> {
        if other.vertical && self.vertical {
            return None;
        }
        if other.horizontal && self.horizontal {
            return None;
        }
        if other.slope == self.slope {
            return None;
        }

        let (x, y) = if other.vertical {
            let x = other.x1;
            (x, self.slope * x + self.intercept)
        } else if self.vertical {
            let x = self.x1;
            (x, other.slope * x + other.intercept)
        } else if self.horizontal {
            let y = self.y1;
            ((y - other.intercept) / other.slope, y)
        } else if other.horizontal {
            let y = other.y1;
            ((y - self.intercept) / self.slope, y)
        } else {
            let y = (self.slope * other.intercept - other.slope * self.intercept)
                / (self.slope - other.slope);
            let x = (other.intercept - self.intercept) / (self.slope - other.slope);
            (x, y)
        };
        self.in_both_ranges(other, x, y).then_some((x, y))
    }

    fn in_both_ranges(&self, other: &Segment, x: f64, y: f64) -> bool {
        !Self::out_of_range(x, self.x1, self.x2)
            && !Self::out_of_range(x, other.x1, other.x2)
            && !Self::out_of_range(y, self.y1, self.y2)
            && !Self::out_of_range(y, other.y1, other.y2)
    }

    /// Whether the two segments cross within their bounding intervals
    ///
    /// Coincident vertical (or horizontal) segments count as crossing; this
    /// is what the crossing-parity containment test expects.
    pub fn intersects(&self, other: &Segment) -> bool {
        if other.vertical && self.vertical {
            return self.x1 == other.x1;
        }
        if other.horizontal && self.horizontal {
            return self.y1 == other.y1;
        }
        self.solve(other).is_some()
    }

    /// The crossing point, if there is exactly one within both segments
    ///
    /// Unlike [`Segment::intersects`] the coincident cases yield `None`:
    /// there is no single point to return.
    pub fn intersection_point(&self, other: &Segment) -> Option<Coordinate> {
        self.solve(other)
            .map(|(x, y)| Coordinate::from_degrees(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_none, assert_some};

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(
            Coordinate::from_degrees(x1, y1),
            Coordinate::from_degrees(x2, y2),
        )
    }

    #[test]
    fn flags() {
        assert!(seg(10.0, 50.0, 10.0, 60.0).vertical);
        assert!(seg(10.0, 50.0, 20.0, 50.0).horizontal);
        let diag = seg(10.0, 50.0, 20.0, 60.0);
        assert!(!diag.vertical);
        assert!(!diag.horizontal);
    }

    #[test]
    fn crossing_diagonals() {
        let a = seg(0.0, 0.0, 10.0, 10.0);
        let b = seg(0.0, 10.0, 10.0, 0.0);
        assert!(a.intersects(&b));
        let p = assert_some!(a.intersection_point(&b));
        assert!((p.lon_deg() - 5.0).abs() < 1e-6);
        assert!((p.lat_deg() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn parallel_segments_do_not_cross() {
        let a = seg(0.0, 0.0, 10.0, 10.0);
        let b = seg(0.0, 1.0, 10.0, 11.0);
        assert!(!a.intersects(&b));
        assert_none!(a.intersection_point(&b));
    }

    #[test]
    fn vertical_against_diagonal() {
        let v = seg(5.0, 0.0, 5.0, 10.0);
        let d = seg(0.0, 0.0, 10.0, 10.0);
        assert!(v.intersects(&d));
        let p = assert_some!(v.intersection_point(&d));
        assert!((p.lon_deg() - 5.0).abs() < 1e-6);
        assert!((p.lat_deg() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn horizontal_against_diagonal() {
        let h = seg(0.0, 5.0, 10.0, 5.0);
        let d = seg(0.0, 0.0, 10.0, 10.0);
        assert!(h.intersects(&d));
        let p = assert_some!(h.intersection_point(&d));
        assert!((p.lon_deg() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn crossing_outside_the_segments() {
        // lines cross at (5,5) but the second segment stops before it
        let a = seg(0.0, 0.0, 10.0, 10.0);
        let b = seg(0.0, 10.0, 4.0, 6.0);
        assert!(!a.intersects(&b));
        assert_none!(a.intersection_point(&b));
    }

    #[test]
    fn coincident_verticals_cross_but_have_no_point() {
        let a = seg(5.0, 0.0, 5.0, 10.0);
        let b = seg(5.0, 2.0, 5.0, 12.0);
        assert!(a.intersects(&b));
        assert_none!(a.intersection_point(&b));

        let apart = seg(6.0, 0.0, 6.0, 10.0);
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn midpoint_is_degree_mean() {
        let m = seg(0.0, 50.0, 10.0, 60.0).midpoint();
        assert_eq!(m, Coordinate::from_degrees(5.0, 55.0));
    }
}
