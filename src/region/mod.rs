//! Polygon regions and their algorithms
//!
//! A [`Region`] is an ordered, duplicate-free sequence of corners forming a
//! simple polygon, together with derived borders, bounding box and centroid
//! that are rebuilt on every corner mutation. The heavier results
//! (triangulation, area) are memoized until the next mutation.

use std::collections::HashSet;
use std::fmt;

use crate::types::{BoundaryRelation, BoundingBox, Coordinate, Segment};

mod clip;
mod join;
mod triangulate;

pub use clip::Sector;

/// Maximum distance between two bounding-box corners for regions that can
/// still be considered identical, in km
pub const BBOX_MATCH_KM: i32 = 50;

/// Initial sampling grid density for the similarity tests
pub const SIMILARITY_GRID_START: i32 = 8;

/// Grid density increment while hunting for enough interior samples
pub const SIMILARITY_GRID_STEP: i32 = 3;

/// Minimum number of interior sample points for a similarity verdict
pub const SIMILARITY_MIN_SAMPLES: usize = 20;

/// Hard cap on the sampling grid density
///
/// A region so thin that even this grid finds too few interior points is
/// judged with whatever samples there are instead of refining forever.
pub const SIMILARITY_GRID_CAP: i32 = 64;

/// Sampling grid density for the region-containment test
pub const CONTAINS_GRID: i32 = 15;

/// Default similarity threshold for [`Region::is_identical`], in percent
pub const DEFAULT_IDENTICAL_THRESHOLD_PCT: f64 = 95.0;

/// Default threshold for [`Region::contains_region`], in percent
pub const DEFAULT_CONTAINS_THRESHOLD_PCT: f64 = 85.0;

/// A named polygon of angular coordinates
///
/// Corners are ordered and duplicate-free; `borders[i]` connects
/// `corners[i]` to `corners[i + 1 mod n]` as a closed ring. The interior
/// reference point (`origin`) drives the crossing-parity containment test
/// and must be set by the caller to a point truly inside the polygon; it
/// is not validated and does not default to the centroid.
#[derive(Debug, Clone, Default)]
pub struct Region {
    corners: Vec<Coordinate>,
    corner_set: HashSet<Coordinate>,
    borders: Vec<Segment>,
    name: String,
    id: i32,
    priority: i32,
    origin: Coordinate,
    lower_left: Coordinate,
    upper_right: Coordinate,
    center: Coordinate,
    area: Option<f64>,
    triangulation: Option<Vec<Region>>,
}

impl Region {
    /// An empty region with a name and id but no corners yet
    pub fn new(name: impl Into<String>, id: i32) -> Self {
        Self {
            name: name.into(),
            id,
            ..Self::default()
        }
    }

    /// Drop all corners, the name and the id; priority and origin stay
    pub fn clear(&mut self) {
        self.corners.clear();
        self.corner_set.clear();
        self.borders.clear();
        self.name.clear();
        self.id = 0;
        self.area = None;
        self.triangulation = None;
        self.lower_left = Coordinate::default();
        self.upper_right = Coordinate::default();
        self.center = Coordinate::default();
    }

    /// Replace all corners; duplicates are silently dropped
    pub fn set_corners(&mut self, corners: &[Coordinate]) {
        self.corners.clear();
        self.corner_set.clear();
        for &c in corners {
            if self.corner_set.insert(c) {
                self.corners.push(c);
            }
        }
        self.rebuild();
    }

    /// Append one corner; silently ignored if already present
    ///
    /// Rebuilds every derived field. When constructing a whole polygon,
    /// collect the corners and call [`Region::set_corners`] once instead.
    pub fn add_corner(&mut self, c: Coordinate) {
        if !self.corner_set.insert(c) {
            return;
        }
        self.corners.push(c);
        self.rebuild();
    }

    pub fn corners(&self) -> &[Coordinate] {
        &self.corners
    }

    pub fn borders(&self) -> &[Segment] {
        &self.borders
    }

    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// At least 3 corners
    pub fn is_region(&self) -> bool {
        self.corners.len() > 2
    }

    /// Exactly 3 corners
    pub fn is_triangle(&self) -> bool {
        self.corners.len() == 3
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// The interior reference point for the containment test
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Coordinate) {
        self.origin = origin;
    }

    /// Arithmetic mean of the corners in degree space
    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn lower_left(&self) -> Coordinate {
        self.lower_left
    }

    pub fn upper_right(&self) -> Coordinate {
        self.upper_right
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_corners(self.lower_left, self.upper_right)
    }

    /// Bounding box widened by `margin_deg` degrees on every side
    pub fn fuzzy_bounding_box(&self, margin_deg: f64) -> BoundingBox {
        let margin = Coordinate::from_degrees(margin_deg, margin_deg);
        BoundingBox::from_corners(self.lower_left - margin, self.upper_right + margin)
    }

    /// Recompute every derived field from the corner list
    fn rebuild(&mut self) {
        self.area = None;
        self.triangulation = None;
        self.borders.clear();

        if self.corners.len() >= 3 {
            let mut ring = self.corners.clone();
            if ring.first() != ring.last() {
                ring.push(self.corners[0]);
            }
            for pair in ring.windows(2) {
                self.borders.push(Segment::new(pair[0], pair[1]));
            }
        }

        if self.corners.is_empty() {
            self.lower_left = Coordinate::default();
            self.upper_right = Coordinate::default();
            self.center = Coordinate::default();
            return;
        }

        let mut ll_lon = i32::MAX;
        let mut ll_lat = i32::MAX;
        let mut ur_lon = i32::MIN;
        let mut ur_lat = i32::MIN;
        let mut sum_lon = 0.0;
        let mut sum_lat = 0.0;

        for c in &self.corners {
            ll_lon = ll_lon.min(c.lon_encoded());
            ll_lat = ll_lat.min(c.lat_encoded());
            ur_lon = ur_lon.max(c.lon_encoded());
            ur_lat = ur_lat.max(c.lat_encoded());
            sum_lon += c.lon_deg();
            sum_lat += c.lat_deg();
        }

        let n = self.corners.len() as f64;
        self.lower_left = Coordinate::from_encoded(ll_lon, ll_lat);
        self.upper_right = Coordinate::from_encoded(ur_lon, ur_lat);
        self.center = Coordinate::from_degrees(sum_lon / n, sum_lat / n);
    }

    /// Crossing-parity containment test
    ///
    /// Casts a segment from the origin to the query point and counts border
    /// crossings. With the origin inside the polygon, an even count means
    /// the query point is inside too. Only correct when the origin truly
    /// lies inside; that is a caller obligation and is not validated.
    pub fn is_inside(&self, point: Coordinate) -> bool {
        let probe = Segment::new(self.origin, point);
        self.crossing_count(&probe) % 2 == 0
    }

    /// Number of borders the target segment crosses
    pub fn crossing_count(&self, target: &Segment) -> usize {
        self.borders.iter().filter(|b| b.intersects(target)).count()
    }

    /// Whether consecutive edge cross products never flip sign
    pub fn is_convex(&self) -> bool {
        let n = self.corners.len();
        if n < 3 {
            return false;
        }
        if n == 3 {
            return true;
        }

        let mut a = self.corners[1] - self.corners[0];
        let mut b = self.corners[2] - self.corners[1];
        let first = a.cross(&b);

        for i in 3..n {
            a = b;
            b = self.corners[i] - self.corners[i - 1];
            if first * a.cross(&b) < 0.0 {
                return false;
            }
        }
        true
    }

    /// Polygon orientation
    ///
    /// Convex: the sign of the first nonzero cross product of consecutive
    /// edges. Concave: the sign of the shoelace signed area, closing the
    /// ring implicitly. Fewer than 3 corners count as counter-clockwise.
    pub fn is_counter_clockwise(&self) -> bool {
        let n = self.corners.len();
        if n < 3 {
            return true;
        }

        if self.is_convex() {
            let mut cross = 0.0;
            for i in 1..n - 1 {
                let a = self.corners[i] - self.corners[i - 1];
                let b = self.corners[i + 1] - self.corners[i];
                cross = a.cross(&b);
                if cross != 0.0 {
                    break;
                }
            }
            return cross > 0.0;
        }

        // a concave polygon is counter-clockwise iff the signed area is
        // positive
        let mut area2 = 0.0;
        for i in 0..n - 1 {
            area2 += self.corners[i].lon_deg() * self.corners[i + 1].lat_deg()
                - self.corners[i].lat_deg() * self.corners[i + 1].lon_deg();
        }
        if self.corners[n - 1] != self.corners[0] {
            area2 += self.corners[n - 1].lon_deg() * self.corners[0].lat_deg()
                - self.corners[n - 1].lat_deg() * self.corners[0].lon_deg();
        }
        area2 / 2.0 > 0.0
    }

    /// Reverse the corner order if the polygon is clockwise
    pub fn turn_counter_clockwise(&mut self) {
        if self.is_counter_clockwise() {
            return;
        }
        self.corners.reverse();
        self.rebuild();
    }

    /// Surface area in km², memoized until the next corner mutation
    ///
    /// Triangles use Heron's formula on the pairwise great-circle
    /// distances; larger polygons sum the areas of their ear-clipping
    /// triangulation. Fewer than 3 corners yield 0.
    pub fn area(&mut self) -> f64 {
        if !self.is_region() {
            return 0.0;
        }
        if let Some(area) = self.area {
            return area;
        }

        let area = if self.is_triangle() {
            let a = self.corners[0].distance_to(&self.corners[1]) / 1000.0;
            let b = self.corners[1].distance_to(&self.corners[2]) / 1000.0;
            let c = self.corners[2].distance_to(&self.corners[0]) / 1000.0;
            let s = (a + b + c) / 2.0;
            let squared = s * (s - a) * (s - b) * (s - c);
            if squared > 0.0 { squared.sqrt() } else { 0.0 }
        } else {
            self.triangles().iter_mut().map(|t| t.area()).sum()
        };

        self.area = Some(area);
        area
    }

    /// Interior lattice over the bounding box
    ///
    /// Subdivides the box into `cells × cells` and returns the
    /// `(cells−1)²` inner lattice points, optionally filtered to those
    /// inside the polygon (which requires a valid origin).
    pub fn boundary_grid(&self, cells: i32, interior_only: bool) -> Vec<Coordinate> {
        let incr = (self.upper_right - self.lower_left) / cells as f64;
        let lon_add = incr.lon_deg();
        let lat_add = incr.lat_deg();

        let mut grid = Vec::new();
        for i in 1..cells {
            for j in 1..cells {
                let point = self.lower_left
                    + Coordinate::from_degrees(lon_add * i as f64, lat_add * j as f64);
                if interior_only && !self.is_inside(point) {
                    continue;
                }
                grid.push(point);
            }
        }
        grid
    }

    /// Whether the corner sets are equal, ignoring order
    fn corner_set_equals(&self, corners: &[Coordinate]) -> bool {
        if corners.len() != self.corners.len() {
            return false;
        }
        let set: HashSet<Coordinate> = corners.iter().copied().collect();
        if set.len() != self.corners.len() {
            return false;
        }
        self.corners.iter().all(|c| set.contains(c))
    }

    /// Interior samples at the given density, refined until there are
    /// enough of them (or the density cap is hit)
    fn sampling_grid(&self, mut cells: i32) -> (Vec<Coordinate>, i32) {
        let mut grid = self.boundary_grid(cells, true);
        while grid.len() < SIMILARITY_MIN_SAMPLES && cells < SIMILARITY_GRID_CAP {
            cells += SIMILARITY_GRID_STEP;
            grid = self.boundary_grid(cells, true);
        }
        (grid, cells)
    }

    fn grid_match_pct(grid: &[Coordinate], target: &Region) -> f64 {
        if grid.is_empty() {
            return 0.0;
        }
        let matched = grid.iter().filter(|p| target.is_inside(**p)).count();
        matched as f64 / grid.len() as f64 * 100.0
    }

    /// Statistical similarity test
    ///
    /// Exact corner-set equality is the cheap path. Otherwise both
    /// bounding boxes' opposite corners must be within [`BBOX_MATCH_KM`],
    /// and at least `threshold_pct` percent of each polygon's interior
    /// sample grid must fall inside the other, checked in both directions.
    ///
    /// Both regions need valid origins for the interior sampling.
    pub fn is_identical(&self, other: &Region, threshold_pct: f64) -> bool {
        if !self.is_region() || !other.is_region() {
            return false;
        }
        if self.corner_set_equals(other.corners()) {
            return true;
        }

        if self.upper_right.distance(&other.upper_right()) > BBOX_MATCH_KM {
            return false;
        }
        if self.lower_left.distance(&other.lower_left()) > BBOX_MATCH_KM {
            return false;
        }

        let (grid, cells) = self.sampling_grid(SIMILARITY_GRID_START);
        if Self::grid_match_pct(&grid, other) < threshold_pct {
            return false;
        }

        // vice versa, continuing at the density the first pass settled on
        let (grid, _) = other.sampling_grid(cells);
        Self::grid_match_pct(&grid, self) >= threshold_pct
    }

    /// Whether `other` lies (mostly) inside this region
    ///
    /// Disjoint bounding boxes reject immediately; all corners inside is
    /// an immediate accept. Otherwise at least `threshold_pct` percent of
    /// `other`'s interior sample grid must fall inside this region.
    pub fn contains_region(&self, other: &Region, threshold_pct: f64) -> bool {
        if other.bounding_box().relation(&self.bounding_box()) == BoundaryRelation::Passant {
            return false;
        }

        if other.corners.iter().all(|c| self.is_inside(*c)) {
            return true;
        }

        let grid = other.boundary_grid(CONTAINS_GRID, true);
        Self::grid_match_pct(&grid, self) >= threshold_pct
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REGION:\t{}", self.name)?;
        for c in &self.corners {
            writeln!(f, "{c}")?;
        }
        Ok(())
    }
}
