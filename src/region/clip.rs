//! Clipping a region against an axis-aligned plane

use crate::error::{Error, Result};
use crate::types::{Coordinate, Segment};

use super::Region;

/// Which side of the clip plane to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    /// Keep everything at or above the latitude threshold
    North,
    /// Keep everything at or below the latitude threshold
    South,
    /// Keep everything at or east of the longitude threshold
    East,
    /// Keep everything at or west of the longitude threshold
    West,
}

impl Sector {
    fn is_latitudinal(self) -> bool {
        matches!(self, Sector::North | Sector::South)
    }

    /// Whether a point lies on the kept side of the clip line
    fn keeps(self, clip: &Segment, point: &Coordinate) -> bool {
        match self {
            Sector::North => point.lat_deg() >= clip.start().lat_deg(),
            Sector::South => point.lat_deg() <= clip.start().lat_deg(),
            Sector::East => point.lon_deg() >= clip.start().lon_deg(),
            Sector::West => point.lon_deg() <= clip.start().lon_deg(),
        }
    }
}

impl Region {
    /// Cut the region along an axis-aligned line and keep one side
    ///
    /// The threshold is a latitude (north/south sectors) or longitude
    /// (east/west sectors) in degrees and must fall strictly inside the
    /// bounding box. The clip line must cross the outline exactly twice;
    /// polygons whose outline re-enters across the line are refused.
    ///
    /// With a nonzero `grid_resolution` each crossing point is snapped to
    /// the first corner of its rounding grid that lies inside the region,
    /// in subminutes.
    ///
    /// The result carries this region's name, id, priority and origin,
    /// which means the origin is only valid when it lies on the kept side.
    pub fn subregion(&self, threshold: f64, sector: Sector, grid_resolution: i32) -> Result<Region> {
        let ll = self.lower_left();
        let ur = self.upper_right();

        let (begin, end) = if sector.is_latitudinal() {
            if threshold >= ur.lat_deg() || threshold <= ll.lat_deg() {
                return Err(Error::ClipOutsideBounds(threshold));
            }
            (
                Coordinate::from_degrees(ll.lon_deg(), threshold),
                Coordinate::from_degrees(ur.lon_deg(), threshold),
            )
        } else {
            if threshold >= ur.lon_deg() || threshold <= ll.lon_deg() {
                return Err(Error::ClipOutsideBounds(threshold));
            }
            (
                Coordinate::from_degrees(threshold, ll.lat_deg()),
                Coordinate::from_degrees(threshold, ur.lat_deg()),
            )
        };
        let clip = Segment::new(begin, end);

        let crossings = self.crossing_count(&clip);
        if crossings != 2 {
            return Err(Error::AmbiguousClip(crossings));
        }

        let mut kept = Vec::new();
        for border in self.borders() {
            if sector.keeps(&clip, &border.start()) {
                kept.push(border.start());
            }
            if let Some(mut crossing) = border.intersection_point(&clip) {
                if grid_resolution != 0 {
                    if let Some(snapped) = crossing
                        .rounded_grid(grid_resolution)
                        .into_iter()
                        .find(|g| self.is_inside(*g))
                    {
                        crossing = snapped;
                    }
                }
                kept.push(crossing);
            }
            if sector.keeps(&clip, &border.end()) {
                kept.push(border.end());
            }
        }

        let mut sub = Region::new(self.name(), self.id());
        sub.set_priority(self.priority());
        sub.set_origin(self.origin());
        sub.set_corners(&kept);
        Ok(sub)
    }
}
