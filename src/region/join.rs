//! Stitching two overlapping regions into one

use std::collections::{HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::types::{BoundaryRelation, BoundingBox, Coordinate};

use super::Region;

/// Margin around the second polygon's bounding box when hunting for
/// stitch points, in degrees
pub const FUZZY_MARGIN_DEG: f64 = 0.2;

impl Region {
    /// Replace this region's corners with the union outline of two
    /// overlapping regions
    ///
    /// Walks the first polygon from a corner outside the second, collects
    /// corners until one comes within `tolerance_km` of a corner of the
    /// second polygon, then walks backwards from the start to a second,
    /// distinct stitch point, and splices the second polygon's corners in
    /// between. Both inputs are reoriented counter-clockwise before the
    /// walk, and the result is deduplicated and counter-clockwise with
    /// the first region's origin.
    ///
    /// On any error this region is left unmodified. The name, id and
    /// priority are kept.
    pub fn join(&mut self, lhs: &Region, rhs: &Region, tolerance_km: i32) -> Result<()> {
        let lhs_box = lhs.bounding_box();
        let rhs_box = rhs.bounding_box();
        if lhs_box.relation(&rhs_box) == BoundaryRelation::Passant {
            return Err(Error::DisjointRegions);
        }

        let mut first = lhs.clone();
        let mut second = rhs.clone();
        first.turn_counter_clockwise();
        second.turn_counter_clockwise();

        // start the walk at a corner of `first` outside the other's box,
        // swapping roles when `first` has none
        let mut start = first
            .corners()
            .iter()
            .position(|c| !rhs_box.contains(c, 0));
        if start.is_none() {
            std::mem::swap(&mut first, &mut second);
            start = first
                .corners()
                .iter()
                .position(|c| !lhs_box.contains(c, 0));
        }
        let Some(start) = start else {
            return Err(Error::IndistinguishableRegions);
        };

        let fuzzy = second.fuzzy_bounding_box(FUZZY_MARGIN_DEG);
        let first_corners = first.corners();
        let second_corners = second.corners();

        let mut outline: VecDeque<Coordinate> = VecDeque::new();

        // forward walk to the first stitch point
        let mut stitch = None;
        for f in start..first_corners.len() {
            outline.push_back(first_corners[f]);
            if let Some(s) = stitch_point(&first_corners[f], second_corners, &fuzzy, tolerance_km)
            {
                stitch = Some((s, first_corners[f]));
                break;
            }
        }
        let Some((entry, on_first)) = stitch else {
            return Err(Error::MissingCrossing { tolerance_km });
        };
        let on_second = second_corners[entry];

        // backward walk to a second stitch point, distinct from the first
        let distinct = |f: &Coordinate, s: &Coordinate| -> bool {
            !on_second.is_closer_than(s, tolerance_km) && !on_first.is_closer_than(f, tolerance_km)
        };
        let mut exit = walk_back(
            &mut outline,
            first_corners,
            (0..start).rev(),
            second_corners,
            &fuzzy,
            tolerance_km,
            &distinct,
        );
        if exit.is_none() {
            // wrap around and rescan the whole polygon
            exit = walk_back(
                &mut outline,
                first_corners,
                (0..first_corners.len()).rev(),
                second_corners,
                &fuzzy,
                tolerance_km,
                &distinct,
            );
        }
        let Some(exit) = exit else {
            return Err(Error::MissingCrossing { tolerance_km });
        };

        // splice the second polygon's corners between the stitch points
        let mut closed = false;
        for s in entry..second_corners.len() {
            outline.push_back(second_corners[s]);
            if s == exit {
                closed = true;
                break;
            }
        }
        if !closed {
            for s in 0..=exit {
                outline.push_back(second_corners[s]);
            }
        }

        let mut seen = HashSet::new();
        let corners: Vec<Coordinate> = outline.into_iter().filter(|c| seen.insert(*c)).collect();
        if corners.len() < 4 {
            return Err(Error::DegenerateJoin(corners.len()));
        }

        self.set_corners(&corners);
        self.set_origin(lhs.origin());
        self.turn_counter_clockwise();
        Ok(())
    }
}

/// Index of the first corner of `candidates` within `tolerance_km` of the
/// point, provided the point is inside the fuzzy box at all
fn stitch_point(
    point: &Coordinate,
    candidates: &[Coordinate],
    fuzzy: &BoundingBox,
    tolerance_km: i32,
) -> Option<usize> {
    if !fuzzy.contains(point, 0) {
        return None;
    }
    candidates
        .iter()
        .position(|c| point.is_closer_than(c, tolerance_km))
}

/// Walk `corners` backwards over `range`, prepending each to the
/// outline, until a corner pairs with one of `candidates` that the
/// `distinct` predicate accepts
fn walk_back(
    outline: &mut VecDeque<Coordinate>,
    corners: &[Coordinate],
    range: impl Iterator<Item = usize>,
    candidates: &[Coordinate],
    fuzzy: &BoundingBox,
    tolerance_km: i32,
    distinct: &impl Fn(&Coordinate, &Coordinate) -> bool,
) -> Option<usize> {
    for f in range {
        outline.push_front(corners[f]);
        if !fuzzy.contains(&corners[f], 0) {
            continue;
        }
        for (s, candidate) in candidates.iter().enumerate() {
            if corners[f].is_closer_than(candidate, tolerance_km)
                && distinct(&corners[f], candidate)
            {
                return Some(s);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, lon: f64, lat: f64, size: f64) -> Region {
        let mut r = Region::new(name, 1);
        r.set_corners(&[
            Coordinate::from_degrees(lon, lat),
            Coordinate::from_degrees(lon + size, lat),
            Coordinate::from_degrees(lon + size, lat + size),
            Coordinate::from_degrees(lon, lat + size),
        ]);
        r.set_origin(r.center());
        r
    }

    #[test]
    fn overlapping_squares_join() {
        let a = square("a", 8.0, 59.0, 2.0);
        let b = square("b", 9.0, 59.0, 2.0);

        let mut joined = Region::new("joined", 9);
        assert!(joined.join(&a, &b, 80).is_ok());

        assert!(joined.is_region());
        assert!(joined.is_counter_clockwise());
        assert_eq!(joined.name(), "joined");
        assert_eq!(joined.origin(), a.origin());

        // the union spans both boxes
        assert_eq!(joined.lower_left(), Coordinate::from_degrees(8.0, 59.0));
        assert_eq!(joined.upper_right(), Coordinate::from_degrees(11.0, 61.0));
    }

    #[test]
    fn disjoint_regions_refuse_to_join() {
        let a = square("a", 8.0, 59.0, 2.0);
        let b = square("b", 30.0, 40.0, 2.0);

        let mut joined = square("untouched", 0.0, 0.0, 1.0);
        let before = joined.corners().to_vec();
        assert!(matches!(
            joined.join(&a, &b, 80),
            Err(Error::DisjointRegions)
        ));
        // failure leaves the target unchanged
        assert_eq!(joined.corners(), before.as_slice());
    }

    #[test]
    fn coincident_regions_are_indistinguishable() {
        let a = square("a", 8.0, 59.0, 2.0);
        let b = square("b", 8.0, 59.0, 2.0);

        let mut joined = Region::new("joined", 9);
        assert!(matches!(
            joined.join(&a, &b, 80),
            Err(Error::IndistinguishableRegions)
        ));
    }

    #[test]
    fn zero_tolerance_needs_shared_corners() {
        let a = square("a", 8.0, 59.0, 2.0);
        let b = square("b", 9.0, 59.5, 2.0);

        let mut joined = Region::new("joined", 9);
        assert!(matches!(
            joined.join(&a, &b, 0),
            Err(Error::MissingCrossing { tolerance_km: 0 })
        ));
    }

    #[test]
    fn shared_edge_squares_join_exactly() {
        // b shares a's eastern corners, reachable even at tolerance 0
        let a = square("a", 8.0, 59.0, 2.0);
        let b = square("b", 10.0, 59.0, 2.0);

        let mut joined = Region::new("joined", 9);
        assert!(joined.join(&a, &b, 0).is_ok());
        assert_eq!(joined.lower_left(), Coordinate::from_degrees(8.0, 59.0));
        assert_eq!(joined.upper_right(), Coordinate::from_degrees(12.0, 61.0));
    }
}
