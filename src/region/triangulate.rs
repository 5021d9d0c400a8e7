//! Ear-clipping triangulation

use crate::types::Coordinate;

use super::Region;

impl Region {
    /// Decompose the polygon into triangles by ear clipping
    ///
    /// The polygon is first turned counter-clockwise. A corner is an ear
    /// when its adjacent edges turn left and no other remaining corner
    /// lies inside the candidate triangle; ears are clipped until three
    /// corners remain. The result is memoized until the next corner
    /// mutation.
    ///
    /// Polygons with fewer than 4 corners yield themselves (triangles) or
    /// nothing. A degenerate ring where a full scan finds no ear stops
    /// with the triangles clipped so far.
    pub fn triangles(&mut self) -> Vec<Region> {
        if let Some(triangulation) = &self.triangulation {
            return triangulation.clone();
        }
        if !self.is_region() {
            return Vec::new();
        }

        self.turn_counter_clockwise();

        if self.is_triangle() {
            let tri = vec![self.clone()];
            self.triangulation = Some(tri.clone());
            return tri;
        }

        let mut remaining = self.corners.clone();
        let mut out = Vec::new();
        let mut curr = 0;
        let mut since_clip = 0;

        loop {
            if remaining.len() == 3 {
                out.push(triangle(&remaining));
                break;
            }

            curr += 1;
            if curr >= remaining.len() {
                curr = 0;
            }
            let prev = if curr == 0 { remaining.len() - 1 } else { curr - 1 };
            let next = if curr + 1 >= remaining.len() { 0 } else { curr + 1 };

            let a = remaining[curr] - remaining[prev];
            let b = remaining[next] - remaining[curr];
            if a.cross(&b) > 0.0 {
                let candidate = [remaining[prev], remaining[curr], remaining[next]];
                let blocked = remaining.iter().enumerate().any(|(i, p)| {
                    i != prev && i != curr && i != next && in_triangle(&candidate, p)
                });
                if !blocked {
                    out.push(triangle(&candidate));
                    remaining.remove(curr);
                    since_clip = 0;
                    continue;
                }
            }

            since_clip += 1;
            if since_clip > remaining.len() {
                // no ear in a full pass, the ring is degenerate
                break;
            }
        }

        self.triangulation = Some(out.clone());
        out
    }
}

fn triangle(corners: &[Coordinate]) -> Region {
    let mut tri = Region::default();
    tri.set_corners(corners);
    tri
}

/// Whether the point lies strictly inside the counter-clockwise triangle
///
/// Points on an edge do not count: collinear vertices (as produced by the
/// region join's stitched outlines) must not block the ears next to them,
/// or the clipping stalls on the degenerate ring.
fn in_triangle(tri: &[Coordinate; 3], point: &Coordinate) -> bool {
    for i in 0..3 {
        let edge = tri[(i + 1) % 3] - tri[i];
        let to_point = *point - tri[i];
        if edge.cross(&to_point) <= 0.0 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(corners: &[(f64, f64)]) -> Region {
        let mut r = Region::new("r", 1);
        let coords: Vec<Coordinate> = corners
            .iter()
            .map(|&(lon, lat)| Coordinate::from_degrees(lon, lat))
            .collect();
        r.set_corners(&coords);
        r.set_origin(r.center());
        r
    }

    #[test]
    fn triangle_is_its_own_triangulation() {
        let mut r = region(&[(8.0, 59.0), (10.0, 59.0), (9.0, 61.0)]);
        let tris = r.triangles();
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0].corners(), r.corners());
    }

    #[test]
    fn square_splits_into_two() {
        let mut r = region(&[(8.0, 59.0), (10.0, 59.0), (10.0, 61.0), (8.0, 61.0)]);
        let tris = r.triangles();
        assert_eq!(tris.len(), 2);
        assert!(tris.iter().all(|t| t.is_triangle()));
    }

    #[test]
    fn convex_polygon_yields_n_minus_two() {
        // regular-ish hexagon
        let mut r = region(&[
            (2.0, 50.0),
            (3.0, 50.5),
            (3.0, 51.5),
            (2.0, 52.0),
            (1.0, 51.5),
            (1.0, 50.5),
        ]);
        assert_eq!(r.triangles().len(), 4);
    }

    #[test]
    fn concave_polygon_respects_the_notch() {
        // L-shape: the notch corner (2, 52) must not be swallowed
        let mut r = region(&[
            (0.0, 50.0),
            (4.0, 50.0),
            (4.0, 52.0),
            (2.0, 52.0),
            (2.0, 54.0),
            (0.0, 54.0),
        ]);
        let mut tris = r.triangles();
        assert_eq!(tris.len(), 4);

        // pieces cover the region: their areas sum to the whole
        let total: f64 = tris.iter_mut().map(|t| t.area()).sum();
        let area = r.area();
        assert!((total - area).abs() < 1e-6, "{total} vs {area}");
    }

    #[test]
    fn clockwise_input_is_reoriented_first() {
        let mut r = region(&[(8.0, 61.0), (10.0, 61.0), (10.0, 59.0), (8.0, 59.0)]);
        assert!(!r.is_counter_clockwise());
        assert_eq!(r.triangles().len(), 2);
        assert!(r.is_counter_clockwise());
    }

    #[test]
    fn triangulation_is_memoized() {
        let mut r = region(&[(8.0, 59.0), (10.0, 59.0), (10.0, 61.0), (8.0, 61.0)]);
        let first = r.triangles();
        let second = r.triangles();
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.corners(), b.corners());
        }
    }
}
