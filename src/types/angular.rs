use std::ops::Neg;

/// Number of subminute units in one degree (one subminute = 1/100 minute)
pub const SUBMINUTES_PER_DEGREE: i32 = 6000;

/// Smallest rounding resolution, in subminutes
///
/// Resolutions below this are rejected by [`Angular::rounded`] because the
/// result would not land on a representable grid.
pub const MIN_ROUND_RESOLUTION: i32 = 10;

/// One angular axis value (longitude or latitude component) in fixed point
///
/// Stores `degree + subminute / 6000` degrees. The subminute is always
/// normalized into `[0, 6000)` by carrying overflow and underflow into the
/// degree, so every value has exactly one representation. Because of that
/// the derived field-wise equality, hashing and ordering agree with the
/// floating-degree projection.
///
/// The scaled-integer encoding used by [`Angular::from_encoded`] and
/// [`Angular::encoded`] packs the value as `degree * 10000 + subminute`
/// with both parts sharing the sign of the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Angular {
    degree: i32,
    subminute: i32,
}

impl Angular {
    /// Build from raw parts, carrying the subminute into `[0, 6000)`
    ///
    /// Floor-division semantics: a negative subminute borrows from the
    /// degree instead of truncating toward zero.
    pub(crate) fn from_parts(degree: i32, subminute: i32) -> Self {
        let carry = subminute.div_euclid(SUBMINUTES_PER_DEGREE);
        Self {
            degree: degree + carry,
            subminute: subminute.rem_euclid(SUBMINUTES_PER_DEGREE),
        }
    }

    /// Build from the scaled-integer encoding `degree * 10000 + subminute`
    ///
    /// The degree part is reduced with a sign-preserving `% 360`.
    pub fn from_encoded(value: i32) -> Self {
        let degree = value / 10000;
        let subminute = value - degree * 10000;
        Self::from_parts(degree % 360, subminute)
    }

    /// Build from floating degrees
    ///
    /// The fractional part is truncated to whole subminutes; the degree part
    /// is reduced with a sign-preserving `% 360`.
    pub fn from_degrees(degrees: f64) -> Self {
        let whole = degrees.floor();
        let subminute = ((degrees - whole) * SUBMINUTES_PER_DEGREE as f64) as i32;
        Self::from_parts((whole as i32) % 360, subminute)
    }

    /// Degree part (may be negative)
    pub fn degree(&self) -> i32 {
        self.degree
    }

    /// Subminute part, always in `[0, 6000)`
    pub fn subminute(&self) -> i32 {
        self.subminute
    }

    /// Value in floating degrees
    pub fn degrees(&self) -> f64 {
        self.degree as f64 + self.subminute as f64 / SUBMINUTES_PER_DEGREE as f64
    }

    /// Value in radians
    pub fn radians(&self) -> f64 {
        self.degrees().to_radians()
    }

    /// Scaled-integer encoding, the exact inverse of [`Angular::from_encoded`]
    ///
    /// Both fields of the encoding share the sign of the value, matching the
    /// truncating decode. Emitting the normalized (mixed-sign) representation
    /// directly would shift negative fractional values by up to a degree
    /// after a decode round trip.
    pub fn encoded(&self) -> i32 {
        let total = self.degree * SUBMINUTES_PER_DEGREE + self.subminute;
        (total / SUBMINUTES_PER_DEGREE) * 10000 + total % SUBMINUTES_PER_DEGREE
    }

    /// Add a subminute delta, carrying into the degree
    pub fn add_subminutes(&mut self, delta: i32) {
        *self = Self::from_parts(self.degree, self.subminute + delta);
    }

    /// Round the subminute part to a multiple of `resolution` subminutes
    ///
    /// Returns `None` if `resolution` is below [`MIN_ROUND_RESOLUTION`].
    /// Resolutions above one degree collapse to whole-degree rounding.
    ///
    /// `prefer_up` selects which neighbor of the rounding cell is produced:
    /// the value rounds up exactly when `(fraction > 0.5) == prefer_up`.
    /// Calling with `true` and `false` therefore yields the two grid
    /// neighbors surrounding the value, which is how
    /// [`Coordinate::rounded_grid`](crate::Coordinate::rounded_grid) builds
    /// a rounding cell.
    pub fn rounded(self, resolution: i32, prefer_up: bool) -> Option<Self> {
        if resolution < MIN_ROUND_RESOLUTION {
            return None;
        }

        if resolution > SUBMINUTES_PER_DEGREE {
            let up = (self.subminute > SUBMINUTES_PER_DEGREE / 2) == prefer_up;
            return Some(Self {
                degree: self.degree + if up { 1 } else { 0 },
                subminute: 0,
            });
        }

        let mut front = self.subminute / resolution;
        let tail = self.subminute % resolution;
        if (tail as f64 / resolution as f64 > 0.5) == prefer_up {
            front += 1;
        }
        Some(Self::from_parts(self.degree, front * resolution))
    }
}

impl Neg for Angular {
    type Output = Angular;

    fn neg(self) -> Angular {
        Angular::from_parts(-self.degree, -self.subminute)
    }
}
