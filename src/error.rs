use std::num::ParseIntError;

/// Failures reported by the fallible geometry operations
///
/// Rounding failures are not errors: a too-fine resolution is an expected
/// outcome and is signalled by `Option::None` (or an empty grid) instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("coordinate encoding needs 4 colon-separated fields: {0:?}")]
    InvalidEncoding(String),

    #[error("invalid integer in coordinate encoding: {0}")]
    InvalidNumber(#[from] ParseIntError),

    #[error("regions have disjoint bounding boxes")]
    DisjointRegions,

    #[error("bounding boxes too close to pick a starting corner")]
    IndistinguishableRegions,

    #[error("no boundary crossing found within {tolerance_km} km")]
    MissingCrossing { tolerance_km: i32 },

    #[error("join would produce a degenerate polygon ({0} corners)")]
    DegenerateJoin(usize),

    #[error("clip line at {0}° lies outside the bounding box")]
    ClipOutsideBounds(f64),

    #[error("clip line crosses the boundary {0} times, expected 2")]
    AmbiguousClip(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
