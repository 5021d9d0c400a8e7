mod angular;
mod bounding_box;
mod coordinate;
mod geo_point;
mod segment;

pub use angular::*;
pub use bounding_box::*;
pub use coordinate::*;
pub use geo_point::*;
pub use segment::*;
