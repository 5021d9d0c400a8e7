#![doc = include_str!("../README.md")]

pub use crate::error::Error;
pub use crate::region::Region;
pub use crate::types::*;

mod error;
pub mod region;
mod types;
