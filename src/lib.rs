#![doc = include_str!("../README.md")]

mod error;
pub mod geo;
pub mod indices;
pub mod kdtree;
mod r#type;

pub use error::GeoIndexError;
pub use geo::{around, distance, AroundQuery};
pub use r#type::IndexableNum;

#[cfg(test)]
pub(crate) mod test;
