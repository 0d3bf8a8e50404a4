//! An implementation of an immutable, ABI-stable K-D Tree of longitude/latitude points.

#![warn(missing_docs)]

mod builder;
pub(crate) mod constants;
mod index;
mod r#trait;
pub mod traversal;

pub use builder::{KDTreeBuilder, DEFAULT_NODE_SIZE};
pub use index::{KDTreeMetadata, KDTreeRef, OwnedKDTree};
pub use r#trait::KDTreeIndex;

#[cfg(test)]
mod test;
