//! Geographic nearest-neighbor search.
//!
//! [`around`] walks any [`GeoIndex`] best-first: a [`NeighborQueue`] holds unexpanded subtrees,
//! keyed by a lower bound on their great-circle distance to the query, next to individual
//! points keyed by their exact distance. Whenever a point reaches the head of the queue no
//! closer point can remain anywhere in the tree, so points come out in ascending distance order
//! and the search stops as soon as it has enough of them.

mod around;
mod index;
mod queue;
pub mod sphere;

pub use around::{around, around_filtered, around_with_queue, AroundQuery};
pub use index::GeoIndex;
pub use queue::{Candidate, NeighborQueue};
pub use sphere::{box_distance, distance, EARTH_RADIUS_KM};
