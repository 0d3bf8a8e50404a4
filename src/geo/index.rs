use std::ops::Range;

use crate::kdtree::traversal::Node as KDNode;
use crate::kdtree::{KDTreeIndex, KDTreeRef};
use crate::r#type::IndexableNum;

/// A read-only, tree-structured point index that can be searched geographically.
///
/// Coordinates are longitude (x) and latitude (y) in degrees. Implementations promise that the
/// box reported for a node encloses every point stored at that node and below it, and that the
/// index does not change while a search holds a reference to it. The search trusts these
/// invariants and does no validation of its own.
pub trait GeoIndex {
    /// A cheap handle onto one subtree.
    type Node<'a>: Copy
    where
        Self: 'a;

    /// The number of points in the index.
    fn num_items(&self) -> usize;

    /// The root of the tree, or `None` if the index is empty.
    fn root(&self) -> Option<Self::Node<'_>>;

    /// `(min_lon, min_lat, max_lon, max_lat)` enclosing the whole subtree of `node`.
    fn bbox(&self, node: &Self::Node<'_>) -> (f64, f64, f64, f64);

    /// The child subtrees of `node`; absent children are `None`.
    fn children<'a>(&'a self, node: &Self::Node<'a>) -> [Option<Self::Node<'a>>; 2];

    /// Positions of the points stored directly at `node`, to be resolved with
    /// [`point`][Self::point].
    fn node_points(&self, node: &Self::Node<'_>) -> Range<usize>;

    /// The `(id, lon, lat)` of the point at `pos`.
    fn point(&self, pos: usize) -> (u32, f64, f64);
}

impl<N: IndexableNum> GeoIndex for KDTreeRef<'_, N> {
    type Node<'a>
        = KDNode<'a, N, Self>
    where
        Self: 'a;

    fn num_items(&self) -> usize {
        self.ids.len()
    }

    fn root(&self) -> Option<Self::Node<'_>> {
        KDTreeIndex::root(self)
    }

    fn bbox(&self, node: &Self::Node<'_>) -> (f64, f64, f64, f64) {
        node.bbox()
    }

    fn children<'a>(&'a self, node: &Self::Node<'a>) -> [Option<Self::Node<'a>>; 2] {
        [node.left_child(), node.right_child()]
    }

    fn node_points(&self, node: &Self::Node<'_>) -> Range<usize> {
        node.positions()
    }

    #[inline]
    fn point(&self, pos: usize) -> (u32, f64, f64) {
        (
            self.ids.get(pos),
            self.coords[2 * pos].as_f64(),
            self.coords[2 * pos + 1].as_f64(),
        )
    }
}
