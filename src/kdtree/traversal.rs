//! Utilities to traverse the KDTree structure.

use std::marker::PhantomData;
use std::ops::Range;

use geo_traits::RectTrait;

use crate::kdtree::KDTreeIndex;
use crate::r#type::{Coord, IndexableNum};

/// A node in the KDTree.
///
/// A node covers the contiguous range `[left, right]` of the kd-sorted arrays. Parent nodes own
/// the point at their middle index and split the rest between two children; leaf nodes own all
/// points in their range. The bounding box of a node is derived from its ancestors' split
/// coordinates, starting from the whole world at the root.
#[derive(Debug)]
pub struct Node<'a, N: IndexableNum, T: KDTreeIndex<N>> {
    /// The tree that this node is a reference onto
    tree: &'a T,

    /// The axis that the children of this node are split over.
    /// 0 for longitude, 1 for latitude
    axis: usize,

    left: usize,
    right: usize,

    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,

    phantom: PhantomData<N>,
}

impl<N: IndexableNum, T: KDTreeIndex<N>> Clone for Node<'_, N, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: IndexableNum, T: KDTreeIndex<N>> Copy for Node<'_, N, T> {}

impl<'a, N: IndexableNum, T: KDTreeIndex<N>> Node<'a, N, T> {
    /// The root node, or `None` for an empty tree.
    pub(crate) fn from_root(tree: &'a T) -> Option<Self> {
        let right = tree.indices().len().checked_sub(1)?;
        Some(Self {
            tree,
            axis: 0,
            left: 0,
            right,
            min_lon: -180.0,
            min_lat: -90.0,
            max_lon: 180.0,
            max_lat: 90.0,
            phantom: PhantomData,
        })
    }

    /// Note: this is the index into the coords array, not the insertion index.
    #[inline]
    pub(crate) fn middle_index(&self) -> usize {
        (self.left + self.right) >> 1
    }

    #[inline]
    fn split_value(&self) -> f64 {
        self.tree.coords()[2 * self.middle_index() + self.axis].as_f64()
    }

    /// The child node representing the "left" half, or `None` for a leaf.
    ///
    /// Note that this **does not include** the middle index of the current node.
    pub fn left_child(&self) -> Option<Self> {
        if self.is_leaf() {
            return None;
        }
        let mut child = Self {
            axis: 1 - self.axis,
            right: self.middle_index() - 1,
            ..*self
        };
        if self.axis == 0 {
            child.max_lon = self.split_value();
        } else {
            child.max_lat = self.split_value();
        }
        Some(child)
    }

    /// The child node representing the "right" half, or `None` for a leaf.
    ///
    /// Note that this **does not include** the middle index of the current node.
    pub fn right_child(&self) -> Option<Self> {
        if self.is_leaf() {
            return None;
        }
        let mut child = Self {
            axis: 1 - self.axis,
            left: self.middle_index() + 1,
            ..*self
        };
        if self.axis == 0 {
            child.min_lon = self.split_value();
        } else {
            child.min_lat = self.split_value();
        }
        Some(child)
    }

    /// Returns `true` if this is a leaf node without children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.right - self.left <= self.tree.node_size() as usize
    }

    /// Returns `true` if this is an intermediate node with children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        !self.is_leaf()
    }

    /// Positions in the kd-sorted arrays of the points owned directly by this node: the whole
    /// range for a leaf, only the middle index for a parent.
    pub fn positions(&self) -> Range<usize> {
        if self.is_leaf() {
            self.left..self.right + 1
        } else {
            let m = self.middle_index();
            m..m + 1
        }
    }

    /// `(min_lon, min_lat, max_lon, max_lat)` enclosing every point below this node.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        (self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }
}

impl<N: IndexableNum, T: KDTreeIndex<N>> RectTrait for Node<'_, N, T> {
    type T = f64;
    type CoordType<'b>
        = Coord<f64>
    where
        Self: 'b;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn min(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.min_lon,
            y: self.min_lat,
        }
    }

    fn max(&self) -> Self::CoordType<'_> {
        Coord {
            x: self.max_lon,
            y: self.max_lat,
        }
    }
}

#[cfg(test)]
mod test {
    use geo_traits::{CoordTrait, RectTrait};

    use crate::kdtree::{KDTreeBuilder, KDTreeIndex};

    #[test]
    fn test_empty_tree_has_no_root() {
        let tree = KDTreeBuilder::<f64>::new(0).finish();
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_node_boxes_enclose_points() {
        let mut builder = KDTreeBuilder::<f64>::new_with_node_size(200, 2);
        for i in 0..200 {
            let lon = -179.0 + (i as f64 * 37.0) % 358.0;
            let lat = -89.0 + (i as f64 * 53.0) % 178.0;
            builder.add(lon, lat).unwrap();
        }
        let tree = builder.finish();
        let coords = tree.coords();

        let root = tree.root().unwrap();
        assert!(root.is_parent());
        assert_eq!(root.min().x(), -180.0);
        assert_eq!(root.max().y(), 90.0);

        let mut stack = vec![root];
        let mut seen = 0;
        while let Some(node) = stack.pop() {
            let (min_lon, min_lat, max_lon, max_lat) = node.bbox();
            for pos in node.positions() {
                let (lon, lat) = (coords[2 * pos], coords[2 * pos + 1]);
                assert!(min_lon <= lon && lon <= max_lon, "lon {lon} outside node box");
                assert!(min_lat <= lat && lat <= max_lat, "lat {lat} outside node box");
                seen += 1;
            }
            assert_eq!(node.is_parent(), node.left_child().is_some());
            assert_eq!(node.is_parent(), node.right_child().is_some());
            assert_eq!(node.is_parent(), node.positions().len() == 1);
            stack.extend(node.left_child());
            stack.extend(node.right_child());
        }
        assert_eq!(seen, 200, "every point is owned by exactly one node");
    }
}
