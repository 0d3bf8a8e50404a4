use geo_traits::CoordTrait;

use crate::error::Result;
use crate::geo::{around_filtered, AroundQuery};
use crate::indices::Indices;
use crate::kdtree::index::{KDTreeMetadata, KDTreeRef, OwnedKDTree};
use crate::kdtree::traversal::Node;
use crate::r#type::IndexableNum;

/// A trait for searching and accessing data out of a KDTree.
pub trait KDTreeIndex<N: IndexableNum>: Sized {
    /// The underlying raw coordinate buffer of this tree, interleaved `lon, lat` in kd-sorted
    /// order.
    fn coords(&self) -> &[N];

    /// The underlying raw ids buffer of this tree, parallel to [`coords`][Self::coords].
    fn indices(&self) -> Indices<'_>;

    /// Access the metadata describing this KDTree
    fn metadata(&self) -> &KDTreeMetadata<N>;

    /// The number of items in this KDTree
    fn num_items(&self) -> u32 {
        self.metadata().num_items()
    }

    /// The node size of this KDTree
    fn node_size(&self) -> u16 {
        self.metadata().node_size()
    }

    /// A borrowed view onto this tree, which is what the geographic search runs over.
    fn as_kdtree_ref(&self) -> KDTreeRef<'_, N> {
        KDTreeRef {
            coords: self.coords(),
            ids: self.indices(),
            metadata: *self.metadata(),
        }
    }

    /// Search items in order of great-circle distance from the given longitude/latitude.
    ///
    /// - max_results: stop after this many ids
    /// - max_distance: only return items within this many kilometers
    ///
    /// ```
    /// use geo_nearest::kdtree::{KDTreeBuilder, KDTreeIndex};
    ///
    /// let mut builder = KDTreeBuilder::<f64>::new(3);
    /// builder.add(179.5, 0.).unwrap();
    /// builder.add(-179.5, 0.).unwrap();
    /// builder.add(0., 0.).unwrap();
    /// let tree = builder.finish();
    ///
    /// // The closest points lie across the antimeridian from each other.
    /// let ids = tree.around(-179.9, 0., None, Some(500.)).unwrap();
    /// assert_eq!(ids, vec![1, 0]);
    /// ```
    ///
    /// # Errors
    ///
    /// If the query coordinate is not on the sphere, or `max_distance` is NaN or negative.
    fn around(
        &self,
        lon: f64,
        lat: f64,
        max_results: Option<usize>,
        max_distance: Option<f64>,
    ) -> Result<Vec<u32>> {
        self.around_filtered(lon, lat, max_results, max_distance, |_| true)
    }

    /// Search items in order of great-circle distance, keeping only ids accepted by `filter`.
    ///
    /// `max_results` counts accepted items only.
    fn around_filtered<F: FnMut(u32) -> bool>(
        &self,
        lon: f64,
        lat: f64,
        max_results: Option<usize>,
        max_distance: Option<f64>,
        filter: F,
    ) -> Result<Vec<u32>> {
        let query = AroundQuery {
            lon,
            lat,
            max_results,
            max_distance,
        };
        around_filtered(&self.as_kdtree_ref(), &query, filter)
    }

    /// Search items in order of great-circle distance from the given coordinate
    /// (x = longitude, y = latitude).
    fn around_coord(
        &self,
        coord: &impl CoordTrait<T = f64>,
        max_results: Option<usize>,
        max_distance: Option<f64>,
    ) -> Result<Vec<u32>> {
        self.around(coord.x(), coord.y(), max_results, max_distance)
    }

    /// Access the root node of the KDTree for manual traversal, or `None` if the tree is empty.
    fn root(&self) -> Option<Node<'_, N, Self>> {
        Node::from_root(self)
    }
}

impl<N: IndexableNum> KDTreeIndex<N> for OwnedKDTree<N> {
    fn coords(&self) -> &[N] {
        self.metadata.coords_slice(&self.buffer)
    }

    fn indices(&self) -> Indices<'_> {
        self.metadata.indices_slice(&self.buffer)
    }

    fn metadata(&self) -> &KDTreeMetadata<N> {
        &self.metadata
    }
}

impl<N: IndexableNum> KDTreeIndex<N> for KDTreeRef<'_, N> {
    fn coords(&self) -> &[N] {
        self.coords
    }

    fn indices(&self) -> Indices<'_> {
        self.ids
    }

    fn metadata(&self) -> &KDTreeMetadata<N> {
        &self.metadata
    }
}
