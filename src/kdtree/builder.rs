use std::cmp;

use bytemuck::cast_slice_mut;
use geo_traits::CoordTrait;

use crate::error::{GeoIndexError, Result};
use crate::indices::MutableIndices;
use crate::kdtree::constants::{KDBUSH_HEADER_SIZE, KDBUSH_MAGIC, KDBUSH_VERSION};
use crate::kdtree::index::KDTreeMetadata;
use crate::kdtree::OwnedKDTree;
use crate::r#type::IndexableNum;

/// The default node size used by [`KDTreeBuilder::new`]
pub const DEFAULT_NODE_SIZE: u16 = 64;

/// A builder to create an [`OwnedKDTree`] of longitude/latitude points.
///
/// ```
/// use geo_nearest::kdtree::{KDTreeBuilder, KDTreeIndex};
///
/// let mut builder = KDTreeBuilder::<f64>::new(2);
/// builder.add(30.5, 50.5).unwrap();
/// builder.add(31.0, 51.0).unwrap();
/// let tree = builder.finish();
///
/// let ids = tree.around(30.6, 50.6, Some(1), None).unwrap();
/// assert_eq!(ids, vec![0]);
/// ```
#[derive(Debug)]
pub struct KDTreeBuilder<N: IndexableNum> {
    /// data buffer
    data: Vec<u8>,
    metadata: KDTreeMetadata<N>,
    pos: usize,
}

impl<N: IndexableNum> KDTreeBuilder<N> {
    /// Create a new builder with the provided number of items and the default node size.
    pub fn new(num_items: u32) -> Self {
        Self::new_with_node_size(num_items, DEFAULT_NODE_SIZE)
    }

    /// Create a new builder with the provided number of items and node size.
    ///
    /// # Panics
    ///
    /// If `node_size` is less than 2.
    pub fn new_with_node_size(num_items: u32, node_size: u16) -> Self {
        let metadata = KDTreeMetadata::new(num_items, node_size);
        let mut data = vec![0; metadata.data_buffer_length()];

        // Set data header
        data[0] = KDBUSH_MAGIC;
        data[1] = (KDBUSH_VERSION << 4) + N::TYPE_INDEX;
        data[2..4].copy_from_slice(&node_size.to_le_bytes());
        data[4..8].copy_from_slice(&num_items.to_le_bytes());

        Self {
            data,
            metadata,
            pos: 0,
        }
    }

    /// Add a point to the index, returning its id.
    ///
    /// Ids are assigned in insertion order, starting at 0.
    ///
    /// # Errors
    ///
    /// If the longitude is outside `[-180, 180]` or the latitude is outside `[-90, 90]`. The
    /// tree's root box is the whole world, so points outside it could never be found.
    ///
    /// # Panics
    ///
    /// If more points are added than the builder was created for.
    pub fn add(&mut self, lon: N, lat: N) -> Result<u32> {
        let (lon_f, lat_f) = (lon.as_f64(), lat.as_f64());
        if !(-180.0..=180.0).contains(&lon_f) || !(-90.0..=90.0).contains(&lat_f) {
            return Err(GeoIndexError::InvalidCoordinate {
                lon: lon_f,
                lat: lat_f,
            });
        }

        let index = self.pos >> 1;
        assert!(
            index < self.metadata.num_items() as usize,
            "Added more than {} items.",
            self.metadata.num_items()
        );

        let (coords, mut ids) = split_data_borrow(&mut self.data, &self.metadata);
        ids.set(index, index as u32);
        coords[self.pos] = lon;
        coords[self.pos + 1] = lat;
        self.pos += 2;

        Ok(index as u32)
    }

    /// Add a coordinate (x = longitude, y = latitude) to the index, returning its id.
    pub fn add_coord(&mut self, coord: &impl CoordTrait<T = N>) -> Result<u32> {
        self.add(coord.x(), coord.y())
    }

    /// Consume this builder, performing the k-d sort and generating a KDTree ready for queries.
    ///
    /// # Panics
    ///
    /// If fewer points were added than the builder was created for.
    pub fn finish(mut self) -> OwnedKDTree<N> {
        let num_items = self.metadata.num_items() as usize;
        assert_eq!(
            self.pos >> 1,
            num_items,
            "Added {} items when expected {}.",
            self.pos >> 1,
            num_items
        );

        if num_items > 0 {
            let (coords, ids) = split_data_borrow(&mut self.data, &self.metadata);
            let mut sorter = KDSort {
                ids,
                coords,
                node_size: self.metadata.node_size() as usize,
            };
            sorter.sort(0, num_items - 1, 0);
        }

        tracing::debug!(
            num_items,
            node_size = self.metadata.node_size(),
            bytes = self.data.len(),
            "built kd-tree"
        );

        OwnedKDTree {
            buffer: self.data,
            metadata: self.metadata,
        }
    }
}

/// Mutable borrow of coords and ids
fn split_data_borrow<'a, N: IndexableNum>(
    data: &'a mut [u8],
    metadata: &KDTreeMetadata<N>,
) -> (&'a mut [N], MutableIndices<'a>) {
    let (ids_buf, padded_coords_buf) =
        data[KDBUSH_HEADER_SIZE..].split_at_mut(metadata.indices_byte_length());
    let coords_buf = &mut padded_coords_buf[metadata.pad_coords_byte_length()..];
    debug_assert_eq!(coords_buf.len(), metadata.coords_byte_length());

    let ids = MutableIndices::new(ids_buf, metadata.num_items() as usize);
    (cast_slice_mut(coords_buf), ids)
}

/// In-place k-d sort of the parallel id and coordinate arrays.
struct KDSort<'a, N: IndexableNum> {
    ids: MutableIndices<'a>,
    coords: &'a mut [N],
    node_size: usize,
}

impl<N: IndexableNum> KDSort<'_, N> {
    fn sort(&mut self, left: usize, right: usize, axis: usize) {
        if right - left <= self.node_size {
            return;
        }

        // middle index
        let m = (left + right) >> 1;

        // sort ids and coords around the middle index so that the halves lie either left/right or
        // top/bottom correspondingly (taking turns)
        self.select(m, left, right, axis);

        // recursively kd-sort first half and second half on the opposite axis
        self.sort(left, m - 1, 1 - axis);
        self.sort(m + 1, right, 1 - axis);
    }

    /// Floyd-Rivest selection: reorder `[left, right]` so that items before `k` are no greater
    /// than the k-th item on `axis`, and items after it no smaller.
    fn select(&mut self, k: usize, mut left: usize, mut right: usize, axis: usize) {
        while right > left {
            if right - left > 600 {
                let n = (right - left + 1) as f64;
                let m = (k - left + 1) as f64;
                let z = n.ln();
                let s = 0.5 * (2.0 * z / 3.0).exp();
                let sd = 0.5 * (z * s * (n - s) / n).sqrt() * (m - n / 2.0).signum();
                let new_left = cmp::max(left, (k as f64 - m * s / n + sd).floor() as usize);
                let new_right = cmp::min(right, (k as f64 + (n - m) * s / n + sd).floor() as usize);
                self.select(k, new_left, new_right, axis);
            }

            let t = self.value(k, axis);
            let mut i = left;
            let mut j = right;

            self.swap_item(left, k);
            if self.value(right, axis) > t {
                self.swap_item(left, right);
            }

            while i < j {
                self.swap_item(i, j);
                i += 1;
                j -= 1;
                while self.value(i, axis) < t {
                    i += 1;
                }
                while self.value(j, axis) > t {
                    j -= 1;
                }
            }

            if self.value(left, axis) == t {
                self.swap_item(left, j);
            } else {
                j += 1;
                self.swap_item(j, right);
            }

            if j <= k {
                left = j + 1;
            }
            if k <= j {
                right = j - 1;
            }
        }
    }

    #[inline]
    fn value(&self, i: usize, axis: usize) -> N {
        self.coords[2 * i + axis]
    }

    #[inline]
    fn swap_item(&mut self, i: usize, j: usize) {
        self.ids.swap(i, j);
        self.coords.swap(2 * i, 2 * j);
        self.coords.swap(2 * i + 1, 2 * j + 1);
    }
}
