use std::marker::PhantomData;

use bytemuck::{cast_slice, try_cast_slice, PodCastError};

use crate::error::{GeoIndexError, Result};
use crate::indices::{id_bytes_per_element, Indices, U16_ID_THRESHOLD};
use crate::kdtree::constants::{KDBUSH_HEADER_SIZE, KDBUSH_MAGIC, KDBUSH_VERSION};
use crate::r#type::IndexableNum;

/// Describes the byte layout of a kdbush buffer holding `num_items` points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KDTreeMetadata<N: IndexableNum> {
    node_size: u16,
    num_items: u32,
    phantom: PhantomData<N>,
}

impl<N: IndexableNum> KDTreeMetadata<N> {
    /// Create metadata for a new tree.
    ///
    /// # Panics
    ///
    /// If `node_size` is less than 2.
    pub fn new(num_items: u32, node_size: u16) -> Self {
        assert!(node_size >= 2, "Node size must be at least 2, got {node_size}.");
        Self {
            node_size,
            num_items,
            phantom: PhantomData,
        }
    }

    /// Parse and validate the header of an existing kdbush buffer.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.len() < KDBUSH_HEADER_SIZE {
            return Err(GeoIndexError::General(format!(
                "Buffer of {} bytes is shorter than the kdbush header.",
                data.len()
            )));
        }

        if data[0] != KDBUSH_MAGIC {
            return Err(GeoIndexError::General(
                "Data not in Kdbush format.".to_string(),
            ));
        }

        let version_and_type = data[1];
        let version = version_and_type >> 4;
        if version != KDBUSH_VERSION {
            return Err(GeoIndexError::General(format!(
                "Got v{} data when expected v{}.",
                version, KDBUSH_VERSION
            )));
        }

        let type_ = version_and_type & 0x0f;
        if type_ != N::TYPE_INDEX {
            return Err(GeoIndexError::General(format!(
                "Got type {} data when expected type {}.",
                type_,
                N::TYPE_INDEX
            )));
        }

        let node_size = u16::from_le_bytes([data[2], data[3]]);
        let num_items = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        if node_size < 2 {
            return Err(GeoIndexError::General(format!(
                "Invalid node size {node_size}."
            )));
        }

        let metadata = Self {
            node_size,
            num_items,
            phantom: PhantomData,
        };
        if data.len() != metadata.data_buffer_length() {
            return Err(GeoIndexError::General(format!(
                "Incorrect buffer length. Expected {} got {}.",
                metadata.data_buffer_length(),
                data.len()
            )));
        }

        Ok(metadata)
    }

    /// The number of points in the tree.
    pub fn num_items(&self) -> u32 {
        self.num_items
    }

    /// The maximum number of points in a leaf bucket, minus one.
    pub fn node_size(&self) -> u16 {
        self.node_size
    }

    /// The full byte length of a buffer described by this metadata.
    pub fn data_buffer_length(&self) -> usize {
        KDBUSH_HEADER_SIZE
            + self.indices_byte_length()
            + self.pad_coords_byte_length()
            + self.coords_byte_length()
    }

    pub(crate) fn indices_byte_length(&self) -> usize {
        self.num_items as usize * id_bytes_per_element(self.num_items as usize)
    }

    /// Coordinates start on an 8-byte boundary.
    pub(crate) fn pad_coords_byte_length(&self) -> usize {
        (8 - (self.indices_byte_length() % 8)) % 8
    }

    pub(crate) fn coords_byte_length(&self) -> usize {
        self.num_items as usize * 2 * N::BYTES_PER_ELEMENT
    }

    pub(crate) fn coords_byte_offset(&self) -> usize {
        KDBUSH_HEADER_SIZE + self.indices_byte_length() + self.pad_coords_byte_length()
    }

    pub(crate) fn indices_slice<'a>(&self, data: &'a [u8]) -> Indices<'a> {
        let start = KDBUSH_HEADER_SIZE;
        Indices::new(
            &data[start..start + self.indices_byte_length()],
            self.num_items as usize,
        )
    }

    pub(crate) fn coords_slice<'a>(&self, data: &'a [u8]) -> &'a [N] {
        let start = self.coords_byte_offset();
        cast_slice(&data[start..start + self.coords_byte_length()])
    }
}

/// An owned KDTree buffer.
///
/// Usually this will be created from scratch via [`KDTreeBuilder`][crate::kdtree::KDTreeBuilder].
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedKDTree<N: IndexableNum> {
    pub(crate) buffer: Vec<u8>,
    pub(crate) metadata: KDTreeMetadata<N>,
}

impl<N: IndexableNum> OwnedKDTree<N> {
    /// Consume this tree, returning the underlying kdbush buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// A borrowed view onto this tree.
    pub fn as_ref(&self) -> KDTreeRef<'_, N> {
        KDTreeRef {
            coords: self.metadata.coords_slice(&self.buffer),
            ids: self.metadata.indices_slice(&self.buffer),
            metadata: self.metadata,
        }
    }
}

impl<N: IndexableNum> AsRef<[u8]> for OwnedKDTree<N> {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

/// A reference on an external KDTree buffer.
///
/// Usually this will be created from an [`OwnedKDTree`] via its [`as_ref`][OwnedKDTree::as_ref]
/// method, but it can also be created from any existing kdbush buffer. The view never copies
/// and never mutates the data, so it can be shared freely between concurrent queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KDTreeRef<'a, N: IndexableNum> {
    pub(crate) coords: &'a [N],
    pub(crate) ids: Indices<'a>,
    pub(crate) metadata: KDTreeMetadata<N>,
}

impl<'a, N: IndexableNum> KDTreeRef<'a, N> {
    /// Construct a view from an existing kdbush buffer, validating its header and length.
    ///
    /// The buffer must be aligned for `N`; the kd-sort order of its contents is trusted.
    pub fn try_new<T: AsRef<[u8]> + ?Sized>(data: &'a T) -> Result<Self> {
        let data = data.as_ref();
        let metadata = KDTreeMetadata::<N>::from_slice(data)?;

        let ids_start = KDBUSH_HEADER_SIZE;
        let ids_buf = &data[ids_start..ids_start + metadata.indices_byte_length()];
        let coords_start = metadata.coords_byte_offset();
        let coords_buf = &data[coords_start..coords_start + metadata.coords_byte_length()];

        let misaligned =
            |err: PodCastError| GeoIndexError::General(format!("Misaligned kdbush buffer: {err:?}"));
        let ids = if (metadata.num_items() as usize) < U16_ID_THRESHOLD {
            Indices::U16(try_cast_slice(ids_buf).map_err(misaligned)?)
        } else {
            Indices::U32(try_cast_slice(ids_buf).map_err(misaligned)?)
        };
        let coords = try_cast_slice(coords_buf).map_err(misaligned)?;

        Ok(Self {
            coords,
            ids,
            metadata,
        })
    }
}
