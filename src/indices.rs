//! Point identifier storage that is either `u16` or `u32` wide to save space.
//!
//! Indexes with fewer than 65536 items store their ids as `u16`, as kdbush does.

use bytemuck::{cast_slice, cast_slice_mut};

/// Item counts below this threshold store ids as `u16`.
pub(crate) const U16_ID_THRESHOLD: usize = 65536;

/// The byte width of one id for an index holding `num_items` points.
#[inline]
pub(crate) fn id_bytes_per_element(num_items: usize) -> usize {
    if num_items < U16_ID_THRESHOLD {
        2
    } else {
        4
    }
}

/// A mutable slice of point ids that may be either `u16` or `u32`.
#[derive(Debug)]
pub(crate) enum MutableIndices<'a> {
    U16(&'a mut [u16]),
    U32(&'a mut [u32]),
}

impl<'a> MutableIndices<'a> {
    pub(crate) fn new(slice: &'a mut [u8], num_items: usize) -> Self {
        if num_items < U16_ID_THRESHOLD {
            Self::U16(cast_slice_mut(slice))
        } else {
            Self::U32(cast_slice_mut(slice))
        }
    }
}

impl MutableIndices<'_> {
    #[inline]
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        match self {
            Self::U16(arr) => arr.swap(a, b),
            Self::U32(arr) => arr.swap(a, b),
        }
    }

    /// Store `value` at `index`. The width was chosen from the item count, so ids always fit.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: u32) {
        match self {
            Self::U16(arr) => arr[index] = value as u16,
            Self::U32(arr) => arr[index] = value,
        }
    }
}

/// A slice of point ids that may be either `u16` or `u32`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Indices<'a> {
    /// Ids of an index with fewer than 65536 items.
    U16(&'a [u16]),
    /// Ids of an index with 65536 items or more.
    U32(&'a [u32]),
}

impl<'a> Indices<'a> {
    pub(crate) fn new(slice: &'a [u8], num_items: usize) -> Self {
        if num_items < U16_ID_THRESHOLD {
            Self::U16(cast_slice(slice))
        } else {
            Self::U32(cast_slice(slice))
        }
    }
}

impl Indices<'_> {
    /// The number of ids.
    pub fn len(&self) -> usize {
        match self {
            Self::U16(arr) => arr.len(),
            Self::U32(arr) => arr.len(),
        }
    }

    /// Returns `true` if there are no ids.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The insertion id stored at sorted position `index`.
    #[inline]
    pub fn get(&self, index: usize) -> u32 {
        match self {
            Self::U16(arr) => arr[index] as u32,
            Self::U32(arr) => arr[index],
        }
    }
}
