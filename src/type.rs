use std::fmt::Debug;

use num_traits::{Float, NumCast, ToPrimitive};

/// A trait for types that can be used for indexed coordinates.
///
/// Longitude and latitude only make sense as floating point values, so this is implemented for
/// `f32` and `f64`. The trait is sealed and cannot be implemented for external types, because
/// the type index is part of the kdbush buffer format and must match other implementations of
/// it ([kdbush](https://github.com/mourner/kdbush)).
pub trait IndexableNum:
    private::Sealed + Float + NumCast + ToPrimitive + Debug + Send + Sync + bytemuck::Pod
{
    /// The type index to match the array order of `ARRAY_TYPES` in kdbush JS
    const TYPE_INDEX: u8;
    /// The number of bytes per element
    const BYTES_PER_ELEMENT: usize;

    /// Widen this coordinate to `f64`, the precision all spherical math runs in.
    fn as_f64(self) -> f64;
}

impl IndexableNum for f32 {
    const TYPE_INDEX: u8 = 7;
    const BYTES_PER_ELEMENT: usize = 4;

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl IndexableNum for f64 {
    const TYPE_INDEX: u8 = 8;
    const BYTES_PER_ELEMENT: usize = 8;

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

/// A single coordinate.
///
/// Used in the implementation of RectTrait for kd-tree nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord<N: IndexableNum> {
    pub(crate) x: N,
    pub(crate) y: N,
}

impl<N: IndexableNum> geo_traits::CoordTrait for Coord<N> {
    type T = N;

    fn dim(&self) -> geo_traits::Dimensions {
        geo_traits::Dimensions::Xy
    }

    fn x(&self) -> Self::T {
        self.x
    }

    fn y(&self) -> Self::T {
        self.y
    }

    fn nth_or_panic(&self, n: usize) -> Self::T {
        match n {
            0 => self.x,
            1 => self.y,
            _ => panic!("Invalid index of coord"),
        }
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
