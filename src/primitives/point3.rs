//! 3D integer point type.

use num_traits::PrimInt;

/// A 3D point with integer coordinates.
///
/// The clipping engine itself is strictly planar; this type exists for
/// callers that snap 3D floating-point data onto an integer grid before
/// projecting it down to 2D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: PrimInt> Point3<T> {
    /// Creates a new point.
    #[inline]
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero(), T::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let p = Point3::new(1_i64, 2, 3);
        assert_eq!(p.x, 1);
        assert_eq!(p.y, 2);
        assert_eq!(p.z, 3);
        assert_eq!(Point3::<i64>::zero(), Point3::new(0, 0, 0));
    }
}
