//! 2D integer point type.

use num_traits::PrimInt;
use std::ops::{Add, Neg, Sub};

/// A 2D point with integer coordinates.
///
/// Generic over primitive integer types; the clipping engine works on
/// [`Point2<CInt>`](crate::primitives::CInt). Unlike a floating-point
/// point there is no tolerance anywhere: two points are equal exactly
/// when their coordinates are.
///
/// With the `xyz` feature enabled the point carries an extra `z` member.
/// `z` is opaque to every geometric predicate — equality and ordering
/// look at `x` and `y` only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point2<T> {
    pub x: T,
    pub y: T,
    #[cfg(feature = "xyz")]
    pub z: T,
}

impl<T: PrimInt> Point2<T> {
    /// Creates a new point.
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self {
            x,
            y,
            #[cfg(feature = "xyz")]
            z: T::zero(),
        }
    }

    /// Creates a new point with an explicit `z` member.
    #[cfg(feature = "xyz")]
    #[inline]
    pub fn with_z(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero(), T::zero())
    }
}

// z never participates in comparisons.
impl<T: PartialEq> PartialEq for Point2<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<T: Eq> Eq for Point2<T> {}

impl<T: PrimInt> Add for Point2<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: PrimInt> Sub for Point2<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: PrimInt + Neg<Output = T>> Neg for Point2<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_eq() {
        let a = Point2::new(3_i64, -4);
        let b = Point2::new(3_i64, -4);
        let c = Point2::new(3_i64, 4);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_arithmetic() {
        let a = Point2::new(1_i64, 2);
        let b = Point2::new(10_i64, 20);
        assert_eq!(a + b, Point2::new(11, 22));
        assert_eq!(b - a, Point2::new(9, 18));
        assert_eq!(-a, Point2::new(-1, -2));
    }

    #[test]
    fn test_i32_coords() {
        let a = Point2::new(7_i32, 9);
        assert_eq!(a + Point2::zero(), a);
    }

    #[cfg(feature = "xyz")]
    #[test]
    fn test_z_is_opaque_to_equality() {
        let a = Point2::with_z(1_i64, 2, 5);
        let b = Point2::with_z(1_i64, 2, 99);
        assert_eq!(a, b);
    }
}
