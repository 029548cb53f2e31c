//! Boolean operations on integer polygon sets.
//!
//! The engine is a sweep-line implementation of Vatti's generic polygon
//! clipper. It accepts arbitrary polygon sets — self-intersecting,
//! overlapping, nested, with holes — plus open polylines as subjects,
//! and computes their intersection, union, difference or symmetric
//! difference under any of four fill rules.
//!
//! [`ClipperBase`] converts input paths into edge bounds hanging off a
//! sorted local-minima list; [`Clipper`] runs the sweep and builds the
//! output as flat [`Paths`](crate::path::Paths) or as a nested
//! [`PolyTree`](crate::tree::PolyTree).
//!
//! # Example
//!
//! ```
//! use exactum::clip::{ClipType, Clipper, PolyFillType, PolyType};
//! use exactum::primitives::IntPoint;
//!
//! let subject = vec![
//!     IntPoint::new(0, 0),
//!     IntPoint::new(10, 0),
//!     IntPoint::new(10, 10),
//!     IntPoint::new(0, 10),
//! ];
//! let clip = vec![
//!     IntPoint::new(5, 5),
//!     IntPoint::new(15, 5),
//!     IntPoint::new(15, 15),
//!     IntPoint::new(5, 15),
//! ];
//!
//! let mut clipper = Clipper::new();
//! clipper.add_path(&subject, PolyType::Subject, true).unwrap();
//! clipper.add_path(&clip, PolyType::Clip, true).unwrap();
//! let solution = clipper
//!     .execute(ClipType::Intersection, PolyFillType::EvenOdd, PolyFillType::EvenOdd)
//!     .unwrap();
//! assert_eq!(solution.len(), 1);
//! assert_eq!(exactum::path::area(&solution[0]).abs(), 25.0);
//! ```

mod base;
mod edge;
mod engine;
mod out;

pub use base::ClipperBase;
pub use engine::Clipper;

#[cfg(feature = "xyz")]
pub use engine::ZFillCallback;

/// The boolean operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipType {
    /// Regions covered by both subject and clip.
    Intersection,
    /// Regions covered by subject or clip.
    Union,
    /// Regions covered by subject but not clip.
    Difference,
    /// Regions covered by exactly one of subject and clip.
    Xor,
}

/// Which input set a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyType {
    Subject,
    Clip,
}

/// The winding rule deciding which regions a path set fills.
///
/// By far the most widely used rules are `EvenOdd` and `NonZero`;
/// `Positive` and `Negative` additionally distinguish winding direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyFillType {
    /// Alternating regions are filled, regardless of winding direction.
    EvenOdd,
    /// Regions with a non-zero winding number are filled.
    NonZero,
    /// Regions with a positive winding number are filled.
    Positive,
    /// Regions with a negative winding number are filled.
    Negative,
}
