//! exactum - Exact integer geometry
//!
//! Some things do need to be exact. This library computes boolean
//! combinations (intersection, union, difference, XOR) and
//! morphological offsets of arbitrary planar polygon sets on integer
//! coordinates, where every predicate is evaluated exactly and the
//! same input always produces the same output.
//!
//! The clipping engine is a sweep-line implementation of Vatti's
//! generic polygon clipper; offsetting buffers each path and resolves
//! the self-overlaps through a winding-number union.
//!
//! # Example
//!
//! ```
//! use exactum::{ClipType, Clipper, PolyFillType, PolyType};
//! use exactum::IntPoint;
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
//! assert_eq!(exactum::area(&solution[0]).abs(), 25.0);
//! ```

pub mod clip;
pub mod error;
pub mod minkowski;
pub mod offset;
pub mod path;
pub mod primitives;
pub mod simplify;
pub mod tree;

pub use clip::{ClipType, Clipper, ClipperBase, PolyFillType, PolyType};
pub use error::ClipError;
pub use minkowski::{minkowski_diff, minkowski_sum, minkowski_sum_paths};
pub use offset::{ClipperOffset, EndType, JoinType};
pub use path::{
    area, orientation, point_in_polygon, reverse_path, reverse_paths, translate_path, Path, Paths,
    PointLocation,
};
pub use primitives::{CInt, IntPoint, IntRect, Point2, Point3};
pub use simplify::{
    clean_polygon, clean_polygons, simplify_polygon, simplify_polygons, DEFAULT_CLEAN_DISTANCE,
};
pub use tree::{
    closed_paths_from_polytree, open_paths_from_polytree, polytree_to_paths, NodeId, PolyNode,
    PolyTree,
};

#[cfg(feature = "xyz")]
pub use clip::ZFillCallback;
