//! Minkowski sums and differences.
//!
//! The Minkowski sum of two point sets A and B is
//! `A ⊕ B = { a + b : a ∈ A, b ∈ B }`; the difference is
//! `A ⊖ B = { a − b : a ∈ A, b ∈ B }`. Sweeping a convex pattern along
//! a path this way is how collision envelopes and brush strokes are
//! built.
//!
//! The implementation translates the pattern to every path vertex,
//! stitches consecutive translates into quads, and unions the quads
//! with winding-number filling.

use crate::clip::{ClipType, Clipper, PolyFillType, PolyType};
use crate::error::ClipError;
use crate::path::{orientation, translate_path, Path, Paths};
use crate::primitives::IntPoint;

fn minkowski(pattern: &[IntPoint], path: &[IntPoint], is_sum: bool, is_closed: bool) -> Paths {
    let delta = usize::from(is_closed);
    let poly_cnt = pattern.len();
    let path_cnt = path.len();

    // a translated copy of the pattern at every path vertex
    let mut translates: Paths = Vec::with_capacity(path_cnt);
    for &p in path {
        let copy: Path = if is_sum {
            pattern
                .iter()
                .map(|&q| IntPoint::new(p.x + q.x, p.y + q.y))
                .collect()
        } else {
            pattern
                .iter()
                .map(|&q| IntPoint::new(p.x - q.x, p.y - q.y))
                .collect()
        };
        translates.push(copy);
    }

    let mut quads: Paths = Vec::new();
    if path_cnt == 0 || poly_cnt == 0 {
        return quads;
    }
    quads.reserve((path_cnt + delta) * (poly_cnt + 1));
    for i in 0..path_cnt - 1 + delta {
        for j in 0..poly_cnt {
            let mut quad = vec![
                translates[i % path_cnt][j % poly_cnt],
                translates[(i + 1) % path_cnt][j % poly_cnt],
                translates[(i + 1) % path_cnt][(j + 1) % poly_cnt],
                translates[i % path_cnt][(j + 1) % poly_cnt],
            ];
            if !orientation(&quad) {
                quad.reverse();
            }
            quads.push(quad);
        }
    }
    quads
}

fn union_quads(c: &mut Clipper) -> Paths {
    c.execute(
        ClipType::Union,
        PolyFillType::NonZero,
        PolyFillType::NonZero,
    )
    .unwrap_or_default()
}

/// Minkowski sum of a pattern swept along a path.
///
/// With `path_is_closed` the sweep wraps around from the last vertex
/// back to the first.
///
/// # Example
///
/// ```
/// use exactum::minkowski::minkowski_sum;
/// use exactum::path::area;
/// use exactum::primitives::IntPoint;
///
/// // sweeping a 2x2 square around a 10x10 square ring
/// let pattern = vec![
///     IntPoint::new(-1, -1),
///     IntPoint::new(1, -1),
///     IntPoint::new(1, 1),
///     IntPoint::new(-1, 1),
/// ];
/// let ring = vec![
///     IntPoint::new(0, 0),
///     IntPoint::new(10, 0),
///     IntPoint::new(10, 10),
///     IntPoint::new(0, 10),
/// ];
/// let swept = minkowski_sum(&pattern, &ring, true);
/// // an annulus: 12x12 outer boundary, 8x8 hole
/// assert_eq!(swept.len(), 2);
/// let total: f64 = swept.iter().map(|p| area(p)).sum();
/// assert_eq!(total.abs(), 144.0 - 64.0);
/// ```
pub fn minkowski_sum(pattern: &[IntPoint], path: &[IntPoint], path_is_closed: bool) -> Paths {
    let quads = minkowski(pattern, path, true, path_is_closed);
    let mut c = Clipper::new();
    if c.add_paths(&quads, PolyType::Subject, true).is_err() {
        return Vec::new();
    }
    union_quads(&mut c)
}

/// Minkowski sum of a pattern against every path in a set.
pub fn minkowski_sum_paths(
    pattern: &[IntPoint],
    paths: &[Vec<IntPoint>],
    path_is_closed: bool,
) -> Paths {
    let mut c = Clipper::new();
    for path in paths {
        let quads = minkowski(pattern, path, true, path_is_closed);
        match c.add_paths(&quads, PolyType::Subject, true) {
            Ok(()) | Err(ClipError::DegeneratePath) => {}
            Err(_) => return Vec::new(),
        }
        if path_is_closed && !pattern.is_empty() {
            // the path interior must stay filled even where no quad
            // covers it
            let translated = translate_path(path, pattern[0]);
            match c.add_path(&translated, PolyType::Clip, true) {
                Ok(()) | Err(ClipError::DegeneratePath) => {}
                Err(_) => return Vec::new(),
            }
        }
    }
    union_quads(&mut c)
}

/// Minkowski difference of two polygons.
///
/// Contains the origin exactly when the two polygons overlap.
pub fn minkowski_diff(poly1: &[IntPoint], poly2: &[IntPoint]) -> Paths {
    let quads = minkowski(poly1, poly2, false, true);
    let mut c = Clipper::new();
    if c.add_paths(&quads, PolyType::Subject, true).is_err() {
        return Vec::new();
    }
    union_quads(&mut c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{area, point_in_polygon, PointLocation};
    use crate::primitives::CInt;

    fn diamond(r: CInt) -> Path {
        vec![
            IntPoint::new(r, 0),
            IntPoint::new(0, r),
            IntPoint::new(-r, 0),
            IntPoint::new(0, -r),
        ]
    }

    #[test]
    fn test_sum_of_open_segment_and_square() {
        // sweeping a square along a segment gives a rectangle
        let pattern = vec![
            IntPoint::new(-1, -1),
            IntPoint::new(1, -1),
            IntPoint::new(1, 1),
            IntPoint::new(-1, 1),
        ];
        let segment = vec![IntPoint::new(0, 0), IntPoint::new(10, 0)];
        let swept = minkowski_sum(&pattern, &segment, false);
        assert_eq!(swept.len(), 1);
        assert_eq!(area(&swept[0]).abs(), 24.0); // 12 x 2
    }

    #[test]
    fn test_sum_rounds_corners_with_diamond() {
        let square = vec![
            IntPoint::new(0, 0),
            IntPoint::new(10, 0),
            IntPoint::new(10, 10),
            IntPoint::new(0, 10),
        ];
        let swept = minkowski_sum_paths(&diamond(2), &[square], true);
        assert_eq!(swept.len(), 1);
        // 10x10 square grown by a radius-2 diamond: area
        // 100 + perimeter*2 + diamond area
        assert_eq!(area(&swept[0]).abs(), 100.0 + 80.0 + 8.0);
    }

    #[test]
    fn test_diff_contains_origin_iff_overlap() {
        let a = vec![
            IntPoint::new(0, 0),
            IntPoint::new(10, 0),
            IntPoint::new(10, 10),
            IntPoint::new(0, 10),
        ];
        let b_overlapping: Vec<IntPoint> = a
            .iter()
            .map(|p| IntPoint::new(p.x + 5, p.y + 5))
            .collect();
        let b_separate: Vec<IntPoint> = a
            .iter()
            .map(|p| IntPoint::new(p.x + 50, p.y))
            .collect();

        let d1 = minkowski_diff(&a, &b_overlapping);
        assert_eq!(d1.len(), 1);
        assert_ne!(
            point_in_polygon(IntPoint::new(0, 0), &d1[0]),
            PointLocation::Outside
        );

        let d2 = minkowski_diff(&a, &b_separate);
        assert_eq!(d2.len(), 1);
        assert_eq!(
            point_in_polygon(IntPoint::new(0, 0), &d2[0]),
            PointLocation::Outside
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(minkowski_sum(&[], &diamond(2), true).is_empty());
        assert!(minkowski_sum(&diamond(2), &[], true).is_empty());
    }
}
