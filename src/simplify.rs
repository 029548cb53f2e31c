//! Polygon simplification and cleaning.
//!
//! [`simplify_polygon`] removes self-intersections by running a
//! strictly-simple self-union through the clipper; [`clean_polygon`]
//! removes vertices that sit within a distance tolerance of their
//! neighbors or of the adjoining edge.

use crate::clip::{ClipType, Clipper, PolyFillType, PolyType};
use crate::path::{distance_from_line_sqrd, distance_sqrd, Path, Paths};
use crate::primitives::IntPoint;

/// Default cleaning distance (roughly sqrt(2)), which strips the
/// single-unit artifacts integer rounding leaves behind.
pub const DEFAULT_CLEAN_DISTANCE: f64 = 1.415;

/// Removes self-intersections from a single closed path.
///
/// The result may contain several polygons (a self-crossing figure
/// splits into its simple regions under `fill_type`). Degenerate input
/// yields an empty result.
///
/// # Example
///
/// ```
/// use exactum::clip::PolyFillType;
/// use exactum::path::area;
/// use exactum::primitives::IntPoint;
/// use exactum::simplify::simplify_polygon;
///
/// // a figure-eight (bowtie)
/// let bowtie = vec![
///     IntPoint::new(0, 0),
///     IntPoint::new(4, 4),
///     IntPoint::new(0, 4),
///     IntPoint::new(4, 0),
/// ];
/// let simple = simplify_polygon(&bowtie, PolyFillType::EvenOdd);
/// assert_eq!(simple.len(), 2);
/// let total: f64 = simple.iter().map(|p| area(p).abs()).sum();
/// assert_eq!(total, 8.0);
/// ```
pub fn simplify_polygon(path: &[IntPoint], fill_type: PolyFillType) -> Paths {
    let mut c = Clipper::new();
    c.set_strictly_simple(true);
    if c.add_path(path, PolyType::Subject, true).is_err() {
        return Vec::new();
    }
    c.execute(ClipType::Union, fill_type, fill_type)
        .unwrap_or_default()
}

/// Removes self-intersections from a set of closed paths.
pub fn simplify_polygons(paths: &[Vec<IntPoint>], fill_type: PolyFillType) -> Paths {
    let mut c = Clipper::new();
    c.set_strictly_simple(true);
    if c.add_paths(paths, PolyType::Subject, true).is_err() {
        return Vec::new();
    }
    c.execute(ClipType::Union, fill_type, fill_type)
        .unwrap_or_default()
}

fn points_are_close(pt1: IntPoint, pt2: IntPoint, dist_sqrd: f64) -> bool {
    distance_sqrd(pt1, pt2) <= dist_sqrd
}

fn slopes_near_collinear(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, dist_sqrd: f64) -> bool {
    // testing the geometrically middle point against the other two is
    // more likely to pick up spikes
    if (pt1.x - pt2.x).abs() > (pt1.y - pt2.y).abs() {
        if (pt1.x > pt2.x) == (pt1.x < pt3.x) {
            distance_from_line_sqrd(pt1, pt2, pt3) < dist_sqrd
        } else if (pt2.x > pt1.x) == (pt2.x < pt3.x) {
            distance_from_line_sqrd(pt2, pt1, pt3) < dist_sqrd
        } else {
            distance_from_line_sqrd(pt3, pt1, pt2) < dist_sqrd
        }
    } else if (pt1.y > pt2.y) == (pt1.y < pt3.y) {
        distance_from_line_sqrd(pt1, pt2, pt3) < dist_sqrd
    } else if (pt2.y > pt1.y) == (pt2.y < pt3.y) {
        distance_from_line_sqrd(pt2, pt1, pt3) < dist_sqrd
    } else {
        distance_from_line_sqrd(pt3, pt1, pt2) < dist_sqrd
    }
}

struct CleanNode {
    pt: IntPoint,
    next: usize,
    prev: usize,
    settled: bool,
}

fn exclude(nodes: &mut [CleanNode], op: usize) -> usize {
    let prev = nodes[op].prev;
    let next = nodes[op].next;
    nodes[prev].next = next;
    nodes[next].prev = prev;
    nodes[prev].settled = false;
    prev
}

/// Removes vertices closer than `distance` to a neighbor, spike
/// vertices whose neighbors nearly coincide, and near-collinear middle
/// vertices. [`DEFAULT_CLEAN_DISTANCE`] suits integer-rounded input.
pub fn clean_polygon(path: &[IntPoint], distance: f64) -> Path {
    let size = path.len();
    if size == 0 {
        return Vec::new();
    }

    let mut nodes: Vec<CleanNode> = (0..size)
        .map(|i| CleanNode {
            pt: path[i],
            next: (i + 1) % size,
            prev: (i + size - 1) % size,
            settled: false,
        })
        .collect();

    let dist_sqrd = distance * distance;
    let mut remaining = size;
    let mut op = 0;
    while !nodes[op].settled && nodes[op].next != nodes[op].prev {
        let prev = nodes[op].prev;
        let next = nodes[op].next;
        if points_are_close(nodes[op].pt, nodes[prev].pt, dist_sqrd) {
            op = exclude(&mut nodes, op);
            remaining -= 1;
        } else if points_are_close(nodes[prev].pt, nodes[next].pt, dist_sqrd) {
            exclude(&mut nodes, next);
            op = exclude(&mut nodes, op);
            remaining -= 2;
        } else if slopes_near_collinear(nodes[prev].pt, nodes[op].pt, nodes[next].pt, dist_sqrd) {
            op = exclude(&mut nodes, op);
            remaining -= 1;
        } else {
            nodes[op].settled = true;
            op = nodes[op].next;
        }
    }

    if remaining < 3 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(remaining);
    let mut p = op;
    for _ in 0..remaining {
        out.push(nodes[p].pt);
        p = nodes[p].next;
    }
    out
}

/// [`clean_polygon`] over a set of paths.
pub fn clean_polygons(paths: &[Vec<IntPoint>], distance: f64) -> Paths {
    paths.iter().map(|p| clean_polygon(p, distance)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::area;

    #[test]
    fn test_simplify_is_a_fixpoint() {
        let bowtie = vec![
            IntPoint::new(0, 0),
            IntPoint::new(4, 4),
            IntPoint::new(0, 4),
            IntPoint::new(4, 0),
        ];
        let once = simplify_polygon(&bowtie, PolyFillType::EvenOdd);
        let twice = simplify_polygons(&once, PolyFillType::EvenOdd);
        let area_once: f64 = once.iter().map(|p| area(p).abs()).sum();
        let area_twice: f64 = twice.iter().map(|p| area(p).abs()).sum();
        assert_eq!(once.len(), twice.len());
        assert_eq!(area_once, area_twice);
    }

    #[test]
    fn test_simplify_degenerate_is_empty() {
        assert!(simplify_polygon(&[], PolyFillType::EvenOdd).is_empty());
        let two = vec![IntPoint::new(0, 0), IntPoint::new(5, 5)];
        assert!(simplify_polygon(&two, PolyFillType::EvenOdd).is_empty());
    }

    #[test]
    fn test_clean_removes_near_duplicates() {
        let path = vec![
            IntPoint::new(0, 0),
            IntPoint::new(1, 0), // within sqrt(2) of the corner
            IntPoint::new(100, 0),
            IntPoint::new(100, 100),
            IntPoint::new(0, 100),
        ];
        let cleaned = clean_polygon(&path, 1.415);
        assert_eq!(cleaned.len(), 4);
    }

    #[test]
    fn test_clean_removes_collinear_runs() {
        let path = vec![
            IntPoint::new(0, 0),
            IntPoint::new(50, 0),
            IntPoint::new(100, 0),
            IntPoint::new(100, 100),
            IntPoint::new(50, 100),
            IntPoint::new(0, 100),
        ];
        let cleaned = clean_polygon(&path, 1.415);
        assert_eq!(cleaned.len(), 4);
        assert_eq!(area(&cleaned).abs(), 10000.0);
    }

    #[test]
    fn test_clean_removes_spikes() {
        let path = vec![
            IntPoint::new(0, 0),
            IntPoint::new(100, 0),
            IntPoint::new(100, 50),
            IntPoint::new(200, 50), // spike out
            IntPoint::new(100, 50), // and back
            IntPoint::new(100, 100),
            IntPoint::new(0, 100),
        ];
        let cleaned = clean_polygon(&path, 1.415);
        assert!(cleaned.iter().all(|p| p.x <= 100));
    }

    #[test]
    fn test_clean_collapses_tiny_polygons() {
        let tiny = vec![
            IntPoint::new(0, 0),
            IntPoint::new(1, 0),
            IntPoint::new(1, 1),
        ];
        assert!(clean_polygon(&tiny, 1.415).is_empty());
        assert!(clean_polygon(&[], 1.415).is_empty());
    }
}
