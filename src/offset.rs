//! Polygon and polyline offsetting (inflate/deflate).
//!
//! Each vertex of a buffered path is displaced along the unit normals
//! of its two edges; corners are closed with a miter, an arc, or a
//! squared-off bevel. The displaced outlines almost always overlap
//! themselves, so the final step unions them through the clipper with
//! winding-number (NonZero-family) filling, which also erases any
//! inward geometry that self-cancelled.
//!
//! # Example
//!
//! ```
//! use exactum::offset::{ClipperOffset, EndType, JoinType};
//! use exactum::primitives::IntPoint;
//!
//! let square = vec![
//!     IntPoint::new(0, 0),
//!     IntPoint::new(100, 0),
//!     IntPoint::new(100, 100),
//!     IntPoint::new(0, 100),
//! ];
//! let mut off = ClipperOffset::new(2.0, 0.25);
//! off.add_path(&square, JoinType::Miter, EndType::ClosedPolygon);
//! let grown = off.execute(10.0).unwrap();
//! assert_eq!(grown.len(), 1);
//! // a 100x100 square grown by 10 with miter joins is 120x120
//! assert_eq!(exactum::path::area(&grown[0]).abs(), 14400.0);
//! ```

use crate::clip::{ClipType, Clipper, PolyFillType, PolyType};
use crate::error::ClipError;
use crate::path::{orientation, reverse_path, round, Path, Paths};
use crate::primitives::IntPoint;
use crate::tree::PolyTree;

/// How corners between offset edges are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    /// Cut the corner square, at a distance that keeps the offset
    /// exact at the vertex itself.
    Square,
    /// Approximate a circular arc with chords (see
    /// [`ClipperOffset::arc_tolerance`]).
    Round,
    /// Extend the edges to their natural intersection, up to
    /// [`ClipperOffset::miter_limit`] times the delta; past that the
    /// corner is squared instead.
    Miter,
}

/// How the ends of a buffered path are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndType {
    /// The path is a closed polygon; one offset outline results.
    ClosedPolygon,
    /// The path is a closed line; both sides are offset, giving two
    /// concentric outlines.
    ClosedLine,
    /// Open path, ends cut off flush.
    OpenButt,
    /// Open path, ends extended by the delta and squared.
    OpenSquare,
    /// Open path, ends capped with semicircles.
    OpenRound,
}

#[derive(Debug, Clone, Copy)]
struct Normal {
    x: f64,
    y: f64,
}

struct OffsetPath {
    contour: Path,
    join_type: JoinType,
    end_type: EndType,
}

const TOLERANCE: f64 = 1.0e-20;
const DEF_ARC_TOLERANCE: f64 = 0.25;
const TWO_PI: f64 = std::f64::consts::PI * 2.0;

fn unit_normal(pt1: IntPoint, pt2: IntPoint) -> Normal {
    if pt1 == pt2 {
        return Normal { x: 0.0, y: 0.0 };
    }
    let dx = (pt2.x - pt1.x) as f64;
    let dy = (pt2.y - pt1.y) as f64;
    let f = 1.0 / (dx * dx + dy * dy).sqrt();
    Normal {
        x: dy * f,
        y: -dx * f,
    }
}

/// Offsets (buffers) closed polygons and open polylines.
///
/// Paths are buffered with [`add_path`](Self::add_path) /
/// [`add_paths`](Self::add_paths), then offset with one or more
/// [`execute`](Self::execute) calls; `clear` discards the buffer.
pub struct ClipperOffset {
    /// Maximum ratio of miter length to offset delta before a miter
    /// corner falls back to square.
    pub miter_limit: f64,
    /// Maximum sagitta of the chords approximating round joins.
    pub arc_tolerance: f64,
    paths: Vec<OffsetPath>,
    /// (path index, vertex index) of the overall lowest vertex among
    /// closed polygons, used to recover a common orientation.
    lowest: Option<(usize, usize)>,
    src_poly: Path,
    dest_poly: Path,
    normals: Vec<Normal>,
    delta: f64,
    sin_a: f64,
    sin: f64,
    cos: f64,
    miter_lim: f64,
    steps_per_rad: f64,
}

impl Default for ClipperOffset {
    fn default() -> Self {
        Self::new(2.0, DEF_ARC_TOLERANCE)
    }
}

impl ClipperOffset {
    pub fn new(miter_limit: f64, arc_tolerance: f64) -> Self {
        ClipperOffset {
            miter_limit,
            arc_tolerance,
            paths: Vec::new(),
            lowest: None,
            src_poly: Vec::new(),
            dest_poly: Vec::new(),
            normals: Vec::new(),
            delta: 0.0,
            sin_a: 0.0,
            sin: 0.0,
            cos: 0.0,
            miter_lim: 0.0,
            steps_per_rad: 0.0,
        }
    }

    /// Discards every buffered path.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.lowest = None;
    }

    /// Buffers one path with its join and end treatment.
    ///
    /// Consecutive duplicate points are stripped. Closed polygons with
    /// fewer than three distinct vertices are ignored.
    pub fn add_path(&mut self, path: &[IntPoint], join_type: JoinType, end_type: EndType) {
        if path.is_empty() {
            return;
        }
        let mut high_i = path.len() - 1;
        if end_type == EndType::ClosedLine || end_type == EndType::ClosedPolygon {
            while high_i > 0 && path[0] == path[high_i] {
                high_i -= 1;
            }
        }

        let mut contour: Path = Vec::with_capacity(high_i + 1);
        contour.push(path[0]);
        // k tracks the lowest (then leftmost) vertex of this path
        let mut j = 0;
        let mut k = 0;
        for &pt in &path[1..=high_i] {
            if contour[j] != pt {
                j += 1;
                contour.push(pt);
                if pt.y > contour[k].y || (pt.y == contour[k].y && pt.x < contour[k].x) {
                    k = j;
                }
            }
        }
        if end_type == EndType::ClosedPolygon && j < 2 {
            return;
        }

        let path_index = self.paths.len();
        self.paths.push(OffsetPath {
            contour,
            join_type,
            end_type,
        });

        if end_type != EndType::ClosedPolygon {
            return;
        }
        match self.lowest {
            None => self.lowest = Some((path_index, k)),
            Some((li, lk)) => {
                let lowest_pt = self.paths[li].contour[lk];
                let candidate = self.paths[path_index].contour[k];
                if candidate.y > lowest_pt.y
                    || (candidate.y == lowest_pt.y && candidate.x < lowest_pt.x)
                {
                    self.lowest = Some((path_index, k));
                }
            }
        }
    }

    /// Buffers every path in the collection.
    pub fn add_paths(&mut self, paths: &[Vec<IntPoint>], join_type: JoinType, end_type: EndType) {
        for p in paths {
            self.add_path(p, join_type, end_type);
        }
    }

    /// Offsets the buffered paths by `delta` and returns flat closed
    /// paths.
    pub fn execute(&mut self, delta: f64) -> Result<Paths, ClipError> {
        self.fix_orientations();
        let dest = self.do_offset(delta);

        let mut clpr = Clipper::new();
        match clpr.add_paths(&dest, PolyType::Subject, true) {
            Ok(()) | Err(ClipError::DegeneratePath) => {}
            Err(e) => return Err(e),
        }
        if delta > 0.0 {
            clpr.execute(
                ClipType::Union,
                PolyFillType::Positive,
                PolyFillType::Positive,
            )
        } else {
            let outer = Self::outer_rect(&clpr);
            match clpr.add_path(&outer, PolyType::Subject, true) {
                Ok(()) | Err(ClipError::DegeneratePath) => {}
                Err(e) => return Err(e),
            }
            clpr.set_reverse_solution(true);
            let mut solution = clpr.execute(
                ClipType::Union,
                PolyFillType::Negative,
                PolyFillType::Negative,
            )?;
            if !solution.is_empty() {
                solution.remove(0);
            }
            Ok(solution)
        }
    }

    /// Offsets the buffered paths by `delta` and returns the nesting
    /// tree.
    pub fn execute_tree(&mut self, delta: f64) -> Result<PolyTree, ClipError> {
        self.fix_orientations();
        let dest = self.do_offset(delta);

        let mut clpr = Clipper::new();
        match clpr.add_paths(&dest, PolyType::Subject, true) {
            Ok(()) | Err(ClipError::DegeneratePath) => {}
            Err(e) => return Err(e),
        }
        if delta > 0.0 {
            clpr.execute_tree(
                ClipType::Union,
                PolyFillType::Positive,
                PolyFillType::Positive,
            )
        } else {
            let outer = Self::outer_rect(&clpr);
            match clpr.add_path(&outer, PolyType::Subject, true) {
                Ok(()) | Err(ClipError::DegeneratePath) => {}
                Err(e) => return Err(e),
            }
            clpr.set_reverse_solution(true);
            let mut tree = clpr.execute_tree(
                ClipType::Union,
                PolyFillType::Negative,
                PolyFillType::Negative,
            )?;
            // strip the throwaway outer rectangle
            tree.promote_outer();
            Ok(tree)
        }
    }

    /// An oversized rectangle wrapping everything added to `clpr`,
    /// wound to enclose negative-fill output.
    fn outer_rect(clpr: &Clipper) -> Path {
        let r = clpr.bounds();
        vec![
            IntPoint::new(r.left - 10, r.bottom + 10),
            IntPoint::new(r.right + 10, r.bottom + 10),
            IntPoint::new(r.right + 10, r.top - 10),
            IntPoint::new(r.left - 10, r.top - 10),
        ]
    }

    /// Re-orients buffered paths so the polygon holding the overall
    /// lowest vertex is wound positively; everything else follows.
    fn fix_orientations(&mut self) {
        if let Some((li, _)) = self.lowest {
            if !orientation(&self.paths[li].contour) {
                for p in &mut self.paths {
                    if p.end_type == EndType::ClosedPolygon
                        || (p.end_type == EndType::ClosedLine && orientation(&p.contour))
                    {
                        reverse_path(&mut p.contour);
                    }
                }
            }
        } else {
            for p in &mut self.paths {
                if p.end_type == EndType::ClosedLine && !orientation(&p.contour) {
                    reverse_path(&mut p.contour);
                }
            }
        }
    }

    fn do_offset(&mut self, delta: f64) -> Paths {
        self.delta = delta;
        let mut dest_polys: Paths = Vec::new();

        // zero offset: pass closed polygons straight to the union
        if delta.abs() < TOLERANCE {
            dest_polys.reserve(self.paths.len());
            for p in &self.paths {
                if p.end_type == EndType::ClosedPolygon {
                    dest_polys.push(p.contour.clone());
                }
            }
            return dest_polys;
        }

        self.miter_lim = if self.miter_limit > 2.0 {
            2.0 / (self.miter_limit * self.miter_limit)
        } else {
            0.5
        };

        let y = if self.arc_tolerance <= 0.0 {
            DEF_ARC_TOLERANCE
        } else if self.arc_tolerance > delta.abs() * DEF_ARC_TOLERANCE {
            delta.abs() * DEF_ARC_TOLERANCE
        } else {
            self.arc_tolerance
        };
        // chord count per quarter turn at this tolerance, capped so
        // tiny tolerances cannot explode the vertex count
        let mut steps = std::f64::consts::PI / (1.0 - y / delta.abs()).acos();
        if steps > delta.abs() * std::f64::consts::PI / 4.0 {
            steps = delta.abs() * std::f64::consts::PI / 4.0;
        }
        let full_circle = steps * 4.0;
        self.sin = (TWO_PI / full_circle).sin();
        self.cos = (TWO_PI / full_circle).cos();
        self.steps_per_rad = full_circle / TWO_PI;
        if delta < 0.0 {
            self.sin = -self.sin;
        }

        dest_polys.reserve(self.paths.len() * 2);
        for i in 0..self.paths.len() {
            let (join_type, end_type) = (self.paths[i].join_type, self.paths[i].end_type);
            self.src_poly = self.paths[i].contour.clone();

            let len = self.src_poly.len();
            if len == 0 || (delta <= 0.0 && (len < 3 || end_type != EndType::ClosedPolygon)) {
                continue;
            }

            self.dest_poly = Vec::new();

            if len == 1 {
                self.offset_single_point(join_type, full_circle);
                dest_polys.push(std::mem::take(&mut self.dest_poly));
                continue;
            }

            // one unit normal per edge
            self.normals.clear();
            self.normals.reserve(len);
            for j in 0..len - 1 {
                self.normals
                    .push(unit_normal(self.src_poly[j], self.src_poly[j + 1]));
            }
            if end_type == EndType::ClosedLine || end_type == EndType::ClosedPolygon {
                self.normals
                    .push(unit_normal(self.src_poly[len - 1], self.src_poly[0]));
            } else {
                let last = self.normals[len - 2];
                self.normals.push(last);
            }

            match end_type {
                EndType::ClosedPolygon => {
                    let mut k = len - 1;
                    for j in 0..len {
                        k = self.offset_point(j, k, join_type);
                    }
                    dest_polys.push(std::mem::take(&mut self.dest_poly));
                }
                EndType::ClosedLine => {
                    let mut k = len - 1;
                    for j in 0..len {
                        k = self.offset_point(j, k, join_type);
                    }
                    dest_polys.push(std::mem::take(&mut self.dest_poly));
                    self.dest_poly = Vec::new();
                    // flip the normals and run back along the far side
                    let n = self.normals[len - 1];
                    for j in (1..len).rev() {
                        self.normals[j] = Normal {
                            x: -self.normals[j - 1].x,
                            y: -self.normals[j - 1].y,
                        };
                    }
                    self.normals[0] = Normal { x: -n.x, y: -n.y };
                    let mut k = 0;
                    for j in (0..len).rev() {
                        k = self.offset_point(j, k, join_type);
                    }
                    dest_polys.push(std::mem::take(&mut self.dest_poly));
                }
                _ => {
                    let mut k = 0;
                    for j in 1..len - 1 {
                        k = self.offset_point(j, k, join_type);
                    }

                    if end_type == EndType::OpenButt {
                        let j = len - 1;
                        let pt1 = IntPoint::new(
                            round(self.src_poly[j].x as f64 + self.normals[j].x * delta),
                            round(self.src_poly[j].y as f64 + self.normals[j].y * delta),
                        );
                        self.dest_poly.push(pt1);
                        let pt2 = IntPoint::new(
                            round(self.src_poly[j].x as f64 - self.normals[j].x * delta),
                            round(self.src_poly[j].y as f64 - self.normals[j].y * delta),
                        );
                        self.dest_poly.push(pt2);
                    } else {
                        let j = len - 1;
                        let k = len - 2;
                        self.sin_a = 0.0;
                        self.normals[j] = Normal {
                            x: -self.normals[j].x,
                            y: -self.normals[j].y,
                        };
                        if end_type == EndType::OpenSquare {
                            self.do_square(j, k);
                        } else {
                            self.do_round(j, k);
                        }
                    }

                    // flip the normals and come back along the other side
                    for j in (1..len).rev() {
                        self.normals[j] = Normal {
                            x: -self.normals[j - 1].x,
                            y: -self.normals[j - 1].y,
                        };
                    }
                    self.normals[0] = Normal {
                        x: -self.normals[1].x,
                        y: -self.normals[1].y,
                    };

                    let mut k = len - 1;
                    for j in (1..k).rev() {
                        k = self.offset_point(j, k, join_type);
                    }

                    if end_type == EndType::OpenButt {
                        let pt1 = IntPoint::new(
                            round(self.src_poly[0].x as f64 - self.normals[0].x * delta),
                            round(self.src_poly[0].y as f64 - self.normals[0].y * delta),
                        );
                        self.dest_poly.push(pt1);
                        let pt2 = IntPoint::new(
                            round(self.src_poly[0].x as f64 + self.normals[0].x * delta),
                            round(self.src_poly[0].y as f64 + self.normals[0].y * delta),
                        );
                        self.dest_poly.push(pt2);
                    } else {
                        self.sin_a = 0.0;
                        if end_type == EndType::OpenSquare {
                            self.do_square(0, 1);
                        } else {
                            self.do_round(0, 1);
                        }
                    }
                    dest_polys.push(std::mem::take(&mut self.dest_poly));
                }
            }
        }
        dest_polys
    }

    /// A lone point becomes a circle (round joins) or a square.
    fn offset_single_point(&mut self, join_type: JoinType, steps: f64) {
        let src = self.src_poly[0];
        if join_type == JoinType::Round {
            let mut x = 1.0;
            let mut y = 0.0;
            let n = round(steps).max(1);
            for _ in 1..=n {
                self.dest_poly.push(IntPoint::new(
                    round(src.x as f64 + x * self.delta),
                    round(src.y as f64 + y * self.delta),
                ));
                let x2 = x;
                x = x * self.cos - self.sin * y;
                y = x2 * self.sin + y * self.cos;
            }
        } else {
            let mut x = -1.0;
            let mut y = -1.0;
            for _ in 0..4 {
                self.dest_poly.push(IntPoint::new(
                    round(src.x as f64 + x * self.delta),
                    round(src.y as f64 + y * self.delta),
                ));
                if x < 0.0 {
                    x = 1.0;
                } else if y < 0.0 {
                    y = 1.0;
                } else {
                    x = -1.0;
                }
            }
        }
    }

    /// Emits the offset geometry for vertex `j` whose incoming edge is
    /// `k`; returns the new `k`.
    fn offset_point(&mut self, j: usize, k: usize, join_type: JoinType) -> usize {
        // cross product of the adjoining normals
        self.sin_a = self.normals[k].x * self.normals[j].y - self.normals[j].x * self.normals[k].y;

        if (self.sin_a * self.delta).abs() < 1.0 {
            // dot product
            let cos_a =
                self.normals[k].x * self.normals[j].x + self.normals[j].y * self.normals[k].y;
            if cos_a > 0.0 {
                // angle is close to 0 degrees: a single miter point is
                // within rounding of the true offset
                self.dest_poly.push(IntPoint::new(
                    round(self.src_poly[j].x as f64 + self.normals[k].x * self.delta),
                    round(self.src_poly[j].y as f64 + self.normals[k].y * self.delta),
                ));
                return j;
            }
            // else the angle is close to 180 degrees
        } else if self.sin_a > 1.0 {
            self.sin_a = 1.0;
        } else if self.sin_a < -1.0 {
            self.sin_a = -1.0;
        }

        if self.sin_a * self.delta < 0.0 {
            // concave vertex: the offset folds back over itself; the
            // union pass erases the overlap afterwards
            self.dest_poly.push(IntPoint::new(
                round(self.src_poly[j].x as f64 + self.normals[k].x * self.delta),
                round(self.src_poly[j].y as f64 + self.normals[k].y * self.delta),
            ));
            self.dest_poly.push(self.src_poly[j]);
            self.dest_poly.push(IntPoint::new(
                round(self.src_poly[j].x as f64 + self.normals[j].x * self.delta),
                round(self.src_poly[j].y as f64 + self.normals[j].y * self.delta),
            ));
        } else {
            match join_type {
                JoinType::Miter => {
                    let r = 1.0
                        + (self.normals[j].x * self.normals[k].x
                            + self.normals[j].y * self.normals[k].y);
                    if r >= self.miter_lim {
                        self.do_miter(j, k, r);
                    } else {
                        self.do_square(j, k);
                    }
                }
                JoinType::Square => self.do_square(j, k),
                JoinType::Round => self.do_round(j, k),
            }
        }
        j
    }

    fn do_square(&mut self, j: usize, k: usize) {
        let dx = (self
            .sin_a
            .atan2(self.normals[k].x * self.normals[j].x + self.normals[k].y * self.normals[j].y)
            / 4.0)
            .tan();
        self.dest_poly.push(IntPoint::new(
            round(
                self.src_poly[j].x as f64
                    + self.delta * (self.normals[k].x - self.normals[k].y * dx),
            ),
            round(
                self.src_poly[j].y as f64
                    + self.delta * (self.normals[k].y + self.normals[k].x * dx),
            ),
        ));
        self.dest_poly.push(IntPoint::new(
            round(
                self.src_poly[j].x as f64
                    + self.delta * (self.normals[j].x + self.normals[j].y * dx),
            ),
            round(
                self.src_poly[j].y as f64
                    + self.delta * (self.normals[j].y - self.normals[j].x * dx),
            ),
        ));
    }

    fn do_miter(&mut self, j: usize, k: usize, r: f64) {
        let q = self.delta / r;
        self.dest_poly.push(IntPoint::new(
            round(self.src_poly[j].x as f64 + (self.normals[k].x + self.normals[j].x) * q),
            round(self.src_poly[j].y as f64 + (self.normals[k].y + self.normals[j].y) * q),
        ));
    }

    fn do_round(&mut self, j: usize, k: usize) {
        let a = self
            .sin_a
            .atan2(self.normals[k].x * self.normals[j].x + self.normals[k].y * self.normals[j].y);
        let steps = (round(self.steps_per_rad * a.abs()) as i64).max(1);

        let mut x = self.normals[k].x;
        let mut y = self.normals[k].y;
        for _ in 0..steps {
            self.dest_poly.push(IntPoint::new(
                round(self.src_poly[j].x as f64 + x * self.delta),
                round(self.src_poly[j].y as f64 + y * self.delta),
            ));
            let x2 = x;
            x = x * self.cos - self.sin * y;
            y = x2 * self.sin + y * self.cos;
        }
        self.dest_poly.push(IntPoint::new(
            round(self.src_poly[j].x as f64 + self.normals[j].x * self.delta),
            round(self.src_poly[j].y as f64 + self.normals[j].y * self.delta),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::area;
    use crate::primitives::CInt;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn square(s: CInt) -> Path {
        vec![
            IntPoint::new(0, 0),
            IntPoint::new(s, 0),
            IntPoint::new(s, s),
            IntPoint::new(0, s),
        ]
    }

    fn total_area(paths: &Paths) -> f64 {
        paths.iter().map(|p| area(p).abs()).sum()
    }

    #[test]
    fn test_grow_square_miter() {
        let mut off = ClipperOffset::default();
        off.add_path(&square(100), JoinType::Miter, EndType::ClosedPolygon);
        let out = off.execute(10.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]).abs(), 14400.0);
    }

    #[test]
    fn test_shrink_square_miter() {
        let mut off = ClipperOffset::default();
        off.add_path(&square(100), JoinType::Miter, EndType::ClosedPolygon);
        let out = off.execute(-10.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]).abs(), 6400.0);
    }

    #[test]
    fn test_shrink_past_collapse_is_empty() {
        let mut off = ClipperOffset::default();
        off.add_path(&square(10), JoinType::Miter, EndType::ClosedPolygon);
        let out = off.execute(-6.0).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_round_join_vertex_count() {
        // unit square scaled x100, delta and arc tolerance scaled
        // accordingly so the arc stepping is observable in integers
        let mut off = ClipperOffset::new(2.0, 25.0);
        off.add_path(&square(100), JoinType::Round, EndType::ClosedPolygon);
        let out = off.execute(100.0).unwrap();
        assert_eq!(out.len(), 1);
        // 4 edges * 2 + arc points at 4 corners
        assert!(out[0].len() >= 16 && out[0].len() <= 32, "{}", out[0].len());
        // area approaches 100^2 + 4*100*100 + pi*100^2
        let expected = 10000.0 + 40000.0 + std::f64::consts::PI * 10000.0;
        assert_relative_eq!(area(&out[0]).abs(), expected, max_relative = 0.02);
    }

    #[test]
    fn test_offset_round_trip_preserves_area() {
        let mut off = ClipperOffset::default();
        off.add_path(&square(1000), JoinType::Round, EndType::ClosedPolygon);
        let grown = off.execute(100.0).unwrap();

        let mut back = ClipperOffset::default();
        back.add_paths(&grown, JoinType::Round, EndType::ClosedPolygon);
        let restored = back.execute(-100.0).unwrap();

        assert_eq!(restored.len(), 1);
        assert_abs_diff_eq!(area(&restored[0]).abs(), 1_000_000.0, epsilon = 2000.0);
    }

    #[test]
    fn test_zero_delta_returns_simplified_input() {
        let mut off = ClipperOffset::default();
        off.add_path(&square(50), JoinType::Miter, EndType::ClosedPolygon);
        let out = off.execute(0.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]).abs(), 2500.0);
    }

    #[test]
    fn test_open_line_butt_and_square_and_round() {
        let line = vec![IntPoint::new(0, 0), IntPoint::new(100, 0)];

        let mut butt = ClipperOffset::default();
        butt.add_path(&line, JoinType::Miter, EndType::OpenButt);
        let b = butt.execute(10.0).unwrap();
        assert_eq!(b.len(), 1);
        assert_eq!(area(&b[0]).abs(), 2000.0);

        let mut sq = ClipperOffset::default();
        sq.add_path(&line, JoinType::Miter, EndType::OpenSquare);
        let s = sq.execute(10.0).unwrap();
        // extended by delta at both ends
        assert_eq!(area(&s[0]).abs(), 2400.0);

        let mut rnd = ClipperOffset::default();
        rnd.add_path(&line, JoinType::Round, EndType::OpenRound);
        let r = rnd.execute(10.0).unwrap();
        let expected = 2000.0 + std::f64::consts::PI * 100.0;
        assert_relative_eq!(area(&r[0]).abs(), expected, max_relative = 0.05);
    }

    #[test]
    fn test_closed_line_gives_two_boundaries() {
        let mut off = ClipperOffset::default();
        off.add_path(&square(100), JoinType::Miter, EndType::ClosedLine);
        let out = off.execute_tree(5.0).unwrap();
        // an outer boundary with one hole
        assert_eq!(out.roots().len(), 1);
        let outer = out.roots()[0];
        assert_eq!(out.node(outer).child_count(), 1);
        let hole = out.node(outer).children()[0];
        assert!(out.is_hole(hole));
    }

    #[test]
    fn test_single_point_round_is_circle() {
        let mut off = ClipperOffset::default();
        off.add_path(&[IntPoint::new(0, 0)], JoinType::Round, EndType::OpenRound);
        let out = off.execute(100.0).unwrap();
        assert_eq!(out.len(), 1);
        let expected = std::f64::consts::PI * 10000.0;
        assert_relative_eq!(area(&out[0]).abs(), expected, max_relative = 0.05);
    }

    #[test]
    fn test_miter_limit_caps_spikes() {
        // a sharp wedge; unlimited miter would spike far beyond 2x delta
        let wedge = vec![
            IntPoint::new(0, 0),
            IntPoint::new(1000, 0),
            IntPoint::new(0, 50),
        ];
        let mut off = ClipperOffset::new(2.0, DEF_ARC_TOLERANCE);
        off.add_path(&wedge, JoinType::Miter, EndType::ClosedPolygon);
        let out = off.execute(10.0).unwrap();
        assert_eq!(out.len(), 1);
        let bound = out[0].iter().map(|p| p.x).max().unwrap();
        // the sharp tip at x=1000 must not run out much past delta * miter_limit
        assert!(bound <= 1000 + 21, "miter spike reached x={bound}");
    }

    #[test]
    fn test_hole_direction_preserved() {
        // a frame: outer square with a square hole, both offset outward
        let mut off = ClipperOffset::default();
        let outer = square(100);
        let mut hole = vec![
            IntPoint::new(25, 25),
            IntPoint::new(75, 25),
            IntPoint::new(75, 75),
            IntPoint::new(25, 75),
        ];
        hole.reverse();
        off.add_path(&outer, JoinType::Miter, EndType::ClosedPolygon);
        off.add_path(&hole, JoinType::Miter, EndType::ClosedPolygon);
        let tree = off.execute_tree(5.0).unwrap();
        assert_eq!(tree.roots().len(), 1);
        let root = tree.roots()[0];
        assert_eq!(tree.node(root).child_count(), 1);
        // growing the frame outward shrinks the hole
        let hole_node = tree.node(root).children()[0];
        assert_eq!(area(&tree.node(hole_node).contour).abs(), 1600.0);
    }

    #[test]
    fn test_execute_can_run_twice() {
        let mut off = ClipperOffset::default();
        off.add_path(&square(100), JoinType::Miter, EndType::ClosedPolygon);
        let first = off.execute(10.0).unwrap();
        let second = off.execute(10.0).unwrap();
        assert_eq!(first, second);
    }
}
