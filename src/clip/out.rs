//! Output rings under construction.
//!
//! Each [`OutRec`] owns one circular ring of [`OutPt`]s. Rings live in a
//! single pool per engine instance and reference each other by index;
//! unlinked points simply stay behind in the pool until the next reset.

use crate::clip::edge::get_dx;
use crate::primitives::{wide_mul, IntPoint};

pub(crate) type OutPtId = usize;
pub(crate) type OutRecId = usize;

/// One vertex of an output ring (circular doubly-linked via indices).
#[derive(Debug, Clone)]
pub(crate) struct OutPt {
    /// Index of the owning [`OutRec`].
    pub idx: usize,
    pub pt: IntPoint,
    pub next: OutPtId,
    pub prev: OutPtId,
}

/// An output contour being assembled by the sweep.
#[derive(Debug, Clone)]
pub(crate) struct OutRec {
    pub idx: usize,
    pub is_hole: bool,
    pub is_open: bool,
    /// The nearest output record enclosing this one at sweep time.
    pub first_left: Option<OutRecId>,
    pub pts: Option<OutPtId>,
    pub bottom_pt: Option<OutPtId>,
    /// Assigned while building a tree solution.
    pub poly_node: Option<usize>,
}

impl OutRec {
    pub fn new(idx: usize) -> Self {
        OutRec {
            idx,
            is_hole: false,
            is_open: false,
            first_left: None,
            pts: None,
            bottom_pt: None,
            poly_node: None,
        }
    }
}

/// Number of points in the ring containing `start`.
pub(crate) fn point_count(pool: &[OutPt], start: OutPtId) -> usize {
    let mut n = 0;
    let mut p = start;
    loop {
        n += 1;
        p = pool[p].next;
        if p == start {
            return n;
        }
    }
}

/// Reverses the direction of a ring in place.
pub(crate) fn reverse_ring(pool: &mut [OutPt], start: OutPtId) {
    let mut p1 = start;
    loop {
        let p2 = pool[p1].next;
        pool[p1].next = pool[p1].prev;
        pool[p1].prev = p2;
        p1 = p2;
        if p1 == start {
            return;
        }
    }
}

/// Signed area of a ring (same convention as [`crate::path::area`]).
pub(crate) fn ring_area(pool: &[OutPt], start: OutPtId) -> f64 {
    let mut a = 0.0;
    let mut op = start;
    loop {
        let prev = pool[op].prev;
        a += (pool[prev].pt.x as f64 + pool[op].pt.x as f64)
            * (pool[prev].pt.y as f64 - pool[op].pt.y as f64);
        op = pool[op].next;
        if op == start {
            break;
        }
    }
    a * 0.5
}

/// Inserts a copy of `op` into its ring, before or after it.
pub(crate) fn dup_out_pt(pool: &mut Vec<OutPt>, op: OutPtId, insert_after: bool) -> OutPtId {
    let id = pool.len();
    let pt = pool[op].pt;
    let idx = pool[op].idx;
    if insert_after {
        let next = pool[op].next;
        pool.push(OutPt {
            idx,
            pt,
            next,
            prev: op,
        });
        pool[next].prev = id;
        pool[op].next = id;
    } else {
        let prev = pool[op].prev;
        pool.push(OutPt {
            idx,
            pt,
            next: op,
            prev,
        });
        pool[prev].next = id;
        pool[op].prev = id;
    }
    id
}

/// Hormann–Agathos containment of a point in a ring:
/// 0 outside, +1 inside, -1 on the boundary. Exact.
pub(crate) fn point_in_ring(pt: IntPoint, pool: &[OutPt], start: OutPtId) -> i32 {
    let mut result = 0;
    let mut op = start;
    loop {
        let ip = pool[op].pt;
        let ip_next = pool[pool[op].next].pt;
        if ip_next.y == pt.y
            && (ip_next.x == pt.x || (ip.y == pt.y && ((ip_next.x > pt.x) == (ip.x < pt.x))))
        {
            return -1;
        }
        if (ip.y < pt.y) != (ip_next.y < pt.y) {
            if ip.x >= pt.x {
                if ip_next.x > pt.x {
                    result = 1 - result;
                } else {
                    let d = wide_mul(ip.x - pt.x, ip_next.y - pt.y)
                        - wide_mul(ip_next.x - pt.x, ip.y - pt.y);
                    if d == 0 {
                        return -1;
                    }
                    if (d > 0) == (ip_next.y > ip.y) {
                        result = 1 - result;
                    }
                }
            } else if ip_next.x > pt.x {
                let d = wide_mul(ip.x - pt.x, ip_next.y - pt.y)
                    - wide_mul(ip_next.x - pt.x, ip.y - pt.y);
                if d == 0 {
                    return -1;
                }
                if (d > 0) == (ip_next.y > ip.y) {
                    result = 1 - result;
                }
            }
        }
        op = pool[op].next;
        if op == start {
            return result;
        }
    }
}

/// True when every vertex of ring 1 lies inside (or on) ring 2.
pub(crate) fn ring2_contains_ring1(pool: &[OutPt], ring1: OutPtId, ring2: OutPtId) -> bool {
    let mut op = ring1;
    loop {
        let res = point_in_ring(pool[op].pt, pool, ring2);
        if res >= 0 {
            return res > 0;
        }
        op = pool[op].next;
        if op == ring1 {
            return true;
        }
    }
}

/// The bottom-most (then left-most) point of a ring.
pub(crate) fn get_bottom_pt(pool: &[OutPt], mut pp: OutPtId) -> OutPtId {
    let mut dups: Option<OutPtId> = None;
    let mut p = pool[pp].next;
    while p != pp {
        if pool[p].pt.y > pool[pp].pt.y {
            pp = p;
            dups = None;
        } else if pool[p].pt.y == pool[pp].pt.y && pool[p].pt.x <= pool[pp].pt.x {
            if pool[p].pt.x < pool[pp].pt.x {
                dups = None;
                pp = p;
            } else if pool[p].next != pp && pool[p].prev != pp {
                dups = Some(p);
            }
        }
        p = pool[p].next;
    }
    if let Some(mut d) = dups {
        // several candidate bottom points; pick by adjoining slopes
        while d != p {
            if !first_is_bottom_pt(pool, p, d) {
                pp = d;
            }
            d = pool[d].next;
            while pool[d].pt != pool[pp].pt {
                d = pool[d].next;
            }
        }
    }
    pp
}

/// Which of two bottom-point candidates anchors the polygon.
pub(crate) fn first_is_bottom_pt(pool: &[OutPt], btm_pt1: OutPtId, btm_pt2: OutPtId) -> bool {
    let mut p = pool[btm_pt1].prev;
    while pool[p].pt == pool[btm_pt1].pt && p != btm_pt1 {
        p = pool[p].prev;
    }
    let dx1p = get_dx(pool[btm_pt1].pt, pool[p].pt).abs();
    p = pool[btm_pt1].next;
    while pool[p].pt == pool[btm_pt1].pt && p != btm_pt1 {
        p = pool[p].next;
    }
    let dx1n = get_dx(pool[btm_pt1].pt, pool[p].pt).abs();

    p = pool[btm_pt2].prev;
    while pool[p].pt == pool[btm_pt2].pt && p != btm_pt2 {
        p = pool[p].prev;
    }
    let dx2p = get_dx(pool[btm_pt2].pt, pool[p].pt).abs();
    p = pool[btm_pt2].next;
    while pool[p].pt == pool[btm_pt2].pt && p != btm_pt2 {
        p = pool[p].next;
    }
    let dx2n = get_dx(pool[btm_pt2].pt, pool[p].pt).abs();

    if dx1p.max(dx1n) == dx2p.max(dx2n) && dx1p.min(dx1n) == dx2p.min(dx2n) {
        // otherwise identical; fall back to orientation
        ring_area(pool, btm_pt1) > 0.0
    } else {
        (dx1p >= dx2p && dx1p >= dx2n) || (dx1n >= dx2p && dx1n >= dx2n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_from(points: &[(i64, i64)]) -> (Vec<OutPt>, OutPtId) {
        let n = points.len();
        let mut pool = Vec::with_capacity(n);
        for (i, &(x, y)) in points.iter().enumerate() {
            pool.push(OutPt {
                idx: 0,
                pt: IntPoint::new(x as _, y as _),
                next: (i + 1) % n,
                prev: (i + n - 1) % n,
            });
        }
        (pool, 0)
    }

    #[test]
    fn test_point_count_and_area() {
        let (pool, start) = ring_from(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(point_count(&pool, start), 4);
        // ring stored counter-clockwise in y-down coords has negative area
        assert_eq!(ring_area(&pool, start), -100.0);
    }

    #[test]
    fn test_reverse_ring_flips_area() {
        let (mut pool, start) = ring_from(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let before = ring_area(&pool, start);
        reverse_ring(&mut pool, start);
        assert_eq!(ring_area(&pool, start), -before);
        assert_eq!(point_count(&pool, start), 4);
    }

    #[test]
    fn test_dup_out_pt_links() {
        let (mut pool, start) = ring_from(&[(0, 0), (10, 0), (10, 10)]);
        let d = dup_out_pt(&mut pool, start, true);
        assert_eq!(point_count(&pool, start), 4);
        assert_eq!(pool[d].pt, pool[start].pt);
        assert_eq!(pool[start].next, d);
        assert_eq!(pool[d].prev, start);
    }

    #[test]
    fn test_point_in_ring() {
        let (pool, start) = ring_from(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(point_in_ring(IntPoint::new(5, 5), &pool, start), 1);
        assert_eq!(point_in_ring(IntPoint::new(15, 5), &pool, start), 0);
        assert_eq!(point_in_ring(IntPoint::new(10, 5), &pool, start), -1);
    }

    #[test]
    fn test_ring_containment() {
        let (mut pool, outer) = ring_from(&[(0, 0), (20, 0), (20, 20), (0, 20)]);
        let base = pool.len();
        let inner_pts = [(5, 5), (15, 5), (15, 15), (5, 15)];
        let n = inner_pts.len();
        for (i, &(x, y)) in inner_pts.iter().enumerate() {
            pool.push(OutPt {
                idx: 1,
                pt: IntPoint::new(x, y),
                next: base + (i + 1) % n,
                prev: base + (i + n - 1) % n,
            });
        }
        assert!(ring2_contains_ring1(&pool, base, outer));
        assert!(!ring2_contains_ring1(&pool, outer, base));
    }

    #[test]
    fn test_get_bottom_pt() {
        // bottom in y-down coords is the largest y; ties broken to the left
        let (pool, _) = ring_from(&[(4, 0), (8, 6), (2, 6), (0, 3)]);
        let b = get_bottom_pt(&pool, 0);
        assert_eq!(pool[b].pt, IntPoint::new(2, 6));
    }
}
