//! Path ingestion and sweep bookkeeping shared by clipping operations.
//!
//! [`ClipperBase`] turns input paths into rings of [`Edge`] records,
//! strips duplicate vertices and backtracking spikes, then extracts the
//! local minima where pairs of bounds will enter the sweep. It also owns
//! the state the sweep mutates: the active edge list, the scanbeam
//! queue, and the output ring pools.

use std::collections::BinaryHeap;

use crate::clip::edge::{Edge, EdgeId, LocalMin, Side, SKIP, UNASSIGNED};
use crate::clip::PolyType;
use crate::error::ClipError;
use crate::path::{pt2_between_pt1_and_pt3, slopes_equal3};
use crate::primitives::{CInt, IntPoint, IntRect, HI_RANGE, LO_RANGE};

use super::out::{OutPt, OutRec, OutRecId};

/// Converts paths into edge bounds and owns the sweep workspace.
///
/// This type can be used on its own to validate paths and query their
/// [`bounds`](ClipperBase::bounds); clipping itself happens through
/// [`Clipper`](crate::clip::Clipper), which owns one of these.
pub struct ClipperBase {
    pub(crate) edges: Vec<Edge>,
    pub(crate) minima: Vec<LocalMin>,
    pub(crate) current_lm: usize,
    pub(crate) use_full_range: bool,
    pub(crate) has_open_paths: bool,
    preserve_collinear: bool,
    pub(crate) active_edges: Option<EdgeId>,
    pub(crate) scanbeam: BinaryHeap<CInt>,
    pub(crate) poly_outs: Vec<OutRec>,
    pub(crate) out_pts: Vec<OutPt>,
}

impl Default for ClipperBase {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipperBase {
    pub fn new() -> Self {
        ClipperBase {
            edges: Vec::new(),
            minima: Vec::new(),
            current_lm: 0,
            use_full_range: false,
            has_open_paths: false,
            preserve_collinear: false,
            active_edges: None,
            scanbeam: BinaryHeap::new(),
            poly_outs: Vec::new(),
            out_pts: Vec::new(),
        }
    }

    /// When set, collinear runs in closed input paths are kept; only
    /// true backtracking spikes are removed.
    pub fn preserve_collinear(&self) -> bool {
        self.preserve_collinear
    }

    pub fn set_preserve_collinear(&mut self, value: bool) {
        self.preserve_collinear = value;
    }

    /// Removes all added paths and releases the edge pool.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.minima.clear();
        self.current_lm = 0;
        self.use_full_range = false;
        self.has_open_paths = false;
        self.active_edges = None;
        self.scanbeam.clear();
        self.poly_outs.clear();
        self.out_pts.clear();
    }

    fn range_test(&mut self, pt: IntPoint) -> Result<(), ClipError> {
        if self.use_full_range {
            if pt.x > HI_RANGE || pt.y > HI_RANGE || -pt.x > HI_RANGE || -pt.y > HI_RANGE {
                return Err(ClipError::CoordinateOutOfRange);
            }
        } else if pt.x > LO_RANGE || pt.y > LO_RANGE || -pt.x > LO_RANGE || -pt.y > LO_RANGE {
            self.use_full_range = true;
            return self.range_test(pt);
        }
        Ok(())
    }

    /// Adds one path.
    ///
    /// Closed paths need at least three distinct, non-collinear
    /// vertices; open paths need two distinct vertices. Consecutive
    /// duplicates are stripped, and for closed paths collinear runs are
    /// merged unless [`preserve_collinear`](Self::preserve_collinear)
    /// is set (spikes are removed regardless).
    pub fn add_path(
        &mut self,
        path: &[IntPoint],
        poly_type: PolyType,
        closed: bool,
    ) -> Result<(), ClipError> {
        if !closed && poly_type == PolyType::Clip {
            return Err(ClipError::OpenPathAsClip);
        }

        let mut high_i = path.len() as isize - 1;
        if closed {
            while high_i > 0 && path[high_i as usize] == path[0] {
                high_i -= 1;
            }
        }
        while high_i > 0 && path[high_i as usize] == path[high_i as usize - 1] {
            high_i -= 1;
        }
        if (closed && high_i < 2) || (!closed && high_i < 1) {
            return Err(ClipError::DegeneratePath);
        }
        let high_i = high_i as usize;

        for pt in &path[..=high_i] {
            self.range_test(*pt)?;
        }

        // build the ring of basic edges
        let base = self.edges.len();
        let count = high_i + 1;
        for (i, &pt) in path[..=high_i].iter().enumerate() {
            let next = base + (i + 1) % count;
            let prev = base + (i + count - 1) % count;
            self.edges.push(Edge::new(pt, next, prev));
        }
        let mut e_start = base;

        // remove duplicate vertices and, when closed, collinear edges
        let mut e = e_start;
        let mut loop_stop = e_start;
        loop {
            let next = self.edges[e].next;
            if self.edges[e].curr == self.edges[next].curr && (closed || next != e_start) {
                if e == next {
                    break;
                }
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                loop_stop = e;
                continue;
            }
            let prev = self.edges[e].prev;
            if prev == next {
                break; // only two vertices left
            }
            if closed
                && slopes_equal3(
                    self.edges[prev].curr,
                    self.edges[e].curr,
                    self.edges[next].curr,
                    self.use_full_range,
                )
                && (!self.preserve_collinear
                    || !pt2_between_pt1_and_pt3(
                        self.edges[prev].curr,
                        self.edges[e].curr,
                        self.edges[next].curr,
                    ))
            {
                if e == e_start {
                    e_start = next;
                }
                let after = self.remove_edge(e);
                e = self.edges[after].prev;
                loop_stop = e;
                continue;
            }
            e = next;
            if e == loop_stop || (!closed && self.edges[e].next == e_start) {
                break;
            }
        }

        if (!closed && e == self.edges[e].next) || (closed && self.edges[e].prev == self.edges[e].next)
        {
            self.edges.truncate(base);
            return Err(ClipError::DegeneratePath);
        }

        if !closed {
            self.has_open_paths = true;
            let terminal = self.edges[e_start].prev;
            self.edges[terminal].out_idx = SKIP;
        }

        // second stage: derive bot/top/dx around the surviving ring
        let mut e = e_start;
        let mut is_flat = true;
        loop {
            let next = self.edges[e].next;
            let next_curr = self.edges[next].curr;
            self.edges[e].init_from_ring(next_curr, poly_type);
            e = next;
            if is_flat && self.edges[e].curr.y != self.edges[e_start].curr.y {
                is_flat = false;
            }
            if e == e_start {
                break;
            }
        }

        // totally flat paths never close into polygons; register them as
        // a single unbounded right bound so the sweep still visits them
        if is_flat {
            if closed {
                self.edges.truncate(base);
                return Err(ClipError::DegeneratePath);
            }
            let terminal = self.edges[e].prev;
            self.edges[terminal].out_idx = SKIP;
            let lm = LocalMin {
                y: self.edges[e].bot.y,
                left_bound: None,
                right_bound: Some(e),
            };
            self.edges[e].side = Side::Right;
            self.edges[e].wind_delta = 0;
            loop {
                let prev = self.edges[e].prev;
                if self.edges[e].bot.x != self.edges[prev].top.x {
                    self.edges[e].reverse_horizontal();
                }
                let next = self.edges[e].next;
                if self.edges[next].out_idx == SKIP {
                    break;
                }
                self.edges[e].next_in_lml = Some(next);
                e = next;
            }
            self.minima.push(lm);
            return Ok(());
        }

        // walk the ring extracting one local minimum per bound pair
        let mut e_min: Option<EdgeId> = None;

        // open paths with matching start and end points would otherwise
        // never terminate the walk below
        let prev = self.edges[e].prev;
        if self.edges[prev].bot == self.edges[prev].top {
            e = self.edges[e].next;
        }

        loop {
            e = self.find_next_loc_min(e);
            if e_min == Some(e) {
                break;
            }
            if e_min.is_none() {
                e_min = Some(e);
            }

            // e and e.prev now share a local minimum; slopes decide
            // which one starts the left bound
            let prev = self.edges[e].prev;
            let (left, right, left_forward) = if self.edges[e].dx < self.edges[prev].dx {
                (prev, e, false)
            } else {
                (e, prev, true)
            };
            let mut lm = LocalMin {
                y: self.edges[e].bot.y,
                left_bound: Some(left),
                right_bound: Some(right),
            };

            if !closed {
                self.edges[left].wind_delta = 0;
            } else if self.edges[left].next == right {
                self.edges[left].wind_delta = -1;
            } else {
                self.edges[left].wind_delta = 1;
            }
            self.edges[right].wind_delta = -self.edges[left].wind_delta;

            e = self.process_bound(left, left_forward);
            if self.edges[e].out_idx == SKIP {
                e = self.process_bound(e, left_forward);
            }
            let mut e2 = self.process_bound(right, !left_forward);
            if self.edges[e2].out_idx == SKIP {
                e2 = self.process_bound(e2, !left_forward);
            }

            if self.edges[left].out_idx == SKIP {
                lm.left_bound = None;
            } else if self.edges[right].out_idx == SKIP {
                lm.right_bound = None;
            }
            self.minima.push(lm);

            if !left_forward {
                e = e2;
            }
        }
        Ok(())
    }

    /// Adds every path in the collection; succeeds when at least one
    /// path was accepted.
    pub fn add_paths(
        &mut self,
        paths: &[Vec<IntPoint>],
        poly_type: PolyType,
        closed: bool,
    ) -> Result<(), ClipError> {
        let mut any = false;
        for path in paths {
            match self.add_path(path, poly_type, closed) {
                Ok(()) => any = true,
                Err(ClipError::DegeneratePath) => {}
                Err(e) => return Err(e),
            }
        }
        if any || paths.is_empty() {
            Ok(())
        } else {
            Err(ClipError::DegeneratePath)
        }
    }

    /// Axis-aligned bounds of everything added so far.
    pub fn bounds(&self) -> IntRect {
        let mut result: Option<IntRect> = None;
        for lm in &self.minima {
            for bound in [lm.left_bound, lm.right_bound].into_iter().flatten() {
                let mut e = bound;
                loop {
                    let edge = &self.edges[e];
                    let r = result.get_or_insert(IntRect::new(
                        edge.bot.x, edge.top.y, edge.bot.x, edge.bot.y,
                    ));
                    r.left = r.left.min(edge.bot.x).min(edge.top.x);
                    r.right = r.right.max(edge.bot.x).max(edge.top.x);
                    r.top = r.top.min(edge.top.y);
                    r.bottom = r.bottom.max(edge.bot.y);
                    match edge.next_in_lml {
                        Some(next) => e = next,
                        None => break,
                    }
                }
            }
        }
        result.unwrap_or_default()
    }

    fn remove_edge(&mut self, e: EdgeId) -> EdgeId {
        let prev = self.edges[e].prev;
        let next = self.edges[e].next;
        self.edges[prev].next = next;
        self.edges[next].prev = prev;
        next
    }

    fn find_next_loc_min(&self, mut e: EdgeId) -> EdgeId {
        loop {
            while self.edges[e].bot != self.edges[self.edges[e].prev].bot
                || self.edges[e].curr == self.edges[e].top
            {
                e = self.edges[e].next;
            }
            if !self.edges[e].is_horizontal() && !self.edges[self.edges[e].prev].is_horizontal() {
                break;
            }
            while self.edges[self.edges[e].prev].is_horizontal() {
                e = self.edges[e].prev;
            }
            let e2 = e;
            while self.edges[e].is_horizontal() {
                e = self.edges[e].next;
            }
            if self.edges[e].top.y == self.edges[self.edges[e].prev].bot.y {
                continue; // just an intermediate horizontal
            }
            if self.edges[self.edges[e2].prev].bot.x < self.edges[e].bot.x {
                e = e2;
            }
            break;
        }
        e
    }

    /// Chains the edges of one bound via `next_in_lml`, normalizing
    /// horizontals, and returns the first edge beyond the bound.
    fn process_bound(&mut self, mut e: EdgeId, next_is_forward: bool) -> EdgeId {
        let mut result = e;

        if self.edges[e].out_idx == SKIP {
            // edges still remain beyond this skip edge; they form
            // another bound registered under an extra local minimum
            if next_is_forward {
                while self.edges[e].top.y == self.edges[self.edges[e].next].bot.y {
                    e = self.edges[e].next;
                }
                // top horizontals belong to the opposite bound on this
                // second pass
                while e != result && self.edges[e].is_horizontal() {
                    e = self.edges[e].prev;
                }
            } else {
                while self.edges[e].top.y == self.edges[self.edges[e].prev].bot.y {
                    e = self.edges[e].prev;
                }
                while e != result && self.edges[e].is_horizontal() {
                    e = self.edges[e].next;
                }
            }
            if e == result {
                result = if next_is_forward {
                    self.edges[e].next
                } else {
                    self.edges[e].prev
                };
            } else {
                let e_next = if next_is_forward {
                    self.edges[result].next
                } else {
                    self.edges[result].prev
                };
                let lm = LocalMin {
                    y: self.edges[e_next].bot.y,
                    left_bound: None,
                    right_bound: Some(e_next),
                };
                self.edges[e_next].wind_delta = 0;
                result = self.process_bound(e_next, next_is_forward);
                self.minima.push(lm);
            }
            return result;
        }

        if self.edges[e].is_horizontal() {
            // a preceding skip edge means this may not be a true local
            // minimum; consecutive horizontals can also head left first
            let e_start = if next_is_forward {
                self.edges[e].prev
            } else {
                self.edges[e].next
            };
            if self.edges[e_start].is_horizontal() {
                if self.edges[e_start].bot.x != self.edges[e].bot.x
                    && self.edges[e_start].top.x != self.edges[e].bot.x
                {
                    self.edges[e].reverse_horizontal();
                }
            } else if self.edges[e_start].bot.x != self.edges[e].bot.x {
                self.edges[e].reverse_horizontal();
            }
        }

        let e_start = e;
        if next_is_forward {
            loop {
                let next = self.edges[result].next;
                if self.edges[result].top.y != self.edges[next].bot.y
                    || self.edges[next].out_idx == SKIP
                {
                    break;
                }
                result = next;
            }
            if self.edges[result].is_horizontal()
                && self.edges[self.edges[result].next].out_idx != SKIP
            {
                // at the top of a bound, horizontals join the bound only
                // when the preceding edge attaches to their left vertex
                let mut horz = result;
                while self.edges[self.edges[horz].prev].is_horizontal() {
                    horz = self.edges[horz].prev;
                }
                let horz_prev = self.edges[horz].prev;
                if self.edges[horz_prev].top.x > self.edges[self.edges[result].next].top.x {
                    result = horz_prev;
                }
            }
            while e != result {
                let next = self.edges[e].next;
                self.edges[e].next_in_lml = Some(next);
                if self.edges[e].is_horizontal()
                    && e != e_start
                    && self.edges[e].bot.x != self.edges[self.edges[e].prev].top.x
                {
                    self.edges[e].reverse_horizontal();
                }
                e = next;
            }
            if self.edges[e].is_horizontal()
                && e != e_start
                && self.edges[e].bot.x != self.edges[self.edges[e].prev].top.x
            {
                self.edges[e].reverse_horizontal();
            }
            result = self.edges[result].next; // just beyond the bound
        } else {
            loop {
                let prev = self.edges[result].prev;
                if self.edges[result].top.y != self.edges[prev].bot.y
                    || self.edges[prev].out_idx == SKIP
                {
                    break;
                }
                result = prev;
            }
            if self.edges[result].is_horizontal()
                && self.edges[self.edges[result].prev].out_idx != SKIP
            {
                let mut horz = result;
                while self.edges[self.edges[horz].next].is_horizontal() {
                    horz = self.edges[horz].next;
                }
                let horz_next = self.edges[horz].next;
                let result_prev = self.edges[result].prev;
                if self.edges[horz_next].top.x >= self.edges[result_prev].top.x {
                    result = horz_next;
                }
            }
            while e != result {
                let prev = self.edges[e].prev;
                self.edges[e].next_in_lml = Some(prev);
                if self.edges[e].is_horizontal()
                    && e != e_start
                    && self.edges[e].bot.x != self.edges[self.edges[e].next].top.x
                {
                    self.edges[e].reverse_horizontal();
                }
                e = prev;
            }
            if self.edges[e].is_horizontal()
                && e != e_start
                && self.edges[e].bot.x != self.edges[self.edges[e].next].top.x
            {
                self.edges[e].reverse_horizontal();
            }
            result = self.edges[result].prev; // just beyond the bound
        }
        result
    }

    /// Restores the sweep to its starting state without discarding the
    /// added paths, so a clip can run again.
    pub(crate) fn reset(&mut self) {
        self.current_lm = 0;
        self.active_edges = None;
        self.scanbeam.clear();
        if self.minima.is_empty() {
            return;
        }
        self.minima.sort_by(|a, b| b.y.cmp(&a.y));
        for i in 0..self.minima.len() {
            let lm = self.minima[i].clone();
            self.insert_scanbeam(lm.y);
            if let Some(e) = lm.left_bound {
                self.edges[e].curr = self.edges[e].bot;
                self.edges[e].side = Side::Left;
                self.edges[e].out_idx = UNASSIGNED;
            }
            if let Some(e) = lm.right_bound {
                self.edges[e].curr = self.edges[e].bot;
                self.edges[e].side = Side::Right;
                self.edges[e].out_idx = UNASSIGNED;
            }
        }
    }

    #[inline]
    pub(crate) fn insert_scanbeam(&mut self, y: CInt) {
        self.scanbeam.push(y);
    }

    /// Pops the next (largest remaining) scanbeam y, collapsing
    /// duplicates.
    pub(crate) fn pop_scanbeam(&mut self) -> Option<CInt> {
        let y = self.scanbeam.pop()?;
        while self.scanbeam.peek() == Some(&y) {
            self.scanbeam.pop();
        }
        Some(y)
    }

    #[inline]
    pub(crate) fn local_minima_pending(&self) -> bool {
        self.current_lm < self.minima.len()
    }

    /// Consumes the next local minimum when it sits exactly at `y`.
    pub(crate) fn pop_local_minima(&mut self, y: CInt) -> Option<LocalMin> {
        if self.current_lm >= self.minima.len() || self.minima[self.current_lm].y != y {
            return None;
        }
        let lm = self.minima[self.current_lm].clone();
        self.current_lm += 1;
        Some(lm)
    }

    pub(crate) fn create_out_rec(&mut self) -> OutRecId {
        let idx = self.poly_outs.len();
        self.poly_outs.push(OutRec::new(idx));
        idx
    }

    pub(crate) fn dispose_all_out_recs(&mut self) {
        self.poly_outs.clear();
        self.out_pts.clear();
    }

    pub(crate) fn delete_from_ael(&mut self, e: EdgeId) {
        let ael_prev = self.edges[e].prev_in_ael;
        let ael_next = self.edges[e].next_in_ael;
        if ael_prev.is_none() && ael_next.is_none() && self.active_edges != Some(e) {
            return; // already deleted
        }
        match ael_prev {
            Some(p) => self.edges[p].next_in_ael = ael_next,
            None => self.active_edges = ael_next,
        }
        if let Some(n) = ael_next {
            self.edges[n].prev_in_ael = ael_prev;
        }
        self.edges[e].next_in_ael = None;
        self.edges[e].prev_in_ael = None;
    }

    /// Replaces an edge that reached its top with its successor in the
    /// bound, splicing the successor into the same AEL slot.
    pub(crate) fn update_edge_into_ael(&mut self, e: EdgeId) -> Result<EdgeId, ClipError> {
        let next_lml = self.edges[e]
            .next_in_lml
            .ok_or_else(|| ClipError::Internal("no successor edge in bound".into()))?;

        self.edges[next_lml].out_idx = self.edges[e].out_idx;
        let ael_prev = self.edges[e].prev_in_ael;
        let ael_next = self.edges[e].next_in_ael;
        match ael_prev {
            Some(p) => self.edges[p].next_in_ael = Some(next_lml),
            None => self.active_edges = Some(next_lml),
        }
        if let Some(n) = ael_next {
            self.edges[n].prev_in_ael = Some(next_lml);
        }
        self.edges[next_lml].side = self.edges[e].side;
        self.edges[next_lml].wind_delta = self.edges[e].wind_delta;
        self.edges[next_lml].wind_cnt = self.edges[e].wind_cnt;
        self.edges[next_lml].wind_cnt2 = self.edges[e].wind_cnt2;
        self.edges[next_lml].curr = self.edges[next_lml].bot;
        self.edges[next_lml].prev_in_ael = ael_prev;
        self.edges[next_lml].next_in_ael = ael_next;
        if !self.edges[next_lml].is_horizontal() {
            let top_y = self.edges[next_lml].top.y;
            self.insert_scanbeam(top_y);
        }
        Ok(next_lml)
    }

    pub(crate) fn swap_positions_in_ael(&mut self, edge1: EdgeId, edge2: EdgeId) {
        // either edge may have already been removed from the list
        if self.edges[edge1].next_in_ael == self.edges[edge1].prev_in_ael
            || self.edges[edge2].next_in_ael == self.edges[edge2].prev_in_ael
        {
            return;
        }
        if self.edges[edge1].next_in_ael == Some(edge2) {
            let next = self.edges[edge2].next_in_ael;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(edge1);
            }
            let prev = self.edges[edge1].prev_in_ael;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(edge2);
            }
            self.edges[edge2].prev_in_ael = prev;
            self.edges[edge2].next_in_ael = Some(edge1);
            self.edges[edge1].prev_in_ael = Some(edge2);
            self.edges[edge1].next_in_ael = next;
        } else if self.edges[edge2].next_in_ael == Some(edge1) {
            let next = self.edges[edge1].next_in_ael;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(edge2);
            }
            let prev = self.edges[edge2].prev_in_ael;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(edge1);
            }
            self.edges[edge1].prev_in_ael = prev;
            self.edges[edge1].next_in_ael = Some(edge2);
            self.edges[edge2].prev_in_ael = Some(edge1);
            self.edges[edge2].next_in_ael = next;
        } else {
            let next = self.edges[edge1].next_in_ael;
            let prev = self.edges[edge1].prev_in_ael;
            self.edges[edge1].next_in_ael = self.edges[edge2].next_in_ael;
            if let Some(n) = self.edges[edge1].next_in_ael {
                self.edges[n].prev_in_ael = Some(edge1);
            }
            self.edges[edge1].prev_in_ael = self.edges[edge2].prev_in_ael;
            if let Some(p) = self.edges[edge1].prev_in_ael {
                self.edges[p].next_in_ael = Some(edge1);
            }
            self.edges[edge2].next_in_ael = next;
            if let Some(n) = next {
                self.edges[n].prev_in_ael = Some(edge2);
            }
            self.edges[edge2].prev_in_ael = prev;
            if let Some(p) = prev {
                self.edges[p].next_in_ael = Some(edge2);
            }
        }
        if self.edges[edge1].prev_in_ael.is_none() {
            self.active_edges = Some(edge1);
        } else if self.edges[edge2].prev_in_ael.is_none() {
            self.active_edges = Some(edge2);
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(s: CInt) -> Vec<IntPoint> {
        vec![
            IntPoint::new(0, 0),
            IntPoint::new(s, 0),
            IntPoint::new(s, s),
            IntPoint::new(0, s),
        ]
    }

    #[test]
    fn test_add_path_rejects_degenerates() {
        let mut base = ClipperBase::new();
        assert_eq!(
            base.add_path(&[], PolyType::Subject, true),
            Err(ClipError::DegeneratePath)
        );
        assert_eq!(
            base.add_path(
                &[IntPoint::new(0, 0), IntPoint::new(5, 5)],
                PolyType::Subject,
                true
            ),
            Err(ClipError::DegeneratePath)
        );
        // all points identical
        assert_eq!(
            base.add_path(
                &[IntPoint::new(3, 3), IntPoint::new(3, 3), IntPoint::new(3, 3)],
                PolyType::Subject,
                true
            ),
            Err(ClipError::DegeneratePath)
        );
        assert!(base.minima.is_empty());
        assert!(base.edges.is_empty());
    }

    #[test]
    fn test_add_path_rejects_open_clip() {
        let mut base = ClipperBase::new();
        assert_eq!(
            base.add_path(
                &[IntPoint::new(0, 0), IntPoint::new(5, 5)],
                PolyType::Clip,
                false
            ),
            Err(ClipError::OpenPathAsClip)
        );
    }

    #[cfg(not(feature = "coord32"))]
    #[test]
    fn test_add_path_range_limits() {
        let mut base = ClipperBase::new();
        // HI_RANGE itself is the last legal coordinate
        let legal = vec![
            IntPoint::new(0, 0),
            IntPoint::new(10, 0),
            IntPoint::new(10, HI_RANGE),
        ];
        assert!(base.add_path(&legal, PolyType::Subject, true).is_ok());
        assert!(base.use_full_range);

        let bad = vec![
            IntPoint::new(0, 0),
            IntPoint::new(10, 0),
            IntPoint::new(10, HI_RANGE + 1),
        ];
        assert_eq!(
            base.add_path(&bad, PolyType::Subject, true),
            Err(ClipError::CoordinateOutOfRange)
        );
    }

    #[test]
    fn test_square_yields_one_local_minimum() {
        let mut base = ClipperBase::new();
        base.add_path(&square(10), PolyType::Subject, true).unwrap();
        assert_eq!(base.minima.len(), 1);
        let lm = &base.minima[0];
        // the local minimum sits at the bottom (largest y)
        assert_eq!(lm.y, 10);
        assert!(lm.left_bound.is_some());
        assert!(lm.right_bound.is_some());
    }

    #[test]
    fn test_flat_closed_path_is_rejected() {
        let mut base = ClipperBase::new();
        let flat = vec![
            IntPoint::new(0, 5),
            IntPoint::new(10, 5),
            IntPoint::new(20, 5),
        ];
        assert_eq!(
            base.add_path(&flat, PolyType::Subject, true),
            Err(ClipError::DegeneratePath)
        );
    }

    #[test]
    fn test_flat_open_path_is_accepted() {
        let mut base = ClipperBase::new();
        let flat = vec![IntPoint::new(0, 5), IntPoint::new(20, 5)];
        base.add_path(&flat, PolyType::Subject, false).unwrap();
        assert!(base.has_open_paths);
        assert_eq!(base.minima.len(), 1);
        assert!(base.minima[0].left_bound.is_none());
    }

    #[test]
    fn test_collinear_vertices_are_merged() {
        let mut base = ClipperBase::new();
        let path = vec![
            IntPoint::new(0, 0),
            IntPoint::new(5, 0), // collinear
            IntPoint::new(10, 0),
            IntPoint::new(10, 10),
            IntPoint::new(0, 10),
        ];
        base.add_path(&path, PolyType::Subject, true).unwrap();
        let b = base.bounds();
        assert_eq!(b, IntRect::new(0, 0, 10, 10));
        // with preserve_collinear the middle vertex survives; either way
        // the bounds are identical
        let mut keep = ClipperBase::new();
        keep.set_preserve_collinear(true);
        keep.add_path(&path, PolyType::Subject, true).unwrap();
        assert_eq!(keep.bounds(), b);
    }

    #[test]
    fn test_bounds_of_two_paths() {
        let mut base = ClipperBase::new();
        base.add_path(&square(10), PolyType::Subject, true).unwrap();
        base.add_path(&translate(&square(4), 20, -6), PolyType::Clip, true)
            .unwrap();
        assert_eq!(base.bounds(), IntRect::new(0, -6, 24, 10));
    }

    fn translate(p: &[IntPoint], dx: CInt, dy: CInt) -> Vec<IntPoint> {
        p.iter()
            .map(|q| IntPoint::new(q.x + dx, q.y + dy))
            .collect()
    }

    #[test]
    fn test_reset_allows_reuse() {
        let mut base = ClipperBase::new();
        base.add_path(&square(10), PolyType::Subject, true).unwrap();
        base.reset();
        assert_eq!(base.pop_scanbeam(), Some(10));
        assert_eq!(base.pop_scanbeam(), None);
        base.reset();
        assert_eq!(base.pop_scanbeam(), Some(10));
    }

    #[test]
    fn test_scanbeam_pops_descending_and_dedupes() {
        let mut base = ClipperBase::new();
        base.insert_scanbeam(3);
        base.insert_scanbeam(9);
        base.insert_scanbeam(9);
        base.insert_scanbeam(7);
        assert_eq!(base.pop_scanbeam(), Some(9));
        assert_eq!(base.pop_scanbeam(), Some(7));
        assert_eq!(base.pop_scanbeam(), Some(3));
        assert_eq!(base.pop_scanbeam(), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut base = ClipperBase::new();
        base.add_path(&square(10), PolyType::Subject, true).unwrap();
        base.clear();
        assert!(base.edges.is_empty());
        assert!(base.minima.is_empty());
        assert_eq!(base.bounds(), IntRect::default());
    }
}
