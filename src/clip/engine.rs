//! The Vatti sweep.
//!
//! [`Clipper`] runs a single top-to-bottom sweep over the local minima
//! prepared by [`ClipperBase`]: bounds enter the active edge list at
//! their minima, winding counts decide which edges contribute, edge
//! crossings are resolved in strict order inside each scanbeam, and
//! contributing edges grow output rings. Deferred joins stitch rings
//! that share collinear horizontal segments once the sweep completes.

use crate::clip::base::ClipperBase;
use crate::clip::edge::{
    horz_segments_overlap, intersect_point, Direction, Edge, EdgeId, Side, SKIP, UNASSIGNED,
};
use crate::clip::out::{
    dup_out_pt, get_bottom_pt, point_count, reverse_ring, ring2_contains_ring1, ring_area, OutPt,
    OutPtId, OutRecId,
};
use crate::clip::{ClipType, PolyFillType, PolyType};
use crate::error::ClipError;
use crate::path::{pt2_between_pt1_and_pt3, slopes_equal3, slopes_equal4, Paths};
use crate::primitives::{CInt, IntPoint, IntRect};
use crate::tree::PolyTree;

/// Fills the z member of an intersection point from the four endpoints
/// of the two edges that crossed there.
#[cfg(feature = "xyz")]
pub type ZFillCallback =
    Box<dyn Fn(IntPoint, IntPoint, IntPoint, IntPoint, &mut IntPoint)>;

#[derive(Debug, Clone)]
struct IntersectNode {
    edge1: EdgeId,
    edge2: EdgeId,
    pt: IntPoint,
}

/// A deferred ring join: two output points plus an offset point that
/// disambiguates which side of a collinear overlap to keep.
#[derive(Debug, Clone)]
struct Join {
    out_pt1: OutPtId,
    out_pt2: OutPtId,
    off_pt: IntPoint,
}

/// Executes boolean operations over the paths added to it.
///
/// One instance may be reused: `execute` can run repeatedly (with or
/// without further `add_path` calls), and `clear` drops all inputs.
/// See the [module docs](crate::clip) for a usage example.
pub struct Clipper {
    base: ClipperBase,
    clip_type: ClipType,
    subj_fill: PolyFillType,
    clip_fill: PolyFillType,
    /// Head of the sorted edge list reused by horizontal and
    /// intersection processing.
    sorted_edges: Option<EdgeId>,
    maxima: Vec<CInt>,
    intersections: Vec<IntersectNode>,
    joins: Vec<Join>,
    ghost_joins: Vec<Join>,
    using_tree: bool,
    reverse_output: bool,
    strict_simple: bool,
    #[cfg(feature = "xyz")]
    z_fill: Option<ZFillCallback>,
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipper {
    pub fn new() -> Self {
        Clipper {
            base: ClipperBase::new(),
            clip_type: ClipType::Intersection,
            subj_fill: PolyFillType::EvenOdd,
            clip_fill: PolyFillType::EvenOdd,
            sorted_edges: None,
            maxima: Vec::new(),
            intersections: Vec::new(),
            joins: Vec::new(),
            ghost_joins: Vec::new(),
            using_tree: false,
            reverse_output: false,
            strict_simple: false,
            #[cfg(feature = "xyz")]
            z_fill: None,
        }
    }

    /// When set, output polygons have their conventional orientations
    /// reversed.
    pub fn reverse_solution(&self) -> bool {
        self.reverse_output
    }

    pub fn set_reverse_solution(&mut self, value: bool) {
        self.reverse_output = value;
    }

    /// When set, output polygons are split at self-touching vertices so
    /// every ring is strictly simple.
    pub fn strictly_simple(&self) -> bool {
        self.strict_simple
    }

    pub fn set_strictly_simple(&mut self, value: bool) {
        self.strict_simple = value;
    }

    pub fn preserve_collinear(&self) -> bool {
        self.base.preserve_collinear()
    }

    pub fn set_preserve_collinear(&mut self, value: bool) {
        self.base.set_preserve_collinear(value);
    }

    /// Installs (or removes) the callback assigning `z` at emitted
    /// intersection points.
    #[cfg(feature = "xyz")]
    pub fn set_z_fill(&mut self, callback: Option<ZFillCallback>) {
        self.z_fill = callback;
    }

    /// Adds one subject or clip path. See [`ClipperBase::add_path`].
    pub fn add_path(
        &mut self,
        path: &[IntPoint],
        poly_type: PolyType,
        closed: bool,
    ) -> Result<(), ClipError> {
        self.base.add_path(path, poly_type, closed)
    }

    pub fn add_paths(
        &mut self,
        paths: &[Vec<IntPoint>],
        poly_type: PolyType,
        closed: bool,
    ) -> Result<(), ClipError> {
        self.base.add_paths(paths, poly_type, closed)
    }

    pub fn clear(&mut self) {
        self.base.clear();
    }

    pub fn bounds(&self) -> IntRect {
        self.base.bounds()
    }

    /// Runs the clip and returns the solution as flat closed paths.
    ///
    /// Inputs containing open paths must use
    /// [`execute_tree`](Self::execute_tree) instead, since flat paths
    /// cannot mark open output.
    pub fn execute(
        &mut self,
        clip_type: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> Result<Paths, ClipError> {
        if self.base.has_open_paths {
            return Err(ClipError::OpenPathsRequireTree);
        }
        self.clip_type = clip_type;
        self.subj_fill = subj_fill;
        self.clip_fill = clip_fill;
        self.using_tree = false;
        let outcome = self.execute_internal().map(|()| self.build_result());
        self.base.dispose_all_out_recs();
        outcome
    }

    /// Runs the clip and returns the solution as a nested tree of
    /// outlines and holes. Open subject paths come back as open nodes
    /// at the root.
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        subj_fill: PolyFillType,
        clip_fill: PolyFillType,
    ) -> Result<PolyTree, ClipError> {
        self.clip_type = clip_type;
        self.subj_fill = subj_fill;
        self.clip_fill = clip_fill;
        self.using_tree = true;
        let outcome = match self.execute_internal() {
            Ok(()) => self.build_tree(),
            Err(e) => Err(e),
        };
        self.base.dispose_all_out_recs();
        outcome
    }

    // ------------------------------------------------------------------
    // sweep driver
    // ------------------------------------------------------------------

    fn execute_internal(&mut self) -> Result<(), ClipError> {
        let swept = self.sweep();
        if swept.is_ok() {
            for i in 0..self.base.poly_outs.len() {
                let rec = &self.base.poly_outs[i];
                let Some(pts) = rec.pts else { continue };
                if rec.is_open {
                    continue;
                }
                if (rec.is_hole ^ self.reverse_output)
                    == (ring_area(&self.base.out_pts, pts) > 0.0)
                {
                    reverse_ring(&mut self.base.out_pts, pts);
                }
            }
            if !self.joins.is_empty() {
                self.join_common_edges()?;
            }
            // ring cleanup has to run after the joins are resolved
            for i in 0..self.base.poly_outs.len() {
                if self.base.poly_outs[i].pts.is_none() {
                    continue;
                }
                if self.base.poly_outs[i].is_open {
                    self.fixup_out_polyline(i);
                } else {
                    self.fixup_out_polygon(i);
                }
            }
            if self.strict_simple {
                self.do_simple_polygons()?;
            }
        }
        self.joins.clear();
        self.ghost_joins.clear();
        swept
    }

    fn sweep(&mut self) -> Result<(), ClipError> {
        self.base.reset();
        self.maxima.clear();
        self.sorted_edges = None;
        self.intersections.clear();
        self.joins.clear();
        self.ghost_joins.clear();

        // nothing added is a successful empty clip
        let Some(mut bot_y) = self.base.pop_scanbeam() else {
            return Ok(());
        };
        self.insert_local_minima(bot_y)?;
        loop {
            let top_y = match self.base.pop_scanbeam() {
                Some(y) => y,
                None if self.base.local_minima_pending() => {
                    return Err(ClipError::Internal(
                        "scanbeam exhausted with local minima pending".into(),
                    ));
                }
                None => break,
            };
            self.process_horizontals()?;
            self.ghost_joins.clear();
            self.process_intersections(top_y)?;
            self.process_edges_at_top(top_y)?;
            bot_y = top_y;
            self.insert_local_minima(bot_y)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // small accessors
    // ------------------------------------------------------------------

    #[inline]
    fn edge(&self, id: EdgeId) -> &Edge {
        &self.base.edges[id]
    }

    #[inline]
    fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.base.edges[id]
    }

    fn ring_start(&self, rec: OutRecId) -> Result<OutPtId, ClipError> {
        self.base.poly_outs[rec]
            .pts
            .ok_or_else(|| ClipError::Internal("output record lost its ring".into()))
    }

    #[cfg(feature = "xyz")]
    fn set_z(&self, pt: &mut IntPoint, e1: EdgeId, e2: EdgeId) {
        if pt.z != 0 || self.z_fill.is_none() {
            return;
        }
        let (e1b, e1t) = (self.edge(e1).bot, self.edge(e1).top);
        let (e2b, e2t) = (self.edge(e2).bot, self.edge(e2).top);
        if *pt == e1b {
            pt.z = e1b.z;
        } else if *pt == e1t {
            pt.z = e1t.z;
        } else if *pt == e2b {
            pt.z = e2b.z;
        } else if *pt == e2t {
            pt.z = e2t.z;
        } else if let Some(cb) = &self.z_fill {
            cb(e1b, e1t, e2b, e2t, pt);
        }
    }

    // ------------------------------------------------------------------
    // AEL / SEL insertion
    // ------------------------------------------------------------------

    fn e2_inserts_before_e1(&self, e1: EdgeId, e2: EdgeId) -> bool {
        let (a, b) = (self.edge(e1), self.edge(e2));
        if b.curr.x == a.curr.x {
            if b.top.y > a.top.y {
                b.top.x < a.top_x(b.top.y)
            } else {
                a.top.x > b.top_x(a.top.y)
            }
        } else {
            b.curr.x < a.curr.x
        }
    }

    fn insert_edge_into_ael(&mut self, edge: EdgeId, start: Option<EdgeId>) {
        self.edge_mut(edge).prev_in_ael = None;
        self.edge_mut(edge).next_in_ael = None;
        let Some(head) = self.base.active_edges else {
            self.base.active_edges = Some(edge);
            return;
        };
        if start.is_none() && self.e2_inserts_before_e1(head, edge) {
            self.edge_mut(edge).next_in_ael = Some(head);
            self.edge_mut(head).prev_in_ael = Some(edge);
            self.base.active_edges = Some(edge);
        } else {
            let mut after = start.unwrap_or(head);
            while let Some(next) = self.edge(after).next_in_ael {
                if self.e2_inserts_before_e1(next, edge) {
                    break;
                }
                after = next;
            }
            let next = self.edge(after).next_in_ael;
            self.edge_mut(edge).next_in_ael = next;
            if let Some(n) = next {
                self.edge_mut(n).prev_in_ael = Some(edge);
            }
            self.edge_mut(edge).prev_in_ael = Some(after);
            self.edge_mut(after).next_in_ael = Some(edge);
        }
    }

    fn add_edge_to_sel(&mut self, edge: EdgeId) {
        let head = self.sorted_edges;
        self.edge_mut(edge).prev_in_sel = None;
        self.edge_mut(edge).next_in_sel = head;
        if let Some(h) = head {
            self.edge_mut(h).prev_in_sel = Some(edge);
        }
        self.sorted_edges = Some(edge);
    }

    fn pop_edge_from_sel(&mut self) -> Option<EdgeId> {
        let e = self.sorted_edges?;
        let next = self.edge(e).next_in_sel;
        self.sorted_edges = next;
        if let Some(n) = next {
            self.edge_mut(n).prev_in_sel = None;
        }
        self.edge_mut(e).next_in_sel = None;
        self.edge_mut(e).prev_in_sel = None;
        Some(e)
    }

    fn copy_ael_to_sel(&mut self) {
        self.sorted_edges = self.base.active_edges;
        let mut e_opt = self.base.active_edges;
        while let Some(e) = e_opt {
            let (prev, next) = (self.edge(e).prev_in_ael, self.edge(e).next_in_ael);
            self.edge_mut(e).prev_in_sel = prev;
            self.edge_mut(e).next_in_sel = next;
            e_opt = next;
        }
    }

    fn delete_from_sel(&mut self, e: EdgeId) {
        let prev = self.edge(e).prev_in_sel;
        let next = self.edge(e).next_in_sel;
        if prev.is_none() && next.is_none() && self.sorted_edges != Some(e) {
            return; // already deleted
        }
        match prev {
            Some(p) => self.edge_mut(p).next_in_sel = next,
            None => self.sorted_edges = next,
        }
        if let Some(n) = next {
            self.edge_mut(n).prev_in_sel = prev;
        }
        self.edge_mut(e).next_in_sel = None;
        self.edge_mut(e).prev_in_sel = None;
    }

    fn swap_positions_in_sel(&mut self, edge1: EdgeId, edge2: EdgeId) {
        if self.edge(edge1).next_in_sel.is_none() && self.edge(edge1).prev_in_sel.is_none() {
            return;
        }
        if self.edge(edge2).next_in_sel.is_none() && self.edge(edge2).prev_in_sel.is_none() {
            return;
        }
        if self.edge(edge1).next_in_sel == Some(edge2) {
            let next = self.edge(edge2).next_in_sel;
            if let Some(n) = next {
                self.edge_mut(n).prev_in_sel = Some(edge1);
            }
            let prev = self.edge(edge1).prev_in_sel;
            if let Some(p) = prev {
                self.edge_mut(p).next_in_sel = Some(edge2);
            }
            self.edge_mut(edge2).prev_in_sel = prev;
            self.edge_mut(edge2).next_in_sel = Some(edge1);
            self.edge_mut(edge1).prev_in_sel = Some(edge2);
            self.edge_mut(edge1).next_in_sel = next;
        } else if self.edge(edge2).next_in_sel == Some(edge1) {
            let next = self.edge(edge1).next_in_sel;
            if let Some(n) = next {
                self.edge_mut(n).prev_in_sel = Some(edge2);
            }
            let prev = self.edge(edge2).prev_in_sel;
            if let Some(p) = prev {
                self.edge_mut(p).next_in_sel = Some(edge1);
            }
            self.edge_mut(edge1).prev_in_sel = prev;
            self.edge_mut(edge1).next_in_sel = Some(edge2);
            self.edge_mut(edge2).prev_in_sel = Some(edge1);
            self.edge_mut(edge2).next_in_sel = next;
        } else {
            let next = self.edge(edge1).next_in_sel;
            let prev = self.edge(edge1).prev_in_sel;
            let e2_next = self.edge(edge2).next_in_sel;
            let e2_prev = self.edge(edge2).prev_in_sel;
            self.edge_mut(edge1).next_in_sel = e2_next;
            if let Some(n) = e2_next {
                self.edge_mut(n).prev_in_sel = Some(edge1);
            }
            self.edge_mut(edge1).prev_in_sel = e2_prev;
            if let Some(p) = e2_prev {
                self.edge_mut(p).next_in_sel = Some(edge1);
            }
            self.edge_mut(edge2).next_in_sel = next;
            if let Some(n) = next {
                self.edge_mut(n).prev_in_sel = Some(edge2);
            }
            self.edge_mut(edge2).prev_in_sel = prev;
            if let Some(p) = prev {
                self.edge_mut(p).next_in_sel = Some(edge2);
            }
        }
        if self.edge(edge1).prev_in_sel.is_none() {
            self.sorted_edges = Some(edge1);
        } else if self.edge(edge2).prev_in_sel.is_none() {
            self.sorted_edges = Some(edge2);
        }
    }

    // ------------------------------------------------------------------
    // winding counts and contribution
    // ------------------------------------------------------------------

    fn fill_type_of(&self, e: EdgeId) -> PolyFillType {
        match self.edge(e).poly_type {
            PolyType::Subject => self.subj_fill,
            PolyType::Clip => self.clip_fill,
        }
    }

    fn alt_fill_type_of(&self, e: EdgeId) -> PolyFillType {
        match self.edge(e).poly_type {
            PolyType::Subject => self.clip_fill,
            PolyType::Clip => self.subj_fill,
        }
    }

    fn is_even_odd_fill_type(&self, e: EdgeId) -> bool {
        self.fill_type_of(e) == PolyFillType::EvenOdd
    }

    fn is_even_odd_alt_fill_type(&self, e: EdgeId) -> bool {
        self.alt_fill_type_of(e) == PolyFillType::EvenOdd
    }

    fn set_winding_count(&mut self, edge: EdgeId) {
        // find the nearest AEL edge of the same poly type to the left
        let mut e = self.edge(edge).prev_in_ael;
        while let Some(id) = e {
            if self.edge(id).poly_type == self.edge(edge).poly_type
                && self.edge(id).wind_delta != 0
            {
                break;
            }
            e = self.edge(id).prev_in_ael;
        }

        let scan_from;
        match e {
            None => {
                if self.edge(edge).wind_delta == 0 {
                    let pft = self.fill_type_of(edge);
                    self.edge_mut(edge).wind_cnt =
                        if pft == PolyFillType::Negative { -1 } else { 1 };
                } else {
                    let wd = self.edge(edge).wind_delta;
                    self.edge_mut(edge).wind_cnt = wd;
                }
                self.edge_mut(edge).wind_cnt2 = 0;
                scan_from = self.base.active_edges;
            }
            Some(prev) if self.edge(edge).wind_delta == 0 && self.clip_type != ClipType::Union => {
                self.edge_mut(edge).wind_cnt = 1;
                let wc2 = self.edge(prev).wind_cnt2;
                self.edge_mut(edge).wind_cnt2 = wc2;
                scan_from = self.edge(prev).next_in_ael;
            }
            Some(prev) if self.is_even_odd_fill_type(edge) => {
                if self.edge(edge).wind_delta == 0 {
                    // decide whether the open edge starts inside closed
                    // polygons of its own type
                    let mut inside = true;
                    let mut e2 = self.edge(prev).prev_in_ael;
                    while let Some(id) = e2 {
                        if self.edge(id).poly_type == self.edge(prev).poly_type
                            && self.edge(id).wind_delta != 0
                        {
                            inside = !inside;
                        }
                        e2 = self.edge(id).prev_in_ael;
                    }
                    self.edge_mut(edge).wind_cnt = if inside { 0 } else { 1 };
                } else {
                    let wd = self.edge(edge).wind_delta;
                    self.edge_mut(edge).wind_cnt = wd;
                }
                let wc2 = self.edge(prev).wind_cnt2;
                self.edge_mut(edge).wind_cnt2 = wc2;
                scan_from = self.edge(prev).next_in_ael;
            }
            Some(prev) => {
                // NonZero, Positive or Negative filling
                let prev_cnt = self.edge(prev).wind_cnt;
                let prev_delta = self.edge(prev).wind_delta;
                let edge_delta = self.edge(edge).wind_delta;
                let wind_cnt = if prev_cnt * prev_delta < 0 {
                    // previous edge is 'decreasing' the count toward zero,
                    // so we are outside the previous polygon
                    if prev_cnt.abs() > 1 {
                        if prev_delta * edge_delta < 0 {
                            prev_cnt
                        } else {
                            prev_cnt + edge_delta
                        }
                    } else if edge_delta == 0 {
                        1
                    } else {
                        edge_delta
                    }
                } else {
                    // previous edge is 'increasing' the count away from
                    // zero, so we are inside the previous polygon
                    if edge_delta == 0 {
                        if prev_cnt < 0 {
                            prev_cnt - 1
                        } else {
                            prev_cnt + 1
                        }
                    } else if prev_delta * edge_delta < 0 {
                        prev_cnt
                    } else {
                        prev_cnt + edge_delta
                    }
                };
                self.edge_mut(edge).wind_cnt = wind_cnt;
                let wc2 = self.edge(prev).wind_cnt2;
                self.edge_mut(edge).wind_cnt2 = wc2;
                scan_from = self.edge(prev).next_in_ael;
            }
        }

        // accumulate wind_cnt2 from here up to the edge itself
        if self.is_even_odd_alt_fill_type(edge) {
            let mut e = scan_from;
            while e != Some(edge) {
                let Some(id) = e else { break };
                if self.edge(id).wind_delta != 0 {
                    let wc2 = self.edge(edge).wind_cnt2;
                    self.edge_mut(edge).wind_cnt2 = if wc2 == 0 { 1 } else { 0 };
                }
                e = self.edge(id).next_in_ael;
            }
        } else {
            let mut e = scan_from;
            while e != Some(edge) {
                let Some(id) = e else { break };
                let wd = self.edge(id).wind_delta;
                self.edge_mut(edge).wind_cnt2 += wd;
                e = self.edge(id).next_in_ael;
            }
        }
    }

    fn is_contributing(&self, edge: EdgeId) -> bool {
        let e = self.edge(edge);
        let pft = self.fill_type_of(edge);
        let pft2 = self.alt_fill_type_of(edge);

        match pft {
            PolyFillType::EvenOdd => {
                // an open line inside a polygon of its own type is not
                // a boundary
                if e.wind_delta == 0 && e.wind_cnt != 1 {
                    return false;
                }
            }
            PolyFillType::NonZero => {
                if e.wind_cnt.abs() != 1 {
                    return false;
                }
            }
            PolyFillType::Positive => {
                if e.wind_cnt != 1 {
                    return false;
                }
            }
            PolyFillType::Negative => {
                if e.wind_cnt != -1 {
                    return false;
                }
            }
        }

        match self.clip_type {
            ClipType::Intersection => match pft2 {
                PolyFillType::EvenOdd | PolyFillType::NonZero => e.wind_cnt2 != 0,
                PolyFillType::Positive => e.wind_cnt2 > 0,
                PolyFillType::Negative => e.wind_cnt2 < 0,
            },
            ClipType::Union => match pft2 {
                PolyFillType::EvenOdd | PolyFillType::NonZero => e.wind_cnt2 == 0,
                PolyFillType::Positive => e.wind_cnt2 <= 0,
                PolyFillType::Negative => e.wind_cnt2 >= 0,
            },
            ClipType::Difference => {
                if e.poly_type == PolyType::Subject {
                    match pft2 {
                        PolyFillType::EvenOdd | PolyFillType::NonZero => e.wind_cnt2 == 0,
                        PolyFillType::Positive => e.wind_cnt2 <= 0,
                        PolyFillType::Negative => e.wind_cnt2 >= 0,
                    }
                } else {
                    match pft2 {
                        PolyFillType::EvenOdd | PolyFillType::NonZero => e.wind_cnt2 != 0,
                        PolyFillType::Positive => e.wind_cnt2 > 0,
                        PolyFillType::Negative => e.wind_cnt2 < 0,
                    }
                }
            }
            ClipType::Xor => {
                if e.wind_delta == 0 {
                    // open lines still honor the other set's fill
                    match pft2 {
                        PolyFillType::EvenOdd | PolyFillType::NonZero => e.wind_cnt2 == 0,
                        PolyFillType::Positive => e.wind_cnt2 <= 0,
                        PolyFillType::Negative => e.wind_cnt2 >= 0,
                    }
                } else {
                    true
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // local minima insertion
    // ------------------------------------------------------------------

    fn insert_local_minima(&mut self, bot_y: CInt) -> Result<(), ClipError> {
        while let Some(lm) = self.base.pop_local_minima(bot_y) {
            let (lb, rb) = (lm.left_bound, lm.right_bound);

            let op1: Option<OutPtId> = match (lb, rb) {
                (None, None) => None,
                (None, Some(rb)) => {
                    self.insert_edge_into_ael(rb, None);
                    self.set_winding_count(rb);
                    if self.is_contributing(rb) {
                        let bot = self.edge(rb).bot;
                        Some(self.add_out_pt(rb, bot)?)
                    } else {
                        None
                    }
                }
                (Some(lb), None) => {
                    self.insert_edge_into_ael(lb, None);
                    self.set_winding_count(lb);
                    let op = if self.is_contributing(lb) {
                        let bot = self.edge(lb).bot;
                        Some(self.add_out_pt(lb, bot)?)
                    } else {
                        None
                    };
                    let top_y = self.edge(lb).top.y;
                    self.base.insert_scanbeam(top_y);
                    op
                }
                (Some(lb), Some(rb)) => {
                    self.insert_edge_into_ael(lb, None);
                    self.insert_edge_into_ael(rb, Some(lb));
                    self.set_winding_count(lb);
                    let (wc, wc2) = {
                        let e = self.edge(lb);
                        (e.wind_cnt, e.wind_cnt2)
                    };
                    self.edge_mut(rb).wind_cnt = wc;
                    self.edge_mut(rb).wind_cnt2 = wc2;
                    let op = if self.is_contributing(lb) {
                        let bot = self.edge(lb).bot;
                        Some(self.add_local_min_poly(lb, rb, bot)?)
                    } else {
                        None
                    };
                    let top_y = self.edge(lb).top.y;
                    self.base.insert_scanbeam(top_y);
                    op
                }
            };

            if let Some(rb) = rb {
                if self.edge(rb).is_horizontal() {
                    self.add_edge_to_sel(rb);
                    if let Some(next) = self.edge(rb).next_in_lml {
                        let y = self.edge(next).top.y;
                        self.base.insert_scanbeam(y);
                    }
                } else {
                    let y = self.edge(rb).top.y;
                    self.base.insert_scanbeam(y);
                }
            }

            let (Some(lb), Some(rb)) = (lb, rb) else {
                continue;
            };

            // overlapping horizontals recorded earlier become real joins
            if let Some(op1_id) = op1 {
                if self.edge(rb).is_horizontal()
                    && !self.ghost_joins.is_empty()
                    && self.edge(rb).wind_delta != 0
                {
                    let (rb_bot_x, rb_top_x) = {
                        let e = self.edge(rb);
                        (e.bot.x, e.top.x)
                    };
                    for i in 0..self.ghost_joins.len() {
                        let gj = self.ghost_joins[i].clone();
                        let gj_pt_x = self.base.out_pts[gj.out_pt1].pt.x;
                        if horz_segments_overlap(gj_pt_x, gj.off_pt.x, rb_bot_x, rb_top_x) {
                            self.joins.push(Join {
                                out_pt1: gj.out_pt1,
                                out_pt2: op1_id,
                                off_pt: gj.off_pt,
                            });
                        }
                    }
                }
            }

            if self.edge(lb).out_idx >= 0 {
                if let Some(prev) = self.edge(lb).prev_in_ael {
                    let join_wanted = {
                        let pe = self.edge(prev);
                        let le = self.edge(lb);
                        pe.curr.x == le.bot.x
                            && pe.out_idx >= 0
                            && pe.wind_delta != 0
                            && le.wind_delta != 0
                            && slopes_equal4(
                                pe.bot,
                                pe.top,
                                le.curr,
                                le.top,
                                self.base.use_full_range,
                            )
                    };
                    if join_wanted {
                        let bot = self.edge(lb).bot;
                        let top = self.edge(lb).top;
                        let op2 = self.add_out_pt(prev, bot)?;
                        if let Some(op1_id) = op1 {
                            self.joins.push(Join {
                                out_pt1: op1_id,
                                out_pt2: op2,
                                off_pt: top,
                            });
                        }
                    }
                }
            }

            if self.edge(lb).next_in_ael != Some(rb) {
                if self.edge(rb).out_idx >= 0 {
                    if let Some(rp) = self.edge(rb).prev_in_ael {
                        let join_wanted = {
                            let pe = self.edge(rp);
                            let re = self.edge(rb);
                            pe.out_idx >= 0
                                && pe.wind_delta != 0
                                && re.wind_delta != 0
                                && slopes_equal4(
                                    pe.curr,
                                    pe.top,
                                    re.curr,
                                    re.top,
                                    self.base.use_full_range,
                                )
                        };
                        if join_wanted {
                            let bot = self.edge(rb).bot;
                            let top = self.edge(rb).top;
                            let op2 = self.add_out_pt(rp, bot)?;
                            if let Some(op1_id) = op1 {
                                self.joins.push(Join {
                                    out_pt1: op1_id,
                                    out_pt2: op2,
                                    off_pt: top,
                                });
                            }
                        }
                    }
                }

                let mut e = self.edge(lb).next_in_ael;
                if e.is_some() {
                    let lb_curr = self.edge(lb).curr;
                    while let Some(id) = e {
                        if id == rb {
                            break;
                        }
                        // rb is to the right of id above the
                        // intersection, so the argument order matters
                        self.intersect_edges(rb, id, lb_curr)?;
                        e = self.edge(id).next_in_ael;
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // output points
    // ------------------------------------------------------------------

    fn add_out_pt(&mut self, e: EdgeId, pt: IntPoint) -> Result<OutPtId, ClipError> {
        if self.edge(e).out_idx < 0 {
            let rec = self.base.create_out_rec();
            let is_open = self.edge(e).wind_delta == 0;
            self.base.poly_outs[rec].is_open = is_open;
            let id = self.base.out_pts.len();
            self.base.out_pts.push(OutPt {
                idx: rec,
                pt,
                next: id,
                prev: id,
            });
            self.base.poly_outs[rec].pts = Some(id);
            if !is_open {
                self.set_hole_state(e, rec);
            }
            self.edge_mut(e).out_idx = rec as i32;
            Ok(id)
        } else {
            let rec = self.edge(e).out_idx as usize;
            // pts is the ring's left-most point, pts.prev the right-most
            let op = self.ring_start(rec)?;
            let to_front = self.edge(e).side == Side::Left;
            if to_front && pt == self.base.out_pts[op].pt {
                return Ok(op);
            }
            let op_prev = self.base.out_pts[op].prev;
            if !to_front && pt == self.base.out_pts[op_prev].pt {
                return Ok(op_prev);
            }
            let id = self.base.out_pts.len();
            self.base.out_pts.push(OutPt {
                idx: rec,
                pt,
                next: op,
                prev: op_prev,
            });
            self.base.out_pts[op_prev].next = id;
            self.base.out_pts[op].prev = id;
            if to_front {
                self.base.poly_outs[rec].pts = Some(id);
            }
            Ok(id)
        }
    }

    fn get_last_out_pt(&self, e: EdgeId) -> Result<OutPtId, ClipError> {
        let rec = self.edge(e).out_idx as usize;
        let start = self.ring_start(rec)?;
        Ok(if self.edge(e).side == Side::Left {
            start
        } else {
            self.base.out_pts[start].prev
        })
    }

    fn set_hole_state(&mut self, e: EdgeId, rec: OutRecId) {
        let mut e2 = self.edge(e).prev_in_ael;
        let mut e_tmp: Option<EdgeId> = None;
        while let Some(id) = e2 {
            if self.edge(id).out_idx >= 0 && self.edge(id).wind_delta != 0 {
                match e_tmp {
                    None => e_tmp = Some(id),
                    Some(t) if self.edge(t).out_idx == self.edge(id).out_idx => e_tmp = None,
                    _ => {}
                }
            }
            e2 = self.edge(id).prev_in_ael;
        }
        match e_tmp {
            None => {
                self.base.poly_outs[rec].first_left = None;
                self.base.poly_outs[rec].is_hole = false;
            }
            Some(t) => {
                let fl = self.edge(t).out_idx as usize;
                let fl_hole = self.base.poly_outs[fl].is_hole;
                self.base.poly_outs[rec].first_left = Some(fl);
                self.base.poly_outs[rec].is_hole = !fl_hole;
            }
        }
    }

    fn add_local_min_poly(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        pt: IntPoint,
    ) -> Result<OutPtId, ClipError> {
        let result;
        let e;
        let prev_e;
        if self.edge(e2).is_horizontal() || self.edge(e1).dx > self.edge(e2).dx {
            result = self.add_out_pt(e1, pt)?;
            let oi = self.edge(e1).out_idx;
            self.edge_mut(e2).out_idx = oi;
            self.edge_mut(e1).side = Side::Left;
            self.edge_mut(e2).side = Side::Right;
            e = e1;
            prev_e = if self.edge(e).prev_in_ael == Some(e2) {
                self.edge(e2).prev_in_ael
            } else {
                self.edge(e).prev_in_ael
            };
        } else {
            result = self.add_out_pt(e2, pt)?;
            let oi = self.edge(e2).out_idx;
            self.edge_mut(e1).out_idx = oi;
            self.edge_mut(e1).side = Side::Right;
            self.edge_mut(e2).side = Side::Left;
            e = e2;
            prev_e = if self.edge(e).prev_in_ael == Some(e1) {
                self.edge(e1).prev_in_ael
            } else {
                self.edge(e).prev_in_ael
            };
        }

        if let Some(p) = prev_e {
            let p_out = self.edge(p).out_idx;
            let p_top_y = self.edge(p).top.y;
            let e_top_y = self.edge(e).top.y;
            if p_out >= 0 && p_top_y < pt.y && e_top_y < pt.y {
                let x_prev = self.edge(p).top_x(pt.y);
                let x_e = self.edge(e).top_x(pt.y);
                let joinable = x_prev == x_e
                    && self.edge(e).wind_delta != 0
                    && self.edge(p).wind_delta != 0
                    && slopes_equal4(
                        IntPoint::new(x_prev, pt.y),
                        self.edge(p).top,
                        IntPoint::new(x_e, pt.y),
                        self.edge(e).top,
                        self.base.use_full_range,
                    );
                if joinable {
                    let off = self.edge(e).top;
                    let out_pt = self.add_out_pt(p, pt)?;
                    self.joins.push(Join {
                        out_pt1: result,
                        out_pt2: out_pt,
                        off_pt: off,
                    });
                }
            }
        }
        Ok(result)
    }

    fn add_local_max_poly(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        pt: IntPoint,
    ) -> Result<(), ClipError> {
        self.add_out_pt(e1, pt)?;
        if self.edge(e2).wind_delta == 0 {
            self.add_out_pt(e2, pt)?;
        }
        let o1 = self.edge(e1).out_idx;
        let o2 = self.edge(e2).out_idx;
        if o1 == o2 {
            self.edge_mut(e1).out_idx = UNASSIGNED;
            self.edge_mut(e2).out_idx = UNASSIGNED;
        } else if o1 < o2 {
            self.append_polygon(e1, e2)?;
        } else {
            self.append_polygon(e2, e1)?;
        }
        Ok(())
    }

    fn out_rec1_right_of_out_rec2(&self, mut r1: OutRecId, r2: OutRecId) -> bool {
        loop {
            match self.base.poly_outs[r1].first_left {
                Some(fl) => {
                    if fl == r2 {
                        return true;
                    }
                    r1 = fl;
                }
                None => return false,
            }
        }
    }

    fn get_out_rec(&self, mut idx: usize) -> OutRecId {
        while idx != self.base.poly_outs[idx].idx {
            idx = self.base.poly_outs[idx].idx;
        }
        idx
    }

    fn bottom_pt_of(&mut self, rec: OutRecId) -> Result<OutPtId, ClipError> {
        if let Some(b) = self.base.poly_outs[rec].bottom_pt {
            return Ok(b);
        }
        let pts = self.ring_start(rec)?;
        let b = get_bottom_pt(&self.base.out_pts, pts);
        self.base.poly_outs[rec].bottom_pt = Some(b);
        Ok(b)
    }

    /// Which of two ring fragments carries the correct hole state.
    fn get_lowermost_rec(&mut self, r1: OutRecId, r2: OutRecId) -> Result<OutRecId, ClipError> {
        let b1 = self.bottom_pt_of(r1)?;
        let b2 = self.bottom_pt_of(r2)?;
        let p1 = self.base.out_pts[b1].pt;
        let p2 = self.base.out_pts[b2].pt;
        Ok(if p1.y > p2.y {
            r1
        } else if p1.y < p2.y {
            r2
        } else if p1.x < p2.x {
            r1
        } else if p1.x > p2.x {
            r2
        } else if self.base.out_pts[b1].next == b1 {
            r2
        } else if self.base.out_pts[b2].next == b2 {
            r1
        } else if crate::clip::out::first_is_bottom_pt(&self.base.out_pts, b1, b2) {
            r1
        } else {
            r2
        })
    }

    fn append_polygon(&mut self, e1: EdgeId, e2: EdgeId) -> Result<(), ClipError> {
        let (o1, o2) = (self.edge(e1).out_idx, self.edge(e2).out_idx);
        if o1 < 0 || o2 < 0 {
            return Err(ClipError::Internal(
                "joining rings with an unassigned edge".into(),
            ));
        }
        let rec1 = o1 as usize;
        let rec2 = o2 as usize;

        let hole_state_rec = if self.out_rec1_right_of_out_rec2(rec1, rec2) {
            rec2
        } else if self.out_rec1_right_of_out_rec2(rec2, rec1) {
            rec1
        } else {
            self.get_lowermost_rec(rec1, rec2)?
        };

        let p1_lft = self.ring_start(rec1)?;
        let p1_rt = self.base.out_pts[p1_lft].prev;
        let p2_lft = self.ring_start(rec2)?;
        let p2_rt = self.base.out_pts[p2_lft].prev;

        let e1_side = self.edge(e1).side;
        let e2_side = self.edge(e2).side;
        if e1_side == Side::Left {
            if e2_side == Side::Left {
                // z y x a b c
                reverse_ring(&mut self.base.out_pts, p2_lft);
                self.base.out_pts[p2_lft].next = p1_lft;
                self.base.out_pts[p1_lft].prev = p2_lft;
                self.base.out_pts[p1_rt].next = p2_rt;
                self.base.out_pts[p2_rt].prev = p1_rt;
                self.base.poly_outs[rec1].pts = Some(p2_rt);
            } else {
                // x y z a b c
                self.base.out_pts[p2_rt].next = p1_lft;
                self.base.out_pts[p1_lft].prev = p2_rt;
                self.base.out_pts[p2_lft].prev = p1_rt;
                self.base.out_pts[p1_rt].next = p2_lft;
                self.base.poly_outs[rec1].pts = Some(p2_lft);
            }
        } else if e2_side == Side::Right {
            // a b c z y x
            reverse_ring(&mut self.base.out_pts, p2_lft);
            self.base.out_pts[p1_rt].next = p2_rt;
            self.base.out_pts[p2_rt].prev = p1_rt;
            self.base.out_pts[p2_lft].next = p1_lft;
            self.base.out_pts[p1_lft].prev = p2_lft;
        } else {
            // a b c x y z
            self.base.out_pts[p1_rt].next = p2_lft;
            self.base.out_pts[p2_lft].prev = p1_rt;
            self.base.out_pts[p1_lft].prev = p2_rt;
            self.base.out_pts[p2_rt].next = p1_lft;
        }

        self.base.poly_outs[rec1].bottom_pt = None;
        if hole_state_rec == rec2 {
            if self.base.poly_outs[rec2].first_left != Some(rec1) {
                let fl = self.base.poly_outs[rec2].first_left;
                self.base.poly_outs[rec1].first_left = fl;
            }
            let h = self.base.poly_outs[rec2].is_hole;
            self.base.poly_outs[rec1].is_hole = h;
        }
        self.base.poly_outs[rec2].pts = None;
        self.base.poly_outs[rec2].bottom_pt = None;
        self.base.poly_outs[rec2].first_left = Some(rec1);

        let ok_idx = self.edge(e1).out_idx;
        let obsolete_idx = self.edge(e2).out_idx;

        // safe because this is only reached via a local maximum
        self.edge_mut(e1).out_idx = UNASSIGNED;
        self.edge_mut(e2).out_idx = UNASSIGNED;

        let mut e_opt = self.base.active_edges;
        while let Some(id) = e_opt {
            if self.edge(id).out_idx == obsolete_idx {
                self.edge_mut(id).out_idx = ok_idx;
                self.edge_mut(id).side = e1_side;
                break;
            }
            e_opt = self.edge(id).next_in_ael;
        }

        let new_idx = self.base.poly_outs[rec1].idx;
        self.base.poly_outs[rec2].idx = new_idx;
        Ok(())
    }

    // ------------------------------------------------------------------
    // edge crossings
    // ------------------------------------------------------------------

    fn intersect_edges(
        &mut self,
        e1: EdgeId,
        e2: EdgeId,
        pt: IntPoint,
    ) -> Result<(), ClipError> {
        #[allow(unused_mut)]
        let mut pt = pt;
        #[cfg(feature = "xyz")]
        self.set_z(&mut pt, e1, e2);

        let e1_contributing = self.edge(e1).out_idx >= 0;
        let e2_contributing = self.edge(e2).out_idx >= 0;

        // open paths never toggle winding; they only switch output on
        // and off as they cross the other set's boundaries
        if self.edge(e1).wind_delta == 0 || self.edge(e2).wind_delta == 0 {
            if self.edge(e1).wind_delta == 0 && self.edge(e2).wind_delta == 0 {
                return Ok(());
            }
            if self.edge(e1).poly_type == self.edge(e2).poly_type
                && self.edge(e1).wind_delta != self.edge(e2).wind_delta
                && self.clip_type == ClipType::Union
            {
                if self.edge(e1).wind_delta == 0 {
                    if e2_contributing {
                        self.add_out_pt(e1, pt)?;
                        if e1_contributing {
                            self.edge_mut(e1).out_idx = UNASSIGNED;
                        }
                    }
                } else if e1_contributing {
                    self.add_out_pt(e2, pt)?;
                    if e2_contributing {
                        self.edge_mut(e2).out_idx = UNASSIGNED;
                    }
                }
            } else if self.edge(e1).poly_type != self.edge(e2).poly_type {
                if self.edge(e1).wind_delta == 0
                    && self.edge(e2).wind_cnt.abs() == 1
                    && (self.clip_type != ClipType::Union || self.edge(e2).wind_cnt2 == 0)
                {
                    self.add_out_pt(e1, pt)?;
                    if e1_contributing {
                        self.edge_mut(e1).out_idx = UNASSIGNED;
                    }
                } else if self.edge(e2).wind_delta == 0
                    && self.edge(e1).wind_cnt.abs() == 1
                    && (self.clip_type != ClipType::Union || self.edge(e1).wind_cnt2 == 0)
                {
                    self.add_out_pt(e2, pt)?;
                    if e2_contributing {
                        self.edge_mut(e2).out_idx = UNASSIGNED;
                    }
                }
            }
            return Ok(());
        }

        // update winding counts; e1 is to the right of e2 above the
        // intersection
        if self.edge(e1).poly_type == self.edge(e2).poly_type {
            if self.is_even_odd_fill_type(e1) {
                let old = self.edge(e1).wind_cnt;
                let other = self.edge(e2).wind_cnt;
                self.edge_mut(e1).wind_cnt = other;
                self.edge_mut(e2).wind_cnt = old;
            } else {
                let (c1, d1) = (self.edge(e1).wind_cnt, self.edge(e1).wind_delta);
                let (c2, d2) = (self.edge(e2).wind_cnt, self.edge(e2).wind_delta);
                self.edge_mut(e1).wind_cnt = if c1 + d2 == 0 { -c1 } else { c1 + d2 };
                self.edge_mut(e2).wind_cnt = if c2 - d1 == 0 { -c2 } else { c2 - d1 };
            }
        } else {
            let d1 = self.edge(e1).wind_delta;
            let d2 = self.edge(e2).wind_delta;
            if !self.is_even_odd_fill_type(e2) {
                self.edge_mut(e1).wind_cnt2 += d2;
            } else {
                let w = self.edge(e1).wind_cnt2;
                self.edge_mut(e1).wind_cnt2 = if w == 0 { 1 } else { 0 };
            }
            if !self.is_even_odd_fill_type(e1) {
                self.edge_mut(e2).wind_cnt2 -= d1;
            } else {
                let w = self.edge(e2).wind_cnt2;
                self.edge_mut(e2).wind_cnt2 = if w == 0 { 1 } else { 0 };
            }
        }

        let e1_fill = self.fill_type_of(e1);
        let e2_fill = self.fill_type_of(e2);
        let e1_fill2 = self.alt_fill_type_of(e1);
        let e2_fill2 = self.alt_fill_type_of(e2);

        let e1_wc = match e1_fill {
            PolyFillType::Positive => self.edge(e1).wind_cnt,
            PolyFillType::Negative => -self.edge(e1).wind_cnt,
            _ => self.edge(e1).wind_cnt.abs(),
        };
        let e2_wc = match e2_fill {
            PolyFillType::Positive => self.edge(e2).wind_cnt,
            PolyFillType::Negative => -self.edge(e2).wind_cnt,
            _ => self.edge(e2).wind_cnt.abs(),
        };

        if e1_contributing && e2_contributing {
            if (e1_wc != 0 && e1_wc != 1)
                || (e2_wc != 0 && e2_wc != 1)
                || (self.edge(e1).poly_type != self.edge(e2).poly_type
                    && self.clip_type != ClipType::Xor)
            {
                self.add_local_max_poly(e1, e2, pt)?;
            } else {
                self.add_out_pt(e1, pt)?;
                self.add_out_pt(e2, pt)?;
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e1_contributing {
            if e2_wc == 0 || e2_wc == 1 {
                self.add_out_pt(e1, pt)?;
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e2_contributing {
            if e1_wc == 0 || e1_wc == 1 {
                self.add_out_pt(e2, pt)?;
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if (e1_wc == 0 || e1_wc == 1) && (e2_wc == 0 || e2_wc == 1) {
            // neither edge is currently contributing
            let e1_wc2 = match e1_fill2 {
                PolyFillType::Positive => self.edge(e1).wind_cnt2,
                PolyFillType::Negative => -self.edge(e1).wind_cnt2,
                _ => self.edge(e1).wind_cnt2.abs(),
            };
            let e2_wc2 = match e2_fill2 {
                PolyFillType::Positive => self.edge(e2).wind_cnt2,
                PolyFillType::Negative => -self.edge(e2).wind_cnt2,
                _ => self.edge(e2).wind_cnt2.abs(),
            };

            if self.edge(e1).poly_type != self.edge(e2).poly_type {
                self.add_local_min_poly(e1, e2, pt)?;
            } else if e1_wc == 1 && e2_wc == 1 {
                let start_poly = match self.clip_type {
                    ClipType::Intersection => e1_wc2 > 0 && e2_wc2 > 0,
                    ClipType::Union => e1_wc2 <= 0 && e2_wc2 <= 0,
                    ClipType::Difference => {
                        (self.edge(e1).poly_type == PolyType::Clip && e1_wc2 > 0 && e2_wc2 > 0)
                            || (self.edge(e1).poly_type == PolyType::Subject
                                && e1_wc2 <= 0
                                && e2_wc2 <= 0)
                    }
                    ClipType::Xor => true,
                };
                if start_poly {
                    self.add_local_min_poly(e1, e2, pt)?;
                }
            } else {
                self.swap_sides(e1, e2);
            }
        }
        Ok(())
    }

    fn swap_sides(&mut self, e1: EdgeId, e2: EdgeId) {
        let s1 = self.edge(e1).side;
        let s2 = self.edge(e2).side;
        self.edge_mut(e1).side = s2;
        self.edge_mut(e2).side = s1;
    }

    fn swap_poly_indexes(&mut self, e1: EdgeId, e2: EdgeId) {
        let o1 = self.edge(e1).out_idx;
        let o2 = self.edge(e2).out_idx;
        self.edge_mut(e1).out_idx = o2;
        self.edge_mut(e2).out_idx = o1;
    }

    // ------------------------------------------------------------------
    // horizontals
    // ------------------------------------------------------------------

    fn process_horizontals(&mut self) -> Result<(), ClipError> {
        while let Some(horz) = self.pop_edge_from_sel() {
            self.process_horizontal(horz)?;
        }
        Ok(())
    }

    fn get_maxima_pair(&self, e: EdgeId) -> Option<EdgeId> {
        let next = self.edge(e).next;
        let prev = self.edge(e).prev;
        if self.edge(next).top == self.edge(e).top && self.edge(next).next_in_lml.is_none() {
            Some(next)
        } else if self.edge(prev).top == self.edge(e).top && self.edge(prev).next_in_lml.is_none()
        {
            Some(prev)
        } else {
            None
        }
    }

    /// Like [`get_maxima_pair`](Self::get_maxima_pair), but only when
    /// the pair is still workable in the AEL.
    fn get_maxima_pair_ex(&self, e: EdgeId) -> Option<EdgeId> {
        let result = self.get_maxima_pair(e)?;
        if self.edge(result).out_idx == SKIP
            || (self.edge(result).next_in_ael == self.edge(result).prev_in_ael
                && !self.edge(result).is_horizontal())
        {
            None
        } else {
            Some(result)
        }
    }

    fn next_in_ael_dir(&self, e: EdgeId, dir: Direction) -> Option<EdgeId> {
        if dir == Direction::LeftToRight {
            self.edge(e).next_in_ael
        } else {
            self.edge(e).prev_in_ael
        }
    }

    fn horz_direction(&self, horz: EdgeId) -> (Direction, CInt, CInt) {
        let e = self.edge(horz);
        if e.bot.x < e.top.x {
            (Direction::LeftToRight, e.bot.x, e.top.x)
        } else {
            (Direction::RightToLeft, e.top.x, e.bot.x)
        }
    }

    /// Walks one horizontal (or run of consecutive horizontals) across
    /// the AEL, emitting output and joins at every crossing.
    fn process_horizontal(&mut self, mut horz: EdgeId) -> Result<(), ClipError> {
        let is_open = self.edge(horz).wind_delta == 0;

        let (mut dir, mut horz_left, mut horz_right) = self.horz_direction(horz);

        // find the end of this run of horizontals
        let mut last_horz = horz;
        while let Some(next) = self.edge(last_horz).next_in_lml {
            if !self.edge(next).is_horizontal() {
                break;
            }
            last_horz = next;
        }
        let max_pair = if self.edge(last_horz).next_in_lml.is_none() {
            self.get_maxima_pair(last_horz)
        } else {
            None
        };

        // cursor over the maxima x list, clipped to the run's span
        let mut max_fwd: Option<usize> = None;
        let mut max_rev: Option<usize> = None;
        if !self.maxima.is_empty() {
            let bot_x = self.edge(horz).bot.x;
            let last_top_x = self.edge(last_horz).top.x;
            if dir == Direction::LeftToRight {
                let mut i = 0;
                while i < self.maxima.len() && self.maxima[i] <= bot_x {
                    i += 1;
                }
                if i < self.maxima.len() && self.maxima[i] < last_top_x {
                    max_fwd = Some(i);
                }
            } else {
                let mut i = self.maxima.len();
                while i > 0 && self.maxima[i - 1] > bot_x {
                    i -= 1;
                }
                if i > 0 && self.maxima[i - 1] > last_top_x {
                    max_rev = Some(i - 1);
                }
            }
        }

        let mut op1: Option<OutPtId> = None;

        loop {
            // loop through consecutive horizontal edges
            let is_last_horz = horz == last_horz;
            let mut e_opt = self.next_in_ael_dir(horz, dir);
            while let Some(e) = e_opt {
                // insert extra output vertices where maxima touch the
                // horizontal, so self-touches can be simplified later
                if dir == Direction::LeftToRight {
                    while let Some(i) = max_fwd {
                        if self.maxima[i] >= self.edge(e).curr.x {
                            break;
                        }
                        if self.edge(horz).out_idx >= 0 && !is_open {
                            let y = self.edge(horz).bot.y;
                            let x = self.maxima[i];
                            self.add_out_pt(horz, IntPoint::new(x, y))?;
                        }
                        max_fwd = if i + 1 < self.maxima.len() {
                            Some(i + 1)
                        } else {
                            None
                        };
                    }
                } else {
                    while let Some(i) = max_rev {
                        if self.maxima[i] <= self.edge(e).curr.x {
                            break;
                        }
                        if self.edge(horz).out_idx >= 0 && !is_open {
                            let y = self.edge(horz).bot.y;
                            let x = self.maxima[i];
                            self.add_out_pt(horz, IntPoint::new(x, y))?;
                        }
                        max_rev = if i > 0 { Some(i - 1) } else { None };
                    }
                }

                if (dir == Direction::LeftToRight && self.edge(e).curr.x > horz_right)
                    || (dir == Direction::RightToLeft && self.edge(e).curr.x < horz_left)
                {
                    break;
                }

                // at the end of an intermediate horizontal, only edges
                // that pass under the next bound edge stay in range
                if self.edge(e).curr.x == self.edge(horz).top.x {
                    if let Some(next_lml) = self.edge(horz).next_in_lml {
                        if self.edge(e).dx < self.edge(next_lml).dx {
                            break;
                        }
                    }
                }

                if self.edge(horz).out_idx >= 0 && !is_open {
                    #[allow(unused_mut)]
                    let mut curr = self.edge(e).curr;
                    #[cfg(feature = "xyz")]
                    {
                        if dir == Direction::LeftToRight {
                            self.set_z(&mut curr, horz, e);
                        } else {
                            self.set_z(&mut curr, e, horz);
                        }
                    }
                    let op = self.add_out_pt(horz, curr)?;
                    op1 = Some(op);
                    let mut next_horz = self.sorted_edges;
                    while let Some(nh) = next_horz {
                        if self.edge(nh).out_idx >= 0 {
                            let (h_bot_x, h_top_x) = {
                                let h = self.edge(horz);
                                (h.bot.x, h.top.x)
                            };
                            let (n_bot_x, n_top_x) = {
                                let n = self.edge(nh);
                                (n.bot.x, n.top.x)
                            };
                            if horz_segments_overlap(h_bot_x, h_top_x, n_bot_x, n_top_x) {
                                let op2 = self.get_last_out_pt(nh)?;
                                let off = self.edge(nh).top;
                                self.joins.push(Join {
                                    out_pt1: op2,
                                    out_pt2: op,
                                    off_pt: off,
                                });
                            }
                        }
                        next_horz = self.edge(nh).next_in_sel;
                    }
                    let bot = self.edge(horz).bot;
                    self.ghost_joins.push(Join {
                        out_pt1: op,
                        out_pt2: op,
                        off_pt: bot,
                    });
                }

                // only match with the maxima pair at the very end of
                // the run
                if Some(e) == max_pair && is_last_horz {
                    if self.edge(horz).out_idx >= 0 {
                        let top = self.edge(horz).top;
                        self.add_local_max_poly(horz, e, top)?;
                    }
                    self.base.delete_from_ael(horz);
                    self.base.delete_from_ael(e);
                    return Ok(());
                }

                let curr_y = self.edge(horz).curr.y;
                let pt = IntPoint::new(self.edge(e).curr.x, curr_y);
                if dir == Direction::LeftToRight {
                    self.intersect_edges(horz, e, pt)?;
                } else {
                    self.intersect_edges(e, horz, pt)?;
                }
                let e_next = self.next_in_ael_dir(e, dir);
                self.base.swap_positions_in_ael(horz, e);
                e_opt = e_next;
            }

            // stop unless more consecutive horizontals follow
            match self.edge(horz).next_in_lml {
                Some(next) if self.edge(next).is_horizontal() => {}
                _ => break,
            }
            horz = self.base.update_edge_into_ael(horz)?;
            if self.edge(horz).out_idx >= 0 {
                let bot = self.edge(horz).bot;
                self.add_out_pt(horz, bot)?;
            }
            let (d, l, r) = self.horz_direction(horz);
            dir = d;
            horz_left = l;
            horz_right = r;
        }

        if self.edge(horz).out_idx >= 0 && op1.is_none() {
            let op = self.get_last_out_pt(horz)?;
            let mut next_horz = self.sorted_edges;
            while let Some(nh) = next_horz {
                if self.edge(nh).out_idx >= 0 {
                    let (h_bot_x, h_top_x) = {
                        let h = self.edge(horz);
                        (h.bot.x, h.top.x)
                    };
                    let (n_bot_x, n_top_x) = {
                        let n = self.edge(nh);
                        (n.bot.x, n.top.x)
                    };
                    if horz_segments_overlap(h_bot_x, h_top_x, n_bot_x, n_top_x) {
                        let op2 = self.get_last_out_pt(nh)?;
                        let off = self.edge(nh).top;
                        self.joins.push(Join {
                            out_pt1: op2,
                            out_pt2: op,
                            off_pt: off,
                        });
                    }
                }
                next_horz = self.edge(nh).next_in_sel;
            }
            let top = self.edge(horz).top;
            self.ghost_joins.push(Join {
                out_pt1: op,
                out_pt2: op,
                off_pt: top,
            });
        }

        if self.edge(horz).next_in_lml.is_some() {
            if self.edge(horz).out_idx >= 0 {
                let top = self.edge(horz).top;
                let op1 = self.add_out_pt(horz, top)?;
                horz = self.base.update_edge_into_ael(horz)?;
                if self.edge(horz).wind_delta == 0 {
                    return Ok(());
                }
                // horz is no longer horizontal; look for a neighbor
                // sharing its bottom vertex
                let h_bot = self.edge(horz).bot;
                let h_top = self.edge(horz).top;
                let shares_bottom = |this: &Self, id: EdgeId| {
                    let ne = this.edge(id);
                    ne.curr.x == h_bot.x
                        && ne.curr.y == h_bot.y
                        && ne.wind_delta != 0
                        && ne.out_idx >= 0
                        && ne.curr.y > ne.top.y
                        && crate::clip::edge::slopes_equal_edges(
                            this.edge(horz),
                            ne,
                            this.base.use_full_range,
                        )
                };
                let neighbor = match self.edge(horz).prev_in_ael {
                    Some(p) if shares_bottom(self, p) => Some(p),
                    _ => match self.edge(horz).next_in_ael {
                        Some(n) if shares_bottom(self, n) => Some(n),
                        _ => None,
                    },
                };
                if let Some(nb) = neighbor {
                    let op2 = self.add_out_pt(nb, h_bot)?;
                    self.joins.push(Join {
                        out_pt1: op1,
                        out_pt2: op2,
                        off_pt: h_top,
                    });
                }
            } else {
                self.base.update_edge_into_ael(horz)?;
            }
        } else {
            if self.edge(horz).out_idx >= 0 {
                let top = self.edge(horz).top;
                self.add_out_pt(horz, top)?;
            }
            self.base.delete_from_ael(horz);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // intersections inside a scanbeam
    // ------------------------------------------------------------------

    fn process_intersections(&mut self, top_y: CInt) -> Result<(), ClipError> {
        if self.base.active_edges.is_none() {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        match self.intersections.len() {
            0 => return Ok(()),
            1 => self.process_intersect_list()?,
            _ => {
                if self.fixup_intersection_order() {
                    self.process_intersect_list()?;
                } else {
                    self.sorted_edges = None;
                    self.intersections.clear();
                    return Err(ClipError::Internal(
                        "failed to order edge intersections".into(),
                    ));
                }
            }
        }
        self.sorted_edges = None;
        Ok(())
    }

    fn build_intersect_list(&mut self, top_y: CInt) {
        let Some(head) = self.base.active_edges else {
            return;
        };

        // mirror the AEL into the SEL, with x positions at the top of
        // the beam
        self.sorted_edges = Some(head);
        let mut e_opt = Some(head);
        while let Some(e) = e_opt {
            let (prev, next) = (self.edge(e).prev_in_ael, self.edge(e).next_in_ael);
            self.edge_mut(e).prev_in_sel = prev;
            self.edge_mut(e).next_in_sel = next;
            let x = self.edge(e).top_x(top_y);
            self.edge_mut(e).curr.x = x;
            e_opt = next;
        }

        // bubble sort; every swap is a crossing inside the beam
        loop {
            let mut is_modified = false;
            let Some(mut e) = self.sorted_edges else { break };
            while let Some(next) = self.edge(e).next_in_sel {
                if self.edge(e).curr.x > self.edge(next).curr.x {
                    let mut pt = intersect_point(&self.base.edges[e], &self.base.edges[next]);
                    if pt.y < top_y {
                        pt = IntPoint::new(self.edge(e).top_x(top_y), top_y);
                    }
                    self.intersections.push(IntersectNode {
                        edge1: e,
                        edge2: next,
                        pt,
                    });
                    self.swap_positions_in_sel(e, next);
                    is_modified = true;
                } else {
                    e = next;
                }
            }
            match self.edge(e).prev_in_sel {
                Some(prev) => self.edge_mut(prev).next_in_sel = None,
                None => break,
            }
            if !is_modified {
                break;
            }
        }
        self.sorted_edges = None;
    }

    fn edges_adjacent(&self, node: &IntersectNode) -> bool {
        self.edge(node.edge1).next_in_sel == Some(node.edge2)
            || self.edge(node.edge1).prev_in_sel == Some(node.edge2)
    }

    /// Reorders the intersection list so every swap happens between
    /// edges that are adjacent at that moment.
    fn fixup_intersection_order(&mut self) -> bool {
        self.copy_ael_to_sel();
        self.intersections.sort_by(|a, b| b.pt.y.cmp(&a.pt.y));
        let cnt = self.intersections.len();
        for i in 0..cnt {
            if !self.edges_adjacent(&self.intersections[i]) {
                let mut j = i + 1;
                while j < cnt && !self.edges_adjacent(&self.intersections[j]) {
                    j += 1;
                }
                if j == cnt {
                    return false;
                }
                self.intersections.swap(i, j);
            }
            let (e1, e2) = (self.intersections[i].edge1, self.intersections[i].edge2);
            self.swap_positions_in_sel(e1, e2);
        }
        true
    }

    fn process_intersect_list(&mut self) -> Result<(), ClipError> {
        for i in 0..self.intersections.len() {
            let node = self.intersections[i].clone();
            self.intersect_edges(node.edge1, node.edge2, node.pt)?;
            self.base.swap_positions_in_ael(node.edge1, node.edge2);
        }
        self.intersections.clear();
        Ok(())
    }

    // ------------------------------------------------------------------
    // top of scanbeam
    // ------------------------------------------------------------------

    fn is_maxima(&self, e: EdgeId, y: CInt) -> bool {
        self.edge(e).top.y == y && self.edge(e).next_in_lml.is_none()
    }

    fn is_intermediate(&self, e: EdgeId, y: CInt) -> bool {
        self.edge(e).top.y == y && self.edge(e).next_in_lml.is_some()
    }

    fn process_edges_at_top(&mut self, top_y: CInt) -> Result<(), ClipError> {
        let mut e_opt = self.base.active_edges;
        while let Some(e) = e_opt {
            // maxima are handled like 'bent' horizontal edges, except
            // when a horizontal continues past them
            let mut is_maxima_edge = self.is_maxima(e, top_y);
            if is_maxima_edge {
                is_maxima_edge = match self.get_maxima_pair_ex(e) {
                    None => true,
                    Some(pair) => !self.edge(pair).is_horizontal(),
                };
            }

            if is_maxima_edge {
                if self.strict_simple {
                    let x = self.edge(e).top.x;
                    self.maxima.push(x);
                }
                let prev = self.edge(e).prev_in_ael;
                self.do_maxima(e)?;
                e_opt = match prev {
                    None => self.base.active_edges,
                    Some(p) => self.edge(p).next_in_ael,
                };
                continue;
            }

            // promote horizontal successors, otherwise just advance
            let promote_horizontal = self.is_intermediate(e, top_y)
                && match self.edge(e).next_in_lml {
                    Some(next) => self.edge(next).is_horizontal(),
                    None => false,
                };
            let e = if promote_horizontal {
                let e = self.base.update_edge_into_ael(e)?;
                if self.edge(e).out_idx >= 0 {
                    let bot = self.edge(e).bot;
                    self.add_out_pt(e, bot)?;
                }
                self.add_edge_to_sel(e);
                e
            } else {
                let x = self.edge(e).top_x(top_y);
                self.edge_mut(e).curr.x = x;
                self.edge_mut(e).curr.y = top_y;
                #[cfg(feature = "xyz")]
                {
                    let edge = self.edge(e);
                    let z = if top_y == edge.top.y {
                        edge.top.z
                    } else if top_y == edge.bot.y {
                        edge.bot.z
                    } else {
                        0
                    };
                    self.edge_mut(e).curr.z = z;
                }
                e
            };

            // when strictly simple, edges touching here both get a
            // vertex so the touch can be split apart later
            if self.strict_simple {
                if let Some(prev) = self.edge(e).prev_in_ael {
                    let touching = {
                        let ee = self.edge(e);
                        let pe = self.edge(prev);
                        ee.out_idx >= 0
                            && ee.wind_delta != 0
                            && pe.out_idx >= 0
                            && pe.curr.x == ee.curr.x
                            && pe.wind_delta != 0
                    };
                    if touching {
                        #[allow(unused_mut)]
                        let mut pt = self.edge(e).curr;
                        #[cfg(feature = "xyz")]
                        self.set_z(&mut pt, prev, e);
                        let op = self.add_out_pt(prev, pt)?;
                        let op2 = self.add_out_pt(e, pt)?;
                        self.joins.push(Join {
                            out_pt1: op,
                            out_pt2: op2,
                            off_pt: pt,
                        });
                    }
                }
            }

            e_opt = self.edge(e).next_in_ael;
        }

        // horizontals at the top of the beam
        self.maxima.sort_unstable();
        self.process_horizontals()?;
        self.maxima.clear();

        // promote intermediate vertices
        let mut e_opt = self.base.active_edges;
        while let Some(e) = e_opt {
            if !self.is_intermediate(e, top_y) {
                e_opt = self.edge(e).next_in_ael;
                continue;
            }
            let op = if self.edge(e).out_idx >= 0 {
                let top = self.edge(e).top;
                Some(self.add_out_pt(e, top)?)
            } else {
                None
            };
            let e = self.base.update_edge_into_ael(e)?;

            // if output polygons share an edge below this vertex they
            // will need joining later
            if let Some(op) = op {
                let e_bot = self.edge(e).bot;
                let e_top = self.edge(e).top;
                let e_curr = self.edge(e).curr;
                let e_wd = self.edge(e).wind_delta;
                let shares_bottom = |this: &Self, id: EdgeId| {
                    let ne = this.edge(id);
                    ne.curr.x == e_bot.x
                        && ne.curr.y == e_bot.y
                        && ne.out_idx >= 0
                        && ne.curr.y > ne.top.y
                        && slopes_equal4(e_curr, e_top, ne.curr, ne.top, this.base.use_full_range)
                        && e_wd != 0
                        && ne.wind_delta != 0
                };
                let neighbor = match self.edge(e).prev_in_ael {
                    Some(p) if shares_bottom(self, p) => Some(p),
                    _ => match self.edge(e).next_in_ael {
                        Some(n) if shares_bottom(self, n) => Some(n),
                        _ => None,
                    },
                };
                if let Some(nb) = neighbor {
                    let op2 = self.add_out_pt(nb, e_bot)?;
                    self.joins.push(Join {
                        out_pt1: op,
                        out_pt2: op2,
                        off_pt: e_top,
                    });
                }
            }
            e_opt = self.edge(e).next_in_ael;
        }
        Ok(())
    }

    fn do_maxima(&mut self, e: EdgeId) -> Result<(), ClipError> {
        let Some(max_pair) = self.get_maxima_pair_ex(e) else {
            if self.edge(e).out_idx >= 0 {
                let top = self.edge(e).top;
                self.add_out_pt(e, top)?;
            }
            self.base.delete_from_ael(e);
            return Ok(());
        };

        let mut next = self.edge(e).next_in_ael;
        while let Some(n) = next {
            if n == max_pair {
                break;
            }
            let top = self.edge(e).top;
            self.intersect_edges(e, n, top)?;
            self.base.swap_positions_in_ael(e, n);
            next = self.edge(e).next_in_ael;
        }

        let e_out = self.edge(e).out_idx;
        let p_out = self.edge(max_pair).out_idx;
        if e_out == UNASSIGNED && p_out == UNASSIGNED {
            self.base.delete_from_ael(e);
            self.base.delete_from_ael(max_pair);
        } else if e_out >= 0 && p_out >= 0 {
            let top = self.edge(e).top;
            self.add_local_max_poly(e, max_pair, top)?;
            self.base.delete_from_ael(e);
            self.base.delete_from_ael(max_pair);
        } else if self.edge(e).wind_delta == 0 {
            if e_out >= 0 {
                let top = self.edge(e).top;
                self.add_out_pt(e, top)?;
                self.edge_mut(e).out_idx = UNASSIGNED;
            }
            self.base.delete_from_ael(e);
            if self.edge(max_pair).out_idx >= 0 {
                let top = self.edge(e).top;
                self.add_out_pt(max_pair, top)?;
                self.edge_mut(max_pair).out_idx = UNASSIGNED;
            }
            self.base.delete_from_ael(max_pair);
        } else {
            return Err(ClipError::Internal(
                "unbalanced edges at local maximum".into(),
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // ring cleanup
    // ------------------------------------------------------------------

    /// Removes duplicate points and collapses collinear runs in a
    /// closed ring.
    fn fixup_out_polygon(&mut self, rec: OutRecId) {
        let Some(mut pp) = self.base.poly_outs[rec].pts else {
            return;
        };
        self.base.poly_outs[rec].bottom_pt = None;
        let preserve_col = self.base.preserve_collinear() || self.strict_simple;
        let mut last_ok: Option<OutPtId> = None;
        loop {
            let prev = self.base.out_pts[pp].prev;
            let next = self.base.out_pts[pp].next;
            if prev == pp || prev == next {
                self.base.poly_outs[rec].pts = None;
                return;
            }
            let p = self.base.out_pts[pp].pt;
            let pn = self.base.out_pts[next].pt;
            let pv = self.base.out_pts[prev].pt;
            if p == pn
                || p == pv
                || (slopes_equal3(pv, p, pn, self.base.use_full_range)
                    && (!preserve_col || !pt2_between_pt1_and_pt3(pv, p, pn)))
            {
                last_ok = None;
                self.base.out_pts[prev].next = next;
                self.base.out_pts[next].prev = prev;
                pp = prev;
            } else if Some(pp) == last_ok {
                break;
            } else {
                if last_ok.is_none() {
                    last_ok = Some(pp);
                }
                pp = next;
            }
        }
        self.base.poly_outs[rec].pts = Some(pp);
    }

    /// Removes duplicate points from an open polyline.
    fn fixup_out_polyline(&mut self, rec: OutRecId) {
        let Some(start) = self.base.poly_outs[rec].pts else {
            return;
        };
        let mut pp = start;
        let mut last_pp = self.base.out_pts[pp].prev;
        while pp != last_pp {
            pp = self.base.out_pts[pp].next;
            let prev = self.base.out_pts[pp].prev;
            if self.base.out_pts[pp].pt == self.base.out_pts[prev].pt {
                if pp == last_pp {
                    last_pp = prev;
                }
                let next = self.base.out_pts[pp].next;
                self.base.out_pts[prev].next = next;
                self.base.out_pts[next].prev = prev;
                pp = prev;
            }
        }
        if pp == self.base.out_pts[pp].prev {
            self.base.poly_outs[rec].pts = None;
        }
    }

    // ------------------------------------------------------------------
    // joins
    // ------------------------------------------------------------------

    fn get_overlap(a1: CInt, a2: CInt, b1: CInt, b2: CInt) -> Option<(CInt, CInt)> {
        let (left, right) = if a1 < a2 {
            if b1 < b2 {
                (a1.max(b1), a2.min(b2))
            } else {
                (a1.max(b2), a2.min(b1))
            }
        } else if b1 < b2 {
            (a2.max(b1), a1.min(b2))
        } else {
            (a2.max(b2), a1.min(b1))
        };
        (left < right).then_some((left, right))
    }

    fn join_horz(
        &mut self,
        mut op1: OutPtId,
        mut op1b: OutPtId,
        mut op2: OutPtId,
        mut op2b: OutPtId,
        pt: IntPoint,
        discard_left: bool,
    ) -> Option<()> {
        let pool = &mut self.base.out_pts;
        let dir1 = if pool[op1].pt.x > pool[op1b].pt.x {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        };
        let dir2 = if pool[op2].pt.x > pool[op2b].pt.x {
            Direction::RightToLeft
        } else {
            Direction::LeftToRight
        };
        if dir1 == dir2 {
            return None;
        }

        // when discarding left, op1b must end up left of op1 (and op2b
        // of op2); the duplicated points land on the kept side
        if dir1 == Direction::LeftToRight {
            while pool[pool[op1].next].pt.x <= pt.x
                && pool[pool[op1].next].pt.x >= pool[op1].pt.x
                && pool[pool[op1].next].pt.y == pt.y
            {
                op1 = pool[op1].next;
            }
            if discard_left && pool[op1].pt.x != pt.x {
                op1 = pool[op1].next;
            }
            op1b = dup_out_pt(pool, op1, !discard_left);
            if pool[op1b].pt != pt {
                op1 = op1b;
                pool[op1].pt = pt;
                op1b = dup_out_pt(pool, op1, !discard_left);
            }
        } else {
            while pool[pool[op1].next].pt.x >= pt.x
                && pool[pool[op1].next].pt.x <= pool[op1].pt.x
                && pool[pool[op1].next].pt.y == pt.y
            {
                op1 = pool[op1].next;
            }
            if !discard_left && pool[op1].pt.x != pt.x {
                op1 = pool[op1].next;
            }
            op1b = dup_out_pt(pool, op1, discard_left);
            if pool[op1b].pt != pt {
                op1 = op1b;
                pool[op1].pt = pt;
                op1b = dup_out_pt(pool, op1, discard_left);
            }
        }

        if dir2 == Direction::LeftToRight {
            while pool[pool[op2].next].pt.x <= pt.x
                && pool[pool[op2].next].pt.x >= pool[op2].pt.x
                && pool[pool[op2].next].pt.y == pt.y
            {
                op2 = pool[op2].next;
            }
            if discard_left && pool[op2].pt.x != pt.x {
                op2 = pool[op2].next;
            }
            op2b = dup_out_pt(pool, op2, !discard_left);
            if pool[op2b].pt != pt {
                op2 = op2b;
                pool[op2].pt = pt;
                op2b = dup_out_pt(pool, op2, !discard_left);
            }
        } else {
            while pool[pool[op2].next].pt.x >= pt.x
                && pool[pool[op2].next].pt.x <= pool[op2].pt.x
                && pool[pool[op2].next].pt.y == pt.y
            {
                op2 = pool[op2].next;
            }
            if !discard_left && pool[op2].pt.x != pt.x {
                op2 = pool[op2].next;
            }
            op2b = dup_out_pt(pool, op2, discard_left);
            if pool[op2b].pt != pt {
                op2 = op2b;
                pool[op2].pt = pt;
                op2b = dup_out_pt(pool, op2, discard_left);
            }
        }

        if (dir1 == Direction::LeftToRight) == discard_left {
            pool[op1].prev = op2;
            pool[op2].next = op1;
            pool[op1b].next = op2b;
            pool[op2b].prev = op1b;
        } else {
            pool[op1].next = op2;
            pool[op2].prev = op1;
            pool[op1b].prev = op2b;
            pool[op2b].next = op1b;
        }
        Some(())
    }

    /// Attempts one deferred join; on success returns the two points
    /// now anchoring the joined (or split) rings.
    fn join_points(
        &mut self,
        j: &Join,
        rec1: OutRecId,
        rec2: OutRecId,
    ) -> Option<(OutPtId, OutPtId)> {
        let mut op1 = j.out_pt1;
        let mut op2 = j.out_pt2;

        // Joins come in three kinds: collinear horizontal overlaps
        // (off_pt on the shared horizontal), shared bottom vertices
        // (off_pt above them), and strictly-simple touches (all three
        // points equal).
        let is_horizontal = self.base.out_pts[j.out_pt1].pt.y == j.off_pt.y;

        if is_horizontal
            && j.off_pt == self.base.out_pts[j.out_pt1].pt
            && j.off_pt == self.base.out_pts[j.out_pt2].pt
        {
            // strictly-simple join
            if rec1 != rec2 {
                return None;
            }
            let pool = &self.base.out_pts;
            let mut op1b = pool[op1].next;
            while op1b != op1 && pool[op1b].pt == j.off_pt {
                op1b = pool[op1b].next;
            }
            let reverse1 = pool[op1b].pt.y > j.off_pt.y;
            let mut op2b = pool[op2].next;
            while op2b != op2 && pool[op2b].pt == j.off_pt {
                op2b = pool[op2b].next;
            }
            let reverse2 = pool[op2b].pt.y > j.off_pt.y;
            if reverse1 == reverse2 {
                return None;
            }
            let pool = &mut self.base.out_pts;
            if reverse1 {
                let op1b = dup_out_pt(pool, op1, false);
                let op2b = dup_out_pt(pool, op2, true);
                pool[op1].prev = op2;
                pool[op2].next = op1;
                pool[op1b].next = op2b;
                pool[op2b].prev = op1b;
                Some((op1, op1b))
            } else {
                let op1b = dup_out_pt(pool, op1, true);
                let op2b = dup_out_pt(pool, op2, false);
                pool[op1].next = op2;
                pool[op2].prev = op1;
                pool[op1b].prev = op2b;
                pool[op2b].next = op1b;
                Some((op1, op1b))
            }
        } else if is_horizontal {
            // the overlap may sit anywhere along the two horizontal
            // runs, so find their extremes first
            let pool = &self.base.out_pts;
            let mut op1b = op1;
            while pool[pool[op1].prev].pt.y == pool[op1].pt.y
                && pool[op1].prev != op1b
                && pool[op1].prev != op2
            {
                op1 = pool[op1].prev;
            }
            while pool[pool[op1b].next].pt.y == pool[op1b].pt.y
                && pool[op1b].next != op1
                && pool[op1b].next != op2
            {
                op1b = pool[op1b].next;
            }
            if pool[op1b].next == op1 || pool[op1b].next == op2 {
                return None; // a flat 'polygon'
            }

            let mut op2b = op2;
            while pool[pool[op2].prev].pt.y == pool[op2].pt.y
                && pool[op2].prev != op2b
                && pool[op2].prev != op1b
            {
                op2 = pool[op2].prev;
            }
            while pool[pool[op2b].next].pt.y == pool[op2b].pt.y
                && pool[op2b].next != op2
                && pool[op2b].next != op1
            {
                op2b = pool[op2b].next;
            }
            if pool[op2b].next == op2 || pool[op2b].next == op1 {
                return None; // a flat 'polygon'
            }

            let (left, right) = Self::get_overlap(
                pool[op1].pt.x,
                pool[op1b].pt.x,
                pool[op2].pt.x,
                pool[op2b].pt.x,
            )?;

            // choose a join point inside the overlap, discarding the
            // side that would leave a spike behind
            let (pt, discard_left) = if pool[op1].pt.x >= left && pool[op1].pt.x <= right {
                (pool[op1].pt, pool[op1].pt.x > pool[op1b].pt.x)
            } else if pool[op2].pt.x >= left && pool[op2].pt.x <= right {
                (pool[op2].pt, pool[op2].pt.x > pool[op2b].pt.x)
            } else if pool[op1b].pt.x >= left && pool[op1b].pt.x <= right {
                (pool[op1b].pt, pool[op1b].pt.x > pool[op1].pt.x)
            } else {
                (pool[op2b].pt, pool[op2b].pt.x > pool[op2].pt.x)
            };
            // op1 and op2 anchor the two rings that result from the
            // splice, regardless of where join_horz duplicates points
            self.join_horz(op1, op1b, op2, op2b, pt, discard_left)?;
            Some((op1, op2))
        } else {
            // both rings turn upward away from a shared vertex
            let full_range = self.base.use_full_range;
            let pool = &self.base.out_pts;

            let mut op1b = pool[op1].next;
            while pool[op1b].pt == pool[op1].pt && op1b != op1 {
                op1b = pool[op1b].next;
            }
            let reverse1 = pool[op1b].pt.y > pool[op1].pt.y
                || !slopes_equal3(pool[op1].pt, pool[op1b].pt, j.off_pt, full_range);
            if reverse1 {
                op1b = pool[op1].prev;
                while pool[op1b].pt == pool[op1].pt && op1b != op1 {
                    op1b = pool[op1b].prev;
                }
                if pool[op1b].pt.y > pool[op1].pt.y
                    || !slopes_equal3(pool[op1].pt, pool[op1b].pt, j.off_pt, full_range)
                {
                    return None;
                }
            }
            let mut op2b = pool[op2].next;
            while pool[op2b].pt == pool[op2].pt && op2b != op2 {
                op2b = pool[op2b].next;
            }
            let reverse2 = pool[op2b].pt.y > pool[op2].pt.y
                || !slopes_equal3(pool[op2].pt, pool[op2b].pt, j.off_pt, full_range);
            if reverse2 {
                op2b = pool[op2].prev;
                while pool[op2b].pt == pool[op2].pt && op2b != op2 {
                    op2b = pool[op2b].prev;
                }
                if pool[op2b].pt.y > pool[op2].pt.y
                    || !slopes_equal3(pool[op2].pt, pool[op2b].pt, j.off_pt, full_range)
                {
                    return None;
                }
            }

            if op1b == op1 || op2b == op2 || op1b == op2b || (rec1 == rec2 && reverse1 == reverse2)
            {
                return None;
            }

            let pool = &mut self.base.out_pts;
            if reverse1 {
                let op1b = dup_out_pt(pool, op1, false);
                let op2b = dup_out_pt(pool, op2, true);
                pool[op1].prev = op2;
                pool[op2].next = op1;
                pool[op1b].next = op2b;
                pool[op2b].prev = op1b;
                Some((op1, op1b))
            } else {
                let op1b = dup_out_pt(pool, op1, true);
                let op2b = dup_out_pt(pool, op2, false);
                pool[op1].next = op2;
                pool[op2].prev = op1;
                pool[op1b].prev = op2b;
                pool[op2b].next = op1b;
                Some((op1, op1b))
            }
        }
    }

    fn parse_first_left(&self, mut fl: Option<OutRecId>) -> Option<OutRecId> {
        while let Some(f) = fl {
            if self.base.poly_outs[f].pts.is_some() {
                return Some(f);
            }
            fl = self.base.poly_outs[f].first_left;
        }
        None
    }

    /// Reparents records that were owned by `old_rec` onto whichever of
    /// the two rings actually contains them now.
    fn fixup_first_lefts1(&mut self, old_rec: OutRecId, new_rec: OutRecId) {
        for i in 0..self.base.poly_outs.len() {
            if self.base.poly_outs[i].pts.is_none() {
                continue;
            }
            let first_left = self.parse_first_left(self.base.poly_outs[i].first_left);
            if first_left == Some(old_rec) {
                let (Some(i_pts), Some(new_pts)) =
                    (self.base.poly_outs[i].pts, self.base.poly_outs[new_rec].pts)
                else {
                    continue;
                };
                if ring2_contains_ring1(&self.base.out_pts, i_pts, new_pts) {
                    self.base.poly_outs[i].first_left = Some(new_rec);
                }
            }
        }
    }

    /// After a ring splits into an outer/inner pair, other records may
    /// have ended up inside either half.
    fn fixup_first_lefts2(&mut self, inner_rec: OutRecId, outer_rec: OutRecId) {
        let orfl = self.base.poly_outs[outer_rec].first_left;
        for i in 0..self.base.poly_outs.len() {
            if self.base.poly_outs[i].pts.is_none() || i == outer_rec || i == inner_rec {
                continue;
            }
            let first_left = self.parse_first_left(self.base.poly_outs[i].first_left);
            if first_left != orfl && first_left != Some(inner_rec) && first_left != Some(outer_rec)
            {
                continue;
            }
            let Some(i_pts) = self.base.poly_outs[i].pts else {
                continue;
            };
            let inner_pts = self.base.poly_outs[inner_rec].pts;
            let outer_pts = self.base.poly_outs[outer_rec].pts;
            if let Some(p) = inner_pts {
                if ring2_contains_ring1(&self.base.out_pts, i_pts, p) {
                    self.base.poly_outs[i].first_left = Some(inner_rec);
                    continue;
                }
            }
            if let Some(p) = outer_pts {
                if ring2_contains_ring1(&self.base.out_pts, i_pts, p) {
                    self.base.poly_outs[i].first_left = Some(outer_rec);
                    continue;
                }
            }
            let fl = self.base.poly_outs[i].first_left;
            if fl == Some(inner_rec) || fl == Some(outer_rec) {
                self.base.poly_outs[i].first_left = orfl;
            }
        }
    }

    /// Reparents unconditionally (the containment is already known).
    fn fixup_first_lefts3(&mut self, old_rec: OutRecId, new_rec: OutRecId) {
        for i in 0..self.base.poly_outs.len() {
            if self.base.poly_outs[i].pts.is_none() {
                continue;
            }
            let first_left = self.parse_first_left(self.base.poly_outs[i].first_left);
            if first_left == Some(old_rec) {
                self.base.poly_outs[i].first_left = Some(new_rec);
            }
        }
    }

    fn update_out_pt_idxs(&mut self, rec: OutRecId) {
        let Some(start) = self.base.poly_outs[rec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.base.out_pts[op].idx = rec;
            op = self.base.out_pts[op].prev;
            if op == start {
                break;
            }
        }
    }

    fn join_common_edges(&mut self) -> Result<(), ClipError> {
        for i in 0..self.joins.len() {
            let join = self.joins[i].clone();

            let rec1 = self.get_out_rec(self.base.out_pts[join.out_pt1].idx);
            let rec2 = self.get_out_rec(self.base.out_pts[join.out_pt2].idx);

            if self.base.poly_outs[rec1].pts.is_none() || self.base.poly_outs[rec2].pts.is_none() {
                continue;
            }
            if self.base.poly_outs[rec1].is_open || self.base.poly_outs[rec2].is_open {
                continue;
            }

            // the ring fragment carrying the correct hole state must be
            // established before the join alters either ring
            let hole_state_rec = if rec1 == rec2 {
                rec1
            } else if self.out_rec1_right_of_out_rec2(rec1, rec2) {
                rec2
            } else if self.out_rec1_right_of_out_rec2(rec2, rec1) {
                rec1
            } else {
                self.get_lowermost_rec(rec1, rec2)?
            };

            let Some((p1, p2)) = self.join_points(&join, rec1, rec2) else {
                continue;
            };

            if rec1 == rec2 {
                // the ring has been split in two
                self.base.poly_outs[rec1].pts = Some(p1);
                self.base.poly_outs[rec1].bottom_pt = None;
                let rec2 = self.base.create_out_rec();
                self.base.poly_outs[rec2].pts = Some(p2);
                self.update_out_pt_idxs(rec2);

                let r1_pts = self.ring_start(rec1)?;
                let r2_pts = self.ring_start(rec2)?;

                if ring2_contains_ring1(&self.base.out_pts, r2_pts, r1_pts) {
                    // ring 2 sits inside ring 1
                    let h = !self.base.poly_outs[rec1].is_hole;
                    self.base.poly_outs[rec2].is_hole = h;
                    self.base.poly_outs[rec2].first_left = Some(rec1);
                    if self.using_tree {
                        self.fixup_first_lefts2(rec2, rec1);
                    }
                    if (self.base.poly_outs[rec2].is_hole ^ self.reverse_output)
                        == (ring_area(&self.base.out_pts, r2_pts) > 0.0)
                    {
                        reverse_ring(&mut self.base.out_pts, r2_pts);
                    }
                } else if ring2_contains_ring1(&self.base.out_pts, r1_pts, r2_pts) {
                    // ring 1 sits inside ring 2
                    let h1 = self.base.poly_outs[rec1].is_hole;
                    self.base.poly_outs[rec2].is_hole = h1;
                    self.base.poly_outs[rec1].is_hole = !h1;
                    let fl = self.base.poly_outs[rec1].first_left;
                    self.base.poly_outs[rec2].first_left = fl;
                    self.base.poly_outs[rec1].first_left = Some(rec2);
                    if self.using_tree {
                        self.fixup_first_lefts2(rec1, rec2);
                    }
                    if (self.base.poly_outs[rec1].is_hole ^ self.reverse_output)
                        == (ring_area(&self.base.out_pts, r1_pts) > 0.0)
                    {
                        reverse_ring(&mut self.base.out_pts, r1_pts);
                    }
                } else {
                    // the two rings are completely separate
                    let h1 = self.base.poly_outs[rec1].is_hole;
                    self.base.poly_outs[rec2].is_hole = h1;
                    let fl = self.base.poly_outs[rec1].first_left;
                    self.base.poly_outs[rec2].first_left = fl;
                    if self.using_tree {
                        self.fixup_first_lefts1(rec1, rec2);
                    }
                }
            } else {
                // two rings were merged into one
                self.base.poly_outs[rec2].pts = None;
                self.base.poly_outs[rec2].bottom_pt = None;
                let new_idx = self.base.poly_outs[rec1].idx;
                self.base.poly_outs[rec2].idx = new_idx;

                let h = self.base.poly_outs[hole_state_rec].is_hole;
                self.base.poly_outs[rec1].is_hole = h;
                if hole_state_rec == rec2 {
                    let fl = self.base.poly_outs[rec2].first_left;
                    self.base.poly_outs[rec1].first_left = fl;
                }
                self.base.poly_outs[rec2].first_left = Some(rec1);

                if self.using_tree {
                    self.fixup_first_lefts3(rec2, rec1);
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // strictly-simple splitting
    // ------------------------------------------------------------------

    /// Splits every self-touching ring at its touch points.
    fn do_simple_polygons(&mut self) -> Result<(), ClipError> {
        let mut i = 0;
        while i < self.base.poly_outs.len() {
            let rec = i;
            i += 1;
            let Some(start) = self.base.poly_outs[rec].pts else {
                continue;
            };
            if self.base.poly_outs[rec].is_open {
                continue;
            }
            let mut op = start;
            loop {
                let mut op2 = self.base.out_pts[op].next;
                // the ring start moves when a split happens, so re-read
                // it on every pass
                while Some(op2) != self.base.poly_outs[rec].pts {
                    if self.base.out_pts[op].pt == self.base.out_pts[op2].pt
                        && self.base.out_pts[op2].next != op
                        && self.base.out_pts[op2].prev != op
                    {
                        // split the ring in two at the touch
                        let op3 = self.base.out_pts[op].prev;
                        let op4 = self.base.out_pts[op2].prev;
                        self.base.out_pts[op].prev = op4;
                        self.base.out_pts[op4].next = op;
                        self.base.out_pts[op2].prev = op3;
                        self.base.out_pts[op3].next = op2;

                        self.base.poly_outs[rec].pts = Some(op);
                        let rec2 = self.base.create_out_rec();
                        self.base.poly_outs[rec2].pts = Some(op2);
                        self.update_out_pt_idxs(rec2);

                        let r1_pts = self.ring_start(rec)?;
                        let r2_pts = self.ring_start(rec2)?;

                        if ring2_contains_ring1(&self.base.out_pts, r2_pts, r1_pts) {
                            let h = !self.base.poly_outs[rec].is_hole;
                            self.base.poly_outs[rec2].is_hole = h;
                            self.base.poly_outs[rec2].first_left = Some(rec);
                            if self.using_tree {
                                self.fixup_first_lefts2(rec2, rec);
                            }
                        } else if ring2_contains_ring1(&self.base.out_pts, r1_pts, r2_pts) {
                            let h1 = self.base.poly_outs[rec].is_hole;
                            self.base.poly_outs[rec2].is_hole = h1;
                            self.base.poly_outs[rec].is_hole = !h1;
                            let fl = self.base.poly_outs[rec].first_left;
                            self.base.poly_outs[rec2].first_left = fl;
                            self.base.poly_outs[rec].first_left = Some(rec2);
                            if self.using_tree {
                                self.fixup_first_lefts2(rec, rec2);
                            }
                        } else {
                            let h1 = self.base.poly_outs[rec].is_hole;
                            self.base.poly_outs[rec2].is_hole = h1;
                            let fl = self.base.poly_outs[rec].first_left;
                            self.base.poly_outs[rec2].first_left = fl;
                            if self.using_tree {
                                self.fixup_first_lefts1(rec, rec2);
                            }
                        }
                        op2 = op; // continue scanning from here
                    }
                    op2 = self.base.out_pts[op2].next;
                }
                op = self.base.out_pts[op].next;
                let stop = match self.base.poly_outs[rec].pts {
                    Some(s) => s,
                    None => break,
                };
                if op == stop {
                    break;
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // result builders
    // ------------------------------------------------------------------

    fn build_result(&self) -> Paths {
        let mut polys = Vec::with_capacity(self.base.poly_outs.len());
        for rec in &self.base.poly_outs {
            let Some(pts) = rec.pts else { continue };
            let start = self.base.out_pts[pts].prev;
            let cnt = point_count(&self.base.out_pts, start);
            if cnt < 2 {
                continue;
            }
            let mut pg = Vec::with_capacity(cnt);
            let mut p = start;
            for _ in 0..cnt {
                pg.push(self.base.out_pts[p].pt);
                p = self.base.out_pts[p].prev;
            }
            polys.push(pg);
        }
        polys
    }

    fn fix_hole_linkage(&mut self, rec: OutRecId) {
        // skip records that contain outermost polygons or already have
        // the correct owner linkage
        let Some(fl) = self.base.poly_outs[rec].first_left else {
            return;
        };
        if self.base.poly_outs[rec].is_hole != self.base.poly_outs[fl].is_hole
            && self.base.poly_outs[fl].pts.is_some()
        {
            return;
        }
        let mut orfl = Some(fl);
        while let Some(f) = orfl {
            if self.base.poly_outs[f].is_hole != self.base.poly_outs[rec].is_hole
                && self.base.poly_outs[f].pts.is_some()
            {
                break;
            }
            orfl = self.base.poly_outs[f].first_left;
        }
        self.base.poly_outs[rec].first_left = orfl;
    }

    fn build_tree(&mut self) -> Result<PolyTree, ClipError> {
        let mut tree = PolyTree::new();

        // one node per surviving ring
        for i in 0..self.base.poly_outs.len() {
            let Some(pts) = self.base.poly_outs[i].pts else {
                continue;
            };
            let cnt = point_count(&self.base.out_pts, pts);
            let is_open = self.base.poly_outs[i].is_open;
            if (is_open && cnt < 2) || (!is_open && cnt < 3) {
                continue;
            }
            self.fix_hole_linkage(i);
            let start = self.base.out_pts[pts].prev;
            let mut contour = Vec::with_capacity(cnt);
            let mut op = start;
            for _ in 0..cnt {
                contour.push(self.base.out_pts[op].pt);
                op = self.base.out_pts[op].prev;
            }
            let node = tree.add_node(contour, is_open);
            self.base.poly_outs[i].poly_node = Some(node);
        }

        // then the parent/child links
        for i in 0..self.base.poly_outs.len() {
            let Some(node) = self.base.poly_outs[i].poly_node else {
                continue;
            };
            if self.base.poly_outs[i].is_open {
                tree.attach(node, None);
            } else {
                let parent = self.base.poly_outs[i]
                    .first_left
                    .and_then(|fl| self.base.poly_outs[fl].poly_node);
                tree.attach(node, parent);
            }
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{area, point_in_polygon, PointLocation};

    fn square(x: CInt, y: CInt, s: CInt) -> Vec<IntPoint> {
        vec![
            IntPoint::new(x, y),
            IntPoint::new(x + s, y),
            IntPoint::new(x + s, y + s),
            IntPoint::new(x, y + s),
        ]
    }

    fn total_area(paths: &Paths) -> f64 {
        paths.iter().map(|p| area(p).abs()).sum()
    }

    fn run(
        subject: &[Vec<IntPoint>],
        clip: &[Vec<IntPoint>],
        op: ClipType,
        fill: PolyFillType,
    ) -> Paths {
        let mut c = Clipper::new();
        c.add_paths(subject, PolyType::Subject, true).unwrap();
        if !clip.is_empty() {
            c.add_paths(clip, PolyType::Clip, true).unwrap();
        }
        c.execute(op, fill, fill).unwrap()
    }

    #[test]
    fn test_empty_inputs_give_empty_success() {
        let mut c = Clipper::new();
        let solution = c
            .execute(
                ClipType::Intersection,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            )
            .unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn test_square_intersection() {
        let solution = run(
            &[square(0, 0, 10)],
            &[square(5, 5, 10)],
            ClipType::Intersection,
            PolyFillType::EvenOdd,
        );
        assert_eq!(solution.len(), 1);
        assert_eq!(area(&solution[0]).abs(), 25.0);
        let expected = [
            IntPoint::new(5, 5),
            IntPoint::new(10, 5),
            IntPoint::new(10, 10),
            IntPoint::new(5, 10),
        ];
        assert_eq!(solution[0].len(), 4);
        for pt in expected {
            assert!(solution[0].contains(&pt), "missing {pt:?}");
        }
    }

    #[test]
    fn test_triangle_union() {
        let subject = vec![vec![
            IntPoint::new(0, 0),
            IntPoint::new(4, 0),
            IntPoint::new(0, 4),
        ]];
        let clip = vec![vec![
            IntPoint::new(0, 0),
            IntPoint::new(4, 4),
            IntPoint::new(0, 4),
        ]];
        let solution = run(&subject, &clip, ClipType::Union, PolyFillType::EvenOdd);
        assert_eq!(solution.len(), 1);
        assert_eq!(total_area(&solution), 12.0);
    }

    #[test]
    fn test_difference_produces_hole_in_tree() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 10), PolyType::Subject, true).unwrap();
        c.add_path(&square(3, 3, 4), PolyType::Clip, true).unwrap();
        let tree = c
            .execute_tree(
                ClipType::Difference,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            )
            .unwrap();

        assert_eq!(tree.roots().len(), 1);
        let root = tree.roots()[0];
        assert!(!tree.is_hole(root));
        assert_eq!(area(&tree.node(root).contour).abs(), 100.0);

        assert_eq!(tree.node(root).child_count(), 1);
        let hole = tree.node(root).children()[0];
        assert!(tree.is_hole(hole));
        assert_eq!(area(&tree.node(hole).contour).abs(), 16.0);
        assert_eq!(tree.total(), 2);
    }

    #[test]
    fn test_figure_eight_union_splits_in_two() {
        let bowtie = vec![vec![
            IntPoint::new(0, 0),
            IntPoint::new(4, 4),
            IntPoint::new(0, 4),
            IntPoint::new(4, 0),
        ]];
        let solution = run(&bowtie, &[], ClipType::Union, PolyFillType::EvenOdd);
        assert_eq!(solution.len(), 2);
        assert_eq!(total_area(&solution), 8.0);
    }

    #[test]
    fn test_difference_self_annihilates() {
        let solution = run(
            &[square(0, 0, 10)],
            &[square(0, 0, 10)],
            ClipType::Difference,
            PolyFillType::EvenOdd,
        );
        assert_eq!(total_area(&solution), 0.0);
    }

    #[test]
    fn test_union_with_self_is_simplification() {
        let p = square(0, 0, 10);
        let solution = run(&[p.clone()], &[p], ClipType::Union, PolyFillType::EvenOdd);
        assert_eq!(solution.len(), 1);
        assert_eq!(area(&solution[0]).abs(), 100.0);
    }

    #[test]
    fn test_xor_is_symmetric() {
        let a = vec![square(0, 0, 10)];
        let b = vec![square(5, 5, 10)];
        let ab = run(&a, &b, ClipType::Xor, PolyFillType::EvenOdd);
        let ba = run(&b, &a, ClipType::Xor, PolyFillType::EvenOdd);
        assert_eq!(total_area(&ab), total_area(&ba));
        assert_eq!(total_area(&ab), 150.0); // 100 + 100 - 2*25
    }

    #[test]
    fn test_disjoint_union_keeps_two_paths() {
        let solution = run(
            &[square(0, 0, 10)],
            &[square(20, 0, 10)],
            ClipType::Union,
            PolyFillType::EvenOdd,
        );
        assert_eq!(solution.len(), 2);
        assert_eq!(total_area(&solution), 200.0);
    }

    #[test]
    fn test_shared_edge_union_merges() {
        // two rectangles stacked along a shared horizontal edge
        let solution = run(
            &[vec![
                IntPoint::new(0, 0),
                IntPoint::new(10, 0),
                IntPoint::new(10, 5),
                IntPoint::new(0, 5),
            ]],
            &[vec![
                IntPoint::new(0, 5),
                IntPoint::new(10, 5),
                IntPoint::new(10, 10),
                IntPoint::new(0, 10),
            ]],
            ClipType::Union,
            PolyFillType::EvenOdd,
        );
        assert_eq!(solution.len(), 1);
        assert_eq!(area(&solution[0]).abs(), 100.0);
        // the shared edge is gone entirely
        assert_eq!(solution[0].len(), 4);
    }

    #[test]
    fn test_fill_rules_on_double_wound_region() {
        // a large square plus a smaller one inside it, both wound the
        // same way, as a single subject set
        let subject = vec![square(0, 0, 10), square(2, 2, 4)];

        // EvenOdd: the inner square flips to a hole
        let eo = run(&subject, &[], ClipType::Union, PolyFillType::EvenOdd);
        let eo_net: f64 = eo.iter().map(|p| area(p)).sum();
        assert_eq!(eo_net.abs(), 100.0 - 16.0);

        // NonZero: the region is simply filled
        let nz = run(&subject, &[], ClipType::Union, PolyFillType::NonZero);
        assert_eq!(nz.len(), 1);
        assert_eq!(area(&nz[0]).abs(), 100.0);
    }

    #[test]
    fn test_positive_negative_fill() {
        let cw = square(0, 0, 10); // positive orientation in y-down coords
        let mut ccw = cw.clone();
        ccw.reverse();

        let pos = run(&[cw.clone()], &[], ClipType::Union, PolyFillType::Positive);
        assert_eq!(total_area(&pos), 100.0);
        let neg = run(&[cw], &[], ClipType::Union, PolyFillType::Negative);
        assert!(neg.is_empty());

        let neg2 = run(&[ccw], &[], ClipType::Union, PolyFillType::Negative);
        assert_eq!(total_area(&neg2), 100.0);
    }

    #[test]
    fn test_open_path_requires_tree_solution() {
        let mut c = Clipper::new();
        c.add_path(
            &[IntPoint::new(0, 5), IntPoint::new(20, 5)],
            PolyType::Subject,
            false,
        )
        .unwrap();
        c.add_path(&square(0, 0, 10), PolyType::Clip, true).unwrap();
        assert_eq!(
            c.execute(
                ClipType::Intersection,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            ),
            Err(ClipError::OpenPathsRequireTree)
        );
    }

    #[test]
    fn test_open_path_clipped_by_square() {
        let mut c = Clipper::new();
        c.add_path(
            &[IntPoint::new(-5, 5), IntPoint::new(15, 5)],
            PolyType::Subject,
            false,
        )
        .unwrap();
        c.add_path(&square(0, 0, 10), PolyType::Clip, true).unwrap();
        let tree = c
            .execute_tree(
                ClipType::Intersection,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            )
            .unwrap();

        let open = crate::tree::open_paths_from_polytree(&tree);
        assert_eq!(open.len(), 1);
        let line = &open[0];
        assert_eq!(line.len(), 2);
        assert!(line.contains(&IntPoint::new(0, 5)));
        assert!(line.contains(&IntPoint::new(10, 5)));
    }

    #[test]
    fn test_open_path_difference() {
        // the parts of the line outside the square survive
        let mut c = Clipper::new();
        c.add_path(
            &[IntPoint::new(-5, 5), IntPoint::new(15, 5)],
            PolyType::Subject,
            false,
        )
        .unwrap();
        c.add_path(&square(0, 0, 10), PolyType::Clip, true).unwrap();
        let tree = c
            .execute_tree(
                ClipType::Difference,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            )
            .unwrap();
        let open = crate::tree::open_paths_from_polytree(&tree);
        assert_eq!(open.len(), 2);
        for line in &open {
            assert_eq!(line.len(), 2);
        }
    }

    #[test]
    fn test_strictly_simple_splits_corner_touch() {
        // two squares sharing exactly one corner
        let subject = vec![square(0, 0, 5), square(5, 5, 5)];

        let lax = run(&subject, &[], ClipType::Union, PolyFillType::NonZero);
        assert_eq!(total_area(&lax), 50.0);

        let mut c = Clipper::new();
        c.set_strictly_simple(true);
        c.add_paths(&subject, PolyType::Subject, true).unwrap();
        let strict = c
            .execute(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(strict.len(), 2);
        for p in &strict {
            assert_eq!(area(p).abs(), 25.0);
        }
    }

    #[test]
    fn test_preserve_collinear_keeps_midpoints() {
        let path = vec![
            IntPoint::new(0, 0),
            IntPoint::new(5, 0),
            IntPoint::new(10, 0),
            IntPoint::new(10, 10),
            IntPoint::new(0, 10),
        ];
        let mut c = Clipper::new();
        c.set_preserve_collinear(true);
        c.add_path(&path, PolyType::Subject, true).unwrap();
        let solution = c
            .execute(ClipType::Union, PolyFillType::EvenOdd, PolyFillType::EvenOdd)
            .unwrap();
        assert_eq!(solution.len(), 1);
        assert_eq!(solution[0].len(), 5);
        assert!(solution[0].contains(&IntPoint::new(5, 0)));

        // without the flag the midpoint is merged away
        let plain = run(&[path], &[], ClipType::Union, PolyFillType::EvenOdd);
        assert_eq!(plain[0].len(), 4);
    }

    #[test]
    fn test_reverse_solution_flips_orientation() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 10), PolyType::Subject, true).unwrap();
        c.set_reverse_solution(true);
        let rev = c
            .execute(ClipType::Union, PolyFillType::EvenOdd, PolyFillType::EvenOdd)
            .unwrap();
        assert_eq!(rev.len(), 1);
        assert!(area(&rev[0]) < 0.0);
    }

    #[test]
    fn test_execute_is_repeatable_without_clear() {
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 10), PolyType::Subject, true).unwrap();
        c.add_path(&square(5, 5, 10), PolyType::Clip, true).unwrap();
        let first = c
            .execute(
                ClipType::Intersection,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            )
            .unwrap();
        let second = c
            .execute(
                ClipType::Intersection,
                PolyFillType::EvenOdd,
                PolyFillType::EvenOdd,
            )
            .unwrap();
        assert_eq!(first, second);

        // a different op on the same inputs also works
        let union = c
            .execute(ClipType::Union, PolyFillType::EvenOdd, PolyFillType::EvenOdd)
            .unwrap();
        assert_eq!(total_area(&union), 175.0);
    }

    #[cfg(not(feature = "coord32"))]
    #[test]
    fn test_full_range_coordinates() {
        use crate::primitives::LO_RANGE;
        let big = LO_RANGE * 4; // beyond the 64-bit product range
        let a = square(big, big, 1000);
        let b = square(big + 500, big + 500, 1000);
        let solution = run(&[a], &[b], ClipType::Intersection, PolyFillType::EvenOdd);
        assert_eq!(solution.len(), 1);
        assert_eq!(area(&solution[0]).abs(), 250_000.0);
    }

    #[test]
    fn test_nested_holes_alternate_in_tree() {
        // outline, ring hole, and island: the classic bullseye
        let mut c = Clipper::new();
        c.add_path(&square(0, 0, 30), PolyType::Subject, true).unwrap();
        let mut ring = square(5, 5, 20);
        ring.reverse();
        c.add_path(&ring, PolyType::Subject, true).unwrap();
        c.add_path(&square(10, 10, 10), PolyType::Subject, true).unwrap();

        let tree = c
            .execute_tree(ClipType::Union, PolyFillType::NonZero, PolyFillType::NonZero)
            .unwrap();
        assert_eq!(tree.total(), 3);
        let outer = tree.roots()[0];
        let hole = tree.node(outer).children()[0];
        let island = tree.node(hole).children()[0];
        assert!(!tree.is_hole(outer));
        assert!(tree.is_hole(hole));
        assert!(!tree.is_hole(island));
        assert_eq!(area(&tree.node(island).contour).abs(), 100.0);
    }

    #[test]
    fn test_output_vertices_lie_on_result_boundary() {
        let solution = run(
            &[square(0, 0, 10)],
            &[square(5, 5, 10)],
            ClipType::Intersection,
            PolyFillType::EvenOdd,
        );
        for pt in &solution[0] {
            assert_eq!(
                point_in_polygon(*pt, &solution[0]),
                PointLocation::OnBoundary
            );
        }
    }

    #[test]
    fn test_intersection_with_no_overlap_is_empty() {
        let solution = run(
            &[square(0, 0, 10)],
            &[square(100, 100, 10)],
            ClipType::Intersection,
            PolyFillType::EvenOdd,
        );
        assert!(solution.is_empty());
    }

    #[test]
    fn test_bounds_forwarded() {
        let mut c = Clipper::new();
        c.add_path(&square(-5, -7, 12), PolyType::Subject, true).unwrap();
        let b = c.bounds();
        assert_eq!((b.left, b.top, b.right, b.bottom), (-5, -7, 7, 5));
    }
}
