use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashSet},
    ops::ControlFlow,
};

use itertools::Itertools;
use log::{trace, warn};

use super::Intersection;
use crate::{
    active::OrderedSet,
    events::{Event, EventType},
    line_or_point::{intersect_segments, LineOrPoint},
    segments::Segment,
    sweep::{compare_slopes, sweep_tolerance, Side, SweepLine},
    utils::{partial_max, partial_min},
    Float, SegmentId,
};

/// Events sharing one sweep abscissa, grouped by type.
#[derive(Debug, Default)]
struct Batch {
    ends: Vec<SegmentId>,
    crossings: Vec<SegmentId>,
    verticals: Vec<SegmentId>,
    starts: Vec<SegmentId>,
}

impl Batch {
    fn push<T: Float>(&mut self, event: Event<T>) {
        let list = match event.ty {
            EventType::End => &mut self.ends,
            EventType::Crossing => &mut self.crossings,
            EventType::Vertical => &mut self.verticals,
            EventType::Start => &mut self.starts,
        };
        list.push(event.segment);
    }

    fn ids(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.ends
            .iter()
            .chain(&self.crossings)
            .chain(&self.verticals)
            .chain(&self.starts)
            .copied()
    }
}

/// Sweep algorithm detecting every pair of intersecting segments.
///
/// Maintains a heap of events keyed by `x` and the ordered set of the
/// non-vertical segments crossing the sweep line. Each pair is tested at
/// most once; every pair that tests positive is reported.
pub(crate) struct Sweep<'a, T: Float> {
    segments: &'a [Segment<T>],
    tolerance: T,
    events: BinaryHeap<Event<T>>,
    active: OrderedSet<SegmentId>,
    tested: HashSet<(SegmentId, SegmentId)>,
}

impl<'a, T: Float> Sweep<'a, T> {
    pub fn new(segments: &'a [Segment<T>]) -> Self {
        let mut events = BinaryHeap::with_capacity(2 * segments.len());
        for (segment, s) in segments.iter().enumerate() {
            let x = s.min().x();
            if s.is_point() || s.is_sweep_vertical() {
                events.push(Event {
                    x,
                    ty: EventType::Vertical,
                    segment,
                });
            } else {
                events.push(Event {
                    x,
                    ty: EventType::Start,
                    segment,
                });
                events.push(Event {
                    x: s.max().x(),
                    ty: EventType::End,
                    segment,
                });
            }
        }
        Sweep {
            segments,
            tolerance: sweep_tolerance(segments),
            events,
            active: OrderedSet::new(),
            tested: HashSet::new(),
        }
    }

    /// Run the sweep to completion, or until `cb` breaks.
    pub fn run<F>(&mut self, cb: &mut F) -> ControlFlow<()>
    where
        F: FnMut(Intersection<T>) -> ControlFlow<()>,
    {
        while let Some(event) = self.events.pop() {
            let x = event.x;
            let mut batch = Batch::default();
            batch.push(event);
            while self.events.peek().map_or(false, |e| e.x == x) {
                if let Some(e) = self.events.pop() {
                    batch.push(e);
                }
            }
            batch.crossings.sort_unstable();
            batch.crossings.dedup();
            self.handle_batch(x, &batch, cb)?;
        }
        ControlFlow::Continue(())
    }

    fn handle_batch<F>(&mut self, x: T, batch: &Batch, cb: &mut F) -> ControlFlow<()>
    where
        F: FnMut(Intersection<T>) -> ControlFlow<()>,
    {
        trace!(
            "batch at x = {:?}: {} ends, {} crossings, {} verticals, {} starts",
            x,
            batch.ends.len(),
            batch.crossings.len(),
            batch.verticals.len(),
            batch.starts.len()
        );
        let before = SweepLine::new(self.segments, self.tolerance, x, Side::Before);
        let after = before.with_side(Side::After);

        // Segments leaving the sweep line, or re-sorted at a crossing.
        let leaving: Vec<_> = batch.ends.iter().chain(&batch.crossings).copied().collect();
        let mut stale = false;
        for id in &leaving {
            stale |= self.active.remove(id, &before).is_none();
        }
        if stale {
            warn!("active set out of order at x = {:?}, rebuilding", x);
            let leaving: HashSet<_> = leaving.into_iter().collect();
            self.active.retain(|id| !leaving.contains(id));
        }

        self.test_contacts(&before, batch, cb)?;

        for &id in batch.starts.iter().chain(&batch.crossings) {
            self.active.insert(id, &after);
        }

        let mut pairs = Vec::new();
        for &id in batch.starts.iter().chain(&batch.crossings) {
            if let Some(&prev) = self.active.find_prev(&id, &after).value() {
                pairs.push((prev, id));
            }
            if let Some(&next) = self.active.find_next(&id, &after).value() {
                pairs.push((id, next));
            }
        }
        // Segments closing the gaps left by the ended ones.
        let margin = self.tolerance + self.tolerance;
        for &id in &batch.ends {
            let y = after.y(id);
            let window = self.active_window(&after, y - margin, y + margin);
            pairs.extend(window.into_iter().tuple_windows::<(SegmentId, SegmentId)>());
        }
        for (a, b) in pairs {
            self.test_pair(x, a, b, cb)?;
        }

        #[cfg(feature = "slow-asserts")]
        {
            if !self.active.is_sorted_by(&after) || !self.active.is_balanced() {
                warn!("active set invariants violated after batch at x = {:?}", x);
            }
        }
        ControlFlow::Continue(())
    }

    /// Test every batch segment against the others of the batch and
    /// against the active segments passing through its span at `x`.
    fn test_contacts<F>(&mut self, line: &SweepLine<'a, T>, batch: &Batch, cb: &mut F) -> ControlFlow<()>
    where
        F: FnMut(Intersection<T>) -> ControlFlow<()>,
    {
        let margin = self.tolerance + self.tolerance;
        let mut members: Vec<_> = batch
            .ids()
            .map(|id| {
                let (lo, hi) = self.span_at(line, id);
                (lo, hi, id)
            })
            .collect();
        members.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        for (i, &(_, hi, id)) in members.iter().enumerate() {
            for &(lo, _, other) in &members[i + 1..] {
                if lo > hi + margin {
                    break;
                }
                self.test_pair(line.x(), id, other, cb)?;
            }
        }
        for &(lo, hi, id) in &members {
            for other in self.active_between(line, lo - margin, hi + margin) {
                self.test_pair(line.x(), id, other, cb)?;
            }
        }
        ControlFlow::Continue(())
    }

    /// The `y`-interval covered by segment `id` on the sweep line.
    fn span_at(&self, line: &SweepLine<'a, T>, id: SegmentId) -> (T, T) {
        let s = line.segment(id);
        if s.is_point() || s.is_sweep_vertical() {
            let (a, b) = (s.start().y(), s.end().y());
            (partial_min(a, b), partial_max(a, b))
        } else {
            let y = line.y(id);
            (y, y)
        }
    }

    /// Active segments whose `y` at the sweep line lies in `[lo, hi]`.
    fn active_between(&self, line: &SweepLine<'a, T>, lo: T, hi: T) -> Vec<SegmentId> {
        let mut found = Vec::new();
        let mut cursor = self.active.lower_bound_by(|&id| {
            if line.y(id) < lo {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        while let Some(&id) = cursor.get() {
            if line.y(id) > hi {
                break;
            }
            found.push(id);
            cursor.move_next();
        }
        found
    }

    /// Consecutive active segments covering `[lo, hi]` on the sweep line,
    /// extended by one segment on each side.
    fn active_window(&self, line: &SweepLine<'a, T>, lo: T, hi: T) -> Vec<SegmentId> {
        let mut cursor = self.active.lower_bound_by(|&id| {
            if line.y(id) < lo {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        let mut below = cursor.clone();
        if below.get().is_some() {
            below.move_prev();
        } else {
            below = self.active.last();
        }

        let mut window: Vec<_> = below.get().copied().into_iter().collect();
        while let Some(&id) = cursor.get() {
            window.push(id);
            if line.y(id) > hi {
                break;
            }
            cursor.move_next();
        }
        window
    }

    fn test_pair<F>(&mut self, x: T, a: SegmentId, b: SegmentId, cb: &mut F) -> ControlFlow<()>
    where
        F: FnMut(Intersection<T>) -> ControlFlow<()>,
    {
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        if first == second || !self.tested.insert((first, second)) {
            return ControlFlow::Continue(());
        }
        if let Some(geometry) = intersect_segments(&self.segments[first], &self.segments[second]) {
            trace!("segments {} and {} meet at {:?}", first, second, geometry);
            if let LineOrPoint::Point(p) = geometry {
                if p.x() > x {
                    self.schedule_crossing(first, p.x());
                    self.schedule_crossing(second, p.x());
                }
            }
            cb(Intersection {
                geometry,
                first,
                second,
            })?;
        }

        // Collinear copies of an operand are ordered by id alone: only one
        // of them is adjacent to the other operand.
        for tie in self.ties_at(x, first) {
            self.test_pair(x, tie, second, cb)?;
        }
        for tie in self.ties_at(x, second) {
            self.test_pair(x, first, tie, cb)?;
        }
        ControlFlow::Continue(())
    }

    /// Active segments tying with `id` at `x`: same `y` and same slope.
    fn ties_at(&self, x: T, id: SegmentId) -> Vec<SegmentId> {
        let s = &self.segments[id];
        if s.is_point() || s.is_sweep_vertical() || x < s.min().x() || x > s.max().x() {
            return Vec::new();
        }
        let line = SweepLine::new(self.segments, self.tolerance, x, Side::After);
        let (y, slope) = (line.y(id), s.slope());
        self.active_between(&line, y - self.tolerance, y + self.tolerance)
            .into_iter()
            .filter(|&other| {
                other != id && compare_slopes(self.segments[other].slope(), slope) == Ordering::Equal
            })
            .collect()
    }

    /// Re-sort `segment` when the sweep reaches `x`.
    fn schedule_crossing(&mut self, segment: SegmentId, x: T) {
        let s = &self.segments[segment];
        if !s.is_point() && !s.is_sweep_vertical() && s.max().x() > x {
            self.events.push(Event {
                x,
                ty: EventType::Crossing,
                segment,
            });
        }
    }
}
