use std::cmp::Ordering;

use crate::{
    active::Compare,
    segments::Segment,
    utils::{approx_cmp, cmp_within, magnitude, partial_max},
    Float, SegmentId,
};

/// Side of the sweep abscissa on which segments are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// Just before `x`: ties at `x` are broken by decreasing slope.
    Before,
    /// Just after `x`: ties at `x` are broken by increasing slope.
    After,
}

/// Tolerance of `y` comparisons for a sweep over `segments`: `EPS` times
/// their largest coordinate magnitude.
pub(crate) fn sweep_tolerance<T: Float>(segments: &[Segment<T>]) -> T {
    let largest = segments
        .iter()
        .flat_map(|s| [s.start(), s.end()])
        .fold(T::zero(), |m, p| {
            partial_max(m, partial_max(magnitude(p.x()), magnitude(p.y())))
        });
    T::EPS * largest
}

/// Comparator context of the active set.
///
/// Orders segment ids by the `y` of their segment at the sweep abscissa,
/// then by slope on the given side of the abscissa, and finally by id.
/// Two `y`s within `tolerance` (see [`sweep_tolerance`]) tie. The order is only meaningful for
/// non-vertical segments spanning `x`, and only between two updates of
/// the sweep position: callers remove elements under the old context and
/// re-insert them under the new one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SweepLine<'a, T: Float> {
    segments: &'a [Segment<T>],
    tolerance: T,
    x: T,
    side: Side,
}

impl<'a, T: Float> SweepLine<'a, T> {
    pub fn new(segments: &'a [Segment<T>], tolerance: T, x: T, side: Side) -> Self {
        SweepLine {
            segments,
            tolerance,
            x,
            side,
        }
    }

    /// The same sweep line seen from the other side.
    #[inline]
    pub fn with_side(self, side: Side) -> Self {
        SweepLine { side, ..self }
    }

    #[inline]
    pub fn x(&self) -> T {
        self.x
    }

    #[inline]
    pub fn tolerance(&self) -> T {
        self.tolerance
    }

    #[inline]
    pub fn segment(&self, id: SegmentId) -> &'a Segment<T> {
        &self.segments[id]
    }

    /// The `y` of segment `id` on the sweep line.
    #[inline]
    pub fn y(&self, id: SegmentId) -> T {
        self.segments[id].sweeping_line_y(self.x)
    }
}

impl<'a, T: Float> Compare<SegmentId> for SweepLine<'a, T> {
    fn compare(&self, a: &SegmentId, b: &SegmentId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (sa, sb) = (&self.segments[*a], &self.segments[*b]);
        cmp_within(
            sa.sweeping_line_y(self.x),
            sb.sweeping_line_y(self.x),
            self.tolerance,
        )
        .then_with(|| {
            let by_slope = compare_slopes(sa.slope(), sb.slope());
            match self.side {
                Side::After => by_slope,
                Side::Before => by_slope.reverse(),
            }
        })
        .then_with(|| a.cmp(b))
    }
}

/// Compare slopes relative to their magnitude, so that collinear segments
/// tie regardless of which end points their slopes were computed from.
pub(crate) fn compare_slopes<T: Float>(a: T, b: T) -> Ordering {
    let scale = T::one() + partial_max(magnitude(a), magnitude(b));
    approx_cmp(a / scale, b / scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::active::OrderedSet;

    #[test]
    fn test_crossing_order_flips_across_x() {
        let segments = [
            Segment::from([(0., 0.), (2., 2.)]),
            Segment::from([(0., 2.), (2., 0.)]),
        ];
        let before = SweepLine::new(&segments, sweep_tolerance(&segments), 1., Side::Before);
        let after = before.with_side(Side::After);
        assert_eq!(before.compare(&0, &1), Ordering::Less);
        assert_eq!(after.compare(&0, &1), Ordering::Greater);
        assert_eq!(SweepLine::new(&segments, 1e-9, 0.5, Side::After).compare(&0, &1), Ordering::Less);
    }

    #[test]
    fn test_fan_from_shared_start() {
        let segments = [
            Segment::from([(0., 0.), (1., 1.)]),
            Segment::from([(0., 0.), (1., -1.)]),
            Segment::from([(0., 0.), (2., 0.)]),
            Segment::from([(0., 3.), (2., 3.)]),
        ];
        let line = SweepLine::new(&segments, sweep_tolerance(&segments), 0., Side::After);
        let mut set = OrderedSet::new();
        for id in 0..segments.len() {
            set.insert(id, &line);
        }
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_collinear_ties_by_id() {
        let segments = [
            Segment::from([(0., 0.), (3., 3.)]),
            Segment::from([(1., 1.), (2., 2.)]),
        ];
        for side in [Side::Before, Side::After] {
            let line = SweepLine::new(&segments, sweep_tolerance(&segments), 1.5, side);
            assert_eq!(line.compare(&0, &1), Ordering::Less);
            assert_eq!(line.compare(&1, &0), Ordering::Greater);
        }
    }

    #[test]
    fn test_tolerance_follows_scale() {
        // 1e-6 apart at 3e7: within rounding noise, so the slope decides.
        let large = [
            Segment::from([(0., 3e7), (2e7, 3e7)]),
            Segment::from([(0., 3e7 + 1e-6), (2e7, 3e7 - 1.)]),
        ];
        let tolerance: f64 = sweep_tolerance(&large);
        assert!((tolerance - 1e-9 * 3e7).abs() < 1e-12);
        let line = SweepLine::new(&large, tolerance, 0., Side::After);
        assert_eq!(line.compare(&1, &0), Ordering::Less);

        // 1e-10 apart at 1e-4: distinct parallel segments.
        let small = [
            Segment::from([(0., 1e-10), (1e-4, 1e-10)]),
            Segment::from([(0., 0.), (1e-4, 0.)]),
        ];
        let line = SweepLine::new(&small, sweep_tolerance(&small), 5e-5, Side::After);
        assert_eq!(line.compare(&0, &1), Ordering::Greater);
    }
}
