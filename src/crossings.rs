//! Intersection engine.
//!
//! Reports every pair of segments of a [`SegmentsSet`] that share at least
//! one point, using a [Bentley-Ottman] style plane sweep. Touching counts:
//! segments meeting at a common end point are reported as well. Collinear
//! segments sharing a span are reported with the span as geometry.
//!
//! [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
use std::ops::ControlFlow;

use geo::CoordNum;
use log::debug;

use crate::{
    containers::SegmentsSet,
    line_or_point::{intersect_segments, LineOrPoint},
    segments::Segment,
    Float, SegmentId,
};

mod sweep;
use sweep::Sweep;

/// An intersection record: the geometry shared by two segments of one set.
///
/// `first < second` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection<T: CoordNum> {
    pub geometry: LineOrPoint<T>,
    pub first: SegmentId,
    pub second: SegmentId,
}

impl<T: CoordNum> Intersection<T> {
    /// Whether the segments only meet at an end point of both.
    ///
    /// Such contacts are expected in an arrangement; every other record
    /// means the segments still have to be split.
    pub fn is_shared_endpoint(&self, segments: &[Segment<T>]) -> bool {
        match (self.geometry, segments.get(self.first), segments.get(self.second)) {
            (LineOrPoint::Point(p), Some(a), Some(b)) => a.has_endpoint(p) && b.has_endpoint(p),
            _ => false,
        }
    }
}

/// An intersection record between segments of several sets: each side is
/// a `(set index, segment id)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetsIntersection<T: CoordNum> {
    pub geometry: LineOrPoint<T>,
    pub first: (usize, SegmentId),
    pub second: (usize, SegmentId),
}

/// Run the sweep over `set`, handing each record to `cb` as soon as it is
/// found. Stops early when `cb` returns [`ControlFlow::Break`].
pub fn intersect_set_segments_with<T, F>(set: &SegmentsSet<T>, mut cb: F) -> ControlFlow<()>
where
    T: Float,
    F: FnMut(Intersection<T>) -> ControlFlow<()>,
{
    Sweep::new(set.segments()).run(&mut cb)
}

/// All intersection records of `set`, in sweep order.
pub fn intersect_set_segments<T: Float>(set: &SegmentsSet<T>) -> Vec<Intersection<T>> {
    let mut records = Vec::new();
    let _ = intersect_set_segments_with(set, |record| {
        records.push(record);
        ControlFlow::Continue(())
    });
    debug!(
        "intersection sweep: {} segments, {} records",
        set.len(),
        records.len()
    );
    records
}

/// Whether two segments of `set` meet anywhere other than at a shared end
/// point. `false` exactly when `set` is a planar arrangement.
pub fn has_intersections<T: Float>(set: &SegmentsSet<T>) -> bool {
    let segments = set.segments();
    intersect_set_segments_with(set, |record| {
        if record.is_shared_endpoint(segments) {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    })
    .is_break()
}

/// Intersect the union of several sets; records carry the provenance of
/// both segments. Pairs within one set are reported too.
pub fn intersect_sets<T: Float>(sets: &[SegmentsSet<T>]) -> Vec<SetsIntersection<T>> {
    let mut offsets = Vec::with_capacity(sets.len());
    let mut union = Vec::new();
    for set in sets {
        offsets.push(union.len());
        union.extend_from_slice(set.segments());
    }
    let locate = |id: SegmentId| {
        let set = offsets.partition_point(|&offset| offset <= id) - 1;
        (set, id - offsets[set])
    };

    let records = intersect_set_segments(&SegmentsSet::from_segments(union));
    records
        .into_iter()
        .map(|record| SetsIntersection {
            geometry: record.geometry,
            first: locate(record.first),
            second: locate(record.second),
        })
        .collect()
}

/// Test all pairs. Quadratic; the reference the sweep is checked against.
pub fn intersect_brute_force<T: Float>(set: &SegmentsSet<T>) -> Vec<Intersection<T>> {
    let segments = set.segments();
    let mut records = Vec::new();
    for (first, a) in segments.iter().enumerate() {
        for (second, b) in segments.iter().enumerate().skip(first + 1) {
            if let Some(geometry) = intersect_segments(a, b) {
                records.push(Intersection {
                    geometry,
                    first,
                    second,
                });
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::{Coordinate, Rect};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        events::Point,
        random::{grid_line, uniform_line, uniform_line_with_length},
        utils::init_log,
    };

    fn set(segments: &[[(f64, f64); 2]]) -> SegmentsSet<f64> {
        segments.iter().map(|&s| Segment::from(s)).collect()
    }

    fn pairs(records: &[Intersection<f64>]) -> Vec<(SegmentId, SegmentId)> {
        let mut pairs: Vec<_> = records.iter().map(|r| (r.first, r.second)).collect();
        pairs.sort_unstable();
        pairs
    }

    fn assert_matches_brute_force(set: &SegmentsSet<f64>) {
        let swept = intersect_set_segments(set);
        let expected = intersect_brute_force(set);
        assert_eq!(pairs(&swept), pairs(&expected));
        for record in &swept {
            let reference = expected
                .iter()
                .find(|r| (r.first, r.second) == (record.first, record.second));
            assert_eq!(Some(&record.geometry), reference.map(|r| &r.geometry));
        }
    }

    #[test]
    fn simple_crossing() {
        init_log();
        let input = set(&[[(1., 0.), (0., 1.)], [(0., 0.), (1., 1.)]]);
        let records = intersect_set_segments(&input);
        assert_eq!(records.len(), 1);
        assert_eq!((records[0].first, records[0].second), (0, 1));
        match records[0].geometry {
            LineOrPoint::Point(p) => {
                assert_relative_eq!(p.x(), 0.5);
                assert_relative_eq!(p.y(), 0.5);
            }
            other => panic!("unexpected geometry: {:?}", other),
        }
    }

    #[test]
    fn all_pairs_of_a_triangle_fan() {
        let input = set(&[
            [(1., 0.), (0., 1.)],
            [(0., 0.5), (1., 0.5)],
            [(0., 0.), (1., 1.)],
        ]);
        assert_eq!(intersect_set_segments(&input).len(), 3);
        assert!(has_intersections(&input));
    }

    #[test]
    fn star_through_one_point() {
        let input = set(&[
            [(0., 0.), (8., 6.)],
            [(0., 6.), (8., 0.)],
            [(4., 0.), (4., 6.)],
            [(0., 3.), (8., 3.)],
        ]);
        let records = intersect_set_segments(&input);
        assert_eq!(pairs(&records).len(), 6);
        for record in &records {
            assert_eq!(record.geometry, LineOrPoint::Point(Point::new(4., 3.)));
        }
    }

    #[test]
    fn junctions_and_verticals() {
        let input = set(&[
            // T-junction: 1 starts on the interior of 0.
            [(0., 0.), (4., 0.)],
            [(2., 0.), (2., 3.)],
            // Vertical through the interior of a diagonal.
            [(3., -1.), (3., 4.)],
            [(1., 1.), (5., 3.)],
            // Point segment lying on 0.
            [(1., 0.), (1., 0.)],
        ]);
        let records = intersect_set_segments(&input);
        assert_eq!(
            pairs(&records),
            vec![(0, 1), (0, 2), (0, 4), (1, 3), (2, 3)]
        );
        let t = records.iter().find(|r| (r.first, r.second) == (0, 1));
        assert_eq!(t.map(|r| r.geometry), Some(LineOrPoint::Point(Point::new(2., 0.))));
        assert_matches_brute_force(&input);
    }

    #[test]
    fn collinear_overlap() {
        let input = set(&[[(0., 0.), (4., 0.)], [(6., 0.), (2., 0.)], [(5., 0.), (9., 0.)]]);
        let records = intersect_set_segments(&input);
        assert_eq!(pairs(&records), vec![(0, 1), (1, 2)]);
        assert_eq!(
            records.iter().find(|r| r.first == 0).map(|r| r.geometry),
            Some(LineOrPoint::Line(Segment::from([(2., 0.), (4., 0.)])))
        );
    }

    #[test]
    fn duplicate_segments() {
        init_log();
        // 0 and 2 are the same segment, as are 1 and 3.
        let input = set(&[
            [(6., 5.), (3., 5.)],
            [(4., 0.), (3., 6.)],
            [(3., 5.), (6., 5.)],
            [(4., 0.), (3., 6.)],
        ]);
        let records = intersect_set_segments(&input);
        assert_eq!(
            pairs(&records),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        assert_matches_brute_force(&input);

        // Three copies crossed by a diagonal.
        let tripled = set(&[
            [(0., 0.), (4., 0.)],
            [(4., 0.), (0., 0.)],
            [(0., 0.), (4., 0.)],
            [(1., -2.), (3., 2.)],
        ]);
        assert_eq!(pairs(&intersect_set_segments(&tripled)).len(), 6);
        assert_matches_brute_force(&tripled);
    }

    #[test]
    fn shared_endpoints_only() {
        let input = set(&[
            [(0., 0.), (4., 0.)],
            [(4., 0.), (0., 3.)],
            [(0., 3.), (0., 0.)],
        ]);
        let records = intersect_set_segments(&input);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.is_shared_endpoint(input.segments())));
        assert!(!has_intersections(&input));
    }

    #[test]
    fn early_stop() {
        let input = set(&[
            [(0., 0.), (4., 4.)],
            [(0., 4.), (4., 0.)],
            [(0., 2.), (4., 2.)],
        ]);
        let mut seen = 0;
        let flow = intersect_set_segments_with(&input, |_| {
            seen += 1;
            ControlFlow::Break(())
        });
        assert!(flow.is_break());
        assert_eq!(seen, 1);
    }

    #[test]
    fn provenance_across_sets() {
        let first = set(&[[(0., 0.), (2., 0.)], [(2., 0.), (2., 2.)]]);
        let second = set(&[[(1., -1.), (1., 1.)]]);
        let mut records = intersect_sets(&[first, second]);
        records.sort_by_key(|r| (r.first, r.second));
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].first, records[0].second), ((0, 0), (0, 1)));
        assert_eq!((records[1].first, records[1].second), ((0, 0), (1, 0)));
        assert_eq!(records[1].geometry, LineOrPoint::Point(Point::new(1., 0.)));
    }

    #[test]
    fn random_against_brute_force() {
        init_log();
        let mut rng = StdRng::seed_from_u64(1);
        let bbox: Rect<f64> = Rect::new(Coordinate { x: 0., y: 0. }, Coordinate { x: 100., y: 100. });
        for _ in 0..4 {
            let input: SegmentsSet<f64> = (0..150)
                .map(|_| Segment::from(uniform_line(&mut rng, bbox)))
                .collect();
            assert_matches_brute_force(&input);
        }
        let short: SegmentsSet<f64> = (0..300)
            .map(|_| Segment::from(uniform_line_with_length(&mut rng, bbox, 10.)))
            .collect();
        assert_matches_brute_force(&short);
    }

    #[test]
    fn degenerate_grid_against_brute_force() {
        init_log();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let input: SegmentsSet<f64> = (0..40).map(|_| Segment::from(grid_line(&mut rng, 6))).collect();
            assert_matches_brute_force(&input);
        }
    }

    #[test]
    fn extreme_scales_against_brute_force() {
        init_log();
        let mut rng = StdRng::seed_from_u64(9);
        for scale in [1e-4, 1e7] {
            let bbox: Rect<f64> = Rect::new(
                Coordinate { x: scale, y: scale },
                Coordinate { x: 100. * scale, y: 100. * scale },
            );
            for _ in 0..10 {
                let input: SegmentsSet<f64> = (0..40)
                    .map(|_| Segment::from(uniform_line(&mut rng, bbox)))
                    .collect();
                assert_matches_brute_force(&input);
            }
            // Collinear copies far from the origin still tie.
            let far = set(&[
                [(scale, scale), (50. * scale, 50. * scale)],
                [(50. * scale, 50. * scale), (scale, scale)],
                [(scale, 40. * scale), (40. * scale, scale)],
            ]);
            assert_eq!(pairs(&intersect_set_segments(&far)), vec![(0, 1), (0, 2), (1, 2)]);
        }
    }
}
