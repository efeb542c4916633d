//! Arrangement builder.
//!
//! Cuts the segments of a set at their mutual intersections, producing a
//! [`SegmentsLayer`] whose segments only meet at shared end points. Each
//! piece inherits the label values of the segment it was cut from.
//!
//! The pieces of a segment keep its direction and are emitted in order
//! along it. Each intersection record contributes a fixed change to the
//! number of segments (see [`segments_count_delta`]):
//!
//! | record | change |
//! |---|---|
//! | point, interior to both segments | `+2` |
//! | point, end point of exactly one segment | `+1` |
//! | point, end point of both segments | `0` |
//! | overlap of identical segments | `-1` |
//! | overlap nested in the other segment, sharing an end point | `0` |
//! | overlap nested in the other segment, strictly inside | `+1` |
//! | partial overlap | `+1` |
//!
//! The count is exact as long as no two records cut a segment at the same
//! point.
use geo::CoordNum;
use log::debug;
use smallvec::{smallvec, SmallVec};

use crate::{
    containers::{CircuitsSet, SegmentsLayer, SegmentsSet},
    crossings::{intersect_set_segments, Intersection},
    events::Point,
    labels::{Labeled, Labels, LAYER_LABEL},
    line_or_point::LineOrPoint,
    segments::Segment,
    Error, Float, Result, SegmentId,
};

type Pieces<T> = SmallVec<[Segment<T>; 4]>;

/// How a record affects its two segments.
enum Cut<T: CoordNum> {
    /// Cut each listed segment at the point.
    Split(Point<T>, SmallVec<[SegmentId; 2]>),
    /// Drop the duplicate of an identical pair.
    Drop(SegmentId),
    /// Remove the span from `outer`; the other segment owns it.
    Carve { outer: SegmentId, span: Segment<T> },
    /// Cut `left` at the start of the span and remove the span from `right`.
    Overlap {
        left: SegmentId,
        right: SegmentId,
        span: Segment<T>,
    },
}

fn operands<'a, T: CoordNum>(
    set: &'a SegmentsSet<T>,
    record: &Intersection<T>,
) -> Result<(&'a Segment<T>, &'a Segment<T>)> {
    let len = set.len();
    let get = move |id: SegmentId| set.get(id).ok_or(Error::SegmentOutOfRange { id, len });
    Ok((get(record.first)?, get(record.second)?))
}

fn classify<T: CoordNum>(set: &SegmentsSet<T>, record: &Intersection<T>) -> Result<Cut<T>> {
    let (a, b) = operands(set, record)?;
    let (first, second) = (record.first, record.second);
    if a == b {
        return Ok(Cut::Drop(first.max(second)));
    }
    let cut = match record.geometry {
        LineOrPoint::Point(p) => {
            if a.endpoint_count(p) + b.endpoint_count(p) > 2 {
                return Err(Error::UnsupportedIntersection { first, second });
            }
            let ids = [(first, a), (second, b)]
                .iter()
                .filter(|(_, s)| !s.has_endpoint(p))
                .map(|(id, _)| *id)
                .collect();
            Cut::Split(p, ids)
        }
        LineOrPoint::Line(span) => {
            if span == *a {
                Cut::Carve { outer: second, span }
            } else if span == *b {
                Cut::Carve { outer: first, span }
            } else if a.min() < b.min() {
                Cut::Overlap {
                    left: first,
                    right: second,
                    span,
                }
            } else {
                Cut::Overlap {
                    left: second,
                    right: first,
                    span,
                }
            }
        }
    };
    Ok(cut)
}

/// Change in the number of segments caused by one record.
pub fn segments_count_delta<T: CoordNum>(
    set: &SegmentsSet<T>,
    record: &Intersection<T>,
) -> Result<isize> {
    let delta = match classify(set, record)? {
        Cut::Split(_, ids) => ids.len() as isize,
        Cut::Drop(_) => -1,
        Cut::Carve { outer, span } => {
            let outer = &set[outer];
            if outer.min() == span.min() || outer.max() == span.max() {
                0
            } else {
                1
            }
        }
        Cut::Overlap { .. } => 1,
    };
    Ok(delta)
}

/// Number of segments the arrangement of `set` cut by `records` holds.
pub fn expected_segments_count<T: CoordNum>(
    set: &SegmentsSet<T>,
    records: &[Intersection<T>],
) -> Result<usize> {
    let mut count = set.len() as isize;
    for record in records {
        count += segments_count_delta(set, record)?;
    }
    Ok(count.max(0) as usize)
}

/// Cut the piece strictly containing `p` in two.
fn split_at<T: CoordNum>(pieces: &mut Pieces<T>, p: Point<T>) {
    if let Some(k) = pieces.iter().position(|s| s.min() < p && p < s.max()) {
        let piece = pieces[k];
        pieces[k] = Segment::new(piece.start(), p);
        pieces.insert(k + 1, Segment::new(p, piece.end()));
    }
}

/// Remove the span `lo..hi` from the pieces.
fn carve<T: CoordNum>(pieces: &mut Pieces<T>, span: &Segment<T>) {
    let (lo, hi) = (span.min(), span.max());
    let mut kept = Pieces::new();
    for piece in pieces.iter() {
        let (min, max) = (piece.min(), piece.max());
        if max <= lo || min >= hi {
            kept.push(*piece);
            continue;
        }
        let mut rest: SmallVec<[Segment<T>; 2]> = SmallVec::new();
        if min < lo {
            rest.push(Segment::new(min, lo));
        }
        if max > hi {
            rest.push(Segment::new(hi, max));
        }
        if piece.start() <= piece.end() {
            kept.extend(rest);
        } else {
            kept.extend(rest.into_iter().rev().map(|s| s.reversed()));
        }
    }
    *pieces = kept;
}

/// Build the arrangement of `set` from explicit intersection records.
///
/// Fails without output if a record references a missing segment, or
/// relates a point segment to an end point of the other segment.
pub fn split_segments<T: CoordNum>(
    set: &SegmentsSet<T>,
    records: &[Intersection<T>],
) -> Result<SegmentsLayer<T>> {
    let mut pieces: Vec<Pieces<T>> = set.iter().map(|s| smallvec![*s]).collect();
    let mut dropped = vec![false; set.len()];

    for record in records {
        match classify(set, record)? {
            Cut::Split(p, ids) => {
                for id in ids {
                    split_at(&mut pieces[id], p);
                }
            }
            Cut::Drop(id) => dropped[id] = true,
            Cut::Carve { outer, span } => carve(&mut pieces[outer], &span),
            Cut::Overlap { left, right, span } => {
                split_at(&mut pieces[left], span.min());
                carve(&mut pieces[right], &span);
            }
        }
    }

    let mut segments = Vec::with_capacity(pieces.len());
    let mut parents = Vec::with_capacity(pieces.len());
    for (id, list) in pieces.into_iter().enumerate() {
        if dropped[id] {
            continue;
        }
        parents.extend(std::iter::repeat(id).take(list.len()));
        segments.extend(list);
    }
    debug!(
        "arrangement: {} segments, {} records, {} pieces",
        set.len(),
        records.len(),
        segments.len()
    );
    let labels: Labels = set.labels().select(parents);
    Ok(SegmentsLayer::new(SegmentsSet::from_parts(segments, labels)))
}

/// Intersect `set` and build its arrangement.
pub fn convert_to_segments_layer<T: Float>(set: &SegmentsSet<T>) -> Result<SegmentsLayer<T>> {
    let records = intersect_set_segments(set);
    split_segments(set, &records)
}

/// Build the arrangement of the flattened segments of `circuits`.
pub fn convert_circuits_to_segments_layer<T: Float>(
    circuits: &CircuitsSet<T>,
) -> Result<SegmentsLayer<T>> {
    convert_to_segments_layer(&circuits.to_segments_set())
}

/// Concatenate the segments of two circuit layers and tag each with its
/// source layer in [`LAYER_LABEL`]: `0` for `first`, `1` for `second`.
pub fn merge_circuits_layers<T: CoordNum>(
    first: &CircuitsSet<T>,
    second: &CircuitsSet<T>,
) -> Result<SegmentsSet<T>> {
    let segments: Vec<_> = first
        .segments()
        .iter()
        .chain(second.segments())
        .copied()
        .collect();
    let layers: Vec<_> = std::iter::repeat(0)
        .take(first.segments().len())
        .chain(std::iter::repeat(1).take(second.segments().len()))
        .collect();

    let mut merged = SegmentsSet::from_segments(segments);
    merged.set_labels_types(&[LAYER_LABEL])?;
    merged.set_label_values(LAYER_LABEL, &layers)?;
    Ok(merged)
}
