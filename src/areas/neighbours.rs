use std::collections::{BinaryHeap, HashSet};

use log::{debug, trace, warn};

use super::{BOTTOM_LABEL, TOP_LABEL};
use crate::{
    active::OrderedSet,
    containers::SegmentsSet,
    events::{Event, EventType},
    labels::{LabelValue, Labeled, LAYER_LABEL, UNASSIGNED, UNCHECKED},
    segments::Segment,
    sweep::{sweep_tolerance, Side, SweepLine},
    Error, Float, Result, SegmentId,
};

/// Neighbour labels of an arrangement, from both sweep directions.
///
/// Both sets hold the segments of the input layer unchanged, labelled
/// with [`LAYER_LABEL`] (copied), [`TOP_LABEL`] and [`BOTTOM_LABEL`].
/// `normal` sweeps along `x`; `rotated` sweeps the layer turned by 90°
/// (see [`Segment::rotated`]), where "top" is the `+x` side of a vertical
/// segment. A segment that is vertical in a frame keeps [`UNCHECKED`] in
/// that frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbours<T: Float> {
    pub normal: SegmentsSet<T>,
    pub rotated: SegmentsSet<T>,
}

/// Find, for every segment of `layer`, the segment directly above and
/// directly below it.
///
/// `layer` must be an arrangement (segments meet only at end points) and
/// carry [`LAYER_LABEL`].
pub fn find_segments_neighbours<T: Float>(layer: &SegmentsSet<T>) -> Result<Neighbours<T>> {
    if !layer.has_label(LAYER_LABEL) {
        return Err(Error::MissingLabel(LAYER_LABEL));
    }
    let layers = layer.get_label_values(LAYER_LABEL)?;

    let normal = sweep_neighbours(layer.segments());
    let rotated_segments: Vec<_> = layer.iter().map(Segment::rotated).collect();
    let rotated = sweep_neighbours(&rotated_segments);

    let neighbours = Neighbours {
        normal: labelled(layer, layers, normal)?,
        rotated: labelled(layer, layers, rotated)?,
    };
    debug!(
        "neighbours of {} segments: {} checked in the normal frame, {} in the rotated one",
        layer.len(),
        checked(&neighbours.normal),
        checked(&neighbours.rotated),
    );
    Ok(neighbours)
}

fn labelled<T: Float>(
    layer: &SegmentsSet<T>,
    layers: &[LabelValue],
    (tops, bottoms): (Vec<LabelValue>, Vec<LabelValue>),
) -> Result<SegmentsSet<T>> {
    let mut set = SegmentsSet::from_segments(layer.segments().to_vec());
    set.set_labels_types(&[LAYER_LABEL, TOP_LABEL, BOTTOM_LABEL])?;
    set.set_label_values(LAYER_LABEL, layers)?;
    set.set_label_values(TOP_LABEL, &tops)?;
    set.set_label_values(BOTTOM_LABEL, &bottoms)?;
    Ok(set)
}

fn checked<T: Float>(set: &SegmentsSet<T>) -> usize {
    set.get_label_values(TOP_LABEL)
        .map(|tops| tops.iter().filter(|&&v| v != UNCHECKED).count())
        .unwrap_or(0)
}

/// One neighbour sweep along `x`: the top and bottom neighbour of every
/// non-vertical segment, read right after the batch that inserts it.
fn sweep_neighbours<T: Float>(segments: &[Segment<T>]) -> (Vec<LabelValue>, Vec<LabelValue>) {
    let tolerance = sweep_tolerance(segments);
    let mut tops = vec![UNCHECKED; segments.len()];
    let mut bottoms = vec![UNCHECKED; segments.len()];

    let mut events = BinaryHeap::with_capacity(2 * segments.len());
    for (segment, s) in segments.iter().enumerate() {
        if s.is_point() || s.is_sweep_vertical() {
            continue;
        }
        events.push(Event {
            x: s.min().x(),
            ty: EventType::Start,
            segment,
        });
        events.push(Event {
            x: s.max().x(),
            ty: EventType::End,
            segment,
        });
    }

    let mut active: OrderedSet<SegmentId> = OrderedSet::new();
    let mut ends = Vec::new();
    let mut starts = Vec::new();
    while let Some(event) = events.pop() {
        let x = event.x;
        ends.clear();
        starts.clear();
        let mut next = Some(event);
        while let Some(e) = next {
            match e.ty {
                EventType::Start => starts.push(e.segment),
                _ => ends.push(e.segment),
            }
            next = if events.peek().map_or(false, |e| e.x == x) {
                events.pop()
            } else {
                None
            };
        }
        trace!("neighbours batch at x = {:?}: {} ends, {} starts", x, ends.len(), starts.len());

        let before = SweepLine::new(segments, tolerance, x, Side::Before);
        let after = before.with_side(Side::After);

        let mut stale = false;
        for id in &ends {
            stale |= active.remove(id, &before).is_none();
        }
        if stale {
            warn!("neighbour set out of order at x = {:?}, rebuilding", x);
            let ended: HashSet<_> = ends.iter().copied().collect();
            active.retain(|id| !ended.contains(id));
        }

        for &id in &starts {
            active.insert(id, &after);
        }
        for &id in &starts {
            tops[id] = active
                .find_next(&id, &after)
                .value()
                .map_or(UNASSIGNED, |&above| above as LabelValue);
            bottoms[id] = active
                .find_prev(&id, &after)
                .value()
                .map_or(UNASSIGNED, |&below| below as LabelValue);
        }
    }
    (tops, bottoms)
}
