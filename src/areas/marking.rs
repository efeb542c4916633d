use geo::CoordNum;
use log::{debug, trace, warn};

use super::{
    op::Region, Neighbours, BOTTOM_LABEL, FIRST_BOTTOM, FIRST_TOP, SECOND_BOTTOM, SECOND_TOP,
    TOP_LABEL,
};
use crate::{
    containers::SegmentsSet,
    labels::{LabelId, LabelValue, Labeled, LAYER_LABEL, UNCHECKED},
    Error, Float, Result, SegmentId,
};

/// Bypass walk along one neighbour direction of one frame.
///
/// `sides[id]` caches the region on the walked side of segment `id`.
/// The region beside a segment is the region beside its neighbour,
/// crossed over the neighbour; past the last neighbour lies the outer
/// region.
struct Bypass<'a> {
    layers: &'a [LabelValue],
    links: &'a [LabelValue],
    sides: Vec<Option<Region>>,
}

impl<'a> Bypass<'a> {
    fn new(layers: &'a [LabelValue], links: &'a [LabelValue]) -> Self {
        Bypass {
            layers,
            links,
            sides: vec![None; links.len()],
        }
    }

    fn link(&self, id: SegmentId) -> Result<Option<SegmentId>> {
        let value = self.links[id];
        if value < 0 {
            return Ok(None);
        }
        let len = self.links.len();
        match usize::try_from(value) {
            Ok(next) if next < len => Ok(Some(next)),
            _ => Err(Error::SegmentOutOfRange {
                id: value as usize,
                len,
            }),
        }
    }

    fn region(&mut self, seed: SegmentId) -> Result<Region> {
        if let Some(region) = self.sides[seed] {
            return Ok(region);
        }

        let mut history = Vec::new();
        let mut current = seed;
        let mut region = loop {
            if history.len() >= self.links.len() {
                warn!(
                    "neighbour walk from segment {} exceeds {} steps, assuming the outer region",
                    seed,
                    history.len()
                );
                break Region::default();
            }
            history.push(current);
            match self.link(current)? {
                None => break Region::default(),
                Some(next) => match self.sides[next] {
                    Some(known) => break known.crossed(self.layers[next]),
                    None => current = next,
                },
            }
        };

        // History runs from the seed outwards; each step back crosses
        // the segment just left.
        for &id in history.iter().rev() {
            self.sides[id] = Some(region);
            region = region.crossed(self.layers[id]);
        }
        Ok(self.sides[seed].unwrap_or_default())
    }
}

fn require<T: CoordNum>(set: &SegmentsSet<T>, label: LabelId) -> Result<&[LabelValue]> {
    if !set.has_label(label) {
        return Err(Error::MissingLabel(label));
    }
    set.get_label_values(label)
}

/// Mark both sides of every segment with its membership of the two
/// input layers.
///
/// The result holds the segments of `neighbours` with labels
/// [`FIRST_TOP`], [`SECOND_TOP`], [`FIRST_BOTTOM`] and [`SECOND_BOTTOM`],
/// each `1` when that side lies inside that layer and `0` otherwise.
/// Segments vertical in the normal frame are marked from the rotated
/// frame, where their top is the `+x` side. Segments of a layer other than
/// `0` or `1` toggle both memberships.
pub fn mark_areas<T: Float>(neighbours: &Neighbours<T>) -> Result<SegmentsSet<T>> {
    let (normal, rotated) = (&neighbours.normal, &neighbours.rotated);
    if normal.len() != rotated.len() {
        return Err(Error::LabelCountMismatch {
            expected: normal.len(),
            found: rotated.len(),
        });
    }
    let layers = require(normal, LAYER_LABEL)?;
    let foreign = layers.iter().filter(|&&layer| layer != 0 && layer != 1).count();
    if foreign > 0 {
        warn!(
            "{} segments belong to neither layer 0 nor 1; they toggle both memberships",
            foreign
        );
    }

    let normal_tops = require(normal, TOP_LABEL)?;
    let rotated_tops = require(rotated, TOP_LABEL)?;
    let mut walks = [
        Bypass::new(layers, normal_tops),
        Bypass::new(layers, require(normal, BOTTOM_LABEL)?),
        Bypass::new(layers, rotated_tops),
        Bypass::new(layers, require(rotated, BOTTOM_LABEL)?),
    ];

    let len = normal.len();
    let mut columns = vec![vec![0; len]; 4];
    for id in 0..len {
        let (top, bottom) = if normal_tops[id] != UNCHECKED {
            let [top, bottom, ..] = &mut walks;
            (top.region(id)?, bottom.region(id)?)
        } else if rotated_tops[id] != UNCHECKED {
            let [_, _, top, bottom] = &mut walks;
            (top.region(id)?, bottom.region(id)?)
        } else {
            trace!("segment {} is a point in both frames, marked outside", id);
            (Region::default(), Region::default())
        };
        columns[FIRST_TOP as usize][id] = top.is_first as LabelValue;
        columns[SECOND_TOP as usize][id] = top.is_second as LabelValue;
        columns[FIRST_BOTTOM as usize][id] = bottom.is_first as LabelValue;
        columns[SECOND_BOTTOM as usize][id] = bottom.is_second as LabelValue;
    }

    let mut marked = SegmentsSet::from_segments(normal.segments().to_vec());
    let types = [FIRST_TOP, SECOND_TOP, FIRST_BOTTOM, SECOND_BOTTOM];
    marked.set_labels_types(&types)?;
    for label in types {
        marked.set_label_values(label, &columns[label as usize])?;
    }
    debug!("marked areas of {} segments", len);
    Ok(marked)
}

/// Keep the segments of `set` whose label values satisfy `predicate`.
///
/// The predicate receives the values of one segment in the order of
/// `set.label_types()`. Kept segments carry their label values unchanged.
pub fn filter_segments_by_labels<T, F>(set: &SegmentsSet<T>, mut predicate: F) -> Result<SegmentsSet<T>>
where
    T: CoordNum,
    F: FnMut(&[LabelValue]) -> bool,
{
    let columns = set
        .label_types()
        .iter()
        .map(|&label| set.get_label_values(label))
        .collect::<Result<Vec<_>>>()?;

    let mut row = Vec::with_capacity(columns.len());
    let mut kept = Vec::new();
    for id in 0..set.len() {
        row.clear();
        row.extend(columns.iter().map(|column| column[id]));
        if predicate(&row) {
            kept.push(id);
        }
    }
    debug!("filter kept {} of {} segments", kept.len(), set.len());
    set.select(&kept)
}

/// [`mark_areas`] followed by [`filter_segments_by_labels`].
pub fn mark_areas_and_filter<T, F>(neighbours: &Neighbours<T>, predicate: F) -> Result<SegmentsSet<T>>
where
    T: Float,
    F: FnMut(&[LabelValue]) -> bool,
{
    filter_segments_by_labels(&mark_areas(neighbours)?, predicate)
}
