use std::{iter::FromIterator, ops::Deref, ops::Index, slice};

use geo::CoordNum;

use crate::{
    labels::{Labeled, Labels},
    segments::Segment,
    Error, Result,
};

mod chains;
pub use chains::{Circuit, VertexChain};

mod circuits;
pub use circuits::CircuitsSet;

/// Identifier of a segment within its container: its position.
///
/// Ids are dense (`0..len`) and assigned by the container when the
/// segment is appended.
pub type SegmentId = usize;

/// An ordered sequence of segments with per-segment labels.
///
/// Append-only until labels are declared; afterwards the set is locked
/// against new segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentsSet<T: CoordNum> {
    segments: Vec<Segment<T>>,
    labels: Labels,
}

impl<T: CoordNum> Default for SegmentsSet<T> {
    fn default() -> Self {
        SegmentsSet {
            segments: Vec::new(),
            labels: Labels::default(),
        }
    }
}

impl<T: CoordNum> SegmentsSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SegmentsSet {
            segments: Vec::with_capacity(capacity),
            labels: Labels::default(),
        }
    }

    pub fn from_segments(segments: Vec<Segment<T>>) -> Self {
        SegmentsSet {
            segments,
            labels: Labels::default(),
        }
    }

    pub(crate) fn from_parts(segments: Vec<Segment<T>>, labels: Labels) -> Self {
        SegmentsSet { segments, labels }
    }

    /// Append a segment and return its id.
    pub fn push(&mut self, segment: Segment<T>) -> Result<SegmentId> {
        if self.labels.is_declared() {
            return Err(Error::AppendAfterLabels);
        }
        self.segments.push(segment);
        Ok(self.segments.len() - 1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn get(&self, id: SegmentId) -> Option<&Segment<T>> {
        self.segments.get(id)
    }

    #[inline]
    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    pub fn iter(&self) -> slice::Iter<'_, Segment<T>> {
        self.segments.iter()
    }

    /// Copy of the segments `ids` (in that order) with their labels.
    pub fn select(&self, ids: &[SegmentId]) -> Result<SegmentsSet<T>> {
        let len = self.len();
        let segments = ids
            .iter()
            .map(|&id| self.segments.get(id).copied().ok_or(Error::SegmentOutOfRange { id, len }))
            .collect::<Result<_>>()?;
        Ok(SegmentsSet {
            segments,
            labels: self.labels.select(ids.iter().copied()),
        })
    }

    /// The same set with every segment rotated by 90°, labels included.
    /// See [`Segment::rotated`].
    pub fn rotated(&self) -> SegmentsSet<T> {
        SegmentsSet {
            segments: self.segments.iter().map(Segment::rotated).collect(),
            labels: self.labels.clone(),
        }
    }

    /// Convert the coordinates to another scalar (e.g. exact integer input
    /// to floating point), keeping the labels. `None` if a coordinate
    /// doesn't fit.
    pub fn cast<U: CoordNum>(&self) -> Option<SegmentsSet<U>> {
        Some(SegmentsSet {
            segments: self.segments.iter().map(Segment::cast).collect::<Option<_>>()?,
            labels: self.labels.clone(),
        })
    }

    pub(crate) fn into_parts(self) -> (Vec<Segment<T>>, Labels) {
        (self.segments, self.labels)
    }
}

impl<T: CoordNum> Labeled for SegmentsSet<T> {
    fn labels(&self) -> &Labels {
        &self.labels
    }

    fn labels_mut(&mut self) -> &mut Labels {
        &mut self.labels
    }

    fn segments_count(&self) -> usize {
        self.segments.len()
    }
}

impl<T: CoordNum> Index<SegmentId> for SegmentsSet<T> {
    type Output = Segment<T>;

    fn index(&self, id: SegmentId) -> &Self::Output {
        &self.segments[id]
    }
}

impl<T: CoordNum> FromIterator<Segment<T>> for SegmentsSet<T> {
    fn from_iter<I: IntoIterator<Item = Segment<T>>>(iter: I) -> Self {
        SegmentsSet::from_segments(iter.into_iter().collect())
    }
}

impl<T: CoordNum> From<Vec<Segment<T>>> for SegmentsSet<T> {
    fn from(segments: Vec<Segment<T>>) -> Self {
        SegmentsSet::from_segments(segments)
    }
}

impl<'a, T: CoordNum> IntoIterator for &'a SegmentsSet<T> {
    type Item = &'a Segment<T>;
    type IntoIter = slice::Iter<'a, Segment<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// A planar arrangement: a read-only [`SegmentsSet`] whose segments meet
/// only at shared end points.
///
/// Produced by the [`converter`](crate::converter).
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentsLayer<T: CoordNum>(SegmentsSet<T>);

impl<T: CoordNum> SegmentsLayer<T> {
    pub(crate) fn new(set: SegmentsSet<T>) -> Self {
        SegmentsLayer(set)
    }

    pub fn into_segments_set(self) -> SegmentsSet<T> {
        self.0
    }
}

impl<T: CoordNum> Deref for SegmentsLayer<T> {
    type Target = SegmentsSet<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
