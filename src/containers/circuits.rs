use geo::CoordNum;

use super::{Circuit, SegmentsSet};
use crate::{
    labels::{Labeled, Labels},
    segments::Segment,
    Error, Result,
};

/// Several circuits stored as one flat segment array.
///
/// `indices` delimits the circuits: circuit `i` owns the segments
/// `indices[i]..indices[i + 1]`. Labels, when declared, cover the flat
/// array.
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitsSet<T: CoordNum> {
    segments: Vec<Segment<T>>,
    indices: Vec<usize>,
    labels: Labels,
}

impl<T: CoordNum> Default for CircuitsSet<T> {
    fn default() -> Self {
        CircuitsSet {
            segments: Vec::new(),
            indices: vec![0],
            labels: Labels::default(),
        }
    }
}

impl<T: CoordNum> CircuitsSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate circuits. Their own labels are not carried over.
    pub fn from_circuits<I: IntoIterator<Item = Circuit<T>>>(circuits: I) -> Self {
        let mut set = CircuitsSet::new();
        for circuit in circuits {
            set.append(circuit.segments());
        }
        set
    }

    /// Append a circuit; locked once labels are declared.
    pub fn push(&mut self, circuit: &Circuit<T>) -> Result<usize> {
        if self.labels.is_declared() {
            return Err(Error::AppendAfterLabels);
        }
        self.append(circuit.segments());
        Ok(self.len() - 1)
    }

    fn append(&mut self, segments: &[Segment<T>]) {
        self.segments.extend_from_slice(segments);
        self.indices.push(self.segments.len());
    }

    /// Number of circuits.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn segments(&self) -> &[Segment<T>] {
        &self.segments
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Copy of circuit `index`, with its share of the labels.
    pub fn get_circuit(&self, index: usize) -> Option<Circuit<T>> {
        let (lo, hi) = (*self.indices.get(index)?, *self.indices.get(index + 1)?);
        let set = SegmentsSet::from_parts(self.segments[lo..hi].to_vec(), self.labels.select(lo..hi));
        Some(Circuit::from_set(set))
    }

    pub fn circuits(&self) -> impl Iterator<Item = Circuit<T>> + '_ {
        (0..self.len()).filter_map(move |index| self.get_circuit(index))
    }

    /// The flat segment array as a [`SegmentsSet`], labels included.
    pub fn to_segments_set(&self) -> SegmentsSet<T> {
        SegmentsSet::from_parts(self.segments.clone(), self.labels.clone())
    }

    /// Convert the coordinates to another scalar. `None` if a coordinate
    /// doesn't fit.
    pub fn cast<U: CoordNum>(&self) -> Option<CircuitsSet<U>> {
        Some(CircuitsSet {
            segments: self.segments.iter().map(Segment::cast).collect::<Option<_>>()?,
            indices: self.indices.clone(),
            labels: self.labels.clone(),
        })
    }
}

impl<T: CoordNum> Labeled for CircuitsSet<T> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Point;

    fn triangle(offset: i64) -> Circuit<i64> {
        Circuit::from_vertices(&[
            Point::new(offset, 0),
            Point::new(offset + 2, 0),
            Point::new(offset, 2),
        ])
    }

    fn rectangle() -> Circuit<i64> {
        Circuit::from_vertices(&[Point::new(0, 5), Point::new(3, 5), Point::new(3, 6), Point::new(0, 6)])
    }

    #[test]
    fn test_indices_and_views() {
        let mut set = CircuitsSet::from_circuits([triangle(0), rectangle()]);
        assert_eq!(set.push(&triangle(10)).unwrap(), 2);
        assert_eq!(set.len(), 3);
        assert_eq!(set.indices(), &[0, 3, 7, 10]);
        assert_eq!(set.segments().len(), 10);

        assert_eq!(set.get_circuit(1).unwrap(), rectangle());
        assert_eq!(set.get_circuit(2).unwrap(), triangle(10));
        assert!(set.get_circuit(3).is_none());
        assert_eq!(set.circuits().count(), 3);
    }

    #[test]
    fn test_labels_over_flat_segments() {
        let mut set = CircuitsSet::from_circuits([triangle(0), rectangle()]);
        set.set_labels_types(&[0]).unwrap();
        set.set_label_values(0, &[0, 0, 0, 1, 1, 1, 1]).unwrap();
        assert!(matches!(set.push(&triangle(4)), Err(Error::AppendAfterLabels)));

        let second = set.get_circuit(1).unwrap();
        assert_eq!(second.get_label_values(0).unwrap(), &[1, 1, 1, 1]);

        let flat = set.to_segments_set();
        assert_eq!(flat.len(), 7);
        assert_eq!(flat.get_label_value(0, 6).unwrap(), 1);
    }

    #[test]
    fn test_empty() {
        let set = CircuitsSet::<f64>::new();
        assert!(set.is_empty());
        assert!(set.get_circuit(0).is_none());
    }
}
