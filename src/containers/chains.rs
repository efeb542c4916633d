use std::ops::Deref;

use geo::CoordNum;
use itertools::Itertools;

use super::{SegmentId, SegmentsSet};
use crate::{
    events::Point,
    labels::{Labeled, Labels},
    segments::Segment,
    Error, Result,
};

/// Index of the first segment whose end is not the next segment's start.
fn chain_break<T: CoordNum>(segments: &[Segment<T>]) -> Option<usize> {
    segments
        .iter()
        .tuple_windows::<(_, _)>()
        .position(|(a, b)| a.end() != b.start())
}

/// A [`SegmentsSet`] where each segment starts at the end of the previous
/// one.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexChain<T: CoordNum> {
    set: SegmentsSet<T>,
    validate: bool,
}

impl<T: CoordNum> VertexChain<T> {
    /// Construct from connected segments; fails with [`Error::NotAChain`]
    /// otherwise.
    pub fn new(segments: Vec<Segment<T>>) -> Result<Self> {
        if let Some(index) = chain_break(&segments) {
            return Err(Error::NotAChain { index });
        }
        Ok(VertexChain {
            set: SegmentsSet::from_segments(segments),
            validate: true,
        })
    }

    /// Construct without checking connectivity, now or on later appends.
    pub fn new_unchecked(segments: Vec<Segment<T>>) -> Self {
        VertexChain {
            set: SegmentsSet::from_segments(segments),
            validate: false,
        }
    }

    /// Append a segment, which must start where the chain ends.
    pub fn push(&mut self, segment: Segment<T>) -> Result<SegmentId> {
        if self.validate {
            if let Some(last) = self.set.segments().last() {
                if last.end() != segment.start() {
                    return Err(Error::NotAChain {
                        index: self.set.len() - 1,
                    });
                }
            }
        }
        self.set.push(segment)
    }

    pub fn into_segments_set(self) -> SegmentsSet<T> {
        self.set
    }
}

impl<T: CoordNum> Deref for VertexChain<T> {
    type Target = SegmentsSet<T>;

    fn deref(&self) -> &Self::Target {
        &self.set
    }
}

impl<T: CoordNum> Labeled for VertexChain<T> {
    fn labels(&self) -> &Labels {
        self.set.labels()
    }

    fn labels_mut(&mut self) -> &mut Labels {
        self.set.labels_mut()
    }

    fn segments_count(&self) -> usize {
        self.set.len()
    }
}

/// A closed [`VertexChain`]: the last segment ends where the first one
/// starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit<T: CoordNum> {
    set: SegmentsSet<T>,
}

impl<T: CoordNum> Circuit<T> {
    /// Construct from a closed cycle of segments; fails with
    /// [`Error::NotACircuit`] otherwise.
    pub fn new(segments: Vec<Segment<T>>) -> Result<Self> {
        let n = segments.len();
        let open = (0..n).find(|&i| segments[i].end() != segments[(i + 1) % n].start());
        if let Some(index) = open {
            return Err(Error::NotACircuit { index });
        }
        Ok(Circuit::new_unchecked(segments))
    }

    /// Construct without checking closure.
    pub fn new_unchecked(segments: Vec<Segment<T>>) -> Self {
        Circuit {
            set: SegmentsSet::from_segments(segments),
        }
    }

    pub(crate) fn from_set(set: SegmentsSet<T>) -> Self {
        Circuit { set }
    }

    /// Construct from the vertices of a polygon in traversal order. The
    /// loop is closed if the last vertex differs from the first.
    pub fn from_vertices(vertices: &[Point<T>]) -> Self {
        let mut segments: Vec<_> = vertices
            .iter()
            .tuple_windows::<(_, _)>()
            .map(|(a, b)| Segment::new(*a, *b))
            .collect();
        if let (Some(first), Some(last)) = (vertices.first(), vertices.last()) {
            if first != last {
                segments.push(Segment::new(*last, *first));
            }
        }
        Circuit::new_unchecked(segments)
    }

    /// The vertices in traversal order, first vertex repeated at the end.
    pub fn vertices(&self) -> Vec<Point<T>> {
        let segments = self.set.segments();
        segments
            .iter()
            .map(Segment::start)
            .chain(segments.first().map(Segment::start))
            .collect()
    }

    pub fn into_segments_set(self) -> SegmentsSet<T> {
        self.set
    }
}

impl<T: CoordNum> Deref for Circuit<T> {
    type Target = SegmentsSet<T>;

    fn deref(&self) -> &Self::Target {
        &self.set
    }
}

impl<T: CoordNum> Labeled for Circuit<T> {
    fn labels(&self) -> &Labels {
        self.set.labels()
    }

    fn labels_mut(&mut self) -> &mut Labels {
        self.set.labels_mut()
    }

    fn segments_count(&self) -> usize {
        self.set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Segment<i64>> {
        vec![
            Segment::from([(0, 0), (2, 0)]),
            Segment::from([(2, 0), (2, 2)]),
            Segment::from([(2, 2), (0, 2)]),
            Segment::from([(0, 2), (0, 0)]),
        ]
    }

    #[test]
    fn test_chain_validation() {
        let mut chain = VertexChain::new(square()[..2].to_vec()).unwrap();
        assert_eq!(chain.push(Segment::from([(2, 2), (5, 5)])).unwrap(), 2);
        assert!(matches!(
            chain.push(Segment::from([(0, 0), (1, 1)])),
            Err(Error::NotAChain { index: 2 })
        ));
        assert_eq!(chain.len(), 3);

        let broken = vec![Segment::from([(0, 0), (1, 0)]), Segment::from([(2, 0), (3, 0)])];
        assert!(matches!(VertexChain::new(broken.clone()), Err(Error::NotAChain { index: 0 })));
        let mut unchecked = VertexChain::new_unchecked(broken);
        assert!(unchecked.push(Segment::from([(7, 7), (8, 8)])).is_ok());
    }

    #[test]
    fn test_circuit_closure() {
        let circuit = Circuit::new(square()).unwrap();
        for (i, s) in circuit.iter().enumerate() {
            assert_eq!(s.end(), circuit[(i + 1) % circuit.len()].start());
        }
        let mut open = square();
        open.pop();
        assert!(matches!(Circuit::new(open), Err(Error::NotACircuit { index: 2 })));
        assert!(Circuit::new(vec![Segment::from([(0, 0), (1, 0)])]).is_err());
    }

    #[test]
    fn test_vertices_round_trip() {
        let vertices = [Point::new(0, 0), Point::new(4, 0), Point::new(0, 3)];
        let circuit = Circuit::from_vertices(&vertices);
        assert_eq!(circuit.len(), 3);
        assert!(Circuit::new(circuit.segments().to_vec()).is_ok());

        let closed = circuit.vertices();
        assert_eq!(closed.len(), 4);
        assert_eq!(closed.first(), closed.last());
        assert_eq!(Circuit::from_vertices(&closed), circuit);
    }

    #[test]
    fn test_chain_labels() {
        let mut circuit = Circuit::new(square()).unwrap();
        circuit.set_labels_types(&[0]).unwrap();
        circuit.set_label_values(0, &[1, 1, 2, 2]).unwrap();
        assert_eq!(circuit.get_label_value(0, 3).unwrap(), 2);
    }
}
