use std::fmt::Display;

use log::debug;

use super::{
    find_segments_neighbours, mark_areas_and_filter, FIRST_BOTTOM, FIRST_TOP, SECOND_BOTTOM,
    SECOND_TOP,
};
use crate::{
    containers::{CircuitsSet, SegmentsSet},
    converter::{convert_to_segments_layer, merge_circuits_layers},
    labels::{LabelId, LabelValue},
    Float, Result,
};

/// Boolean combination of two circuit layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpType {
    Intersection,
    Union,
    /// The first layer minus the second.
    Difference,
    Xor,
}

/// Membership of a region in the two input layers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub is_first: bool,
    pub is_second: bool,
}

impl Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{f}{s}]",
            f = if self.is_first { "A" } else { "" },
            s = if self.is_second { "B" } else { "" },
        )
    }
}

impl Region {
    /// The region on the other side of a boundary segment of `layer`.
    /// Layers other than `0` and `1` toggle both memberships.
    pub fn crossed(self, layer: LabelValue) -> Self {
        match layer {
            0 => Region {
                is_first: !self.is_first,
                ..self
            },
            1 => Region {
                is_second: !self.is_second,
                ..self
            },
            _ => Region {
                is_first: !self.is_first,
                is_second: !self.is_second,
            },
        }
    }

    /// Whether the region belongs to the result of `ty`.
    pub fn is_ty(&self, ty: OpType) -> bool {
        match ty {
            OpType::Intersection => self.is_first && self.is_second,
            OpType::Union => self.is_first || self.is_second,
            OpType::Difference => self.is_first && !self.is_second,
            OpType::Xor => self.is_first ^ self.is_second,
        }
    }
}

/// Regions on both sides of a marked segment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sides {
    pub top: Region,
    pub bottom: Region,
}

impl Sides {
    /// Read the sides from the label values of a segment marked by
    /// [`mark_areas`](super::mark_areas), in declaration order.
    pub fn from_labels(values: &[LabelValue]) -> Self {
        let is_set = |label: LabelId| values.get(label as usize) == Some(&1);
        Sides {
            top: Region {
                is_first: is_set(FIRST_TOP),
                is_second: is_set(SECOND_TOP),
            },
            bottom: Region {
                is_first: is_set(FIRST_BOTTOM),
                is_second: is_set(SECOND_BOTTOM),
            },
        }
    }
}

/// Predicate over marked label values keeping the segments that bound
/// the result of `ty`: exactly one side belongs to it.
pub fn boundary_predicate(ty: OpType) -> impl Fn(&[LabelValue]) -> bool {
    move |values| {
        let sides = Sides::from_labels(values);
        sides.top.is_ty(ty) != sides.bottom.is_ty(ty)
    }
}

/// Boundary segments of the boolean combination `ty` of two circuit
/// layers.
///
/// Runs the whole pipeline: merge, arrangement, neighbours, marking and
/// filtering. The result carries the four side labels.
pub fn boolean_op<T: Float>(
    first: &CircuitsSet<T>,
    second: &CircuitsSet<T>,
    ty: OpType,
) -> Result<SegmentsSet<T>> {
    let merged = merge_circuits_layers(first, second)?;
    let layer = convert_to_segments_layer(&merged)?;
    let neighbours = find_segments_neighbours(&layer)?;
    let result = mark_areas_and_filter(&neighbours, boundary_predicate(ty))?;
    debug!(
        "{:?} of {} and {} segments: {} pieces, {} on the boundary",
        ty,
        first.segments().len(),
        second.segments().len(),
        layer.len(),
        result.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use geo::Coordinate;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        areas::{find_areas, FIRST_BOTTOM, FIRST_TOP},
        containers::Circuit,
        events::Point,
        labels::{Labeled, LAYER_LABEL},
        random::star_polygon,
        segments::Segment,
        utils::init_log,
    };

    fn squares(corners: &[(f64, f64)]) -> CircuitsSet<f64> {
        CircuitsSet::from_circuits(corners.iter().map(|&(x, y)| {
            Circuit::from_vertices(&[
                Point::new(x, y),
                Point::new(x + 2., y),
                Point::new(x + 2., y + 2.),
                Point::new(x, y + 2.),
            ])
        }))
    }

    fn has(set: &SegmentsSet<f64>, segment: [(f64, f64); 2]) -> bool {
        set.iter().any(|s| *s == Segment::from(segment))
    }

    #[test]
    fn region_crossing() {
        let outside = Region::default();
        let first = outside.crossed(0);
        assert_eq!(first.to_string(), "[A]");
        assert_eq!(first.crossed(1).to_string(), "[AB]");
        assert_eq!(outside.crossed(5).to_string(), "[AB]");
        assert!(first.is_ty(OpType::Difference));
        assert!(!first.crossed(1).is_ty(OpType::Xor));
        assert!(outside.crossed(1).is_ty(OpType::Union));
        assert!(!outside.crossed(1).is_ty(OpType::Intersection));
    }

    #[test]
    fn overlapping_squares() {
        init_log();
        let first = squares(&[(0., 0.)]);
        let second = squares(&[(1., 1.)]);

        let intersection = boolean_op(&first, &second, OpType::Intersection).unwrap();
        assert_eq!(intersection.len(), 4);
        for s in [
            [(2., 1.), (2., 2.)],
            [(2., 2.), (1., 2.)],
            [(1., 2.), (1., 1.)],
            [(1., 1.), (2., 1.)],
        ] {
            assert!(has(&intersection, s), "missing {:?}", s);
        }

        let union = boolean_op(&first, &second, OpType::Union).unwrap();
        assert_eq!(union.len(), 8);
        assert!(has(&union, [(0., 0.), (2., 0.)]));
        assert!(has(&union, [(3., 1.), (3., 3.)]));
        assert!(!has(&union, [(1., 1.), (2., 1.)]));

        let difference = boolean_op(&first, &second, OpType::Difference).unwrap();
        assert_eq!(difference.len(), 6);
        assert!(has(&difference, [(1., 1.), (2., 1.)]));
        assert!(!has(&difference, [(3., 1.), (3., 3.)]));

        assert_eq!(boolean_op(&first, &second, OpType::Xor).unwrap().len(), 12);
    }

    #[test]
    fn disjoint_squares() {
        let first = squares(&[(0., 0.)]);
        let second = squares(&[(5., 0.)]);
        assert!(boolean_op(&first, &second, OpType::Intersection).unwrap().is_empty());
        assert_eq!(boolean_op(&first, &second, OpType::Union).unwrap().len(), 8);
        assert_eq!(boolean_op(&first, &second, OpType::Difference).unwrap().len(), 4);
    }

    #[test]
    fn random_star_is_separating() {
        init_log();
        let mut rng = StdRng::seed_from_u64(11);
        for steps in [5, 16, 64] {
            let vertices: Vec<_> = star_polygon(&mut rng, Coordinate { x: 0., y: 0. }, 10., steps)
                .into_iter()
                .map(Point::from)
                .collect();
            let circuits = CircuitsSet::from_circuits([Circuit::from_vertices(&vertices)]);
            let mut layer = circuits.to_segments_set();
            layer.set_labels_types(&[LAYER_LABEL]).unwrap();
            layer.set_label_values(LAYER_LABEL, &vec![0; layer.len()]).unwrap();

            let marked = find_areas(&layer).unwrap();
            let tops = marked.get_label_values(FIRST_TOP).unwrap();
            let bottoms = marked.get_label_values(FIRST_BOTTOM).unwrap();
            for (top, bottom) in tops.iter().zip(bottoms) {
                assert_ne!(top, bottom);
            }

            // A lone circuit is its own union boundary.
            let far_triangle = CircuitsSet::from_circuits([Circuit::from_vertices(&[
                Point::new(100., 100.),
                Point::new(101., 100.),
                Point::new(101., 101.),
            ])]);
            let union = boolean_op(&circuits, &far_triangle, OpType::Union).unwrap();
            assert_eq!(union.len(), steps + 3);
        }
    }
}
