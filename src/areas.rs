//! Area analysis of an arrangement.
//!
//! Given an arrangement whose segments carry their source layer in
//! [`LAYER_LABEL`](crate::labels::LAYER_LABEL), decide for each side of
//! every segment whether it lies inside the first and inside the second
//! layer:
//!
//! 1. [`find_segments_neighbours`] sweeps the arrangement twice, once as is
//!    and once turned by 90°, and records for every segment the segment
//!    directly above and directly below it.
//! 1. [`mark_areas`] walks the neighbour links up to the outer region,
//!    toggling the membership of a layer at every boundary of that layer
//!    it crosses.
//! 1. [`filter_segments_by_labels`] keeps the segments whose marks satisfy
//!    a predicate; [`boundary_predicate`] selects the boundary of a
//!    boolean combination of the two layers.
//!
//! [`boolean_op`] runs the whole pipeline from two circuit layers.
use crate::{containers::SegmentsSet, labels::LabelId, Float, Result};

mod neighbours;
pub use neighbours::{find_segments_neighbours, Neighbours};

mod marking;
pub use marking::{filter_segments_by_labels, mark_areas, mark_areas_and_filter};

mod op;
pub use op::{boolean_op, boundary_predicate, OpType, Region, Sides};

/// Neighbour sets: id of the segment directly above.
pub const TOP_LABEL: LabelId = 1;
/// Neighbour sets: id of the segment directly below.
pub const BOTTOM_LABEL: LabelId = 2;

/// Marked sets: the top side lies inside the first layer.
pub const FIRST_TOP: LabelId = 0;
/// Marked sets: the top side lies inside the second layer.
pub const SECOND_TOP: LabelId = 1;
/// Marked sets: the bottom side lies inside the first layer.
pub const FIRST_BOTTOM: LabelId = 2;
/// Marked sets: the bottom side lies inside the second layer.
pub const SECOND_BOTTOM: LabelId = 3;

/// [`find_segments_neighbours`] followed by [`mark_areas`].
pub fn find_areas<T: Float>(layer: &SegmentsSet<T>) -> Result<SegmentsSet<T>> {
    mark_areas(&find_segments_neighbours(layer)?)
}
