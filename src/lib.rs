//! A plane-sweep kernel for planar arrangements of line segments.
//!
//! 1. [Intersections](#intersections)
//! 1. [Arrangements](#arrangements)
//! 1. [Areas](#areas)
//!
//! # Intersections
//!
//! [`crossings::intersect_set_segments`] reports every pair of segments of
//! a [`SegmentsSet`] sharing at least one point, using a [Bentley-Ottman]
//! style sweep. It is a drop-in replacement for testing all pairs with
//! [`line_or_point::intersect_segments`], but is typically more efficient.
//!
//! ```rust
//! use geo_arrangement::{crossings::intersect_set_segments, Segment, SegmentsSet};
//! let input: SegmentsSet<f64> = vec![
//!     Segment::from([(1., 0.), (0., 1.)]),
//!     Segment::from([(0., 0.5), (1., 0.5)]),
//!     Segment::from([(0., 0.), (1., 1.)]),
//! ]
//! .into();
//! // All pairs intersect
//! assert_eq!(intersect_set_segments(&input).len(), 3);
//! ```
//!
//! # Arrangements
//!
//! The [`converter`] cuts every segment at the intersections it takes
//! part in. The resulting [`SegmentsLayer`] only has segments meeting at
//! shared end points; each piece keeps the labels of its segment.
//!
//! # Areas
//!
//! The [`areas`] module finds the neighbours of every segment of an
//! arrangement and marks, for both sides of each segment, whether they
//! lie inside each of two input layers. Filtering on these marks yields
//! the boundary of boolean combinations of the layers.
//!
//! ```rust
//! use geo_arrangement::{
//!     areas::{boolean_op, OpType},
//!     containers::{Circuit, CircuitsSet},
//!     Point,
//! };
//! let square = |x: f64, y: f64| {
//!     Circuit::from_vertices(&[
//!         Point::new(x, y),
//!         Point::new(x + 2., y),
//!         Point::new(x + 2., y + 2.),
//!         Point::new(x, y + 2.),
//!     ])
//! };
//! let first = CircuitsSet::from_circuits([square(0., 0.)]);
//! let second = CircuitsSet::from_circuits([square(1., 1.)]);
//! let boundary = boolean_op(&first, &second, OpType::Intersection)?;
//! assert_eq!(boundary.len(), 4);
//! # Ok::<(), geo_arrangement::Error>(())
//! ```
//!
//! [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
mod events;
pub use events::Point;

mod segments;
pub use segments::Segment;

pub mod line_or_point;
pub use line_or_point::LineOrPoint;

pub mod active;

mod sweep;

pub mod labels;
pub use labels::Labeled;

pub mod containers;
pub use containers::{SegmentId, SegmentsLayer, SegmentsSet};

pub mod crossings;

pub mod converter;

pub mod areas;

pub mod io;

mod error;
pub use error::{Error, Result};

mod utils;
pub use utils::Float;

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;
