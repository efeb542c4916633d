use std::{cmp::Ordering, fmt};

use geo::{CoordNum, Coordinate};
use num_traits::{Bounded, NumCast};

/// A point in the plane.
///
/// Wraps a [`Coordinate`] to support lexicographic ordering: by `x` and
/// then by `y`. Equality is exact component-wise comparison. Implements
/// `Ord` and `Eq` even though `Coordinate` doesn't implement these; the
/// components must be consistently ordered (no `NaN`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<T: CoordNum>(Coordinate<T>);

impl<T: CoordNum> Point<T> {
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Point(Coordinate { x, y })
    }

    #[inline]
    pub fn x(&self) -> T {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0.y
    }

    #[inline]
    pub fn coord(&self) -> Coordinate<T> {
        self.0
    }

    /// Convert the coordinates to another scalar, `None` if a component
    /// doesn't fit.
    pub fn cast<U: CoordNum>(&self) -> Option<Point<U>> {
        Some(Point::new(
            <U as NumCast>::from(self.0.x)?,
            <U as NumCast>::from(self.0.y)?,
        ))
    }
}

impl<T: CoordNum + Bounded> Point<T> {
    /// Whether this is the "uninitialized" sentinel, see [`Default`].
    pub fn is_sentinel(&self) -> bool {
        *self == Self::default()
    }
}

/// The sentinel "uninitialized" point: the type's maximum value in both
/// coordinates.
impl<T: CoordNum + Bounded> Default for Point<T> {
    fn default() -> Self {
        let max = <T as Bounded>::max_value();
        Point::new(max, max)
    }
}

/// Implement lexicographic ordering by `x` and then by `y`
/// coordinate.
impl<T: CoordNum> PartialOrd for Point<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.0.x.partial_cmp(&other.0.x) {
            Some(Ordering::Equal) => self.0.y.partial_cmp(&other.0.y),
            o => o,
        }
    }
}

/// Derive `Ord` from `PartialOrd`; incomparable components compare equal.
impl<T: CoordNum> Ord for Point<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

/// We derive `Eq` manually to not require `T: Eq`.
impl<T: CoordNum> Eq for Point<T> {}

impl<T: CoordNum> From<Coordinate<T>> for Point<T> {
    fn from(c: Coordinate<T>) -> Self {
        Point(c)
    }
}

impl<T: CoordNum> From<(T, T)> for Point<T> {
    fn from((x, y): (T, T)) -> Self {
        Point::new(x, y)
    }
}

impl<T: CoordNum> From<Point<T>> for Coordinate<T> {
    fn from(p: Point<T>) -> Self {
        p.0
    }
}

impl<T: CoordNum + fmt::Display> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.x, self.0.y)
    }
}

/// A sweep event for sweep-line algorithms.
///
/// Events are keyed by the sweep abscissa only; both sweeps gather every
/// event sharing an `x` into one batch before touching the active set.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Event<T: CoordNum> {
    pub x: T,
    pub ty: EventType,
    pub segment: usize,
}

impl<T: CoordNum> PartialEq for Event<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// Assert total equality
impl<T: CoordNum> Eq for Event<T> {}

/// Ordering for use with a max-heap (`BinaryHeap`): the event with the
/// smallest `x` is the greatest.
impl<T: CoordNum> PartialOrd for Event<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: CoordNum> Ord for Event<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .partial_cmp(&other.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.ty.cmp(&other.ty))
            .then_with(|| self.segment.cmp(&other.segment))
            .reverse()
    }
}

/// Event type to associate with event.
///
/// Within one batch the variant order fixes the order in which the
/// events are popped; the batch is applied as a whole, so it only makes
/// the processing deterministic.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Clone, Copy)]
pub(crate) enum EventType {
    /// Right end point of a non-vertical segment.
    End,
    /// A detected crossing: the segment must be re-sorted at this `x`.
    Crossing,
    /// A vertical (or point) segment, spanning no `x` range.
    Vertical,
    /// Left end point of a non-vertical segment.
    Start,
}

#[cfg(test)]
mod tests {
    use std::iter::from_fn;

    use super::*;

    #[test]
    fn test_point_ordering() {
        let p1 = Point::new(0., 0.);
        let p2 = Point::new(1., 0.);
        let p3 = Point::new(1., 1.);
        let p4 = Point::from((1., 1.));

        assert!(p1 < p2);
        assert!(p1 < p3);
        assert!(p2 < p3);
        assert!(p3 <= p4);
        assert_eq!(p3, p4);
    }

    #[test]
    fn test_point_sentinel_and_cast() {
        let p: Point<i64> = Default::default();
        assert!(p.is_sentinel());
        assert_eq!(p.x(), i64::MAX);

        let q = Point::new(3i64, -4).cast::<f64>().unwrap();
        assert_eq!(q, Point::new(3., -4.));
        assert!(Point::new(-1i64, 0).cast::<u8>().is_none());
    }

    #[test]
    fn test_event_ordering() {
        use std::collections::BinaryHeap;

        let events = [
            Event { x: 1., ty: EventType::Start, segment: 3 },
            Event { x: 0., ty: EventType::Start, segment: 0 },
            Event { x: 1., ty: EventType::End, segment: 1 },
            Event { x: 1., ty: EventType::Vertical, segment: 2 },
            Event { x: 2., ty: EventType::End, segment: 4 },
        ];
        let mut heap: BinaryHeap<_> = events.iter().copied().collect();
        let order: Vec<_> = from_fn(|| heap.pop()).map(|e| e.segment).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
