use std::fmt;

use geo::{CoordNum, Line};

use crate::{events::Point, utils::approx_eq, Float};

/// A directed line segment between two points.
///
/// A segment is a pure value type: it carries no identity. Containers
/// identify their segments by position (see [`SegmentId`]).
///
/// [`SegmentId`]: crate::SegmentId
#[derive(Debug, Clone, Copy)]
pub struct Segment<T: CoordNum> {
    start: Point<T>,
    end: Point<T>,
}

impl<T: CoordNum> Segment<T> {
    #[inline]
    pub fn new(start: impl Into<Point<T>>, end: impl Into<Point<T>>) -> Self {
        Segment {
            start: start.into(),
            end: end.into(),
        }
    }

    #[inline]
    pub fn start(&self) -> Point<T> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point<T> {
        self.end
    }

    /// The lexicographically smaller end point.
    #[inline]
    pub fn min(&self) -> Point<T> {
        if self.end < self.start {
            self.end
        } else {
            self.start
        }
    }

    /// The lexicographically larger end point.
    #[inline]
    pub fn max(&self) -> Point<T> {
        if self.end < self.start {
            self.start
        } else {
            self.end
        }
    }

    /// Degenerate segment: both end points coincide.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.start.x() == self.end.x()
    }

    #[inline]
    pub fn has_endpoint(&self, p: Point<T>) -> bool {
        self.start == p || self.end == p
    }

    /// Number of end points equal to `p` (two for a point segment at `p`).
    #[inline]
    pub(crate) fn endpoint_count(&self, p: Point<T>) -> usize {
        (self.start == p) as usize + (self.end == p) as usize
    }

    pub fn reversed(&self) -> Self {
        Segment::new(self.end, self.start)
    }

    /// Rotate by 90° counter-clockwise about the origin: `(x, y) -> (-y, x)`.
    ///
    /// Vertical segments become horizontal. Lower `y` in the rotated frame
    /// corresponds to lower `x` in the original one.
    pub fn rotated(&self) -> Self {
        let rotate = |p: Point<T>| Point::new(T::zero() - p.y(), p.x());
        Segment::new(rotate(self.start), rotate(self.end))
    }

    /// Inverse of [`Segment::rotated`].
    pub fn unrotated(&self) -> Self {
        let rotate = |p: Point<T>| Point::new(p.y(), T::zero() - p.x());
        Segment::new(rotate(self.start), rotate(self.end))
    }

    pub fn line(&self) -> Line<T> {
        Line::new(self.start.coord(), self.end.coord())
    }

    /// Convert the coordinates to another scalar, `None` if a component
    /// doesn't fit.
    pub fn cast<U: CoordNum>(&self) -> Option<Segment<U>> {
        Some(Segment::new(self.start.cast()?, self.end.cast()?))
    }
}

impl<T: Float> Segment<T> {
    /// Vertical within tolerance: the sweeps give such a segment no
    /// `x`-extent.
    #[inline]
    pub(crate) fn is_sweep_vertical(&self) -> bool {
        approx_eq(self.start.x(), self.end.x())
    }

    /// The `y` of the segment's supporting line at `x`.
    ///
    /// `x` is clamped to the segment's `x`-range so that the end points are
    /// reproduced exactly. Vertical segments report their lower end.
    pub fn sweeping_line_y(&self, x: T) -> T {
        let (lo, hi) = (self.min(), self.max());
        if x <= lo.x() || lo.x() == hi.x() {
            lo.y()
        } else if x >= hi.x() {
            hi.y()
        } else {
            lo.y() + (hi.y() - lo.y()) * (x - lo.x()) / (hi.x() - lo.x())
        }
    }

    /// Slope `dy/dx` along increasing `x`; zero for vertical segments.
    pub fn slope(&self) -> T {
        let (lo, hi) = (self.min(), self.max());
        if lo.x() == hi.x() {
            T::zero()
        } else {
            (hi.y() - lo.y()) / (hi.x() - lo.x())
        }
    }
}

/// Equality ignores direction.
impl<T: CoordNum> PartialEq for Segment<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

impl<T: CoordNum> From<Line<T>> for Segment<T> {
    fn from(l: Line<T>) -> Self {
        Segment::new(l.start, l.end)
    }
}

impl<T: CoordNum> From<Segment<T>> for Line<T> {
    fn from(s: Segment<T>) -> Self {
        s.line()
    }
}

impl<T: CoordNum> From<[(T, T); 2]> for Segment<T> {
    fn from([start, end]: [(T, T); 2]) -> Self {
        Segment::new(start, end)
    }
}

impl<T: CoordNum + fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_min_max() {
        let s = Segment::from([(3., 1.), (1., 5.)]);
        assert_eq!(s.min(), Point::new(1., 5.));
        assert_eq!(s.max(), Point::new(3., 1.));

        let v = Segment::from([(1, 4), (1, 2)]);
        assert!(v.is_vertical());
        assert_eq!(v.min(), Point::new(1, 2));
        assert!(!v.is_point());
        assert!(Segment::from([(2, 2), (2, 2)]).is_point());
    }

    #[test]
    fn test_undirected_equality() {
        let s = Segment::from([(0., 0.), (1., 2.)]);
        assert_eq!(s, s.reversed());
        assert_ne!(s, Segment::from([(0., 0.), (1., 2.5)]));
    }

    #[test]
    fn test_rotation() {
        let v = Segment::from([(2., 0.), (2., 3.)]);
        let r = v.rotated();
        assert!(!r.is_vertical());
        assert_eq!(r, Segment::from([(0., 2.), (-3., 2.)]));
        assert_eq!(r.unrotated().start(), v.start());

        let h = Segment::from([(0, 1), (4, 1)]);
        assert!(h.rotated().is_vertical());
    }

    #[test]
    fn test_sweeping_line_y() {
        let s = Segment::from([(4., 4.), (0., 0.)]);
        assert_relative_eq!(s.sweeping_line_y(1.), 1.);
        assert_relative_eq!(s.sweeping_line_y(-1.), 0.);
        assert_relative_eq!(s.sweeping_line_y(4.), 4.);
        assert_relative_eq!(s.slope(), 1.);
        assert_relative_eq!(Segment::from([(0., 2.), (2., 0.)]).slope(), -1.);
    }
}
