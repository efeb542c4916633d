use geo::{kernels::Orientation, CoordNum};

use crate::{
    events::Point,
    segments::Segment,
    utils::{magnitude, partial_max, partial_min},
    Float,
};

/// Either an overlap segment or a point.
///
/// The geometry shared by two intersecting segments: a single point, or
/// the non-degenerate span along which two collinear segments overlap.
/// The span is ordered (`start < end`, see [`Point`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineOrPoint<T: CoordNum> {
    Point(Point<T>),
    Line(Segment<T>),
}

impl<T: CoordNum> LineOrPoint<T> {
    /// Checks if the variant is a line.
    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, LineOrPoint::Line(_))
    }

    #[inline]
    pub fn is_point(&self) -> bool {
        matches!(self, LineOrPoint::Point(_))
    }

    /// Returns the lexicographic first coordinate of the geometry.
    pub fn first(&self) -> Point<T> {
        match self {
            LineOrPoint::Point(p) => *p,
            LineOrPoint::Line(s) => s.min(),
        }
    }

    /// The geometry as a segment; a point becomes a degenerate segment.
    pub fn segment(&self) -> Segment<T> {
        match self {
            LineOrPoint::Point(p) => Segment::new(*p, *p),
            LineOrPoint::Line(s) => *s,
        }
    }
}

/// Orientation of `c` relative to the directed line `a -> b`.
///
/// The cross product is measured against the lengths of both arms, so
/// the test bounds the angle at `a` and doesn't depend on the scale of
/// the coordinates: angles within about `EPS` are reported as collinear.
pub fn orientation<T: Float>(a: Point<T>, b: Point<T>, c: Point<T>) -> Orientation {
    let (dx1, dy1) = (b.x() - a.x(), b.y() - a.y());
    let (dx2, dy2) = (c.x() - a.x(), c.y() - a.y());
    let cross = dx1 * dy2 - dy1 * dx2;
    let tolerance = T::EPS
        * partial_max(magnitude(dx1), magnitude(dy1))
        * partial_max(magnitude(dx2), magnitude(dy2));
    if cross > tolerance {
        Orientation::CounterClockwise
    } else if cross < -tolerance {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

#[inline]
fn overlaps_1d<T: Float>(a0: T, a1: T, b0: T, b1: T) -> bool {
    let lo = partial_max(partial_min(a0, a1), partial_min(b0, b1));
    let hi = partial_min(partial_max(a0, a1), partial_max(b0, b1));
    lo <= hi + T::EPS * partial_max(magnitude(lo), magnitude(hi))
}

#[inline]
fn same_side(o1: Orientation, o2: Orientation) -> bool {
    o1 == o2 && o1 != Orientation::Collinear
}

/// Whether two segments share at least one point.
///
/// The bounding intervals must overlap on both axes, and neither segment
/// may lie strictly on one side of the other's supporting line. Touching
/// counts as intersecting.
pub fn intersect<T: Float>(first: &Segment<T>, second: &Segment<T>) -> bool {
    let (s1, e1, s2, e2) = (first.start(), first.end(), second.start(), second.end());
    if !overlaps_1d(s1.x(), e1.x(), s2.x(), e2.x()) || !overlaps_1d(s1.y(), e1.y(), s2.y(), e2.y())
    {
        return false;
    }
    !same_side(orientation(s1, e1, s2), orientation(s1, e1, e2))
        && !same_side(orientation(s2, e2, s1), orientation(s2, e2, e1))
}

/// Intersect two segments and return a point, an overlapping segment or
/// `None`.
///
/// When an end point lies on the other segment (up to `EPS` of angle) the result
/// is that end point, unmodified. Otherwise the crossing is computed from
/// the implicit line equations `a·x + b·y + c = 0`; collinear segments
/// report their common span, or a point if they only touch.
pub fn intersect_segments<T: Float>(
    first: &Segment<T>,
    second: &Segment<T>,
) -> Option<LineOrPoint<T>> {
    if !intersect(first, second) {
        return None;
    }
    if first.is_point() {
        return Some(LineOrPoint::Point(first.start()));
    }
    if second.is_point() {
        return Some(LineOrPoint::Point(second.start()));
    }

    let (s1, e1, s2, e2) = (first.start(), first.end(), second.start(), second.end());
    let o1 = orientation(s1, e1, s2);
    let o2 = orientation(s1, e1, e2);
    if o1 == Orientation::Collinear && o2 == Orientation::Collinear {
        return collinear_overlap(first, second);
    }

    for p in [s1, e1] {
        if second.has_endpoint(p) {
            return Some(LineOrPoint::Point(p));
        }
    }
    let pt = if o1 == Orientation::Collinear {
        s2
    } else if o2 == Orientation::Collinear {
        e2
    } else if orientation(s2, e2, s1) == Orientation::Collinear {
        s1
    } else if orientation(s2, e2, e1) == Orientation::Collinear {
        e1
    } else {
        line_crossing(first, second)?
    };
    Some(LineOrPoint::Point(pt))
}

fn collinear_overlap<T: Float>(first: &Segment<T>, second: &Segment<T>) -> Option<LineOrPoint<T>> {
    let lo = first.min().max(second.min());
    let hi = first.max().min(second.max());
    if lo > hi {
        None
    } else if lo == hi {
        Some(LineOrPoint::Point(lo))
    } else {
        Some(LineOrPoint::Line(Segment::new(lo, hi)))
    }
}

/// Solve the 2×2 system of the supporting lines. The solution is clamped
/// to the common bounding box of the two segments.
fn line_crossing<T: Float>(first: &Segment<T>, second: &Segment<T>) -> Option<Point<T>> {
    let (s1, e1, s2, e2) = (first.start(), first.end(), second.start(), second.end());
    let a1 = e1.y() - s1.y();
    let b1 = s1.x() - e1.x();
    let c1 = s1.y() * e1.x() - s1.x() * e1.y();
    let a2 = e2.y() - s2.y();
    let b2 = s2.x() - e2.x();
    let c2 = s2.y() * e2.x() - s2.x() * e2.y();

    let det = a1 * b2 - a2 * b1;
    if det == T::zero() {
        return None;
    }
    let x = (b1 * c2 - b2 * c1) / det;
    let y = (a2 * c1 - a1 * c2) / det;

    let clamp = |v: T, a0: T, a1: T, b0: T, b1: T| {
        let lo = partial_max(partial_min(a0, a1), partial_min(b0, b1));
        let hi = partial_min(partial_max(a0, a1), partial_max(b0, b1));
        partial_min(partial_max(v, lo), hi)
    };
    Some(Point::new(
        clamp(x, s1.x(), e1.x(), s2.x(), e2.x()),
        clamp(y, s1.y(), e1.y(), s2.y(), e2.y()),
    ))
}
