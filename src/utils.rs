use std::cmp::Ordering;

use geo::GeoFloat;

/// Scalar type of the sweep algorithms.
///
/// Extends [`GeoFloat`] with the relative tolerance of the kernel.
/// Orientation tests treat angles below `EPS` as collinear, and the
/// sweeps tie `y` values closer than `EPS` times the largest coordinate
/// magnitude of their input. Both are independent of the coordinate
/// scale; only the vertical test (`x`-extent within `EPS`) is absolute.
pub trait Float: GeoFloat {
    const EPS: Self;
}

impl Float for f64 {
    const EPS: f64 = 1e-9;
}

impl Float for f32 {
    const EPS: f32 = 1e-5;
}

#[inline]
pub(crate) fn approx_zero<T: Float>(value: T) -> bool {
    value <= T::EPS && value >= -T::EPS
}

#[inline]
pub(crate) fn approx_eq<T: Float>(a: T, b: T) -> bool {
    approx_zero(a - b)
}

/// Compare two scalars, treating values within `EPS` as equal.
#[inline]
pub(crate) fn approx_cmp<T: Float>(a: T, b: T) -> Ordering {
    cmp_within(a, b, T::EPS)
}

/// Compare two scalars, treating values within `tolerance` as equal.
#[inline]
pub(crate) fn cmp_within<T: Float>(a: T, b: T, tolerance: T) -> Ordering {
    if a < b - tolerance {
        Ordering::Less
    } else if a > b + tolerance {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

#[inline]
pub(crate) fn partial_min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline]
pub(crate) fn partial_max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

#[inline]
pub(crate) fn magnitude<T: Float>(v: T) -> T {
    if v < T::zero() {
        -v
    } else {
        v
    }
}

#[cfg(test)]
pub(crate) fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_cmp() {
        assert_eq!(approx_cmp(1.0, 1.0 + 1e-12), Ordering::Equal);
        assert_eq!(approx_cmp(1.0, 1.1), Ordering::Less);
        assert_eq!(approx_cmp(1.1f32, 1.0), Ordering::Greater);
        assert!(approx_zero(-1e-10));
        assert!(!approx_eq(0.0, 1e-6));
        assert_eq!(cmp_within(1e7, 1e7 + 1e-3, 1e-2), Ordering::Equal);
        assert_eq!(cmp_within(1e-4, 1.1e-4, 1e-13), Ordering::Less);
    }
}
