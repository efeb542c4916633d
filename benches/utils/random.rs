#![allow(dead_code)]

use std::f64::consts::PI;

use geo::{rotate::RotatePoint, Coordinate, Line, Rect};

use rand::Rng;
use rand_distr::Standard;

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

#[inline]
pub fn uniform_line<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Line<f64> {
    Line::new(uniform_point(rng, bounds), uniform_point(rng, bounds))
}

#[inline]
pub fn uniform_line_with_length<R: Rng>(rng: &mut R, bounds: Rect<f64>, length: f64) -> Line<f64> {
    let start = uniform_point(rng, bounds);
    let line = Line::new(start, start + (length, 0.).into());
    let angle = rng.sample::<f64, _>(Standard) * 2. * PI;
    line.rotate_around_point(angle, start.into())
}

/// A line between two integer points of `[0, size]²`.
///
/// Shared end points, collinear overlaps and vertical lines are frequent.
pub fn grid_line<R: Rng>(rng: &mut R, size: i64) -> Line<f64> {
    let mut coord = || Coordinate {
        x: rng.gen_range(0..=size) as f64,
        y: rng.gen_range(0..=size) as f64,
    };
    Line::new(coord(), coord())
}

/// Vertices of a star-shaped polygon around `center`, in counter-clockwise
/// order, without the closing vertex.
///
/// Each vertex lies at a random radius in `[radius / 2, radius]`, so the
/// polygon is simple.
pub fn star_polygon<R: Rng>(
    rng: &mut R,
    center: Coordinate<f64>,
    radius: f64,
    steps: usize,
) -> Vec<Coordinate<f64>> {
    (0..steps)
        .map(|i| {
            let angle = 2. * PI * i as f64 / steps as f64;
            let r = radius * (0.5 + 0.5 * rng.sample::<f64, _>(Standard));
            Coordinate {
                x: center.x + r * angle.cos(),
                y: center.y + r * angle.sin(),
            }
        })
        .collect()
}
