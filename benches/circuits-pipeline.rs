use criterion::*;
use geo::Coordinate;

#[path = "utils/random.rs"]
mod random;
use geo_arrangement::{
    areas::{boolean_op, find_segments_neighbours, mark_areas, OpType},
    containers::{Circuit, CircuitsSet},
    converter::{convert_to_segments_layer, merge_circuits_layers},
    Point,
};
use rand::thread_rng;
use random::*;

fn star_layer(center: (f64, f64), circuits: usize, steps: usize) -> CircuitsSet<f64> {
    CircuitsSet::from_circuits((0..circuits).map(|i| {
        let center = Coordinate {
            x: center.0 + 30. * i as f64,
            y: center.1,
        };
        let vertices: Vec<_> = star_polygon(&mut thread_rng(), center, 20., steps)
            .into_iter()
            .map(Point::from)
            .collect();
        Circuit::from_vertices(&vertices)
    }))
}

fn pipeline(c: &mut Criterion) {
    const STEPS: usize = 256;

    let first = star_layer((0., 0.), 4, STEPS);
    let second = star_layer((15., 5.), 4, STEPS);

    let merged = merge_circuits_layers(&first, &second).expect("merge");
    c.bench_function("Converter - overlapping stars", |b| {
        b.iter(|| black_box(convert_to_segments_layer(&merged).expect("arrangement").len()))
    });

    let layer = convert_to_segments_layer(&merged).expect("arrangement");
    c.bench_function("Neighbours - overlapping stars", |b| {
        b.iter(|| black_box(find_segments_neighbours(&layer).expect("neighbours")))
    });

    let neighbours = find_segments_neighbours(&layer).expect("neighbours");
    c.bench_function("Mark areas - overlapping stars", |b| {
        b.iter(|| black_box(mark_areas(&neighbours).expect("marks").len()))
    });

    for ty in [OpType::Intersection, OpType::Union] {
        c.bench_function(&format!("Boolean op {:?} - overlapping stars", ty), |b| {
            b.iter(|| black_box(boolean_op(&first, &second, ty).expect("boolean op").len()))
        });
    }
}

criterion_group!(circuits, pipeline);
criterion_main!(circuits);
