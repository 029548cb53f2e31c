//! Benchmarks for clipping and offsetting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use exactum::offset::{ClipperOffset, EndType, JoinType};
use exactum::{ClipType, Clipper, IntPoint, Path, PolyFillType, PolyType};

/// Generates a star polygon with alternating radii (self-overlap free,
/// but heavy on local minima).
fn generate_star(points: usize, r1: f64, r2: f64) -> Path {
    let n = points * 2;
    (0..n)
        .map(|i| {
            let r = if i % 2 == 0 { r1 } else { r2 };
            let a = i as f64 / n as f64 * std::f64::consts::TAU;
            IntPoint::new((a.cos() * r) as _, (a.sin() * r) as _)
        })
        .collect()
}

/// Generates a grid of small squares as one path set.
fn generate_grid(cols: usize, rows: usize, cell: i64, gap: i64) -> Vec<Path> {
    let mut paths = Vec::with_capacity(cols * rows);
    for cy in 0..rows {
        for cx in 0..cols {
            let x = cx as i64 * (cell + gap);
            let y = cy as i64 * (cell + gap);
            paths.push(vec![
                IntPoint::new(x as _, y as _),
                IntPoint::new((x + cell) as _, y as _),
                IntPoint::new((x + cell) as _, (y + cell) as _),
                IntPoint::new(x as _, (y + cell) as _),
            ]);
        }
    }
    paths
}

fn bench_boolean_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("boolean");

    for size in [10usize, 100, 500] {
        let subject = generate_star(size, 100_000.0, 40_000.0);
        let clip = generate_star(size, 90_000.0, 60_000.0);
        group.throughput(Throughput::Elements(size as u64 * 2));

        for (name, op) in [
            ("intersection", ClipType::Intersection),
            ("union", ClipType::Union),
            ("xor", ClipType::Xor),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, size),
                &(&subject, &clip),
                |b, (subject, clip)| {
                    b.iter(|| {
                        let mut clipper = Clipper::new();
                        clipper
                            .add_path(black_box(subject), PolyType::Subject, true)
                            .unwrap();
                        clipper
                            .add_path(black_box(clip), PolyType::Clip, true)
                            .unwrap();
                        clipper
                            .execute(op, PolyFillType::NonZero, PolyFillType::NonZero)
                            .unwrap()
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_grid_union(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_union");

    for n in [8usize, 16, 32] {
        // overlapping grid layers produce lots of intersections
        let layer1 = generate_grid(n, n, 100, 20);
        let layer2: Vec<Path> = layer1
            .iter()
            .map(|p| p.iter().map(|q| IntPoint::new(q.x + 60, q.y + 60)).collect())
            .collect();
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(&layer1, &layer2),
            |b, (l1, l2)| {
                b.iter(|| {
                    let mut clipper = Clipper::new();
                    clipper
                        .add_paths(black_box(l1), PolyType::Subject, true)
                        .unwrap();
                    clipper
                        .add_paths(black_box(l2), PolyType::Clip, true)
                        .unwrap();
                    clipper
                        .execute(
                            ClipType::Union,
                            PolyFillType::NonZero,
                            PolyFillType::NonZero,
                        )
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

fn bench_offset(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset");

    for size in [10usize, 100, 500] {
        let star = generate_star(size, 100_000.0, 40_000.0);
        group.throughput(Throughput::Elements(size as u64 * 2));

        for (name, join) in [
            ("miter", JoinType::Miter),
            ("round", JoinType::Round),
            ("square", JoinType::Square),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &star, |b, star| {
                b.iter(|| {
                    let mut off = ClipperOffset::default();
                    off.add_path(black_box(star), join, EndType::ClosedPolygon);
                    off.execute(1000.0).unwrap()
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_boolean_ops, bench_grid_union, bench_offset);
criterion_main!(benches);
