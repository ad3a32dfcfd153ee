use std::hint::black_box;

use colorsearch::searcher::chi2_distance;
use colorsearch::{ColorDescriptor, Image};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::prelude::*;

fn bench_describe(c: &mut Criterion) {
    let mut group = c.benchmark_group("Describe");
    let mut rng = rand::rng();
    let (w, h) = (640, 480);
    let data: Vec<[u8; 3]> = (0..w * h).map(|_| rng.random()).collect();
    let image = Image::from_pixels(w, h, data).unwrap();
    let descriptor = ColorDescriptor::new((8, 12, 3)).unwrap();

    group.throughput(Throughput::Elements((w * h) as u64));
    group.bench_function("describe_640x480", |b| {
        b.iter(|| descriptor.describe(black_box(&image)).unwrap())
    });
    group.finish();
}

fn bench_chi2_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Chi2 scan");
    let mut rng = rand::rng();
    let dim = 4 * 8 * 12 * 3;
    let query: Vec<f32> = (0..dim).map(|_| rng.random()).collect();
    let vectors: Vec<Vec<f32>> =
        (0..10_000).map(|_| (0..dim).map(|_| rng.random()).collect()).collect();

    group.throughput(Throughput::Elements(vectors.len() as u64));
    group.bench_function("scan_10k", |b| {
        b.iter(|| {
            vectors
                .iter()
                .map(|v| chi2_distance(v, black_box(&query)))
                .fold(f32::INFINITY, f32::min)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_describe, bench_chi2_scan);
criterion_main!(benches);
