use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use terrain_core::{
    ColorMode, FaultGenerator, MeshBuilder, estimate_normals, generate_terrain_mesh_with_rng,
    preview::render_top_down,
};

const SIZE: usize = 129;
const FAULTS: usize = 500;
const SEED: u64 = 2025;

fn bench_fault_field(c: &mut Criterion) {
    c.bench_function("FaultGenerator 129² × 500 faults", |b| {
        let generator = FaultGenerator::new(SIZE, FAULTS).unwrap();
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(SEED);
            black_box(generator.generate(&mut rng).unwrap());
        })
    });
}

fn bench_normalize_and_normals(c: &mut Criterion) {
    let raw = FaultGenerator::new(SIZE, FAULTS)
        .unwrap()
        .generate(&mut StdRng::seed_from_u64(SEED))
        .unwrap();
    c.bench_function("normalize + estimate normals", |b| {
        b.iter(|| {
            let mut field = raw.clone();
            field.normalize().unwrap();
            estimate_normals(&mut field);
            black_box(field);
        })
    });
}

fn bench_mesh_builder(c: &mut Criterion) {
    let mut field = FaultGenerator::new(SIZE, FAULTS)
        .unwrap()
        .generate(&mut StdRng::seed_from_u64(SEED))
        .unwrap();
    field.normalize().unwrap();
    estimate_normals(&mut field);

    c.bench_function("MeshBuilder shaded colors", |b| {
        let builder = MeshBuilder::new().with_color_mode(ColorMode::Shaded);
        b.iter(|| black_box(builder.build(&field).unwrap()))
    });
    c.bench_function("MeshBuilder constant color", |b| {
        let builder = MeshBuilder::new().with_color_mode(ColorMode::Constant([0.5, 0.5, 0.5]));
        b.iter(|| black_box(builder.build(&field).unwrap()))
    });
    c.bench_function("top-down preview image", |b| {
        b.iter(|| black_box(render_top_down(&field, ColorMode::Shaded).unwrap()))
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    c.bench_function("generate_terrain_mesh end to end", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(SEED);
            black_box(generate_terrain_mesh_with_rng(SIZE, FAULTS, &mut rng).unwrap());
        })
    });
}

criterion_group!(
    terrain_benchmarks,
    bench_fault_field,
    bench_normalize_and_normals,
    bench_mesh_builder,
    bench_full_pipeline
);
criterion_main!(terrain_benchmarks);
