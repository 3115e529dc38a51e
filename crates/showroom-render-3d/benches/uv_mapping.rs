//! Texture transform and material cache benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use showroom_core::Pattern;
use showroom_render_3d::{compute_uv_transform, LoadCompletion, MaterialCache, MaterialParams, TextureImage};

fn uv_transform(c: &mut Criterion) {
    c.bench_function("uv_transform_straight", |b| {
        b.iter(|| compute_uv_transform(black_box(600.0), black_box(600.0), 3.0, 3.5, Pattern::Straight))
    });

    c.bench_function("uv_transform_herringbone", |b| {
        b.iter(|| compute_uv_transform(black_box(600.0), black_box(300.0), 4.0, 5.0, Pattern::Herringbone))
    });
}

fn material_hit(c: &mut Criterion) {
    let mut cache = MaterialCache::new(|_: &str, completion: LoadCompletion| {
        completion.resolve(Ok(TextureImage::new(1024, 1024)));
    });
    let params = MaterialParams {
        image_ref: "/tiles/marble-white.png".into(),
        tile_width_mm: 600,
        tile_height_mm: 600,
        surface_width_m: 4.0,
        surface_height_m: 5.0,
        pattern: Pattern::Diagonal,
        roughness: 0.3,
    };
    let _ = cache.resolve_material(&params);

    c.bench_function("material_cache_hit", |b| {
        b.iter(|| cache.resolve_material(black_box(&params)))
    });
}

criterion_group!(benches, uv_transform, material_hit);
criterion_main!(benches);
