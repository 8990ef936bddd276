use criterion::{criterion_group, criterion_main, Criterion};

use huebrot_core::{Complex, Viewport};
use huebrot_render::{build_palette, FractalField, FractalKind};

fn bench_mandelbrot_recompute(c: &mut Criterion) {
    let mut field =
        FractalField::new(FractalKind::Mandelbrot, 400, 400, Viewport::default(), 100).unwrap();

    c.bench_function("mandelbrot_recompute_400x400_100iter", |b| {
        b.iter(|| field.recompute(Complex::ZERO).unwrap());
    });
}

fn bench_julia_recompute(c: &mut Criterion) {
    let mut field =
        FractalField::new(FractalKind::Julia, 400, 400, Viewport::default(), 100).unwrap();
    let seed = Complex::new(-0.8, 0.156);

    c.bench_function("julia_recompute_400x400_100iter", |b| {
        b.iter(|| field.recompute(seed).unwrap());
    });
}

fn bench_recolor(c: &mut Criterion) {
    let mut field =
        FractalField::new(FractalKind::Mandelbrot, 400, 400, Viewport::default(), 100).unwrap();
    field.recompute(Complex::ZERO).unwrap();

    c.bench_function("animation_recolor_400x400", |b| {
        b.iter(|| {
            field.advance_offset(4);
            field.recolor().unwrap();
        });
    });
}

fn bench_build_palette(c: &mut Criterion) {
    c.bench_function("build_palette_1000", |b| {
        b.iter(|| build_palette(1000, 150));
    });
}

criterion_group!(
    benches,
    bench_mandelbrot_recompute,
    bench_julia_recompute,
    bench_recolor,
    bench_build_palette
);
criterion_main!(benches);
