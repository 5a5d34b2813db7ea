//! Benchmarks for the per-frame morph path.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use shape_morph::{
    animation::{AnimationState, DriverParams},
    compute::{Point, Rgb},
    render::{Canvas, MorphRenderer, Surface},
    schema::{SHAPE_POINTS, ShapeSet},
};

fn bench_morph_into(c: &mut Criterion) {
    let shapes = ShapeSet::new();
    let mut out: Vec<Point> = Vec::with_capacity(SHAPE_POINTS);

    c.bench_function("morph_into", |b| {
        let mut phase = 0.0f32;
        b.iter(|| {
            phase = (phase + 0.005) % 1.0;
            shapes.morph_into(black_box(phase), &mut out);
        });
    });
}

fn bench_fill_polygon(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_polygon");
    let shape = ShapeSet::new().morph(0.5);

    for size in [250, 500, 1000, 2000] {
        let mut canvas = Canvas::new(size, size, Rgb::WHITE);
        canvas.set_fill_color(Rgb::RED);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", size, size)),
            &size,
            |b, _| {
                b.iter(|| {
                    canvas.clear();
                    canvas.fill_polygon(black_box(&shape));
                });
            },
        );
    }

    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let params = DriverParams::default();
    let mut state = AnimationState::new();
    let mut renderer = MorphRenderer::default();
    let mut canvas = Canvas::new(500, 500, Rgb::WHITE);

    c.bench_function("tick_and_draw_500x500", |b| {
        b.iter(|| {
            state.tick(&params);
            renderer.draw_frame(&mut canvas, black_box(&state)).unwrap();
        });
    });
}

criterion_group!(benches, bench_morph_into, bench_fill_polygon, bench_frame);
criterion_main!(benches);
