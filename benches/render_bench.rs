//! Benchmarks for chart rendering

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use distance_server::{ChartSpec, ChartType, Point, Renderer, Style};
use rand::Rng;

fn create_random_points(n: usize) -> Vec<Point> {
    let mut rng = rand::thread_rng();
    (0..n)
        .map(|_| Point::new(vec![rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()]))
        .collect()
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let renderer = Renderer::default();
    let points = create_random_points(200);

    for chart_type in ChartType::ALL {
        let spec = ChartSpec::new(chart_type, Style::Default);
        group.bench_with_input(
            BenchmarkId::from_parameter(chart_type),
            &spec,
            |b, spec| {
                b.iter(|| renderer.render(black_box(&points), spec).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_render);
criterion_main!(benches);
