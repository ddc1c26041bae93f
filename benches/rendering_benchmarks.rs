use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use stock_chart_wasm::domain::chart::{
    ChartConfig, ChartGeometryMapper, ChartType, Indicator, ViewportSpec, compute_indicator_panel,
};
use stock_chart_wasm::domain::market_data::{Timeframe, generate_series};
use stock_chart_wasm::infrastructure::rendering::SvgRenderer;

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_geometry");
    let viewport = ViewportSpec::with_default_margin(1280.0, 720.0);
    let mapper = ChartGeometryMapper::new();
    let Ok(series) = generate_series("AAPL", Timeframe::OneYear, 365) else { return };

    for chart_type in [ChartType::Candlestick, ChartType::HeikinAshi, ChartType::Area] {
        for zoom in [0.5, 1.0, 3.0] {
            let config = ChartConfig::default()
                .with_chart_type(chart_type)
                .with_indicator(Indicator::BollingerBands)
                .with_indicator(Indicator::Sma50)
                .with_zoom(zoom);
            group.bench_with_input(
                BenchmarkId::new(chart_type.as_ref(), zoom),
                &config,
                |b, config| b.iter(|| mapper.compute(black_box(&series), &viewport, config)),
            );
        }
    }

    let panel_viewport = ViewportSpec::with_default_margin(1280.0, 200.0);
    group.bench_function("macd_panel", |b| {
        b.iter(|| {
            compute_indicator_panel(
                black_box(&series),
                &panel_viewport,
                &ChartConfig::default(),
                Indicator::Macd,
            )
        })
    });
    group.finish();
}

fn bench_svg(c: &mut Criterion) {
    let viewport = ViewportSpec::with_default_margin(1280.0, 720.0);
    let Ok(series) = generate_series("MSFT", Timeframe::OneDay, 200) else { return };
    let config = ChartConfig::default().with_zoom(0.5).with_indicator(Indicator::MovingAverage);
    let Ok(geometry) = ChartGeometryMapper::new().compute(&series, &viewport, &config) else { return };
    let renderer = SvgRenderer::default();

    c.bench_function("svg_render_200", |b| {
        b.iter(|| renderer.render(black_box(&geometry), &viewport))
    });
}

criterion_group!(rendering_benches, bench_geometry, bench_svg);
criterion_main!(rendering_benches);
