mod common;

use common::series;
use stock_chart_wasm::domain::chart::{
    ChartConfig, ChartType, Margin, ViewportSpec, compute_chart_geometry,
};
use stock_chart_wasm::domain::market_data::{Timeframe, generate_series};
use stock_chart_wasm::infrastructure::rendering::SvgRenderer;

fn small_viewport() -> ViewportSpec {
    ViewportSpec::new(400.0, 200.0, Margin::new(20.0, 80.0, 30.0, 80.0))
}

#[test]
fn two_candle_chart_snapshot() {
    let s = series(&[(100.0, 110.0, 90.0, 105.0, 10), (105.0, 115.0, 95.0, 98.0, 20)]);
    let config = ChartConfig::default()
        .with_volume(false)
        .with_current_price(false)
        .with_grid_divisions(2);
    let vp = small_viewport();
    let geometry = compute_chart_geometry(&s, &vp, &config).unwrap();
    let svg = SvgRenderer::default().render(&geometry, &vp);
    insta::assert_snapshot!("two_candle_chart", svg);
}

#[test]
fn area_chart_declares_fade_gradient() {
    let s = generate_series("AAPL", Timeframe::OneDay, 30).unwrap();
    let vp = small_viewport();
    let geometry =
        compute_chart_geometry(&s, &vp, &ChartConfig::default().with_chart_type(ChartType::Area)).unwrap();
    let svg = SvgRenderer::default().render(&geometry, &vp);
    assert!(svg.contains(r#"<linearGradient id="area-fade""#));
    assert!(svg.contains(r#"fill="url(#area-fade)""#));
}

#[test]
fn current_price_line_is_dashed() {
    let s = generate_series("AAPL", Timeframe::OneDay, 30).unwrap();
    let vp = small_viewport();
    let geometry = compute_chart_geometry(&s, &vp, &ChartConfig::default()).unwrap();
    let svg = SvgRenderer::default().render(&geometry, &vp);
    assert!(svg.contains(r#"stroke-dasharray="5,5""#));
    assert!(!svg.contains("area-fade"));
    assert_eq!(svg.matches('\n').count(), geometry.len() + 2);
    assert!(svg.ends_with("</svg>"));
}
