mod common;

use common::approx;
use stock_chart_wasm::domain::chart::{
    ChartConfig, GeometryOutput, Indicator, Primitive, StyleTag, ViewportSpec, compute_indicator_panel,
};
use stock_chart_wasm::domain::market_data::{Series, Timeframe, generate_series};

fn panel_viewport() -> ViewportSpec {
    ViewportSpec::with_default_margin(800.0, 200.0)
}

fn series() -> Series {
    generate_series("AAPL", Timeframe::OneDay, 120).unwrap()
}

fn panel(indicator: Indicator) -> GeometryOutput {
    compute_indicator_panel(&series(), &panel_viewport(), &ChartConfig::default(), indicator).unwrap()
}

fn title(out: &GeometryOutput) -> String {
    out.with_style(StyleTag::PanelLabel)
        .find_map(|p| match p {
            Primitive::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
        .unwrap()
}

fn threshold_ys(out: &GeometryOutput) -> Vec<f64> {
    out.with_style(StyleTag::ThresholdLine)
        .filter_map(|p| match p {
            Primitive::Line { from, .. } => Some(from.y),
            _ => None,
        })
        .collect()
}

#[test]
fn rsi_panel_uses_fixed_domain() {
    let out = panel(Indicator::Rsi);
    assert_eq!(title(&out), "RSI (14)");
    assert_eq!(out.count(StyleTag::PanelFrame), 1);
    assert_eq!(out.count(StyleTag::OscillatorLine), 1);

    // [0, 100] over a 120px plot starting at y=20
    let ys = threshold_ys(&out);
    assert_eq!(ys.len(), 2);
    assert!(approx(ys[0], 20.0 + 0.7 * 120.0));
    assert!(approx(ys[1], 20.0 + 0.3 * 120.0));
}

#[test]
fn williams_panel_is_negative() {
    let out = panel(Indicator::WilliamsR);
    assert_eq!(title(&out), "Williams %R (14)");
    let ys = threshold_ys(&out);
    assert!(approx(ys[0], 20.0 + 0.8 * 120.0));
    assert!(approx(ys[1], 20.0 + 0.2 * 120.0));
}

#[test]
fn macd_panel_has_histogram_and_signal() {
    let out = panel(Indicator::Macd);
    assert_eq!(title(&out), "MACD (12,26,9)");
    assert_eq!(out.count(StyleTag::SignalLine), 1);
    assert_eq!(out.count(StyleTag::OscillatorLine), 1);
    // histogram warms up after 26 + 9 - 1 candles; 87 of the last 100 are defined
    assert_eq!(out.count(StyleTag::HistogramUp) + out.count(StyleTag::HistogramDown), 87);
    assert_eq!(threshold_ys(&out).len(), 1);
}

#[test]
fn stochastic_panel_draws_k_and_d() {
    let out = panel(Indicator::Stochastic);
    assert_eq!(title(&out), "Stochastic (14,3)");
    assert_eq!(out.count(StyleTag::OscillatorLine), 1);
    assert_eq!(out.count(StyleTag::SignalLine), 1);
    assert_eq!(threshold_ys(&out).len(), 2);
}

#[test]
fn auto_ranged_panels_stay_inside_frame() {
    for indicator in [Indicator::Cci, Indicator::Momentum, Indicator::Macd] {
        let out = panel(indicator);
        for y in threshold_ys(&out) {
            assert!((20.0..=140.0).contains(&y), "{indicator}: {y}");
        }
    }
}

#[test]
fn overlay_indicators_have_no_panel() {
    for indicator in [Indicator::MovingAverage, Indicator::Sma20, Indicator::Sma50, Indicator::BollingerBands] {
        assert!(
            compute_indicator_panel(&series(), &panel_viewport(), &ChartConfig::default(), indicator).is_err()
        );
    }
}
