use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use stock_chart_wasm::domain::chart::{ChartConfig, StyleTag, ViewportSpec, compute_chart_geometry, compute_scales};
use stock_chart_wasm::domain::market_data::{Seed, SeriesGenerator};

const MINUTE: u64 = 60_000;

#[quickcheck]
fn generated_candles_are_well_formed(seed: u64, length: u16) -> TestResult {
    if length == 0 {
        return TestResult::discard();
    }
    let series = SeriesGenerator::default()
        .generate(Seed::from(seed), i64::from(length % 512) + 1, MINUTE)
        .unwrap();
    let ohlc_ok = series.candles().iter().all(|c| c.ohlcv.is_valid() && c.volume() > 0);
    let steps_ok = series
        .candles()
        .windows(2)
        .all(|w| w[1].timestamp.value() - w[0].timestamp.value() == MINUTE);
    TestResult::from_bool(ohlc_ok && steps_ok)
}

#[quickcheck]
fn generation_is_deterministic(seed: u64) -> bool {
    let generator = SeriesGenerator::default();
    generator.generate(seed, 64, MINUTE).unwrap() == generator.generate(seed, 64, MINUTE).unwrap()
}

#[quickcheck]
fn price_to_y_is_non_increasing(seed: u64, a: f64, b: f64) -> TestResult {
    if !a.is_finite() || !b.is_finite() {
        return TestResult::discard();
    }
    let series = SeriesGenerator::default().generate(seed, 30, MINUTE).unwrap();
    let scales = compute_scales(&series, &ViewportSpec::with_default_margin(800.0, 400.0), 1.0).unwrap();
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    TestResult::from_bool(scales.price_to_y(lo) >= scales.price_to_y(hi))
}

#[quickcheck]
fn computed_rsi_is_bounded(seed: u64) -> bool {
    let series = SeriesGenerator::default().generate(seed, 80, MINUTE).unwrap();
    series
        .candles()
        .iter()
        .filter_map(|c| c.indicators.and_then(|i| i.rsi))
        .all(|rsi| (0.0..=100.0).contains(&rsi))
}

#[quickcheck]
fn heikin_ashi_keeps_ohlc_invariant(seed: u64) -> bool {
    let series = SeriesGenerator::default().generate(seed, 100, MINUTE).unwrap();
    series.heikin_ashi().candles().iter().all(|c| c.ohlcv.is_valid())
}

#[quickcheck]
fn bodies_never_collapse(seed: u64, zoom: f64) -> TestResult {
    if !(zoom > 0.0) || !zoom.is_finite() {
        return TestResult::discard();
    }
    let series = SeriesGenerator::default().generate(seed, 150, MINUTE).unwrap();
    let config = ChartConfig::default().with_zoom(zoom);
    let out = compute_chart_geometry(&series, &ViewportSpec::with_default_margin(800.0, 400.0), &config).unwrap();
    let ok = out
        .iter()
        .filter(|p| matches!(p.style(), StyleTag::CandleUp | StyleTag::CandleDown))
        .all(|p| match p {
            stock_chart_wasm::domain::chart::Primitive::Rect { width, height, .. } => {
                *width >= 2.0 && *height >= 1.0
            }
            _ => false,
        });
    TestResult::from_bool(ok && out.count(StyleTag::TimeLabel) <= 8)
}
