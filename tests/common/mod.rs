#![allow(dead_code)]

use stock_chart_wasm::domain::chart::{Margin, ViewportSpec};
use stock_chart_wasm::domain::market_data::{Candle, OHLCV, Price, Series, Timestamp, Volume};

pub const DAY: u64 = 86_400_000;

pub fn candle(time: u64, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Candle {
    Candle::new(
        Timestamp::from(time),
        OHLCV::new(
            Price::from(open),
            Price::from(high),
            Price::from(low),
            Price::from(close),
            Volume::from(volume),
        ),
    )
}

/// Daily series from `(open, high, low, close, volume)` rows.
pub fn series(rows: &[(f64, f64, f64, f64, u64)]) -> Series {
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, &(o, h, l, c, v))| candle(i as u64 * DAY, o, h, l, c, v))
        .collect();
    Series::new(candles, DAY).unwrap()
}

/// Dashboard viewport: 800x400 with margin {20, 80, 60, 80}.
pub fn dashboard_viewport() -> ViewportSpec {
    ViewportSpec::new(800.0, 400.0, Margin::new(20.0, 80.0, 60.0, 80.0))
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
