pub use super::value_objects::{OHLCV, Price, Timestamp, Volume};
use crate::domain::errors::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};

/// Indicator values attached to one candle. `None` while the indicator is
/// still inside its warm-up window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma20: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sma50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bollinger_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bollinger_middle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bollinger_lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stochastic_k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stochastic_d: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub williams_r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cci: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
}

/// Domain entity - Candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "time")]
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub ohlcv: OHLCV,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorSnapshot>,
}

impl Candle {
    pub fn new(timestamp: Timestamp, ohlcv: OHLCV) -> Self {
        Self { timestamp, ohlcv, indicators: None }
    }

    /// Up candles close strictly above their open; a flat candle counts as down.
    pub fn is_bullish(&self) -> bool {
        self.ohlcv.is_up()
    }

    pub fn open(&self) -> f64 {
        self.ohlcv.open.value()
    }

    pub fn high(&self) -> f64 {
        self.ohlcv.high.value()
    }

    pub fn low(&self) -> f64 {
        self.ohlcv.low.value()
    }

    pub fn close(&self) -> f64 {
        self.ohlcv.close.value()
    }

    pub fn volume(&self) -> u64 {
        self.ohlcv.volume.value()
    }
}

/// Header figures of a dashboard chart card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub last_close: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub last_volume: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesRepr {
    candles: Vec<Candle>,
    step_ms: u64,
}

/// Domain entity - immutable candle series.
///
/// Always holds at least one candle and times increase by exactly
/// `step_ms`. Derived series (indicators, Heikin-Ashi) are new values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SeriesRepr")]
pub struct Series {
    candles: Vec<Candle>,
    step_ms: u64,
}

impl TryFrom<SeriesRepr> for Series {
    type Error = ChartError;

    fn try_from(repr: SeriesRepr) -> Result<Self, Self::Error> {
        Series::new(repr.candles, repr.step_ms)
    }
}

impl Series {
    pub fn new(candles: Vec<Candle>, step_ms: u64) -> ChartResult<Self> {
        if candles.is_empty() {
            return Err(ChartError::invalid("series must contain at least one candle"));
        }
        if step_ms == 0 {
            return Err(ChartError::invalid("timeframe step must be positive"));
        }
        if let Some(pos) = candles.iter().position(|c| !c.ohlcv.is_valid()) {
            return Err(ChartError::invalid(format!("candle {pos} violates low <= open/close <= high")));
        }
        for (i, pair) in candles.windows(2).enumerate() {
            let delta = pair[1].timestamp.value().checked_sub(pair[0].timestamp.value());
            if delta != Some(step_ms) {
                return Err(ChartError::invalid(format!(
                    "candle {} is not exactly one step after candle {}",
                    i + 1,
                    i
                )));
            }
        }
        Ok(Self { candles, step_ms })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Never true for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    pub fn first(&self) -> &Candle {
        &self.candles[0]
    }

    pub fn last(&self) -> &Candle {
        &self.candles[self.candles.len() - 1]
    }

    /// The last `n` candles, or the whole series when shorter.
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }

    /// Min and max over every open, high, low and close.
    pub fn price_range(&self) -> (f64, f64) {
        self.candles.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            let o = &c.ohlcv;
            let values = [o.open.value(), o.high.value(), o.low.value(), o.close.value()];
            let c_lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let c_hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (lo.min(c_lo), hi.max(c_hi))
        })
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(Candle::close).collect()
    }

    pub fn is_annotated(&self) -> bool {
        self.candles.iter().any(|c| c.indicators.is_some())
    }

    /// New series carrying one snapshot per candle.
    pub fn with_indicators(&self, snapshots: Vec<IndicatorSnapshot>) -> ChartResult<Self> {
        if snapshots.len() != self.candles.len() {
            return Err(ChartError::invalid(format!(
                "expected {} indicator snapshots, got {}",
                self.candles.len(),
                snapshots.len()
            )));
        }
        let candles = self
            .candles
            .iter()
            .zip(snapshots)
            .map(|(candle, snapshot)| Candle { indicators: Some(snapshot), ..candle.clone() })
            .collect();
        Ok(Self { candles, step_ms: self.step_ms })
    }

    /// Heikin-Ashi transform of the whole series. Times, volumes and
    /// indicator snapshots carry over unchanged.
    pub fn heikin_ashi(&self) -> Self {
        let mut candles = Vec::with_capacity(self.candles.len());
        let mut prev: Option<(f64, f64)> = None;

        for candle in &self.candles {
            let ha_close = (candle.open() + candle.high() + candle.low() + candle.close()) / 4.0;
            let ha_open = match prev {
                Some((open, close)) => (open + close) / 2.0,
                None => (candle.open() + candle.close()) / 2.0,
            };
            let ha_high = candle.high().max(ha_open).max(ha_close);
            let ha_low = candle.low().min(ha_open).min(ha_close);
            prev = Some((ha_open, ha_close));

            candles.push(Candle {
                timestamp: candle.timestamp,
                ohlcv: OHLCV::new(
                    Price::from(ha_open),
                    Price::from(ha_high),
                    Price::from(ha_low),
                    Price::from(ha_close),
                    candle.ohlcv.volume,
                ),
                indicators: candle.indicators,
            });
        }

        Self { candles, step_ms: self.step_ms }
    }

    pub fn summary(&self) -> SeriesSummary {
        let last = self.last();
        let previous_close = match self.candles.len() {
            1 => last.close(),
            n => self.candles[n - 2].close(),
        };
        let change = last.close() - previous_close;
        let change_percent = if previous_close != 0.0 { change / previous_close * 100.0 } else { 0.0 };
        let period_high = self.candles.iter().map(Candle::high).fold(f64::NEG_INFINITY, f64::max);
        let period_low = self.candles.iter().map(Candle::low).fold(f64::INFINITY, f64::min);

        SeriesSummary {
            last_close: last.close(),
            previous_close,
            change,
            change_percent,
            period_high,
            period_low,
            last_volume: last.volume(),
        }
    }
}
