use super::indicator_engine::{self, MOMENTUM_PERIOD};
use super::{Candle, IndicatorSnapshot, OHLCV, Price, Seed, Series, Symbol, Timeframe, Timestamp, Volume};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// 2024-01-01T00:00:00Z, the default time of the newest generated candle.
pub const DEFAULT_ANCHOR_MS: u64 = 1_704_067_200_000;

/// Lowest close the walk may reach, as a fraction of `base_price_min`.
pub const PRICE_FLOOR_RATIO: f64 = 1e-6;

/// How the generator fills the per-candle indicator snapshot.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IndicatorMode {
    /// Plain OHLCV candles.
    None,
    /// Cosmetic random values, as drawn by the mock dashboard.
    Fake,
    /// Real formulas over the generated prices.
    #[default]
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub base_price_min: f64,
    pub base_price_max: f64,
    pub trend_amplitude: f64,
    pub trend_frequency: f64,
    pub wick_ratio: f64,
    pub volume_min: u64,
    pub volume_max: u64,
    /// Time of the newest candle.
    pub anchor_ms: u64,
    pub indicator_mode: IndicatorMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_price_min: 100.0,
            base_price_max: 250.0,
            trend_amplitude: 0.5,
            trend_frequency: 0.1,
            wick_ratio: 0.02,
            volume_min: 500_000,
            volume_max: 2_500_000,
            anchor_ms: DEFAULT_ANCHOR_MS,
            indicator_mode: IndicatorMode::Computed,
        }
    }
}

impl GeneratorConfig {
    pub fn with_indicator_mode(mut self, mode: IndicatorMode) -> Self {
        self.indicator_mode = mode;
        self
    }

    pub fn with_anchor(mut self, anchor_ms: u64) -> Self {
        self.anchor_ms = anchor_ms;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(self.base_price_min > 0.0 && self.base_price_min < self.base_price_max) {
            return Err(ChartError::invalid("base price range must be positive and non-empty"));
        }
        if !self.base_price_max.is_finite() {
            return Err(ChartError::invalid("base price range must be finite"));
        }
        if self.volume_min == 0 || self.volume_min >= self.volume_max {
            return Err(ChartError::invalid("volume range must be positive and non-empty"));
        }
        if !(0.0..=1.0).contains(&self.wick_ratio) {
            return Err(ChartError::invalid("wick ratio must be within [0, 1]"));
        }
        // A step moves close by at most (amplitude + 0.025) of the open price.
        if !(0.0..0.9).contains(&self.trend_amplitude) || !self.trend_frequency.is_finite() {
            return Err(ChartError::invalid("trend amplitude must be within [0, 0.9)"));
        }
        Ok(())
    }
}

/// Seeded random-walk OHLCV generator.
#[derive(Debug, Clone, Default)]
pub struct SeriesGenerator {
    config: GeneratorConfig,
}

impl SeriesGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates `length` candles spaced `step_ms` apart.
    ///
    /// The same seed, length, step and config always give the same series.
    pub fn generate(&self, seed: impl Into<Seed>, length: i64, step_ms: u64) -> ChartResult<Series> {
        let seed = seed.into();
        if length <= 0 {
            log_warn!(LogComponent::Domain("SeriesGenerator"), "rejected length {}", length);
            return Err(ChartError::invalid(format!("length must be positive, got {length}")));
        }
        if step_ms == 0 {
            log_warn!(LogComponent::Domain("SeriesGenerator"), "rejected zero step");
            return Err(ChartError::invalid("timeframe step must be positive"));
        }
        self.config.validate()?;

        let length = length as u64;
        let span = (length - 1)
            .checked_mul(step_ms)
            .ok_or_else(|| ChartError::invalid("series span overflows the time axis"))?;
        let first_time = self.config.anchor_ms.saturating_sub(span);
        first_time
            .checked_add(span)
            .ok_or_else(|| ChartError::invalid("series span overflows the time axis"))?;

        let cfg = &self.config;
        let mut rng = StdRng::seed_from_u64(seed.value());
        let price_floor = cfg.base_price_min * PRICE_FLOOR_RATIO;
        let mut base_price = rng.gen_range(cfg.base_price_min..cfg.base_price_max);
        let mut candles = Vec::with_capacity(length as usize);
        let mut opens = Vec::with_capacity(length as usize);

        for i in 0..length {
            let open = base_price;
            let volatility = 0.02 + rng.gen_range(0.0..1.0) * 0.03;
            let trend = (i as f64 * cfg.trend_frequency).sin() * cfg.trend_amplitude;
            let noise = (rng.gen_range(0.0..1.0) - 0.5) * volatility;
            // the walk drifts down over long runs; open >= floor keeps every candle positive
            let close = (open + (trend + noise) * base_price).max(price_floor);
            let high = open.max(close) + rng.gen_range(0.0..1.0) * base_price * cfg.wick_ratio;
            let low = (open.min(close) - rng.gen_range(0.0..1.0) * base_price * cfg.wick_ratio)
                .max(price_floor * 0.5);
            let volume = rng.gen_range(cfg.volume_min..cfg.volume_max);

            candles.push(Candle::new(
                Timestamp::from(first_time + i * step_ms),
                OHLCV::new(
                    Price::from(open),
                    Price::from(high),
                    Price::from(low),
                    Price::from(close),
                    Volume::from(volume),
                ),
            ));
            opens.push(open);
            base_price = close;
        }

        let series = Series::new(candles, step_ms)?;
        let series = match cfg.indicator_mode {
            IndicatorMode::None => series,
            IndicatorMode::Computed => {
                let snapshots = indicator_engine::compute_snapshots(series.candles());
                series.with_indicators(snapshots)?
            }
            IndicatorMode::Fake => {
                let snapshots = fake_snapshots(&mut rng, series.candles(), &opens);
                series.with_indicators(snapshots)?
            }
        };

        log_debug!(
            LogComponent::Domain("SeriesGenerator"),
            "generated {} candles (seed {:#x}, step {}ms, mode {})",
            series.len(),
            seed.value(),
            step_ms,
            cfg.indicator_mode.as_ref()
        );
        Ok(series)
    }
}

/// Dashboard-style placeholder values drawn from the generator's stream.
/// Oscillators the dashboard never faked are computed for real.
fn fake_snapshots(rng: &mut StdRng, candles: &[Candle], opens: &[f64]) -> Vec<IndicatorSnapshot> {
    let highs: Vec<f64> = candles.iter().map(Candle::high).collect();
    let lows: Vec<f64> = candles.iter().map(Candle::low).collect();
    let closes: Vec<f64> = candles.iter().map(Candle::close).collect();
    let (stoch_k, stoch_d) = indicator_engine::stochastic(
        &highs,
        &lows,
        &closes,
        indicator_engine::STOCHASTIC_K,
        indicator_engine::STOCHASTIC_D,
    );
    let williams =
        indicator_engine::williams_r(&highs, &lows, &closes, indicator_engine::WILLIAMS_PERIOD);
    let cci = indicator_engine::cci(&highs, &lows, &closes, indicator_engine::CCI_PERIOD);
    let momentum = indicator_engine::momentum(&closes, MOMENTUM_PERIOD);

    closes
        .iter()
        .zip(opens)
        .enumerate()
        .map(|(i, (&close, &open))| {
            let rsi = 30.0 + rng.gen_range(0.0..1.0) * 40.0;
            let macd = (rng.gen_range(0.0..1.0) - 0.5) * 2.0;
            let signal = macd * 0.8 + (rng.gen_range(0.0..1.0) - 0.5) * 0.5;
            let sma20 = close * (0.98 + rng.gen_range(0.0..1.0) * 0.04);
            let sma50 = close * (0.96 + rng.gen_range(0.0..1.0) * 0.08);
            IndicatorSnapshot {
                rsi: Some(rsi),
                macd: Some(macd),
                macd_signal: Some(signal),
                macd_histogram: Some(macd - signal),
                sma20: Some(sma20),
                sma50: Some(sma50),
                bollinger_upper: Some(close + open * 0.04),
                bollinger_middle: Some(close),
                bollinger_lower: Some(close - open * 0.04),
                stochastic_k: stoch_k[i],
                stochastic_d: stoch_d[i],
                williams_r: williams[i],
                cci: cci[i],
                momentum: momentum[i],
            }
        })
        .collect()
}

/// Series for a dashboard chart: seeded by symbol and timeframe.
pub fn generate_series(symbol: &str, timeframe: Timeframe, length: i64) -> ChartResult<Series> {
    let symbol = Symbol::new(symbol).map_err(ChartError::invalid)?;
    SeriesGenerator::default().generate(Seed::for_chart(&symbol, timeframe, 0), length, timeframe.step_ms())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_inverted_ranges() {
        let cfg = GeneratorConfig { base_price_min: 300.0, ..GeneratorConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = GeneratorConfig { volume_min: 10, volume_max: 10, ..GeneratorConfig::default() };
        assert!(cfg.validate().is_err());
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn newest_candle_sits_on_anchor() {
        let generator = SeriesGenerator::new(GeneratorConfig::default().with_anchor(10_000));
        let series = generator.generate(7u64, 3, 1_000).unwrap();
        assert_eq!(series.last().timestamp.value(), 10_000);
        assert_eq!(series.first().timestamp.value(), 8_000);
    }

    #[test]
    fn anchor_saturates_at_epoch() {
        let generator = SeriesGenerator::new(GeneratorConfig::default().with_anchor(500));
        let series = generator.generate(7u64, 4, 1_000).unwrap();
        assert_eq!(series.first().timestamp.value(), 0);
        assert_eq!(series.last().timestamp.value(), 3_000);
    }

    #[test]
    fn long_walk_stays_above_price_floor() {
        let series = SeriesGenerator::default().generate(7u64, 12_000, 60_000).unwrap();
        assert_eq!(series.len(), 12_000);
        let floor = GeneratorConfig::default().base_price_min * PRICE_FLOOR_RATIO;
        assert!(series.candles().iter().all(|c| c.close() >= floor && c.low() > 0.0));
    }

    #[test]
    fn mode_parses_from_text() {
        use std::str::FromStr;
        assert_eq!(IndicatorMode::from_str("fake").unwrap(), IndicatorMode::Fake);
        assert_eq!(IndicatorMode::default(), IndicatorMode::Computed);
    }
}
