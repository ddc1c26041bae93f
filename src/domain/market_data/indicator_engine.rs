//! Classic technical indicators over a finished candle series.
//!
//! Every function returns one value per input element; positions inside an
//! indicator's warm-up window are `None`.

use super::{Candle, IndicatorSnapshot};
use std::collections::VecDeque;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const SMA_SHORT: usize = 20;
pub const SMA_LONG: usize = 50;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD_MULT: f64 = 2.0;
pub const STOCHASTIC_K: usize = 14;
pub const STOCHASTIC_D: usize = 3;
pub const WILLIAMS_PERIOD: usize = 14;
pub const CCI_PERIOD: usize = 20;
pub const CCI_CONSTANT: f64 = 0.015;
pub const MOMENTUM_PERIOD: usize = 10;

/// Fixed-size window with a running sum
#[derive(Debug, Clone)]
pub struct RollingWindow {
    win: VecDeque<f64>,
    sum: f64,
    period: usize,
}

impl RollingWindow {
    pub fn new(period: usize) -> Self {
        Self { win: VecDeque::with_capacity(period + 1), sum: 0.0, period }
    }

    /// Push a value; returns the mean once the window is full.
    #[inline]
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.sum += value;
        self.win.push_back(value);
        if self.win.len() > self.period
            && let Some(v) = self.win.pop_front()
        {
            self.sum -= v;
        }
        self.is_full().then(|| self.sum / self.period as f64)
    }

    pub fn is_full(&self) -> bool {
        self.period > 0 && self.win.len() == self.period
    }

    pub fn values(&self) -> impl Iterator<Item = &f64> {
        self.win.iter()
    }
}

pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut window = RollingWindow::new(period);
    values.iter().map(|&v| window.push(v)).collect()
}

/// EMA seeded with the SMA of its first `period` values.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    let alpha = 2.0 / (period as f64 + 1.0);
    let mut last = values[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = Some(last);
    for (i, &v) in values.iter().enumerate().skip(period) {
        last = alpha * v + (1.0 - alpha) * last;
        out[i] = Some(last);
    }
    out
}

/// RSI with Wilder smoothing.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let change = |i: usize| closes[i] - closes[i - 1];
    let (mut avg_gain, mut avg_loss) = (1..=period).fold((0.0, 0.0), |(g, l), i| {
        let c = change(i);
        (g + c.max(0.0), l + (-c).max(0.0))
    });
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    let p = period as f64;
    for (i, slot) in out.iter_mut().enumerate().skip(period + 1) {
        let c = change(i);
        avg_gain = (avg_gain * (p - 1.0) + c.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-c).max(0.0)) / p;
        *slot = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}

#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let macd: Vec<Option<f64>> =
        fast_ema.iter().zip(&slow_ema).map(|(f, s)| Some((*f)? - (*s)?)).collect();
    let signal = on_defined(&macd, |vals| ema(vals, signal));
    let histogram = macd.iter().zip(&signal).map(|(m, s)| Some((*m)? - (*s)?)).collect();
    MacdSeries { macd, signal, histogram }
}

#[derive(Debug, Clone, Default)]
pub struct BollingerSeries {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Bollinger bands using the population standard deviation.
pub fn bollinger(closes: &[f64], period: usize, std_mult: f64) -> BollingerSeries {
    let mut bands = BollingerSeries::default();
    let mut window = RollingWindow::new(period);
    for &close in closes {
        match window.push(close) {
            Some(mean) => {
                let variance =
                    window.values().map(|v| (v - mean).powi(2)).sum::<f64>() / period as f64;
                let std_dev = variance.sqrt();
                bands.upper.push(Some(mean + std_mult * std_dev));
                bands.middle.push(Some(mean));
                bands.lower.push(Some(mean - std_mult * std_dev));
            }
            None => {
                bands.upper.push(None);
                bands.middle.push(None);
                bands.lower.push(None);
            }
        }
    }
    bands
}

fn highest_lowest(highs: &[f64], lows: &[f64], end: usize, period: usize) -> (f64, f64) {
    let start = end + 1 - period;
    let hh = highs[start..=end].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ll = lows[start..=end].iter().copied().fold(f64::INFINITY, f64::min);
    (hh, ll)
}

/// Stochastic oscillator: `%K` over `k_period`, `%D` = SMA of `%K`.
pub fn stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let k: Vec<Option<f64>> = (0..closes.len())
        .map(|i| {
            if k_period == 0 || i + 1 < k_period {
                return None;
            }
            let (hh, ll) = highest_lowest(highs, lows, i, k_period);
            Some(if hh > ll { (closes[i] - ll) / (hh - ll) * 100.0 } else { 50.0 })
        })
        .collect();
    let d = on_defined(&k, |vals| sma(vals, d_period));
    (k, d)
}

pub fn williams_r(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..closes.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            let (hh, ll) = highest_lowest(highs, lows, i, period);
            Some(if hh > ll { (hh - closes[i]) / (hh - ll) * -100.0 } else { -50.0 })
        })
        .collect()
}

/// Commodity Channel Index over the typical price.
pub fn cci(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let typical: Vec<f64> =
        (0..closes.len()).map(|i| (highs[i] + lows[i] + closes[i]) / 3.0).collect();
    let means = sma(&typical, period);
    means
        .iter()
        .enumerate()
        .map(|(i, mean)| {
            let mean = (*mean)?;
            let window = &typical[i + 1 - period..=i];
            let mean_dev = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;
            Some(if mean_dev > 0.0 { (typical[i] - mean) / (CCI_CONSTANT * mean_dev) } else { 0.0 })
        })
        .collect()
}

pub fn momentum(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..closes.len())
        .map(|i| (period > 0 && i >= period).then(|| closes[i] - closes[i - period]))
        .collect()
}

/// Applies `f` to the contiguous defined tail of `values` and re-aligns the
/// result with the input.
fn on_defined(
    values: &[Option<f64>],
    f: impl Fn(&[f64]) -> Vec<Option<f64>>,
) -> Vec<Option<f64>> {
    let start = values.iter().position(Option::is_some).unwrap_or(values.len());
    let defined: Vec<f64> = values[start..].iter().flatten().copied().collect();
    let mut out = vec![None; start];
    out.extend(f(&defined));
    out.resize(values.len(), None);
    out
}

/// Computes every indicator for every candle.
pub fn compute_snapshots(candles: &[Candle]) -> Vec<IndicatorSnapshot> {
    let closes: Vec<f64> = candles.iter().map(Candle::close).collect();
    let highs: Vec<f64> = candles.iter().map(Candle::high).collect();
    let lows: Vec<f64> = candles.iter().map(Candle::low).collect();

    let rsi = rsi(&closes, RSI_PERIOD);
    let macd = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let sma20 = sma(&closes, SMA_SHORT);
    let sma50 = sma(&closes, SMA_LONG);
    let bands = bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_STD_MULT);
    let (stoch_k, stoch_d) = stochastic(&highs, &lows, &closes, STOCHASTIC_K, STOCHASTIC_D);
    let williams = williams_r(&highs, &lows, &closes, WILLIAMS_PERIOD);
    let cci = cci(&highs, &lows, &closes, CCI_PERIOD);
    let momentum = momentum(&closes, MOMENTUM_PERIOD);

    (0..candles.len())
        .map(|i| IndicatorSnapshot {
            rsi: rsi[i],
            macd: macd.macd[i],
            macd_signal: macd.signal[i],
            macd_histogram: macd.histogram[i],
            sma20: sma20[i],
            sma50: sma50[i],
            bollinger_upper: bands.upper[i],
            bollinger_middle: bands.middle[i],
            bollinger_lower: bands.lower[i],
            stochastic_k: stoch_k[i],
            stochastic_d: stoch_d[i],
            williams_r: williams[i],
            cci: cci[i],
            momentum: momentum[i],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_window_drops_oldest() {
        let mut w = RollingWindow::new(2);
        assert_eq!(w.push(1.0), None);
        assert_eq!(w.push(3.0), Some(2.0));
        assert_eq!(w.push(5.0), Some(4.0));
    }

    #[test]
    fn ema_is_seeded_with_sma() {
        let out = ema(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(out[1], None);
        assert_eq!(out[2], Some(2.0));
        assert_eq!(out[3], Some(3.0));
    }

    #[test]
    fn on_defined_realigns() {
        let vals = [None, None, Some(1.0), Some(3.0), Some(5.0)];
        let out = on_defined(&vals, |v| sma(v, 2));
        assert_eq!(out, vec![None, None, None, Some(2.0), Some(4.0)]);
    }
}
