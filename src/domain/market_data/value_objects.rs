use derive_more::{Constructor, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - price in quote currency
#[derive(Debug, Clone, Copy, PartialEq, From, Into, Deref, Constructor, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

/// Value Object - traded volume (shares)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, From, Into, Deref, Constructor, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Volume(u64);

impl Volume {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Value Object - milliseconds since the Unix epoch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into, Deref, Constructor, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn from_millis(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Constructor, Serialize, Deserialize)]
pub struct OHLCV {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl OHLCV {
    /// `low <= min(open, close)`, `high >= max(open, close)`, prices positive.
    pub fn is_valid(&self) -> bool {
        let (o, h, l, c) = (self.open.value(), self.high.value(), self.low.value(), self.close.value());
        l > 0.0 && l <= o.min(c) && h >= o.max(c) && [o, h, l, c].iter().all(|p| p.is_finite())
    }

    pub fn is_up(&self) -> bool {
        self.close > self.open
    }
}

/// Value Object - ticker symbol, always upper case
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: &str) -> Result<Self, String> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.trim().to_uppercase())
    }
}

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// Candle size selectable from the dashboard timeframe buttons.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    StrumDisplay,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Timeframe {
    #[strum(serialize = "1m")]
    #[serde(rename = "1m")]
    OneMinute,

    #[strum(serialize = "5m")]
    #[serde(rename = "5m")]
    FiveMinutes,

    #[strum(serialize = "15m")]
    #[serde(rename = "15m")]
    FifteenMinutes,

    #[strum(serialize = "1H", serialize = "1h")]
    #[serde(rename = "1H", alias = "1h")]
    OneHour,

    #[strum(serialize = "4H", serialize = "4h")]
    #[serde(rename = "4H", alias = "4h")]
    FourHours,

    #[strum(serialize = "1D", serialize = "1d")]
    #[serde(rename = "1D", alias = "1d")]
    OneDay,

    #[strum(serialize = "1W", serialize = "1w")]
    #[serde(rename = "1W", alias = "1w")]
    OneWeek,

    #[strum(serialize = "1M")]
    #[serde(rename = "1M")]
    OneMonth,

    #[strum(serialize = "3M")]
    #[serde(rename = "3M")]
    ThreeMonths,

    #[strum(serialize = "1Y", serialize = "1y")]
    #[serde(rename = "1Y", alias = "1y")]
    OneYear,
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::OneDay
    }
}

impl Timeframe {
    /// Distance between consecutive candles. Months and years use fixed
    /// 30/90/365 day buckets.
    pub fn step_ms(&self) -> u64 {
        match self {
            Self::OneMinute => MINUTE_MS,
            Self::FiveMinutes => 5 * MINUTE_MS,
            Self::FifteenMinutes => 15 * MINUTE_MS,
            Self::OneHour => HOUR_MS,
            Self::FourHours => 4 * HOUR_MS,
            Self::OneDay => DAY_MS,
            Self::OneWeek => 7 * DAY_MS,
            Self::OneMonth => 30 * DAY_MS,
            Self::ThreeMonths => 90 * DAY_MS,
            Self::OneYear => 365 * DAY_MS,
        }
    }

    /// Number of candles a dashboard page asks for by default.
    pub fn default_length(&self) -> usize {
        match self {
            Self::OneWeek => 35,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::OneYear => 365,
            _ => 200,
        }
    }

    pub fn is_intraday(&self) -> bool {
        self.step_ms() < DAY_MS
    }
}

/// Seed of the synthetic price stream.
///
/// Strings are folded with 64-bit FNV-1a, which is stable across platforms
/// and releases, so a symbol always maps to the same stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u64);

impl Seed {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn from_text(text: &str) -> Self {
        let hash = text.bytes().fold(Self::FNV_OFFSET, |hash, byte| {
            (hash ^ byte as u64).wrapping_mul(Self::FNV_PRIME)
        });
        Self(hash)
    }

    /// Seed for a symbol/timeframe pair, optionally advanced by a live tick.
    pub fn for_chart(symbol: &Symbol, timeframe: Timeframe, tick: u64) -> Self {
        if tick == 0 {
            Self::from_text(&format!("{}:{}", symbol.value(), timeframe))
        } else {
            Self::from_text(&format!("{}:{}#{}", symbol.value(), timeframe, tick))
        }
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}
