use super::constants::{
    DEFAULT_GRID_DIVISIONS, DEFAULT_MARGIN, MAX_ZOOM, MIN_ZOOM, VOLUME_CAP_PX, ZOOM_STEP,
};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::market_data::Timeframe;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{AsRefStr, EnumIter, EnumString};

/// Value Object - Chart type
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum ChartType {
    #[default]
    #[display(fmt = "Candlestick")]
    #[strum(serialize = "candlestick")]
    #[serde(rename = "candlestick")]
    Candlestick,
    #[display(fmt = "Line")]
    #[strum(serialize = "line")]
    #[serde(rename = "line")]
    Line,
    #[display(fmt = "Area")]
    #[strum(serialize = "area")]
    #[serde(rename = "area")]
    Area,
    #[display(fmt = "Heikin-Ashi")]
    #[strum(serialize = "heikin-ashi", serialize = "heikin")]
    #[serde(rename = "heikin-ashi", alias = "heikin")]
    HeikinAshi,
}

/// Value Object - technical indicator selectable on a chart
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
pub enum Indicator {
    #[display(fmt = "RSI")]
    #[strum(serialize = "RSI")]
    #[serde(rename = "RSI")]
    Rsi,
    #[display(fmt = "MACD")]
    #[strum(serialize = "MACD")]
    #[serde(rename = "MACD")]
    Macd,
    #[display(fmt = "Moving Average")]
    #[strum(serialize = "Moving Average")]
    #[serde(rename = "Moving Average")]
    MovingAverage,
    #[display(fmt = "Bollinger Bands")]
    #[strum(serialize = "Bollinger Bands")]
    #[serde(rename = "Bollinger Bands")]
    BollingerBands,
    #[display(fmt = "SMA20")]
    #[strum(serialize = "SMA20")]
    #[serde(rename = "SMA20")]
    Sma20,
    #[display(fmt = "SMA50")]
    #[strum(serialize = "SMA50")]
    #[serde(rename = "SMA50")]
    Sma50,
    #[display(fmt = "Stochastic")]
    #[strum(serialize = "Stochastic")]
    #[serde(rename = "Stochastic")]
    Stochastic,
    #[display(fmt = "Williams %R")]
    #[strum(serialize = "Williams %R")]
    #[serde(rename = "Williams %R")]
    WilliamsR,
    #[display(fmt = "CCI")]
    #[strum(serialize = "CCI")]
    #[serde(rename = "CCI")]
    Cci,
    #[display(fmt = "Momentum")]
    #[strum(serialize = "Momentum")]
    #[serde(rename = "Momentum")]
    Momentum,
}

impl Indicator {
    /// Drawn on top of the price pane rather than in its own panel.
    pub fn is_overlay(&self) -> bool {
        matches!(self, Self::MovingAverage | Self::BollingerBands | Self::Sma20 | Self::Sma50)
    }

    pub fn panel_title(&self) -> Option<&'static str> {
        match self {
            Self::Rsi => Some("RSI (14)"),
            Self::Macd => Some("MACD (12,26,9)"),
            Self::Stochastic => Some("Stochastic (14,3)"),
            Self::WilliamsR => Some("Williams %R (14)"),
            Self::Cci => Some("CCI (20)"),
            Self::Momentum => Some("Momentum (10)"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

impl Default for Margin {
    fn default() -> Self {
        let [top, right, bottom, left] = DEFAULT_MARGIN;
        Self { top, right, bottom, left }
    }
}

/// Value Object - pixel box a chart is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSpec {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
}

impl ViewportSpec {
    pub fn new(width: f64, height: f64, margin: Margin) -> Self {
        Self { width, height, margin }
    }

    pub fn with_default_margin(width: f64, height: f64) -> Self {
        Self::new(width, height, Margin::default())
    }

    pub fn chart_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn chart_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }

    /// Y of the chart floor.
    pub fn bottom(&self) -> f64 {
        self.margin.top + self.chart_height()
    }

    pub fn right(&self) -> f64 {
        self.margin.left + self.chart_width()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !(self.width > 0.0) || !(self.height > 0.0) {
            return Err(ChartError::invalid(format!(
                "viewport must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        let m = &self.margin;
        if [m.top, m.right, m.bottom, m.left].iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ChartError::invalid("margins must be finite and non-negative"));
        }
        if !(self.chart_width() > 0.0) || !(self.chart_height() > 0.0) {
            return Err(ChartError::invalid("margins leave no drawable area"));
        }
        Ok(())
    }
}

/// Value Object - immutable chart settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub chart_type: ChartType,
    pub indicators: BTreeSet<Indicator>,
    pub zoom: f64,
    pub timeframe: Timeframe,
    pub grid_divisions: u32,
    pub show_volume: bool,
    pub volume_cap_px: f64,
    pub show_current_price: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_type: ChartType::Candlestick,
            indicators: BTreeSet::new(),
            zoom: 1.0,
            timeframe: Timeframe::OneDay,
            grid_divisions: DEFAULT_GRID_DIVISIONS,
            show_volume: true,
            volume_cap_px: VOLUME_CAP_PX,
            show_current_price: true,
        }
    }
}

impl ChartConfig {
    pub fn new(chart_type: ChartType, timeframe: Timeframe) -> Self {
        Self { chart_type, timeframe, ..Default::default() }
    }

    pub fn has(&self, indicator: Indicator) -> bool {
        self.indicators.contains(&indicator)
    }

    pub fn with_indicator(&self, indicator: Indicator) -> Self {
        let mut next = self.clone();
        next.indicators.insert(indicator);
        next
    }

    pub fn with_indicator_toggled(&self, indicator: Indicator) -> Self {
        let mut next = self.clone();
        if !next.indicators.remove(&indicator) {
            next.indicators.insert(indicator);
        }
        next
    }

    pub fn with_zoom(&self, zoom: f64) -> Self {
        Self { zoom: clamp_zoom(zoom), ..self.clone() }
    }

    pub fn zoomed_in(&self) -> Self {
        self.with_zoom(self.zoom + ZOOM_STEP)
    }

    pub fn zoomed_out(&self) -> Self {
        self.with_zoom(self.zoom - ZOOM_STEP)
    }

    pub fn with_chart_type(&self, chart_type: ChartType) -> Self {
        Self { chart_type, ..self.clone() }
    }

    pub fn with_timeframe(&self, timeframe: Timeframe) -> Self {
        Self { timeframe, ..self.clone() }
    }

    pub fn with_volume(&self, show_volume: bool) -> Self {
        Self { show_volume, ..self.clone() }
    }

    pub fn with_current_price(&self, show_current_price: bool) -> Self {
        Self { show_current_price, ..self.clone() }
    }

    pub fn with_grid_divisions(&self, grid_divisions: u32) -> Self {
        Self { grid_divisions, ..self.clone() }
    }

    pub fn effective_zoom(&self) -> f64 {
        clamp_zoom(self.zoom)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.zoom <= 0.0 {
            return Err(ChartError::invalid(format!("zoom must be positive, got {}", self.zoom)));
        }
        if self.grid_divisions == 0 {
            return Err(ChartError::invalid("grid needs at least one division"));
        }
        if !(self.volume_cap_px >= 0.0) || !self.volume_cap_px.is_finite() {
            return Err(ChartError::invalid("volume cap must be a non-negative length"));
        }
        Ok(())
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() { 1.0 } else { zoom.clamp(MIN_ZOOM, MAX_ZOOM) }
}

/// Value Object - Color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub const fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// `#rrggbb`, alpha is carried separately as opacity.
    pub fn to_css(&self) -> String {
        format!("#{:06x}", self.to_hex())
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self { a: alpha, ..*self }
    }

    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

/// Semantic role of a primitive; the renderer's theme maps it to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StyleTag {
    GridLine,
    GridLineVertical,
    PriceLabel,
    TimeLabel,
    CandleUp,
    CandleDown,
    WickUp,
    WickDown,
    PriceLine,
    AreaFill,
    Sma20,
    Sma50,
    BollingerBand,
    BollingerFill,
    CurrentPriceLine,
    CurrentPriceBadge,
    CurrentPriceText,
    VolumeUp,
    VolumeDown,
    PanelFrame,
    PanelLabel,
    OscillatorLine,
    SignalLine,
    ThresholdLine,
    HistogramUp,
    HistogramDown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn indicator_names_match_dashboard_labels() {
        assert_eq!(Indicator::from_str("Williams %R").unwrap(), Indicator::WilliamsR);
        assert_eq!(Indicator::MovingAverage.to_string(), "Moving Average");
        assert_eq!(serde_json::to_string(&Indicator::BollingerBands).unwrap(), "\"Bollinger Bands\"");
    }

    #[test]
    fn chart_type_accepts_short_heikin() {
        assert_eq!(ChartType::from_str("heikin").unwrap(), ChartType::HeikinAshi);
        assert_eq!(ChartType::from_str("heikin-ashi").unwrap(), ChartType::HeikinAshi);
    }

    #[test]
    fn color_css_round_trips_hex() {
        assert_eq!(Color::from_hex(0x10b981).to_css(), "#10b981");
        assert_eq!(Color::WHITE.to_css(), "#ffffff");
    }

    #[test]
    fn viewport_rejects_swallowing_margins() {
        let vp = ViewportSpec::new(100.0, 100.0, Margin::new(10.0, 60.0, 10.0, 40.0));
        assert!(vp.validate().is_err());
        let vp = ViewportSpec::new(100.0, 100.0, Margin::uniform(10.0));
        assert!(vp.validate().is_ok());
    }
}
