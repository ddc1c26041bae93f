use super::value_objects::{Color, StyleTag};
use serde::{Deserialize, Serialize};

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(format!("expected #rrggbb colour, got {value:?}"));
        }
        u32::from_str_radix(hex, 16)
            .map(Color::from_hex)
            .map_err(|e| format!("bad colour {value:?}: {e}"))
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::try_from(text).map_err(serde::de::Error::custom)
    }
}

/// Paint attributes resolved for one primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub dash: Option<[f64; 2]>,
    pub font_size: f64,
    /// Fill fades from `opacity` at the top to transparent at the bottom.
    pub fade: bool,
}

impl Style {
    fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
            stroke_width: width,
            opacity: 1.0,
            dash: None,
            font_size: 0.0,
            fade: false,
        }
    }

    fn fill(color: Color, opacity: f64) -> Self {
        Self { stroke: None, fill: Some(color), stroke_width: 0.0, ..Self::stroke(color, 0.0) }
            .with_opacity(opacity)
    }

    fn text(color: Color, font_size: f64) -> Self {
        Self { font_size, ..Self::fill(color, 1.0) }
    }

    fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }
}

/// Palette used by the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartTheme {
    pub background: Color,
    pub up: Color,
    pub down: Color,
    pub down_body_fill: Color,
    pub grid: Color,
    pub grid_vertical: Color,
    pub label: Color,
    pub price_line: Color,
    pub sma20: Color,
    pub sma50: Color,
    pub bollinger: Color,
    pub current_price: Color,
    pub badge_text: Color,
    pub signal: Color,
    pub threshold: Color,
    pub font_size: f64,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            up: Color::from_hex(0x10b981),
            down: Color::from_hex(0xef4444),
            down_body_fill: Color::WHITE,
            grid: Color::from_hex(0xf0f0f0),
            grid_vertical: Color::from_hex(0xf8f8f8),
            label: Color::from_hex(0x4b5563),
            price_line: Color::from_hex(0x3b82f6),
            sma20: Color::from_hex(0x3b82f6),
            sma50: Color::from_hex(0xef4444),
            bollinger: Color::from_hex(0x8b5cf6),
            current_price: Color::from_hex(0x3b82f6),
            badge_text: Color::WHITE,
            signal: Color::from_hex(0xf59e0b),
            threshold: Color::from_hex(0x9ca3af),
            font_size: 12.0,
        }
    }
}

impl ChartTheme {
    pub fn style(&self, tag: StyleTag) -> Style {
        use StyleTag::*;
        match tag {
            GridLine | PanelFrame => Style::stroke(self.grid, 1.0),
            GridLineVertical => Style::stroke(self.grid_vertical, 1.0),
            PriceLabel | TimeLabel | PanelLabel => Style::text(self.label, self.font_size),
            CandleUp => Style::stroke(self.up, 1.0).with_fill(self.up),
            CandleDown => Style::stroke(self.down, 1.0).with_fill(self.down_body_fill),
            WickUp => Style::stroke(self.up, 1.0),
            WickDown => Style::stroke(self.down, 1.0),
            PriceLine => Style::stroke(self.price_line, 2.0),
            AreaFill => Style { fade: true, ..Style::fill(self.price_line, 0.3) },
            Sma20 => Style::stroke(self.sma20, 2.0).with_opacity(0.8),
            Sma50 => Style::stroke(self.sma50, 1.5).with_opacity(0.8),
            BollingerBand => Style::stroke(self.bollinger, 1.0).with_opacity(0.7),
            BollingerFill => Style::fill(self.bollinger, 0.1),
            CurrentPriceLine => Style { dash: Some([5.0, 5.0]), ..Style::stroke(self.current_price, 2.0) },
            CurrentPriceBadge => Style::fill(self.current_price, 1.0),
            CurrentPriceText => Style::text(self.badge_text, self.font_size),
            VolumeUp => Style::fill(self.up, 0.3),
            VolumeDown => Style::fill(self.down, 0.3),
            OscillatorLine => Style::stroke(self.price_line, 1.5),
            SignalLine => Style::stroke(self.signal, 1.5),
            ThresholdLine => Style { dash: Some([3.0, 3.0]), ..Style::stroke(self.threshold, 1.0) },
            HistogramUp => Style::fill(self.up, 0.6),
            HistogramDown => Style::fill(self.down, 0.6),
        }
    }
}
