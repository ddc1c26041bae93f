//! Chart geometry: scales plus the primitive emitters for the price pane
//! and the oscillator panels.

use super::constants::*;
use super::entities::{CandleReadout, GeometryOutput, PathBuilder, Primitive, TextAnchor};
use super::value_objects::{ChartConfig, ChartType, Indicator, StyleTag, ViewportSpec, clamp_zoom};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::indicator_engine::compute_snapshots;
use crate::domain::market_data::{Candle, IndicatorSnapshot, Series};
use crate::time_utils::{format_time_label, format_timestamp};
use crate::{log_trace, log_warn};
use std::ops::Range;

/// Pixel mapping for one series in one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    viewport: ViewportSpec,
    padded_min: f64,
    padded_max: f64,
    visible_start: usize,
    visible_count: usize,
}

/// Candles visible at `zoom`, after clamping it to the supported range.
pub fn visible_count(len: usize, zoom: f64) -> usize {
    let window = (BASE_CANDLES / clamp_zoom(zoom)).floor() as usize;
    len.min(window.max(1))
}

impl ChartScales {
    pub fn compute(series: &Series, viewport: &ViewportSpec, zoom: f64) -> ChartResult<Self> {
        viewport.validate()?;
        if series.is_empty() {
            return Err(ChartError::invalid("series is empty"));
        }
        // NaN falls through to `clamp_zoom`
        if zoom <= 0.0 {
            return Err(ChartError::invalid(format!("zoom must be positive, got {zoom}")));
        }

        let (min, max) = series.price_range();
        let range = max - min;
        let padding = if range > 0.0 {
            range * PRICE_PADDING_RATIO
        } else if min != 0.0 {
            min.abs() * FLAT_PADDING_RATIO
        } else {
            1.0
        };

        let visible_count = visible_count(series.len(), zoom);
        Ok(Self {
            viewport: *viewport,
            padded_min: min - padding,
            padded_max: max + padding,
            visible_start: series.len() - visible_count,
            visible_count,
        })
    }

    pub fn viewport(&self) -> &ViewportSpec {
        &self.viewport
    }

    pub fn padded_min(&self) -> f64 {
        self.padded_min
    }

    pub fn padded_max(&self) -> f64 {
        self.padded_max
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn visible_start(&self) -> usize {
        self.visible_start
    }

    /// Indices of the visible window within the full series.
    pub fn visible_range(&self) -> Range<usize> {
        self.visible_start..self.visible_start + self.visible_count
    }

    /// X of the `i`-th visible candle.
    pub fn index_to_x(&self, i: usize) -> f64 {
        let left = self.viewport.margin.left;
        if self.visible_count <= 1 {
            return left;
        }
        left + i as f64 / (self.visible_count - 1) as f64 * self.viewport.chart_width()
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        self.viewport.margin.top
            + (self.padded_max - price) / (self.padded_max - self.padded_min)
                * self.viewport.chart_height()
    }

    pub fn y_to_price(&self, y: f64) -> f64 {
        self.padded_max
            - (y - self.viewport.margin.top) / self.viewport.chart_height()
                * (self.padded_max - self.padded_min)
    }

    /// Nearest visible candle to `x`, for crosshair lookups.
    pub fn x_to_index(&self, x: f64) -> usize {
        if self.visible_count <= 1 {
            return 0;
        }
        let t = (x - self.viewport.margin.left) / self.viewport.chart_width();
        let i = (t * (self.visible_count - 1) as f64).round();
        i.clamp(0.0, (self.visible_count - 1) as f64) as usize
    }

    pub fn candle_width(&self) -> f64 {
        (self.viewport.chart_width() / self.visible_count as f64 * CANDLE_WIDTH_RATIO)
            .max(MIN_CANDLE_WIDTH)
    }

    pub fn floor_y(&self) -> f64 {
        self.viewport.bottom()
    }
}

pub fn compute_scales(series: &Series, viewport: &ViewportSpec, zoom: f64) -> ChartResult<ChartScales> {
    ChartScales::compute(series, viewport, zoom)
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Indicator values per candle: the attached snapshots, or computed on the
/// spot for a plain series.
fn indicator_values(series: &Series) -> Vec<IndicatorSnapshot> {
    if series.is_annotated() {
        series.candles().iter().map(|c| c.indicators.unwrap_or_default()).collect()
    } else {
        compute_snapshots(series.candles())
    }
}

fn log_rejection(err: &ChartError) {
    log_warn!(LogComponent::Domain("ChartGeometry"), "{}", err);
}

/// Maps a series to draw primitives for the main price pane.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartGeometryMapper;

impl ChartGeometryMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(
        &self,
        series: &Series,
        viewport: &ViewportSpec,
        config: &ChartConfig,
    ) -> ChartResult<GeometryOutput> {
        let scales = config
            .validate()
            .and_then(|_| ChartScales::compute(series, viewport, config.zoom))
            .inspect_err(log_rejection)?;

        let visible = &series.candles()[scales.visible_range()];
        let mut out = GeometryOutput::new();

        self.emit_grid_and_labels(&mut out, &scales, visible, config);
        if config.show_volume {
            self.emit_volume_bars(&mut out, &scales, visible, config.volume_cap_px);
        }

        if config.indicators.iter().any(Indicator::is_overlay) {
            let values = indicator_values(series);
            let visible_values = &values[scales.visible_range()];
            self.emit_overlays(&mut out, &scales, visible_values, config);
        }

        match config.chart_type {
            ChartType::Candlestick => self.emit_candlesticks(&mut out, &scales, visible),
            ChartType::HeikinAshi => {
                let smoothed = series.heikin_ashi();
                self.emit_candlesticks(&mut out, &scales, &smoothed.candles()[scales.visible_range()]);
            }
            ChartType::Line => {
                let closes: Vec<Option<f64>> = visible.iter().map(|c| Some(c.close())).collect();
                out.extend(self.emit_line(&scales, &closes, StyleTag::PriceLine));
            }
            ChartType::Area => {
                self.emit_area(&mut out, &scales, visible);
                let closes: Vec<Option<f64>> = visible.iter().map(|c| Some(c.close())).collect();
                out.extend(self.emit_line(&scales, &closes, StyleTag::PriceLine));
            }
        }

        if config.show_current_price
            && let Some(last) = visible.last()
        {
            self.emit_current_price(&mut out, &scales, last.close());
        }

        log_trace!(
            LogComponent::Domain("ChartGeometry"),
            "{} primitives for {} visible candles",
            out.len(),
            scales.visible_count()
        );
        Ok(out)
    }

    /// `divisions + 1` horizontal lines with price labels, plus vertical
    /// lines and time labels every `ceil(n / 8)` candles.
    pub fn emit_grid_and_labels(
        &self,
        out: &mut GeometryOutput,
        scales: &ChartScales,
        visible: &[Candle],
        config: &ChartConfig,
    ) {
        let vp = scales.viewport();
        let (left, right, top) = (vp.margin.left, vp.right(), vp.margin.top);
        let divisions = config.grid_divisions.max(1);
        let range = scales.padded_max() - scales.padded_min();

        for i in 0..=divisions {
            let t = i as f64 / divisions as f64;
            let y = top + t * vp.chart_height();
            out.push(Primitive::line((left, y), (right, y), StyleTag::GridLine));
            out.push(Primitive::text(
                (left - PRICE_LABEL_OFFSET_X, y + PRICE_LABEL_OFFSET_Y),
                format_price(scales.padded_max() - t * range),
                TextAnchor::End,
                StyleTag::PriceLabel,
            ));
        }

        let n = visible.len();
        if n == 0 {
            return;
        }
        let cadence = n.div_ceil(MAX_TIME_LABELS);
        for i in (0..n).step_by(cadence) {
            let x = scales.index_to_x(i);
            out.push(Primitive::line((x, top), (x, vp.bottom()), StyleTag::GridLineVertical));
            out.push(Primitive::text(
                (x, vp.height - TIME_LABEL_OFFSET_Y),
                format_time_label(visible[i].timestamp.value(), config.timeframe),
                TextAnchor::Middle,
                StyleTag::TimeLabel,
            ));
        }
    }

    /// Bars standing on the chart floor; the tallest bar is `cap_px` high.
    pub fn emit_volume_bars(
        &self,
        out: &mut GeometryOutput,
        scales: &ChartScales,
        visible: &[Candle],
        cap_px: f64,
    ) {
        let max_volume = visible.iter().map(Candle::volume).max().unwrap_or(0);
        if max_volume == 0 {
            return;
        }
        let width = scales.candle_width();
        let floor = scales.floor_y();
        out.extend(map_ordered(visible, |i, candle| {
            let height = candle.volume() as f64 / max_volume as f64 * cap_px;
            let style = if candle.is_bullish() { StyleTag::VolumeUp } else { StyleTag::VolumeDown };
            [Primitive::rect(scales.index_to_x(i) - width / 2.0, floor - height, width, height, style)]
        }));
    }

    fn emit_overlays(
        &self,
        out: &mut GeometryOutput,
        scales: &ChartScales,
        values: &[IndicatorSnapshot],
        config: &ChartConfig,
    ) {
        if config.has(Indicator::BollingerBands) {
            let upper: Vec<Option<f64>> = values.iter().map(|v| v.bollinger_upper).collect();
            let lower: Vec<Option<f64>> = values.iter().map(|v| v.bollinger_lower).collect();
            out.extend(self.emit_band_fill(scales, &upper, &lower, StyleTag::BollingerFill));
            out.extend(self.emit_line(scales, &upper, StyleTag::BollingerBand));
            out.extend(self.emit_line(scales, &lower, StyleTag::BollingerBand));
        }
        if config.has(Indicator::MovingAverage) || config.has(Indicator::Sma20) {
            let sma20: Vec<Option<f64>> = values.iter().map(|v| v.sma20).collect();
            out.extend(self.emit_line(scales, &sma20, StyleTag::Sma20));
        }
        if config.has(Indicator::Sma50) {
            let sma50: Vec<Option<f64>> = values.iter().map(|v| v.sma50).collect();
            out.extend(self.emit_line(scales, &sma50, StyleTag::Sma50));
        }
    }

    /// Wick line plus body rect for each candle.
    pub fn emit_candlesticks(&self, out: &mut GeometryOutput, scales: &ChartScales, visible: &[Candle]) {
        let width = scales.candle_width();
        out.extend(map_ordered(visible, |i, candle| {
            let x = scales.index_to_x(i);
            let y_open = scales.price_to_y(candle.open());
            let y_close = scales.price_to_y(candle.close());
            let (wick, body) = if candle.is_bullish() {
                (StyleTag::WickUp, StyleTag::CandleUp)
            } else {
                (StyleTag::WickDown, StyleTag::CandleDown)
            };
            let body_height = (y_close - y_open).abs().max(MIN_BODY_HEIGHT);
            [
                Primitive::line(
                    (x, scales.price_to_y(candle.high())),
                    (x, scales.price_to_y(candle.low())),
                    wick,
                ),
                Primitive::rect(x - width / 2.0, y_open.min(y_close), width, body_height, body),
            ]
        }));
    }

    /// Polyline through the defined values; gaps start a new sub-path.
    pub fn emit_line(&self, scales: &ChartScales, values: &[Option<f64>], style: StyleTag) -> Option<Primitive> {
        polyline(values, |i| scales.index_to_x(i), |v| scales.price_to_y(v), style)
    }

    /// Close polyline closed down to the chart floor.
    pub fn emit_area(&self, out: &mut GeometryOutput, scales: &ChartScales, visible: &[Candle]) {
        let Some(last) = visible.len().checked_sub(1) else {
            return;
        };
        let floor = scales.floor_y();
        let mut path = PathBuilder::new();
        for (i, candle) in visible.iter().enumerate() {
            let (x, y) = (scales.index_to_x(i), scales.price_to_y(candle.close()));
            path = if i == 0 { path.move_to(x, y) } else { path.line_to(x, y) };
        }
        let path = path
            .line_to(scales.index_to_x(last), floor)
            .line_to(scales.index_to_x(0), floor)
            .close();
        out.push(path.build(StyleTag::AreaFill));
    }

    fn emit_band_fill(
        &self,
        scales: &ChartScales,
        upper: &[Option<f64>],
        lower: &[Option<f64>],
        style: StyleTag,
    ) -> Option<Primitive> {
        let mut path = PathBuilder::new();
        for run in defined_runs(upper, lower) {
            for (k, i) in run.clone().enumerate() {
                let (x, y) = (scales.index_to_x(i), scales.price_to_y(upper[i].unwrap_or_default()));
                path = if k == 0 { path.move_to(x, y) } else { path.line_to(x, y) };
            }
            for i in run.rev() {
                path = path.line_to(scales.index_to_x(i), scales.price_to_y(lower[i].unwrap_or_default()));
            }
            path = path.close();
        }
        (!path.is_empty()).then(|| path.build(style))
    }

    pub fn emit_current_price(&self, out: &mut GeometryOutput, scales: &ChartScales, price: f64) {
        let vp = scales.viewport();
        let y = scales.price_to_y(price);
        let right = vp.right();
        out.push(Primitive::line((vp.margin.left, y), (right, y), StyleTag::CurrentPriceLine));
        out.push(Primitive::rect(
            right + BADGE_GAP,
            y - BADGE_HEIGHT / 2.0,
            BADGE_WIDTH,
            BADGE_HEIGHT,
            StyleTag::CurrentPriceBadge,
        ));
        out.push(Primitive::text(
            (right + BADGE_GAP + BADGE_WIDTH / 2.0, y + PRICE_LABEL_OFFSET_Y),
            format_price(price),
            TextAnchor::Middle,
            StyleTag::CurrentPriceText,
        ));
    }
}

/// Maximal index runs where both inputs are defined.
fn defined_runs(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for i in 0..a.len().min(b.len()) {
        match (a[i].is_some() && b[i].is_some(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..a.len().min(b.len()));
    }
    runs
}

fn polyline(
    values: &[Option<f64>],
    to_x: impl Fn(usize) -> f64,
    to_y: impl Fn(f64) -> f64,
    style: StyleTag,
) -> Option<Primitive> {
    let mut path = PathBuilder::new();
    let mut pen_down = false;
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) => {
                let (x, y) = (to_x(i), to_y(*v));
                path = if pen_down { path.line_to(x, y) } else { path.move_to(x, y) };
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    (!path.is_empty()).then(|| path.build(style))
}

/// Per-candle primitives in candle order, in parallel with `parallel`.
fn map_ordered<const N: usize, F>(candles: &[Candle], f: F) -> Vec<Primitive>
where
    F: Fn(usize, &Candle) -> [Primitive; N] + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        candles.par_iter().enumerate().flat_map_iter(|(i, c)| f(i, c)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        candles.iter().enumerate().flat_map(|(i, c)| f(i, c)).collect()
    }
}

pub fn compute_chart_geometry(
    series: &Series,
    viewport: &ViewportSpec,
    config: &ChartConfig,
) -> ChartResult<GeometryOutput> {
    ChartGeometryMapper::new().compute(series, viewport, config)
}

/// Hover lookup: the visible candle nearest to pixel `x`.
pub fn candle_at(
    series: &Series,
    viewport: &ViewportSpec,
    config: &ChartConfig,
    x: f64,
) -> ChartResult<CandleReadout> {
    if !x.is_finite() {
        return Err(ChartError::invalid(format!("crosshair x must be finite, got {x}")));
    }
    let scales = config
        .validate()
        .and_then(|_| ChartScales::compute(series, viewport, config.zoom))
        .inspect_err(log_rejection)?;

    let offset = scales.x_to_index(x);
    let index = scales.visible_start() + offset;
    let mut candle = series.candles()[index].clone();
    if candle.indicators.is_none() {
        let window = &series.candles()[..=index];
        candle.indicators = compute_snapshots(window).pop();
    }
    Ok(CandleReadout {
        index,
        x: scales.index_to_x(offset),
        label: format_timestamp(candle.timestamp.value()),
        candle,
    })
}

/// Value range a panel maps onto its height.
fn panel_domain(indicator: Indicator, lines: &[&[Option<f64>]], thresholds: &[f64]) -> (f64, f64) {
    match indicator {
        Indicator::Rsi | Indicator::Stochastic => (0.0, 100.0),
        Indicator::WilliamsR => (-100.0, 0.0),
        _ => {
            let (lo, hi) = lines
                .iter()
                .flat_map(|line| line.iter().flatten())
                .chain(thresholds)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
            if !lo.is_finite() {
                return (-1.0, 1.0);
            }
            let range = hi - lo;
            let pad = if range > 0.0 { range * PRICE_PADDING_RATIO } else { 1.0 };
            (lo - pad, hi + pad)
        }
    }
}

fn panel_thresholds(indicator: Indicator) -> &'static [f64] {
    match indicator {
        Indicator::Rsi => &[30.0, 70.0],
        Indicator::Stochastic => &[20.0, 80.0],
        Indicator::WilliamsR => &[-80.0, -20.0],
        Indicator::Cci => &[-100.0, 100.0],
        Indicator::Macd | Indicator::Momentum => &[0.0],
        _ => &[],
    }
}

/// Oscillator panel below the price pane, sharing its x-mapping.
pub fn compute_indicator_panel(
    series: &Series,
    viewport: &ViewportSpec,
    config: &ChartConfig,
    indicator: Indicator,
) -> ChartResult<GeometryOutput> {
    let Some(title) = indicator.panel_title() else {
        let err = ChartError::invalid(format!("{indicator} is drawn on the price pane, not in a panel"));
        log_rejection(&err);
        return Err(err);
    };
    let scales = config
        .validate()
        .and_then(|_| ChartScales::compute(series, viewport, config.zoom))
        .inspect_err(log_rejection)?;

    let values = indicator_values(series);
    let visible = &values[scales.visible_range()];
    let pick = |f: fn(&IndicatorSnapshot) -> Option<f64>| -> Vec<Option<f64>> { visible.iter().map(f).collect() };

    let (main, signal, histogram) = match indicator {
        Indicator::Rsi => (pick(|v| v.rsi), None, None),
        Indicator::Macd => (
            pick(|v| v.macd),
            Some(pick(|v| v.macd_signal)),
            Some(pick(|v| v.macd_histogram)),
        ),
        Indicator::Stochastic => (pick(|v| v.stochastic_k), Some(pick(|v| v.stochastic_d)), None),
        Indicator::WilliamsR => (pick(|v| v.williams_r), None, None),
        Indicator::Cci => (pick(|v| v.cci), None, None),
        _ => (pick(|v| v.momentum), None, None),
    };

    let thresholds = panel_thresholds(indicator);
    let mut lines: Vec<&[Option<f64>]> = vec![main.as_slice()];
    lines.extend(signal.as_deref());
    lines.extend(histogram.as_deref());
    let (lo, hi) = panel_domain(indicator, &lines, thresholds);

    let vp = scales.viewport();
    let (left, right, top) = (vp.margin.left, vp.right(), vp.margin.top);
    let value_to_y = |v: f64| top + (hi - v) / (hi - lo) * vp.chart_height();

    let mut out = GeometryOutput::new();
    out.push(Primitive::rect(left, top, vp.chart_width(), vp.chart_height(), StyleTag::PanelFrame));
    out.push(Primitive::text(
        (left + PRICE_LABEL_OFFSET_Y, top + PANEL_TITLE_OFFSET),
        title,
        TextAnchor::Start,
        StyleTag::PanelLabel,
    ));
    for &level in thresholds {
        let y = value_to_y(level);
        out.push(Primitive::line((left, y), (right, y), StyleTag::ThresholdLine));
    }

    if let Some(histogram) = &histogram {
        let width = scales.candle_width();
        let zero = value_to_y(0.0);
        for (i, value) in histogram.iter().enumerate() {
            if let Some(v) = value {
                let y = value_to_y(*v);
                let style = if *v >= 0.0 { StyleTag::HistogramUp } else { StyleTag::HistogramDown };
                out.push(Primitive::rect(
                    scales.index_to_x(i) - width / 2.0,
                    y.min(zero),
                    width,
                    (y - zero).abs(),
                    style,
                ));
            }
        }
    }

    let to_x = |i: usize| scales.index_to_x(i);
    out.extend(polyline(&main, to_x, value_to_y, StyleTag::OscillatorLine));
    if let Some(signal) = &signal {
        out.extend(polyline(signal, to_x, value_to_y, StyleTag::SignalLine));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::entities::PathCommand;

    #[test]
    fn runs_split_on_gaps() {
        let a = [None, Some(1.0), Some(2.0), None, Some(3.0)];
        let b = [None, Some(0.5), Some(1.5), Some(1.0), Some(2.0)];
        assert_eq!(defined_runs(&a, &b), vec![1..3, 4..5]);
    }

    #[test]
    fn polyline_breaks_on_none() {
        let p = polyline(&[Some(1.0), None, Some(2.0), Some(3.0)], |i| i as f64, |v| v, StyleTag::Sma20);
        let Some(Primitive::Path { commands, .. }) = p else { panic!("expected a path") };
        let moves = commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo { .. }))
            .count();
        assert_eq!(moves, 2);
        assert_eq!(commands.len(), 3);
    }

    #[test]
    fn visible_count_clamps_zoom() {
        assert_eq!(visible_count(500, 10.0), visible_count(500, 3.0));
        assert_eq!(visible_count(500, 0.01), 200);
        assert_eq!(visible_count(20, 1.0), 20);
    }
}
