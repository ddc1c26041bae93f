use crate::application::ChartService;
use crate::domain::{
    chart::{ChartConfig, ChartType, Indicator, ViewportSpec, compute_chart_geometry},
    errors::{ChartError, ChartResult},
    logging::LogComponent,
    market_data::{Seed, Series, SeriesGenerator, Symbol, Timeframe},
};
use crate::infrastructure::rendering::{CanvasRenderer, SvgRenderer};
use crate::{log_error, log_info};
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

/// Dashboard refresh cadence
pub const DEFAULT_LIVE_INTERVAL_MS: u32 = 5_000;

fn to_js_error(err: ChartError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_timeframe(value: &str) -> ChartResult<Timeframe> {
    Timeframe::from_str(value).map_err(|_| ChartError::invalid(format!("unknown timeframe {value:?}")))
}

fn parse_json<'a, T: serde::Deserialize<'a>>(what: &str, json: &'a str) -> ChartResult<T> {
    serde_json::from_str(json).map_err(|e| ChartError::invalid(format!("bad {what}: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> ChartResult<String> {
    serde_json::to_string(value).map_err(|e| ChartError::invalid(format!("serialization failed: {e}")))
}

/// Numeric text is taken as the seed itself, anything else is hashed.
fn parse_seed(seed: &str) -> Seed {
    seed.trim().parse::<u64>().map(Seed::from).unwrap_or_else(|_| Seed::from_text(seed))
}

/// JSON series for a symbol/timeframe; `seed` overrides the symbol-derived one.
pub fn generate_series_json(
    symbol: &str,
    timeframe: &str,
    length: i64,
    seed: Option<&str>,
) -> ChartResult<String> {
    let timeframe = parse_timeframe(timeframe)?;
    let symbol = Symbol::new(symbol).map_err(ChartError::invalid)?;
    let seed = match seed {
        Some(seed) => parse_seed(seed),
        None => Seed::for_chart(&symbol, timeframe, 0),
    };
    let series = SeriesGenerator::default().generate(seed, length, timeframe.step_ms())?;
    to_json(&series)
}

/// JSON primitives for a JSON series, viewport and config.
pub fn compute_chart_geometry_json(
    series_json: &str,
    viewport_json: &str,
    config_json: &str,
) -> ChartResult<String> {
    let series: Series = parse_json("series", series_json)?;
    let viewport: ViewportSpec = parse_json("viewport", viewport_json)?;
    let config: ChartConfig = parse_json("config", config_json)?;
    to_json(&compute_chart_geometry(&series, &viewport, &config)?)
}

#[wasm_bindgen(js_name = generateSeries)]
pub fn generate_series_js(
    symbol: &str,
    timeframe: &str,
    length: i32,
    seed: Option<String>,
) -> Result<String, JsValue> {
    generate_series_json(symbol, timeframe, i64::from(length), seed.as_deref()).map_err(to_js_error)
}

#[wasm_bindgen(js_name = computeChartGeometry)]
pub fn compute_chart_geometry_js(
    series_json: &str,
    viewport_json: &str,
    config_json: &str,
) -> Result<String, JsValue> {
    compute_chart_geometry_json(series_json, viewport_json, config_json).map_err(to_js_error)
}

struct ChartState {
    service: ChartService,
    symbol: String,
    canvas_id: String,
    config: ChartConfig,
    size: (u32, u32),
    tick: u64,
}

impl ChartState {
    fn viewport(&self) -> ViewportSpec {
        ViewportSpec::with_default_margin(self.size.0 as f64, self.size.1 as f64)
    }

    fn paint(&mut self) -> Result<(), JsValue> {
        let viewport = self.viewport();
        let geometry = self.service.render(&self.symbol, &viewport, &self.config).map_err(to_js_error)?;
        CanvasRenderer::new(self.canvas_id.clone(), self.size.0, self.size.1).render(&geometry)
    }

    fn advance(&mut self) -> Result<(), JsValue> {
        self.tick += 1;
        self.service
            .refresh(&self.symbol, self.config.timeframe, self.tick)
            .map_err(to_js_error)?;
        self.paint()
    }
}

/// One chart widget bound to a canvas element.
#[wasm_bindgen]
pub struct ChartApi {
    state: Rc<RefCell<ChartState>>,
    live: Option<Interval>,
}

#[wasm_bindgen]
impl ChartApi {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: String, symbol: String) -> Self {
        log_info!(LogComponent::Presentation("ChartApi"), "chart for {} on #{}", symbol, canvas_id);
        Self {
            state: Rc::new(RefCell::new(ChartState {
                service: ChartService::default(),
                symbol,
                canvas_id,
                config: ChartConfig::default(),
                size: (800, 400),
                tick: 0,
            })),
            live: None,
        }
    }

    #[wasm_bindgen(js_name = setTimeframe)]
    pub fn set_timeframe(&mut self, timeframe: &str) -> Result<(), JsValue> {
        let timeframe = parse_timeframe(timeframe).map_err(to_js_error)?;
        let mut state = self.state.borrow_mut();
        state.config = state.config.with_timeframe(timeframe);
        state.tick = 0;
        Ok(())
    }

    #[wasm_bindgen(js_name = setChartType)]
    pub fn set_chart_type(&mut self, chart_type: &str) -> Result<(), JsValue> {
        let chart_type = ChartType::from_str(chart_type)
            .map_err(|_| JsValue::from_str(&format!("unknown chart type {chart_type:?}")))?;
        let mut state = self.state.borrow_mut();
        state.config = state.config.with_chart_type(chart_type);
        Ok(())
    }

    /// Returns whether the indicator is now enabled.
    #[wasm_bindgen(js_name = toggleIndicator)]
    pub fn toggle_indicator(&mut self, indicator: &str) -> Result<bool, JsValue> {
        let indicator = Indicator::from_str(indicator)
            .map_err(|_| JsValue::from_str(&format!("unknown indicator {indicator:?}")))?;
        let mut state = self.state.borrow_mut();
        state.config = state.config.with_indicator_toggled(indicator);
        Ok(state.config.has(indicator))
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&mut self) -> f64 {
        let mut state = self.state.borrow_mut();
        state.config = state.config.zoomed_in();
        state.config.zoom
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&mut self) -> f64 {
        let mut state = self.state.borrow_mut();
        state.config = state.config.zoomed_out();
        state.config.zoom
    }

    /// Current config as JSON.
    pub fn config(&self) -> Result<String, JsValue> {
        to_json(&self.state.borrow().config).map_err(to_js_error)
    }

    pub fn render(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        let mut state = self.state.borrow_mut();
        state.size = (width, height);
        state.paint()
    }

    #[wasm_bindgen(js_name = renderSvg)]
    pub fn render_svg(&mut self, width: u32, height: u32) -> Result<String, JsValue> {
        let mut state = self.state.borrow_mut();
        state.size = (width, height);
        let viewport = state.viewport();
        let config = state.config.clone();
        let symbol = state.symbol.clone();
        let geometry = state.service.render(&symbol, &viewport, &config).map_err(to_js_error)?;
        Ok(SvgRenderer::default().render(&geometry, &viewport))
    }

    #[wasm_bindgen(js_name = renderIndicatorPanelSvg)]
    pub fn render_indicator_panel_svg(
        &mut self,
        indicator: &str,
        width: u32,
        height: u32,
    ) -> Result<String, JsValue> {
        let indicator = Indicator::from_str(indicator)
            .map_err(|_| JsValue::from_str(&format!("unknown indicator {indicator:?}")))?;
        let mut state = self.state.borrow_mut();
        let viewport = ViewportSpec::with_default_margin(width as f64, height as f64);
        let config = state.config.clone();
        let symbol = state.symbol.clone();
        let geometry = state
            .service
            .render_panel(&symbol, &viewport, &config, indicator)
            .map_err(to_js_error)?;
        Ok(SvgRenderer::default().render(&geometry, &viewport))
    }

    /// Hover readout as JSON: the candle nearest to canvas `x` with its
    /// indicator values, against the last rendered size.
    #[wasm_bindgen(js_name = candleAt)]
    pub fn candle_at(&mut self, x: f64) -> Result<String, JsValue> {
        let mut state = self.state.borrow_mut();
        let viewport = state.viewport();
        let config = state.config.clone();
        let symbol = state.symbol.clone();
        let readout = state.service.candle_at(&symbol, &viewport, &config, x).map_err(to_js_error)?;
        to_json(&readout).map_err(to_js_error)
    }

    /// Header figures as JSON.
    pub fn summary(&mut self) -> Result<String, JsValue> {
        let mut state = self.state.borrow_mut();
        let (symbol, timeframe) = (state.symbol.clone(), state.config.timeframe);
        let summary = state.service.summary(&symbol, timeframe).map_err(to_js_error)?;
        to_json(&summary).map_err(to_js_error)
    }

    /// Regenerates and repaints the chart every `interval_ms` (5 s by default).
    #[wasm_bindgen(js_name = startLiveUpdates)]
    pub fn start_live_updates(&mut self, interval_ms: Option<u32>) {
        let interval_ms = interval_ms.unwrap_or(DEFAULT_LIVE_INTERVAL_MS).max(1);
        let state = Rc::clone(&self.state);
        self.live = Some(Interval::new(interval_ms, move || {
            let Ok(mut state) = state.try_borrow_mut() else {
                return;
            };
            if let Err(err) = state.advance() {
                log_error!(LogComponent::Presentation("ChartApi"), "live update failed: {:?}", err);
            }
        }));
        log_info!(LogComponent::Presentation("ChartApi"), "live updates every {}ms", interval_ms);
    }

    #[wasm_bindgen(js_name = stopLiveUpdates)]
    pub fn stop_live_updates(&mut self) {
        // dropping the handle clears the browser interval
        self.live = None;
    }

    #[wasm_bindgen(js_name = isLive)]
    pub fn is_live(&self) -> bool {
        self.live.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_seed_text_is_used_verbatim() {
        assert_eq!(parse_seed("42"), Seed::from(42u64));
        assert_eq!(parse_seed("AAPL"), Seed::from_text("AAPL"));
    }

    #[test]
    fn unknown_timeframe_is_invalid() {
        assert!(generate_series_json("AAPL", "2D", 10, None).is_err());
    }
}
