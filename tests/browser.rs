#![cfg(target_arch = "wasm32")]

use stock_chart_wasm::domain::chart::{ChartConfig, ViewportSpec, compute_chart_geometry};
use stock_chart_wasm::domain::market_data::{Timeframe, generate_series};
use stock_chart_wasm::infrastructure::rendering::CanvasRenderer;
use stock_chart_wasm::presentation::ChartApi;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas(id: &str) -> web_sys::HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .unwrap();
    canvas.set_id(id);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn canvas_renderer_paints_geometry() {
    let canvas = mount_canvas("chart-a");
    let series = generate_series("AAPL", Timeframe::OneDay, 50).unwrap();
    let vp = ViewportSpec::with_default_margin(800.0, 400.0);
    let geometry = compute_chart_geometry(&series, &vp, &ChartConfig::default()).unwrap();

    CanvasRenderer::new("chart-a".to_string(), 800, 400).render(&geometry).unwrap();
    assert_eq!(canvas.width(), 800);
    assert_eq!(canvas.height(), 400);
}

#[wasm_bindgen_test]
fn missing_canvas_is_an_error() {
    let series = generate_series("AAPL", Timeframe::OneDay, 10).unwrap();
    let vp = ViewportSpec::with_default_margin(800.0, 400.0);
    let geometry = compute_chart_geometry(&series, &vp, &ChartConfig::default()).unwrap();
    assert!(CanvasRenderer::new("nowhere".to_string(), 800, 400).render(&geometry).is_err());
}

#[wasm_bindgen_test]
fn chart_api_drives_the_widget() {
    mount_canvas("chart-b");
    let mut api = ChartApi::new("chart-b".to_string(), "TSLA".to_string());
    api.set_timeframe("1H").unwrap();
    assert!(api.toggle_indicator("Bollinger Bands").unwrap());
    assert_eq!(api.zoom_in(), 1.25);
    api.render(640, 320).unwrap();
    assert!(api.render_svg(640, 320).unwrap().starts_with("<svg"));
    assert!(api.summary().unwrap().contains("lastClose"));
    let readout = api.candle_at(600.0).unwrap();
    assert!(readout.contains("\"label\"") && readout.contains("\"candle\""));
    assert!(api.candle_at(f64::NAN).is_err());

    api.start_live_updates(Some(1_000));
    assert!(api.is_live());
    api.stop_live_updates();
    assert!(!api.is_live());
}
