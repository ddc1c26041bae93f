use stock_chart_wasm::domain::chart::Primitive;
use stock_chart_wasm::domain::market_data::Series;
use stock_chart_wasm::presentation::{compute_chart_geometry_json, generate_series_json};

const VIEWPORT: &str = r#"{"width":800,"height":400,"margin":{"top":20,"right":80,"bottom":60,"left":80}}"#;

#[test]
fn generated_json_round_trips_into_geometry() {
    let series_json = generate_series_json("AAPL", "1D", 50, None).unwrap();
    let series: Series = serde_json::from_str(&series_json).unwrap();
    assert_eq!(series.len(), 50);

    let geometry_json = compute_chart_geometry_json(&series_json, VIEWPORT, "{}").unwrap();
    let primitives: Vec<Primitive> = serde_json::from_str(&geometry_json).unwrap();
    assert!(!primitives.is_empty());
}

#[test]
fn explicit_seed_overrides_symbol() {
    let a = generate_series_json("AAPL", "1H", 20, Some("42")).unwrap();
    let b = generate_series_json("MSFT", "1H", 20, Some("42")).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, generate_series_json("AAPL", "1H", 20, None).unwrap());
}

#[test]
fn bad_input_is_reported() {
    assert!(generate_series_json("AAPL", "1D", 0, None).is_err());
    assert!(generate_series_json("AAPL", "7D", 10, None).is_err());

    let series_json = generate_series_json("AAPL", "1D", 10, None).unwrap();
    let err = compute_chart_geometry_json(&series_json, r#"{"width":0,"height":400}"#, "{}").unwrap_err();
    assert!(err.to_string().starts_with("Invalid argument"));
    assert!(compute_chart_geometry_json("not json", VIEWPORT, "{}").is_err());
    assert!(compute_chart_geometry_json(r#"{"candles":[],"stepMs":1}"#, VIEWPORT, "{}").is_err());
}

#[test]
fn config_json_selects_chart_type() {
    let series_json = generate_series_json("AAPL", "1D", 30, None).unwrap();
    let geometry_json =
        compute_chart_geometry_json(&series_json, VIEWPORT, r#"{"chartType":"line","showVolume":false}"#)
            .unwrap();
    assert!(geometry_json.contains(r#""style":"price-line""#));
    assert!(!geometry_json.contains("candle-up"));
}
