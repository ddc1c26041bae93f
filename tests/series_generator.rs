use stock_chart_wasm::domain::market_data::{
    GeneratorConfig, IndicatorMode, Seed, SeriesGenerator, Timeframe, generate_series,
};

const DAY: u64 = 86_400_000;

#[test]
fn candles_keep_ohlc_invariant() {
    let series = SeriesGenerator::default().generate(Seed::from(7u64), 500, DAY).unwrap();
    for candle in series.candles() {
        assert!(candle.low() <= candle.open().min(candle.close()));
        assert!(candle.high() >= candle.open().max(candle.close()));
        assert!(candle.low() > 0.0);
        assert!(candle.volume() > 0);
    }
}

#[test]
fn times_advance_by_exact_step() {
    let step = Timeframe::FifteenMinutes.step_ms();
    let series = SeriesGenerator::default().generate("MSFT", 120, step).unwrap();
    for pair in series.candles().windows(2) {
        assert_eq!(pair[1].timestamp.value() - pair[0].timestamp.value(), step);
    }
}

#[test]
fn length_is_honoured() {
    for length in [1, 2, 50, 365] {
        let series = generate_series("AAPL", Timeframe::OneDay, length).unwrap();
        assert_eq!(series.len() as i64, length);
    }
}

#[test]
fn non_positive_length_is_rejected() {
    assert!(generate_series("AAPL", Timeframe::OneDay, 0).is_err());
    assert!(generate_series("AAPL", Timeframe::OneDay, -5).is_err());
}

#[test]
fn zero_step_is_rejected() {
    assert!(SeriesGenerator::default().generate(1u64, 10, 0).is_err());
}

#[test]
fn same_seed_gives_same_series() {
    let a = generate_series("AAPL", Timeframe::OneHour, 80).unwrap();
    let b = generate_series("aapl", Timeframe::OneHour, 80).unwrap();
    assert_eq!(a, b);

    let other = generate_series("AAPL", Timeframe::FourHours, 80).unwrap();
    assert_ne!(a.closes(), other.closes());
}

#[test]
fn first_price_is_within_base_range() {
    let series = SeriesGenerator::default().generate(99u64, 1, DAY).unwrap();
    let open = series.first().open();
    assert!((100.0..250.0).contains(&open), "open {open}");
}

#[test]
fn fake_mode_rsi_stays_in_dashboard_band() {
    let config = GeneratorConfig::default().with_indicator_mode(IndicatorMode::Fake);
    let series = SeriesGenerator::new(config).generate("TSLA", 200, DAY).unwrap();
    for candle in series.candles() {
        let snapshot = candle.indicators.unwrap();
        let rsi = snapshot.rsi.unwrap();
        assert!((30.0..70.0).contains(&rsi), "rsi {rsi}");
        assert!(snapshot.sma20.is_some() && snapshot.bollinger_upper.is_some());
    }
}

#[test]
fn fake_mode_draws_indicators_after_prices() {
    let fake = SeriesGenerator::new(GeneratorConfig::default().with_indicator_mode(IndicatorMode::Fake))
        .generate("NVDA", 60, DAY)
        .unwrap();
    let plain = SeriesGenerator::new(GeneratorConfig::default().with_indicator_mode(IndicatorMode::None))
        .generate("NVDA", 60, DAY)
        .unwrap();
    assert_eq!(fake.closes(), plain.closes());
    assert!(!plain.is_annotated());
}

#[test]
fn computed_mode_leaves_warm_up_empty() {
    let series = generate_series("AMZN", Timeframe::OneDay, 60).unwrap();
    let first = series.first().indicators.unwrap();
    assert_eq!(first.rsi, None);
    assert_eq!(first.sma20, None);
    let last = series.last().indicators.unwrap();
    assert!(last.rsi.is_some() && last.sma50.is_some() && last.macd_signal.is_some());
}

#[test]
fn invalid_config_is_rejected() {
    let config = GeneratorConfig { trend_amplitude: 0.95, ..GeneratorConfig::default() };
    assert!(SeriesGenerator::new(config).generate(1u64, 10, DAY).is_err());
}

#[test]
fn config_deserializes_with_defaults() {
    let config: GeneratorConfig =
        serde_json::from_str(r#"{"indicatorMode":"fake","anchorMs":0}"#).unwrap();
    assert_eq!(config.indicator_mode, IndicatorMode::Fake);
    assert_eq!(config.anchor_ms, 0);
    assert_eq!(config.volume_min, 500_000);
}
