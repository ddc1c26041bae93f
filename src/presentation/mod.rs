//! JavaScript-facing surface of the crate.

pub mod wasm_api;

pub use wasm_api::{ChartApi, compute_chart_geometry_json, generate_series_json};
