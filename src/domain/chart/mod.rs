//! Chart aggregate: configuration value objects, draw primitives, the
//! theme and the geometry mapper.

pub mod constants;
pub mod entities;
pub mod services;
pub mod theme;
pub mod value_objects;

pub use entities::*;
pub use services::{
    ChartGeometryMapper, ChartScales, candle_at, compute_chart_geometry,
    compute_indicator_panel, compute_scales,
};
pub use theme::{ChartTheme, Style};
pub use value_objects::*;
