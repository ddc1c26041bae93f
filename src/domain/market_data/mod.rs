//! Market data aggregate: value objects, the candle series entity, the
//! indicator engine and the synthetic series generator.

pub mod entities;
pub mod indicator_engine;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::{GeneratorConfig, IndicatorMode, SeriesGenerator, generate_series};
pub use value_objects::*;
