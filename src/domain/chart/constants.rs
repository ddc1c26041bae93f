//! Layout constants of the dashboard charts.

/// Candles visible at zoom 1.0
pub const BASE_CANDLES: f64 = 100.0;
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.25;

/// Fraction of the price range added above and below the data
pub const PRICE_PADDING_RATIO: f64 = 0.1;
/// Padding of a flat series, relative to its price
pub const FLAT_PADDING_RATIO: f64 = 0.01;

/// Body width as a share of the per-candle slot
pub const CANDLE_WIDTH_RATIO: f64 = 0.8;
pub const MIN_CANDLE_WIDTH: f64 = 2.0;
pub const MIN_BODY_HEIGHT: f64 = 1.0;

pub const DEFAULT_GRID_DIVISIONS: u32 = 8;
pub const SIMPLE_GRID_DIVISIONS: u32 = 5;
pub const MAX_TIME_LABELS: usize = 8;

/// top, right, bottom, left
pub const DEFAULT_MARGIN: [f64; 4] = [20.0, 80.0, 60.0, 80.0];

pub const PRICE_LABEL_OFFSET_X: f64 = 10.0;
pub const PRICE_LABEL_OFFSET_Y: f64 = 4.0;
/// Distance of time labels above the bottom edge of the viewport
pub const TIME_LABEL_OFFSET_Y: f64 = 10.0;

pub const VOLUME_CAP_PX: f64 = 64.0;

pub const BADGE_GAP: f64 = 5.0;
pub const BADGE_WIDTH: f64 = 60.0;
pub const BADGE_HEIGHT: f64 = 20.0;

pub const PANEL_TITLE_OFFSET: f64 = 14.0;
