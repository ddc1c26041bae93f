use crate::domain::{
    chart::{
        CandleReadout, ChartConfig, GeometryOutput, Indicator, ViewportSpec, candle_at,
        compute_indicator_panel,
    },
    chart::services::ChartGeometryMapper,
    errors::{ChartError, ChartResult},
    logging::LogComponent,
    market_data::{Seed, Series, SeriesGenerator, SeriesSummary, Symbol, Timeframe},
};
use crate::time_utils::align_to_step;
use crate::{log_debug, log_info};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

pub const DEFAULT_CACHE_CAPACITY: usize = 32;

type CacheKey = (Symbol, Timeframe, usize);

/// Application service behind one dashboard: caches generated series per
/// symbol/timeframe/length and turns them into geometry on demand.
pub struct ChartService {
    generator: SeriesGenerator,
    mapper: ChartGeometryMapper,
    cache: HashMap<CacheKey, Arc<Series>>,
    order: VecDeque<CacheKey>,
    capacity: usize,
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(SeriesGenerator::default(), DEFAULT_CACHE_CAPACITY)
    }
}

impl ChartService {
    pub fn new(generator: SeriesGenerator, capacity: usize) -> Self {
        Self {
            generator,
            mapper: ChartGeometryMapper::new(),
            cache: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn generator(&self) -> &SeriesGenerator {
        &self.generator
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn key(symbol: &str, timeframe: Timeframe, length: i64) -> ChartResult<CacheKey> {
        let symbol = Symbol::new(symbol).map_err(ChartError::invalid)?;
        let length = usize::try_from(length)
            .ok()
            .filter(|len| *len > 0)
            .ok_or_else(|| ChartError::invalid(format!("length must be positive, got {length}")))?;
        Ok((symbol, timeframe, length))
    }

    fn insert(&mut self, key: CacheKey, series: Arc<Series>) {
        if self.cache.insert(key.clone(), Arc::clone(&series)).is_none() {
            self.order.push_back(key);
        }
        while self.cache.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else { break };
            self.cache.remove(&oldest);
        }
    }

    /// Cached series, generated from the symbol/timeframe seed on a miss.
    pub fn series_for(
        &mut self,
        symbol: &str,
        timeframe: Timeframe,
        length: i64,
    ) -> ChartResult<Arc<Series>> {
        let key = Self::key(symbol, timeframe, length)?;
        if let Some(series) = self.cache.get(&key) {
            return Ok(Arc::clone(series));
        }

        let seed = Seed::for_chart(&key.0, timeframe, 0);
        let series = Arc::new(self.generator.generate(seed, length, timeframe.step_ms())?);
        log_debug!(
            LogComponent::Application("ChartService"),
            "cached {} {} x{}",
            key.0,
            timeframe,
            key.2
        );
        self.insert(key, Arc::clone(&series));
        Ok(series)
    }

    /// Geometry for `symbol` at the config's timeframe and default length.
    pub fn render(
        &mut self,
        symbol: &str,
        viewport: &ViewportSpec,
        config: &ChartConfig,
    ) -> ChartResult<GeometryOutput> {
        let timeframe = config.timeframe;
        let series = self.series_for(symbol, timeframe, timeframe.default_length() as i64)?;
        self.mapper.compute(&series, viewport, config)
    }

    pub fn render_panel(
        &mut self,
        symbol: &str,
        viewport: &ViewportSpec,
        config: &ChartConfig,
        indicator: Indicator,
    ) -> ChartResult<GeometryOutput> {
        let timeframe = config.timeframe;
        let series = self.series_for(symbol, timeframe, timeframe.default_length() as i64)?;
        compute_indicator_panel(&series, viewport, config, indicator)
    }

    /// Crosshair readout for the chart `render` draws with the same arguments.
    pub fn candle_at(
        &mut self,
        symbol: &str,
        viewport: &ViewportSpec,
        config: &ChartConfig,
        x: f64,
    ) -> ChartResult<CandleReadout> {
        let timeframe = config.timeframe;
        let series = self.series_for(symbol, timeframe, timeframe.default_length() as i64)?;
        candle_at(&series, viewport, config, x)
    }

    pub fn summary(&mut self, symbol: &str, timeframe: Timeframe) -> ChartResult<SeriesSummary> {
        Ok(self.series_for(symbol, timeframe, timeframe.default_length() as i64)?.summary())
    }

    /// Next "live" series for the pair: an independent recomputation seeded
    /// with `tick`, whose newest candle sits `tick` steps after the anchor's
    /// bucket.
    /// Replaces the cached default-length entry.
    pub fn refresh(&mut self, symbol: &str, timeframe: Timeframe, tick: u64) -> ChartResult<Arc<Series>> {
        let length = timeframe.default_length() as i64;
        let key = Self::key(symbol, timeframe, length)?;
        let step = timeframe.step_ms();
        let base = align_to_step(self.generator.config().anchor_ms, step);
        let anchor = tick
            .checked_mul(step)
            .and_then(|offset| base.checked_add(offset))
            .ok_or_else(|| ChartError::invalid("refresh tick overflows the time axis"))?;

        let generator = SeriesGenerator::new(self.generator.config().clone().with_anchor(anchor));
        let seed = Seed::for_chart(&key.0, timeframe, tick);
        let series = Arc::new(generator.generate(seed, length, step)?);
        log_info!(LogComponent::Application("ChartService"), "refreshed {} {} tick {}", key.0, timeframe, tick);
        self.insert(key, Arc::clone(&series));
        Ok(series)
    }

    /// Drops every cached series of `symbol`; returns how many were removed.
    pub fn evict(&mut self, symbol: &str) -> usize {
        let symbol = Symbol::from(symbol);
        let before = self.cache.len();
        self.cache.retain(|(s, _, _), _| *s != symbol);
        self.order.retain(|(s, _, _)| *s != symbol);
        before - self.cache.len()
    }
}
