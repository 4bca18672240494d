//! 요약 메일용 시계열 공급자.
//!
//! - [`StoredSeriesSource`]: 저장소에 쌓인 레코드와 종목 정보
//! - [`LiveSeriesSource`]: 차트 API를 바로 조회하여 정규화

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notify_core::{ChartInterval, StockSeries, Symbol, SymbolRegistry};
use notify_data::StockRepository;
use notify_exchange::{fetch_normalized, ChartSource};
use notify_notification::{SeriesSource, SourceError};
use std::sync::Arc;

/// 저장소 기반 시계열 공급자.
pub struct StoredSeriesSource {
    store: Arc<dyn StockRepository>,
}

impl StoredSeriesSource {
    pub fn new(store: Arc<dyn StockRepository>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SeriesSource for StoredSeriesSource {
    async fn load_series(
        &self,
        symbol: &Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<StockSeries, SourceError> {
        let records = self
            .store
            .prices_in_period(symbol, start.date_naive(), end.date_naive())
            .await
            .map_err(|e| SourceError::wrap(&e))?;
        let detail = self
            .store
            .get_instrument(symbol)
            .await
            .map_err(|e| SourceError::wrap(&e))?;

        StockSeries::new(detail, records).map_err(|e| SourceError::wrap(&e))
    }

    fn name(&self) -> &str {
        "stored"
    }
}

/// 차트 API 기반 시계열 공급자.
pub struct LiveSeriesSource {
    source: Arc<dyn ChartSource>,
    registry: SymbolRegistry,
    interval: ChartInterval,
}

impl LiveSeriesSource {
    pub fn new(source: Arc<dyn ChartSource>, registry: SymbolRegistry, interval: ChartInterval) -> Self {
        Self {
            source,
            registry,
            interval,
        }
    }
}

#[async_trait]
impl SeriesSource for LiveSeriesSource {
    async fn load_series(
        &self,
        symbol: &Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<StockSeries, SourceError> {
        let normalized = fetch_normalized(
            self.source.as_ref(),
            &self.registry,
            symbol,
            start,
            end,
            self.interval,
        )
        .await
        .map_err(|e| SourceError::wrap(&e))?;

        StockSeries::new(normalized.detail, normalized.records).map_err(|e| SourceError::wrap(&e))
    }

    fn name(&self) -> &str {
        "live"
    }
}
