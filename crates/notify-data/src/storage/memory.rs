//! 메모리 저장소.
//!
//! 데이터베이스 없이 파이프라인을 실행하거나 테스트할 때 사용합니다.
//! 키와 덮어쓰기 규칙은 PostgreSQL 구현과 같습니다.

use crate::error::{DataError, Result};
use crate::traits::{require_symbols, InstrumentStore, PriceStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use notify_core::{InstrumentDetail, PriceRecord, Symbol};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

/// 메모리 기반 가격/종목 저장소.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prices: RwLock<BTreeMap<(Symbol, NaiveDate), PriceRecord>>,
    instruments: RwLock<BTreeMap<Symbol, InstrumentDetail>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 저장된 가격 레코드 수.
    pub async fn price_count(&self) -> usize {
        self.prices.read().await.len()
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn save_prices(&self, records: &[PriceRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut prices = self.prices.write().await;
        for record in records {
            prices.insert((record.symbol().clone(), record.day()), record.clone());
        }

        debug!(count = records.len(), "가격 레코드 저장 (memory)");
        Ok(records.len())
    }

    async fn query_prices(
        &self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<Symbol, Vec<PriceRecord>>> {
        require_symbols(symbols)?;

        let mut by_symbol = HashMap::new();
        if start > end {
            return Ok(by_symbol);
        }

        let prices = self.prices.read().await;
        for symbol in symbols {
            if by_symbol.contains_key(symbol) {
                continue;
            }
            let records: Vec<PriceRecord> = prices
                .range((symbol.clone(), start)..=(symbol.clone(), end))
                .map(|(_, record)| record.clone())
                .collect();
            if !records.is_empty() {
                by_symbol.insert(symbol.clone(), records);
            }
        }

        Ok(by_symbol)
    }

    async fn latest_price(&self, symbol: &Symbol) -> Result<Option<PriceRecord>> {
        let prices = self.prices.read().await;
        Ok(prices
            .range((symbol.clone(), NaiveDate::MIN)..=(symbol.clone(), NaiveDate::MAX))
            .next_back()
            .map(|(_, record)| record.clone()))
    }
}

#[async_trait]
impl InstrumentStore for MemoryStore {
    async fn save_instruments(&self, details: &[InstrumentDetail]) -> Result<usize> {
        let mut instruments = self.instruments.write().await;
        for detail in details {
            instruments.insert(detail.symbol.clone(), detail.clone());
        }
        Ok(details.len())
    }

    async fn get_instrument(&self, symbol: &Symbol) -> Result<InstrumentDetail> {
        self.instruments
            .read()
            .await
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::NotFound(format!("symbol {} not found", symbol)))
    }

    async fn list_instruments(&self) -> Result<Vec<InstrumentDetail>> {
        Ok(self.instruments.read().await.values().cloned().collect())
    }
}
