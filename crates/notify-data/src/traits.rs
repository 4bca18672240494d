//! 저장소 trait.
//!
//! 파이프라인은 이 trait만 알고 있으며, 두 저장 연산 모두 키 기준 upsert라서
//! 같은 데이터를 여러 번 저장해도 결과가 같습니다.

use crate::error::{DataError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use notify_core::{InstrumentDetail, PriceRecord, Symbol};
use std::collections::HashMap;

/// 일별 가격 레코드 저장소.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// (symbol, day) 기준 upsert. 충돌 시 OHLC만 덮어씁니다.
    ///
    /// 빈 슬라이스는 아무것도 하지 않습니다. 반환값은 처리한 레코드 수입니다.
    async fn save_prices(&self, records: &[PriceRecord]) -> Result<usize>;

    /// 기간(양 끝 포함) 내 레코드를 심볼별로 조회합니다.
    ///
    /// 레코드는 날짜순이며 (symbol, day) 당 최대 하나입니다.
    /// 레코드가 없는 심볼은 결과 맵에 포함되지 않습니다.
    async fn query_prices(
        &self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HashMap<Symbol, Vec<PriceRecord>>>;

    /// 심볼 하나의 기간 내 레코드. 없으면 `NotFound`.
    async fn prices_in_period(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceRecord>> {
        let mut by_symbol = self
            .query_prices(std::slice::from_ref(symbol), start, end)
            .await?;

        by_symbol
            .remove(symbol)
            .filter(|records| !records.is_empty())
            .ok_or_else(|| DataError::NotFound(format!("symbol {} not found", symbol)))
    }

    /// 가장 최근 날짜의 레코드.
    async fn latest_price(&self, symbol: &Symbol) -> Result<Option<PriceRecord>>;
}

/// 종목 상세 정보 저장소.
#[async_trait]
pub trait InstrumentStore: Send + Sync {
    /// symbol 기준 upsert. 충돌 시 모든 필드를 덮어씁니다.
    async fn save_instruments(&self, details: &[InstrumentDetail]) -> Result<usize>;

    /// 심볼 하나의 상세 정보. 없으면 `NotFound`.
    async fn get_instrument(&self, symbol: &Symbol) -> Result<InstrumentDetail>;

    /// 저장된 모든 종목 (심볼 순).
    async fn list_instruments(&self) -> Result<Vec<InstrumentDetail>>;
}

/// 가격과 종목 정보를 함께 다루는 저장소.
pub trait StockRepository: PriceStore + InstrumentStore {}

impl<T: PriceStore + InstrumentStore + ?Sized> StockRepository for T {}

pub(crate) fn require_symbols(symbols: &[Symbol]) -> Result<()> {
    if symbols.is_empty() {
        Err(DataError::InvalidInput("symbols must not be empty".to_string()))
    } else {
        Ok(())
    }
}
