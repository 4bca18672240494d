//! 차트 응답 정규화.
//!
//! 검증은 두 단계로 나뉩니다:
//!
//! 1. **구조 검증 (전체 실패)**: result/quote 블록이 있어야 하고, OHLC 네 배열과
//!    timestamp 배열의 길이가 모두 같아야 합니다. 값이 위치로 정렬되어 있으므로
//!    길이가 하나라도 다르면 어떤 날짜도 신뢰할 수 없습니다.
//! 2. **날짜별 필터 (부분 실패)**: 0 이하이거나 `null`인 값이 있는 날짜는 경고를
//!    남기고 건너뛰며, 나머지 날짜는 계속 처리합니다.

use crate::chart::{ChartMeta, ChartResponse, Indicators, Quote};
use chrono::{DateTime, NaiveDate};
use notify_core::{
    decimal_from_f64, Classify, Currency, ErrorKind, InstrumentDetail, PriceRecord, Symbol,
    ValidationError,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// 정규화 실패 (해당 조회 전체가 실패).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("empty result")]
    EmptyResult,

    #[error("empty quote")]
    EmptyQuote,

    #[error(
        "array length mismatch (timestamp={timestamp}, open={open}, close={close}, high={high}, low={low})"
    )]
    LengthMismatch {
        timestamp: usize,
        open: usize,
        close: usize,
        high: usize,
        low: usize,
    },

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("previous close could not be resolved")]
    MissingPreviousClose,

    #[error("invalid metadata: {0}")]
    InvalidMeta(#[from] ValidationError),
}

impl Classify for NormalizeError {
    fn kind(&self) -> ErrorKind {
        match self {
            NormalizeError::InvalidMeta(e) if e.kind() == ErrorKind::UnknownCurrency => {
                ErrorKind::UnknownCurrency
            }
            _ => ErrorKind::MalformedResponse,
        }
    }
}

/// 건너뛴 날짜.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTick {
    /// 응답 배열 인덱스
    pub index: usize,
    /// 원본 유닉스 타임스탬프 (초)
    pub timestamp: i64,
    /// 건너뛴 이유
    pub error: ValidationError,
}

/// 정규화 결과.
#[derive(Debug, Clone)]
pub struct NormalizedChart {
    pub detail: InstrumentDetail,
    /// 날짜순, 날짜당 최대 하나
    pub records: Vec<PriceRecord>,
    pub skipped: Vec<SkippedTick>,
}

/// 차트 응답을 종목 상세 정보와 일별 레코드로 변환합니다.
pub fn normalize(
    response: &ChartResponse,
    symbol: &Symbol,
) -> Result<NormalizedChart, NormalizeError> {
    let result = response
        .chart
        .result
        .as_ref()
        .and_then(|r| r.first())
        .ok_or(NormalizeError::EmptyResult)?;
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or(NormalizeError::EmptyQuote)?;

    check_lengths(&result.timestamp, quote)?;

    let detail = build_detail(symbol, &result.meta, &result.indicators)?;

    let mut by_day: BTreeMap<NaiveDate, PriceRecord> = BTreeMap::new();
    let mut skipped = Vec::new();

    for (index, &timestamp) in result.timestamp.iter().enumerate() {
        match build_record(symbol, timestamp, quote, index) {
            Ok(record) => {
                // 같은 날짜의 장중 샘플은 나중 값으로 덮어씀
                by_day.insert(record.day(), record);
            }
            Err(error) => {
                warn!(
                    symbol = %symbol,
                    index,
                    timestamp,
                    error = %error,
                    "유효하지 않은 시세 건너뜀"
                );
                skipped.push(SkippedTick {
                    index,
                    timestamp,
                    error,
                });
            }
        }
    }

    let records: Vec<PriceRecord> = by_day.into_values().collect();
    debug!(
        symbol = %symbol,
        records = records.len(),
        skipped = skipped.len(),
        "차트 정규화 완료"
    );

    Ok(NormalizedChart {
        detail,
        records,
        skipped,
    })
}

fn check_lengths(timestamp: &[i64], quote: &Quote) -> Result<(), NormalizeError> {
    let n = timestamp.len();
    let lengths = [quote.open.len(), quote.close.len(), quote.high.len(), quote.low.len()];

    if lengths.iter().all(|&len| len == n) {
        Ok(())
    } else {
        Err(NormalizeError::LengthMismatch {
            timestamp: n,
            open: lengths[0],
            close: lengths[1],
            high: lengths[2],
            low: lengths[3],
        })
    }
}

fn price_at(
    field: &'static str,
    values: &[Option<f64>],
    index: usize,
) -> Result<Decimal, ValidationError> {
    let value = values
        .get(index)
        .copied()
        .flatten()
        .ok_or(ValidationError::NonFinite { field })?;
    decimal_from_f64(field, value)
}

fn build_record(
    symbol: &Symbol,
    timestamp: i64,
    quote: &Quote,
    index: usize,
) -> Result<PriceRecord, ValidationError> {
    let at = DateTime::from_timestamp(timestamp, 0).ok_or(ValidationError::OutOfRange {
        field: "timestamp",
        value: timestamp.to_string(),
    })?;

    PriceRecord::at(
        symbol.clone(),
        at,
        price_at("open", &quote.open, index)?,
        price_at("close", &quote.close, index)?,
        price_at("high", &quote.high, index)?,
        price_at("low", &quote.low, index)?,
    )
}

/// 전일 종가를 다음 순서로 찾습니다:
///
/// 1. `meta.previousClose` (0이 아닐 때)
/// 2. 수정 종가 배열의 끝에서 두 번째 값 (배열 길이 2 이상)
/// 3. `meta.chartPreviousClose`
///
/// 조회 기간에 따라 응답에 채워지는 필드가 달라서 순서대로 대체합니다.
pub fn resolve_previous_close(meta: &ChartMeta, indicators: &Indicators) -> Option<f64> {
    let explicit = meta.previous_close.filter(|v| *v != 0.0);

    let adjusted = || {
        indicators
            .adjclose
            .as_ref()
            .and_then(|blocks| blocks.first())
            .filter(|block| block.adjclose.len() > 1)
            .and_then(|block| block.adjclose[block.adjclose.len() - 2])
    };

    explicit.or_else(adjusted).or(meta.chart_previous_close)
}

fn build_detail(
    symbol: &Symbol,
    meta: &ChartMeta,
    indicators: &Indicators,
) -> Result<InstrumentDetail, NormalizeError> {
    let currency: Currency = meta
        .currency
        .as_deref()
        .ok_or(NormalizeError::MissingField("currency"))?
        .parse()?;

    let market_price = meta
        .regular_market_price
        .ok_or(NormalizeError::MissingField("regularMarketPrice"))?;
    let previous_close =
        resolve_previous_close(meta, indicators).ok_or(NormalizeError::MissingPreviousClose)?;

    Ok(InstrumentDetail {
        symbol: symbol.clone(),
        short_name: meta.short_name.clone().unwrap_or_default(),
        long_name: meta.long_name.clone().unwrap_or_default(),
        currency,
        market_price: decimal_from_f64("regularMarketPrice", market_price)?,
        previous_close: decimal_from_f64("previousClose", previous_close)?,
        volume: meta.regular_market_volume,
        market_cap: None,
    })
}
