//! 일별 가격 레코드.

use crate::error::ValidationError;
use crate::types::{Price, Symbol};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// 심볼 하나의 하루치 OHLC.
///
/// 네 가격은 모두 양수이며, 날짜는 UTC 기준으로 잘라낸 값이므로
/// 심볼당 하루에 최대 하나의 레코드만 존재합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    symbol: Symbol,
    day: NaiveDate,
    open: Price,
    close: Price,
    high: Price,
    low: Price,
}

impl PriceRecord {
    /// 날짜를 지정하여 레코드를 생성합니다.
    pub fn new(
        symbol: Symbol,
        day: NaiveDate,
        open: Price,
        close: Price,
        high: Price,
        low: Price,
    ) -> Result<Self, ValidationError> {
        for (field, value) in [("open", open), ("close", close), ("high", high), ("low", low)] {
            if value <= Decimal::ZERO {
                return Err(ValidationError::NonPositive { field, value });
            }
        }

        Ok(Self {
            symbol,
            day,
            open,
            close,
            high,
            low,
        })
    }

    /// 시각을 받아 해당 UTC 날짜로 잘라낸 레코드를 생성합니다.
    pub fn at(
        symbol: Symbol,
        timestamp: DateTime<Utc>,
        open: Price,
        close: Price,
        high: Price,
        low: Price,
    ) -> Result<Self, ValidationError> {
        Self::new(symbol, timestamp.date_naive(), open, close, high, low)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// 해당 날짜 00:00:00 UTC.
    pub fn midnight(&self) -> DateTime<Utc> {
        self.day.and_time(NaiveTime::MIN).and_utc()
    }

    pub fn open(&self) -> Price {
        self.open
    }

    pub fn close(&self) -> Price {
        self.close
    }

    pub fn high(&self) -> Price {
        self.high
    }

    pub fn low(&self) -> Price {
        self.low
    }
}
