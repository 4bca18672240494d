//! 종목 시계열 분석.
//!
//! [`StockSeries`]는 종목 상세 정보 하나와 그 종목의 일별 레코드를 묶은
//! 일시적인 값입니다. 저장하지 않고 분석에만 사용합니다.
//!
//! 평균과 비율은 모두 Decimal로 계산하여 긴 시계열에서도 오차가 누적되지 않습니다.

use super::{InstrumentDetail, PriceRecord};
use crate::error::AnalyticsError;
use crate::types::{DecimalExt, SymbolRegistry};
use rust_decimal::Decimal;
use serde::Serialize;

/// 종목 상세 정보와 날짜순 정렬된 가격 레코드.
#[derive(Debug, Clone)]
pub struct StockSeries {
    detail: InstrumentDetail,
    records: Vec<PriceRecord>,
}

#[derive(Serialize)]
struct SeriesJson<'a> {
    symbol: &'a InstrumentDetail,
    stocks: &'a [PriceRecord],
}

impl StockSeries {
    /// 시리즈를 생성합니다.
    ///
    /// 다른 심볼의 레코드가 섞여 있으면 실패합니다. 빈 레코드 목록은 허용되며,
    /// 이 경우 분석 연산이 [`AnalyticsError::EmptySeries`]를 반환합니다.
    pub fn new(
        detail: InstrumentDetail,
        mut records: Vec<PriceRecord>,
    ) -> Result<Self, AnalyticsError> {
        if let Some(foreign) = records.iter().find(|r| *r.symbol() != detail.symbol) {
            return Err(AnalyticsError::SymbolMismatch {
                expected: detail.symbol.to_string(),
                found: foreign.symbol().to_string(),
            });
        }

        records.sort_by_key(PriceRecord::day);
        Ok(Self { detail, records })
    }

    pub fn detail(&self) -> &InstrumentDetail {
        &self.detail
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn empty_error(&self) -> AnalyticsError {
        AnalyticsError::EmptySeries {
            symbol: self.detail.symbol.to_string(),
        }
    }

    fn overflow_error(&self) -> AnalyticsError {
        AnalyticsError::Overflow {
            symbol: self.detail.symbol.to_string(),
        }
    }

    /// 가장 최근 날짜의 레코드.
    pub fn latest(&self) -> Result<&PriceRecord, AnalyticsError> {
        self.records
            .iter()
            .max_by_key(|r| r.day())
            .ok_or_else(|| self.empty_error())
    }

    /// 전체 종가의 산술 평균.
    pub fn closing_average(&self) -> Result<Decimal, AnalyticsError> {
        if self.records.is_empty() {
            return Err(self.empty_error());
        }

        let sum = self
            .records
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.close()))
            .ok_or_else(|| self.overflow_error())?;

        sum.checked_div(Decimal::from(self.records.len()))
            .ok_or_else(|| self.overflow_error())
    }

    /// 최신 종가 / 종가 평균.
    pub fn closing_to_average_ratio(&self) -> Result<Decimal, AnalyticsError> {
        let average = self.closing_average()?;
        if average.is_zero() {
            return Err(AnalyticsError::ZeroAverage {
                symbol: self.detail.symbol.to_string(),
            });
        }

        let latest = self.latest()?;
        latest
            .close()
            .checked_div(average)
            .ok_or_else(|| self.overflow_error())
    }

    /// 다이제스트 메일에 들어갈 종목 요약.
    ///
    /// ```text
    /// Nikkei 225
    /// Closing Price: 38500 JPY
    /// 1-Year Moving Average: 35124 JPY
    /// Closing-to-Average Ratio: 109.62%
    /// ```
    ///
    /// 종가는 소수점 이하를 버리고, 평균과 비율은 올림합니다.
    pub fn digest_message(&self, registry: &SymbolRegistry) -> Result<String, AnalyticsError> {
        let display_name = registry.to_display_name(&self.detail.symbol)?;
        let average = self.closing_average()?;
        let latest = self.latest()?;
        let ratio = self.closing_to_average_ratio()?;

        let ratio_pct = ratio
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| self.overflow_error())?
            .round_up_dp(2);
        let currency = self.detail.currency;

        Ok([
            display_name.to_string(),
            format!("Closing Price: {} {}", latest.close().trunc().normalize(), currency),
            format!("1-Year Moving Average: {} {}", average.ceil().normalize(), currency),
            format!("Closing-to-Average Ratio: {}%", ratio_pct.normalize()),
        ]
        .join("\n"))
    }

    /// `{"symbol": <상세 정보>, "stocks": [<레코드>]}` 형식의 JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SeriesJson {
            symbol: &self.detail,
            stocks: &self.records,
        })
    }
}
