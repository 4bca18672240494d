//! 종목 상세 정보.

use crate::types::{Currency, DecimalExt, Price, Symbol};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// 가장 최근 조회 시점의 종목 메타데이터.
///
/// 조회가 성공할 때마다 갱신되며 심볼 단위로 upsert됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentDetail {
    /// 종목 심볼
    pub symbol: Symbol,
    /// 짧은 이름
    pub short_name: String,
    /// 긴 이름
    pub long_name: String,
    /// 거래 통화
    pub currency: Currency,
    /// 현재가
    pub market_price: Price,
    /// 전일 종가
    pub previous_close: Price,
    /// 거래량
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    /// 시가총액
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<i64>,
}

impl InstrumentDetail {
    /// 전일 대비 변동폭.
    pub fn change(&self) -> Decimal {
        self.market_price - self.previous_close
    }

    /// 전일 대비 변동률 (%, 소수점 둘째 자리 반올림).
    ///
    /// 전일 종가가 0이면 `None`을 반환합니다.
    pub fn change_percent(&self) -> Option<Decimal> {
        let ratio = self.change().checked_div(self.previous_close)?;
        let pct = ratio.checked_mul(Decimal::ONE_HUNDRED)?;
        Some(pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// 부호를 명시한 변동폭 (예: `+120.5`).
    pub fn format_change(&self) -> String {
        self.change().to_signed_string()
    }

    /// 부호를 명시한 변동률 (예: `+1.25%`).
    pub fn format_change_percent(&self) -> Option<String> {
        self.change_percent()
            .map(|pct| format!("{}%", pct.to_signed_string()))
    }
}
