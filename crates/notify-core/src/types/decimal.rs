//! 가격 계산을 위한 Decimal 유틸리티.
//!
//! 외부 API는 가격을 `f64`로 주지만 내부 계산은 모두 [`Decimal`]로 수행합니다.

use crate::error::ValidationError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// 가격 타입.
pub type Price = Decimal;

/// `f64`를 Decimal로 변환합니다.
///
/// 최단 왕복 표현 문자열을 거치므로 `1234.56`은 정확히 `1234.56`이 됩니다.
pub fn decimal_from_f64(field: &'static str, value: f64) -> Result<Decimal, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }

    let text = value.to_string();
    Decimal::from_str(&text).map_err(|_| ValidationError::OutOfRange { field, value: text })
}

/// 표시용 Decimal 확장 트레이트.
pub trait DecimalExt {
    /// 양수이면 `+`를 붙인 문자열.
    fn to_signed_string(&self) -> String;

    /// 양의 무한대 방향으로 `dp` 자리까지 올림합니다.
    fn round_up_dp(&self, dp: u32) -> Decimal;
}

impl DecimalExt for Decimal {
    fn to_signed_string(&self) -> String {
        if *self > Decimal::ZERO {
            format!("+{}", self.normalize())
        } else {
            self.normalize().to_string()
        }
    }

    fn round_up_dp(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::ToPositiveInfinity)
    }
}
