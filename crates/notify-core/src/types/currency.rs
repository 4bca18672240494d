//! 통화 코드.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 지원 통화.
///
/// 알 수 없는 코드는 기본값으로 대체하지 않고 에러로 처리합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// 일본 엔
    Jpy,
    /// 미국 달러
    Usd,
}

impl Currency {
    /// ISO 4217 코드.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Jpy => "JPY",
            Currency::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JPY" => Ok(Currency::Jpy),
            "USD" => Ok(Currency::Usd),
            _ => Err(ValidationError::UnknownCurrency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!("JPY".parse::<Currency>().unwrap(), Currency::Jpy);
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(
            "EUR".parse::<Currency>().unwrap_err(),
            ValidationError::UnknownCurrency("EUR".to_string())
        );
        assert!("usd".parse::<Currency>().is_err());
    }
}
