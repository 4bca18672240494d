//! 차트 조회 간격.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 시세 차트 간격.
///
/// 저장 단위가 하루이므로 일봉 이상만 지원합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartInterval {
    /// 일봉
    #[default]
    #[serde(rename = "1d")]
    Day,
    /// 주봉
    #[serde(rename = "1wk")]
    Week,
    /// 월봉
    #[serde(rename = "1mo")]
    Month,
}

impl ChartInterval {
    /// 쿼리 파라미터 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::Day => "1d",
            ChartInterval::Week => "1wk",
            ChartInterval::Month => "1mo",
        }
    }
}

impl fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" | "day" | "daily" => Ok(ChartInterval::Day),
            "1wk" | "week" | "weekly" => Ok(ChartInterval::Week),
            "1mo" | "month" | "monthly" => Ok(ChartInterval::Month),
            _ => Err(format!("Unknown chart interval: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_str() {
        assert_eq!("1d".parse::<ChartInterval>().unwrap(), ChartInterval::Day);
        assert_eq!("WEEKLY".parse::<ChartInterval>().unwrap(), ChartInterval::Week);
        assert_eq!("1mo".parse::<ChartInterval>().unwrap(), ChartInterval::Month);
        assert!("1m".parse::<ChartInterval>().is_err());
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(ChartInterval::Day.to_string(), "1d");
        assert_eq!(ChartInterval::Week.to_string(), "1wk");
    }
}
