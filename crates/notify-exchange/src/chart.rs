//! 차트 API 응답 구조체.
//!
//! 휴장일이나 장중 미체결 구간은 배열 안에 `null`로 내려오므로
//! 가격 배열은 모두 `Vec<Option<f64>>`로 받습니다.

use serde::{Deserialize, Serialize};

/// `/v8/finance/chart/{symbol}` 응답 최상위.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

/// API 수준 에러 (HTTP 200이 아닐 때 함께 내려옴).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChartApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

/// 종목 메타데이터.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub regular_market_volume: Option<i64>,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub chart_previous_close: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chart_with_nulls() {
        let body = r#"{
            "chart": {
                "result": [{
                    "meta": {
                        "currency": "JPY",
                        "symbol": "^N225",
                        "regularMarketPrice": 38500.5,
                        "chartPreviousClose": 38100.0
                    },
                    "timestamp": [1710460800, 1710720000],
                    "indicators": {
                        "quote": [{
                            "open": [38000.0, null],
                            "close": [38200.0, null],
                            "high": [38300.0, null],
                            "low": [37900.0, null]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let result = &response.chart.result.unwrap()[0];
        assert_eq!(result.meta.currency.as_deref(), Some("JPY"));
        assert_eq!(result.meta.previous_close, None);
        assert_eq!(result.timestamp.len(), 2);
        assert_eq!(result.indicators.quote[0].open, vec![Some(38000.0), None]);
        assert!(result.indicators.adjclose.is_none());
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        assert!(response.chart.result.is_none());
        assert_eq!(response.chart.error.unwrap().code, "Not Found");
    }
}
