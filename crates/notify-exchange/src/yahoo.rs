//! Yahoo Finance 차트 API 클라이언트.
//!
//! `GET {base}/v8/finance/chart/{provider_code}?period1=..&period2=..&interval=1d&region=US`
//!
//! 제공자 코드는 `^N225`처럼 URL에 그대로 쓸 수 없는 문자를 포함하므로
//! 경로 세그먼트로 인코딩합니다.

use crate::chart::ChartResponse;
use crate::traits::ChartSource;
use crate::{ExchangeError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notify_core::{ChartConfig, ChartInterval};
use std::time::Duration;
use tracing::{debug, warn};

/// 기본 API 주소.
pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Yahoo Finance 차트 클라이언트.
#[derive(Debug, Clone)]
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    /// 기본 주소와 30초 타임아웃으로 생성합니다.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    /// 주소를 지정하여 생성합니다 (테스트에서 mock 서버 주소를 넣을 때 사용).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ExchangeError::InvalidConfig(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// 설정 파일의 `[chart]` 섹션으로 생성합니다.
    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        Self::with_base_url(config.base_url.clone(), config.timeout())
    }

    fn chart_url(&self, provider_code: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            urlencoding::encode(provider_code)
        )
    }
}

#[async_trait]
impl ChartSource for YahooChartClient {
    async fn fetch_chart(
        &self,
        provider_code: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: ChartInterval,
    ) -> Result<ChartResponse> {
        let url = self.chart_url(provider_code);
        debug!(url = %url, start = %start, end = %end, interval = %interval, "차트 요청");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", interval.as_str().to_string()),
                ("region", "US".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            warn!(provider_code, "Yahoo Finance 요청 한도 초과");
            return Err(ExchangeError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExchangeError::ApiError {
                code: i32::from(status.as_u16()),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_url_encodes_provider_code() {
        let client =
            YahooChartClient::with_base_url("http://localhost:1234/", Duration::from_secs(1))
                .unwrap();

        assert_eq!(
            client.chart_url("^N225"),
            "http://localhost:1234/v8/finance/chart/%5EN225"
        );
        assert_eq!(
            client.chart_url("^GSPC"),
            "http://localhost:1234/v8/finance/chart/%5EGSPC"
        );
    }
}
