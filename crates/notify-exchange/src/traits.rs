//! 시세 데이터 소스 trait.

use crate::chart::ChartResponse;
use crate::normalize::{normalize, NormalizedChart};
use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notify_core::{ChartInterval, Symbol, SymbolRegistry};
use tracing::info;

/// 차트 데이터 소스.
///
/// 구현체는 재시도나 타임아웃 정책을 직접 갖고, 에러는 그대로 전파합니다.
#[async_trait]
pub trait ChartSource: Send + Sync {
    /// 제공자 코드 기준으로 기간 내 차트를 조회합니다.
    async fn fetch_chart(
        &self,
        provider_code: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: ChartInterval,
    ) -> Result<ChartResponse>;

    /// 소스 이름.
    fn name(&self) -> &str;
}

/// 심볼을 제공자 코드로 바꿔 조회한 뒤 정규화합니다.
pub async fn fetch_normalized<S>(
    source: &S,
    registry: &SymbolRegistry,
    symbol: &Symbol,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: ChartInterval,
) -> Result<NormalizedChart>
where
    S: ChartSource + ?Sized,
{
    let provider_code = registry.to_provider_code(symbol)?;
    let response = source.fetch_chart(provider_code, start, end, interval).await?;
    let normalized = normalize(&response, symbol)?;

    info!(
        source = source.name(),
        symbol = %symbol,
        records = normalized.records.len(),
        skipped = normalized.skipped.len(),
        "차트 조회 완료"
    );

    Ok(normalized)
}
