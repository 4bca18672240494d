//! 시세 등록 모듈.
//!
//! 차트 API에서 일별 시세를 가져와 정규화한 뒤 가격 레코드와 종목 정보를
//! 저장합니다. 여러 심볼을 처리할 때는 한 심볼의 실패가 나머지를 막지
//! 않으며, 실패한 심볼은 마지막에 한꺼번에 보고됩니다.

use crate::{CollectionStats, CollectorError, Result};
use chrono::{DateTime, Months, Utc};
use notify_core::{BatchOutcome, ChartInterval, CollectConfig, Symbol, SymbolFailure, SymbolRegistry};
use notify_data::StockRepository;
use notify_exchange::{fetch_normalized, ChartSource, ExchangeError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// 등록 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterMode {
    /// 최근 며칠 (`collect.recent_days`)
    Recent,
    /// 전체 이력 (`collect.backfill_years` 단위로 epoch까지 거슬러 올라감)
    FullHistory,
}

/// 심볼 하나의 등록 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registered {
    pub symbol: Symbol,
    /// 저장한 레코드 수
    pub records: usize,
    /// 건너뛴 날짜 수
    pub skipped: usize,
}

/// 여러 심볼 등록 결과.
#[derive(Debug)]
pub struct RegisterReport {
    pub outcome: BatchOutcome<Registered>,
    pub stats: CollectionStats,
}

impl RegisterReport {
    /// 실패한 심볼이 있으면 묶어서 에러로 반환합니다.
    pub fn into_result(self) -> Result<Vec<Registered>> {
        self.outcome.into_result().map_err(CollectorError::from)
    }
}

/// 차트 소스와 저장소를 묶은 등록기.
pub struct Registrar {
    source: Arc<dyn ChartSource>,
    store: Arc<dyn StockRepository>,
    registry: SymbolRegistry,
    config: CollectConfig,
    interval: ChartInterval,
}

impl Registrar {
    pub fn new(
        source: Arc<dyn ChartSource>,
        store: Arc<dyn StockRepository>,
        registry: SymbolRegistry,
        config: CollectConfig,
    ) -> Self {
        Self {
            source,
            store,
            registry,
            config,
            interval: ChartInterval::Day,
        }
    }

    /// 조회 간격을 지정합니다.
    pub fn with_interval(mut self, interval: ChartInterval) -> Self {
        self.interval = interval;
        self
    }

    /// 심볼 하나를 기간 내로 조회하여 저장합니다.
    ///
    /// 가격 레코드를 먼저 저장하고 종목 정보를 갱신합니다.
    pub async fn register_symbol(
        &self,
        symbol: &Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Registered> {
        let span = notify_core::symbol_span!("register_symbol", symbol);

        async move {
            let normalized = fetch_normalized(
                self.source.as_ref(),
                &self.registry,
                symbol,
                start,
                end,
                self.interval,
            )
            .await?;

            let records = self.store.save_prices(&normalized.records).await?;
            self.store
                .save_instruments(std::slice::from_ref(&normalized.detail))
                .await?;

            Ok(Registered {
                symbol: symbol.clone(),
                records,
                skipped: normalized.skipped.len(),
            })
        }
        .instrument(span)
        .await
    }

    /// 입력 순서대로 심볼을 등록합니다.
    ///
    /// 해석할 수 없는 입력도 실패로 기록될 뿐 나머지 처리는 계속됩니다.
    pub async fn register_symbols(
        &self,
        inputs: &[String],
        mode: RegisterMode,
        now: DateTime<Utc>,
    ) -> RegisterReport {
        let started = Instant::now();
        tracing::info!(symbols = inputs.len(), mode = ?mode, "시세 등록 시작");

        let report = match mode {
            RegisterMode::Recent => self.register_recent(inputs, now).await,
            RegisterMode::FullHistory => self.backfill(inputs, now).await,
        };

        let RegisterReport { outcome, mut stats } = report;
        stats.count_outcome(&outcome);
        stats.elapsed = started.elapsed();

        RegisterReport { outcome, stats }
    }

    async fn register_recent(&self, inputs: &[String], now: DateTime<Utc>) -> RegisterReport {
        let start = now - chrono::Duration::days(self.config.recent_days);
        let mut outcome = BatchOutcome::new();
        let mut stats = CollectionStats::new();

        for (idx, input) in inputs.iter().enumerate() {
            if idx > 0 {
                tokio::time::sleep(self.config.request_delay()).await;
            }

            let result = match self.registry.resolve(input) {
                Ok(symbol) => self.register_symbol(&symbol, start, now).await,
                Err(e) => Err(CollectorError::from(e)),
            };

            match &result {
                Ok(registered) => {
                    stats.add_fetch(registered.records, registered.skipped);
                    tracing::info!(symbol = %registered.symbol, records = registered.records, "등록 완료");
                }
                Err(e) => tracing::error!(symbol = %input, error = %e, "등록 실패"),
            }
            outcome.record(input.as_str(), result);
        }

        RegisterReport { outcome, stats }
    }

    /// 전체 이력을 `backfill_years` 단위 구간으로 나눠 현재부터 epoch까지 조회합니다.
    ///
    /// 상장 이전의 오래된 구간은 데이터가 없다는 응답(400/404)이 오거나 레코드가
    /// 비어 있으므로 그 경우만 건너뜁니다. 저장 실패나 잘못된 응답 같은 다른
    /// 에러는 앞선 구간이 성공했더라도 해당 심볼의 실패로 기록하고, 그 심볼의
    /// 남은 구간은 조회하지 않습니다. 어떤 구간에서도 데이터를 받지 못한 심볼도
    /// 실패로 보고합니다.
    async fn backfill(&self, inputs: &[String], now: DateTime<Utc>) -> RegisterReport {
        let mut outcome = BatchOutcome::new();
        let mut stats = CollectionStats::new();

        let mut resolved = Vec::with_capacity(inputs.len());
        let mut errors: BTreeMap<usize, CollectorError> = BTreeMap::new();
        for (idx, input) in inputs.iter().enumerate() {
            match self.registry.resolve(input) {
                Ok(symbol) => resolved.push((idx, symbol)),
                Err(e) => {
                    errors.insert(idx, e.into());
                }
            }
        }

        let mut totals: BTreeMap<usize, Registered> = BTreeMap::new();
        let mut no_data: BTreeMap<usize, CollectorError> = BTreeMap::new();
        let mut first_request = true;

        for (start, end) in backfill_windows(now, self.config.backfill_years) {
            tracing::info!(start = %start, end = %end, "이력 구간 조회");

            for (idx, symbol) in &resolved {
                if errors.contains_key(idx) {
                    continue;
                }
                if !first_request {
                    tokio::time::sleep(self.config.request_delay()).await;
                }
                first_request = false;

                match self.register_symbol(symbol, start, end).await {
                    Ok(registered) => {
                        stats.add_fetch(registered.records, registered.skipped);
                        let total = totals.entry(*idx).or_insert_with(|| Registered {
                            symbol: symbol.clone(),
                            records: 0,
                            skipped: 0,
                        });
                        total.records += registered.records;
                        total.skipped += registered.skipped;
                    }
                    Err(e) if is_empty_window(&e) => {
                        tracing::debug!(symbol = %symbol, start = %start, error = %e, "데이터 없는 구간");
                        no_data.insert(*idx, e);
                    }
                    Err(e) => {
                        tracing::error!(symbol = %symbol, start = %start, error = %e, "이력 구간 등록 실패");
                        errors.insert(*idx, e);
                    }
                }
            }
        }

        for (idx, input) in inputs.iter().enumerate() {
            let failure = errors.remove(&idx).or_else(|| {
                if totals.contains_key(&idx) {
                    None
                } else {
                    no_data.remove(&idx)
                }
            });

            if let Some(err) = failure {
                tracing::error!(symbol = %input, error = %err, "등록 실패");
                outcome.push_failure(SymbolFailure::from_error(input.as_str(), &err));
            } else if let Some(registered) = totals.remove(&idx) {
                outcome.push_success(registered);
            }
        }

        RegisterReport { outcome, stats }
    }
}

/// 조회 구간에 데이터가 없다는 제공자 응답인지 확인합니다.
fn is_empty_window(err: &CollectorError) -> bool {
    matches!(
        err,
        CollectorError::DataSource(ExchangeError::ApiError { code: 400 | 404, .. })
    )
}

/// 현재부터 epoch까지 `years`년 단위 구간 (최신 구간부터).
///
/// 마지막 구간의 시작은 epoch에서 잘립니다.
pub fn backfill_windows(now: DateTime<Utc>, years: u32) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    let step = Months::new(years.max(1).saturating_mul(12));
    let mut windows = Vec::new();
    let mut end = now;

    while end > epoch {
        let start = end
            .checked_sub_months(step)
            .map_or(epoch, |start| start.max(epoch));
        windows.push((start, end));
        end = start;
    }

    windows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backfill_windows_walk_back_to_epoch() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let windows = backfill_windows(now, 5);

        assert_eq!(windows.first().unwrap().1, now);
        assert_eq!(
            windows.first().unwrap().0,
            Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(windows.last().unwrap().0, DateTime::<Utc>::UNIX_EPOCH);

        // 구간은 끊김 없이 이어짐
        for pair in windows.windows(2) {
            assert_eq!(pair[0].0, pair[1].1);
        }
        // 2024-06 → 1970-01: 54.4년 / 5년
        assert_eq!(windows.len(), 11);
    }

    #[test]
    fn test_only_missing_data_is_tolerated() {
        let not_found = CollectorError::from(ExchangeError::ApiError {
            code: 404,
            message: "No data found".to_string(),
        });
        assert!(is_empty_window(&not_found));

        let server = CollectorError::from(ExchangeError::ApiError {
            code: 500,
            message: "Internal Server Error".to_string(),
        });
        assert!(!is_empty_window(&server));

        let db = CollectorError::from(notify_data::DataError::ConnectionError(
            "db down".to_string(),
        ));
        assert!(!is_empty_window(&db));
    }

    #[test]
    fn test_backfill_windows_before_epoch_is_empty() {
        assert!(backfill_windows(DateTime::<Utc>::UNIX_EPOCH, 5).is_empty());
    }
}
