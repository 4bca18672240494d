//! 일일 시장 요약 메일.
//!
//! 심볼마다 시계열을 가져와 요약 문단을 만들고, 성공한 문단을 빈 줄로
//! 이어 붙여 한 통의 메일로 보냅니다. 심볼 하나의 실패는 기록만 하고
//! 나머지 심볼은 계속 처리하지만, 메일 전송 실패는 전체 실패입니다.

use crate::types::{MailMessage, MailSender, NotificationError};
use async_trait::async_trait;
use chrono::{DateTime, Months, Utc};
use notify_core::{
    BatchError, BatchOutcome, Classify, ErrorKind, MailConfig, StockSeries, Symbol,
    SymbolFailure, SymbolRegistry,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// 시계열 조회 실패.
///
/// 저장소나 차트 API의 에러를 분류와 메시지만 남겨 전달합니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SourceError {
    kind: ErrorKind,
    message: String,
}

impl SourceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 분류 가능한 에러를 감쌉니다.
    pub fn wrap<E>(err: &E) -> Self
    where
        E: Classify + fmt::Display + ?Sized,
    {
        Self::new(err.kind(), err.to_string())
    }
}

impl Classify for SourceError {
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// 요약에 사용할 시계열 공급자.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// 기간 내 종목 상세 정보와 일별 레코드를 가져옵니다.
    async fn load_series(
        &self,
        symbol: &Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<StockSeries, SourceError>;

    /// 공급자 이름.
    fn name(&self) -> &str;
}

/// 요약 메일 에러.
#[derive(Debug, Error)]
pub enum DigestError {
    /// 요약할 심볼이 하나도 성공하지 못함
    #[error("요약할 데이터가 없습니다: {0}")]
    NothingToSend(BatchError),

    /// 메일 전송 실패
    #[error("요약 메일 전송 실패: {0}")]
    Transport(#[from] NotificationError),

    /// 일부 심볼 실패 (메일은 전송됨)
    #[error(transparent)]
    Partial(#[from] BatchError),
}

impl Classify for DigestError {
    fn kind(&self) -> ErrorKind {
        match self {
            DigestError::Transport(err) => err.kind(),
            DigestError::NothingToSend(err) | DigestError::Partial(err) => err
                .failures
                .first()
                .map(|f| f.kind)
                .unwrap_or(ErrorKind::Analytics),
        }
    }
}

/// 요약 메일 발송 결과.
#[derive(Debug, Clone)]
pub struct DigestReport {
    /// 메일 제목
    pub subject: String,
    /// 메일 본문
    pub body: String,
    /// 본문에 포함된 심볼
    pub delivered: Vec<Symbol>,
    /// 실패한 심볼
    pub failures: Vec<SymbolFailure>,
}

impl DigestReport {
    /// 실패가 남아 있으면 묶어서 에러로 반환합니다.
    pub fn into_result(self) -> Result<Self, DigestError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(DigestError::Partial(BatchError {
                failures: self.failures,
            }))
        }
    }
}

/// 현재 시각 공급자.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// 메일 발신/수신 정보.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub category: String,
}

impl Envelope {
    pub fn from_config(config: &MailConfig) -> Self {
        Self {
            from: config.from.clone(),
            from_name: config.from_name.clone(),
            to: config.to.clone(),
            category: config.category.clone(),
        }
    }
}

/// 조회 기간 기본값: 오늘로 끝나는 최근 12개월.
pub const DEFAULT_WINDOW_MONTHS: u32 = 12;

/// 요약 메일 작성 및 발송기.
pub struct DigestNotifier {
    sender: Arc<dyn MailSender>,
    source: Arc<dyn SeriesSource>,
    registry: SymbolRegistry,
    envelope: Envelope,
    clock: Clock,
    window_months: u32,
}

impl DigestNotifier {
    pub fn new(
        sender: Arc<dyn MailSender>,
        source: Arc<dyn SeriesSource>,
        registry: SymbolRegistry,
        envelope: Envelope,
    ) -> Self {
        Self {
            sender,
            source,
            registry,
            envelope,
            clock: Arc::new(Utc::now),
            window_months: DEFAULT_WINDOW_MONTHS,
        }
    }

    /// 현재 시각 공급자를 교체합니다.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// 조회 기간(개월)을 지정합니다.
    pub fn with_window_months(mut self, months: u32) -> Self {
        self.window_months = months;
        self
    }

    /// 제목: `Market Summary {Month DD YYYY}`.
    pub fn subject(now: DateTime<Utc>) -> String {
        format!("Market Summary {}", now.format("%B %d %Y"))
    }

    /// 현재 시각 기준 기본 조회 기간.
    pub fn default_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = (self.clock)();
        let start = end
            .checked_sub_months(Months::new(self.window_months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        (start, end)
    }

    /// 기본 조회 기간으로 요약 메일을 보냅니다.
    pub async fn send_digest(&self, symbols: &[Symbol]) -> Result<DigestReport, DigestError> {
        let (start, end) = self.default_window();
        self.build_and_send(symbols, start, end).await
    }

    /// 심볼 순서대로 요약 문단을 만들어 한 통의 메일로 보냅니다.
    ///
    /// 한 심볼도 성공하지 못하면 메일을 보내지 않고 실패 목록을 반환합니다.
    #[instrument(skip(self, symbols), fields(symbols = symbols.len(), source = self.source.name()))]
    pub async fn build_and_send(
        &self,
        symbols: &[Symbol],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<DigestReport, DigestError> {
        let mut outcome: BatchOutcome<(Symbol, String)> = BatchOutcome::new();

        for symbol in symbols {
            match self.digest_for(symbol, start, end).await {
                Ok(message) => outcome.push_success((symbol.clone(), message)),
                Err(err) => {
                    warn!(symbol = %symbol, error = %err, "요약 작성 실패");
                    outcome.push_failure(SymbolFailure::from_error(symbol.as_str(), &err));
                }
            }
        }

        let (successes, failures) = outcome.into_parts();
        if successes.is_empty() {
            return Err(DigestError::NothingToSend(BatchError { failures }));
        }

        let (delivered, messages): (Vec<Symbol>, Vec<String>) = successes.into_iter().unzip();
        let subject = Self::subject((self.clock)());
        let body = messages.join("\n\n");

        let message = MailMessage {
            from: self.envelope.from.clone(),
            from_name: self.envelope.from_name.clone(),
            to: self.envelope.to.clone(),
            subject: subject.clone(),
            body: body.clone(),
            category: self.envelope.category.clone(),
        };
        self.sender.send(&message).await?;

        info!(
            sender = self.sender.name(),
            delivered = delivered.len(),
            failed = failures.len(),
            "요약 메일 전송 완료"
        );

        Ok(DigestReport {
            subject,
            body,
            delivered,
            failures,
        })
    }

    async fn digest_for(
        &self,
        symbol: &Symbol,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String, SourceError> {
        let series = self.source.load_series(symbol, start, end).await?;
        series
            .digest_message(&self.registry)
            .map_err(|e| SourceError::wrap(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_subject_uses_full_month_name() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert_eq!(
            DigestNotifier::subject(now),
            "Market Summary October 19 2026"
        );

        let now = Utc.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
        assert_eq!(DigestNotifier::subject(now), "Market Summary March 05 2024");
    }

    #[test]
    fn test_source_error_keeps_kind() {
        let err = SourceError::new(ErrorKind::Persistence, "symbol N225 not found");
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert_eq!(err.to_string(), "symbol N225 not found");
    }
}
