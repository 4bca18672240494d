//! 핵심 도메인 에러 타입.
//!
//! 파이프라인의 모든 실패는 [`ErrorKind`] 중 하나로 분류됩니다.
//! 하위 크레이트의 에러도 [`Classify`]를 구현하여 같은 분류 체계를 공유합니다.

use crate::types::SymbolColumn;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// 실패 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 어떤 표현으로도 매핑되지 않는 심볼
    UnresolvableSymbol,
    /// result/quote 블록 누락 또는 배열 길이 불일치
    MalformedResponse,
    /// 하루치 시세가 양수 조건을 만족하지 않음
    InvalidTick,
    /// 지원하지 않는 통화 코드
    UnknownCurrency,
    /// 데이터 소스 또는 메일 전송 에러
    Transport,
    /// 저장소 에러
    Persistence,
    /// 분석 계산 에러 (빈 시리즈 등)
    Analytics,
    /// 설정 에러
    Config,
}

impl ErrorKind {
    /// 해당 날짜만 건너뛰고 나머지를 계속 처리할 수 있는지 확인합니다.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorKind::InvalidTick)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::UnresolvableSymbol => "unresolvable_symbol",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::InvalidTick => "invalid_tick",
            ErrorKind::UnknownCurrency => "unknown_currency",
            ErrorKind::Transport => "transport",
            ErrorKind::Persistence => "persistence",
            ErrorKind::Analytics => "analytics",
            ErrorKind::Config => "config",
        };
        write!(f, "{}", s)
    }
}

/// 에러를 [`ErrorKind`]로 분류하는 trait.
pub trait Classify {
    /// 에러 분류를 반환합니다.
    fn kind(&self) -> ErrorKind;
}

/// 심볼 레지스트리 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// 지원하지 않는 심볼
    #[error("지원하지 않는 심볼: {input}")]
    Unsupported { input: String },

    /// 서로 다른 항목이 같은 값을 사용 (컬럼이 달라도 중복)
    #[error("심볼 테이블 중복 ({column}): {value}")]
    Duplicate { column: SymbolColumn, value: String },
}

impl SymbolError {
    pub(crate) fn unsupported(input: impl Into<String>) -> Self {
        SymbolError::Unsupported {
            input: input.into(),
        }
    }
}

impl Classify for SymbolError {
    fn kind(&self) -> ErrorKind {
        match self {
            SymbolError::Unsupported { .. } => ErrorKind::UnresolvableSymbol,
            SymbolError::Duplicate { .. } => ErrorKind::Config,
        }
    }
}

/// 레코드 생성 시 검증 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 0 이하의 가격
    #[error("{field} 값은 양수여야 합니다: {value}")]
    NonPositive { field: &'static str, value: Decimal },

    /// NaN/무한대 또는 누락된 값
    #[error("{field} 값이 유효한 숫자가 아닙니다")]
    NonFinite { field: &'static str },

    /// Decimal로 표현할 수 없는 값
    #[error("{field} 값이 표현 범위를 벗어났습니다: {value}")]
    OutOfRange { field: &'static str, value: String },

    /// 알 수 없는 통화
    #[error("알 수 없는 통화: {0}")]
    UnknownCurrency(String),
}

impl Classify for ValidationError {
    fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::UnknownCurrency(_) => ErrorKind::UnknownCurrency,
            _ => ErrorKind::InvalidTick,
        }
    }
}

/// 분석 엔진 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// 레코드가 없는 시리즈
    #[error("가격 레코드가 없습니다: {symbol}")]
    EmptySeries { symbol: String },

    /// 평균이 0
    #[error("종가 평균이 0입니다: {symbol}")]
    ZeroAverage { symbol: String },

    /// Decimal 연산 오버플로
    #[error("계산 오버플로: {symbol}")]
    Overflow { symbol: String },

    /// 다른 심볼의 레코드가 섞여 있음
    #[error("심볼 불일치: 기대값 {expected}, 실제값 {found}")]
    SymbolMismatch { expected: String, found: String },

    /// 표시 이름 조회 실패
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

impl Classify for AnalyticsError {
    fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::Symbol(e) => e.kind(),
            _ => ErrorKind::Analytics,
        }
    }
}

/// 심볼 하나의 실패 기록.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFailure {
    /// 실패한 입력 (심볼 코드 또는 사용자 입력 원문)
    pub symbol: String,
    /// 실패 분류
    pub kind: ErrorKind,
    /// 에러 메시지
    pub reason: String,
}

impl SymbolFailure {
    /// 분류 가능한 에러로부터 실패 기록을 생성합니다.
    pub fn from_error<E>(symbol: impl Into<String>, err: &E) -> Self
    where
        E: Classify + fmt::Display + ?Sized,
    {
        Self {
            symbol: symbol.into(),
            kind: err.kind(),
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for SymbolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.symbol, self.reason)
    }
}

/// 여러 심볼을 처리한 뒤 남은 실패 목록.
///
/// 실패는 입력 순서대로 보존됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}개 심볼 처리 실패: {}", .failures.len(), join_failures(.failures))]
pub struct BatchError {
    pub failures: Vec<SymbolFailure>,
}

impl BatchError {
    /// 실패한 심볼 목록.
    pub fn symbols(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.symbol.as_str()).collect()
    }
}

fn join_failures(failures: &[SymbolFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
