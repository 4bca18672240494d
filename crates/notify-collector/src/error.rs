//! 에러 타입 정의.

use notify_core::{BatchError, Classify, ErrorKind, SymbolError};
use notify_data::DataError;
use notify_exchange::ExchangeError;
use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 지원하지 않는 심볼
    Symbol(SymbolError),
    /// 데이터 소스 에러
    DataSource(ExchangeError),
    /// 저장소 에러
    Database(DataError),
    /// 여러 심볼 중 일부 실패
    Batch(BatchError),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symbol(e) => write!(f, "Symbol error: {}", e),
            Self::DataSource(e) => write!(f, "Data source error: {}", e),
            Self::Database(e) => write!(f, "Database error: {}", e),
            Self::Batch(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CollectorError {}

impl Classify for CollectorError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Symbol(e) => e.kind(),
            Self::DataSource(e) => e.kind(),
            Self::Database(e) => e.kind(),
            Self::Batch(e) => e
                .failures
                .first()
                .map(|f| f.kind)
                .unwrap_or(ErrorKind::Transport),
        }
    }
}

impl From<SymbolError> for CollectorError {
    fn from(err: SymbolError) -> Self {
        Self::Symbol(err)
    }
}

impl From<ExchangeError> for CollectorError {
    fn from(err: ExchangeError) -> Self {
        Self::DataSource(err)
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::Database(err)
    }
}

impl From<BatchError> for CollectorError {
    fn from(err: BatchError) -> Self {
        Self::Batch(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
