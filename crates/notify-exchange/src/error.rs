//! 시세 조회 에러 타입.

use crate::normalize::NormalizeError;
use notify_core::{Classify, ErrorKind, SymbolError};
use thiserror::Error;

/// 시세 데이터 조회 관련 에러.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 요청 한도 초과
    #[error("Rate limit exceeded")]
    RateLimited,

    /// HTTP 상태 코드 에러
    #[error("API error {code}: {message}")]
    ApiError { code: i32, message: String },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 잘못된 클라이언트 설정
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// 알 수 없는 에러
    #[error("Unknown error: {0}")]
    Unknown(String),

    /// 응답 정규화 실패
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// 심볼 해석 실패
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

impl ExchangeError {
    /// 재시도 가능한 에러인지 확인.
    ///
    /// 내부에서 재시도하지 않으며, 호출자가 판단할 때 사용합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExchangeError::NetworkError(_) | ExchangeError::RateLimited | ExchangeError::Timeout(_)
        )
    }
}

impl Classify for ExchangeError {
    fn kind(&self) -> ErrorKind {
        match self {
            ExchangeError::Normalize(e) => e.kind(),
            ExchangeError::Symbol(e) => e.kind(),
            ExchangeError::ParseError(_) => ErrorKind::MalformedResponse,
            ExchangeError::InvalidConfig(_) => ErrorKind::Config,
            _ => ErrorKind::Transport,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(err.to_string())
        } else if err.is_connect() || err.is_request() {
            ExchangeError::NetworkError(err.to_string())
        } else if err.is_decode() {
            ExchangeError::ParseError(err.to_string())
        } else {
            ExchangeError::Unknown(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
