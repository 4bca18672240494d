//! 메일 타입 및 trait 정의.

use async_trait::async_trait;
use notify_core::{Classify, ErrorKind};
use serde::{Deserialize, Serialize};

/// 전송할 메일 한 통.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// 발신 주소
    pub from: String,
    /// 발신자 이름
    pub from_name: String,
    /// 수신 주소
    pub to: String,
    /// 제목
    pub subject: String,
    /// 본문 (plain text)
    pub body: String,
    /// 분류용 카테고리
    pub category: String,
}

/// 알림 작업용 Result 타입.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// 알림 에러.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("알림 전송 실패: {0}")]
    SendFailed(String),

    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    #[error("요청 한도 초과: {0}초 후 재시도")]
    RateLimited(u64),

    #[error("네트워크 에러: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("직렬화 에러: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl Classify for NotificationError {
    fn kind(&self) -> ErrorKind {
        match self {
            NotificationError::InvalidConfig(_) => ErrorKind::Config,
            _ => ErrorKind::Transport,
        }
    }
}

/// 메일 전송기 trait.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// 메일을 전송합니다.
    async fn send(&self, message: &MailMessage) -> NotificationResult<()>;

    /// 전송기가 활성화되어 있는지 확인합니다.
    fn is_enabled(&self) -> bool;

    /// 전송기 이름을 반환합니다.
    fn name(&self) -> &str;
}
