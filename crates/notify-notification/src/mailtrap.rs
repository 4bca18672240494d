//! Mailtrap 전송 API를 통한 메일 발송.
//!
//! `POST {base}/api/send`에 Bearer 토큰과 JSON 본문을 보냅니다.

use crate::types::{MailMessage, MailSender, NotificationError, NotificationResult};
use async_trait::async_trait;
use notify_core::MailConfig;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// 기본 API 주소.
pub const DEFAULT_BASE_URL: &str = "https://send.api.mailtrap.io";

/// Mailtrap 전송 설정.
#[derive(Debug, Clone)]
pub struct MailtrapConfig {
    /// API 토큰
    pub api_token: String,
    /// API 기본 URL
    pub base_url: String,
}

impl MailtrapConfig {
    /// 새 설정을 생성합니다.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// API 주소를 지정합니다.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// 설정 파일의 `[mail]` 섹션으로 생성합니다.
    pub fn from_mail_config(config: &MailConfig) -> Self {
        Self::new(config.api_token.clone()).with_base_url(config.base_url.clone())
    }
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: Address<'a>,
    to: Vec<Address<'a>>,
    subject: &'a str,
    text: &'a str,
    category: &'a str,
}

impl<'a> SendRequest<'a> {
    fn from_message(message: &'a MailMessage) -> Self {
        Self {
            from: Address {
                email: &message.from,
                name: Some(&message.from_name),
            },
            to: vec![Address {
                email: &message.to,
                name: None,
            }],
            subject: &message.subject,
            text: &message.body,
            category: &message.category,
        }
    }
}

/// Mailtrap 메일 전송기.
pub struct MailtrapSender {
    config: MailtrapConfig,
    client: reqwest::Client,
}

impl MailtrapSender {
    /// 새 전송기를 생성합니다.
    pub fn new(config: MailtrapConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// 설정 파일의 `[mail]` 섹션으로 전송기를 생성합니다.
    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(MailtrapConfig::from_mail_config(config))
    }
}

#[async_trait]
impl MailSender for MailtrapSender {
    async fn send(&self, message: &MailMessage) -> NotificationResult<()> {
        if !self.is_enabled() {
            return Err(NotificationError::InvalidConfig(
                "mail api token is not configured".to_string(),
            ));
        }
        if message.from.is_empty() || message.to.is_empty() {
            return Err(NotificationError::InvalidConfig(
                "mail sender and recipient are required".to_string(),
            ));
        }

        let url = format!("{}/api/send", self.config.base_url);
        let body = serde_json::to_vec(&SendRequest::from_message(message))?;

        debug!(to = %message.to, subject = %message.subject, "Mailtrap 메일 전송");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(NotificationError::NetworkError)?;

        if response.status().is_success() {
            info!("Mailtrap 메일 전송 완료");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                warn!("Mailtrap rate limited");
                return Err(NotificationError::RateLimited(60));
            }

            error!("Failed to send mail: {} - {}", status, body);
            Err(NotificationError::SendFailed(format!(
                "HTTP {}: {}",
                status, body
            )))
        }
    }

    fn is_enabled(&self) -> bool {
        !self.config.api_token.is_empty()
    }

    fn name(&self) -> &str {
        "mailtrap"
    }
}
