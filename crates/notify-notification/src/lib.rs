//! # Notify Notification
//!
//! 시장 요약 메일 작성과 전송.
//!
//! - [`MailSender`]: 메일 전송기 trait
//! - [`MailtrapSender`]: Mailtrap HTTP API 구현
//! - [`DigestNotifier`]: 심볼별 요약 문단 작성 및 발송

pub mod digest;
pub mod mailtrap;
pub mod types;

pub use digest::*;
pub use mailtrap::*;
pub use types::*;
