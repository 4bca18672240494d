//! notify-stock 수집기.
//!
//! 이 crate는 다음 작업을 수행하는 바이너리를 제공합니다:
//! - 일별 시세 등록 (최근 1주 또는 전체 이력)
//! - 지원 종목 일괄 갱신
//! - 시장 요약 메일 발송

pub mod error;
pub mod modules;
pub mod stats;

pub use error::{CollectorError, Result};
pub use stats::CollectionStats;
