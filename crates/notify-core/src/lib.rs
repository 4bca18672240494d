//! # Notify Core
//!
//! 주가 알림 파이프라인의 핵심 도메인 모델과 분석 로직을 제공합니다.
//!
//! 이 크레이트는 다른 모든 크레이트가 공유하는 기본 타입을 담고 있습니다:
//! - 심볼 레지스트리 (제공자 코드 / 정규 코드 / 표시 이름)
//! - 일별 가격 레코드와 종목 상세 정보
//! - 이동평균 및 종가 대비 비율 분석
//! - 심볼 단위 부분 실패 집계
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
