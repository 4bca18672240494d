//! # Notify Exchange
//!
//! 외부 시세 API 연동과 응답 정규화를 담당합니다.
//!
//! - [`chart`]: 차트 API 응답 구조체
//! - [`normalize`]: 응답 → 종목 상세 정보 + 일별 레코드
//! - [`ChartSource`]: 데이터 소스 trait
//! - [`YahooChartClient`]: Yahoo Finance 구현

pub mod chart;
pub mod error;
pub mod normalize;
pub mod traits;
pub mod yahoo;

pub use chart::ChartResponse;
pub use error::{ExchangeError, Result};
pub use normalize::{normalize, resolve_previous_close, NormalizeError, NormalizedChart, SkippedTick};
pub use traits::{fetch_normalized, ChartSource};
pub use yahoo::YahooChartClient;
