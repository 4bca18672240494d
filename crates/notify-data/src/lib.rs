//! # Notify Data
//!
//! 일별 가격 레코드와 종목 상세 정보의 저장/조회를 담당합니다.
//!
//! - [`PriceStore`] / [`InstrumentStore`]: 파이프라인이 사용하는 저장소 trait
//! - [`PgStore`]: PostgreSQL 구현 (UNNEST 일괄 upsert)
//! - [`MemoryStore`]: 메모리 구현

pub mod error;
pub mod storage;
pub mod traits;

pub use error::{DataError, Result};
pub use storage::{MemoryStore, PgStore};
pub use traits::{InstrumentStore, PriceStore, StockRepository};
