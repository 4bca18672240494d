//! 수집 및 요약 모듈.

pub mod register;
pub mod series_source;

pub use register::{backfill_windows, RegisterMode, RegisterReport, Registered, Registrar};
pub use series_source::{LiveSeriesSource, StoredSeriesSource};
