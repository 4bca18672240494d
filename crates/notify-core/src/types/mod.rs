//! 파이프라인 전반에서 사용되는 공통 타입.

mod currency;
mod decimal;
mod interval;
mod symbol;

pub use currency::*;
pub use decimal::*;
pub use interval::*;
pub use symbol::*;
