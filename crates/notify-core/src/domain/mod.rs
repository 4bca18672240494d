//! 도메인 모델.

mod batch;
mod instrument;
mod price;
mod series;

pub use batch::*;
pub use instrument::*;
pub use price::*;
pub use series::*;
