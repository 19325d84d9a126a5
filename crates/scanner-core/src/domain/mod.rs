//! 스캐너 도메인 모델.

mod classification;
mod price_series;
mod ticker;

pub use classification::*;
pub use price_series::*;
pub use ticker::*;
