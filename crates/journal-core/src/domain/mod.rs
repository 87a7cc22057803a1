//! 매매일지 분석을 위한 도메인 모델.

mod metric;
mod trade;

pub use metric::*;
pub use trade::*;
