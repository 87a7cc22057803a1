//! 매매일지 시스템을 위한 공통 타입.

mod decimal;
mod instrument;

pub use decimal::*;
pub use instrument::*;
