//! # Journal Core
//!
//! 매매일지 성과 분석 시스템의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 엔진과 CLI 전반에서 사용되는 기본 타입을 제공합니다:
//! - 원시 거래 기록 및 정규화된 거래 타입
//! - 핍/가치핍 쌍 및 지표 값 타입
//! - 종목별 핍 배율 및 가치 배수 테이블
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
