//! 매매일지 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 거래 JSON 파일 읽기와 설정 로딩
//! - 성과 리포트 출력 (JSON / 요약)
//! - 필터 선택지 조회

pub mod commands;
