//! CLI 명령어 구현 모듈.

pub mod input;
pub mod options;
pub mod report;
pub mod summary;
