//! 매매일지 시스템의 에러 타입.
//!
//! 분석 엔진 자체는 실패하지 않습니다 (잘못된 값은 0으로 대체).
//! 이 에러 타입은 설정 로드, 필터 선택자 파싱, 입력 파일 읽기 등
//! 엔진 바깥 경계에서만 사용됩니다.

use thiserror::Error;

/// 매매일지 에러.
#[derive(Debug, Error)]
pub enum JournalError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(String),
}

/// 매매일지 작업을 위한 Result 타입.
pub type JournalResult<T> = Result<T, JournalError>;

impl JournalError {
    /// 사용자 입력 수정으로 해결 가능한 에러인지 확인합니다.
    pub fn is_user_error(&self) -> bool {
        matches!(self, JournalError::InvalidInput(_) | JournalError::Config(_))
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for JournalError {
    fn from(err: config::ConfigError) -> Self {
        JournalError::Config(err.to_string())
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_classification() {
        let input_err = JournalError::InvalidInput("bad range".to_string());
        assert!(input_err.is_user_error());

        let io_err = JournalError::Io("disk".to_string());
        assert!(!io_err.is_user_error());
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let converted: JournalError = err.into();
        assert!(matches!(converted, JournalError::Serialization(_)));
    }
}
