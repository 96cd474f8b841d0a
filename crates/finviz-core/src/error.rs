//! 시각화 엔진의 에러 타입.
//!
//! 세션/호출 순서 에러와 외부 재무 API 에러를 분리해서 정의합니다.
//! API 에러는 세션 컨트롤러 경계에서 슬롯의 `Errored` 상태로 변환되며
//! 그 바깥으로 전파되지 않습니다.

use thiserror::Error;

/// 세션 및 설정 에러.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VizError {
    /// 회사를 선택하기 전에 슬롯을 요청함
    #[error("선택된 회사가 없습니다")]
    NoActiveCompany,

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 세션 컨트롤러가 종료됨
    #[error("세션 컨트롤러가 종료되었습니다")]
    ControllerClosed,
}

/// 시각화 작업을 위한 Result 타입.
pub type VizResult<T> = Result<T, VizError>;

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for VizError {
    fn from(err: config::ConfigError) -> Self {
        VizError::Config(err.to_string())
    }
}

/// 외부 재무 API 에러.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 네트워크/전송 실패
    #[error("네트워크 에러: {0}")]
    Fetch(String),

    /// 백엔드가 `success: false`로 응답함
    #[error("{message}")]
    Backend { message: String },

    /// 응답 본문 해석 실패
    #[error("응답 파싱 에러: {0}")]
    Decode(String),

    /// 요청 전에 거부된 입력
    #[error("잘못된 요청: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// 백엔드 에러를 메시지로 생성합니다.
    pub fn backend(message: impl Into<String>) -> Self {
        ApiError::Backend {
            message: message.into(),
        }
    }

    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Fetch(_))
    }

    /// 사용자에게 보여줄 메시지.
    ///
    /// 백엔드가 보낸 메시지는 그대로, 전송 실패는 고정 문구로 바꿉니다.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend { message } => message.clone(),
            ApiError::Fetch(_) => "차트 데이터 로드 중 오류가 발생했습니다.".to_string(),
            ApiError::Decode(_) => "응답 데이터를 해석할 수 없습니다.".to_string(),
            ApiError::InvalidRequest(msg) => msg.clone(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
