//! 데이터 모듈 오류 타입.

use finviz_core::ApiError;
use thiserror::Error;

/// 데이터 수집 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP 클라이언트 생성 실패
    #[error("Client build error: {0}")]
    ClientError(String),

    /// 네트워크/전송 실패
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 성공이 아닌 HTTP 상태 코드 (봉투를 해석할 수 없는 경우)
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// 백엔드가 `success: false`로 응답함
    #[error("{0}")]
    Backend(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 요청 전에 거부된 입력
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DataError::SerializationError(err.to_string())
        } else {
            DataError::FetchError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::ClientError(msg) | DataError::FetchError(msg) => ApiError::Fetch(msg),
            DataError::HttpStatus { status, body } => {
                ApiError::Fetch(format!("HTTP {}: {}", status, body))
            }
            DataError::Backend(message) => ApiError::Backend { message },
            DataError::SerializationError(msg) => ApiError::Decode(msg),
            DataError::InvalidInput(msg) => ApiError::InvalidRequest(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
