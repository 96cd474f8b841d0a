//! 데이터 Provider 모듈.
//!
//! ## 레지스트리 백엔드
//! - `RegistryApiClient`: 기업 검색, 통계, 재무제표, 차트 데이터 HTTP 클라이언트
//! - 응답은 `{success, data, message}` 형식의 봉투로 감싸져 있습니다.

pub mod registry_api;

pub use registry_api::{RegistryApiClient, MULTI_YEAR_MAX, RANDOM_LIMIT_MAX, SEARCH_LIMIT_MAX};
