//! 재무 데이터 수집.
//!
//! 이 crate는 다음을 제공합니다:
//! - 기업 레지스트리 검색/통계 HTTP 클라이언트
//! - 연도별 재무제표 스냅샷, 차트 시계열 조회
//! - 재무 인사이트/상세 분석 조회
//!
//! 모든 조회 결과는 `finviz_core::FinancialApi` 계약으로 노출됩니다.

pub mod error;
pub mod provider;

pub use error::{DataError, Result};
pub use provider::{RegistryApiClient, MULTI_YEAR_MAX, RANDOM_LIMIT_MAX, SEARCH_LIMIT_MAX};
