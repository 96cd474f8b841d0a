//! 외부 재무 API 추상화.
//!
//! 검색/통계/차트/재무제표 엔드포인트를 가진 백엔드를 블랙박스로 취급합니다.
//! 세션 컨트롤러는 이 trait만 알고 있으며, HTTP 구현은 `finviz-data`에 있습니다.

use async_trait::async_trait;

use super::{ChartData, ChartType, Company, DetailedAnalysis, FinancialSnapshot, QuickInsights};
use super::{RegistryStats, YearRange};
use crate::error::ApiError;

/// 재무 데이터 제공자 trait.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct FixtureApi { snapshot: FinancialSnapshot }
///
/// #[async_trait]
/// impl FinancialApi for FixtureApi {
///     async fn fetch_snapshot(&self, _: &str, _: i32) -> Result<FinancialSnapshot, ApiError> {
///         Ok(self.snapshot.clone())
///     }
///     // ... 나머지 메서드 구현
/// }
/// ```
#[async_trait]
pub trait FinancialApi: Send + Sync {
    /// 회사명으로 검색합니다.
    ///
    /// # Errors
    ///
    /// - `ApiError::InvalidRequest`: 검색어가 비어 있음
    /// - `ApiError::Fetch`: 네트워크 연결 실패
    /// - `ApiError::Backend`: 백엔드가 실패로 응답함
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Company>, ApiError>;

    /// 고유번호로 회사 한 곳을 조회합니다.
    ///
    /// # Errors
    ///
    /// - `ApiError::Backend`: 해당 회사가 없음
    async fn company(&self, corp_code: &str) -> Result<Company, ApiError>;

    /// 무작위 회사 목록.
    async fn random(&self, limit: u32) -> Result<Vec<Company>, ApiError>;

    /// 레지스트리 통계.
    async fn stats(&self) -> Result<RegistryStats, ApiError>;

    /// 여러 연도에 걸친 차트 데이터.
    async fn fetch_chart(
        &self,
        corp_code: &str,
        chart_type: ChartType,
        years: &YearRange,
    ) -> Result<ChartData, ApiError>;

    /// 한 사업연도의 재무 스냅샷.
    async fn fetch_snapshot(&self, corp_code: &str, year: i32)
        -> Result<FinancialSnapshot, ApiError>;

    /// 한 사업연도의 빠른 인사이트.
    async fn fetch_insights(&self, corp_code: &str, year: i32) -> Result<QuickInsights, ApiError>;

    /// 여러 사업연도의 상세 분석.
    async fn fetch_analysis(
        &self,
        corp_code: &str,
        years: &YearRange,
    ) -> Result<DetailedAnalysis, ApiError>;

    /// 제공자 이름 (로깅용).
    fn provider_name(&self) -> &str;
}
