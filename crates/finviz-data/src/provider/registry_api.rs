//! 기업 레지스트리/재무제표 백엔드 클라이언트.
//!
//! 백엔드는 공시 원본을 억원 단위로 환산한 뒤 모든 응답을 다음 봉투로 감싸 보냅니다.
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "..." }
//! ```
//!
//! `success: false`이면 HTTP 상태 코드와 관계없이 `message`를 그대로 에러로 전달합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use finviz_data::RegistryApiClient;
//! use finviz_core::FinancialApi;
//!
//! let client = RegistryApiClient::new("http://127.0.0.1:5000")?;
//! let companies = client.search("삼성", 10).await?;
//! let snapshot = client.fetch_snapshot("00126380", 2022).await?;
//! ```

use async_trait::async_trait;
use finviz_core::{
    ApiConfig, ApiError, ChartData, ChartType, Company, DetailedAnalysis, FinancialApi,
    FinancialSnapshot, QuickInsights, RegistryStats, YearRange,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{DataError, Result};

/// 검색 결과 최대 개수.
pub const SEARCH_LIMIT_MAX: u32 = 100;
/// 랜덤 목록 최대 개수.
pub const RANDOM_LIMIT_MAX: u32 = 20;

/// 다년도 조회 최대 연도 수.
pub const MULTI_YEAR_MAX: usize = 5;

/// 사업보고서 코드.
const ANNUAL_REPORT_CODE: &str = "11011";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SEARCH_LIMIT: u32 = 50;
const DEFAULT_RANDOM_LIMIT: u32 = 8;

/// 응답 봉투.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiEnvelope {
    fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        if !self.success {
            return Err(DataError::Backend(
                self.message
                    .unwrap_or_else(|| "요청을 처리하지 못했습니다.".to_string()),
            ));
        }
        let data = self
            .data
            .ok_or_else(|| DataError::SerializationError("응답에 data가 없습니다".to_string()))?;
        Ok(serde_json::from_value(data)?)
    }
}

/// `/api/financial/{corp_code}` 응답 데이터.
#[derive(Debug, Deserialize)]
struct FinancialPayload {
    financial_data: FinancialSnapshot,
}

/// `/api/financial/multi/{corp_code}` 응답 데이터.
#[derive(Debug, Deserialize)]
struct MultiYearPayload {
    /// 연도 → 스냅샷. 공시가 없는 연도는 `null`
    years_data: BTreeMap<String, Option<FinancialSnapshot>>,
}

/// `/api/financial/chart/{corp_code}` 응답 데이터.
#[derive(Debug, Deserialize)]
struct ChartPayload {
    chart_data: ChartData,
}

/// `/api/ai-insights/{corp_code}` 응답 데이터.
#[derive(Debug, Deserialize)]
struct InsightsPayload {
    insights: QuickInsights,
}

/// 레지스트리 백엔드 HTTP 클라이언트.
#[derive(Debug, Clone)]
pub struct RegistryApiClient {
    client: reqwest::Client,
    base_url: String,
    search_limit: u32,
    random_limit: u32,
}

impl RegistryApiClient {
    /// 기본 타임아웃(30초)으로 클라이언트를 생성합니다.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// 타임아웃을 지정해 클라이언트를 생성합니다.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            random_limit: DEFAULT_RANDOM_LIMIT,
        })
    }

    /// 설정에서 클라이언트를 생성합니다.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let mut client = Self::with_timeout(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        client.search_limit = config.search_limit.clamp(1, SEARCH_LIMIT_MAX);
        client.random_limit = config.random_limit.clamp(1, RANDOM_LIMIT_MAX);
        Ok(client)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 0이면 기본값, 그 외에는 `[1, max]`로 제한합니다.
    fn effective_limit(requested: u32, default: u32, max: u32) -> u32 {
        if requested == 0 {
            default
        } else {
            requested.min(max)
        }
    }

    /// GET 요청 후 봉투를 풀어 `data`를 반환합니다.
    async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(url = %url, params = ?params, "레지스트리 API 요청");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // 백엔드는 에러 상태 코드에도 봉투를 실어 보냅니다.
        match serde_json::from_str::<ApiEnvelope>(&body) {
            Ok(envelope) => envelope.into_data(),
            Err(_) if !status.is_success() => Err(DataError::HttpStatus {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// 회사명으로 검색합니다. 빈 검색어는 요청하지 않고 거부합니다.
    pub async fn search_companies(&self, query: &str, limit: u32) -> Result<Vec<Company>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DataError::InvalidInput("검색어를 입력해주세요.".to_string()));
        }
        let limit = Self::effective_limit(limit, self.search_limit, SEARCH_LIMIT_MAX);

        let companies: Vec<Company> = self
            .get(
                "/api/search",
                &[("q", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        tracing::info!(query = query, count = companies.len(), "회사 검색 완료");
        Ok(companies)
    }

    /// 고유번호로 회사 정보를 조회합니다.
    pub async fn company_by_code(&self, corp_code: &str) -> Result<Company> {
        let corp_code = corp_code.trim();
        if corp_code.is_empty() {
            return Err(DataError::InvalidInput("회사 고유번호가 비어 있습니다".to_string()));
        }
        self.get(&format!("/api/company/{}", corp_code), &[]).await
    }

    /// 무작위 추천 회사 목록.
    pub async fn random_companies(&self, limit: u32) -> Result<Vec<Company>> {
        let limit = Self::effective_limit(limit, self.random_limit, RANDOM_LIMIT_MAX);
        let companies: Vec<Company> = self
            .get("/api/random", &[("limit", limit.to_string())])
            .await?;

        tracing::debug!(count = companies.len(), "랜덤 회사 조회 완료");
        Ok(companies)
    }

    /// 레지스트리 통계.
    pub async fn registry_stats(&self) -> Result<RegistryStats> {
        self.get("/api/stats", &[]).await
    }

    /// 한 사업연도의 재무제표 스냅샷 (사업보고서 기준).
    pub async fn financial_snapshot(&self, corp_code: &str, year: i32) -> Result<FinancialSnapshot> {
        let payload: FinancialPayload = self
            .get(
                &format!("/api/financial/{}", corp_code),
                &[
                    ("year", year.to_string()),
                    ("reprt_code", ANNUAL_REPORT_CODE.to_string()),
                ],
            )
            .await?;

        tracing::debug!(
            corp_code = corp_code,
            year = year,
            balance_sheet = payload.financial_data.balance_sheet.len(),
            income_statement = payload.financial_data.income_statement.len(),
            "재무제표 조회 완료"
        );
        Ok(payload.financial_data)
    }

    /// 여러 사업연도의 재무제표 스냅샷 (최대 5개 연도).
    ///
    /// 공시가 없는 연도는 `None`입니다.
    pub async fn multi_year_snapshots(
        &self,
        corp_code: &str,
        years: &YearRange,
    ) -> Result<BTreeMap<i32, Option<FinancialSnapshot>>> {
        if years.years().len() > MULTI_YEAR_MAX {
            return Err(DataError::InvalidInput(format!(
                "최대 {}년까지만 조회 가능합니다.",
                MULTI_YEAR_MAX
            )));
        }

        let payload: MultiYearPayload = self
            .get(
                &format!("/api/financial/multi/{}", corp_code),
                &[
                    ("years", years.to_query()),
                    ("reprt_code", ANNUAL_REPORT_CODE.to_string()),
                ],
            )
            .await?;

        payload
            .years_data
            .into_iter()
            .map(|(year, snapshot)| -> Result<(i32, Option<FinancialSnapshot>)> {
                let parsed = year.trim().parse::<i32>().map_err(|_| {
                    DataError::SerializationError(format!("잘못된 연도 키: {}", year))
                })?;
                Ok((parsed, snapshot))
            })
            .collect()
    }

    /// 여러 사업연도의 차트 시계열.
    pub async fn chart_data(
        &self,
        corp_code: &str,
        chart_type: ChartType,
        years: &YearRange,
    ) -> Result<ChartData> {
        let payload: ChartPayload = self
            .get(
                &format!("/api/financial/chart/{}", corp_code),
                &[
                    ("years", years.to_query()),
                    ("type", chart_type.as_query().to_string()),
                ],
            )
            .await?;

        tracing::debug!(
            corp_code = corp_code,
            chart_type = %chart_type,
            labels = payload.chart_data.labels.len(),
            datasets = payload.chart_data.datasets.len(),
            "차트 데이터 조회 완료"
        );
        Ok(payload.chart_data)
    }

    /// 한 사업연도의 빠른 인사이트.
    pub async fn quick_insights(&self, corp_code: &str, year: i32) -> Result<QuickInsights> {
        let payload: InsightsPayload = self
            .get(
                &format!("/api/ai-insights/{}", corp_code),
                &[("year", year.to_string())],
            )
            .await?;
        Ok(payload.insights)
    }

    /// 여러 사업연도의 상세 분석.
    pub async fn detailed_analysis(
        &self,
        corp_code: &str,
        years: &YearRange,
    ) -> Result<DetailedAnalysis> {
        self.get(
            &format!("/api/ai-analysis/{}", corp_code),
            &[("years", years.to_query())],
        )
        .await
    }
}

#[async_trait]
impl FinancialApi for RegistryApiClient {
    async fn search(&self, query: &str, limit: u32) -> std::result::Result<Vec<Company>, ApiError> {
        Ok(self.search_companies(query, limit).await?)
    }

    async fn company(&self, corp_code: &str) -> std::result::Result<Company, ApiError> {
        Ok(self.company_by_code(corp_code).await?)
    }

    async fn random(&self, limit: u32) -> std::result::Result<Vec<Company>, ApiError> {
        Ok(self.random_companies(limit).await?)
    }

    async fn stats(&self) -> std::result::Result<RegistryStats, ApiError> {
        Ok(self.registry_stats().await?)
    }

    async fn fetch_chart(
        &self,
        corp_code: &str,
        chart_type: ChartType,
        years: &YearRange,
    ) -> std::result::Result<ChartData, ApiError> {
        Ok(self.chart_data(corp_code, chart_type, years).await?)
    }

    async fn fetch_snapshot(
        &self,
        corp_code: &str,
        year: i32,
    ) -> std::result::Result<FinancialSnapshot, ApiError> {
        Ok(self.financial_snapshot(corp_code, year).await?)
    }

    async fn fetch_insights(
        &self,
        corp_code: &str,
        year: i32,
    ) -> std::result::Result<QuickInsights, ApiError> {
        Ok(self.quick_insights(corp_code, year).await?)
    }

    async fn fetch_analysis(
        &self,
        corp_code: &str,
        years: &YearRange,
    ) -> std::result::Result<DetailedAnalysis, ApiError> {
        Ok(self.detailed_analysis(corp_code, years).await?)
    }

    fn provider_name(&self) -> &str {
        "registry"
    }
}
