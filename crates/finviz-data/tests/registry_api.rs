//! RegistryApiClient HTTP 통합 테스트
//!
//! mockito 서버로 백엔드 봉투 형식과 에러 매핑을 확인합니다.

use finviz_core::{ApiError, ChartType, FinancialApi, StatementLine, YearRange};
use finviz_data::RegistryApiClient;
use mockito::Matcher;
use rust_decimal_macros::dec;

fn client_for(server: &mockito::ServerGuard) -> RegistryApiClient {
    RegistryApiClient::new(server.url()).unwrap()
}

#[tokio::test]
async fn test_search_clamps_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "삼성".into()),
            Matcher::UrlEncoded("limit".into(), "100".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "success": true,
                "message": "2개의 검색 결과를 찾았습니다.",
                "data": [
                    {"corp_code": "00126380", "corp_name": "삼성전자", "corp_eng_name": "SAMSUNG ELECTRONICS CO,.LTD", "stock_code": "005930", "modify_date": "20240101"},
                    {"corp_code": "00000001", "corp_name": "삼성테스트", "corp_eng_name": "", "stock_code": "", "modify_date": "20231231"}
                ],
                "query": "삼성",
                "count": 2
            }"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let companies = client.search(" 삼성 ", 500).await.unwrap();

    mock.assert_async().await;
    assert_eq!(companies.len(), 2);
    assert!(companies[0].is_listed());
    assert!(!companies[1].is_listed());
    assert_eq!(companies[1].corp_eng_name, None);
}

#[tokio::test]
async fn test_empty_query_is_not_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client.search("   ", 10).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ApiError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_random_default_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/random")
        .match_query(Matcher::UrlEncoded("limit".into(), "8".into()))
        .with_body(r#"{"success": true, "data": [], "count": 0}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let companies = client.random(0).await.unwrap();

    mock.assert_async().await;
    assert!(companies.is_empty());
}

#[tokio::test]
async fn test_stats() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/stats")
        .with_body(
            r#"{"success": true, "data": {
                "total_companies": 100000,
                "listed_companies": 3800,
                "unlisted_companies": 96200,
                "last_modified": "20240315"
            }}"#,
        )
        .create_async()
        .await;

    let stats = client_for(&server).stats().await.unwrap();
    assert_eq!(stats.total_companies, 100000);
    assert_eq!(stats.unlisted_companies, 96200);
    assert_eq!(stats.last_modified.as_deref(), Some("20240315"));
}

#[tokio::test]
async fn test_fetch_snapshot_parses_financial_data() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/financial/00126380")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("year".into(), "2022".into()),
            Matcher::UrlEncoded("reprt_code".into(), "11011".into()),
        ]))
        .with_body(
            r#"{"success": true, "data": {
                "company": {"corp_code": "00126380", "corp_name": "삼성전자"},
                "financial_data": {
                    "balance_sheet": {
                        "자산총계": {"current": 4484245.07, "previous": 4266211.58, "before_previous": 3782357.18},
                        "부채총계": {"current": 936749.32, "previous": 1217212.27, "before_previous": 1022877.02},
                        "자본총계": {"current": 3547495.75, "previous": 3048999.31, "before_previous": 2759480.16}
                    },
                    "income_statement": {
                        "매출액": {"current": 3022313.6, "previous": 2796047.99, "before_previous": 2368069.88}
                    },
                    "metadata": {
                        "corp_code": "00126380",
                        "bsns_year": "2022",
                        "reprt_code": "11011",
                        "thstrm_nm": "제 54 기",
                        "frmtrm_nm": "제 53 기"
                    }
                },
                "raw_data": []
            }}"#,
        )
        .create_async()
        .await;

    let snapshot = client_for(&server)
        .fetch_snapshot("00126380", 2022)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(snapshot.line(StatementLine::TotalAssets).current, dec!(4484245.07));
    assert_eq!(snapshot.line(StatementLine::Revenue).previous, dec!(2796047.99));
    assert_eq!(snapshot.line(StatementLine::NetIncome).current, dec!(0));
    assert_eq!(snapshot.period_label(), "2022년 (제 54 기)");
}

#[tokio::test]
async fn test_backend_failure_message_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/financial/99999999")
        .match_query(Matcher::Any)
        .with_status(404)
        .with_body(r#"{"success": false, "message": "해당 회사를 찾을 수 없습니다."}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .fetch_snapshot("99999999", 2022)
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::backend("해당 회사를 찾을 수 없습니다."));
    assert_eq!(err.user_message(), "해당 회사를 찾을 수 없습니다.");
}

#[tokio::test]
async fn test_non_envelope_error_is_fetch_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/stats")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = client_for(&server).stats().await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.user_message(), "차트 데이터 로드 중 오류가 발생했습니다.");
}

#[tokio::test]
async fn test_fetch_chart_keeps_style_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/financial/chart/00126380")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("years".into(), "2021,2022,2023".into()),
            Matcher::UrlEncoded("type".into(), "balance".into()),
        ]))
        .with_body(
            r#"{"success": true, "data": {
                "company": {"corp_code": "00126380", "corp_name": "삼성전자"},
                "chart_data": {
                    "labels": ["2021", "2022", "2023"],
                    "datasets": [
                        {"label": "자산총계 (A)", "data": [4266211.58, 4484245.07, 4559060.25], "type": "bar", "stack": "Stack 0"},
                        {"label": "부채+자본 (B+C)", "data": [4266211.58, 4484245.07, 4559060.25], "type": "line", "fill": false}
                    ]
                },
                "chart_type": "balance",
                "years": ["2021", "2022", "2023"]
            }}"#,
        )
        .create_async()
        .await;

    let years = YearRange::recent_complete(2024, 3);
    let chart = client_for(&server)
        .fetch_chart("00126380", ChartType::Balance, &years)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(chart.labels, vec!["2021", "2022", "2023"]);
    let line = chart.dataset_containing("부채+자본").unwrap();
    assert_eq!(line.style["type"], "line");
}

#[tokio::test]
async fn test_insights_and_analysis() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/ai-insights/00126380")
        .match_query(Matcher::UrlEncoded("year".into(), "2022".into()))
        .with_body(
            r#"{"success": true, "data": {
                "company": {"corp_code": "00126380", "corp_name": "삼성전자"},
                "insights": {
                    "revenue_scale": "🏢 대기업 규모의 매출을 기록하고 있어요",
                    "profitability": "📈 양호한 수익성을 유지하고 있어요",
                    "financial_stability": "🛡️ 부채비율이 낮아 재무가 매우 안정적이에요",
                    "overall_grade": "⭐⭐⭐ 우수한 재무 상태",
                    "key_numbers": {"revenue": 3022313.6, "operating_margin": 14.35, "net_margin": 18.2, "debt_ratio": 20.9}
                },
                "year": "2022"
            }}"#,
        )
        .create_async()
        .await;
    server
        .mock("GET", "/api/ai-analysis/00126380")
        .match_query(Matcher::UrlEncoded("years".into(), "2021,2022".into()))
        .with_body(
            r#"{"success": true, "data": {
                "analysis": "매출이 꾸준히 증가했습니다.",
                "summary": {},
                "years": ["2021", "2022"]
            }}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let insights = client.fetch_insights("00126380", 2022).await.unwrap();
    assert_eq!(insights.overall_grade, "⭐⭐⭐ 우수한 재무 상태");
    assert!((insights.key_numbers.debt_ratio - 20.9).abs() < f64::EPSILON);

    let years = YearRange::new([2021, 2022]).unwrap();
    let analysis = client.fetch_analysis("00126380", &years).await.unwrap();
    assert_eq!(analysis.years, vec!["2021", "2022"]);
    assert!(analysis.analysis.contains("증가"));
}

#[tokio::test]
async fn test_connection_refused_is_retryable() {
    // 열려 있지 않은 포트
    let client = RegistryApiClient::new("http://127.0.0.1:9").unwrap();
    let err = client.stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Fetch(_)));
}

#[tokio::test]
async fn test_company_by_code() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/company/00126380")
        .with_body(
            r#"{"success": true, "data": {
                "corp_code": "00126380",
                "corp_name": "삼성전자",
                "corp_eng_name": "SAMSUNG ELECTRONICS CO,.LTD",
                "stock_code": "005930",
                "modify_date": "20240101"
            }}"#,
        )
        .create_async()
        .await;

    let company = client_for(&server).company(" 00126380 ").await.unwrap();

    mock.assert_async().await;
    assert_eq!(company.corp_name, "삼성전자");
    assert!(company.is_listed());
}

#[tokio::test]
async fn test_unknown_company_code() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/company/99999999")
        .with_status(404)
        .with_body(r#"{"success": false, "message": "해당 회사를 찾을 수 없습니다."}"#)
        .create_async()
        .await;

    let err = client_for(&server).company("99999999").await.unwrap_err();
    assert_eq!(err, ApiError::backend("해당 회사를 찾을 수 없습니다."));

    let err = client_for(&server).company("  ").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_multi_year_snapshots_keep_missing_years() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/financial/multi/00126380")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("years".into(), "2021,2022".into()),
            Matcher::UrlEncoded("reprt_code".into(), "11011".into()),
        ]))
        .with_body(
            r#"{"success": true, "data": {
                "corp_code": "00126380",
                "years_data": {
                    "2021": null,
                    "2022": {
                        "balance_sheet": {
                            "자산총계": {"current": 4484245.07, "previous": 4266211.58, "before_previous": 3782357.18}
                        },
                        "income_statement": {},
                        "metadata": {"corp_code": "00126380", "bsns_year": "2022", "reprt_code": "11011"}
                    }
                }
            }}"#,
        )
        .create_async()
        .await;

    let years = YearRange::new([2021, 2022]).unwrap();
    let snapshots = client_for(&server)
        .multi_year_snapshots("00126380", &years)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(snapshots.keys().copied().collect::<Vec<_>>(), vec![2021, 2022]);
    assert!(snapshots[&2021].is_none());
    let latest = snapshots[&2022].as_ref().unwrap();
    assert_eq!(latest.line(StatementLine::TotalAssets).current, dec!(4484245.07));
}

#[tokio::test]
async fn test_multi_year_over_limit_is_not_sent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/financial/multi/00126380")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let years = YearRange::new(2017..=2022).unwrap();
    let err = client_for(&server)
        .multi_year_snapshots("00126380", &years)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(err.to_string().contains("최대 5년"));
}
