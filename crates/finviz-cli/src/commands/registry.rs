//! 회사 레지스트리 조회 명령어 (검색, 랜덤 추천, 통계).

use anyhow::{Context, Result};
use finviz_core::{format_registry_date, Company, RegistryStats};
use finviz_data::RegistryApiClient;
use serde::Serialize;
use tracing::info;

use super::{spinner, OutputFormat};

/// 출력용 회사 행.
#[derive(Debug, Serialize)]
struct CompanyRow<'a> {
    corp_code: &'a str,
    corp_name: &'a str,
    stock_code: &'a str,
    listing: String,
    modify_date: String,
}

impl<'a> From<&'a Company> for CompanyRow<'a> {
    fn from(company: &'a Company) -> Self {
        Self {
            corp_code: &company.corp_code,
            corp_name: &company.corp_name,
            stock_code: company.stock_code.as_deref().unwrap_or("-"),
            listing: company.listing_status().to_string(),
            modify_date: company.display_modify_date(),
        }
    }
}

/// 회사명으로 검색합니다.
pub async fn search(
    client: &RegistryApiClient,
    query: &str,
    limit: u32,
    format: OutputFormat,
) -> Result<()> {
    let pb = spinner(format!("'{}' 검색 중...", query.trim()));
    let result = client.search_companies(query, limit).await;
    pb.finish_and_clear();

    let companies = result.context("회사 검색 실패")?;
    info!(count = companies.len(), "검색 결과 출력");

    if companies.is_empty() {
        println!("검색 결과가 없습니다.");
        return Ok(());
    }
    print_companies(&companies, format)
}

/// 무작위 추천 회사를 보여줍니다.
pub async fn random(client: &RegistryApiClient, limit: u32, format: OutputFormat) -> Result<()> {
    let pb = spinner("추천 회사 조회 중...");
    let result = client.random_companies(limit).await;
    pb.finish_and_clear();

    let companies = result.context("추천 회사 조회 실패")?;
    print_companies(&companies, format)
}

/// 레지스트리 통계를 보여줍니다.
pub async fn stats(client: &RegistryApiClient, format: OutputFormat) -> Result<()> {
    let pb = spinner("레지스트리 통계 조회 중...");
    let result = client.registry_stats().await;
    pb.finish_and_clear();

    let stats = result.context("통계 조회 실패")?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Table => print_stats(&stats),
    }
    Ok(())
}

fn print_companies(companies: &[Company], format: OutputFormat) -> Result<()> {
    let rows: Vec<CompanyRow> = companies.iter().map(CompanyRow::from).collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => {
            println!(
                "\n{:<10} {:<24} {:<8} {:<6} {:<10}",
                "고유번호", "회사명", "종목코드", "구분", "수정일"
            );
            println!("{:-<64}", "");
            for row in &rows {
                println!(
                    "{:<10} {:<24} {:<8} {:<6} {:<10}",
                    row.corp_code, row.corp_name, row.stock_code, row.listing, row.modify_date
                );
            }
            println!("\n총 {}개 회사", rows.len());
        }
    }
    Ok(())
}

fn print_stats(stats: &RegistryStats) {
    println!("\n회사 레지스트리 통계");
    println!("{:-<40}", "");
    println!("  전체 회사: {}", stats.total_companies);
    println!("  상장 회사: {}", stats.listed_companies);
    println!("  비상장 회사: {}", stats.unlisted_companies);
    println!(
        "  최종 수정일: {}",
        format_registry_date(stats.last_modified.as_deref())
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_row_presentation() {
        let mut company = Company::new("00126380", "삼성전자").with_stock_code("005930");
        company.modify_date = Some("20240315".to_string());
        let row = CompanyRow::from(&company);

        assert_eq!(row.stock_code, "005930");
        assert_eq!(row.listing, "상장");
        assert_eq!(row.modify_date, "2024-03-15");

        let unlisted = Company::new("00000001", "비상장회사");
        let row = CompanyRow::from(&unlisted);
        assert_eq!(row.stock_code, "-");
        assert_eq!(row.listing, "비상장");
        assert_eq!(row.modify_date, "-");
    }
}
