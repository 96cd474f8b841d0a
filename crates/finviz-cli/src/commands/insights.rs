//! 재무 인사이트 및 상세 분석 조회 명령어.
//!
//! 분석 문구는 백엔드가 생성하며 그대로 출력합니다.

use anyhow::{Context, Result};
use finviz_analytics::format_amount_label;
use finviz_core::{DetailedAnalysis, QuickInsights, YearRange};
use finviz_data::RegistryApiClient;
use rust_decimal::prelude::*;

use super::{spinner, OutputFormat};

/// 한 사업연도의 빠른 인사이트를 보여줍니다.
pub async fn insights(
    client: &RegistryApiClient,
    corp_code: &str,
    year: i32,
    format: OutputFormat,
) -> Result<()> {
    let pb = spinner(format!("{} 인사이트 조회 중...", year));
    let result = client.quick_insights(corp_code, year).await;
    pb.finish_and_clear();

    let insights = result.context("인사이트 조회 실패")?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&insights)?),
        OutputFormat::Table => println!("{}", insights_text(year, &insights)),
    }
    Ok(())
}

/// 여러 사업연도의 상세 분석을 보여줍니다.
pub async fn analysis(
    client: &RegistryApiClient,
    corp_code: &str,
    years: &YearRange,
    format: OutputFormat,
) -> Result<()> {
    let pb = spinner(format!("{}년 상세 분석 조회 중...", years.to_query()));
    let result = client.detailed_analysis(corp_code, years).await;
    pb.finish_and_clear();

    let analysis = result.context("상세 분석 조회 실패")?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Table => println!("{}", analysis_text(&analysis)),
    }
    Ok(())
}

fn insights_text(year: i32, insights: &QuickInsights) -> String {
    let numbers = &insights.key_numbers;
    let revenue = Decimal::from_f64(numbers.revenue).unwrap_or_default();

    [
        format!("\n{}년 재무 인사이트", year),
        format!("{:-<40}", ""),
        format!("  종합 등급: {}", insights.overall_grade),
        format!("  매출 규모: {}", insights.revenue_scale),
        format!("  수익성: {}", insights.profitability),
        format!("  재무 안정성: {}", insights.financial_stability),
        String::new(),
        format!("  매출액: {}", format_amount_label(revenue)),
        format!("  영업이익률: {:.1}%", numbers.operating_margin),
        format!("  순이익률: {:.1}%", numbers.net_margin),
        format!("  부채비율: {:.1}%", numbers.debt_ratio),
    ]
    .join("\n")
}

fn analysis_text(analysis: &DetailedAnalysis) -> String {
    let years = if analysis.years.is_empty() {
        "-".to_string()
    } else {
        analysis.years.join(", ")
    };
    format!(
        "\n상세 분석 ({})\n{:-<40}\n{}",
        years, "", analysis.analysis
    )
}
