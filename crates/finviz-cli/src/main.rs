//! 재무 시각화 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 회사 검색
//! finviz search 삼성
//!
//! # 손익 추이 차트 (기본 탭, 최근 5개 완결 연도)
//! finviz view 00126380 --name 삼성전자
//!
//! # 재무상태 구성 차트를 지정한 연도로
//! finviz view 00126380 --tab asset --years 2019,2020,2021
//!
//! # 재무상태표 박스 다이어그램
//! finviz boxes 00126380
//!
//! # 인사이트 / 상세 분석
//! finviz insights 00126380 --year 2023
//! finviz analysis 00126380 --years 2021,2022,2023
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use finviz_cli::commands::{
    insights, registry,
    view::{run_view, ViewConfig},
    OutputFormat,
};
use finviz_core::{current_year, init_logging, AppConfig, LogConfig, VisualizationSlot, YearRange};
use finviz_data::RegistryApiClient;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "finviz")]
#[command(about = "Financial visualization CLI - 전자공시 재무제표 시각화", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 회사명으로 검색
    Search {
        /// 검색어
        query: String,

        /// 최대 결과 수 (0이면 설정값, 최대 100)
        #[arg(short, long, default_value = "0")]
        limit: u32,

        /// 출력 형식 (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// 무작위 추천 회사
    Random {
        /// 회사 수 (0이면 설정값, 최대 20)
        #[arg(short, long, default_value = "0")]
        limit: u32,

        /// 출력 형식 (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// 회사 레지스트리 통계
    Stats {
        /// 출력 형식 (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// 회사를 선택하고 재무 차트 출력
    View {
        /// 회사 고유번호 (8자리)
        corp_code: String,

        /// 표시용 회사명
        #[arg(short, long)]
        name: Option<String>,

        /// 탭 (revenue, asset, balance, boxes)
        #[arg(short, long, default_value = "revenue")]
        tab: VisualizationSlot,

        /// 연도 목록 (쉼표 구분, 예: 2019,2020,2021)
        #[arg(short, long)]
        years: Option<YearRange>,

        /// 요청한 탭만 출력
        #[arg(long, default_value = "false")]
        only: bool,
    },

    /// 재무상태표 박스 다이어그램 (자산 = 부채 + 자본)
    Boxes {
        /// 회사 고유번호 (8자리)
        corp_code: String,

        /// 표시용 회사명
        #[arg(short, long)]
        name: Option<String>,
    },

    /// 한 사업연도의 재무 인사이트
    Insights {
        /// 회사 고유번호 (8자리)
        corp_code: String,

        /// 사업연도 (기본: 박스 다이어그램과 같은 연도)
        #[arg(short, long)]
        year: Option<i32>,

        /// 출력 형식 (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// 여러 사업연도의 상세 분석
    Analysis {
        /// 회사 고유번호 (8자리)
        corp_code: String,

        /// 연도 목록 (쉼표 구분, 기본: 최근 완결 연도)
        #[arg(short, long)]
        years: Option<YearRange>,

        /// 출력 형식 (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("설정 로드 실패: {}", cli.config))?;
    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let client = RegistryApiClient::from_config(&config.api)?;
    info!(base_url = client.base_url(), "재무 API 클라이언트 준비");

    if let Err(e) = run(cli.command, client, &config).await {
        error!("명령 실패: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run(command: Commands, client: RegistryApiClient, config: &AppConfig) -> Result<()> {
    match command {
        Commands::Search {
            query,
            limit,
            format,
        } => registry::search(&client, &query, limit, OutputFormat::parse(&format)?).await,

        Commands::Random { limit, format } => {
            registry::random(&client, limit, OutputFormat::parse(&format)?).await
        }

        Commands::Stats { format } => registry::stats(&client, OutputFormat::parse(&format)?).await,

        Commands::View {
            corp_code,
            name,
            tab,
            years,
            only,
        } => {
            let view = ViewConfig {
                corp_code,
                corp_name: name,
                tab,
                years,
                focus: only,
            };
            run_view(Arc::new(client), config, view).await
        }

        Commands::Boxes { corp_code, name } => {
            let view = ViewConfig {
                corp_code,
                corp_name: name,
                tab: VisualizationSlot::BalanceSheetBoxes,
                years: None,
                focus: true,
            };
            run_view(Arc::new(client), config, view).await
        }

        Commands::Insights {
            corp_code,
            year,
            format,
        } => {
            let year = year.unwrap_or_else(|| {
                current_year() - config.session.balance_lookback_years as i32
            });
            insights::insights(&client, &corp_code, year, OutputFormat::parse(&format)?).await
        }

        Commands::Analysis {
            corp_code,
            years,
            format,
        } => {
            let years = years.unwrap_or_else(|| {
                YearRange::recent_complete(current_year(), config.session.default_year_span)
            });
            insights::analysis(&client, &corp_code, &years, OutputFormat::parse(&format)?).await
        }
    }
}
