//! 시각화 세션으로 회사 재무 차트를 터미널에 출력하는 명령어.
//!
//! 회사를 선택하면 기본 슬롯(손익 추이)이 바로 조회되고, 다른 탭은 요청할 때만
//! 조회됩니다. 세션 컨트롤러 태스크를 띄워 UI와 같은 경로로 동작합니다.

use std::sync::Arc;

use anyhow::{Context, Result};
use finviz_analytics::LayoutEngine;
use finviz_core::{AppConfig, Company, FinancialApi, VisualizationSlot, YearRange};
use finviz_session::{
    CompletionOutcome, ControllerHandle, SessionController, SessionEvent, SlotState,
    VisualizationSession,
};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::spinner;
use crate::render::TerminalRenderer;

/// 시각화 조회 설정.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// 회사 고유번호
    pub corp_code: String,
    /// 표시용 회사명 (없으면 고유번호)
    pub corp_name: Option<String>,
    /// 보여줄 탭
    pub tab: VisualizationSlot,
    /// 연도 범위 (없으면 기본 범위)
    pub years: Option<YearRange>,
    /// 요청한 탭만 출력
    pub focus: bool,
}

/// 회사를 선택하고 요청한 탭이 그려질 때까지 기다립니다.
pub async fn run_view(
    api: Arc<dyn FinancialApi>,
    app_config: &AppConfig,
    config: ViewConfig,
) -> Result<()> {
    // 이름이 없으면 고유번호로 회사를 조회
    let company = match config.corp_name.clone() {
        Some(name) => Company::new(config.corp_code.clone(), name),
        None => api
            .company(&config.corp_code)
            .await
            .with_context(|| format!("회사 조회 실패: {}", config.corp_code))?,
    };

    let pb = spinner(format!(
        "{} {} 조회 중...",
        company.corp_name,
        config.tab.as_str()
    ));

    let mut renderer = TerminalRenderer::new().with_progress(pb.clone());
    if config.focus {
        renderer = renderer.focus(config.tab);
    }
    let session = VisualizationSession::new(Box::new(renderer))
        .with_config(app_config.session)
        .with_layout_engine(LayoutEngine::new(app_config.layout));

    let (handle, task) = SessionController::spawn(session, api);
    let mut events = handle.subscribe();

    let result = show_tab(&handle, &mut events, company, &config).await;
    pb.finish_and_clear();

    handle.close_session().await?;
    drop(handle);
    task.await.context("세션 컨트롤러 태스크 실패")?;

    result
}

async fn show_tab(
    handle: &ControllerHandle,
    events: &mut broadcast::Receiver<SessionEvent>,
    company: Company,
    config: &ViewConfig,
) -> Result<()> {
    let corp_code = company.corp_code.clone();
    handle.select_company(company).await?;

    if config.tab != VisualizationSlot::DEFAULT || config.years.is_some() {
        let started = handle.request_slot(config.tab, config.years.clone()).await?;
        debug!(slot = %config.tab, started, "탭 요청");
    }

    wait_for_slot(handle, events, &corp_code, config.tab).await?;

    match handle.slot_state(config.tab).await? {
        SlotState::Rendered(_) => {
            info!(corp_code = %corp_code, slot = %config.tab, "시각화 완료");
            Ok(())
        }
        SlotState::Errored(message) => Err(anyhow::anyhow!(message)),
        other => Err(anyhow::anyhow!(
            "슬롯이 완료되지 않았습니다: {}",
            other.as_str()
        )),
    }
}

/// 해당 슬롯의 최신 요청이 끝날 때까지 기다립니다.
///
/// 폐기된 응답은 건너뜁니다. 기본 탭을 다른 연도로 다시 요청하면 선택 시 시작된
/// 첫 조회가 먼저 완료될 수 있으므로, 완료 이벤트 뒤에도 슬롯이 여전히 조회
/// 중이면 계속 기다립니다.
async fn wait_for_slot(
    handle: &ControllerHandle,
    events: &mut broadcast::Receiver<SessionEvent>,
    corp_code: &str,
    slot: VisualizationSlot,
) -> Result<()> {
    loop {
        match events.recv().await {
            Ok(SessionEvent::SlotCompleted {
                corp_code: code,
                slot: completed,
                outcome,
            }) if code == corp_code && completed == slot => {
                if outcome == CompletionOutcome::Discarded {
                    continue;
                }
                if !handle.slot_state(slot).await?.is_loading() {
                    return Ok(());
                }
                debug!(slot = %slot, "이전 요청 완료, 최신 요청 대기");
            }
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(skipped, "세션 이벤트 일부 누락");
            }
            Err(broadcast::error::RecvError::Closed) => {
                return Err(anyhow::anyhow!("세션 컨트롤러가 종료되었습니다"));
            }
        }
    }
}
