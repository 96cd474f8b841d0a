//! 세션 생명주기 통합 테스트
//!
//! 재사용/재로딩 판단, 핸들 폐기 짝맞춤, 슬롯별 에러 격리를 확인합니다.

mod common;

use common::{company_x_snapshot, RecordingRenderer, ScriptedApi};
use finviz_analytics::{EquityBand, LiabilityBand};
use finviz_core::{ApiError, ChartType, Company, VisualizationSlot, VizError, YearRange};
use finviz_session::{CompletionOutcome, SlotOutcome, SlotState, VisualizationSession};
use rust_decimal_macros::dec;

fn session() -> (VisualizationSession, common::RenderLog) {
    let (renderer, log) = RecordingRenderer::new();
    let session = VisualizationSession::new(Box::new(renderer)).with_current_year(2024);
    (session, log)
}

#[tokio::test]
async fn test_identical_request_fetches_once() {
    let api = ScriptedApi::new();
    let (mut session, log) = session();
    let ticket = session.select_company(Company::new("00126380", "삼성전자"));
    session.run_ticket(&api, ticket).await;
    assert_eq!(api.chart_calls(), 1);

    let years = YearRange::recent_complete(2024, 5);
    let first = session
        .request_slot(&api, VisualizationSlot::AssetComposition, Some(years.clone()))
        .await
        .unwrap();
    let second = session
        .request_slot(&api, VisualizationSlot::AssetComposition, Some(years))
        .await
        .unwrap();

    assert_eq!(first, SlotOutcome::Completed(CompletionOutcome::Rendered));
    assert_eq!(second, SlotOutcome::Reused);
    assert_eq!(api.chart_calls(), 2);
    assert_eq!(log.rendered().len(), 2);

    // 기본 연도 범위로 다시 탭을 열어도 같은 요청
    let ticket = session.activate_tab(VisualizationSlot::RevenueTrend).unwrap();
    assert!(ticket.is_none());
}

#[tokio::test]
async fn test_company_x_balance_boxes() {
    let api = ScriptedApi::new().with_snapshot("X", company_x_snapshot());
    let (mut session, _log) = session();
    session.select_company(Company::new("X", "회사X"));

    let outcome = session
        .request_slot(&api, VisualizationSlot::BalanceSheetBoxes, None)
        .await
        .unwrap();
    assert_eq!(outcome, SlotOutcome::Completed(CompletionOutcome::Rendered));

    let layout = session
        .slot_state(VisualizationSlot::BalanceSheetBoxes)
        .rendered()
        .and_then(|p| p.as_layout())
        .unwrap();
    assert_eq!(layout.liability_ratio, dec!(40.0));
    assert_eq!(layout.equity_ratio, dec!(60.0));
    assert_eq!(layout.liability_band, LiabilityBand::Acceptable);
    assert_eq!(layout.equity_band, EquityBand::Acceptable);
    assert_eq!(layout.liability_band.as_str(), "acceptable");
    assert_eq!(layout.period, "2022년");
}

#[tokio::test]
async fn test_request_before_select_company() {
    let api = ScriptedApi::new();
    let (mut session, _log) = session();

    let err = session
        .request_slot(&api, VisualizationSlot::RevenueTrend, None)
        .await
        .unwrap_err();
    assert_eq!(err, VizError::NoActiveCompany);
    assert_eq!(api.chart_calls(), 0);
}

#[tokio::test]
async fn test_fetch_failure_is_slot_scoped() {
    let api = ScriptedApi::new();
    let (mut session, log) = session();
    let ticket = session.select_company(Company::new("A", "회사A"));
    session.run_ticket(&api, ticket).await;

    api.fail_chart(ChartType::Asset, ApiError::Fetch("connection reset".to_string()));
    let outcome = session
        .request_slot(&api, VisualizationSlot::AssetComposition, None)
        .await
        .unwrap();
    assert_eq!(outcome, SlotOutcome::Completed(CompletionOutcome::Errored));

    assert_eq!(
        session
            .slot_state(VisualizationSlot::AssetComposition)
            .error_message(),
        Some("차트 데이터 로드 중 오류가 발생했습니다.")
    );
    assert!(session
        .slot_state(VisualizationSlot::RevenueTrend)
        .is_rendered());
    assert_eq!(log.live(), 1);

    // 사용자가 다시 요청하면 재시도
    api.clear_failures();
    let retry = session
        .request_slot(&api, VisualizationSlot::AssetComposition, None)
        .await
        .unwrap();
    assert_eq!(retry, SlotOutcome::Completed(CompletionOutcome::Rendered));
    assert_eq!(log.live(), 2);
}

#[tokio::test]
async fn test_backend_message_is_carried() {
    let api = ScriptedApi::new();
    let (mut session, _log) = session();
    session.select_company(Company::new("NODATA", "데이터없음"));

    session
        .request_slot(&api, VisualizationSlot::BalanceSheetBoxes, None)
        .await
        .unwrap();

    assert_eq!(
        session.slot_state(VisualizationSlot::BalanceSheetBoxes),
        &SlotState::Errored("재무 데이터를 가져올 수 없습니다.".to_string())
    );
}

#[tokio::test]
async fn test_reload_disposes_before_render() {
    let api = ScriptedApi::new();
    let (mut session, log) = session();
    let ticket = session.select_company(Company::new("A", "회사A"));
    session.run_ticket(&api, ticket).await;

    for last_year in [2021, 2022, 2023] {
        session
            .request_slot(
                &api,
                VisualizationSlot::RevenueTrend,
                Some(YearRange::ending_at(last_year, 3)),
            )
            .await
            .unwrap();
    }

    assert_eq!(api.chart_calls(), 4);
    assert_eq!(log.rendered().len(), 4);
    assert_eq!(log.disposed(), 3);
    assert_eq!(log.max_live_per_slot(), 1);
    assert_eq!(session.live_handle_count(), 1);

    let descriptor = session
        .slot_state(VisualizationSlot::RevenueTrend)
        .rendered()
        .and_then(|p| p.as_chart())
        .unwrap();
    assert_eq!(descriptor.data.labels, vec!["2021", "2022", "2023"]);
}

#[tokio::test]
async fn test_company_change_disposes_every_handle() {
    let api = ScriptedApi::new().with_snapshot("A", company_x_snapshot());
    let (mut session, log) = session();
    let ticket = session.select_company(Company::new("A", "회사A"));
    session.run_ticket(&api, ticket).await;
    for slot in [
        VisualizationSlot::AssetComposition,
        VisualizationSlot::BalanceEquation,
        VisualizationSlot::BalanceSheetBoxes,
    ] {
        session.request_slot(&api, slot, None).await.unwrap();
    }
    assert_eq!(log.live(), 4);

    let ticket = session.select_company(Company::new("B", "회사B"));
    assert_eq!(log.disposed(), 4);
    assert_eq!(log.live(), 0);
    for slot in VisualizationSlot::ALL {
        if slot != VisualizationSlot::RevenueTrend {
            assert_eq!(session.slot_state(slot), &SlotState::Empty);
        }
    }

    assert_eq!(session.run_ticket(&api, ticket).await, CompletionOutcome::Rendered);
    assert_eq!(session.active_company().unwrap().corp_code, "B");
}

#[tokio::test]
async fn test_close_session_discards_late_response() {
    let api = ScriptedApi::new();
    let (mut session, log) = session();
    let ticket = session.select_company(Company::new("A", "회사A"));

    let result = ticket.execute(&api).await;
    assert!(session.close_session());
    assert_eq!(session.complete(ticket, result), CompletionOutcome::Discarded);
    assert_eq!(log.rendered().len(), 0);
    assert_eq!(
        session.slot_state(VisualizationSlot::RevenueTrend),
        &SlotState::Empty
    );

    assert!(!session.close_session());
}
