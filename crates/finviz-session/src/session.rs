//! 시각화 세션.
//!
//! 세션은 현재 조회 중인 회사와 슬롯별 렌더 인스턴스 핸들을 소유합니다.
//!
//! 요청은 두 단계로 나뉩니다.
//!
//! 1. [`VisualizationSession::begin_request`]: 재사용/재로딩을 판단하고, 조회가 필요하면
//!    발급 당시 컨텍스트(세대, 회사, 슬롯, 일련번호)를 담은 [`FetchTicket`]을 돌려줍니다.
//! 2. [`VisualizationSession::complete`]: 응답이 도착하면 티켓의 컨텍스트가 아직 유효한지
//!    확인하고, 유효할 때만 렌더링합니다. 회사가 바뀌었거나 세션이 닫혔거나 같은 슬롯이
//!    다른 파라미터로 다시 요청됐다면 응답을 버립니다.
//!
//! 조회 자체는 세션 밖에서 일어나므로 응답은 얼마든지 늦게, 어떤 순서로든 도착할 수 있습니다.

use finviz_analytics::{ChartDescriptor, LayoutEngine};
use finviz_core::{
    current_year, viz_span, ApiError, ChartData, Company, FinancialApi, FinancialSnapshot,
    SessionConfig, VisualizationSlot, VizError, VizResult, YearRange,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::renderer::{ChartRenderer, RenderHandle, RenderPayload};
use crate::slot_state::{decide, SlotDecision, SlotParams, SlotState};

/// 조회 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedData {
    Chart(ChartData),
    Snapshot(FinancialSnapshot),
}

/// 발급된 조회 요청.
///
/// 응답을 [`VisualizationSession::complete`]에 돌려줄 때 함께 넘겨야 합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    seq: u64,
    corp_code: String,
    slot: VisualizationSlot,
    params: SlotParams,
}

impl FetchTicket {
    pub fn corp_code(&self) -> &str {
        &self.corp_code
    }

    pub fn slot(&self) -> VisualizationSlot {
        self.slot
    }

    pub fn params(&self) -> &SlotParams {
        &self.params
    }

    /// 티켓이 가리키는 데이터를 한 번 조회합니다.
    pub async fn execute(&self, api: &dyn FinancialApi) -> Result<FetchedData, ApiError> {
        match &self.params {
            SlotParams::Chart { chart_type, years } => api
                .fetch_chart(&self.corp_code, *chart_type, years)
                .await
                .map(FetchedData::Chart),
            SlotParams::Snapshot { year } => api
                .fetch_snapshot(&self.corp_code, *year)
                .await
                .map(FetchedData::Snapshot),
        }
    }
}

/// 응답 처리 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    Rendered,
    Errored,
    /// 컨텍스트가 바뀌어 버린 응답
    Discarded,
}

/// `request_slot` 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// 같은 파라미터로 이미 렌더링되어 조회하지 않음
    Reused,
    /// 같은 파라미터로 이미 조회 중
    InFlight,
    /// 조회 후 처리됨
    Completed(CompletionOutcome),
}

#[derive(Default)]
struct SlotEntry {
    state: SlotState,
    params: Option<SlotParams>,
    /// 처리 대기 중인 요청의 일련번호
    pending: Option<u64>,
    handle: Option<Box<dyn RenderHandle>>,
}

impl SlotEntry {
    fn dispose_handle(&mut self) -> bool {
        match self.handle.take() {
            Some(mut handle) => {
                handle.dispose();
                true
            }
            None => false,
        }
    }
}

/// 시각화 세션.
pub struct VisualizationSession {
    company: Option<Company>,
    slots: [SlotEntry; 4],
    /// 회사 변경/세션 종료마다 증가
    generation: u64,
    next_seq: u64,
    renderer: Box<dyn ChartRenderer>,
    layout: LayoutEngine,
    config: SessionConfig,
    year_override: Option<i32>,
}

impl VisualizationSession {
    pub fn new(renderer: Box<dyn ChartRenderer>) -> Self {
        Self {
            company: None,
            slots: std::array::from_fn(|_| SlotEntry::default()),
            generation: 0,
            next_seq: 0,
            renderer,
            layout: LayoutEngine::default(),
            config: SessionConfig::default(),
            year_override: None,
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_layout_engine(mut self, layout: LayoutEngine) -> Self {
        self.layout = layout;
        self
    }

    /// 기준 연도를 고정합니다. 지정하지 않으면 요청 시점의 달력 연도를 씁니다.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.year_override = Some(year);
        self
    }

    pub fn active_company(&self) -> Option<&Company> {
        self.company.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 슬롯의 현재 상태.
    pub fn slot_state(&self, slot: VisualizationSlot) -> &SlotState {
        &self.entry(slot).state
    }

    /// 살아 있는 렌더 핸들 수.
    pub fn live_handle_count(&self) -> usize {
        self.slots.iter().filter(|e| e.handle.is_some()).count()
    }

    /// 기본 연도 범위: 기준 연도 직전까지의 완결 연도.
    pub fn default_years(&self) -> YearRange {
        YearRange::recent_complete(self.current_year(), self.config.default_year_span)
    }

    /// 박스 다이어그램이 조회하는 사업연도.
    pub fn balance_sheet_year(&self) -> i32 {
        self.current_year() - self.config.balance_lookback_years as i32
    }

    fn current_year(&self) -> i32 {
        self.year_override.unwrap_or_else(current_year)
    }

    fn entry(&self, slot: VisualizationSlot) -> &SlotEntry {
        &self.slots[slot as usize]
    }

    /// 회사를 선택합니다.
    ///
    /// 이전 회사의 핸들을 모두 폐기하고 기본 슬롯(손익 추이) 조회 티켓을 반환합니다.
    pub fn select_company(&mut self, company: Company) -> FetchTicket {
        let disposed = self.reset_slots();
        self.generation += 1;

        info!(
            corp_code = %company.corp_code,
            corp_name = %company.corp_name,
            disposed = disposed,
            generation = self.generation,
            "회사 선택"
        );

        self.company = Some(company);
        let slot = VisualizationSlot::DEFAULT;
        let params = self.params_for(slot, None);
        self.issue(slot, params)
    }

    /// 세션을 닫습니다. 이미 닫힌 세션이면 아무 일도 하지 않고 `false`를 반환합니다.
    pub fn close_session(&mut self) -> bool {
        let untouched = self
            .slots
            .iter()
            .all(|e| e.handle.is_none() && e.state == SlotState::Empty);
        if self.company.is_none() && untouched {
            debug!("이미 닫힌 세션");
            return false;
        }

        let disposed = self.reset_slots();
        self.generation += 1;
        let closed = self.company.take();

        info!(
            corp_code = closed.as_ref().map(|c| c.corp_code.as_str()).unwrap_or("-"),
            disposed = disposed,
            "세션 종료"
        );
        true
    }

    /// 슬롯 요청을 시작합니다.
    ///
    /// 조회가 필요하면 티켓을, 재사용하거나 이미 조회 중이면 `None`을 반환합니다.
    /// `years`가 없으면 기본 연도 범위를 씁니다. 박스 다이어그램은 `years`를 무시합니다.
    pub fn begin_request(
        &mut self,
        slot: VisualizationSlot,
        years: Option<YearRange>,
    ) -> VizResult<Option<FetchTicket>> {
        let corp_code = match &self.company {
            Some(company) => company.corp_code.clone(),
            None => return Err(VizError::NoActiveCompany),
        };
        let _span = viz_span!("begin_request", corp_code, slot).entered();

        let params = self.params_for(slot, years);
        let entry = self.entry(slot);
        let decision = decide(&entry.state, entry.params.as_ref(), &params);
        match decision {
            SlotDecision::Fetch => Ok(Some(self.issue(slot, params))),
            decision => {
                debug!(params = %params, decision = ?decision, "조회 생략");
                Ok(None)
            }
        }
    }

    /// 탭이 보이게 되었을 때 호출합니다. 기본 연도 범위로 요청합니다.
    pub fn activate_tab(&mut self, slot: VisualizationSlot) -> VizResult<Option<FetchTicket>> {
        self.begin_request(slot, None)
    }

    /// 응답을 처리합니다.
    ///
    /// 티켓의 컨텍스트가 현재 세션과 다르면 렌더링하지 않고 버립니다.
    /// 실패 응답은 해당 슬롯만 `Errored`로 바꿉니다.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<FetchedData, ApiError>,
    ) -> CompletionOutcome {
        let _span = viz_span!("complete", ticket.corp_code, ticket.slot).entered();

        let idx = ticket.slot as usize;
        if ticket.generation != self.generation || self.slots[idx].pending != Some(ticket.seq) {
            warn!(
                seq = ticket.seq,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "오래된 응답 폐기"
            );
            return CompletionOutcome::Discarded;
        }
        self.slots[idx].pending = None;

        let payload = result
            .map_err(|e| {
                warn!(error = %e, retryable = e.is_retryable(), "슬롯 조회 실패");
                e.user_message()
            })
            .and_then(|data| self.build_payload(ticket.slot, data));

        let entry = &mut self.slots[idx];
        // 새 핸들을 만들기 전에 기존 핸들을 항상 먼저 폐기
        entry.dispose_handle();

        match payload {
            Ok(payload) => {
                entry.handle = Some(self.renderer.render(&payload));
                entry.state = SlotState::Rendered(payload);
                debug!(params = %ticket.params, "슬롯 렌더링 완료");
                CompletionOutcome::Rendered
            }
            Err(message) => {
                entry.state = SlotState::Errored(message);
                CompletionOutcome::Errored
            }
        }
    }

    /// 티켓을 조회하고 바로 처리합니다.
    pub async fn run_ticket(
        &mut self,
        api: &dyn FinancialApi,
        ticket: FetchTicket,
    ) -> CompletionOutcome {
        let result = ticket.execute(api).await;
        self.complete(ticket, result)
    }

    /// 슬롯을 요청하고 필요하면 조회/렌더링까지 마칩니다.
    pub async fn request_slot(
        &mut self,
        api: &dyn FinancialApi,
        slot: VisualizationSlot,
        years: Option<YearRange>,
    ) -> VizResult<SlotOutcome> {
        match self.begin_request(slot, years)? {
            Some(ticket) => Ok(SlotOutcome::Completed(self.run_ticket(api, ticket).await)),
            None if self.slot_state(slot).is_loading() => Ok(SlotOutcome::InFlight),
            None => Ok(SlotOutcome::Reused),
        }
    }

    fn params_for(&self, slot: VisualizationSlot, years: Option<YearRange>) -> SlotParams {
        match slot.chart_type() {
            Some(chart_type) => SlotParams::Chart {
                chart_type,
                years: years.unwrap_or_else(|| self.default_years()),
            },
            None => SlotParams::Snapshot {
                year: self.balance_sheet_year(),
            },
        }
    }

    /// 슬롯을 `Loading`으로 바꾸고 티켓을 발급합니다.
    ///
    /// 이전에 발급된 같은 슬롯의 티켓은 이 시점부터 오래된 요청입니다.
    fn issue(&mut self, slot: VisualizationSlot, params: SlotParams) -> FetchTicket {
        self.next_seq += 1;
        let seq = self.next_seq;
        let corp_code = self
            .company
            .as_ref()
            .map(|c| c.corp_code.clone())
            .unwrap_or_default();

        let entry = &mut self.slots[slot as usize];
        entry.state = SlotState::Loading;
        entry.params = Some(params.clone());
        entry.pending = Some(seq);

        debug!(corp_code = %corp_code, slot = %slot, params = %params, seq = seq, "조회 요청 발급");

        FetchTicket {
            generation: self.generation,
            seq,
            corp_code,
            slot,
            params,
        }
    }

    fn build_payload(
        &self,
        slot: VisualizationSlot,
        data: FetchedData,
    ) -> Result<RenderPayload, String> {
        match (slot, data) {
            (VisualizationSlot::BalanceSheetBoxes, FetchedData::Snapshot(snapshot)) => {
                Ok(RenderPayload::BalanceBoxes(self.layout.layout(&snapshot)))
            }
            (slot, FetchedData::Chart(chart)) => ChartDescriptor::for_slot(slot, chart)
                .map(RenderPayload::Chart)
                .ok_or_else(|| format!("{} 슬롯은 차트 데이터로 그릴 수 없습니다", slot)),
            (slot, FetchedData::Snapshot(_)) => {
                Err(format!("{} 슬롯은 재무제표 데이터로 그릴 수 없습니다", slot))
            }
        }
    }

    /// 모든 핸들을 폐기하고 슬롯을 비웁니다. 폐기한 핸들 수를 반환합니다.
    fn reset_slots(&mut self) -> usize {
        let mut disposed = 0;
        for entry in self.slots.iter_mut() {
            if entry.dispose_handle() {
                disposed += 1;
            }
            *entry = SlotEntry::default();
        }
        disposed
    }
}

impl Drop for VisualizationSession {
    fn drop(&mut self) {
        self.reset_slots();
    }
}
