//! 세션 컨트롤러 태스크.
//!
//! UI 의도(회사 선택, 탭 전환, 연도 범위 변경)와 조회 완료를 하나의 태스크에서 순서대로
//! 처리합니다. 세션 상태는 이 태스크 안에서만 바뀌므로 잠금이 필요 없습니다.
//!
//! 조회는 별도 태스크에서 진행되고, 완료되면 티켓과 함께 이 태스크로 돌아옵니다.
//! 그 사이에 회사가 바뀌었으면 세션이 응답을 버립니다.
//!
//! ```rust,ignore
//! let session = VisualizationSession::new(Box::new(renderer));
//! let (handle, _task) = SessionController::spawn(session, api);
//!
//! handle.select_company(Company::new("00126380", "삼성전자")).await?;
//! handle.activate_tab(VisualizationSlot::BalanceSheetBoxes).await?;
//! ```

use std::sync::Arc;

use finviz_core::{ApiError, Company, FinancialApi, VisualizationSlot, VizError, VizResult, YearRange};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::session::{CompletionOutcome, FetchTicket, FetchedData, VisualizationSession};
use crate::slot_state::SlotState;

/// 명령 채널 버퍼 크기.
const COMMAND_BUFFER: usize = 64;
/// 이벤트 채널 버퍼 크기.
const EVENT_BUFFER: usize = 256;

/// 컨트롤러가 내보내는 이벤트.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    CompanySelected {
        corp_code: String,
    },
    SessionClosed,
    /// 슬롯 조회가 끝남 (폐기된 응답 포함)
    SlotCompleted {
        corp_code: String,
        slot: VisualizationSlot,
        outcome: CompletionOutcome,
    },
}

enum Command {
    SelectCompany {
        company: Company,
        reply: oneshot::Sender<()>,
    },
    CloseSession {
        reply: oneshot::Sender<bool>,
    },
    RequestSlot {
        slot: VisualizationSlot,
        years: Option<YearRange>,
        reply: oneshot::Sender<VizResult<bool>>,
    },
    SlotState {
        slot: VisualizationSlot,
        reply: oneshot::Sender<SlotState>,
    },
    ActiveCompany {
        reply: oneshot::Sender<Option<Company>>,
    },
}

struct Completion {
    ticket: FetchTicket,
    result: Result<FetchedData, ApiError>,
}

/// 세션을 소유하는 컨트롤러.
pub struct SessionController {
    session: VisualizationSession,
    api: Arc<dyn FinancialApi>,
    commands: mpsc::Receiver<Command>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    /// 컨트롤러와 핸들을 생성합니다. `run`을 호출해야 명령이 처리됩니다.
    pub fn new(
        session: VisualizationSession,
        api: Arc<dyn FinancialApi>,
    ) -> (Self, ControllerHandle) {
        let (command_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let handle = ControllerHandle {
            commands: command_tx,
            events: events.clone(),
        };
        let controller = Self {
            session,
            api,
            commands,
            completion_tx,
            completion_rx,
            events,
        };
        (controller, handle)
    }

    /// 컨트롤러를 tokio 태스크로 실행합니다.
    pub fn spawn(
        session: VisualizationSession,
        api: Arc<dyn FinancialApi>,
    ) -> (ControllerHandle, JoinHandle<()>) {
        let (controller, handle) = Self::new(session, api);
        let task = tokio::spawn(controller.run());
        (handle, task)
    }

    /// 모든 핸들이 drop될 때까지 명령과 조회 완료를 처리합니다.
    pub async fn run(mut self) {
        info!(provider = self.api.provider_name(), "세션 컨트롤러 시작");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(completion) = self.completion_rx.recv() => {
                    self.handle_completion(completion);
                }
            }
        }

        self.session.close_session();
        info!("세션 컨트롤러 종료");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SelectCompany { company, reply } => {
                let corp_code = company.corp_code.clone();
                let ticket = self.session.select_company(company);
                self.spawn_fetch(ticket);
                self.emit(SessionEvent::CompanySelected { corp_code });
                let _ = reply.send(());
            }
            Command::CloseSession { reply } => {
                let closed = self.session.close_session();
                if closed {
                    self.emit(SessionEvent::SessionClosed);
                }
                let _ = reply.send(closed);
            }
            Command::RequestSlot { slot, years, reply } => {
                let started = match self.session.begin_request(slot, years) {
                    Ok(Some(ticket)) => {
                        self.spawn_fetch(ticket);
                        Ok(true)
                    }
                    Ok(None) => Ok(false),
                    Err(e) => Err(e),
                };
                let _ = reply.send(started);
            }
            Command::SlotState { slot, reply } => {
                let _ = reply.send(self.session.slot_state(slot).clone());
            }
            Command::ActiveCompany { reply } => {
                let _ = reply.send(self.session.active_company().cloned());
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        let corp_code = completion.ticket.corp_code().to_string();
        let slot = completion.ticket.slot();
        let outcome = self.session.complete(completion.ticket, completion.result);
        self.emit(SessionEvent::SlotCompleted {
            corp_code,
            slot,
            outcome,
        });
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let api = Arc::clone(&self.api);
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = ticket.execute(api.as_ref()).await;
            if completion_tx.send(Completion { ticket, result }).is_err() {
                debug!("컨트롤러 종료 후 도착한 응답");
            }
        });
    }

    fn emit(&self, event: SessionEvent) {
        // 구독자가 없으면 실패함
        let _ = self.events.send(event);
    }
}

/// 컨트롤러에 명령을 보내는 핸들.
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<SessionEvent>,
}

impl ControllerHandle {
    async fn call<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> VizResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| VizError::ControllerClosed)?;
        response.await.map_err(|_| VizError::ControllerClosed)
    }

    /// 회사를 선택하고 기본 슬롯 조회를 시작합니다.
    pub async fn select_company(&self, company: Company) -> VizResult<()> {
        self.call(|reply| Command::SelectCompany { company, reply })
            .await
    }

    /// 세션을 닫습니다. 이미 닫혀 있었으면 `false`.
    pub async fn close_session(&self) -> VizResult<bool> {
        self.call(|reply| Command::CloseSession { reply }).await
    }

    /// 슬롯을 요청합니다. 새 조회를 시작했으면 `true`, 재사용했으면 `false`.
    pub async fn request_slot(
        &self,
        slot: VisualizationSlot,
        years: Option<YearRange>,
    ) -> VizResult<bool> {
        self.call(|reply| Command::RequestSlot { slot, years, reply })
            .await?
    }

    /// 보이게 된 탭의 슬롯을 기본 연도 범위로 요청합니다.
    pub async fn activate_tab(&self, slot: VisualizationSlot) -> VizResult<bool> {
        self.request_slot(slot, None).await
    }

    pub async fn slot_state(&self, slot: VisualizationSlot) -> VizResult<SlotState> {
        self.call(|reply| Command::SlotState { slot, reply }).await
    }

    pub async fn active_company(&self) -> VizResult<Option<Company>> {
        self.call(|reply| Command::ActiveCompany { reply }).await
    }

    /// 이벤트 구독.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
