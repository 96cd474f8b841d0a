//! 시각화 세션 컨트롤러.
//!
//! 이 crate는 다음을 제공합니다:
//! - 슬롯별 상태 머신 (`Empty → Loading → Rendered | Errored`)
//! - 재사용/재로딩 판단 순수 함수
//! - 렌더 인스턴스 핸들 수명 관리 (생성 전 항상 기존 핸들 폐기)
//! - 오래된 응답(stale response) 폐기
//! - 의도와 응답 완료를 한 곳에서 직렬화하는 비동기 컨트롤러 태스크

pub mod controller;
pub mod renderer;
pub mod session;
pub mod slot_state;

pub use controller::{ControllerHandle, SessionController, SessionEvent};
pub use renderer::{ChartRenderer, RenderHandle, RenderPayload};
pub use session::{CompletionOutcome, FetchTicket, FetchedData, SlotOutcome, VisualizationSession};
pub use slot_state::{decide, SlotDecision, SlotParams, SlotState};
