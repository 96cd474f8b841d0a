//! 슬롯 상태 머신.
//!
//! ```text
//! Empty ──request──▶ Loading ──ok──▶ Rendered
//!                       │               │ (다른 파라미터)
//!                       └──err──▶ Errored ──request──▶ Loading
//! ```
//!
//! `Rendered → Empty`는 세션 종료나 회사 변경으로만 일어납니다.

use finviz_core::{ChartType, YearRange};
use serde::Serialize;

use crate::renderer::RenderPayload;

/// 한 슬롯 요청의 실제 조회 파라미터.
///
/// 박스 다이어그램은 호출자의 연도 범위 대신 고정된 한 해를 조회하므로
/// 연도 범위가 달라도 같은 파라미터가 될 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotParams {
    /// 차트 API 조회
    Chart {
        chart_type: ChartType,
        years: YearRange,
    },
    /// 한 사업연도 재무제표 조회
    Snapshot { year: i32 },
}

impl std::fmt::Display for SlotParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotParams::Chart { chart_type, years } => write!(f, "{}[{}]", chart_type, years),
            SlotParams::Snapshot { year } => write!(f, "snapshot[{}]", year),
        }
    }
}

/// UI에 노출되는 슬롯 상태.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SlotState {
    #[default]
    Empty,
    Loading,
    Rendered(RenderPayload),
    /// 사용자에게 보여줄 메시지
    Errored(String),
}

impl SlotState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotState::Empty => "empty",
            SlotState::Loading => "loading",
            SlotState::Rendered(_) => "rendered",
            SlotState::Errored(_) => "errored",
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, SlotState::Rendered(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SlotState::Loading)
    }

    pub fn rendered(&self) -> Option<&RenderPayload> {
        match self {
            SlotState::Rendered(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SlotState::Errored(message) => Some(message),
            _ => None,
        }
    }
}

impl std::fmt::Display for SlotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 슬롯 요청에 대한 판단.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDecision {
    /// 새로 조회
    Fetch,
    /// 같은 파라미터로 이미 렌더링됨
    Reuse,
    /// 같은 파라미터로 이미 조회 중
    InFlight,
}

/// 현재 상태와 요청 파라미터로 재사용/재로딩을 결정합니다.
///
/// - `Empty`, `Errored` → 조회 (에러 후 재요청은 재시도)
/// - `Loading`/`Rendered` + 같은 파라미터 → 조회하지 않음
/// - `Loading`/`Rendered` + 다른 파라미터 → 조회 (진행 중 요청은 오래된 요청이 됨)
pub fn decide(
    state: &SlotState,
    current: Option<&SlotParams>,
    requested: &SlotParams,
) -> SlotDecision {
    let same_params = current == Some(requested);
    match state {
        SlotState::Empty | SlotState::Errored(_) => SlotDecision::Fetch,
        SlotState::Loading if same_params => SlotDecision::InFlight,
        SlotState::Rendered(_) if same_params => SlotDecision::Reuse,
        SlotState::Loading | SlotState::Rendered(_) => SlotDecision::Fetch,
    }
}
