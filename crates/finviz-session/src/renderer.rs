//! 렌더링 엔진 추상화.
//!
//! 라인/막대 차트와 박스 다이어그램을 실제로 그리는 엔진은 외부 협력자입니다.
//! 세션은 기술자를 넘겨 핸들을 받고, 더 이상 필요 없으면 핸들을 폐기합니다.

use finviz_analytics::{BalanceLayout, ChartDescriptor};
use finviz_core::VisualizationSlot;
use serde::Serialize;

/// 렌더러에 넘기는 입력.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum RenderPayload {
    /// 라인/막대 차트
    Chart(ChartDescriptor),
    /// 재무상태표 박스 다이어그램
    BalanceBoxes(BalanceLayout),
}

impl RenderPayload {
    /// 이 입력을 그리는 슬롯.
    pub fn slot(&self) -> VisualizationSlot {
        match self {
            RenderPayload::Chart(descriptor) => descriptor.slot,
            RenderPayload::BalanceBoxes(_) => VisualizationSlot::BalanceSheetBoxes,
        }
    }

    pub fn as_chart(&self) -> Option<&ChartDescriptor> {
        match self {
            RenderPayload::Chart(descriptor) => Some(descriptor),
            RenderPayload::BalanceBoxes(_) => None,
        }
    }

    pub fn as_layout(&self) -> Option<&BalanceLayout> {
        match self {
            RenderPayload::BalanceBoxes(layout) => Some(layout),
            RenderPayload::Chart(_) => None,
        }
    }
}

/// 살아 있는 렌더 인스턴스.
///
/// `dispose`는 한 번만 호출됩니다. 세션은 호출 후 핸들을 즉시 버립니다.
pub trait RenderHandle: Send {
    /// 인스턴스가 잡고 있는 자원(리스너, 캔버스 등)을 해제합니다.
    fn dispose(&mut self);
}

/// 렌더링 엔진 trait.
pub trait ChartRenderer: Send {
    /// 입력을 그리고 인스턴스 핸들을 반환합니다.
    fn render(&mut self, payload: &RenderPayload) -> Box<dyn RenderHandle>;

    /// 렌더러 이름
    fn name(&self) -> &str {
        "renderer"
    }
}
