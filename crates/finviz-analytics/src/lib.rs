//! 재무 시각화 계산.
//!
//! 이 crate는 다음을 제공합니다:
//! - 재무상태표 박스 다이어그램 레이아웃 엔진 (자산 = 부채 + 자본)
//! - 부채비율/자기자본비율 등급
//! - 억/조 단위 금액 포맷팅
//! - 차트 렌더러에 넘길 차트 기술자(descriptor)
//!
//! 모든 계산은 순수 함수이며 에러를 내지 않습니다.

pub mod balance_layout;
pub mod chart_spec;
pub mod format;

pub use balance_layout::{
    layout, BalanceCheck, BalanceLayout, EquityBand, LayoutBox, LayoutEngine, LiabilityBand,
    YearOverYear,
};
pub use chart_spec::{AxisOptions, BalanceGapNote, ChartDescriptor, ChartKind, ChartOptions};
pub use format::{format_amount_label, format_eok, format_grouped, format_thousands};
