//! 재무상태표 박스 다이어그램 레이아웃 엔진.
//!
//! 한 사업연도의 스냅샷을 "자산 = 부채 + 자본" 박스 다이어그램의 렌더 기술자로
//! 변환합니다.
//!
//! # 레이아웃 규칙
//!
//! ```text
//!  ┌────────┐ ┌────────┐
//!  │        │ │  부채  │  ← 우변 합계 대비 비중만큼, 최소 높이 보장
//!  │  자산  │ ├────────┤
//!  │ (100%) │ │  자본  │
//!  └────────┘ └────────┘
//!   기본 높이 = clamp(f(max(자산, 부채+자본)), 하한, 상한)
//! ```
//!
//! 양변은 항상 같은 기본 높이로 그립니다. 자산과 부채+자본이 다르면 차이를
//! `balance_gap`과 `BalanceCheck::Mismatch`로 드러낼 뿐 보정하지 않습니다.
//!
//! 부채/자본 박스의 최소 높이 때문에 두 박스 높이의 합이 기본 높이를 넘을 수
//! 있습니다. 0에 가까운 항목도 라벨이 보이도록 허용한 근사입니다.

use finviz_core::{FinancialSnapshot, LayoutConfig, StatementLine};
use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::format::format_eok;

/// 기본 높이 곡선의 절편 (렌더 단위).
const BASE_HEIGHT_OFFSET: f64 = 100.0;
/// 규모가 10배 커질 때마다 늘어나는 높이.
const BASE_HEIGHT_PER_DECADE: f64 = 60.0;
/// 이 값 미만의 차이는 반올림 오차로 보고 균형으로 판정합니다 (억원).
const BALANCE_TOLERANCE: Decimal = dec!(1);

/// 부채비율(자산 대비 부채) 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiabilityBand {
    /// 30% 이하
    Stable,
    /// 50% 이하
    Acceptable,
    /// 50% 초과
    Caution,
}

impl LiabilityBand {
    pub fn classify(ratio_pct: Decimal) -> Self {
        if ratio_pct <= dec!(30) {
            Self::Stable
        } else if ratio_pct <= dec!(50) {
            Self::Acceptable
        } else {
            Self::Caution
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Acceptable => "acceptable",
            Self::Caution => "caution",
        }
    }

    /// 화면 표시용 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Stable => "안정",
            Self::Acceptable => "적정",
            Self::Caution => "주의",
        }
    }
}

impl std::fmt::Display for LiabilityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 자기자본비율(자산 대비 자본) 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquityBand {
    /// 50% 미만
    Weak,
    /// 70% 미만
    Acceptable,
    /// 70% 이상
    Strong,
}

impl EquityBand {
    pub fn classify(ratio_pct: Decimal) -> Self {
        if ratio_pct < dec!(50) {
            Self::Weak
        } else if ratio_pct < dec!(70) {
            Self::Acceptable
        } else {
            Self::Strong
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Acceptable => "acceptable",
            Self::Strong => "strong",
        }
    }

    /// 화면 표시용 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Weak => "취약",
            Self::Acceptable => "적정",
            Self::Strong => "우수",
        }
    }
}

impl std::fmt::Display for EquityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 회계등식 일치 여부.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceCheck {
    /// |자산 - (부채 + 자본)| < 1억
    Balanced,
    /// 반올림 이상의 불일치
    Mismatch,
}

/// 전기 대비 변화.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearOverYear {
    /// 전기 금액
    pub previous: Decimal,
    /// 증감액 (당기 - 전기)
    pub change: Decimal,
    /// 증감률 (%). 전기가 0이면 없음
    pub change_pct: Option<Decimal>,
}

impl YearOverYear {
    fn between(current: Decimal, previous: Decimal) -> Self {
        let change = current - previous;
        let change_pct = if previous.is_zero() {
            None
        } else {
            change
                .checked_div(previous.abs())
                .map(|r| round_pct(r * Decimal::ONE_HUNDRED))
        };
        Self {
            previous,
            change,
            change_pct,
        }
    }
}

/// 다이어그램의 박스 하나.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// 계정
    pub line: StatementLine,
    /// 당기 금액 (억원)
    pub amount: Decimal,
    /// 표시용 금액 (예: "3.0조")
    pub formatted: String,
    /// 박스 높이 (렌더 단위)
    pub height: f64,
    /// 자산 대비 비중 (%)
    pub share_pct: Decimal,
    /// 전기 대비 변화
    pub yoy: YearOverYear,
}

/// 박스 다이어그램 렌더 기술자.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceLayout {
    /// 보고 기간 라벨
    pub period: String,
    /// 양변 공통 기본 높이
    pub base_height: f64,
    /// 좌변: 자산
    pub assets: LayoutBox,
    /// 우변 위: 부채
    pub liabilities: LayoutBox,
    /// 우변 아래: 자본
    pub equity: LayoutBox,
    /// 부채 + 자본
    pub right_total: Decimal,
    /// 자산 - (부채 + 자본)
    pub balance_gap: Decimal,
    /// 회계등식 일치 여부
    pub balance_check: BalanceCheck,
    /// 부채비율 (자산 대비, %, 소수 한 자리)
    pub liability_ratio: Decimal,
    /// 자기자본비율 (자산 대비, %, 소수 한 자리)
    pub equity_ratio: Decimal,
    pub liability_band: LiabilityBand,
    pub equity_band: EquityBand,
}

impl BalanceLayout {
    /// 우변 두 박스 높이의 합. 최소 높이 때문에 기본 높이보다 클 수 있습니다.
    pub fn right_side_height(&self) -> f64 {
        self.liabilities.height + self.equity.height
    }
}

/// 레이아웃 엔진.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// 스냅샷을 레이아웃으로 변환합니다. 누락/0 입력에도 실패하지 않습니다.
    pub fn layout(&self, snapshot: &FinancialSnapshot) -> BalanceLayout {
        let assets = snapshot.line(StatementLine::TotalAssets);
        let liabilities = snapshot.line(StatementLine::TotalLiabilities);
        let equity = snapshot.line(StatementLine::TotalEquity);

        let right_total = liabilities.current + equity.current;
        let balance_gap = assets.current - right_total;
        let balance_check = if balance_gap.abs() < BALANCE_TOLERANCE {
            BalanceCheck::Balanced
        } else {
            BalanceCheck::Mismatch
        };

        let base_height = self.base_height(assets.current.max(right_total));
        let liability_height = self.sub_height(base_height, liabilities.current, right_total);
        let equity_height = self.sub_height(base_height, equity.current, right_total);

        let liability_ratio = ratio_to_assets(liabilities.current, assets.current);
        let equity_ratio = ratio_to_assets(equity.current, assets.current);
        let assets_share = if assets.current > Decimal::ZERO {
            dec!(100.0)
        } else {
            dec!(0.0)
        };

        BalanceLayout {
            period: snapshot.period_label(),
            base_height,
            assets: LayoutBox {
                line: StatementLine::TotalAssets,
                amount: assets.current,
                formatted: format_eok(assets.current),
                height: base_height,
                share_pct: assets_share,
                yoy: YearOverYear::between(assets.current, assets.previous),
            },
            liabilities: LayoutBox {
                line: StatementLine::TotalLiabilities,
                amount: liabilities.current,
                formatted: format_eok(liabilities.current),
                height: liability_height,
                share_pct: liability_ratio,
                yoy: YearOverYear::between(liabilities.current, liabilities.previous),
            },
            equity: LayoutBox {
                line: StatementLine::TotalEquity,
                amount: equity.current,
                formatted: format_eok(equity.current),
                height: equity_height,
                share_pct: equity_ratio,
                yoy: YearOverYear::between(equity.current, equity.previous),
            },
            right_total,
            balance_gap,
            balance_check,
            liability_ratio,
            equity_ratio,
            liability_band: LiabilityBand::classify(liability_ratio),
            equity_band: EquityBand::classify(equity_ratio),
        }
    }

    /// 규모에 대해 단조 증가하고 [하한, 상한]으로 제한되는 기본 높이.
    pub fn base_height(&self, magnitude: Decimal) -> f64 {
        let magnitude = magnitude.to_f64().unwrap_or(0.0).max(1.0);
        let raw = BASE_HEIGHT_OFFSET + BASE_HEIGHT_PER_DECADE * magnitude.log10();
        raw.clamp(self.config.base_height_min, self.config.base_height_max)
    }

    fn sub_height(&self, base_height: f64, part: Decimal, right_total: Decimal) -> f64 {
        let share = if right_total > Decimal::ZERO {
            part.checked_div(right_total)
                .and_then(|s| s.to_f64())
                .unwrap_or(0.0)
        } else {
            0.0
        };
        (base_height * share).max(self.config.sub_box_min_height)
    }
}

/// 기본 설정으로 레이아웃을 계산합니다.
pub fn layout(snapshot: &FinancialSnapshot) -> BalanceLayout {
    LayoutEngine::default().layout(snapshot)
}

/// 자산 대비 비율 (%). 자산이 0 이하이면 0.
fn ratio_to_assets(part: Decimal, assets: Decimal) -> Decimal {
    if assets <= Decimal::ZERO {
        return dec!(0.0);
    }
    part.checked_div(assets)
        .map(|r| round_pct(r * Decimal::ONE_HUNDRED))
        .unwrap_or(dec!(0.0))
}

fn round_pct(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
