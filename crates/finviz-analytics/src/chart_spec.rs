//! 차트 렌더러에 넘길 차트 기술자.
//!
//! 차트 슬롯마다 차트 종류, 제목, 축 설정, 툴팁 단위가 정해져 있습니다.
//! 시계열 값 자체는 백엔드 데이터를 그대로 사용합니다.

use finviz_core::{ChartData, VisualizationSlot};
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::format::format_grouped;

/// 금액 축 제목.
const AMOUNT_AXIS_TITLE: &str = "금액 (억원)";
/// 연도 축 제목.
const YEAR_AXIS_TITLE: &str = "연도";
/// 균형 차트에서 자산 시계열을 찾는 라벨 조각.
const ASSET_SERIES: &str = "자산총계";
/// 균형 차트에서 부채+자본 시계열을 찾는 라벨 조각.
const DEBT_EQUITY_SERIES: &str = "부채+자본";

/// 차트 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// 축 설정.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisOptions {
    pub title: String,
    pub begin_at_zero: bool,
    /// 눈금 라벨 뒤에 붙는 단위 (예: "억")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_suffix: Option<String>,
}

/// 차트 옵션.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub title: String,
    pub x_axis: AxisOptions,
    pub y_axis: AxisOptions,
    /// 툴팁 값 뒤에 붙는 단위
    pub tooltip_suffix: String,
    /// 같은 x 위치의 모든 데이터셋을 함께 보여줌
    pub interaction_mode: String,
    pub intersect: bool,
}

impl ChartOptions {
    fn amount_chart(title: &str) -> Self {
        Self {
            title: title.to_string(),
            x_axis: AxisOptions {
                title: YEAR_AXIS_TITLE.to_string(),
                begin_at_zero: false,
                tick_suffix: None,
            },
            y_axis: AxisOptions {
                title: AMOUNT_AXIS_TITLE.to_string(),
                begin_at_zero: true,
                tick_suffix: Some("억".to_string()),
            },
            tooltip_suffix: "억원".to_string(),
            interaction_mode: "index".to_string(),
            intersect: false,
        }
    }
}

/// 균형 차트의 연도별 차이 주석.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceGapNote {
    /// x축 라벨 (연도)
    pub label: String,
    /// 자산총계
    pub assets: f64,
    /// 부채 + 자본
    pub debt_equity: f64,
    /// |자산 - (부채 + 자본)|
    pub difference: f64,
    /// 차이가 1억 미만이면 균형
    pub balanced: bool,
}

impl BalanceGapNote {
    /// 툴팁 하단에 붙는 줄들.
    pub fn tooltip_lines(&self) -> Vec<String> {
        let difference = Decimal::from_f64(self.difference)
            .map(|d| d.round_dp(2))
            .unwrap_or_default();
        vec![
            String::new(),
            format!("차이: {}억원", format_grouped(difference)),
            if self.balanced {
                "✅ 균형 일치".to_string()
            } else {
                "⚠️ 균형 불일치".to_string()
            },
        ]
    }
}

/// 렌더러 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub slot: VisualizationSlot,
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
    /// 균형 차트에서만 채워짐
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gap_notes: Vec<BalanceGapNote>,
}

impl ChartDescriptor {
    /// 차트 슬롯의 기술자를 만듭니다. 박스 다이어그램 슬롯이면 `None`.
    pub fn for_slot(slot: VisualizationSlot, data: ChartData) -> Option<Self> {
        let (kind, title) = match slot {
            VisualizationSlot::RevenueTrend => (ChartKind::Line, "손익 현황 (단위: 억원)"),
            VisualizationSlot::AssetComposition => (ChartKind::Bar, "재무상태 현황 (단위: 억원)"),
            VisualizationSlot::BalanceEquation => (
                ChartKind::Bar,
                "회계등식 균형 분석: 자산 = 부채 + 자본 (단위: 억원)",
            ),
            VisualizationSlot::BalanceSheetBoxes => return None,
        };

        let gap_notes = if slot == VisualizationSlot::BalanceEquation {
            balance_gap_notes(&data)
        } else {
            Vec::new()
        };

        Some(Self {
            slot,
            kind,
            options: ChartOptions::amount_chart(title),
            data,
            gap_notes,
        })
    }

    /// y축 눈금 라벨 (예: `1234.5` → `"1,234.5억"`).
    pub fn tick_label(&self, value: f64) -> String {
        let suffix = self.options.y_axis.tick_suffix.as_deref().unwrap_or("");
        let value = Decimal::from_f64(value).unwrap_or_default();
        format!("{}{}", format_grouped(value), suffix)
    }
}

/// 자산총계 시계열과 부채+자본 시계열을 연도별로 비교합니다.
///
/// 두 시계열 중 하나라도 없으면 빈 목록입니다.
fn balance_gap_notes(data: &ChartData) -> Vec<BalanceGapNote> {
    let (Some(assets), Some(debt_equity)) = (
        data.dataset_containing(ASSET_SERIES),
        data.dataset_containing(DEBT_EQUITY_SERIES),
    ) else {
        return Vec::new();
    };

    data.labels
        .iter()
        .zip(assets.data.iter().zip(debt_equity.data.iter()))
        .map(|(label, (&a, &de))| {
            let difference = (a - de).abs();
            BalanceGapNote {
                label: label.clone(),
                assets: a,
                debt_equity: de,
                difference,
                balanced: difference < 1.0,
            }
        })
        .collect()
}
